//! Compute worker thread.
//!
//! Runs one computation at a time against a frozen parameter snapshot, with
//! a fresh resource scope per run. The scope ends on every path out of the
//! closure, so intermediates never outlive the run that made them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use crate::error::ComputeError;
use crate::graph::ParamSnapshot;
use crate::sched::bridge::{RunOutcome, RunRequest, WorkerCommand};
use crate::scope::{ResourceScope, SharedProvider};
use crate::types::{BufferId, Generation};

/// Staleness probe handed to compute closures.
///
/// Cancellation is cooperative: the scheduler never interrupts a run, it
/// only advances the latest generation. Long computations should call
/// [`RunToken::is_stale`] after expensive library calls and return
/// [`ComputeError::Cancelled`] to give up early.
pub struct RunToken {
    generation: Generation,
    latest: Arc<AtomicU64>,
}

impl RunToken {
    pub(crate) fn new(generation: Generation, latest: Arc<AtomicU64>) -> Self {
        Self { generation, latest }
    }

    /// Generation this run serves.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether a newer generation has been scheduled since dispatch.
    pub fn is_stale(&self) -> bool {
        Generation(self.latest.load(Ordering::Relaxed)) != self.generation
    }
}

/// Result of one feature computation.
pub type ComputeResult = std::result::Result<BufferId, ComputeError>;

/// The feature's computation closure.
///
/// Receives a scope for its temporaries, the frozen parameters, and the run
/// token. The returned buffer must not be owned by the scope; a tracked
/// intermediate chosen as the result is transferred out with
/// `ResourceScope::untrack` first.
pub type ComputeFn =
    Arc<dyn Fn(&mut ResourceScope, &ParamSnapshot, &RunToken) -> ComputeResult + Send + Sync>;

/// Worker-thread half of the scheduler.
pub(crate) struct ComputeWorker {
    compute: ComputeFn,
    provider: SharedProvider,
    latest: Arc<AtomicU64>,
    cmd_rx: Receiver<WorkerCommand>,
    out_tx: Sender<RunOutcome>,
}

impl ComputeWorker {
    pub fn new(
        compute: ComputeFn,
        provider: SharedProvider,
        latest: Arc<AtomicU64>,
        cmd_rx: Receiver<WorkerCommand>,
        out_tx: Sender<RunOutcome>,
    ) -> Self {
        Self {
            compute,
            provider,
            latest,
            cmd_rx,
            out_tx,
        }
    }

    /// Blocking loop; returns on `Shutdown` or when the scheduler is gone.
    pub fn run(self) {
        tracing::info!("compute worker started");
        loop {
            match self.cmd_rx.recv() {
                Ok(WorkerCommand::Run(request)) => {
                    let outcome = self.run_once(request);
                    if self.out_tx.send(outcome).is_err() {
                        tracing::warn!("outcome receiver gone, stopping");
                        break;
                    }
                }
                Ok(WorkerCommand::Shutdown) | Err(_) => break,
            }
        }
        tracing::info!("compute worker stopped");
    }

    fn run_once(&self, request: RunRequest) -> RunOutcome {
        let generation = request.generation;
        tracing::debug!(%generation, "run started");

        let compute = Arc::clone(&self.compute);
        let token = RunToken::new(generation, Arc::clone(&self.latest));
        let provider = self.provider.clone();
        // A panicking closure must not take the worker down; the scope
        // drops during unwind, so intermediates are still released.
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let mut scope = ResourceScope::new(provider);
            let result = (compute)(&mut scope, &request.snapshot, &token);
            if let Ok(buffer) = &result {
                if scope.owns(*buffer) {
                    tracing::warn!(?buffer, "result buffer left tracked, transferring out");
                    scope.untrack(*buffer);
                }
            }
            result
        }));

        let result = match result {
            Ok(result) => result,
            Err(_) => Err(ComputeError::msg("computation panicked")),
        };
        RunOutcome { generation, result }
    }
}
