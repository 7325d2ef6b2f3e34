//! Run scheduling: last write wins, at most one computation in flight.
//!
//! Edits on the interaction thread bump a shared generation counter; the
//! scheduler dispatches at most one run at a time against a parameter
//! snapshot frozen at dispatch. A completed run whose generation is no
//! longer the latest is superseded: its buffer is released unpublished and
//! the pending generation dispatches immediately. The sink therefore sees
//! strictly increasing generations, never a stale frame after a fresh one.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{RecvTimeoutError, TryRecvError};

use crate::config::CoreConfig;
use crate::error::{ComputeError, CoreError, Result, ResultExt};
use crate::graph::{ParamGraph, ParamId};
use crate::sched::bridge::{RunOutcome, RunRequest, WorkerBridge, WorkerCommand};
use crate::sched::worker::{ComputeFn, ComputeWorker};
use crate::scope::SharedProvider;
use crate::sink::OutputSink;
use crate::types::Generation;

/// Resting states of the run machine. Committed, Superseded and Failed are
/// transitions, visible in [`SchedulerStats`] and the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Scheduled,
    Running,
}

/// Lifetime counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub runs_started: u64,
    pub committed: u64,
    pub superseded: u64,
    pub failed: u64,
}

/// Drives one feature's recomputation from parameter edits.
pub struct PipelineScheduler {
    latest: Arc<AtomicU64>,
    dirty: Arc<AtomicBool>,
    state: RunState,
    inflight: Option<Generation>,
    last_published: Option<Generation>,
    bridge: WorkerBridge,
    sink: Box<dyn OutputSink>,
    provider: SharedProvider,
    stats: SchedulerStats,
    worker: Option<JoinHandle<()>>,
}

impl PipelineScheduler {
    pub fn new(
        compute: ComputeFn,
        provider: SharedProvider,
        sink: Box<dyn OutputSink>,
    ) -> Result<Self> {
        Self::with_config(CoreConfig::default(), compute, provider, sink)
    }

    /// Spawn the compute worker and return the scheduler owning it.
    pub fn with_config(
        config: CoreConfig,
        compute: ComputeFn,
        provider: SharedProvider,
        sink: Box<dyn OutputSink>,
    ) -> Result<Self> {
        let latest = Arc::new(AtomicU64::new(0));
        let dirty = Arc::new(AtomicBool::new(false));
        let (bridge, cmd_rx, out_tx) =
            WorkerBridge::new(config.command_capacity, config.outcome_capacity);
        let worker = ComputeWorker::new(
            compute,
            provider.clone(),
            Arc::clone(&latest),
            cmd_rx,
            out_tx,
        );
        let handle = std::thread::Builder::new()
            .name(config.worker_thread_name.clone())
            .spawn(move || worker.run())?;

        Ok(Self {
            latest,
            dirty,
            state: RunState::Idle,
            inflight: None,
            last_published: None,
            bridge,
            sink,
            provider,
            stats: SchedulerStats::default(),
            worker: Some(handle),
        })
    }

    /// Subscribe to the given root parameters: any accepted change on them
    /// schedules a recomputation.
    pub fn watch(&self, graph: &mut ParamGraph, roots: &[ParamId]) -> Result<()> {
        for &root in roots {
            let latest = Arc::clone(&self.latest);
            let dirty = Arc::clone(&self.dirty);
            graph
                .subscribe(root, move |_| {
                    latest.fetch_add(1, Ordering::Relaxed);
                    dirty.store(true, Ordering::Relaxed);
                })
                .with_context(|| format!("watching parameter {root}"))?;
        }
        Ok(())
    }

    /// Schedule a recomputation without a parameter edit (initial kick,
    /// external invalidation).
    pub fn mark_changed(&self) {
        self.latest.fetch_add(1, Ordering::Relaxed);
        self.dirty.store(true, Ordering::Relaxed);
    }

    /// Latest scheduled generation.
    pub fn generation(&self) -> Generation {
        Generation(self.latest.load(Ordering::Relaxed))
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    pub fn last_published(&self) -> Option<Generation> {
        self.last_published
    }

    /// Drive the machine: collect finished runs, then dispatch if an edit
    /// is pending and nothing is in flight. Call from the interaction
    /// thread's event loop.
    pub fn pump(&mut self, graph: &ParamGraph) -> Result<()> {
        loop {
            match self.bridge.out_rx.try_recv() {
                Ok(outcome) => self.handle_outcome(outcome),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    return Err(CoreError::ChannelClosed("outcome channel".into()))
                }
            }
        }
        if self.state == RunState::Idle && self.dirty.load(Ordering::Relaxed) {
            self.state = RunState::Scheduled;
        }
        self.maybe_dispatch(graph)
    }

    /// Drive until the machine is idle with no pending edit, blocking on
    /// the in-flight run up to `timeout`.
    pub fn settle(&mut self, graph: &ParamGraph, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            self.pump(graph)?;
            if self.state == RunState::Idle && !self.dirty.load(Ordering::Relaxed) {
                return Ok(());
            }
            if self.inflight.is_some() {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Err(CoreError::SettleTimeout);
                }
                match self.bridge.out_rx.recv_timeout(remaining) {
                    Ok(outcome) => self.handle_outcome(outcome),
                    Err(RecvTimeoutError::Timeout) => return Err(CoreError::SettleTimeout),
                    Err(RecvTimeoutError::Disconnected) => {
                        return Err(CoreError::ChannelClosed("outcome channel".into()))
                    }
                }
            } else if Instant::now() >= deadline {
                return Err(CoreError::SettleTimeout);
            }
        }
    }

    fn maybe_dispatch(&mut self, graph: &ParamGraph) -> Result<()> {
        if self.state != RunState::Scheduled || self.inflight.is_some() {
            return Ok(());
        }
        self.dirty.store(false, Ordering::Relaxed);
        let generation = self.generation();
        let snapshot = graph.snapshot();
        self.bridge
            .cmd_tx
            .send(WorkerCommand::Run(RunRequest {
                generation,
                snapshot,
            }))
            .map_err(|_| CoreError::ChannelClosed("command channel".into()))?;
        self.inflight = Some(generation);
        self.state = RunState::Running;
        self.stats.runs_started += 1;
        tracing::debug!(%generation, "run dispatched");
        Ok(())
    }

    fn handle_outcome(&mut self, outcome: RunOutcome) {
        debug_assert_eq!(self.inflight, Some(outcome.generation));
        self.inflight = None;
        let latest = self.generation();
        let stale = outcome.generation != latest;

        match outcome.result {
            Ok(buffer) if !stale => {
                debug_assert!(
                    self.last_published
                        .map(|g| g < outcome.generation)
                        .unwrap_or(true),
                    "published generations must increase"
                );
                self.last_published = Some(outcome.generation);
                self.stats.committed += 1;
                tracing::debug!(generation = %outcome.generation, ?buffer, "run committed");
                self.sink.publish(buffer);
                self.state = self.after_outcome_state();
            }
            Ok(buffer) => {
                // The user already asked for something newer.
                self.stats.superseded += 1;
                tracing::debug!(
                    generation = %outcome.generation,
                    %latest,
                    "run superseded, releasing unpublished result"
                );
                self.provider.release(buffer);
                self.state = self.after_outcome_state();
            }
            Err(ComputeError::Cancelled) => {
                self.stats.superseded += 1;
                tracing::debug!(generation = %outcome.generation, "run bailed out as stale");
                self.state = self.after_outcome_state();
            }
            Err(error) => {
                self.stats.failed += 1;
                tracing::warn!(generation = %outcome.generation, %error, "run failed");
                self.sink.report_error(error);
                self.state = self.after_outcome_state();
            }
        }
    }

    fn after_outcome_state(&self) -> RunState {
        if self.dirty.load(Ordering::Relaxed) {
            RunState::Scheduled
        } else {
            RunState::Idle
        }
    }
}

impl Drop for PipelineScheduler {
    fn drop(&mut self) {
        let _ = self.bridge.cmd_tx.send(WorkerCommand::Shutdown);
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                tracing::error!("compute worker panicked during shutdown");
            }
        }
    }
}
