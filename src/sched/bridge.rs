//! Channel plumbing between the scheduler and its compute worker.
//!
//! Bounded crossbeam channels in both directions. Capacities come from
//! [`crate::config::CoreConfig`]; at most one run is ever in flight, so the
//! bounds exist to catch protocol bugs, not to buffer load.

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::graph::ParamSnapshot;
use crate::sched::worker::ComputeResult;
use crate::types::Generation;

/// Command sent to the compute worker thread.
#[derive(Debug)]
pub(crate) enum WorkerCommand {
    Run(RunRequest),
    Shutdown,
}

/// One dispatched run: the generation it serves and the parameters frozen
/// at dispatch time.
#[derive(Debug)]
pub(crate) struct RunRequest {
    pub generation: Generation,
    pub snapshot: ParamSnapshot,
}

/// The worker's answer for one run.
#[derive(Debug)]
pub(crate) struct RunOutcome {
    pub generation: Generation,
    pub result: ComputeResult,
}

/// Scheduler-side channel endpoints.
pub(crate) struct WorkerBridge {
    pub cmd_tx: Sender<WorkerCommand>,
    pub out_rx: Receiver<RunOutcome>,
}

impl WorkerBridge {
    /// Create the channel pair; the returned receiver/sender move into the
    /// worker thread.
    pub fn new(
        command_capacity: usize,
        outcome_capacity: usize,
    ) -> (Self, Receiver<WorkerCommand>, Sender<RunOutcome>) {
        let (cmd_tx, cmd_rx) = bounded(command_capacity);
        let (out_tx, out_rx) = bounded(outcome_capacity);
        (Self { cmd_tx, out_rx }, cmd_rx, out_tx)
    }
}
