//! Live recomputation of a feature from its parameters.
//!
//! The scheduler owns a single compute worker thread and a channel pair to
//! it. Edits bump a generation counter on the interaction thread; [`pump`]
//! dispatches at most one run at a time against a frozen snapshot, and
//! results that lost the race to a newer edit are released unpublished.
//!
//! ```text
//!   ParamGraph edits            PipelineScheduler            ComputeWorker
//!   ───────────────►  generation++, dirty  ──RunRequest──►  compute(scope,
//!                      pump(): dispatch /                    snapshot, token)
//!                      commit / supersede  ◄──RunOutcome──
//! ```
//!
//! [`pump`]: PipelineScheduler::pump

mod bridge;
mod scheduler;
mod worker;

pub use scheduler::{PipelineScheduler, RunState, SchedulerStats};
pub use worker::{ComputeFn, ComputeResult, RunToken};
