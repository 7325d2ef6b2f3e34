//! # LiveProc: Reactive Image-Pipeline Core
//!
//! A reactive core for interactive image tools. Parameters form a dependency
//! graph that keeps control enablement consistent while the user edits,
//! every accepted edit schedules a background recomputation with
//! last-write-wins semantics, and all intermediate buffers are tracked by a
//! scope so nothing leaks when a run fails, panics or is superseded.
//!
//! ## Architecture
//!
//! - **Graph**: Parameter nodes joined by enablement links, with worklist
//!   propagation and ordered change notification
//! - **Scope**: Stack-like buffer tracking with reverse-order release
//!   through a [`BufferProvider`](scope::BufferProvider)
//! - **Scheduler**: A single compute worker thread driven by a generation
//!   counter, computing against snapshots frozen at dispatch
//! - **Communication**: Crossbeam channels between the interaction thread
//!   and the compute worker
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use liveproc::{
//!     ComputeFn, EnableLink, ParamGraph, ParamSpec, ParamValue,
//!     PipelineScheduler, SharedProvider,
//! };
//!
//! fn main() -> liveproc::Result<()> {
//!     let mut graph = ParamGraph::new();
//!     let blur = graph.add_param(ParamSpec::toggle("blur").initial(ParamValue::Toggle(true)));
//!     let radius = graph.add_param(
//!         ParamSpec::number("radius")
//!             .range(0.0, 64.0)
//!             .initial(ParamValue::Number(4.0)),
//!     );
//!     // Radius only participates while blur is on; off, it reads as 0.
//!     graph.add_link(
//!         EnableLink::new(blur, radius, |v| v.as_toggle() == Some(true))
//!             .with_default(ParamValue::Number(0.0)),
//!     )?;
//!
//!     let provider: SharedProvider = Arc::new(MyBufferPool::new());
//!     let compute: ComputeFn = Arc::new(|scope, snapshot, token| {
//!         // Allocate through the pool, track in `scope`, untrack the frame
//!         // that should outlive the run, bail out early if `token.is_stale()`.
//!         todo!()
//!     });
//!
//!     let mut scheduler = PipelineScheduler::new(compute, provider, Box::new(MySink))?;
//!     scheduler.watch(&mut graph, &[blur, radius])?;
//!
//!     graph.set_value(radius, ParamValue::Number(12.0))?;
//!     scheduler.settle(&graph, Duration::from_secs(1))?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod labels;
pub mod scope;
pub mod sched;
pub mod sink;
pub mod types;

// Re-export commonly used types
pub use config::CoreConfig;
pub use error::{ComputeError, CoreError, Result, ResultExt};
pub use graph::{EnableLink, ParamChange, ParamGraph, ParamId, ParamSnapshot, ParamSpec};
pub use labels::{LabelEntry, LabelTable, Locale};
pub use scope::{BufferProvider, ResourceScope, SharedProvider};
pub use sched::{ComputeFn, PipelineScheduler, RunState, RunToken, SchedulerStats};
pub use sink::{ChannelSink, OutputSink, PreviewEvent};
pub use types::{BufferId, Generation, ParamKind, ParamValue, Point, Region, Rgba};
