//! Reactive parameter graph with conditional enablement.
//!
//! Controls declare typed parameters; enablement links gate one parameter on
//! a predicate over another's observed value. All mutation runs on the
//! interaction thread; workers receive frozen snapshots.
//!
//! # Architecture
//!
//! ```text
//! [set_value] ──► worklist ──► link evaluation (declaration order)
//!                        └──► subscriber callbacks (subscription order)
//! ```
//!
//! # Design
//!
//! - **Arena storage**: flat `Vec<ParamSlot>` with `ParamId` as array index.
//! - **Worklist propagation**: chained updates drain a queue, no recursion.
//! - **DAG by construction**: `add_link` rejects cycles before they exist.
//! - **Observers, not editors**: subscriber callbacks cannot re-enter the
//!   graph; chained mutation is expressed as links.

pub mod graph;
pub mod id;
pub mod link;
pub mod node;
pub mod snapshot;

pub use graph::{ParamChange, ParamGraph};
pub use id::{LinkId, ParamId, SubscriptionId};
pub use link::{EnableLink, EnablePredicate};
pub use node::ParamSpec;
pub use snapshot::ParamSnapshot;
