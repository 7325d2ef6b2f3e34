//! Deterministic lifetime management for native image buffers.
//!
//! Image operations produce chains of temporaries owned by the native
//! library, invisible to Rust's own ownership tracking. A [`ResourceScope`]
//! brings them back under scope discipline: track on allocation, transfer
//! survivors out with `untrack`, and everything else is released in reverse
//! order when the scope ends, error paths included.

pub mod provider;
pub mod scope;

pub use provider::{BufferProvider, SharedProvider};
pub use scope::ResourceScope;
