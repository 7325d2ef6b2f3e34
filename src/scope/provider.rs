//! Seam to the native image library's allocator.

use std::sync::Arc;

use crate::types::BufferId;

/// Release side of the native buffer allocator.
///
/// The embedding application implements this over its image library. The
/// core never allocates or inspects buffers; it only hands back handles it
/// owns, exactly once each.
pub trait BufferProvider: Send + Sync {
    fn release(&self, buffer: BufferId);
}

/// Shared provider handle. The interaction thread and the compute worker
/// both release through it.
pub type SharedProvider = Arc<dyn BufferProvider>;
