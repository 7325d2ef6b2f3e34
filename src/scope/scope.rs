//! Scoped ownership of native buffer handles.
//!
//! A scope owns every handle tracked into it and releases the survivors in
//! reverse tracking order when it ends, on every exit path. `track` returns
//! the handle unchanged so allocation sites can be wrapped inline:
//!
//! ```ignore
//! let blurred = scope.track(lib.gaussian(src, k));
//! let edges = scope.track(lib.canny(blurred, lo, hi));
//! let result = scope.untrack(edges); // survives the scope
//! ```

use crate::error::CoreError;
use crate::scope::provider::SharedProvider;
use crate::types::BufferId;

/// Owns temporary buffers for one unit of work.
pub struct ResourceScope {
    provider: SharedProvider,
    owned: Vec<BufferId>,
}

impl ResourceScope {
    pub fn new(provider: SharedProvider) -> Self {
        Self {
            provider,
            owned: Vec::new(),
        }
    }

    /// Take ownership of a handle. Returns it unchanged for chaining.
    ///
    /// A handle must be owned by at most one live scope; tracking a handle
    /// this scope already owns would release it twice and is reported as
    /// misuse.
    pub fn track(&mut self, buffer: BufferId) -> BufferId {
        if self.owned.contains(&buffer) {
            self.misuse(CoreError::DoubleRelease(buffer));
            return buffer;
        }
        self.owned.push(buffer);
        buffer
    }

    /// Give up ownership without releasing. Returns the handle unchanged so
    /// transfers read as `parent.track(child.untrack(buf))`.
    pub fn untrack(&mut self, buffer: BufferId) -> BufferId {
        match self.owned.iter().position(|b| *b == buffer) {
            Some(pos) => {
                self.owned.remove(pos);
            }
            None => self.misuse(CoreError::UnownedRelease(buffer)),
        }
        buffer
    }

    pub fn owns(&self, buffer: BufferId) -> bool {
        self.owned.contains(&buffer)
    }

    pub fn owned_count(&self) -> usize {
        self.owned.len()
    }

    /// New scope over the same provider, for a nested unit of work. Handles
    /// that must outlive the child are transferred out via `untrack`.
    pub fn child(&self) -> ResourceScope {
        ResourceScope::new(self.provider.clone())
    }

    pub fn provider(&self) -> &SharedProvider {
        &self.provider
    }

    /// End the scope now, releasing everything still owned.
    pub fn close(self) {}

    /// Misuse is a programming error: fatal in debug builds, reported and
    /// ignored in release builds.
    fn misuse(&self, err: CoreError) {
        if cfg!(debug_assertions) {
            panic!("tracker misuse: {err}");
        }
        tracing::error!(%err, "tracker misuse ignored");
    }
}

impl Drop for ResourceScope {
    fn drop(&mut self) {
        // Reverse tracking order: later buffers derive from earlier ones.
        while let Some(buffer) = self.owned.pop() {
            self.provider.release(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::provider::BufferProvider;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct TestProvider {
        released: Mutex<Vec<BufferId>>,
    }

    impl BufferProvider for TestProvider {
        fn release(&self, buffer: BufferId) {
            self.released.lock().unwrap().push(buffer);
        }
    }

    fn create_test_provider() -> (Arc<TestProvider>, SharedProvider) {
        let provider = Arc::new(TestProvider::default());
        let shared: SharedProvider = provider.clone();
        (provider, shared)
    }

    #[test]
    fn test_release_in_reverse_order() {
        let (probe, shared) = create_test_provider();
        {
            let mut scope = ResourceScope::new(shared);
            scope.track(BufferId(1));
            scope.track(BufferId(2));
            scope.track(BufferId(3));
        }
        assert_eq!(
            *probe.released.lock().unwrap(),
            vec![BufferId(3), BufferId(2), BufferId(1)]
        );
    }

    #[test]
    fn test_track_returns_handle_for_chaining() {
        let (_, shared) = create_test_provider();
        let mut scope = ResourceScope::new(shared);
        let buf = scope.track(BufferId(7));
        assert_eq!(buf, BufferId(7));
        assert!(scope.owns(buf));
        assert_eq!(scope.owned_count(), 1);
    }

    #[test]
    fn test_untrack_skips_release() {
        let (probe, shared) = create_test_provider();
        let kept;
        {
            let mut scope = ResourceScope::new(shared);
            scope.track(BufferId(1));
            let tracked = scope.track(BufferId(2));
            kept = scope.untrack(tracked);
            assert!(!scope.owns(kept));
        }
        assert_eq!(*probe.released.lock().unwrap(), vec![BufferId(1)]);
        assert_eq!(kept, BufferId(2));
    }

    #[test]
    fn test_explicit_close_releases() {
        let (probe, shared) = create_test_provider();
        let mut scope = ResourceScope::new(shared);
        scope.track(BufferId(4));
        scope.close();
        assert_eq!(*probe.released.lock().unwrap(), vec![BufferId(4)]);
    }

    #[test]
    fn test_child_transfer_releases_once() {
        let (probe, shared) = create_test_provider();
        {
            let mut parent = ResourceScope::new(shared);
            parent.track(BufferId(1));
            let survivor = {
                let mut child = parent.child();
                child.track(BufferId(10));
                child.track(BufferId(11));
                child.untrack(BufferId(11))
                // child drops here, releasing only 10
            };
            parent.track(survivor);
        }
        assert_eq!(
            *probe.released.lock().unwrap(),
            vec![BufferId(10), BufferId(11), BufferId(1)]
        );
    }

    #[test]
    fn test_release_on_unwind() {
        let (probe, shared) = create_test_provider();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut scope = ResourceScope::new(shared);
            scope.track(BufferId(1));
            scope.track(BufferId(2));
            panic!("library call failed");
        }));
        assert!(result.is_err());
        assert_eq!(
            *probe.released.lock().unwrap(),
            vec![BufferId(2), BufferId(1)]
        );
    }

    #[test]
    #[should_panic(expected = "tracker misuse")]
    fn test_double_track_is_fatal_in_debug() {
        let (_, shared) = create_test_provider();
        let mut scope = ResourceScope::new(shared);
        scope.track(BufferId(1));
        scope.track(BufferId(1));
    }

    #[test]
    #[should_panic(expected = "tracker misuse")]
    fn test_unowned_untrack_is_fatal_in_debug() {
        let (_, shared) = create_test_provider();
        let mut scope = ResourceScope::new(shared);
        scope.untrack(BufferId(9));
    }
}
