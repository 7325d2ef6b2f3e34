//! Mock construction helpers

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam_channel::{bounded, Receiver, Sender};
use liveproc::{BufferId, BufferProvider, ComputeError, ComputeFn, OutputSink};

/// Provider that hands out sequential ids and records every release in
/// order, so tests can assert exactly which buffers came back and when.
pub struct RecordingProvider {
    next: AtomicU64,
    released: Mutex<Vec<BufferId>>,
}

impl RecordingProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next: AtomicU64::new(1),
            released: Mutex::new(Vec::new()),
        })
    }

    pub fn allocate(&self) -> BufferId {
        BufferId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    pub fn released(&self) -> Vec<BufferId> {
        self.released.lock().unwrap().clone()
    }

    pub fn release_count(&self) -> usize {
        self.released.lock().unwrap().len()
    }
}

impl BufferProvider for RecordingProvider {
    fn release(&self, buffer: BufferId) {
        self.released.lock().unwrap().push(buffer);
    }
}

/// Sink that records what the scheduler published or reported. The sink is
/// moved into the scheduler, so inspection goes through the shared handles
/// returned alongside it.
pub struct RecordingSink {
    frames: Arc<Mutex<Vec<BufferId>>>,
    errors: Arc<Mutex<Vec<ComputeError>>>,
}

impl RecordingSink {
    pub fn new() -> (
        Self,
        Arc<Mutex<Vec<BufferId>>>,
        Arc<Mutex<Vec<ComputeError>>>,
    ) {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let errors = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                frames: Arc::clone(&frames),
                errors: Arc::clone(&errors),
            },
            frames,
            errors,
        )
    }
}

impl OutputSink for RecordingSink {
    fn publish(&mut self, buffer: BufferId) {
        self.frames.lock().unwrap().push(buffer);
    }

    fn report_error(&mut self, error: ComputeError) {
        self.errors.lock().unwrap().push(error);
    }
}

/// Permit channel for holding a compute closure mid-run. Each run consumes
/// one permit, so a test can overlap edits with an in-flight computation.
pub fn run_permits() -> (Sender<()>, Receiver<()>) {
    bounded(8)
}

/// Compute that allocates one buffer per run and blocks on a permit before
/// handing the frame over.
pub fn gated_compute(provider: Arc<RecordingProvider>, permits: Receiver<()>) -> ComputeFn {
    Arc::new(move |scope, _snapshot, _token| {
        let frame = scope.track(provider.allocate());
        permits
            .recv()
            .map_err(|_| ComputeError::msg("permit channel closed"))?;
        Ok(scope.untrack(frame))
    })
}
