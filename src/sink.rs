//! Output delivery to the embedding application.

use crossbeam_channel::{Sender, TrySendError};

use crate::error::ComputeError;
use crate::scope::SharedProvider;
use crate::types::BufferId;

/// Receives committed results and failures from the scheduler.
///
/// Invoked only on the Committed and Failed transitions, on the thread
/// driving the scheduler. Published buffers arrive in strictly increasing
/// generation order and are owned by the sink from that point on.
#[cfg_attr(test, mockall::automock)]
pub trait OutputSink: Send {
    fn publish(&mut self, buffer: BufferId);
    fn report_error(&mut self, error: ComputeError);
}

/// Sink events in message form, for channel transport to a UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewEvent {
    Frame(BufferId),
    Error(ComputeError),
}

/// Sink that forwards events over a bounded channel without ever blocking
/// the scheduler.
///
/// A full or disconnected channel drops the event and counts it; a dropped
/// frame's buffer is released immediately so nothing leaks when the UI
/// cannot keep up.
pub struct ChannelSink {
    tx: Sender<PreviewEvent>,
    provider: SharedProvider,
    dropped: u64,
}

impl ChannelSink {
    pub fn new(tx: Sender<PreviewEvent>, provider: SharedProvider) -> Self {
        Self {
            tx,
            provider,
            dropped: 0,
        }
    }

    /// Number of events dropped because the receiver was full or gone.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn forward(&mut self, event: PreviewEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event) | TrySendError::Disconnected(event)) => {
                self.dropped += 1;
                if let PreviewEvent::Frame(buffer) = event {
                    self.provider.release(buffer);
                }
                tracing::warn!(dropped = self.dropped, "preview channel unavailable, event dropped");
            }
        }
    }
}

impl OutputSink for ChannelSink {
    fn publish(&mut self, buffer: BufferId) {
        self.forward(PreviewEvent::Frame(buffer));
    }

    fn report_error(&mut self, error: ComputeError) {
        self.forward(PreviewEvent::Error(error));
    }
}

impl Drop for ChannelSink {
    fn drop(&mut self) {
        if self.dropped > 0 {
            tracing::warn!(dropped = self.dropped, "preview sink dropped events in its lifetime");
        }
    }
}
