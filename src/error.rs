//! Error handling for the reactive core.
//!
//! Infrastructure failures ([`CoreError`]) and feature computation failures
//! ([`ComputeError`]) are kept apart: the first kind is returned to the
//! caller, the second kind travels through the scheduler to the output sink.

use thiserror::Error;

use crate::graph::ParamId;
use crate::types::{BufferId, ParamKind};

/// Main error type for core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Strict read of a parameter that is unset or disabled
    #[error("parameter '{name}' has no readable value (unset or disabled)")]
    NotReady { name: String },

    /// Write with a value of the wrong kind
    #[error("parameter '{name}' expects a {}, got a {}", expected.name(), got.name())]
    TypeMismatch {
        name: String,
        expected: ParamKind,
        got: ParamKind,
    },

    /// Id that does not belong to this graph
    #[error("unknown parameter {0:?}")]
    UnknownParam(ParamId),

    /// Enablement link whose addition would close a dependency cycle
    // Field is named `src`, not `source`: thiserror treats a field named
    // `source` as the error's source, which would require `ParamId: Error`.
    #[error("dependency link {src:?} -> {target:?} would create a cycle")]
    CycleDetected { src: ParamId, target: ParamId },

    /// A buffer handle would be released twice by the same scope
    #[error("buffer {0:?} is already tracked by this scope")]
    DoubleRelease(BufferId),

    /// Release or transfer of a handle the scope does not own
    #[error("buffer {0:?} is not tracked by this scope")]
    UnownedRelease(BufferId),

    /// Worker channel disconnected
    #[error("worker channel closed: {0}")]
    ChannelClosed(String),

    /// IO errors (worker thread spawn)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Deadline expired while waiting for the pipeline to go idle
    #[error("timed out waiting for in-flight run to settle")]
    SettleTimeout,

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CoreError>,
    },
}

impl CoreError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CoreError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

/// Failure of one feature computation run.
///
/// Produced by compute closures, routed to the output sink on the Failed
/// transition. [`ComputeError::Cancelled`] is special: a closure returns it
/// after observing staleness, and the scheduler accounts the run as
/// superseded instead of failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    /// Inputs that cannot be combined (size/channel mismatch and similar)
    #[error("incompatible inputs: {0}")]
    Incompatible(String),

    /// Failure reported by the native image library
    #[error("image library error: {0}")]
    Library(String),

    /// Any other feature-side failure
    #[error("{0}")]
    Message(String),

    /// Cooperative bail-out of a stale run
    #[error("run cancelled: superseded by a newer generation")]
    Cancelled,
}

impl ComputeError {
    pub fn msg(message: impl Into<String>) -> Self {
        ComputeError::Message(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::NotReady {
            name: "Kernel Size".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "parameter 'Kernel Size' has no readable value (unset or disabled)"
        );
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = CoreError::TypeMismatch {
            name: "Radius".to_string(),
            expected: ParamKind::Number,
            got: ParamKind::Toggle,
        };
        assert_eq!(
            err.to_string(),
            "parameter 'Radius' expects a number, got a toggle"
        );
    }

    #[test]
    fn test_error_with_context() {
        let err = CoreError::UnownedRelease(BufferId(3));
        let with_ctx = err.with_context("transferring result");
        assert!(with_ctx.to_string().contains("transferring result"));
    }

    #[test]
    fn test_result_ext_context() {
        let res: Result<()> = Err(CoreError::SettleTimeout);
        let with_ctx = res.context("final flush");
        assert!(with_ctx.unwrap_err().to_string().contains("final flush"));
    }

    #[test]
    fn test_compute_error_msg() {
        let err = ComputeError::msg("blur kernel must be odd");
        assert_eq!(err.to_string(), "blur kernel must be odd");
        assert_ne!(err, ComputeError::Cancelled);
    }
}
