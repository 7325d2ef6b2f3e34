//! Runtime configuration for the core.
//!
//! The embedding application constructs a [`CoreConfig`] once and hands it to
//! the scheduler. The locale lives here as a plain value; label resolution
//! receives it explicitly instead of consulting any process-wide state.

use serde::{Deserialize, Serialize};

use crate::labels::Locale;

/// Default name of the spawned compute worker thread
pub const DEFAULT_WORKER_THREAD_NAME: &str = "liveproc-worker";

/// Default bound of the command channel (scheduler to worker)
pub const DEFAULT_COMMAND_CAPACITY: usize = 4;

/// Default bound of the outcome channel (worker to scheduler)
pub const DEFAULT_OUTCOME_CAPACITY: usize = 16;

/// Core runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Display language threaded into label resolution
    pub locale: Locale,
    /// Name given to the compute worker thread
    pub worker_thread_name: String,
    /// Capacity of the scheduler-to-worker command channel
    pub command_capacity: usize,
    /// Capacity of the worker-to-scheduler outcome channel
    pub outcome_capacity: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            worker_thread_name: DEFAULT_WORKER_THREAD_NAME.to_string(),
            command_capacity: DEFAULT_COMMAND_CAPACITY,
            outcome_capacity: DEFAULT_OUTCOME_CAPACITY,
        }
    }
}

impl CoreConfig {
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_worker_thread_name(mut self, name: impl Into<String>) -> Self {
        self.worker_thread_name = name.into();
        self
    }
}
