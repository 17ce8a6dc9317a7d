// Typed errors with thiserror. Surface meaningful messages to JS.
// Per-frame processing is infallible; only commands and configuration can fail.

use thiserror::Error;

use crate::types::{ActiveTask, SearchMode};

/// Engine error types.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid search for {mode:?}: {message}")]
    InvalidSearch { mode: SearchMode, message: String },

    #[error("No known item in utterance: {0:?}")]
    UnknownItem(String),

    #[error("Operation requires task {expected:?}, current task is {actual:?}")]
    TaskMismatch {
        expected: ActiveTask,
        actual: ActiveTask,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}
