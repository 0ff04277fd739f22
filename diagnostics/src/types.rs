//! Callback and error types for the diagnostics channel

use crate::event::Diagnostic;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Diagnostic callback type
pub type DiagnosticCallback = Arc<dyn Fn(&Diagnostic) + Send + Sync>;

/// Handle returned when a callback is registered, used to remove it again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(Uuid);

impl CallbackId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CallbackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Callback registration errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticsError {
    TooManyCallbacks { max_callbacks: usize },
    CallbackNotFound(CallbackId),
}

impl fmt::Display for DiagnosticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticsError::TooManyCallbacks { max_callbacks } => {
                write!(f, "Callback limit reached (max {})", max_callbacks)
            }
            DiagnosticsError::CallbackNotFound(id) => write!(f, "Callback not found: {}", id),
        }
    }
}

impl std::error::Error for DiagnosticsError {}
