//! Convenience re-exports for common diagnostics usage

pub use crate::event::{Diagnostic, DiagnosticKind};
pub use crate::manager::{DiagnosticManager, DiagnosticStats};
pub use crate::types::{CallbackId, DiagnosticCallback, DiagnosticsError};
