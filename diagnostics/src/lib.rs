//! Diagnostics channel for the query compiler
//!
//! Compilation never aborts on malformed-but-parseable input. Problems are
//! raised as [`Diagnostic`] events instead and delivered out of band to
//! registered callbacks.

pub mod event;
pub mod manager;
pub mod prelude;
pub mod types;

pub use event::{Diagnostic, DiagnosticKind};
pub use manager::{DiagnosticManager, DiagnosticStats};
pub use types::{CallbackId, DiagnosticCallback, DiagnosticsError};
