use crate::event::Diagnostic;
use crate::types::{CallbackId, DiagnosticCallback, DiagnosticsError};
use config::DiagnosticsConfig;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Snapshot of the manager counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticStats {
    pub emitted: u64,
    pub callback_count: usize,
}

/// Callback registry for compiler diagnostics
pub struct DiagnosticManager {
    config: DiagnosticsConfig,
    callbacks: RwLock<Vec<(CallbackId, DiagnosticCallback)>>,
    emitted: AtomicU64,
}

impl std::fmt::Debug for DiagnosticManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticManager")
            .field("config", &self.config)
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

impl DiagnosticManager {
    pub fn new(config: DiagnosticsConfig) -> Self {
        Self {
            config,
            callbacks: RwLock::new(Vec::new()),
            emitted: AtomicU64::new(0),
        }
    }

    /// Add diagnostic callback
    pub fn add_callback<F>(&self, callback: F) -> Result<CallbackId, DiagnosticsError>
    where
        F: Fn(&Diagnostic) + Send + Sync + 'static,
    {
        let mut callbacks = self
            .callbacks
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if callbacks.len() >= self.config.max_callbacks {
            return Err(DiagnosticsError::TooManyCallbacks {
                max_callbacks: self.config.max_callbacks,
            });
        }

        let id = CallbackId::new();
        callbacks.push((id, Arc::new(callback)));
        Ok(id)
    }

    /// Remove a previously registered callback
    pub fn remove_callback(&self, id: CallbackId) -> Result<(), DiagnosticsError> {
        let mut callbacks = self
            .callbacks
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let before = callbacks.len();
        callbacks.retain(|(callback_id, _)| *callback_id != id);
        if callbacks.len() == before {
            return Err(DiagnosticsError::CallbackNotFound(id));
        }
        Ok(())
    }

    /// Emit diagnostic to all subscribers
    pub fn emit(&self, diagnostic: &Diagnostic) {
        self.emitted.fetch_add(1, Ordering::Relaxed);

        if self.config.log_warnings {
            tracing::warn!(
                kind = %diagnostic.kind,
                query_id = diagnostic.query_id,
                "{}",
                diagnostic.message
            );
        }

        // Clone the handles so callbacks may register or remove callbacks themselves
        let callbacks: Vec<DiagnosticCallback> = match self.callbacks.read() {
            Ok(callbacks) => callbacks.iter().map(|(_, cb)| Arc::clone(cb)).collect(),
            Err(poisoned) => poisoned
                .into_inner()
                .iter()
                .map(|(_, cb)| Arc::clone(cb))
                .collect(),
        };

        for callback in callbacks {
            callback(diagnostic);
        }
    }

    pub fn emit_all(&self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
    }

    /// Clear all callbacks
    pub fn clear_callbacks(&self) {
        if let Ok(mut callbacks) = self.callbacks.write() {
            callbacks.clear();
        }
    }

    /// Get number of registered callbacks
    pub fn callback_count(&self) -> usize {
        self.callbacks.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn stats(&self) -> DiagnosticStats {
        DiagnosticStats {
            emitted: self.emitted.load(Ordering::Relaxed),
            callback_count: self.callback_count(),
        }
    }
}

impl Default for DiagnosticManager {
    fn default() -> Self {
        Self::new(DiagnosticsConfig::default())
    }
}
