//! Per-compilation state
//!
//! Holds the immutable sibling snapshot and keyword set, the stack of
//! queries currently being resolved (cycle guard) and the diagnostics raised
//! so far. One context lives for exactly one top-level compilation.

use config::CompilerConfig;
use diagnostics::{Diagnostic, DiagnosticKind};
use query_model::{QueryId, QueryModel};

use crate::quoting::{quote, ReservedKeywordSet};

pub struct CompileContext<'a> {
    siblings: &'a [QueryModel],
    keywords: &'a ReservedKeywordSet,
    config: &'a CompilerConfig,
    resolving: Vec<QueryId>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> CompileContext<'a> {
    pub fn new(
        siblings: &'a [QueryModel],
        keywords: &'a ReservedKeywordSet,
        config: &'a CompilerConfig,
    ) -> Self {
        Self {
            siblings,
            keywords,
            config,
            resolving: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn siblings(&self) -> &'a [QueryModel] {
        self.siblings
    }

    pub fn keywords(&self) -> &'a ReservedKeywordSet {
        self.keywords
    }

    pub fn config(&self) -> &'a CompilerConfig {
        self.config
    }

    pub fn find_by_id(&self, id: QueryId) -> Option<&'a QueryModel> {
        self.siblings.iter().find(|query| query.id == id)
    }

    /// Case-insensitive lookup on the display name
    pub fn find_by_name(&self, name: &str) -> Option<&'a QueryModel> {
        let name = name.trim();
        self.siblings
            .iter()
            .find(|query| query.name.trim().eq_ignore_ascii_case(name))
    }

    pub fn quote(&self, identifier: &str) -> String {
        quote(identifier, self.keywords)
    }

    pub fn is_resolving(&self, id: QueryId) -> bool {
        self.resolving.contains(&id)
    }

    pub(crate) fn enter(&mut self, id: QueryId) {
        self.resolving.push(id);
    }

    pub(crate) fn leave(&mut self, id: QueryId) {
        if let Some(position) = self.resolving.iter().rposition(|resolving| *resolving == id) {
            self.resolving.remove(position);
        }
    }

    /// Query currently being compiled, 0 outside of any statement
    pub fn current_query(&self) -> QueryId {
        self.resolving.last().copied().unwrap_or_default()
    }

    /// Human readable chain of the queries being resolved, e.g. `1 -> 2`
    pub fn resolving_chain(&self) -> String {
        self.resolving
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Record a non-fatal problem; identical diagnostics are kept once
    pub fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(kind, self.current_query(), message);
        if self.diagnostics.contains(&diagnostic) {
            return;
        }

        tracing::debug!(kind = %diagnostic.kind, query_id = diagnostic.query_id, "{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
