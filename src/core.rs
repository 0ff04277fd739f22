//! Core QueryCraft functionality
//!
//! This module contains the `QueryCompiler` coordinator: it owns the
//! configuration, the dialect keyword set and the diagnostics channel, and
//! runs the SQL compiler over consistent snapshots of the query tabs.

use config::AppConfig;
use diagnostics::{CallbackId, Diagnostic, DiagnosticManager};
use query_model::{QueryId, QueryModel, QuerySnapshot};
use sql_compiler::{compile_with, CompileError, CompiledQuery, ReservedKeywordSet};

use crate::errors::QueryCraftError;

/// Main QueryCraft coordinator
#[derive(Debug)]
pub struct QueryCompiler {
    config: AppConfig,
    keywords: ReservedKeywordSet,
    diagnostics: DiagnosticManager,
}

impl QueryCompiler {
    /// Create a compiler from validated configuration
    pub fn new(config: AppConfig) -> Result<Self, QueryCraftError> {
        config.validate()?;

        let mut keywords = if config.dialect.use_builtin_keywords {
            ReservedKeywordSet::postgres()
        } else {
            ReservedKeywordSet::empty()
        };
        keywords.extend(config.dialect.extra_reserved_keywords.iter());
        keywords.extend(config.dialect.file_keywords()?);

        debug_log!(keywords = keywords.len(), "query compiler created");

        Ok(Self {
            diagnostics: DiagnosticManager::new(config.diagnostics.clone()),
            keywords,
            config,
        })
    }

    /// Create a compiler from `.env`, `QUERYCRAFT_CONFIG` or `./querycraft.toml`
    pub fn from_env() -> Result<Self, QueryCraftError> {
        Self::new(AppConfig::load()?)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn keywords(&self) -> &ReservedKeywordSet {
        &self.keywords
    }

    pub fn diagnostics(&self) -> &DiagnosticManager {
        &self.diagnostics
    }

    /// Register a callback receiving every diagnostic raised from now on
    pub fn add_diagnostic_callback<F>(&self, callback: F) -> Result<CallbackId, QueryCraftError>
    where
        F: Fn(&Diagnostic) + Send + Sync + 'static,
    {
        Ok(self.diagnostics.add_callback(callback)?)
    }

    pub fn remove_diagnostic_callback(&self, id: CallbackId) -> Result<(), QueryCraftError> {
        Ok(self.diagnostics.remove_callback(id)?)
    }

    /// Compile query `active` from the sibling collection
    pub fn compile(
        &self,
        active: QueryId,
        queries: &[QueryModel],
    ) -> Result<CompiledQuery, QueryCraftError> {
        let query = queries
            .iter()
            .find(|query| query.id == active)
            .ok_or(CompileError::UnknownQuery(active))?;

        debug_log!(query_id = active, siblings = queries.len(), "compiling query");

        let compiled = compile_with(query, queries, &self.keywords, &self.config.compiler)?;
        self.diagnostics.emit_all(&compiled.diagnostics);
        Ok(compiled)
    }

    /// Compile the active query of a snapshot
    pub fn compile_snapshot(
        &self,
        snapshot: &QuerySnapshot,
    ) -> Result<CompiledQuery, QueryCraftError> {
        self.compile(snapshot.active, &snapshot.queries)
    }

    /// Decode a JSON snapshot sent by the editor and compile its active query
    pub fn compile_json(&self, json: &str) -> Result<CompiledQuery, QueryCraftError> {
        let snapshot = QuerySnapshot::from_json(json)?;
        self.compile_snapshot(&snapshot)
    }
}
