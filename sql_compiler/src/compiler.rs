//! Compile entry points

use config::CompilerConfig;
use diagnostics::{Diagnostic, DiagnosticKind};
use query_model::QueryModel;
use serde::Serialize;

use crate::context::CompileContext;
use crate::errors::CompileError;
use crate::quoting::ReservedKeywordSet;
use crate::statements::{compile_statement, Compiled, Nesting};

/// SQL text plus every non-fatal problem met while producing it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub sql: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompiledQuery {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Compile `query` with the default compiler settings
pub fn compile(
    query: &QueryModel,
    siblings: &[QueryModel],
    keywords: &ReservedKeywordSet,
) -> Result<CompiledQuery, CompileError> {
    compile_with(query, siblings, keywords, &CompilerConfig::default())
}

/// Compile `query` against an immutable sibling snapshot.
///
/// Only a missing anchor table is fatal; everything else is reported in
/// [`CompiledQuery::diagnostics`].
pub fn compile_with(
    query: &QueryModel,
    siblings: &[QueryModel],
    keywords: &ReservedKeywordSet,
    config: &CompilerConfig,
) -> Result<CompiledQuery, CompileError> {
    let mut ctx = CompileContext::new(siblings, keywords, config);
    let compiled = compile_statement(&mut ctx, query, Nesting::Statement)?;

    let mut sql = compiled.sql;
    if config.terminate_statements {
        sql.push(';');
    }

    Ok(CompiledQuery {
        sql,
        diagnostics: ctx.into_diagnostics(),
    })
}

/// Compile a sibling inlined into the current statement.
///
/// Returns `None` after raising a diagnostic when the sibling is already
/// being resolved or cannot be nested.
pub(crate) fn compile_nested(
    ctx: &mut CompileContext<'_>,
    query: &QueryModel,
    nesting: Nesting,
) -> Option<Compiled> {
    if ctx.is_resolving(query.id) {
        let chain = ctx.resolving_chain();
        ctx.warn(
            DiagnosticKind::CyclicReference,
            format!(
                "query '{}' is referenced cyclically: {} -> {}",
                query.name, chain, query.id
            ),
        );
        return None;
    }

    match compile_statement(ctx, query, nesting) {
        Ok(compiled) => Some(compiled),
        Err(err) => {
            ctx.warn(
                DiagnosticKind::InvalidSubquery,
                format!("query '{}' cannot be inlined: {}", query.name, err),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use query_model::{QueryColumn, QueryType};

    fn cities() -> QueryModel {
        QueryModel::new(1, "Cities", QueryType::Select)
            .with_table("public", "city")
            .with_column(QueryColumn::new(1, "name").with_filter("= 'X'"))
            .unwrap()
    }

    #[test]
    fn test_terminator_is_configurable() {
        let keywords = ReservedKeywordSet::postgres();
        let compiled = compile(&cities(), &[], &keywords).unwrap();
        assert_eq!(compiled.sql, "SELECT city.name\nFROM public.city\nWHERE city.name = 'X';");
        assert!(!compiled.has_diagnostics());

        let config = CompilerConfig::new(2, false);
        let compiled = compile_with(&cities(), &[], &keywords, &config).unwrap();
        assert!(!compiled.sql.ends_with(';'));
    }

    #[test]
    fn test_missing_anchor_is_an_error() {
        let query = QueryModel::new(5, "Empty", QueryType::Select);
        assert_eq!(
            compile(&query, &[], &ReservedKeywordSet::postgres()),
            Err(CompileError::MissingAnchorTable(5))
        );
    }

    #[test]
    fn test_nested_delete_is_reported() {
        let purge = QueryModel::new(2, "Purge", QueryType::Delete).with_table("public", "city");
        let query = QueryModel::new(1, "Cities", QueryType::Select)
            .with_table("public", "city")
            .with_column(QueryColumn::new(1, "id").with_filter("IN {Purge}"))
            .unwrap();

        let compiled = compile(&query, &[purge], &ReservedKeywordSet::postgres()).unwrap();
        assert!(compiled.sql.contains("city.id IN {Purge}"));
        assert_eq!(compiled.diagnostics[0].kind, DiagnosticKind::InvalidSubquery);
    }

    #[test]
    fn test_compiled_query_serializes() {
        let compiled = compile(&cities(), &[], &ReservedKeywordSet::postgres()).unwrap();
        let value = serde_json::to_value(&compiled).unwrap();

        assert_eq!(value["sql"], compiled.sql);
        assert!(value["diagnostics"].as_array().unwrap().is_empty());
    }
}
