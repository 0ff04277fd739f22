//! Statement builders
//!
//! Sequence the clause builders, join resolver and set-operation composer
//! into complete SELECT/INSERT/UPDATE/DELETE text.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

use query_model::{QueryColumn, QueryModel, QueryTable, QueryType, TableId};

use crate::clauses::filter::{build_filter_condition, using_conditions, FilterTarget};
use crate::context::CompileContext;
use crate::errors::CompileError;
use crate::references::{column_reference, lookup_table, table_source};

/// Position a query is compiled in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    /// The statement handed to the compiler
    Statement,
    /// Inlined into another statement: `{Name}` reference, column link or
    /// INSERT source
    Subquery,
    /// Right-hand operand of a set operation; no ORDER BY or FETCH of its own
    SetMember,
}

/// Statement text plus the ORDER BY items it hands to an enclosing set chain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compiled {
    pub sql: String,
    pub order_items: Vec<String>,
}

impl Compiled {
    fn statement(sql: String) -> Self {
        Self {
            sql,
            order_items: Vec::new(),
        }
    }
}

/// Compile one query in the given position, without terminator
pub fn compile_statement(
    ctx: &mut CompileContext<'_>,
    query: &QueryModel,
    nesting: Nesting,
) -> Result<Compiled, CompileError> {
    let anchor = query
        .anchor_table()
        .ok_or(CompileError::MissingAnchorTable(query.id))?;

    if nesting != Nesting::Statement && query.query_type != QueryType::Select {
        return Err(CompileError::UnsupportedStatement(query.query_type));
    }

    trace_log!(query_id = query.id, query_type = query.query_type.to_sql(), nesting = ?nesting, "compiling statement");

    ctx.enter(query.id);
    let compiled = match query.query_type {
        QueryType::Select => select::build_select(ctx, query, anchor, nesting),
        QueryType::Insert => Compiled::statement(insert::build_insert(ctx, query, anchor)),
        QueryType::Update => Compiled::statement(update::build_update(ctx, query, anchor)),
        QueryType::Delete => Compiled::statement(delete::build_delete(ctx, query, anchor)),
    };
    ctx.leave(query.id);

    Ok(compiled)
}

/// Anchor-table columns written by INSERT and UPDATE
pub(crate) fn writable_columns<'q>(
    query: &'q QueryModel,
    anchor: &QueryTable,
) -> Vec<&'q QueryColumn> {
    query
        .columns_of(anchor.id)
        .filter(|column| column.display_in_query && !column.is_returning_only())
        .collect()
}

/// Sources of the Using rows, each table once
pub(crate) fn using_sources(ctx: &mut CompileContext<'_>, query: &QueryModel) -> Vec<String> {
    let mut seen: Vec<TableId> = Vec::new();
    let mut sources = Vec::new();
    for using in &query.using {
        if seen.contains(&using.main_table) {
            continue;
        }
        seen.push(using.main_table);
        if let Some(table) = lookup_table(ctx, query, using.main_table) {
            sources.push(table_source(ctx, table));
        }
    }
    sources
}

/// `WHERE <using conditions> AND <filters>` shared by UPDATE and DELETE
pub(crate) fn build_where_with_using(
    ctx: &mut CompileContext<'_>,
    query: &QueryModel,
) -> Option<String> {
    let mut conditions = using_conditions(ctx, query);
    if let Some(filter) = build_filter_condition(ctx, query, FilterTarget::Where) {
        conditions.push(filter);
    }

    if conditions.is_empty() {
        None
    } else {
        Some(format!("WHERE {}", conditions.join(" AND ")))
    }
}

/// `RETURNING` flagged columns, `*` when none is flagged
pub(crate) fn build_returning_clause(
    ctx: &mut CompileContext<'_>,
    query: &QueryModel,
) -> Option<String> {
    if !query.returning {
        return None;
    }

    let columns: Vec<String> = query
        .columns
        .iter()
        .filter(|column| column.returning)
        .map(|column| {
            let reference = column_reference(ctx, query, column);
            match column.alias() {
                Some(alias) => format!("{} AS {}", reference, ctx.quote(alias)),
                None => reference,
            }
        })
        .collect();

    if columns.is_empty() {
        Some("RETURNING *".to_string())
    } else {
        Some(format!("RETURNING {}", columns.join(", ")))
    }
}
