//! WHERE/HAVING assembly from positional filter rows

use query_model::{QueryColumn, QueryModel};

use super::fields::function_expression;
use crate::condition::compose_filter;
use crate::context::CompileContext;
use crate::references::{column_reference, join_condition_sql};

/// Clause a column's filters route to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTarget {
    Where,
    Having,
}

impl FilterTarget {
    pub fn of(column: &QueryColumn) -> Self {
        if column.has_aggregate() {
            FilterTarget::Having
        } else {
            FilterTarget::Where
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            FilterTarget::Where => "WHERE",
            FilterTarget::Having => "HAVING",
        }
    }
}

fn wrap_if_many(parts: Vec<String>, operator: &str) -> Option<String> {
    match parts.len() {
        0 => None,
        1 => parts.into_iter().next(),
        _ => Some(format!("({})", parts.join(operator))),
    }
}

/// Combined filter condition for one target, without the keyword.
///
/// Row `i` ANDs the `i`-th filter cell of every column routed to `target`;
/// rows are ORed. Each level is parenthesized only when it joins more than
/// one part, and blank cells or rows contribute nothing.
pub fn build_filter_condition(
    ctx: &mut CompileContext<'_>,
    query: &QueryModel,
    target: FilterTarget,
) -> Option<String> {
    let columns: Vec<&QueryColumn> = query
        .columns
        .iter()
        .filter(|column| FilterTarget::of(column) == target && !column.column_filters.is_empty())
        .collect();

    let row_count = columns
        .iter()
        .map(|column| column.column_filters.len())
        .max()
        .unwrap_or(0);

    let mut rows = Vec::new();
    for row in 0..row_count {
        let mut conditions = Vec::new();
        for column in &columns {
            let Some(raw) = column.column_filters.get(row) else {
                continue;
            };
            if raw.trim().is_empty() {
                continue;
            }
            let reference = function_expression(ctx, query, column);
            let bare = column_reference(ctx, query, column);
            if let Some(condition) = compose_filter(ctx, raw, &reference, &bare) {
                conditions.push(condition);
            }
        }

        if let Some(row) = wrap_if_many(conditions, " AND ") {
            rows.push(row);
        }
    }

    trace_log!(query_id = query.id, target = target.keyword(), rows = rows.len(), "filter rows");
    wrap_if_many(rows, " OR ")
}

/// `KEYWORD condition` for one target, or nothing
pub fn build_filter_clause(
    ctx: &mut CompileContext<'_>,
    query: &QueryModel,
    target: FilterTarget,
) -> Option<String> {
    build_filter_condition(ctx, query, target)
        .map(|condition| format!("{} {}", target.keyword(), condition))
}

/// Equality predicates of every Using row, in order
pub fn using_conditions(ctx: &mut CompileContext<'_>, query: &QueryModel) -> Vec<String> {
    let mut conditions = Vec::new();
    for using in &query.using {
        for condition in &using.conditions {
            conditions.push(join_condition_sql(ctx, query, condition));
        }
    }
    conditions
}
