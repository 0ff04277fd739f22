use query_model::{QueryColumn, QueryModel};

use super::fields::function_expression;
use crate::context::CompileContext;

/// Expression a column is grouped by: its alias when it is part of the
/// SELECT list, otherwise the function-wrapped reference
fn group_expression(
    ctx: &mut CompileContext<'_>,
    query: &QueryModel,
    column: &QueryColumn,
) -> Option<String> {
    if column.display_in_query {
        if let Some(alias) = column.alias() {
            return Some(ctx.quote(alias));
        }
        if column.subquery_id.is_some() {
            return None;
        }
    }
    Some(function_expression(ctx, query, column))
}

/// GROUP BY entries in column order.
///
/// Inference kicks in when any displayed column is aggregated: every other
/// displayed column is grouped. Columns flagged `group_by` are grouped even
/// when hidden. Aggregated columns are never grouped.
pub fn group_by_entries(ctx: &mut CompileContext<'_>, query: &QueryModel) -> Vec<String> {
    let inferred = query.has_aggregates();
    let mut entries: Vec<String> = Vec::new();

    for column in &query.columns {
        if column.has_aggregate() {
            continue;
        }
        let wanted = column.column_group_by || (inferred && column.display_in_query);
        if !wanted {
            continue;
        }

        if let Some(expression) = group_expression(ctx, query, column) {
            if !entries.contains(&expression) {
                entries.push(expression);
            }
        }
    }

    trace_log!(query_id = query.id, entries = entries.len(), "group by entries");
    entries
}

/// `GROUP BY a, b` or nothing
pub fn build_group_by_clause(ctx: &mut CompileContext<'_>, query: &QueryModel) -> Option<String> {
    let entries = group_by_entries(ctx, query);
    if entries.is_empty() {
        None
    } else {
        Some(format!("GROUP BY {}", entries.join(", ")))
    }
}
