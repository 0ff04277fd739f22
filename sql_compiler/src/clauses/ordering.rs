//! ORDER BY rendering for single queries and set-operation chains

use query_model::{QueryColumn, QueryModel};

use super::fields::function_expression;
use crate::context::CompileContext;
use crate::references::column_reference;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Columns flagged for ordering, by explicit rank; unranked columns keep
/// their relative position at the end
pub fn ordered_columns(query: &QueryModel) -> Vec<&QueryColumn> {
    let mut columns: Vec<&QueryColumn> = query
        .columns
        .iter()
        .filter(|column| column.column_order)
        .collect();
    columns.sort_by_key(|column| column.order_rank());
    columns
}

fn with_direction(expression: String, column: &QueryColumn) -> String {
    format!(
        "{} {}",
        expression,
        SortOrder::from_ascending(column.column_order_dir_asc).to_sql()
    )
}

/// Alias usable in ORDER BY; a hidden column's alias is not in the SELECT list
fn visible_alias(column: &QueryColumn) -> Option<&str> {
    column.alias().filter(|_| column.display_in_query)
}

/// ORDER BY items of a standalone query
pub fn order_items(ctx: &mut CompileContext<'_>, query: &QueryModel) -> Vec<String> {
    ordered_columns(query)
        .into_iter()
        .map(|column| {
            let expression = match visible_alias(column) {
                Some(alias) => ctx.quote(alias),
                None => function_expression(ctx, query, column),
            };
            with_direction(expression, column)
        })
        .collect()
}

/// ORDER BY items a query contributes to a set-operation chain
pub fn set_order_items(ctx: &mut CompileContext<'_>, query: &QueryModel) -> Vec<String> {
    ordered_columns(query)
        .into_iter()
        .map(|column| {
            let expression = match visible_alias(column) {
                Some(alias) => ctx.quote(alias),
                None => column_reference(ctx, query, column),
            };
            with_direction(expression, column)
        })
        .collect()
}

/// `ORDER BY a ASC, b DESC` or nothing
pub fn build_order_clause(items: &[String]) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        Some(format!("ORDER BY {}", items.join(", ")))
    }
}
