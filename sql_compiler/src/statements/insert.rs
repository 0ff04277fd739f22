use diagnostics::DiagnosticKind;
use query_model::{QueryColumn, QueryModel, QueryTable};

use super::{build_returning_clause, writable_columns, Nesting};
use crate::compiler::compile_nested;
use crate::context::CompileContext;
use crate::references::table_source;

/// Literal of one VALUES cell; blank cells become NULL
fn value_cell(column: &QueryColumn, row: usize) -> String {
    column
        .column_values
        .get(row)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "NULL".to_string())
}

/// `VALUES (..),\n(..)` with as many rows as the longest value list, at least one
fn build_values(columns: &[&QueryColumn]) -> String {
    let row_count = columns
        .iter()
        .map(|column| column.column_values.len())
        .max()
        .unwrap_or(0)
        .max(1);

    let rows: Vec<String> = (0..row_count)
        .map(|row| {
            let cells: Vec<String> = columns.iter().map(|column| value_cell(column, row)).collect();
            format!("({})", cells.join(", "))
        })
        .collect();

    format!("VALUES {}", rows.join(",\n"))
}

/// Compiled INSERT source query with any terminator stripped
fn source_query(ctx: &mut CompileContext<'_>, query: &QueryModel) -> Option<String> {
    let source_id = query.from_query?;
    let Some(source) = ctx.find_by_id(source_id) else {
        ctx.warn(
            DiagnosticKind::MissingQuery,
            format!("INSERT source query {} does not exist, using VALUES", source_id),
        );
        return None;
    };

    let compiled = compile_nested(ctx, source, Nesting::Subquery)?;
    Some(compiled.sql.trim_end().trim_end_matches(';').to_string())
}

pub fn build_insert(ctx: &mut CompileContext<'_>, query: &QueryModel, anchor: &QueryTable) -> String {
    let columns = writable_columns(query, anchor);
    let target = table_source(ctx, anchor);

    let mut lines = Vec::new();
    if columns.is_empty() {
        lines.push(format!("INSERT INTO {}", target));
    } else {
        let names: Vec<String> = columns
            .iter()
            .map(|column| ctx.quote(&column.column_name_original))
            .collect();
        lines.push(format!("INSERT INTO {} ({})", target, names.join(", ")));
    }

    match source_query(ctx, query) {
        Some(source) => lines.push(source),
        None if columns.is_empty() => lines.push("DEFAULT VALUES".to_string()),
        None => lines.push(build_values(&columns)),
    }

    lines.extend(build_returning_clause(ctx, query));
    lines.join("\n")
}
