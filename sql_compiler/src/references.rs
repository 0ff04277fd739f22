//! Rendering of table sources, qualified column references and join predicates

use diagnostics::DiagnosticKind;
use query_model::{JoinCondition, QueryColumn, QueryModel, QueryTable, TableId};

use crate::context::CompileContext;

/// Name used to qualify columns: the alias if present, otherwise the table name
pub fn table_qualifier(ctx: &CompileContext<'_>, table: &QueryTable) -> String {
    ctx.quote(table.table_ref())
}

/// `schema.name [AS alias]` as it appears after FROM/JOIN/USING
pub fn table_source(ctx: &CompileContext<'_>, table: &QueryTable) -> String {
    let name = if table.schema.is_empty() {
        ctx.quote(&table.name)
    } else {
        format!("{}.{}", ctx.quote(&table.schema), ctx.quote(&table.name))
    };

    match table.alias() {
        Some(alias) => format!("{} AS {}", name, ctx.quote(alias)),
        None => name,
    }
}

/// Look up a table, raising an `UnknownTable` diagnostic when it is missing
pub fn lookup_table<'q>(
    ctx: &mut CompileContext<'_>,
    query: &'q QueryModel,
    table_id: TableId,
) -> Option<&'q QueryTable> {
    let table = query.table(table_id);
    if table.is_none() {
        ctx.warn(
            DiagnosticKind::UnknownTable,
            format!("query '{}' references unknown table id {}", query.name, table_id),
        );
    }
    table
}

/// `qualifier.column` for a column of a given table
pub fn qualified_name(
    ctx: &mut CompileContext<'_>,
    query: &QueryModel,
    table_id: TableId,
    column_name: &str,
) -> String {
    match lookup_table(ctx, query, table_id) {
        Some(table) => format!("{}.{}", table_qualifier(ctx, table), ctx.quote(column_name)),
        None => ctx.quote(column_name),
    }
}

/// Plain reference to a column: the raw expression verbatim when the user
/// edited the name, otherwise the qualified column name
pub fn column_reference(
    ctx: &mut CompileContext<'_>,
    query: &QueryModel,
    column: &QueryColumn,
) -> String {
    if column.is_raw_expression() {
        return column.column_name.clone();
    }
    qualified_name(ctx, query, column.table_id, &column.column_name)
}

/// `main.column = secondary.column`
pub fn join_condition_sql(
    ctx: &mut CompileContext<'_>,
    query: &QueryModel,
    condition: &JoinCondition,
) -> String {
    let main = qualified_name(ctx, query, condition.main_table, &condition.main_column);
    let secondary = qualified_name(
        ctx,
        query,
        condition.secondary_table,
        &condition.secondary_column,
    );
    format!("{} = {}", main, secondary)
}
