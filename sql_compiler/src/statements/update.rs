use query_model::{QueryModel, QueryTable};

use super::{build_returning_clause, build_where_with_using, using_sources, writable_columns};
use crate::context::CompileContext;
use crate::references::table_source;

/// `UPDATE <anchor> SET ...`; Using rows are lowered to `FROM`
pub fn build_update(ctx: &mut CompileContext<'_>, query: &QueryModel, anchor: &QueryTable) -> String {
    let mut lines = vec![format!("UPDATE {}", table_source(ctx, anchor))];

    let assignments: Vec<String> = writable_columns(query, anchor)
        .into_iter()
        .map(|column| {
            let value = column
                .column_values
                .first()
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .unwrap_or("NULL");
            format!("{} = {}", ctx.quote(&column.column_name_original), value)
        })
        .collect();
    if !assignments.is_empty() {
        lines.push(format!("SET {}", assignments.join(", ")));
    }

    let sources = using_sources(ctx, query);
    if !sources.is_empty() {
        lines.push(format!("FROM {}", sources.join(", ")));
    }

    lines.extend(build_where_with_using(ctx, query));
    lines.extend(build_returning_clause(ctx, query));
    lines.join("\n")
}
