use query_model::{QueryModel, QueryTable};

use super::{build_returning_clause, build_where_with_using, using_sources};
use crate::context::CompileContext;
use crate::references::table_source;

pub fn build_delete(ctx: &mut CompileContext<'_>, query: &QueryModel, anchor: &QueryTable) -> String {
    let mut lines = vec![format!("DELETE FROM {}", table_source(ctx, anchor))];

    let sources = using_sources(ctx, query);
    if !sources.is_empty() {
        lines.push(format!("USING {}", sources.join(", ")));
    }

    lines.extend(build_where_with_using(ctx, query));
    lines.extend(build_returning_clause(ctx, query));
    lines.join("\n")
}
