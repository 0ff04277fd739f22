//! Set-operation composer
//!
//! Appends every UNION/INTERSECT/EXCEPT member to the anchor query and
//! gathers the ORDER BY items the members contribute to the unified ORDER BY.

use diagnostics::DiagnosticKind;
use query_model::QueryModel;

use crate::compiler::compile_nested;
use crate::context::CompileContext;
use crate::statements::Nesting;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetTail {
    /// `\nUNION\n<member>` fragments, in set-operation order
    pub sql: String,
    pub order_items: Vec<String>,
}

pub fn build_set_tail(ctx: &mut CompileContext<'_>, query: &QueryModel) -> SetTail {
    let mut tail = SetTail::default();

    for operation in &query.set_operations {
        let Some(member) = ctx.find_by_id(operation.query_id) else {
            ctx.warn(
                DiagnosticKind::MissingQuery,
                format!(
                    "{} member query {} does not exist",
                    operation.operator.to_sql(),
                    operation.query_id
                ),
            );
            continue;
        };

        let Some(compiled) = compile_nested(ctx, member, Nesting::SetMember) else {
            continue;
        };

        trace_log!(query_id = query.id, member = member.id, operator = operation.operator.to_sql(), "set member");
        tail.sql.push('\n');
        tail.sql.push_str(operation.operator.to_sql());
        tail.sql.push('\n');
        tail.sql.push_str(&compiled.sql);
        tail.order_items.extend(compiled.order_items);
    }

    tail
}
