use query_model::{QueryModel, QueryTable};

use super::{Compiled, Nesting};
use crate::clauses::fields::build_field_list;
use crate::clauses::filter::{build_filter_clause, FilterTarget};
use crate::clauses::grouping::build_group_by_clause;
use crate::clauses::ordering::{build_order_clause, order_items, set_order_items};
use crate::context::CompileContext;
use crate::join::build_from_clause;
use crate::set_operation::build_set_tail;

/// `FETCH FIRST n ROWS ONLY` / `FETCH FIRST n ROWS WITH TIES`
fn build_fetch_clause(query: &QueryModel) -> Option<String> {
    let limit = query.limit?;
    if query.with_ties {
        Some(format!("FETCH FIRST {} ROWS WITH TIES", limit))
    } else {
        Some(format!("FETCH FIRST {} ROWS ONLY", limit))
    }
}

pub fn build_select(
    ctx: &mut CompileContext<'_>,
    query: &QueryModel,
    anchor: &QueryTable,
    nesting: Nesting,
) -> Compiled {
    let in_set_chain = query.has_set_operations() || nesting == Nesting::SetMember;
    let mut lines = Vec::new();

    let fields = build_field_list(ctx, query);
    if query.distinct {
        lines.push(format!("SELECT DISTINCT {}", fields));
    } else {
        lines.push(format!("SELECT {}", fields));
    }

    lines.push(build_from_clause(ctx, query, anchor));
    lines.extend(build_filter_clause(ctx, query, FilterTarget::Where));
    lines.extend(build_group_by_clause(ctx, query));
    lines.extend(build_filter_clause(ctx, query, FilterTarget::Having));

    let mut chain_order = Vec::new();
    if in_set_chain {
        chain_order = set_order_items(ctx, query);
    } else {
        let items = order_items(ctx, query);
        lines.extend(build_order_clause(&items));
    }

    let mut sql = lines.join("\n");

    if query.has_set_operations() {
        let tail = build_set_tail(ctx, query);
        sql.push_str(&tail.sql);
        for item in tail.order_items {
            if !chain_order.contains(&item) {
                chain_order.push(item);
            }
        }
    }

    if nesting == Nesting::SetMember {
        return Compiled {
            sql,
            order_items: chain_order,
        };
    }

    if let Some(order) = build_order_clause(&chain_order) {
        sql.push('\n');
        sql.push_str(&order);
    }
    if let Some(fetch) = build_fetch_clause(query) {
        sql.push('\n');
        sql.push_str(&fetch);
    }

    Compiled {
        sql,
        order_items: Vec::new(),
    }
}
