//! Join resolver
//!
//! Two strategies turn the stored joins into ordered `JOIN ... ON ...` lines:
//! the explicit strategy keeps the join-list order, the graph strategy
//! (joins drawn on the canvas) orders joins so every JOIN target is
//! introduced after a table it is connected to.

use std::collections::HashSet;

use diagnostics::DiagnosticKind;
use query_model::{Join, JoinCondition, JoinType, QueryModel, QueryTable, TableId};

use crate::context::CompileContext;
use crate::references::{join_condition_sql, lookup_table, table_source};

/// Joins of one target table after merging
#[derive(Debug, Clone, PartialEq)]
pub struct MergedJoin {
    pub join_type: JoinType,
    /// Main table followed by the secondary tables, in first-appearance order
    pub tables: Vec<TableId>,
    pub conditions: Vec<JoinCondition>,
}

impl MergedJoin {
    fn from_join(join: &Join) -> Self {
        Self {
            join_type: join.join_type,
            tables: join.tables(),
            conditions: join.conditions.clone(),
        }
    }

    fn absorb(&mut self, join: &Join) {
        for table in join.tables() {
            if !self.tables.contains(&table) {
                self.tables.push(table);
            }
        }
        self.conditions.extend(join.conditions.iter().cloned());
    }
}

/// Join line ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedJoin {
    pub join_type: JoinType,
    pub target: TableId,
    pub conditions: Vec<JoinCondition>,
}

fn sorted_tables(join: &Join) -> Vec<TableId> {
    let mut tables = join.tables();
    tables.sort_unstable();
    tables.dedup();
    tables
}

/// Joins in stored order, merged by the unordered {main, secondary} pair.
/// The anchor side of each join is folded into FROM; a join that touches
/// nothing but the anchor is dropped.
pub fn plan_explicit(query: &QueryModel, anchor: TableId) -> Vec<PlannedJoin> {
    let mut keys: Vec<(TableId, TableId)> = Vec::new();
    let mut merged: Vec<MergedJoin> = Vec::new();

    for join in &query.joins {
        let secondary = join
            .secondary_tables()
            .first()
            .copied()
            .unwrap_or(join.main_table);
        let key = (
            join.main_table.min(secondary),
            join.main_table.max(secondary),
        );

        match keys.iter().position(|existing| *existing == key) {
            Some(position) => merged[position].absorb(join),
            None => {
                keys.push(key);
                merged.push(MergedJoin::from_join(join));
            }
        }
    }

    merged
        .into_iter()
        .filter_map(|join| {
            let target = join.tables.iter().copied().find(|table| *table != anchor)?;
            Some(PlannedJoin {
                join_type: join.join_type,
                target,
                conditions: join.conditions,
            })
        })
        .collect()
}

/// Order graph-drawn joins so each one touches an already introduced table.
///
/// The relaxation runs at most `join_pass_factor × joins` passes; joins it
/// cannot place are appended in stored order with a diagnostic.
pub fn order_graph_joins<'q>(
    ctx: &mut CompileContext<'_>,
    query: &'q QueryModel,
    anchor: TableId,
) -> Vec<&'q Join> {
    let bound = ctx.config().join_pass_factor * query.joins.len();
    let mut introduced: HashSet<TableId> = HashSet::from([anchor]);
    let mut remaining: Vec<&Join> = query.joins.iter().collect();
    let mut ordered: Vec<&Join> = Vec::with_capacity(remaining.len());

    let mut passes = 0;
    while !remaining.is_empty() && passes < bound {
        passes += 1;
        let next = remaining.iter().position(|join| {
            join.tables()
                .iter()
                .any(|table| introduced.contains(table))
        });

        match next {
            Some(position) => {
                let join = remaining.remove(position);
                introduced.extend(join.tables());
                ordered.push(join);
            }
            None => break,
        }
    }

    trace_log!(query_id = query.id, passes, resolved = ordered.len(), "graph join relaxation");

    if !remaining.is_empty() {
        let unresolved: Vec<String> = remaining
            .iter()
            .map(|join| join.main_table.to_string())
            .collect();
        ctx.warn(
            DiagnosticKind::UnresolvedJoinOrder,
            format!(
                "joins on tables [{}] are not connected to the anchor table",
                unresolved.join(", ")
            ),
        );
        ordered.extend(remaining);
    }

    ordered
}

/// Graph strategy: dependency order, merged by participating tables and kind,
/// each group joined on whichever side is not introduced yet
pub fn plan_graph(
    ctx: &mut CompileContext<'_>,
    query: &QueryModel,
    anchor: TableId,
) -> Vec<PlannedJoin> {
    let ordered = order_graph_joins(ctx, query, anchor);

    let mut keys: Vec<(Vec<TableId>, JoinType)> = Vec::new();
    let mut merged: Vec<MergedJoin> = Vec::new();
    for join in ordered {
        let key = (sorted_tables(join), join.join_type);
        match keys.iter().position(|existing| *existing == key) {
            Some(position) => merged[position].absorb(join),
            None => {
                keys.push(key);
                merged.push(MergedJoin::from_join(join));
            }
        }
    }

    let mut introduced: HashSet<TableId> = HashSet::from([anchor]);
    let mut planned = Vec::with_capacity(merged.len());
    for join in merged {
        let Some(target) = join
            .tables
            .iter()
            .copied()
            .find(|table| !introduced.contains(table))
        else {
            ctx.warn(
                DiagnosticKind::AmbiguousJoin,
                format!(
                    "{} between tables {:?} dropped: every table is already joined",
                    join.join_type.to_sql(),
                    join.tables
                ),
            );
            continue;
        };
        introduced.insert(target);

        // Group members still missing must precede the ON that names them.
        let missing: Vec<TableId> = join
            .tables
            .iter()
            .copied()
            .filter(|table| !introduced.contains(table))
            .collect();
        if !missing.is_empty() {
            ctx.warn(
                DiagnosticKind::UnresolvedJoinOrder,
                format!(
                    "tables {:?} are not joined before the {} on table {}, cross joined",
                    missing,
                    join.join_type.to_sql(),
                    target
                ),
            );
            for table in missing {
                introduced.insert(table);
                planned.push(PlannedJoin {
                    join_type: JoinType::Cross,
                    target: table,
                    conditions: Vec::new(),
                });
            }
        }

        planned.push(PlannedJoin {
            join_type: join.join_type,
            target,
            conditions: join.conditions,
        });
    }

    planned
}

/// `KIND source ON a = b AND c = d`
pub fn render_join(
    ctx: &mut CompileContext<'_>,
    query: &QueryModel,
    join: &PlannedJoin,
) -> Option<String> {
    let table = lookup_table(ctx, query, join.target)?;
    let source = table_source(ctx, table);

    if join.join_type == JoinType::Cross {
        return Some(format!("{} {}", join.join_type.to_sql(), source));
    }

    if join.conditions.is_empty() {
        ctx.warn(
            DiagnosticKind::EmptyJoinCondition,
            format!("{} {} has no join condition", join.join_type.to_sql(), source),
        );
        return Some(format!("{} {}", join.join_type.to_sql(), source));
    }

    let conditions: Vec<String> = join
        .conditions
        .iter()
        .map(|condition| join_condition_sql(ctx, query, condition))
        .collect();

    Some(format!(
        "{} {} ON {}",
        join.join_type.to_sql(),
        source,
        conditions.join(" AND ")
    ))
}

/// FROM clause with JOIN lines; tables reached by no join follow as CROSS JOIN
pub fn build_from_clause(
    ctx: &mut CompileContext<'_>,
    query: &QueryModel,
    anchor: &QueryTable,
) -> String {
    let planned = if query.is_drag_and_drop {
        plan_graph(ctx, query, anchor.id)
    } else {
        plan_explicit(query, anchor.id)
    };

    let mut lines = vec![format!("FROM {}", table_source(ctx, anchor))];
    let mut joined: HashSet<TableId> = HashSet::from([anchor.id]);

    for join in &planned {
        if let Some(line) = render_join(ctx, query, join) {
            joined.insert(join.target);
            lines.push(line);
        }
    }

    for table in &query.tables {
        if joined.insert(table.id) {
            lines.push(format!(
                "{} {}",
                JoinType::Cross.to_sql(),
                table_source(ctx, table)
            ));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quoting::ReservedKeywordSet;
    use config::CompilerConfig;
    use query_model::QueryType;

    /// city(1) anchor, country(2), language(3)
    fn base(drag_and_drop: bool) -> QueryModel {
        let mut query = QueryModel::new(1, "q", QueryType::Select)
            .with_table("public", "city")
            .with_table("public", "country")
            .with_table("public", "language");
        query.is_drag_and_drop = drag_and_drop;
        query
    }

    fn with_joins(query: QueryModel, joins: Vec<Join>) -> QueryModel {
        joins
            .into_iter()
            .fold(query, |query, join| query.with_join(join).unwrap())
    }

    fn from_clause(query: &QueryModel) -> (String, Vec<DiagnosticKind>) {
        let keywords = ReservedKeywordSet::postgres();
        let config = CompilerConfig::default();
        let mut ctx = CompileContext::new(&[], &keywords, &config);
        let anchor = query.anchor_table().unwrap();
        let sql = build_from_clause(&mut ctx, query, anchor);
        let kinds = ctx.diagnostics().iter().map(|d| d.kind).collect();
        (sql, kinds)
    }

    #[test]
    fn test_explicit_joins_in_order() {
        let query = with_joins(
            base(false),
            vec![
                Join::new(JoinType::Inner, 2)
                    .with_condition(JoinCondition::new(2, "code", 1, "country_code")),
                Join::new(JoinType::Left, 3)
                    .with_condition(JoinCondition::new(3, "country_code", 2, "code")),
            ],
        );

        let (sql, diagnostics) = from_clause(&query);
        assert_eq!(
            sql,
            "FROM public.city\n\
             JOIN public.country ON country.code = city.country_code\n\
             LEFT JOIN public.language ON language.country_code = country.code"
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_explicit_anchor_join_is_folded() {
        let query = with_joins(
            base(false),
            vec![
                Join::new(JoinType::Inner, 1)
                    .with_condition(JoinCondition::new(1, "country_code", 2, "code")),
                Join::new(JoinType::Inner, 2)
                    .with_condition(JoinCondition::new(2, "code", 1, "country_code")),
            ],
        );

        let (sql, _) = from_clause(&query);
        assert!(!sql.contains("JOIN public.city"));
        assert_eq!(sql.matches("JOIN public.country").count(), 1);
    }

    #[test]
    fn test_explicit_join_from_anchor_keeps_other_table() {
        let query = with_joins(
            base(false),
            vec![Join::new(JoinType::Inner, 1)
                .with_condition(JoinCondition::new(1, "country_code", 2, "code"))],
        );

        let (sql, diagnostics) = from_clause(&query);
        assert_eq!(
            sql,
            "FROM public.city\n\
             JOIN public.country ON city.country_code = country.code\n\
             CROSS JOIN public.language"
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_explicit_pair_merge_takes_first_kind() {
        let query = with_joins(
            base(false),
            vec![
                Join::new(JoinType::Left, 2)
                    .with_condition(JoinCondition::new(2, "code", 1, "country_code")),
                Join::new(JoinType::Inner, 2)
                    .with_condition(JoinCondition::new(2, "capital", 1, "id")),
            ],
        );

        let (sql, _) = from_clause(&query);
        assert_eq!(
            sql,
            "FROM public.city\n\
             LEFT JOIN public.country ON country.code = city.country_code AND country.capital = city.id\n\
             CROSS JOIN public.language"
        );
    }

    #[test]
    fn test_graph_orders_by_dependency() {
        // language -> country is stored before country -> city
        let query = with_joins(
            base(true),
            vec![
                Join::new(JoinType::Inner, 3)
                    .with_condition(JoinCondition::new(3, "country_code", 2, "code")),
                Join::new(JoinType::Inner, 1)
                    .with_condition(JoinCondition::new(1, "country_code", 2, "code")),
            ],
        );

        let (sql, diagnostics) = from_clause(&query);
        assert_eq!(
            sql,
            "FROM public.city\n\
             JOIN public.country ON city.country_code = country.code\n\
             JOIN public.language ON language.country_code = country.code"
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_graph_merges_regardless_of_orientation() {
        let query = with_joins(
            base(true),
            vec![
                Join::new(JoinType::Inner, 1)
                    .with_condition(JoinCondition::new(1, "country_code", 2, "code")),
                Join::new(JoinType::Inner, 2)
                    .with_condition(JoinCondition::new(2, "capital", 1, "id")),
            ],
        );

        let (sql, _) = from_clause(&query);
        assert_eq!(sql.matches("JOIN public.country").count(), 1);
        assert!(sql.contains("ON city.country_code = country.code AND country.capital = city.id"));
    }

    #[test]
    fn test_graph_unresolved_join_is_appended() {
        let query = base(true).with_table("public", "region");
        let query = with_joins(
            query,
            vec![Join::new(JoinType::Inner, 3)
                .with_condition(JoinCondition::new(3, "region_id", 4, "id"))],
        );

        let (sql, diagnostics) = from_clause(&query);
        assert!(sql.contains("JOIN public.language ON language.region_id = region.id"));
        assert!(diagnostics.contains(&DiagnosticKind::UnresolvedJoinOrder));
    }

    #[test]
    fn test_graph_ambiguous_join_is_reported() {
        let query = with_joins(
            base(true),
            vec![
                Join::new(JoinType::Inner, 2)
                    .with_condition(JoinCondition::new(2, "code", 1, "country_code")),
                Join::new(JoinType::Left, 3)
                    .with_condition(JoinCondition::new(3, "country_code", 2, "code")),
                Join::new(JoinType::Left, 3)
                    .with_condition(JoinCondition::new(3, "city_id", 1, "id")),
            ],
        );

        let (sql, diagnostics) = from_clause(&query);
        assert_eq!(sql.matches("JOIN").count(), 2);
        assert_eq!(diagnostics, vec![DiagnosticKind::AmbiguousJoin]);
    }

    #[test]
    fn test_graph_group_tables_are_introduced_before_on() {
        let query = with_joins(
            base(true),
            vec![Join::new(JoinType::Inner, 2)
                .with_condition(JoinCondition::new(2, "code", 1, "country_code"))
                .with_condition(JoinCondition::new(2, "code", 3, "country_code"))],
        );

        let (sql, diagnostics) = from_clause(&query);
        assert_eq!(
            sql,
            "FROM public.city\n\
             CROSS JOIN public.language\n\
             JOIN public.country ON country.code = city.country_code AND country.code = language.country_code"
        );
        assert_eq!(diagnostics, vec![DiagnosticKind::UnresolvedJoinOrder]);
    }

    #[test]
    fn test_cross_and_empty_joins() {
        let query = with_joins(
            base(false),
            vec![
                Join::new(JoinType::Cross, 2),
                Join::new(JoinType::Inner, 3),
            ],
        );

        let (sql, diagnostics) = from_clause(&query);
        assert_eq!(
            sql,
            "FROM public.city\nCROSS JOIN public.country\nJOIN public.language"
        );
        assert_eq!(diagnostics, vec![DiagnosticKind::EmptyJoinCondition]);
    }

    #[test]
    fn test_unjoined_tables_become_cross_joins() {
        let (sql, _) = from_clause(&base(false));
        assert_eq!(
            sql,
            "FROM public.city\nCROSS JOIN public.country\nCROSS JOIN public.language"
        );
    }
}
