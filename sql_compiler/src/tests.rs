//! End-to-end compilation scenarios across modules

use diagnostics::DiagnosticKind;
use query_model::{
    Join, JoinCondition, JoinType, QueryColumn, QueryModel, QueryType, SetOperation, SetOperator,
};

use crate::compiler::compile;
use crate::quoting::ReservedKeywordSet;

fn keywords() -> ReservedKeywordSet {
    ReservedKeywordSet::postgres()
}

fn city_query() -> QueryModel {
    QueryModel::new(1, "Cities", QueryType::Select)
        .with_table("public", "city")
        .with_column(QueryColumn::new(1, "name").with_filter("= 'X'"))
        .unwrap()
}

#[test]
fn test_end_to_end_select() {
    let compiled = compile(&city_query(), &[], &keywords()).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT city.name\nFROM public.city\nWHERE city.name = 'X';"
    );
    assert!(compiled.diagnostics.is_empty());
}

#[test]
fn test_compilation_is_idempotent() {
    let country = QueryModel::new(2, "Countries", QueryType::Select)
        .with_table("public", "country")
        .with_column(QueryColumn::new(1, "code").ordered(true, None))
        .unwrap();
    let query = city_query()
        .with_table("public", "country")
        .with_join(
            Join::new(JoinType::Left, 2)
                .with_condition(JoinCondition::new(2, "code", 1, "country_code")),
        )
        .unwrap()
        .with_set_operation(SetOperation::new(SetOperator::Union, 2));
    let siblings = vec![query.clone(), country];

    let first = compile(&query, &siblings, &keywords()).unwrap();
    let second = compile(&query, &siblings, &keywords()).unwrap();
    assert_eq!(first.sql, second.sql);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn test_reserved_names_are_quoted_everywhere() {
    let query = QueryModel::new(1, "Orders", QueryType::Select)
        .with_table("public", "order")
        .with_column(QueryColumn::new(1, "user").with_alias("select"))
        .unwrap();

    let compiled = compile(&query, &[], &keywords()).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT \"order\".\"user\" AS \"select\"\nFROM public.\"order\";"
    );
}

#[test]
fn test_group_by_is_inferred_once() {
    let query = QueryModel::new(1, "Totals", QueryType::Select)
        .with_table("public", "city")
        .with_column(QueryColumn::new(1, "population").with_aggregate("SUM"))
        .unwrap()
        .with_column(QueryColumn::new(1, "country_code"))
        .unwrap();

    let sql = compile(&query, &[], &keywords()).unwrap().sql;
    assert_eq!(sql.matches("GROUP BY").count(), 1);
    assert!(sql.contains("GROUP BY city.country_code;"));
}

#[test]
fn test_set_operation_order_by_placed_once_at_end() {
    let towns = QueryModel::new(2, "Towns", QueryType::Select)
        .with_table("public", "town")
        .with_column(QueryColumn::new(1, "name").ordered(true, Some(1)))
        .unwrap();
    let query = QueryModel::new(1, "Places", QueryType::Select)
        .with_table("public", "city")
        .with_column(QueryColumn::new(1, "name").ordered(false, Some(1)))
        .unwrap()
        .with_set_operation(SetOperation::new(SetOperator::Union, 2));

    let sql = compile(&query, &[towns], &keywords()).unwrap().sql;
    assert_eq!(
        sql,
        "SELECT city.name\nFROM public.city\nUNION\nSELECT town.name\nFROM public.town\n\
         ORDER BY city.name DESC, town.name ASC;"
    );
    assert_eq!(sql.matches("ORDER BY").count(), 1);
}

#[test]
fn test_join_on_anchor_is_folded_into_from() {
    let query = city_query()
        .with_table("public", "country")
        .with_join(
            Join::new(JoinType::Inner, 1)
                .with_condition(JoinCondition::new(1, "country_code", 2, "code")),
        )
        .unwrap()
        .with_join(
            Join::new(JoinType::Inner, 2)
                .with_condition(JoinCondition::new(2, "code", 1, "country_code")),
        )
        .unwrap();

    let sql = compile(&query, &[], &keywords()).unwrap().sql;
    assert!(sql.contains("FROM public.city\n"));
    assert!(!sql.contains("JOIN public.city"));
    assert_eq!(sql.matches("JOIN public.country").count(), 1);
    assert!(sql.contains(
        "JOIN public.country ON city.country_code = country.code AND country.code = city.country_code"
    ));
}

#[test]
fn test_single_join_drawn_from_anchor() {
    let query = city_query()
        .with_table("public", "country")
        .with_join(
            Join::new(JoinType::Inner, 1)
                .with_condition(JoinCondition::new(1, "country_code", 2, "code")),
        )
        .unwrap();

    let compiled = compile(&query, &[], &keywords()).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT city.name\n\
         FROM public.city\n\
         JOIN public.country ON city.country_code = country.code\n\
         WHERE city.name = 'X';"
    );
    assert!(compiled.diagnostics.is_empty());
}

#[test]
fn test_graph_joins_follow_dependencies() {
    let mut query = city_query()
        .with_table("public", "country")
        .with_table("public", "continent")
        .with_join(
            Join::new(JoinType::Left, 3)
                .with_condition(JoinCondition::new(3, "id", 2, "continent_id")),
        )
        .unwrap()
        .with_join(
            Join::new(JoinType::Inner, 2)
                .with_condition(JoinCondition::new(2, "code", 1, "country_code")),
        )
        .unwrap();
    query.is_drag_and_drop = true;

    let compiled = compile(&query, &[], &keywords()).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT city.name\n\
         FROM public.city\n\
         JOIN public.country ON country.code = city.country_code\n\
         LEFT JOIN public.continent ON continent.id = country.continent_id\n\
         WHERE city.name = 'X';"
    );
    assert!(compiled.diagnostics.is_empty());
}

#[test]
fn test_subquery_reference_resolves_by_name() {
    let capitals = QueryModel::new(2, "Capitals", QueryType::Select)
        .with_table("public", "country")
        .with_column(QueryColumn::new(1, "capital"))
        .unwrap();
    let query = QueryModel::new(1, "Cities", QueryType::Select)
        .with_table("public", "city")
        .with_column(QueryColumn::new(1, "id").with_filter("IN {capitals}"))
        .unwrap();

    let sql = compile(&query, &[query.clone(), capitals], &keywords()).unwrap().sql;
    assert_eq!(
        sql,
        "SELECT city.id\nFROM public.city\n\
         WHERE city.id IN (SELECT country.capital\nFROM public.country);"
    );
}

#[test]
fn test_dangling_reference_is_left_untouched() {
    let query = QueryModel::new(1, "Cities", QueryType::Select)
        .with_table("public", "city")
        .with_column(QueryColumn::new(1, "id").with_filter("IN {Nowhere}"))
        .unwrap();

    let compiled = compile(&query, &[], &keywords()).unwrap();
    assert!(compiled.sql.contains("WHERE city.id IN {Nowhere};"));
    assert_eq!(
        compiled.diagnostics[0].kind,
        DiagnosticKind::DanglingSubqueryReference
    );
}

#[test]
fn test_cyclic_reference_is_detected() {
    let a = QueryModel::new(1, "A", QueryType::Select)
        .with_table("public", "city")
        .with_column(QueryColumn::new(1, "id").with_filter("IN {B}"))
        .unwrap();
    let b = QueryModel::new(2, "B", QueryType::Select)
        .with_table("public", "city")
        .with_column(QueryColumn::new(1, "id").with_filter("IN {A}"))
        .unwrap();
    let siblings = vec![a.clone(), b];

    let compiled = compile(&a, &siblings, &keywords()).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT city.id\nFROM public.city\n\
         WHERE city.id IN (SELECT city.id\nFROM public.city\nWHERE city.id IN {A});"
    );
    assert_eq!(compiled.diagnostics.len(), 1);
    assert_eq!(compiled.diagnostics[0].kind, DiagnosticKind::CyclicReference);
    assert_eq!(compiled.diagnostics[0].query_id, 2);
}

#[test]
fn test_self_referencing_set_operation() {
    let query = city_query().with_set_operation(SetOperation::new(SetOperator::Intersect, 1));
    let compiled = compile(&query, &[query.clone()], &keywords()).unwrap();

    assert!(!compiled.sql.contains("INTERSECT"));
    assert_eq!(compiled.diagnostics[0].kind, DiagnosticKind::CyclicReference);
}

#[test]
fn test_where_parenthesization() {
    let single = city_query();
    let two_rows = QueryModel::new(1, "Cities", QueryType::Select)
        .with_table("public", "city")
        .with_column(
            QueryColumn::new(1, "name").with_filters(vec!["= 'X'".into(), "= 'Y'".into()]),
        )
        .unwrap();
    let one_row_two_columns = city_query()
        .with_column(QueryColumn::new(1, "population").with_filter("> 10"))
        .unwrap();

    let sql = |query: &QueryModel| compile(query, &[], &keywords()).unwrap().sql;
    assert!(sql(&single).ends_with("WHERE city.name = 'X';"));
    assert!(sql(&two_rows).ends_with("WHERE (city.name = 'X' OR city.name = 'Y');"));
    assert!(sql(&one_row_two_columns).ends_with("WHERE (city.name = 'X' AND city.population > 10);"));
}

#[test]
fn test_statement_forms() {
    let mut delete = QueryModel::new(1, "Purge", QueryType::Delete)
        .with_table("public", "city")
        .with_column(QueryColumn::new(1, "name").with_filter("= 'X'"))
        .unwrap();
    delete.returning = true;
    assert_eq!(
        compile(&delete, &[], &keywords()).unwrap().sql,
        "DELETE FROM public.city\nWHERE city.name = 'X'\nRETURNING *;"
    );

    let update = QueryModel::new(1, "Rename", QueryType::Update)
        .with_table("public", "city")
        .with_column(QueryColumn::new(1, "name").with_values(vec!["'Y'".into()]))
        .unwrap();
    assert_eq!(
        compile(&update, &[], &keywords()).unwrap().sql,
        "UPDATE public.city\nSET name = 'Y';"
    );

    let insert = QueryModel::new(1, "Add", QueryType::Insert)
        .with_table("public", "city")
        .with_column(QueryColumn::new(1, "name").with_values(vec!["'Z'".into()]))
        .unwrap();
    assert_eq!(
        compile(&insert, &[], &keywords()).unwrap().sql,
        "INSERT INTO public.city (name)\nVALUES ('Z');"
    );
}

#[test]
fn test_insert_from_terminated_source() {
    let source = QueryModel::new(2, "Towns", QueryType::Select)
        .with_table("public", "town")
        .with_column(QueryColumn::new(1, "name"))
        .unwrap();
    let mut insert = QueryModel::new(1, "Copy towns", QueryType::Insert)
        .with_table("public", "city")
        .with_column(QueryColumn::new(1, "name"))
        .unwrap();
    insert.from_query = Some(2);

    let sql = compile(&insert, &[source], &keywords()).unwrap().sql;
    assert_eq!(
        sql,
        "INSERT INTO public.city (name)\nSELECT town.name\nFROM public.town;"
    );
    assert_eq!(sql.matches(';').count(), 1);
}
