use diagnostics::DiagnosticKind;
use query_model::{QueryColumn, QueryModel};

use crate::compiler::compile_nested;
use crate::context::CompileContext;
use crate::references::column_reference;
use crate::statements::Nesting;

/// Represents SQL aggregate functions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateFunction {
    /// COUNT(field)
    Count,
    /// COUNT(DISTINCT field)
    CountDistinct,
    /// SUM(field)
    Sum,
    /// AVG(field)
    Avg,
    /// MIN(field)
    Min,
    /// MAX(field)
    Max,
    /// Any other aggregate, rendered verbatim (STRING_AGG, BOOL_AND, ...)
    Other(String),
}

impl AggregateFunction {
    pub fn parse(name: &str) -> Self {
        let normalized: String = name
            .trim()
            .to_ascii_uppercase()
            .split(|c: char| c.is_whitespace() || c == '(' || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        match normalized.as_str() {
            "COUNT" => AggregateFunction::Count,
            "COUNT DISTINCT" => AggregateFunction::CountDistinct,
            "SUM" => AggregateFunction::Sum,
            "AVG" => AggregateFunction::Avg,
            "MIN" => AggregateFunction::Min,
            "MAX" => AggregateFunction::Max,
            _ => AggregateFunction::Other(name.trim().to_string()),
        }
    }

    /// Convert aggregate function to SQL string
    pub fn to_sql(&self) -> &str {
        match self {
            AggregateFunction::Count | AggregateFunction::CountDistinct => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
            AggregateFunction::Other(name) => name,
        }
    }

    /// Check if this is a DISTINCT aggregate
    pub fn is_distinct(&self) -> bool {
        matches!(self, AggregateFunction::CountDistinct)
    }

    pub fn apply(&self, expression: &str) -> String {
        if self.is_distinct() {
            format!("{}(DISTINCT {})", self.to_sql(), expression)
        } else {
            format!("{}({})", self.to_sql(), expression)
        }
    }
}

/// Column reference wrapped in its aggregate, else its scalar function
pub fn function_expression(
    ctx: &mut CompileContext<'_>,
    query: &QueryModel,
    column: &QueryColumn,
) -> String {
    let reference = column_reference(ctx, query, column);

    if let Some(aggregate) = column.aggregate() {
        AggregateFunction::parse(aggregate).apply(&reference)
    } else if let Some(function) = column.scalar_function() {
        format!("{}({})", function, reference)
    } else {
        reference
    }
}

/// Inline a linked sibling query as a scalar sub-select
fn subquery_expression(ctx: &mut CompileContext<'_>, column: &QueryColumn) -> Option<String> {
    let subquery_id = column.subquery_id?;
    let Some(subquery) = ctx.find_by_id(subquery_id) else {
        ctx.warn(
            DiagnosticKind::MissingQuery,
            format!(
                "column '{}' links to missing query {}",
                column.column_name, subquery_id
            ),
        );
        return None;
    };

    compile_nested(ctx, subquery, Nesting::Subquery).map(|compiled| format!("({})", compiled.sql))
}

/// One SELECT list entry: `agg(ref) AS alias`, `func(ref) AS alias`,
/// `ref AS alias` or bare `ref`
pub fn field_expression(
    ctx: &mut CompileContext<'_>,
    query: &QueryModel,
    column: &QueryColumn,
) -> String {
    let expression = match subquery_expression(ctx, column) {
        Some(subquery) => subquery,
        None => function_expression(ctx, query, column),
    };

    match column.alias() {
        Some(alias) => format!("{} AS {}", expression, ctx.quote(alias)),
        None => expression,
    }
}

/// Build SELECT list from the displayed columns, `*` when there are none
pub fn build_field_list(ctx: &mut CompileContext<'_>, query: &QueryModel) -> String {
    let fields: Vec<String> = query
        .displayed_columns()
        .map(|column| field_expression(ctx, query, column))
        .collect();

    if fields.is_empty() {
        return "*".to_string();
    }

    fields.join(", ")
}
