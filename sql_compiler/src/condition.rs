//! Condition composer
//!
//! Turns tokenized filter text into a boolean expression on one column,
//! resolving `{Query name}` references into parenthesized sub-selects.

use diagnostics::DiagnosticKind;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::compiler::compile_nested;
use crate::context::CompileContext;
use crate::statements::Nesting;
use crate::tokenizer::{tokenize, LogicalOperator, Token};

static SUBQUERY_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]+)\}").expect("valid sub-query pattern"));

/// Replace every `{Name}` with the compiled sibling query in parentheses.
/// Unknown names and cyclic references are left untouched.
pub fn resolve_subquery_references(ctx: &mut CompileContext<'_>, text: &str) -> String {
    if !text.contains('{') {
        return text.to_string();
    }

    SUBQUERY_REFERENCE
        .replace_all(text, |caps: &Captures<'_>| {
            let name = caps[1].trim();
            match ctx.find_by_name(name) {
                Some(sibling) => match compile_nested(ctx, sibling, Nesting::Subquery) {
                    Some(compiled) => format!("({})", compiled.sql),
                    None => caps[0].to_string(),
                },
                None => {
                    ctx.warn(
                        DiagnosticKind::DanglingSubqueryReference,
                        format!("no query named '{}' for reference {}", name, &caps[0]),
                    );
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

/// Prefix the column reference unless the text already names the column,
/// either as `column_ref` or as the unwrapped `bare_ref`
fn qualify(ctx: &mut CompileContext<'_>, text: &str, column_ref: &str, bare_ref: &str) -> String {
    let prefix =
        text.starts_with('=') || !(text.contains(column_ref) || text.contains(bare_ref));
    let resolved = resolve_subquery_references(ctx, text);

    if prefix {
        format!("{} {}", column_ref, resolved)
    } else {
        resolved
    }
}

/// Compose tokens into one expression on `column_ref`.
///
/// The result is parenthesized only when an operator joined two conditions;
/// a single condition is returned bare.
pub fn compose(ctx: &mut CompileContext<'_>, tokens: &[Token], column_ref: &str) -> String {
    compose_on(ctx, tokens, column_ref, column_ref)
}

fn compose_on(
    ctx: &mut CompileContext<'_>,
    tokens: &[Token],
    column_ref: &str,
    bare_ref: &str,
) -> String {
    let mut expression = String::new();
    let mut pending: Option<LogicalOperator> = None;
    let mut segments = 0;
    let mut operators = 0;

    for token in tokens {
        match token {
            Token::Operator(operator) => {
                if segments > 0 {
                    pending = Some(*operator);
                }
            }
            Token::Text(text) => {
                let condition = qualify(ctx, text.trim(), column_ref, bare_ref);
                if segments > 0 {
                    let operator = pending.take().unwrap_or(LogicalOperator::And);
                    expression.push(' ');
                    expression.push_str(operator.to_sql());
                    expression.push(' ');
                    operators += 1;
                }
                expression.push_str(&condition);
                segments += 1;
            }
        }
    }

    if operators > 0 {
        format!("({})", expression)
    } else {
        expression
    }
}

/// Tokenize and compose one raw filter cell; blank cells compose to nothing.
///
/// `column_ref` is the expression conditions compare (`SUM(city.pop)`),
/// `bare_ref` the plain column it wraps (`city.pop`).
pub fn compose_filter(
    ctx: &mut CompileContext<'_>,
    raw: &str,
    column_ref: &str,
    bare_ref: &str,
) -> Option<String> {
    let tokens = tokenize(raw);
    let composed = compose_on(ctx, &tokens, column_ref, bare_ref);
    if composed.is_empty() {
        None
    } else {
        Some(composed)
    }
}
