//! Query expression parsing.
//!
//! Expressions are conjunctions of free-text terms and field expressions:
//!
//! ```text
//! cowboy @year==2020 AND @author=("Jane Doe","John Smith")
//! ```
//!
//! `==` matches a field value exactly, `=` ignores case. The `AND` keyword is
//! accepted and ignored; every clause must match.

use crate::error::LookupError;
use crate::types::FieldName;
use regex::Regex;
use std::sync::LazyLock;

static FIELD_EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@([A-Za-z0-9_]+)\s*(==|=)\s*(\([^)]*\)|"[^"]*"|[^\s()"=]+)"#)
        .expect("field expression pattern is valid")
});

/// A single field expression such as `@author=="Jane Doe"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldClause {
    pub field: FieldName,
    pub values: Vec<String>,
    /// `==` when true, `=` (case-insensitive) otherwise.
    pub exact: bool,
}

impl FieldClause {
    /// Check whether any of the document's values satisfies this clause.
    pub fn matches(&self, document_values: &[String]) -> bool {
        document_values.iter().any(|candidate| {
            self.values.iter().any(|wanted| {
                if self.exact {
                    candidate == wanted
                } else {
                    candidate.to_lowercase() == wanted.to_lowercase()
                }
            })
        })
    }
}

/// A parsed query expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expression {
    pub fields: Vec<FieldClause>,
    /// Remaining free text with `AND` keywords and grouping removed.
    pub text: String,
}

impl Expression {
    /// Plain text typed by a user. `@` and `=` carry no meaning here.
    pub fn free_text(input: &str) -> Self {
        Self {
            fields: Vec::new(),
            text: input.split_whitespace().collect::<Vec<_>>().join(" "),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.text.is_empty()
    }
}

/// Parse an expression into field clauses and free text.
pub fn parse_expression(input: &str) -> Result<Expression, LookupError> {
    let mut fields = Vec::new();

    for captures in FIELD_EXPRESSION.captures_iter(input) {
        let field = FieldName::new(&captures[1]).map_err(|e| LookupError::InvalidExpression {
            expression: input.to_string(),
            reason: e.to_string(),
        })?;
        let values = parse_values(&captures[3]);
        if values.is_empty() {
            return Err(LookupError::InvalidExpression {
                expression: input.to_string(),
                reason: format!("no value given for {}", field),
            });
        }
        fields.push(FieldClause {
            field,
            values,
            exact: &captures[2] == "==",
        });
    }

    let remainder = FIELD_EXPRESSION.replace_all(input, " ");
    if remainder.contains('@') {
        return Err(LookupError::InvalidExpression {
            expression: input.to_string(),
            reason: "field expressions take the form @field==value".to_string(),
        });
    }

    let text = remainder
        .split(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .filter(|word| !word.is_empty() && *word != "AND")
        .collect::<Vec<_>>()
        .join(" ");

    Ok(Expression { fields, text })
}

/// Split a value list such as `("a", "b")`, `"a b"` or `a` into plain values.
fn parse_values(raw: &str) -> Vec<String> {
    let inner = raw
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(raw);

    inner
        .split(',')
        .map(|value| value.trim().trim_matches('"').trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remove every expression on `field` from `expression`, keeping the rest intact.
///
/// Dangling `AND` keywords left behind are dropped as well. Used so the values
/// already selected on a facet do not narrow the suggestions for that same facet.
pub fn strip_field_expressions(expression: &str, field: &FieldName) -> String {
    let stripped = FIELD_EXPRESSION.replace_all(expression, |captures: &regex::Captures<'_>| {
        let matches_field = FieldName::new(&captures[1]).is_ok_and(|found| &found == field);
        if matches_field {
            " ".to_string()
        } else {
            captures[0].to_string()
        }
    });

    let mut kept: Vec<&str> = Vec::new();
    for word in stripped.split_whitespace() {
        if word == "AND" && kept.last().is_none_or(|last| *last == "AND") {
            continue;
        }
        kept.push(word);
    }
    while kept.last() == Some(&"AND") {
        kept.pop();
    }
    kept.join(" ")
}
