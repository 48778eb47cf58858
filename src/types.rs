//! Core domain types shared by the scorer, the lookup collaborators and the server.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Number of values requested per candidate when none is configured.
pub const DEFAULT_MAXIMUM_NUMBER_OF_VALUES: usize = 3;

/// A validated index field name, always stored with its leading `@`.
///
/// `author` and `@author` name the same field. Field names are restricted to
/// ASCII alphanumerics and underscores so they can be embedded in query
/// expressions without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldName(String);

impl FieldName {
    /// Parse a field name, adding the `@` prefix when it is missing.
    pub fn new(name: &str) -> Result<Self, InvalidFieldName> {
        let trimmed = name.trim();
        let bare = trimmed.strip_prefix('@').unwrap_or(trimmed);

        if bare.is_empty() || !bare.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(InvalidFieldName(name.to_string()));
        }

        Ok(Self(format!("@{}", bare.to_ascii_lowercase())))
    }

    /// The field name including its `@` prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The field name without its `@` prefix.
    pub fn bare(&self) -> &str {
        &self.0[1..]
    }

    /// Key under which facet selections for this field are stored (`f:@field`).
    pub fn facet_state_key(&self) -> String {
        format!("f:{}", self.0)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FieldName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FieldName {
    type Error = InvalidFieldName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<FieldName> for String {
    fn from(value: FieldName) -> Self {
        value.0
    }
}

/// Error returned for field names that cannot be used in query expressions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid field name '{0}': expected letters, digits or '_' after an optional '@'")]
pub struct InvalidFieldName(pub String);

/// How many indexed items currently carry a given field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValueCount {
    pub value: String,
    pub number_of_results: u64,
}

impl FieldValueCount {
    pub fn new(value: impl Into<String>, number_of_results: u64) -> Self {
        Self {
            value: value.into(),
            number_of_results,
        }
    }
}

/// One sub-request of a batched field value lookup.
///
/// A request with only `field` set is the reference request: it asks for the
/// field's whole value distribution under the current query context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFieldValuesRequest {
    pub field: FieldName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_accents: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_number_of_values: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_override: Option<String>,
}

impl ListFieldValuesRequest {
    /// Request scoped to a single candidate value.
    pub fn for_candidate(
        field: FieldName,
        candidate: &str,
        ignore_accents: bool,
        maximum_number_of_values: usize,
    ) -> Self {
        Self {
            field,
            ignore_accents: Some(ignore_accents),
            maximum_number_of_values: Some(maximum_number_of_values),
            query_override: Some(candidate.to_string()),
        }
    }

    /// Unfiltered request used as the scoring baseline.
    pub fn reference(field: FieldName) -> Self {
        Self {
            field,
            ignore_accents: None,
            maximum_number_of_values: None,
            query_override: None,
        }
    }

    pub fn is_reference(&self) -> bool {
        self.ignore_accents.is_none()
            && self.maximum_number_of_values.is_none()
            && self.query_override.is_none()
    }
}

/// Snapshot of the last executed query: basic, advanced and constant expressions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aq: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cq: Option<String>,
}

impl QueryFilters {
    /// Non-empty expressions in `q`, `aq`, `cq` order.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        [&self.q, &self.aq, &self.cq]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.parts().next().is_none()
    }
}

/// A complete batched lookup: the sub-requests plus the query context they run under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFieldValuesBatchRequest {
    pub batch: Vec<ListFieldValuesRequest>,
    #[serde(default)]
    pub filters: QueryFilters,
}

/// Relevance information attached to a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionScore {
    /// Absolute difference between the value's count under the candidate
    /// query and its count in the reference distribution.
    pub distance_from_total_for_field: f64,
}

/// A scored facet value suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub value: String,
    /// Candidate text whose lookup produced this value.
    pub keyword: String,
    pub number_of_results: u64,
    pub score: SuggestionScore,
}
