//! Facet value suggestion handler.

use crate::error::SuggestError;
use crate::state::SuggestState;
use crate::suggest::rank_suggestions;
use crate::types::{FieldName, Suggestion};
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SuggestRequest {
    /// Partial values typed by the user
    pub values: Vec<String>,
    /// Field to suggest values for (default: the configured field)
    #[serde(default)]
    pub field: Option<String>,
    /// Maximum number of suggestions to return (default: all)
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Compute, rank and format suggestions for the typed values.
pub async fn handle_suggest(state: &SuggestState, request: SuggestRequest) -> Result<String, String> {
    let field = state.resolve_field(request.field.as_deref())?;
    let provider = state.provider(&field).map_err(|e| e.to_string())?;

    let suggestions = match provider.get_suggestions(request.values.as_slice()).await {
        Ok(suggestions) => suggestions,
        Err(e @ SuggestError::Superseded { .. }) => {
            tracing::debug!("{}", e);
            return Ok(format!(
                "Suggestions for {} were superseded by a newer request.",
                field
            ));
        }
        Err(e) => return Err(format!("Failed to compute suggestions for {}: {}", field, e)),
    };

    let ranked = rank_suggestions(suggestions, request.limit);
    Ok(format_suggestions(&field, &request.values, &ranked))
}

/// Format ranked suggestions into a readable list.
pub fn format_suggestions(field: &FieldName, values: &[String], suggestions: &[Suggestion]) -> String {
    let typed = values
        .iter()
        .map(|value| format!("'{}'", value))
        .collect::<Vec<_>>()
        .join(", ");

    if suggestions.is_empty() {
        return format!("No suggestions for {} matching {}.\n", field, typed);
    }

    let mut output = format!("Suggestions for {} matching {}:\n\n", field, typed);
    for (idx, suggestion) in suggestions.iter().enumerate() {
        let _ = writeln!(
            output,
            "{}. {} ({} results for '{}', distance from total: {})",
            idx + 1,
            suggestion.value,
            suggestion.number_of_results,
            suggestion.keyword,
            suggestion.score.distance_from_total_for_field
        );
    }
    output
}
