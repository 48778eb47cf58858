//! Direct field value listing against the index.

use crate::provider::QueryContextProvider;
use crate::state::SuggestState;
use crate::types::ListFieldValuesRequest;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListValuesRequest {
    /// Field to list values for (default: the configured field)
    #[serde(default)]
    pub field: Option<String>,
    /// Expression that narrows the documents counted
    #[serde(default)]
    pub query_override: Option<String>,
    /// Maximum number of values to return (default: all)
    #[serde(default)]
    pub maximum_number_of_values: Option<usize>,
    /// Match regardless of accents (default: false)
    #[serde(default)]
    pub ignore_accents: Option<bool>,
}

/// List a field's values with document counts under the session's last query.
pub fn handle_list_values(state: &SuggestState, request: ListValuesRequest) -> Result<String, String> {
    let field = state.resolve_field(request.field.as_deref())?;
    let lookup = ListFieldValuesRequest {
        field: field.clone(),
        ignore_accents: request.ignore_accents,
        maximum_number_of_values: request.maximum_number_of_values,
        query_override: request.query_override,
    };

    let values = state
        .index()
        .list_field_values(&lookup, &state.session().last_query())
        .map_err(|e| e.to_string())?;

    if values.is_empty() {
        return Ok(format!("No values for {}.\n", field));
    }

    let mut output = format!("Values for {} ({}):\n", field, values.len());
    for value in &values {
        let _ = writeln!(output, "  • {} ({})", value.value, value.number_of_results);
    }
    Ok(output)
}
