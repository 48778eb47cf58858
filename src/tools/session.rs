//! Handlers that update the search session: the last query and facet selections.

use crate::search::parse_expression;
use crate::state::SuggestState;
use crate::types::QueryFilters;
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetQueryRequest {
    /// Basic query expression
    #[serde(default)]
    pub q: Option<String>,
    /// Advanced query expression, e.g. `@year==2020`
    #[serde(default)]
    pub aq: Option<String>,
    /// Constant query expression
    #[serde(default)]
    pub cq: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SelectRequest {
    /// Field to select values on (default: the configured field)
    #[serde(default)]
    pub field: Option<String>,
    /// Values to select; an empty list clears the selection
    pub values: Vec<String>,
}

/// Record the query the suggestions run under, after checking each expression parses.
pub fn handle_set_query(state: &SuggestState, request: SetQueryRequest) -> Result<String, String> {
    let filters = QueryFilters {
        q: request.q,
        aq: request.aq,
        cq: request.cq,
    };

    for part in filters.parts() {
        parse_expression(part).map_err(|e| e.to_string())?;
    }

    let response = if filters.is_empty() {
        "Query cleared.".to_string()
    } else {
        format!("Query set: {}", filters.parts().collect::<Vec<_>>().join(" AND "))
    };
    state.session().set_last_query(filters);
    Ok(response)
}

/// Replace the selected values of a facet.
pub fn handle_select(state: &SuggestState, request: SelectRequest) -> Result<String, String> {
    let field = state.resolve_field(request.field.as_deref())?;
    state.session().select(&field, request.values);

    let selected = state.session().selected_values(&field);
    if selected.is_empty() {
        Ok(format!("Cleared selection on {}.", field))
    } else {
        Ok(format!("Selected on {}: {}", field, selected.join(", ")))
    }
}
