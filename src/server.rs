//! MCP server exposing facet value suggestions as tools.

use crate::state::SuggestState;
use crate::tools::{
    ListValuesRequest, SelectRequest, SetQueryRequest, SuggestRequest, handle_list_values,
    handle_select, handle_set_query, handle_suggest,
};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP Server for facet value suggestions
#[derive(Clone)]
pub struct SuggestServer {
    /// Shared state (index, session, providers)
    state: Arc<SuggestState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for SuggestServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl SuggestServer {
    pub fn new(state: SuggestState) -> Self {
        Self {
            state: Arc::new(state),
            tool_router: Self::tool_router(),
        }
    }

    pub fn state(&self) -> &Arc<SuggestState> {
        &self.state
    }

    #[tool(
        description = "Suggest values of a facet field for partially typed text. Each typed value is looked up in one batch together with the field's overall distribution; values already selected on the facet are left out. Results are ranked by how close their count is to the field total."
    )]
    async fn suggest_facet_values(
        &self,
        Parameters(request): Parameters<SuggestRequest>,
    ) -> std::result::Result<String, String> {
        handle_suggest(&self.state, request).await
    }

    #[tool(
        description = "Set the query that suggestions run under: basic (q), advanced (aq) and constant (cq) expressions. Expressions combine free text with field expressions like @year==2020."
    )]
    async fn set_query(
        &self,
        Parameters(request): Parameters<SetQueryRequest>,
    ) -> std::result::Result<String, String> {
        handle_set_query(&self.state, request)
    }

    #[tool(
        description = "Select values on a facet field. Selected values are never suggested again. An empty list clears the selection."
    )]
    async fn select_facet_values(
        &self,
        Parameters(request): Parameters<SelectRequest>,
    ) -> std::result::Result<String, String> {
        handle_select(&self.state, request)
    }

    #[tool(
        description = "List the values of a field with their document counts under the current query, optionally narrowed by an extra expression."
    )]
    async fn list_field_values(
        &self,
        Parameters(request): Parameters<ListValuesRequest>,
    ) -> std::result::Result<String, String> {
        handle_list_values(&self.state, request)
    }
}

#[tool_handler]
impl ServerHandler for SuggestServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(format!(
                "facet-suggest: suggests facet values for partially typed text. \
                 The default field is {}. Use set_query and select_facet_values to \
                 describe the current search, then suggest_facet_values.",
                self.state.default_field()
            ))
    }
}
