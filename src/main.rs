use anyhow::Context;
use facet_suggest::config::{CONFIG_ENV, Config, resolve_config_path};
use facet_suggest::search::FieldIndex;
use facet_suggest::server::SuggestServer;
use facet_suggest::state::SuggestState;
use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr to avoid interfering with MCP protocol on stdout
    facet_suggest::tracing::init();

    let config_path = resolve_config_path(std::env::args().nth(1)).with_context(|| {
        format!("No config file given: pass its path as the first argument or set {}", CONFIG_ENV)
    })?;
    let config = Config::load(&config_path)?;

    let index_path = config.index.clone();
    let index = tokio::task::spawn_blocking(move || FieldIndex::load(&index_path))
        .await
        .context("Index loading task failed")??;

    tracing::info!(
        "Starting facet-suggest MCP server ({} documents, field {})",
        index.document_count(),
        config.field
    );

    let server = SuggestServer::new(SuggestState::new(index, config.suggestion_options()));
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;

    Ok(())
}
