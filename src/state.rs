//! Shared server state: the index, the session and one suggestion provider per field.

use crate::error::LookupError;
use crate::search::FieldIndex;
use crate::session::Session;
use crate::suggest::{FacetValueSuggestionsProvider, SuggestionOptions};
use crate::types::FieldName;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Suggestion provider wired to the in-memory index and the session.
pub type IndexSuggestions = FacetValueSuggestionsProvider<Arc<FieldIndex>, Arc<Session>, Arc<Session>>;

/// Central state behind every tool handler.
///
/// Providers are created lazily and kept per field so that each field has its
/// own call numbering for stale-result detection.
pub struct SuggestState {
    index: Arc<FieldIndex>,
    session: Arc<Session>,
    defaults: SuggestionOptions,
    providers: Mutex<HashMap<FieldName, Arc<IndexSuggestions>>>,
}

impl std::fmt::Debug for SuggestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestState")
            .field("documents", &self.index.document_count())
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl SuggestState {
    pub fn new(index: FieldIndex, defaults: SuggestionOptions) -> Self {
        if !index.fields().any(|field| field == &defaults.field) {
            tracing::warn!(
                "No indexed document carries {}; suggestions will fail until one does",
                defaults.field
            );
        }

        Self {
            index: Arc::new(index),
            session: Arc::new(Session::new()),
            defaults,
            providers: Mutex::new(HashMap::new()),
        }
    }

    pub fn index(&self) -> &Arc<FieldIndex> {
        &self.index
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn default_field(&self) -> &FieldName {
        &self.defaults.field
    }

    /// Parse an optional field argument, falling back to the configured field.
    pub fn resolve_field(&self, field: Option<&str>) -> Result<FieldName, String> {
        match field {
            Some(name) => FieldName::new(name).map_err(|e| e.to_string()),
            None => Ok(self.defaults.field.clone()),
        }
    }

    /// The provider for `field`, created on first use with the configured options.
    ///
    /// Only fields carried by the index get a provider.
    pub fn provider(&self, field: &FieldName) -> Result<Arc<IndexSuggestions>, LookupError> {
        if !self.index.fields().any(|indexed| indexed == field) {
            return Err(LookupError::UnknownField(field.to_string()));
        }

        let mut providers = self.providers.lock().unwrap_or_else(|poisoned| {
            tracing::error!("Provider registry lock poisoned, continuing");
            poisoned.into_inner()
        });

        let provider = providers
            .entry(field.clone())
            .or_insert_with(|| {
                let options = SuggestionOptions {
                    field: field.clone(),
                    ..self.defaults.clone()
                };
                Arc::new(FacetValueSuggestionsProvider::new(
                    self.index.clone(),
                    self.session.clone(),
                    self.session.clone(),
                    options,
                ))
            })
            .clone();
        Ok(provider)
    }
}
