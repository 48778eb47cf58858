//! Facet value suggestions for partially typed values.

use crate::error::SuggestError;
use crate::provider::{LookupProvider, QueryContextProvider, SelectionProvider};
use crate::search::strip_field_expressions;
use crate::types::{
    DEFAULT_MAXIMUM_NUMBER_OF_VALUES, FieldName, ListFieldValuesBatchRequest,
    ListFieldValuesRequest, QueryFilters, Suggestion,
};
use std::sync::atomic::{AtomicU64, Ordering};

use super::scoring::score_suggestions;

/// Settings held across calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionOptions {
    /// Field whose values are suggested
    pub field: FieldName,
    /// Values requested per candidate
    pub maximum_number_of_values: usize,
    /// Match candidates regardless of accents
    pub ignore_accents: bool,
}

impl SuggestionOptions {
    pub fn new(field: FieldName) -> Self {
        Self {
            field,
            maximum_number_of_values: DEFAULT_MAXIMUM_NUMBER_OF_VALUES,
            ignore_accents: true,
        }
    }
}

/// Suggests values of one field for the text a user is typing.
///
/// Every call sends a single batch: one request per candidate followed by a
/// reference request for the whole field. Each returned value is scored
/// against its reference count; duplicates and already selected values are
/// dropped.
///
/// Calls are numbered. When a newer call starts before an older one gets its
/// lookup answer, the older call resolves to [`SuggestError::Superseded`] so
/// stale suggestions are never shown.
pub struct FacetValueSuggestionsProvider<L, Q, S> {
    lookup: L,
    query: Q,
    selection: S,
    options: SuggestionOptions,
    generation: AtomicU64,
}

impl<L, Q, S> std::fmt::Debug for FacetValueSuggestionsProvider<L, Q, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacetValueSuggestionsProvider")
            .field("options", &self.options)
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<L, Q, S> FacetValueSuggestionsProvider<L, Q, S>
where
    L: LookupProvider,
    Q: QueryContextProvider,
    S: SelectionProvider,
{
    pub fn new(lookup: L, query: Q, selection: S, options: SuggestionOptions) -> Self {
        Self {
            lookup,
            query,
            selection,
            options,
            generation: AtomicU64::new(0),
        }
    }

    pub fn options(&self) -> &SuggestionOptions {
        &self.options
    }

    /// Number of the most recent call.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Build the lookup batch for `candidates` under the `last_query` context.
    ///
    /// The reference request is always last. Expressions on the suggested
    /// field are removed from the advanced query so an existing selection
    /// does not narrow its own suggestions.
    pub fn build_batch(
        &self,
        candidates: &[impl AsRef<str>],
        last_query: &QueryFilters,
    ) -> ListFieldValuesBatchRequest {
        let field = &self.options.field;
        let mut batch: Vec<ListFieldValuesRequest> = candidates
            .iter()
            .map(|candidate| {
                ListFieldValuesRequest::for_candidate(
                    field.clone(),
                    candidate.as_ref(),
                    self.options.ignore_accents,
                    self.options.maximum_number_of_values,
                )
            })
            .collect();
        batch.push(ListFieldValuesRequest::reference(field.clone()));

        let mut filters = last_query.clone();
        filters.aq = filters
            .aq
            .as_deref()
            .map(|aq| strip_field_expressions(aq, field))
            .filter(|aq| !aq.is_empty());

        ListFieldValuesBatchRequest { batch, filters }
    }

    /// Compute suggestions for the given candidate values.
    pub async fn get_suggestions(
        &self,
        candidates: &[impl AsRef<str>],
    ) -> Result<Vec<Suggestion>, SuggestError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let request = self.build_batch(candidates, &self.query.last_query());

        tracing::debug!(
            "Requesting {} value batches for {} (request {})",
            request.batch.len(),
            self.options.field,
            generation
        );

        let mut responses = self
            .lookup
            .list_field_values_batch(&request)
            .await
            .inspect_err(|e| tracing::warn!("Field value lookup for {} failed: {}", self.options.field, e))?;

        let latest = self.generation.load(Ordering::SeqCst);
        if latest != generation {
            tracing::debug!("Dropping suggestions for request {} (latest is {})", generation, latest);
            return Err(SuggestError::Superseded { generation, latest });
        }

        if responses.len() != request.batch.len() {
            tracing::debug!(
                "Lookup answered {} of {} value requests for {}; missing candidates count as empty",
                responses.len(),
                request.batch.len(),
                self.options.field
            );
        }
        // The last sequence is always the reference, even in a short response.
        let reference = responses.pop().unwrap_or_default();

        let candidates: Vec<String> = candidates.iter().map(|c| c.as_ref().to_string()).collect();
        let selected = self.selection.selected(&self.options.field.facet_state_key());
        let suggestions = score_suggestions(&candidates, &responses, &reference, &selected);

        tracing::debug!(
            "Computed {} suggestions for {} ({} selected values excluded)",
            suggestions.len(),
            self.options.field,
            selected.len()
        );
        Ok(suggestions)
    }
}
