mod common;

use assert2::check;
use common::{
    REFERENCE_FIELD_NUMBER_OF_RESULTS, SUGGESTION, SpyLookup, VALUE_TO_SEARCH, some_field,
    spy_lookup,
};
use facet_suggest::{
    FacetValueSuggestionsProvider, FieldValueCount, ListFieldValuesRequest, LookupError,
    QueryFilters, Session, SuggestError, SuggestionOptions,
};
use rstest::rstest;
use std::sync::Arc;

type Provider = FacetValueSuggestionsProvider<Arc<SpyLookup>, Arc<Session>, Arc<Session>>;

fn provider_with(lookup: &Arc<SpyLookup>, session: &Arc<Session>) -> Provider {
    FacetValueSuggestionsProvider::new(
        lookup.clone(),
        session.clone(),
        session.clone(),
        SuggestionOptions::new(some_field()),
    )
}

/// Spy answers every candidate request with one `suggestion` entry counting 1.
fn single_suggestion(lookup: &SpyLookup) {
    lookup.respond_with(vec![vec![FieldValueCount::new(SUGGESTION, 1)]]);
}

// --- Batch shape ---

/// Test: one request per candidate, then the field-only reference request.
#[rstest]
#[tokio::test]
async fn executes_batch_with_value_to_search_and_reference(spy_lookup: SpyLookup) {
    let lookup = Arc::new(spy_lookup);
    let session = Arc::new(Session::new());
    let provider = provider_with(&lookup, &session);

    provider.get_suggestions(&[VALUE_TO_SEARCH]).await.unwrap();

    let calls = lookup.calls();
    check!(calls.len() == 1);
    check!(
        calls[0].batch
            == vec![
                ListFieldValuesRequest {
                    field: some_field(),
                    ignore_accents: Some(true),
                    maximum_number_of_values: Some(3),
                    query_override: Some(VALUE_TO_SEARCH.to_string()),
                },
                ListFieldValuesRequest {
                    field: some_field(),
                    ignore_accents: None,
                    maximum_number_of_values: None,
                    query_override: None,
                },
            ]
    );
}

/// Test: the batch has one entry per candidate plus the reference, last.
#[rstest]
#[case(&[])]
#[case(&["a"])]
#[case(&["cow", "boy", "cowboy", "western"])]
#[tokio::test]
async fn batch_has_one_request_per_candidate_plus_reference(#[case] candidates: &[&str]) {
    let lookup = Arc::new(SpyLookup::new());
    lookup.respond_with(candidates.iter().map(|_| Vec::new()).collect());
    let session = Arc::new(Session::new());
    let provider = provider_with(&lookup, &session);

    provider.get_suggestions(candidates).await.unwrap();

    let batch = &lookup.calls()[0].batch;
    check!(batch.len() == candidates.len() + 1);
    check!(batch.last().is_some_and(ListFieldValuesRequest::is_reference));
    for (request, candidate) in batch.iter().zip(candidates) {
        check!(request.query_override.as_deref() == Some(*candidate));
    }
}

/// Test: the session's last query travels with the batch, minus the suggested field.
#[rstest]
#[tokio::test]
async fn batch_carries_last_query_without_own_field(spy_lookup: SpyLookup) {
    let lookup = Arc::new(spy_lookup);
    let session = Arc::new(Session::new());
    session.set_last_query(QueryFilters {
        q: None,
        aq: Some("@bloupbloup==old AND @year==2020".to_string()),
        cq: Some("@source==web".to_string()),
    });
    let provider = provider_with(&lookup, &session);

    provider.get_suggestions(&[VALUE_TO_SEARCH]).await.unwrap();

    let filters = &lookup.calls()[0].filters;
    check!(filters.aq.as_deref() == Some("@year==2020"));
    check!(filters.cq.as_deref() == Some("@source==web"));
}

// --- Scoring ---

/// Test: a single returned value yields a single scored suggestion.
#[rstest]
#[tokio::test]
async fn returns_suggestions_for_the_value_to_search(spy_lookup: SpyLookup) {
    single_suggestion(&spy_lookup);
    let lookup = Arc::new(spy_lookup);
    let session = Arc::new(Session::new());
    let provider = provider_with(&lookup, &session);

    let results = provider.get_suggestions(&[VALUE_TO_SEARCH]).await.unwrap();

    check!(results.len() == 1);
    check!(results[0].value == SUGGESTION);
    check!(results[0].keyword == VALUE_TO_SEARCH);
    check!(
        results[0].score.distance_from_total_for_field
            == (REFERENCE_FIELD_NUMBER_OF_RESULTS - 1) as f64
    );
}

/// Test: a value already selected on the facet is never suggested.
#[rstest]
#[tokio::test]
async fn excludes_an_already_selected_field_value(spy_lookup: SpyLookup) {
    single_suggestion(&spy_lookup);
    let lookup = Arc::new(spy_lookup);
    let session = Arc::new(Session::new());
    session.select(&some_field(), vec![SUGGESTION.to_string()]);
    let provider = provider_with(&lookup, &session);

    let results = provider.get_suggestions(&[VALUE_TO_SEARCH]).await.unwrap();

    check!(results.is_empty());
}

/// Test: selections on other fields do not hide values.
#[rstest]
#[tokio::test]
async fn selection_on_other_field_is_ignored(spy_lookup: SpyLookup) {
    single_suggestion(&spy_lookup);
    let lookup = Arc::new(spy_lookup);
    let session = Arc::new(Session::new());
    session.select(
        &facet_suggest::FieldName::new("@other").unwrap(),
        vec![SUGGESTION.to_string()],
    );
    let provider = provider_with(&lookup, &session);

    let results = provider.get_suggestions(&[VALUE_TO_SEARCH]).await.unwrap();

    check!(results.len() == 1);
}

/// Test: no cap is applied beyond what the lookup returned.
#[rstest]
#[tokio::test]
async fn returns_the_same_number_of_suggestions(spy_lookup: SpyLookup) {
    let response = (1..=10)
        .map(|i| FieldValueCount::new(i.to_string(), i))
        .collect();
    spy_lookup.respond_with(vec![response]);
    let lookup = Arc::new(spy_lookup);
    let session = Arc::new(Session::new());
    let provider = provider_with(&lookup, &session);

    let results = provider.get_suggestions(&[VALUE_TO_SEARCH]).await.unwrap();

    check!(results.len() == 10);
    // Values missing from the reference score against zero.
    check!(results[3].score.distance_from_total_for_field == 4.0);
}

/// Test: a value returned for several candidates appears once, from the first.
#[rstest]
#[tokio::test]
async fn deduplicates_across_candidates(spy_lookup: SpyLookup) {
    spy_lookup.respond_with(vec![
        vec![FieldValueCount::new(SUGGESTION, 4), FieldValueCount::new("other", 2)],
        vec![FieldValueCount::new(SUGGESTION, 9)],
    ]);
    let lookup = Arc::new(spy_lookup);
    let session = Arc::new(Session::new());
    let provider = provider_with(&lookup, &session);

    let results = provider.get_suggestions(&["cow", "boy"]).await.unwrap();

    let values: Vec<&str> = results.iter().map(|s| s.value.as_str()).collect();
    check!(values == vec![SUGGESTION, "other"]);
    check!(results[0].number_of_results == 4);
    check!(results[0].keyword == "cow");
}

/// Test: identical inputs over unchanged data give identical output.
#[rstest]
#[tokio::test]
async fn repeated_calls_are_identical(spy_lookup: SpyLookup) {
    spy_lookup.respond_with(vec![vec![
        FieldValueCount::new("b", 3),
        FieldValueCount::new(SUGGESTION, 1),
        FieldValueCount::new("a", 3),
    ]]);
    let lookup = Arc::new(spy_lookup);
    let session = Arc::new(Session::new());
    let provider = provider_with(&lookup, &session);

    let first = provider.get_suggestions(&[VALUE_TO_SEARCH]).await.unwrap();
    let second = provider.get_suggestions(&[VALUE_TO_SEARCH]).await.unwrap();

    check!(first == second);
}

/// Test: every suggested value came from a per-candidate response, never the reference.
#[rstest]
#[tokio::test]
async fn never_suggests_reference_only_values(spy_lookup: SpyLookup) {
    spy_lookup.respond_with(vec![vec![FieldValueCount::new("western", 2)]]);
    let lookup = Arc::new(spy_lookup);
    let session = Arc::new(Session::new());
    let provider = provider_with(&lookup, &session);

    let results = provider.get_suggestions(&[VALUE_TO_SEARCH]).await.unwrap();

    check!(results.iter().all(|s| s.value == "western"));
    check!(!results.iter().any(|s| s.value == SUGGESTION));
}

// --- Edge cases ---

/// Test: an answer holding only the reference still resolves, with nothing to suggest.
#[rstest]
#[tokio::test]
async fn reference_only_response_resolves_empty(spy_lookup: SpyLookup) {
    let lookup = Arc::new(spy_lookup);
    let session = Arc::new(Session::new());
    let provider = provider_with(&lookup, &session);

    let results = provider.get_suggestions(&[VALUE_TO_SEARCH, "boots"]).await;

    check!(results == Ok(vec![]));
}

/// Test: no candidates still sends the reference-only batch and yields nothing.
#[rstest]
#[tokio::test]
async fn empty_candidates_yield_no_suggestions(spy_lookup: SpyLookup) {
    let lookup = Arc::new(spy_lookup);
    let session = Arc::new(Session::new());
    let provider = provider_with(&lookup, &session);

    let no_candidates: [&str; 0] = [];
    let results = provider.get_suggestions(&no_candidates).await.unwrap();

    check!(results.is_empty());
    let batch = &lookup.calls()[0].batch;
    check!(batch.len() == 1);
    check!(batch[0].is_reference());
}

/// Test: lookup failures propagate unchanged.
#[rstest]
#[tokio::test]
async fn lookup_failure_propagates(spy_lookup: SpyLookup) {
    spy_lookup.fail_with(LookupError::Endpoint("503 Service Unavailable".to_string()));
    let lookup = Arc::new(spy_lookup);
    let session = Arc::new(Session::new());
    let provider = provider_with(&lookup, &session);

    let result = provider.get_suggestions(&[VALUE_TO_SEARCH]).await;

    check!(
        result
            == Err(SuggestError::Lookup(LookupError::Endpoint(
                "503 Service Unavailable".to_string()
            )))
    );
    check!(lookup.calls().len() == 1);
}
