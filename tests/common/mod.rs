//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `spy_lookup`: a [`SpyLookup`] answering with a configurable batch response
//!   (the reference sequence is appended automatically) and recording every
//!   request it receives
//! - `movie_state`: a [`SuggestState`] over a small in-memory movie collection

use facet_suggest::{
    BatchResponse, Document, FieldIndex, FieldName, FieldValueCount, ListFieldValuesBatchRequest,
    LookupError, LookupProvider, SuggestState, SuggestionOptions,
};
use futures::future::BoxFuture;
use rstest::fixture;
use std::collections::BTreeMap;
use std::sync::Mutex;

pub const SOME_FIELD: &str = "@bloupbloup";
pub const VALUE_TO_SEARCH: &str = "cowboy";
pub const SUGGESTION: &str = "suggestion";
pub const REFERENCE_FIELD_NUMBER_OF_RESULTS: u64 = 10;

#[allow(dead_code)]
pub fn some_field() -> FieldName {
    FieldName::new(SOME_FIELD).expect("test field name is valid")
}

/// Lookup double that records requests and replays a canned response.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct SpyLookup {
    responses: Mutex<Vec<Vec<FieldValueCount>>>,
    failure: Mutex<Option<LookupError>>,
    calls: Mutex<Vec<ListFieldValuesBatchRequest>>,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl SpyLookup {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Per-candidate sequences to answer with; the reference batch is appended.
    pub fn respond_with(&self, values: Vec<Vec<FieldValueCount>>) {
        *self.responses.lock().unwrap() = values;
    }

    pub fn fail_with(&self, error: LookupError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> Vec<ListFieldValuesBatchRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reference_batch_response() -> Vec<FieldValueCount> {
        vec![FieldValueCount::new(SUGGESTION, REFERENCE_FIELD_NUMBER_OF_RESULTS)]
    }
}

impl LookupProvider for SpyLookup {
    fn list_field_values_batch<'a>(
        &'a self,
        request: &'a ListFieldValuesBatchRequest,
    ) -> BoxFuture<'a, Result<BatchResponse, LookupError>> {
        self.calls.lock().unwrap().push(request.clone());
        let failure = self.failure.lock().unwrap().clone();
        let mut response = self.responses.lock().unwrap().clone();
        response.push(Self::reference_batch_response());

        Box::pin(async move {
            match failure {
                Some(error) => Err(error),
                None => Ok(response),
            }
        })
    }
}

#[allow(dead_code)]
#[fixture]
pub fn spy_lookup() -> SpyLookup {
    SpyLookup::new()
}

#[allow(dead_code)]
fn movie(id: &str, title: &str, genres: &[&str], director: &str) -> Document {
    let mut fields = BTreeMap::new();
    fields.insert(
        FieldName::new("@genre").unwrap(),
        genres.iter().map(|g| g.to_string()).collect(),
    );
    fields.insert(FieldName::new("@director").unwrap(), vec![director.to_string()]);
    Document {
        id: id.to_string(),
        title: title.to_string(),
        body: String::new(),
        fields,
    }
}

/// Movies used by the tool handler tests.
#[allow(dead_code)]
pub fn movies() -> Vec<Document> {
    vec![
        movie("1", "The Cowboy Way", &["Western", "Comedy"], "Gregg Champion"),
        movie("2", "Cowboys & Aliens", &["Western", "Science Fiction"], "Jon Favreau"),
        movie("3", "Space Cowboys", &["Adventure", "Drama"], "Clint Eastwood"),
        movie("4", "Unforgiven", &["Western", "Drama"], "Clint Eastwood"),
        movie("5", "Amélie", &["Comedy", "Romance"], "Jean-Pierre Jeunet"),
        movie("6", "Alien", &["Science Fiction", "Horror"], "Ridley Scott"),
    ]
}

#[allow(dead_code)]
#[fixture]
pub fn movie_state() -> SuggestState {
    facet_suggest::tracing::init();
    SuggestState::new(
        FieldIndex::new(movies()),
        SuggestionOptions::new(FieldName::new("@genre").unwrap()),
    )
}
