pub mod config;
pub mod error;
pub mod provider;
pub mod search;
pub mod server;
pub mod session;
pub mod state;
pub mod suggest;
pub mod tools;
pub mod tracing;
pub mod types;

pub use error::{LookupError, SuggestError};
pub use provider::{BatchResponse, LookupProvider, QueryContextProvider, SelectionProvider};
pub use search::{Document, FieldIndex};
pub use session::Session;
pub use state::SuggestState;
pub use suggest::{FacetValueSuggestionsProvider, SuggestionOptions, rank_suggestions};
pub use types::{
    FieldName, FieldValueCount, ListFieldValuesBatchRequest, ListFieldValuesRequest, QueryFilters,
    Suggestion, SuggestionScore,
};
