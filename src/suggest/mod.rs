//! Facet value suggestion scoring and deduplication.

pub(crate) mod facet_values;
pub(crate) mod scoring;

pub use facet_values::{FacetValueSuggestionsProvider, SuggestionOptions};
pub use scoring::{distance_from_total, rank_suggestions};
