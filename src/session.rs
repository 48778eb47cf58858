//! Search session state: the last executed query and the current facet selections.

use crate::provider::{QueryContextProvider, SelectionProvider};
use crate::types::{FieldName, QueryFilters};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Selections keyed by facet state key (`f:@field`).
#[derive(Debug, Default)]
struct SessionState {
    last_query: QueryFilters,
    selections: HashMap<String, Vec<String>>,
}

/// Shared, in-memory search session.
///
/// Readers get point-in-time copies, so a suggestion computation never
/// observes a half-applied update.
#[derive(Debug, Default)]
pub struct Session {
    state: RwLock<SessionState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|poisoned| {
            tracing::error!("Session state lock poisoned, continuing with last written state");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|poisoned| {
            tracing::error!("Session state lock poisoned, continuing with last written state");
            poisoned.into_inner()
        })
    }

    /// Record the query that was just executed.
    pub fn set_last_query(&self, filters: QueryFilters) {
        self.write().last_query = filters;
    }

    /// Replace the selected values for `field`. Duplicates are removed, order kept.
    pub fn select(&self, field: &FieldName, values: Vec<String>) {
        let mut unique: Vec<String> = Vec::with_capacity(values.len());
        for value in values {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }

        let key = field.facet_state_key();
        tracing::debug!("Selecting {} value(s) on {}", unique.len(), key);
        let mut state = self.write();
        if unique.is_empty() {
            state.selections.remove(&key);
        } else {
            state.selections.insert(key, unique);
        }
    }

    pub fn clear_selection(&self, field: &FieldName) {
        self.write().selections.remove(&field.facet_state_key());
    }

    pub fn selected_values(&self, field: &FieldName) -> Vec<String> {
        self.selected(&field.facet_state_key())
    }
}

impl QueryContextProvider for Session {
    fn last_query(&self) -> QueryFilters {
        self.read().last_query.clone()
    }
}

impl SelectionProvider for Session {
    fn selected(&self, key: &str) -> Vec<String> {
        self.read().selections.get(key).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    fn field(name: &str) -> FieldName {
        FieldName::new(name).unwrap()
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        check!(session.last_query() == QueryFilters::default());
        check!(session.selected("f:@genre").is_empty());
    }

    #[test]
    fn test_select_dedupes_and_keys_by_field() {
        let session = Session::new();
        session.select(
            &field("genre"),
            vec!["Western".to_string(), "Comedy".to_string(), "Western".to_string()],
        );
        check!(session.selected("f:@genre") == vec!["Western".to_string(), "Comedy".to_string()]);
        check!(session.selected_values(&field("@genre")).len() == 2);
        check!(session.selected("f:@year").is_empty());
    }

    #[test]
    fn test_empty_selection_clears() {
        let session = Session::new();
        session.select(&field("genre"), vec!["Western".to_string()]);
        session.select(&field("genre"), vec![]);
        check!(session.selected_values(&field("genre")).is_empty());

        session.select(&field("genre"), vec!["Drama".to_string()]);
        session.clear_selection(&field("genre"));
        check!(session.selected_values(&field("genre")).is_empty());
    }

    #[test]
    fn test_last_query_snapshot() {
        let session = Session::new();
        let filters = QueryFilters {
            q: Some("cowboy".to_string()),
            ..QueryFilters::default()
        };
        session.set_last_query(filters.clone());
        check!(session.last_query() == filters);
    }
}
