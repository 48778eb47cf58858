//! Narrow collaborator interfaces the suggestion scorer depends on.

use crate::error::LookupError;
use crate::types::{FieldValueCount, ListFieldValuesBatchRequest, QueryFilters};
use futures::future::BoxFuture;
use std::sync::Arc;

/// Values returned for a batch: one sequence per sub-request, in request order.
pub type BatchResponse = Vec<Vec<FieldValueCount>>;

/// Answers batched field value lookups.
pub trait LookupProvider: Send + Sync {
    /// Run every sub-request of `request` and return one value sequence per
    /// sub-request, preserving order.
    fn list_field_values_batch<'a>(
        &'a self,
        request: &'a ListFieldValuesBatchRequest,
    ) -> BoxFuture<'a, Result<BatchResponse, LookupError>>;
}

/// Gives a point-in-time snapshot of the last executed query.
pub trait QueryContextProvider: Send + Sync {
    fn last_query(&self) -> QueryFilters;
}

/// Gives the values currently selected under a facet state key.
pub trait SelectionProvider: Send + Sync {
    /// Selected values for `key`; empty when nothing is selected.
    fn selected(&self, key: &str) -> Vec<String>;
}

impl<T: LookupProvider + ?Sized> LookupProvider for Arc<T> {
    fn list_field_values_batch<'a>(
        &'a self,
        request: &'a ListFieldValuesBatchRequest,
    ) -> BoxFuture<'a, Result<BatchResponse, LookupError>> {
        (**self).list_field_values_batch(request)
    }
}

impl<T: QueryContextProvider + ?Sized> QueryContextProvider for Arc<T> {
    fn last_query(&self) -> QueryFilters {
        (**self).last_query()
    }
}

impl<T: SelectionProvider + ?Sized> SelectionProvider for Arc<T> {
    fn selected(&self, key: &str) -> Vec<String> {
        (**self).selected(key)
    }
}

/// A fixed query context, for callers that already hold the snapshot.
impl QueryContextProvider for QueryFilters {
    fn last_query(&self) -> QueryFilters {
        self.clone()
    }
}

/// No selections at all.
impl SelectionProvider for () {
    fn selected(&self, _key: &str) -> Vec<String> {
        Vec::new()
    }
}
