//! In-memory field index answering batched field value lookups.

use crate::error::{LookupError, Result};
use crate::provider::{BatchResponse, LookupProvider};
use crate::types::{FieldName, FieldValueCount, ListFieldValuesBatchRequest, ListFieldValuesRequest, QueryFilters};
use ahash::{AHashMap, AHashSet};
use anyhow::Context;
use futures::future::BoxFuture;
use postcard::{from_bytes, to_io};
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write as _;
use std::path::Path;

use super::query::{Expression, parse_expression};
use super::tokenize::{fold_accents, is_stop_word, last_word, tokenize_and_stem, tokenize_words};

/// Document position within the index.
type DocId = u32;

/// An indexed item: free text plus facet field values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub fields: BTreeMap<FieldName, Vec<String>>,
}

impl Document {
    fn searchable_text(&self) -> String {
        let mut text = format!("{} {}", self.title, self.body);
        for value in self.fields.values().flatten() {
            text.push(' ');
            text.push_str(value);
        }
        text
    }
}

/// Posting lists for one spelling variant (as written, or accent-folded).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Postings {
    /// Stemmed term → documents containing it
    stems: AHashMap<String, Vec<DocId>>,
    /// Unstemmed word → documents containing it, ordered for prefix scans
    words: BTreeMap<String, Vec<DocId>>,
}

impl Postings {
    fn add(&mut self, text: &str, doc_id: DocId, stemmer: &Stemmer) {
        for stem in tokenize_and_stem(text, stemmer) {
            push_unique(self.stems.entry(stem).or_default(), doc_id);
        }
        for word in tokenize_words(text) {
            push_unique(self.words.entry(word).or_default(), doc_id);
        }
    }

    fn with_stem(&self, stem: &str) -> AHashSet<DocId> {
        self.stems
            .get(stem)
            .map(|docs| docs.iter().copied().collect())
            .unwrap_or_default()
    }

    fn with_word_prefix(&self, prefix: &str) -> AHashSet<DocId> {
        self.words
            .range(prefix.to_string()..)
            .take_while(|(word, _)| word.starts_with(prefix))
            .flat_map(|(_, docs)| docs.iter().copied())
            .collect()
    }
}

/// Documents are added in id order, so a duplicate can only be the last entry.
fn push_unique(docs: &mut Vec<DocId>, doc_id: DocId) {
    if docs.last() != Some(&doc_id) {
        docs.push(doc_id);
    }
}

/// A searchable collection of documents with per-field value counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldIndex {
    documents: Vec<Document>,
    exact: Postings,
    folded: Postings,
    fields: BTreeSet<FieldName>,
}

impl FieldIndex {
    /// Build an index over `documents`.
    pub fn new(documents: Vec<Document>) -> Self {
        let start = std::time::Instant::now();
        let stemmer = Stemmer::create(Algorithm::English);
        let mut index = Self::default();

        for (position, document) in documents.iter().enumerate() {
            let doc_id = DocId::try_from(position).unwrap_or(DocId::MAX);
            let text = document.searchable_text();
            index.exact.add(&text, doc_id, &stemmer);
            index.folded.add(&fold_accents(&text), doc_id, &stemmer);
            index.fields.extend(document.fields.keys().cloned());
        }
        index.documents = documents;

        tracing::debug!(
            "Indexed {} documents ({} terms, {} fields) in {:?}",
            index.documents.len(),
            index.exact.stems.len(),
            index.fields.len(),
            start.elapsed()
        );
        index
    }

    /// Load documents from a JSON array file and index them.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read documents from {}", path.display()))?;
        let documents: Vec<Document> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse documents in {}", path.display()))?;
        Ok(Self::new(documents))
    }

    /// Load a JSON document file or a binary snapshot, picked by extension.
    pub fn load(path: &Path) -> Result<Self> {
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            Self::from_json_file(path)
        } else {
            Self::load_snapshot(path)
        }
    }

    /// Write the built index as a postcard snapshot.
    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create snapshot {}", path.display()))?;
        let mut writer = to_io(self, std::io::BufWriter::new(file))
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush snapshot {}", path.display()))?;
        tracing::debug!("Wrote index snapshot to {}", path.display());
        Ok(())
    }

    /// Read an index previously written by [`FieldIndex::save_snapshot`].
    pub fn load_snapshot(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to open snapshot {}", path.display()))?;
        let index = from_bytes(&bytes)
            .with_context(|| format!("Failed to deserialize snapshot {}", path.display()))?;
        Ok(index)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Fields carried by at least one document.
    pub fn fields(&self) -> impl Iterator<Item = &FieldName> {
        self.fields.iter()
    }

    /// Count values of one field among documents matching the request and filters.
    ///
    /// Values are ordered by count descending, then by value, and truncated to
    /// the request's `maximum_number_of_values` when set.
    pub fn list_field_values(
        &self,
        request: &ListFieldValuesRequest,
        filters: &QueryFilters,
    ) -> std::result::Result<Vec<FieldValueCount>, LookupError> {
        if !self.fields.contains(&request.field) {
            return Err(LookupError::UnknownField(request.field.to_string()));
        }

        let ignore_accents = request.ignore_accents.unwrap_or(false);
        let mut expressions = filters
            .parts()
            .map(parse_expression)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if let Some(query_override) = &request.query_override {
            expressions.push(Expression::free_text(query_override));
        }

        let stemmer = Stemmer::create(Algorithm::English);
        let mut matching: Option<AHashSet<DocId>> = None;
        for expression in &expressions {
            let docs = self.evaluate(expression, ignore_accents, &stemmer);
            matching = Some(match matching {
                Some(current) => current.intersection(&docs).copied().collect(),
                None => docs,
            });
        }

        let mut counts: AHashMap<&str, u64> = AHashMap::new();
        let mut matching_docs: Vec<DocId> = match matching {
            Some(docs) => docs.into_iter().collect(),
            None => (0..self.documents.len()).filter_map(|i| DocId::try_from(i).ok()).collect(),
        };
        matching_docs.sort_unstable();

        for doc_id in matching_docs {
            let document = &self.documents[doc_id as usize];
            let Some(values) = document.fields.get(&request.field) else {
                continue;
            };
            let distinct: BTreeSet<&str> = values.iter().map(String::as_str).collect();
            for value in distinct {
                *counts.entry(value).or_insert(0) += 1;
            }
        }

        let mut values: Vec<FieldValueCount> = counts
            .into_iter()
            .map(|(value, count)| FieldValueCount::new(value, count))
            .collect();
        values.sort_by(|a, b| {
            b.number_of_results
                .cmp(&a.number_of_results)
                .then_with(|| a.value.cmp(&b.value))
        });
        if let Some(limit) = request.maximum_number_of_values {
            values.truncate(limit);
        }

        Ok(values)
    }

    /// Documents satisfying every clause of `expression`.
    fn evaluate(
        &self,
        expression: &Expression,
        ignore_accents: bool,
        stemmer: &Stemmer,
    ) -> AHashSet<DocId> {
        let mut docs: AHashSet<DocId> = (0..self.documents.len())
            .filter_map(|i| DocId::try_from(i).ok())
            .filter(|&doc_id| {
                expression.fields.iter().all(|clause| {
                    self.documents[doc_id as usize]
                        .fields
                        .get(&clause.field)
                        .is_some_and(|values| clause.matches(values))
                })
            })
            .collect();

        if expression.text.is_empty() {
            return docs;
        }

        let (postings, text) = if ignore_accents {
            (&self.folded, fold_accents(&expression.text))
        } else {
            (&self.exact, std::borrow::Cow::Borrowed(expression.text.as_str()))
        };

        let stems = tokenize_and_stem(&text, stemmer);
        let partial = last_word(&text);
        // A trailing stop word never reaches the stems; it only matches as a prefix.
        let partial_is_stop_word = partial.as_deref().is_some_and(is_stop_word);

        // Every term must match; the last one may still be incomplete, so it
        // also matches as a word prefix.
        for (position, stem) in stems.iter().enumerate() {
            let is_last = !partial_is_stop_word && position + 1 == stems.len();
            let mut term_docs = postings.with_stem(stem);
            if is_last && let Some(word) = &partial {
                term_docs.extend(postings.with_word_prefix(word));
            }
            docs.retain(|doc_id| term_docs.contains(doc_id));
            if docs.is_empty() {
                return docs;
            }
        }

        if partial_is_stop_word && let Some(word) = &partial {
            let term_docs = postings.with_word_prefix(word);
            docs.retain(|doc_id| term_docs.contains(doc_id));
        }

        docs
    }
}

impl LookupProvider for FieldIndex {
    fn list_field_values_batch<'a>(
        &'a self,
        request: &'a ListFieldValuesBatchRequest,
    ) -> BoxFuture<'a, std::result::Result<BatchResponse, LookupError>> {
        Box::pin(async move {
            let response: std::result::Result<BatchResponse, LookupError> = request
                .batch
                .iter()
                .map(|sub_request| self.list_field_values(sub_request, &request.filters))
                .collect();
            tracing::debug!("Answered batch of {} field value requests", request.batch.len());
            response
        })
    }
}
