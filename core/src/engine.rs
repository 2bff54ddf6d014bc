//! The search engine: document ingestion, stop words, ranking and matching.

use crate::document::{average_rating, DocumentData};
use crate::error::{Error, Result};
use crate::index::{InvertedIndex, Postings};
use crate::query::{self, Query};
use crate::tokenizer::{contains_control_chars, split_into_words};
use crate::{DocId, Document, DocumentStatus};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

/// Upper bound on the number of hits returned by a single query.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevance values closer than this are considered tied and ordered by rating.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

#[derive(Debug, Default, Clone)]
pub struct SearchEngine {
    stop_words: BTreeSet<String>,
    index: InvertedIndex,
    documents: BTreeMap<DocId, DocumentData>,
    document_ids: Vec<DocId>,
}

impl SearchEngine {
    pub fn new() -> Self { Self::default() }

    /// Build an engine with an initial stop-word set. Empty entries are ignored.
    pub fn with_stop_words<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = BTreeSet::new();
        for word in stop_words {
            let word = word.as_ref();
            if contains_control_chars(word) {
                return Err(Error::invalid_argument("stop words contain control characters"));
            }
            if !word.is_empty() {
                words.insert(word.to_string());
            }
        }
        Ok(Self { stop_words: words, ..Self::default() })
    }

    /// Build an engine from a space-separated stop-word string.
    pub fn from_stop_words_text(text: &str) -> Result<Self> {
        let mut engine = Self::new();
        engine.set_stop_words(text)?;
        Ok(engine)
    }

    /// Union the words of `text` into the stop-word set. Documents already added keep
    /// the postings they were indexed with.
    pub fn set_stop_words(&mut self, text: &str) -> Result<()> {
        if contains_control_chars(text) {
            return Err(Error::invalid_argument("stop words contain control characters"));
        }
        let before = self.stop_words.len();
        self.stop_words
            .extend(split_into_words(text).map(str::to_string));
        debug!(added = self.stop_words.len() - before, total = self.stop_words.len(), "stop words updated");
        Ok(())
    }

    pub fn add_document(
        &mut self,
        doc_id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if doc_id < 0 {
            return Err(Error::invalid_argument(format!("negative document id {doc_id}")));
        }
        if self.documents.contains_key(&doc_id) {
            return Err(Error::invalid_argument(format!("document {doc_id} already exists")));
        }
        if contains_control_chars(text) {
            return Err(Error::invalid_argument(format!(
                "document {doc_id} contains control characters"
            )));
        }

        let words = self.split_into_words_no_stop(text);
        debug!(doc_id, tokens = words.len(), %status, "adding document");
        self.index.insert_document(doc_id, words.iter().copied());
        self.documents.insert(
            doc_id,
            DocumentData { rating: average_rating(ratings), status },
        );
        self.document_ids.push(doc_id);
        Ok(())
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Id of the document added at insertion `position`.
    pub fn document_id(&self, position: usize) -> Result<DocId> {
        self.document_ids
            .get(position)
            .copied()
            .ok_or(Error::OutOfRange { position, count: self.document_ids.len() })
    }

    /// Ids in insertion order.
    pub fn document_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.document_ids.iter().copied()
    }

    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_by_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_with(raw_query, |_, doc_status, _| doc_status == status)
    }

    /// Rank documents for `raw_query`, keeping only those accepted by
    /// `predicate(id, status, rating)`. At most [`MAX_RESULT_DOCUMENT_COUNT`] hits
    /// are returned, by relevance then rating, both descending.
    pub fn find_top_documents_with<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let query = self.parse_query(raw_query)?;
        let mut matched = self.find_all_documents(&query, predicate);
        sort_by_relevance(&mut matched);
        matched.truncate(MAX_RESULT_DOCUMENT_COUNT);
        Ok(matched)
    }

    /// Plus words of `raw_query` present in `doc_id`, together with its status. If any
    /// minus word is present the word list is empty.
    pub fn match_document(
        &self,
        raw_query: &str,
        doc_id: DocId,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        let query = self.parse_query(raw_query)?;
        let data = self
            .documents
            .get(&doc_id)
            .ok_or(Error::UnknownDocument(doc_id))?;

        if query.minus_words.iter().any(|w| self.index.contains(w, doc_id)) {
            return Ok((Vec::new(), data.status));
        }
        let matched = query
            .plus_words
            .into_iter()
            .filter(|w| self.index.contains(w, doc_id))
            .collect();
        Ok((matched, data.status))
    }

    pub fn postings(&self, word: &str) -> Option<&Postings> {
        self.index.postings(word)
    }

    /// Number of distinct indexed words.
    pub fn term_count(&self) -> usize {
        self.index.num_terms()
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    pub fn stop_words(&self) -> impl Iterator<Item = &str> + '_ {
        self.stop_words.iter().map(String::as_str)
    }

    pub fn document_status(&self, doc_id: DocId) -> Option<DocumentStatus> {
        self.documents.get(&doc_id).map(|d| d.status)
    }

    pub fn document_rating(&self, doc_id: DocId) -> Option<i32> {
        self.documents.get(&doc_id).map(|d| d.rating)
    }

    pub fn parse_query(&self, raw_query: &str) -> Result<Query> {
        query::parse(raw_query, |w| self.is_stop_word(w))
    }

    fn split_into_words_no_stop<'a>(&self, text: &'a str) -> Vec<&'a str> {
        split_into_words(text)
            .filter(|w| !self.is_stop_word(w))
            .collect()
    }

    fn inverse_document_freq(&self, word: &str) -> f64 {
        (self.document_count() as f64 / self.index.document_frequency(word) as f64).ln()
    }

    fn find_all_documents<P>(&self, query: &Query, predicate: P) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let mut relevance: BTreeMap<DocId, f64> = BTreeMap::new();
        for word in &query.plus_words {
            let Some(postings) = self.index.postings(word) else { continue };
            let idf = self.inverse_document_freq(word);
            for (&doc_id, &term_freq) in postings {
                *relevance.entry(doc_id).or_insert(0.0) += term_freq * idf;
            }
        }

        for word in &query.minus_words {
            let Some(postings) = self.index.postings(word) else { continue };
            for doc_id in postings.keys() {
                relevance.remove(doc_id);
            }
        }
        trace!(
            plus = query.plus_words.len(),
            minus = query.minus_words.len(),
            candidates = relevance.len(),
            "scored query"
        );

        relevance
            .into_iter()
            .filter_map(|(doc_id, score)| {
                let data = self.documents.get(&doc_id)?;
                predicate(doc_id, data.status, data.rating)
                    .then(|| Document::new(doc_id, score, data.rating))
            })
            .collect()
    }
}

/// Relevance descending; hits within [`RELEVANCE_EPSILON`] of the head of their band are
/// ordered by rating descending, then id ascending.
fn sort_by_relevance(docs: &mut [Document]) {
    docs.sort_by(|a, b| {
        b.relevance
            .total_cmp(&a.relevance)
            .then_with(|| b.rating.cmp(&a.rating))
            .then_with(|| a.id.cmp(&b.id))
    });
    let mut start = 0;
    while start < docs.len() {
        let head = docs[start].relevance;
        let end = start
            + docs[start..]
                .iter()
                .take_while(|d| (head - d.relevance).abs() < RELEVANCE_EPSILON)
                .count();
        docs[start..end].sort_by(|a, b| b.rating.cmp(&a.rating).then_with(|| a.id.cmp(&b.id)));
        start = end;
    }
}
