//! Thread-safe handle over a [`SearchEngine`].
//!
//! Queries never mutate the index, so they share a read lock; ingestion and stop-word
//! updates take the write lock one at a time.

use crate::engine::SearchEngine;
use crate::error::Result;
use crate::{DocId, Document, DocumentStatus};
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct SharedEngine {
    inner: Arc<RwLock<SearchEngine>>,
}

impl SharedEngine {
    pub fn new(engine: SearchEngine) -> Self {
        Self { inner: Arc::new(RwLock::new(engine)) }
    }

    pub fn add_document(
        &self,
        doc_id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        self.inner.write().add_document(doc_id, text, status, ratings)
    }

    pub fn set_stop_words(&self, text: &str) -> Result<()> {
        self.inner.write().set_stop_words(text)
    }

    pub fn document_count(&self) -> usize {
        self.inner.read().document_count()
    }

    pub fn find_top_documents_with<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        self.inner.read().find_top_documents_with(raw_query, predicate)
    }

    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.inner.read().find_top_documents(raw_query)
    }

    pub fn match_document(&self, raw_query: &str, doc_id: DocId) -> Result<(Vec<String>, DocumentStatus)> {
        self.inner.read().match_document(raw_query, doc_id)
    }

    /// Run `f` against the engine under the read lock.
    pub fn with_engine<R>(&self, f: impl FnOnce(&SearchEngine) -> R) -> R {
        f(&self.inner.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn concurrent_readers_after_ingestion() {
        let shared = SharedEngine::default();
        shared.set_stop_words("the").unwrap();
        let writers: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared
                        .add_document(i, "the quick fox", DocumentStatus::Actual, &[i])
                        .unwrap();
                })
            })
            .collect();
        for w in writers {
            w.join().unwrap();
        }
        shared.add_document(4, "lazy dog", DocumentStatus::Actual, &[]).unwrap();
        assert_eq!(shared.document_count(), 5);

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || shared.find_top_documents("fox").unwrap().len())
            })
            .collect();
        for r in readers {
            assert_eq!(r.join().unwrap(), 4);
        }
        let queue_len = shared.with_engine(|engine| {
            let mut queue = crate::RequestQueue::new(engine);
            queue.add_find_request("dog").unwrap();
            queue.len()
        });
        assert_eq!(queue_len, 1);
    }
}
