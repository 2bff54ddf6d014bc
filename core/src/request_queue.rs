//! Rolling log of recent find requests and how many of them came back empty.

use crate::engine::SearchEngine;
use crate::error::{Error, Result};
use crate::{DocId, Document, DocumentStatus};
use std::collections::VecDeque;
use tracing::debug;

/// One entry per minute over a day.
pub const REQUEST_WINDOW_CAPACITY: usize = 1440;

#[derive(Debug, Clone, Copy)]
struct QueryResult {
    hits: usize,
}

impl QueryResult {
    fn is_empty(&self) -> bool {
        self.hits == 0
    }
}

/// Wraps a [`SearchEngine`] and keeps the outcome of the most recent requests.
/// `no_result_requests` always equals the number of empty entries still in the window.
#[derive(Debug)]
pub struct RequestQueue<'a> {
    engine: &'a SearchEngine,
    requests: VecDeque<QueryResult>,
    capacity: usize,
    no_result_requests: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(engine: &'a SearchEngine) -> Self {
        Self {
            engine,
            requests: VecDeque::with_capacity(REQUEST_WINDOW_CAPACITY),
            capacity: REQUEST_WINDOW_CAPACITY,
            no_result_requests: 0,
        }
    }

    pub fn with_capacity(engine: &'a SearchEngine, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid_argument("request window capacity must be positive"));
        }
        Ok(Self {
            engine,
            requests: VecDeque::with_capacity(capacity),
            capacity,
            no_result_requests: 0,
        })
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        self.add_find_request_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn add_find_request_by_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.add_find_request_with(raw_query, |_, doc_status, _| doc_status == status)
    }

    /// Run the query and record whether it was empty. Failed queries are not recorded.
    pub fn add_find_request_with<P>(&mut self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let docs = self.engine.find_top_documents_with(raw_query, predicate)?;
        self.record(QueryResult { hits: docs.len() });
        Ok(docs)
    }

    pub fn no_result_requests(&self) -> usize {
        self.no_result_requests
    }

    /// Number of requests currently retained.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn record(&mut self, result: QueryResult) {
        // Evict before counting the new entry so the counter never includes a dropped request.
        if self.requests.len() == self.capacity {
            if let Some(evicted) = self.requests.pop_front() {
                if evicted.is_empty() {
                    self.no_result_requests -= 1;
                }
                debug!(evicted_empty = evicted.is_empty(), "request window full, evicted oldest");
            }
        }
        if result.is_empty() {
            self.no_result_requests += 1;
        }
        self.requests.push_back(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SearchEngine {
        let mut engine = SearchEngine::from_stop_words_text("and in at").unwrap();
        engine.add_document(1, "curly cat curly tail", DocumentStatus::Actual, &[7, 2, 7]).unwrap();
        engine.add_document(2, "curly dog and fancy collar", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
        engine.add_document(3, "big cat fancy collar ", DocumentStatus::Actual, &[1, 2, 8]).unwrap();
        engine.add_document(4, "big dog sparrow Eugene", DocumentStatus::Actual, &[1, 3, 2]).unwrap();
        engine.add_document(5, "big dog sparrow Vasiliy", DocumentStatus::Actual, &[1, 1, 1]).unwrap();
        engine
    }

    #[test]
    fn counts_empty_requests_over_a_day() {
        let engine = engine();
        let mut queue = RequestQueue::new(&engine);
        for _ in 0..1439 {
            queue.add_find_request("empty request").unwrap();
        }
        queue.add_find_request("curly dog").unwrap();
        assert_eq!(queue.no_result_requests(), 1439);
        // A new day begins: the first empty request is evicted.
        queue.add_find_request("big collar").unwrap();
        assert_eq!(queue.no_result_requests(), 1438);
        queue.add_find_request("sparrow").unwrap();
        assert_eq!(queue.no_result_requests(), 1437);
        assert_eq!(queue.len(), REQUEST_WINDOW_CAPACITY);
    }

    #[test]
    fn returns_engine_results() {
        let engine = engine();
        let mut queue = RequestQueue::new(&engine);
        let direct = engine.find_top_documents("curly dog").unwrap();
        assert_eq!(queue.add_find_request("curly dog").unwrap(), direct);
        let banned = queue
            .add_find_request_by_status("curly dog", DocumentStatus::Banned)
            .unwrap();
        assert!(banned.is_empty());
        assert_eq!(queue.no_result_requests(), 1);
    }

    #[test]
    fn dirty_query_is_not_recorded() {
        let engine = engine();
        let mut queue = RequestQueue::new(&engine);
        assert!(queue.add_find_request("cat --dog").is_err());
        assert!(queue.is_empty());
        assert_eq!(queue.no_result_requests(), 0);
    }

    #[test]
    fn small_window_evicts_in_order() {
        let engine = engine();
        let mut queue = RequestQueue::with_capacity(&engine, 2).unwrap();
        queue.add_find_request("nothing").unwrap();
        queue.add_find_request("cat").unwrap();
        assert_eq!(queue.no_result_requests(), 1);
        queue.add_find_request("nothing").unwrap();
        assert_eq!(queue.no_result_requests(), 1);
        queue.add_find_request("nothing").unwrap();
        assert_eq!(queue.no_result_requests(), 2);
        assert!(RequestQueue::with_capacity(&engine, 0).is_err());
    }
}
