//! Embedded full-text retrieval: an inverted index with normalized term weights,
//! TF-IDF ranking with plus/minus query words, and a rolling log of empty results.

pub mod document;
pub mod engine;
pub mod error;
pub mod index;
pub mod query;
pub mod request_queue;
pub mod shared;
pub mod timing;
pub mod tokenizer;

pub use document::{average_rating, DocId, Document, DocumentStatus};
pub use engine::{SearchEngine, MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_EPSILON};
pub use error::{Error, Result};
pub use index::{InvertedIndex, Postings};
pub use query::Query;
pub use request_queue::{RequestQueue, REQUEST_WINDOW_CAPACITY};
pub use shared::SharedEngine;
