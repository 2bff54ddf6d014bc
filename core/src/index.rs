use crate::DocId;
use std::collections::BTreeMap;

/// Postings for one word: document id to normalized term frequency.
pub type Postings = BTreeMap<DocId, f64>;

/// word -> document -> weight. Ordered maps keep scoring summation order reproducible.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    postings: BTreeMap<String, Postings>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Record one document's non-stop tokens. Repeated tokens accumulate, so each
    /// word ends up weighted by its share of the document's token count.
    pub fn insert_document<'a, I>(&mut self, doc_id: DocId, words: I)
    where
        I: IntoIterator<Item = &'a str>,
        I::IntoIter: ExactSizeIterator,
    {
        let words = words.into_iter();
        if words.len() == 0 {
            return;
        }
        let inv_word_count = 1.0 / words.len() as f64;
        for word in words {
            *self
                .postings
                .entry(word.to_string())
                .or_default()
                .entry(doc_id)
                .or_insert(0.0) += inv_word_count;
        }
    }

    pub fn postings(&self, word: &str) -> Option<&Postings> {
        self.postings.get(word)
    }

    pub fn contains(&self, word: &str, doc_id: DocId) -> bool {
        self.postings(word).is_some_and(|p| p.contains_key(&doc_id))
    }

    /// Number of documents whose postings include `word`.
    pub fn document_frequency(&self, word: &str) -> usize {
        self.postings(word).map_or(0, BTreeMap::len)
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }
}
