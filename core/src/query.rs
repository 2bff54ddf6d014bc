//! Query validation and parsing.
//!
//! A raw query is a space-separated list of words. A word prefixed with `-` is a minus
//! word: any document containing it is excluded. Everything else is a plus word and
//! contributes to relevance. Stop words are dropped from both sets.

use crate::error::{Error, Result};
use crate::tokenizer::{is_control_char, split_into_words};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub plus_words: BTreeSet<String>,
    pub minus_words: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryWord<'a> {
    Plus(&'a str),
    Minus(&'a str),
}

impl<'a> QueryWord<'a> {
    fn parse(token: &'a str) -> Self {
        match token.strip_prefix('-') {
            Some(word) => QueryWord::Minus(word),
            None => QueryWord::Plus(token),
        }
    }

    fn word(&self) -> &'a str {
        match *self {
            QueryWord::Plus(w) | QueryWord::Minus(w) => w,
        }
    }
}

/// Reject control characters, `--` anywhere, and a `-` followed by a space or end of text.
pub fn validate(raw_query: &str) -> Result<()> {
    let mut chars = raw_query.chars().peekable();
    while let Some(c) = chars.next() {
        if is_control_char(c) {
            return Err(Error::dirty_query(format!(
                "control character U+{:04X} in query",
                c as u32
            )));
        }
        if c == '-' {
            match chars.peek() {
                Some('-') => return Err(Error::dirty_query("double minus in query")),
                Some(' ') | None => return Err(Error::dirty_query("minus without a word")),
                Some(_) => {}
            }
        }
    }
    Ok(())
}

/// Validate and split `raw_query` into plus and minus word sets, skipping stop words.
pub fn parse<F>(raw_query: &str, is_stop_word: F) -> Result<Query>
where
    F: Fn(&str) -> bool,
{
    validate(raw_query)?;
    let mut query = Query::default();
    for token in split_into_words(raw_query) {
        let query_word = QueryWord::parse(token);
        if is_stop_word(query_word.word()) {
            continue;
        }
        match query_word {
            QueryWord::Plus(w) => query.plus_words.insert(w.to_string()),
            QueryWord::Minus(w) => query.minus_words.insert(w.to_string()),
        };
    }
    Ok(query)
}
