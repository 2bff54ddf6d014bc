/// Control characters (code points 0-31) are never allowed in documents, stop words or queries.
pub fn is_control_char(c: char) -> bool {
    (c as u32) < 0x20
}

pub fn contains_control_chars(text: &str) -> bool {
    text.chars().any(is_control_char)
}

/// Split on spaces, collapsing runs and discarding empty tokens.
pub fn split_into_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ').filter(|w| !w.is_empty())
}
