//! Query value escaping for the Solr/Lucene standard query parser.
//!
//! Every reserved character is prefixed with `\`:
//! `\ + - ! ( ) : ^ [ ] " { } ~ * ? | & ; /`
//!
//! Whitespace is escaped as well so that a value stays a single term. `&&`
//! and `||` are covered by escaping each `&` and `|`.

const RESERVED: &[char] = &[
    '\\', '+', '-', '!', '(', ')', ':', '^', '[', ']', '"', '{', '}', '~', '*', '?', '|', '&',
    ';', '/',
];

pub(crate) fn is_reserved(c: char) -> bool {
    RESERVED.contains(&c) || c.is_whitespace()
}

/// Escape a literal value for insertion into a query string.
///
/// Must be applied exactly once per value, at the leaf.
pub fn escape_query_chars(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    for c in input.chars() {
        if is_reserved(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
