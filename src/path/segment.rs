//! Parsing of JSON-domain path segments.

use regex::Regex;
use std::sync::LazyLock;

/// Reserved token naming a list index, e.g. `item_3`.
static INDEX_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^item_(\d+)$").expect("index token pattern is valid"));

/// Prefix of list-index tokens.
pub const INDEX_PREFIX: &str = "item_";

/// One hop of a JSON path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Object key.
    Key(&'a str),
    /// Zero-based list index, written `item_<N>`.
    Index(usize),
}

impl<'a> Segment<'a> {
    /// Classifies a raw segment. Tokens of the form `item_<N>` are indices,
    /// everything else is an object key.
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        INDEX_TOKEN
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .and_then(|n| n.as_str().parse::<usize>().ok())
            .map_or(Segment::Key(raw), Segment::Index)
    }
}

/// Renders the token for list index `index`.
#[must_use]
pub fn index_token(index: usize) -> String {
    format!("{INDEX_PREFIX}{index}")
}
