//! Query matching against formatted documents.
//!
//! A document matches a query when the document's `match_format` rendering
//! satisfies the query. Two modes are supported:
//!
//! - **Regex** (default): whitespace in the query means "anything in between",
//!   so `knuth 1984` matches any text containing `knuth` followed later by
//!   `1984`. Matching is case-insensitive. A query that is not a valid regular
//!   expression is matched literally.
//! - **Fuzzy**: every whitespace-separated token must fuzzy-match the text
//!   (Skim algorithm), in any order.
//!
//! An empty query matches every document.

use crate::domain::{format_document, Document};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use regex::{Regex, RegexBuilder};
use std::cell::RefCell;
use std::str::FromStr;

/// Decides whether a document satisfies a query.
pub trait DocumentMatcher {
    /// Returns `true` if `document`, rendered with `format`, matches `query`.
    fn matches(&self, document: &Document, query: &str, format: &str) -> bool;
}

/// Matching algorithm selected by the `match_mode` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Case-insensitive regular expression, whitespace as wildcard.
    #[default]
    Regex,
    /// Skim fuzzy matching per token.
    Fuzzy,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regex" => Ok(Self::Regex),
            "fuzzy" => Ok(Self::Fuzzy),
            other => Err(format!("unknown match mode '{other}'")),
        }
    }
}

/// Stateful matcher caching the compiled form of the last query.
///
/// Filtering runs the matcher once per document with the same query, so the
/// regex is compiled once per distinct query.
pub struct Matcher {
    mode: MatchMode,
    fuzzy: SkimMatcherV2,
    compiled: RefCell<Option<(String, Option<Regex>)>>,
}

impl Matcher {
    /// Creates a matcher for the given mode.
    #[must_use]
    pub fn new(mode: MatchMode) -> Self {
        Self {
            mode,
            fuzzy: SkimMatcherV2::default(),
            compiled: RefCell::new(None),
        }
    }

    /// Character ranges of `text` matched by `query`, for highlighting.
    ///
    /// Only fuzzy mode reports ranges; consecutive indices are coalesced into
    /// `(start, end)` pairs with an exclusive end.
    #[must_use]
    pub fn highlight_ranges(&self, text: &str, query: &str) -> Vec<(usize, usize)> {
        let query = query.trim();
        if self.mode != MatchMode::Fuzzy || query.is_empty() {
            return vec![];
        }
        let Some((_score, indices)) = self.fuzzy.fuzzy_indices(text, query) else {
            return vec![];
        };

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for idx in indices {
            match ranges.last_mut() {
                Some((_, end)) if *end == idx => *end = idx + 1,
                _ => ranges.push((idx, idx + 1)),
            }
        }
        ranges
    }

    fn regex_matches(&self, text: &str, query: &str) -> bool {
        let mut compiled = self.compiled.borrow_mut();
        let stale = compiled.as_ref().map_or(true, |(q, _)| q != query);
        if stale {
            *compiled = Some((query.to_string(), compile_query(query)));
        }
        compiled
            .as_ref()
            .and_then(|(_, re)| re.as_ref())
            .is_some_and(|re| re.is_match(text))
    }

    fn fuzzy_matches(&self, text: &str, query: &str) -> bool {
        let text = text.to_lowercase();
        query
            .split_whitespace()
            .map(str::to_lowercase)
            .all(|token| self.fuzzy.fuzzy_match(&text, &token).is_some())
    }
}

impl DocumentMatcher for Matcher {
    fn matches(&self, document: &Document, query: &str, format: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return true;
        }
        let text = format_document(format, document);
        match self.mode {
            MatchMode::Regex => self.regex_matches(&text, query),
            MatchMode::Fuzzy => self.fuzzy_matches(&text, query),
        }
    }
}

impl Clone for Matcher {
    fn clone(&self) -> Self {
        Self::new(self.mode)
    }
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Builds the case-insensitive regex for a query, whitespace meaning `.*`.
///
/// Returns `None` only if even the escaped query exceeds the regex size limit.
fn compile_query(query: &str) -> Option<Regex> {
    let tokens: Vec<&str> = query.split_whitespace().collect();
    let build = |pattern: &str| RegexBuilder::new(pattern).case_insensitive(true).build();

    build(&tokens.join(".*"))
        .or_else(|e| {
            tracing::debug!(query = %query, error = %e, "query is not a regex, matching literally");
            let literal: Vec<String> = tokens.iter().map(|t| regex::escape(t)).collect();
            build(&literal.join(".*"))
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    const FORMAT: &str = "{doc[title]} {doc[author]} {doc[year]}";

    fn doc(title: &str, author: &str, year: u32) -> Document {
        let mut info = BTreeMap::new();
        info.insert("title".to_string(), json!(title));
        info.insert("author".to_string(), json!(author));
        info.insert("year".to_string(), json!(year));
        Document::new(format!("/host/lib/{title}"), info)
    }

    #[test]
    fn empty_query_matches_everything() {
        let m = Matcher::new(MatchMode::Regex);
        assert!(m.matches(&doc("a", "b", 1), "", FORMAT));
        assert!(m.matches(&doc("a", "b", 1), "   ", FORMAT));
    }

    #[test]
    fn regex_mode_treats_whitespace_as_wildcard() {
        let m = Matcher::new(MatchMode::Regex);
        let d = doc("The Art of Computer Programming", "Knuth", 1968);
        assert!(m.matches(&d, "art knuth", FORMAT));
        assert!(m.matches(&d, "KNUTH 19", FORMAT));
        assert!(!m.matches(&d, "knuth art", FORMAT));
        assert!(m.matches(&d, "^the", FORMAT));
    }

    #[test]
    fn invalid_regex_is_matched_literally() {
        let m = Matcher::new(MatchMode::Regex);
        assert!(m.matches(&doc("C++ (draft", "Stroustrup", 1985), "c++ (draft", FORMAT));
        assert!(!m.matches(&doc("Rust", "Klabnik", 2018), "(unclosed", FORMAT));
    }

    #[test]
    fn fuzzy_mode_accepts_tokens_in_any_order() {
        let m = Matcher::new(MatchMode::Fuzzy);
        let d = doc("Purely Functional Data Structures", "Okasaki", 1998);
        assert!(m.matches(&d, "oksk pfds", FORMAT));
        assert!(!m.matches(&d, "zzz", FORMAT));
    }

    #[test]
    fn fuzzy_highlight_ranges_are_coalesced() {
        let m = Matcher::new(MatchMode::Fuzzy);
        let ranges = m.highlight_ranges("okasaki", "oka");
        assert_eq!(ranges, vec![(0, 3)]);
        assert!(Matcher::new(MatchMode::Regex).highlight_ranges("okasaki", "oka").is_empty());
    }

    #[test]
    fn match_mode_parses_case_insensitively() {
        assert_eq!("Fuzzy".parse::<MatchMode>(), Ok(MatchMode::Fuzzy));
        assert_eq!(" regex ".parse::<MatchMode>(), Ok(MatchMode::Regex));
        assert!("glob".parse::<MatchMode>().is_err());
    }
}
