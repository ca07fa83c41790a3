use std::ops::Range;

use serde::Serialize;

use crate::catalog::query::SuggestionPolicy;
use crate::domain::product::Product;

/// A run of text that either matched the query or did not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub emphasized: bool,
}

/// Text split into alternating plain and matched segments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Highlighted<'a> {
    pub segments: Vec<Segment<'a>>,
}

impl<'a> Highlighted<'a> {
    pub fn is_match(&self) -> bool {
        self.segments.iter().any(|segment| segment.emphasized)
    }

    /// Byte ranges of the emphasized segments within the source text.
    pub fn matched_spans(&self) -> Vec<Range<usize>> {
        let mut offset = 0;
        let mut spans = Vec::new();
        for segment in &self.segments {
            let end = offset + segment.text.len();
            if segment.emphasized {
                spans.push(offset..end);
            }
            offset = end;
        }
        spans
    }

    /// Concatenation of every segment, which is always the source text.
    pub fn plain(&self) -> String {
        self.segments.iter().map(|segment| segment.text).collect()
    }

    /// Source text with each emphasized segment wrapped in `open`/`close`.
    pub fn render(&self, open: &str, close: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if segment.emphasized {
                out.push_str(open);
                out.push_str(segment.text);
                out.push_str(close);
            } else {
                out.push_str(segment.text);
            }
        }
        out
    }
}

/// Splits `text` around every case-insensitive occurrence of `query`.
///
/// Matches are literal, non-overlapping and found left to right. A blank
/// query leaves the text as a single plain segment.
pub fn highlight_match<'a>(text: &'a str, query: &str) -> Highlighted<'a> {
    if query.trim().is_empty() {
        return Highlighted { segments: vec![Segment { text, emphasized: false }] };
    }

    let needle: Vec<char> = query.chars().collect();
    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut cursor = 0;

    while cursor < text.len() {
        if let Some(end) = match_end(text, cursor, &needle) {
            if plain_start < cursor {
                segments.push(Segment { text: &text[plain_start..cursor], emphasized: false });
            }
            segments.push(Segment { text: &text[cursor..end], emphasized: true });
            cursor = end;
            plain_start = end;
        } else {
            cursor += text[cursor..].chars().next().map_or(1, char::len_utf8);
        }
    }

    if plain_start < text.len() {
        segments.push(Segment { text: &text[plain_start..], emphasized: false });
    }

    Highlighted { segments }
}

/// Whether `query` occurs in `text` under the same per-character case folding
/// that `highlight_match` uses, so every match can be emphasized. An empty
/// query is contained everywhere.
pub fn contains_ignore_case(text: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle: Vec<char> = query.chars().collect();
    text.char_indices().any(|(start, _)| match_end(text, start, &needle).is_some())
}

fn match_end(text: &str, start: usize, needle: &[char]) -> Option<usize> {
    let mut haystack = text[start..].char_indices();
    for expected in needle {
        let (_, actual) = haystack.next()?;
        if !chars_eq_ignore_case(actual, *expected) {
            return None;
        }
    }
    Some(haystack.next().map_or(text.len(), |(offset, _)| start + offset))
}

fn chars_eq_ignore_case(left: char, right: char) -> bool {
    left == right || left.to_lowercase().eq(right.to_lowercase())
}

#[derive(Clone, Debug, PartialEq)]
pub struct Suggestion<'a> {
    pub product: &'a Product,
    pub name: Highlighted<'a>,
    pub category: Highlighted<'a>,
}

/// Autocomplete candidates for `term` using the default thresholds.
pub fn suggest<'a>(products: &'a [Product], term: &str) -> Vec<Suggestion<'a>> {
    suggest_with(products, term, SuggestionPolicy::DEFAULT)
}

/// The first `policy.limit` products whose name, description or category
/// contains `term`, in list order. Nothing is suggested until the trimmed term
/// reaches `policy.min_chars`.
pub fn suggest_with<'a>(
    products: &'a [Product],
    term: &str,
    policy: SuggestionPolicy,
) -> Vec<Suggestion<'a>> {
    if !policy.accepts(term) {
        return Vec::new();
    }

    products
        .iter()
        .filter(|product| {
            contains_ignore_case(&product.name, term)
                || contains_ignore_case(&product.description, term)
                || contains_ignore_case(product.category.as_str(), term)
        })
        .take(policy.limit)
        .map(|product| Suggestion {
            product,
            name: highlight_match(&product.name, term),
            category: highlight_match(product.category.as_str(), term),
        })
        .collect()
}
