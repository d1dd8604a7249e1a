//! In-memory unified search over notes, maps and library records.
//!
//! # Invariants
//! - Blank text with no tags returns nothing.
//! - Results follow kind priority (note, map, book), then insertion order.
//! - Tag filters are OR-matched against normalized tags.

use crate::search::{ResultEntry, ResultKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Default cap on returned results.
pub const DEFAULT_SEARCH_LIMIT: u32 = 50;
const SUBTITLE_MAX_CHARS: usize = 80;

static QUOTED_PHRASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"(.*)"$"#).expect("valid phrase regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Record category. Declaration order is scan priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordKind {
    Note,
    Map,
    Book,
}

impl RecordKind {
    pub const PRIORITY: [RecordKind; 3] = [Self::Note, Self::Map, Self::Book];

    fn result_kind(self) -> ResultKind {
        match self {
            Self::Note => ResultKind::Note,
            Self::Map => ResultKind::Map,
            Self::Book => ResultKind::Book,
        }
    }
}

/// Restricts results to one record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFilter {
    #[default]
    All,
    Kind(RecordKind),
}

impl SearchFilter {
    fn admits(self, kind: RecordKind) -> bool {
        match self {
            Self::All => true,
            Self::Kind(only) => only == kind,
        }
    }
}

/// Searchable record as supplied by the owning module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRecord {
    pub id: String,
    pub kind: RecordKind,
    pub title: String,
    pub searchable_text: String,
    pub tags: Vec<String>,
}

impl SearchRecord {
    pub fn new(id: impl Into<String>, kind: RecordKind, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            searchable_text: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.searchable_text = text.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Search options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free text, or a `"quoted phrase"` matched contiguously.
    pub text: String,
    pub filter: SearchFilter,
    /// OR-matched tag filter; empty means no tag constraint.
    pub tags: Vec<String>,
    /// Maximum number of results; `0` returns nothing.
    pub limit: u32,
}

impl SearchRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filter: SearchFilter::All,
            tags: Vec::new(),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_filter(mut self, filter: SearchFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TextMatcher {
    Phrase(String),
    Terms(Vec<String>),
}

impl TextMatcher {
    fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(captures) = QUOTED_PHRASE_RE.captures(trimmed) {
            let inner = captures.get(1).map_or("", |m| m.as_str());
            if inner.trim().is_empty() {
                return None;
            }
            return Some(Self::Phrase(inner.to_lowercase()));
        }
        Some(Self::Terms(
            trimmed.split_whitespace().map(str::to_lowercase).collect(),
        ))
    }

    fn matches(&self, entry: &IndexedRecord) -> bool {
        let contains =
            |needle: &str| entry.title_lc.contains(needle) || entry.text_lc.contains(needle);
        match self {
            Self::Phrase(phrase) => contains(phrase.as_str()),
            Self::Terms(terms) => terms.iter().all(|term| contains(term.as_str())),
        }
    }
}

#[derive(Debug, Clone)]
struct IndexedRecord {
    record: SearchRecord,
    title_lc: String,
    text_lc: String,
    tags: BTreeSet<String>,
}

/// Unified search index. Records are scanned, not ranked.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<IndexedRecord>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: SearchRecord) {
        let tags = record
            .tags
            .iter()
            .filter_map(|tag| normalize_tag(tag))
            .collect();
        self.entries.push(IndexedRecord {
            title_lc: record.title.to_lowercase(),
            text_lc: record.searchable_text.to_lowercase(),
            tags,
            record,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn search(&self, request: &SearchRequest) -> Vec<ResultEntry> {
        let matcher = TextMatcher::parse(&request.text);
        let wanted_tags: BTreeSet<String> = request
            .tags
            .iter()
            .filter_map(|tag| normalize_tag(tag))
            .collect();

        if (matcher.is_none() && wanted_tags.is_empty()) || request.limit == 0 {
            return Vec::new();
        }

        let limit = usize::try_from(request.limit).unwrap_or(usize::MAX);
        RecordKind::PRIORITY
            .into_iter()
            .filter(|kind| request.filter.admits(*kind))
            .flat_map(|kind| self.entries.iter().filter(move |e| e.record.kind == kind))
            .filter(|entry| matcher.as_ref().map_or(true, |m| m.matches(entry)))
            .filter(|entry| wanted_tags.is_empty() || !entry.tags.is_disjoint(&wanted_tags))
            .take(limit)
            .map(|entry| to_result_entry(&entry.record))
            .collect()
    }
}

impl Extend<SearchRecord> for SearchIndex {
    fn extend<T: IntoIterator<Item = SearchRecord>>(&mut self, iter: T) {
        for record in iter {
            self.insert(record);
        }
    }
}

fn normalize_tag(raw: &str) -> Option<String> {
    let normalized = raw.trim().to_lowercase();
    (!normalized.is_empty()).then_some(normalized)
}

fn to_result_entry(record: &SearchRecord) -> ResultEntry {
    let collapsed = WHITESPACE_RE
        .replace_all(record.searchable_text.trim(), " ")
        .into_owned();
    let subtitle = if collapsed.is_empty() {
        None
    } else if collapsed.chars().count() > SUBTITLE_MAX_CHARS {
        let mut cut: String = collapsed.chars().take(SUBTITLE_MAX_CHARS).collect();
        cut.push('…');
        Some(cut)
    } else {
        Some(collapsed)
    };

    ResultEntry {
        id: record.id.clone(),
        kind: record.kind.result_kind(),
        title: record.title.clone(),
        subtitle,
        location: None,
    }
}

#[cfg(test)]
mod tests {
    use super::{to_result_entry, RecordKind, SearchRecord, TextMatcher};

    #[test]
    fn parses_quoted_text_as_phrase() {
        assert_eq!(
            TextMatcher::parse("  \"Trade Winds\" "),
            Some(TextMatcher::Phrase("trade winds".to_string()))
        );
        assert_eq!(
            TextMatcher::parse("trade  winds"),
            Some(TextMatcher::Terms(vec![
                "trade".to_string(),
                "winds".to_string()
            ]))
        );
        assert_eq!(TextMatcher::parse("\"  \""), None);
        assert_eq!(TextMatcher::parse("   "), None);
    }

    #[test]
    fn subtitle_collapses_whitespace_and_truncates() {
        let record = SearchRecord::new("n1", RecordKind::Note, "t").with_text("a\n\n b");
        assert_eq!(to_result_entry(&record).subtitle.as_deref(), Some("a b"));

        let long = SearchRecord::new("n2", RecordKind::Note, "t").with_text("x".repeat(200));
        let subtitle = to_result_entry(&long).subtitle.unwrap();
        assert_eq!(subtitle.chars().count(), 81);
        assert!(subtitle.ends_with('…'));

        let empty = SearchRecord::new("n3", RecordKind::Note, "t");
        assert_eq!(to_result_entry(&empty).subtitle, None);
    }
}
