//! Clause spans and the merge rules used by the mutation operations.

use crate::scan::{find_char, find_keyword, split_top_level};

/// How a new fragment merges with an existing clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombinationMode {
    /// New fragment goes after the existing content.
    #[default]
    Append,
    /// New fragment goes before the existing content.
    Prepend,
    /// Existing content is discarded.
    Replace,
}

/// Sort direction for `ORDER BY` terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
        }
    }
}

/// The current text of one clause.
///
/// The text is stored without the clause keyword and trimmed. Structured views
/// ([`items`](Self::items), [`rows`](Self::rows)) are derived from it on demand
/// so untouched clauses render byte-for-byte as they were written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClauseSpan {
    text: String,
}

impl ClauseSpan {
    pub(crate) fn new(text: impl AsRef<str>) -> Self {
        Self {
            text: text.as_ref().trim().to_string(),
        }
    }

    /// The clause body.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// `true` when the clause is absent.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Top-level comma-separated items (column, group and order lists).
    pub fn items(&self) -> Vec<&str> {
        split_top_level(&self.text, b',')
    }

    /// Parenthesized row tuples of a `VALUES` clause, parentheses included.
    pub fn rows(&self) -> Vec<&str> {
        self.items()
            .into_iter()
            .filter(|row| row.starts_with('('))
            .collect()
    }

    pub(crate) fn set(&mut self, text: impl AsRef<str>) {
        self.text = text.as_ref().trim().to_string();
    }

    pub(crate) fn clear(&mut self) {
        self.text.clear();
    }
}

/// Merge a comma-separated list fragment.
pub(crate) fn merge_list(existing: &str, new: &str, mode: CombinationMode) -> String {
    merge_with(existing, new, mode, ", ")
}

/// Merge a table reference. The space before the comma is kept for
/// compatibility with historical output (`` `a` , `b` ``).
pub(crate) fn merge_table(existing: &str, new: &str, mode: CombinationMode) -> String {
    merge_with(existing, new, mode, " , ")
}

/// Merge a predicate: both sides parenthesized and joined with `AND`.
pub(crate) fn merge_predicate(existing: &str, new: &str, mode: CombinationMode) -> String {
    match mode {
        CombinationMode::Replace => new.to_string(),
        _ if existing.is_empty() => new.to_string(),
        CombinationMode::Append => format!("({existing}) AND ({new})"),
        CombinationMode::Prepend => format!("({new}) AND ({existing})"),
    }
}

fn merge_with(existing: &str, new: &str, mode: CombinationMode, sep: &str) -> String {
    match mode {
        CombinationMode::Replace => new.to_string(),
        _ if existing.is_empty() => new.to_string(),
        CombinationMode::Append => format!("{existing}{sep}{new}"),
        CombinationMode::Prepend => format!("{new}{sep}{existing}"),
    }
}

/// A `LIMIT` clause split into count and offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LimitSpec<'a> {
    pub count: &'a str,
    pub offset: Option<&'a str>,
}

impl<'a> LimitSpec<'a> {
    /// Read `count`, `count OFFSET offset` or the legacy `offset, count`.
    pub(crate) fn parse(text: &'a str) -> Self {
        let text = text.trim();
        if find_char(text, 0, b',').is_some() {
            let parts = split_top_level(text, b',');
            if let [offset, count] = parts[..] {
                return Self {
                    count,
                    offset: Some(offset),
                };
            }
        }
        if let Some((start, end)) = find_keyword(text, 0, "OFFSET") {
            return Self {
                count: text[..start].trim(),
                offset: Some(text[end..].trim()),
            };
        }
        Self {
            count: text,
            offset: None,
        }
    }

    /// Canonical `count [OFFSET offset]` form.
    pub(crate) fn render(&self) -> String {
        match self.offset {
            Some(offset) => format!("{} OFFSET {}", self.count, offset),
            None => self.count.to_string(),
        }
    }

    /// Numeric count, when it is a plain integer.
    pub(crate) fn numeric_count(&self) -> Option<u64> {
        self.count.parse().ok()
    }
}
