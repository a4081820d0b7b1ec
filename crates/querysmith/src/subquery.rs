//! Locating nested `SELECT` statements.

use crate::kind::StatementKind;
use crate::quote::{skip_backticked, skip_quoted};
use crate::scan::{find_keyword, matching_paren, starts_with_keyword};

/// A nested `SELECT` found in rendered statement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubqueryRef {
    /// 1-based position in document order.
    pub index: usize,
    /// Byte offset where the subquery starts (its `(` when parenthesized).
    pub start: usize,
    /// Byte offset just past the subquery (its `)` when parenthesized).
    pub end: usize,
    /// The subquery text, without surrounding parentheses.
    pub text: String,
}

/// Find every nested `SELECT` in `sql`, in order of appearance.
///
/// Parenthesized selects are found at any depth. For an insert, the trailing
/// `INSERT ... SELECT` source counts as a subquery too.
pub(crate) fn locate(sql: &str, kind: StatementKind) -> Vec<SubqueryRef> {
    let bytes = sql.as_bytes();
    let mut spans: Vec<(usize, usize, &str)> = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'\'' | b'"' => pos = skip_quoted(bytes, pos),
            b'`' => pos = skip_backticked(bytes, pos),
            b'(' => {
                if starts_with_keyword(&sql[pos + 1..], "SELECT") {
                    if let Some(close) = matching_paren(sql, pos) {
                        spans.push((pos, close + 1, sql[pos + 1..close].trim()));
                    }
                }
                pos += 1;
            }
            _ => pos += 1,
        }
    }

    if kind == StatementKind::Insert {
        if let Some((start, _)) = find_keyword(sql, 1, "SELECT") {
            let end = find_keyword(sql, start, "ON DUPLICATE KEY UPDATE")
                .map_or(sql.len(), |(kw_start, _)| kw_start);
            spans.push((start, end, sql[start..end].trim()));
        }
    }

    spans.sort_by_key(|&(start, _, _)| start);
    spans
        .into_iter()
        .enumerate()
        .map(|(i, (start, end, text))| SubqueryRef {
            index: i + 1,
            start,
            end,
            text: text.to_string(),
        })
        .collect()
}
