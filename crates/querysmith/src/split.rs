//! Cut statement text into an ordered set of clause spans.

use crate::clause::{ClauseSpan, LimitSpec};
use crate::error::{QueryError, QueryResult};
use crate::kind::{Clause, StatementKind};
use crate::scan::{find_any_keyword, find_keyword, keyword_at, matching_paren, starts_with_keyword};

/// Keywords that open a join inside a from/table region.
pub(crate) const JOIN_KEYWORDS: &[&str] = &[
    "NATURAL LEFT OUTER JOIN",
    "NATURAL RIGHT OUTER JOIN",
    "NATURAL LEFT JOIN",
    "NATURAL RIGHT JOIN",
    "NATURAL INNER JOIN",
    "NATURAL JOIN",
    "LEFT OUTER JOIN",
    "RIGHT OUTER JOIN",
    "LEFT JOIN",
    "RIGHT JOIN",
    "INNER JOIN",
    "CROSS JOIN",
    "STRAIGHT_JOIN",
    "JOIN",
];

const SELECT_BOUNDARIES: &[(Clause, &str)] = &[
    (Clause::From, "FROM"),
    (Clause::Where, "WHERE"),
    (Clause::GroupBy, "GROUP BY"),
    (Clause::Having, "HAVING"),
    (Clause::OrderBy, "ORDER BY"),
    (Clause::Limit, "LIMIT"),
];

const UPDATE_BOUNDARIES: &[(Clause, &str)] = &[
    (Clause::Set, "SET"),
    (Clause::Where, "WHERE"),
    (Clause::OrderBy, "ORDER BY"),
    (Clause::Limit, "LIMIT"),
];

const DELETE_BOUNDARIES: &[(Clause, &str)] = &[
    (Clause::From, "FROM"),
    (Clause::Where, "WHERE"),
    (Clause::OrderBy, "ORDER BY"),
    (Clause::Limit, "LIMIT"),
];

const INSERT_MODIFIERS: &[&str] = &["LOW_PRIORITY", "DELAYED", "HIGH_PRIORITY", "IGNORE"];
const UPDATE_MODIFIERS: &[&str] = &["LOW_PRIORITY", "IGNORE"];
const DELETE_MODIFIERS: &[&str] = &["LOW_PRIORITY", "QUICK", "IGNORE"];

/// Ordered clause-name → span mapping owned by a statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Clauses {
    spans: Vec<(Clause, ClauseSpan)>,
}

impl Clauses {
    /// Empty spans for every clause legal for `kind`.
    pub(crate) fn for_kind(kind: StatementKind) -> Self {
        Self {
            spans: kind
                .clauses()
                .iter()
                .map(|&clause| (clause, ClauseSpan::default()))
                .collect(),
        }
    }

    pub(crate) fn get(&self, clause: Clause) -> Option<&ClauseSpan> {
        self.spans
            .iter()
            .find(|(c, _)| *c == clause)
            .map(|(_, span)| span)
    }

    /// Clause text, empty when absent.
    pub(crate) fn text(&self, clause: Clause) -> &str {
        self.get(clause).map_or("", ClauseSpan::as_str)
    }

    /// Overwrite a clause. Clauses outside the kind's grammar are ignored;
    /// callers check legality before mutating.
    pub(crate) fn set(&mut self, clause: Clause, text: impl AsRef<str>) {
        if let Some((_, span)) = self.spans.iter_mut().find(|(c, _)| *c == clause) {
            span.set(text);
        }
    }

    pub(crate) fn clear(&mut self, clause: Clause) {
        if let Some((_, span)) = self.spans.iter_mut().find(|(c, _)| *c == clause) {
            span.clear();
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (Clause, &ClauseSpan)> {
        self.spans.iter().map(|(clause, span)| (*clause, span))
    }
}

/// Trim whitespace and trailing statement terminators.
pub(crate) fn normalize(sql: &str) -> &str {
    let mut text = sql.trim();
    while let Some(rest) = text.strip_suffix(';') {
        text = rest.trim_end();
    }
    text
}

/// Split normalized statement text into clauses for `kind`.
pub(crate) fn split(kind: StatementKind, text: &str) -> QueryResult<Clauses> {
    let mut clauses = Clauses::for_kind(kind);
    match kind {
        StatementKind::Select | StatementKind::SelectDistinct => {
            let verb = if kind == StatementKind::SelectDistinct {
                "SELECT DISTINCT"
            } else {
                "SELECT"
            };
            let start = keyword_at(text, 0, verb).unwrap_or(0);
            for (clause, body) in cut(text, start, Clause::Columns, SELECT_BOUNDARIES) {
                store(&mut clauses, clause, body);
            }
        }
        StatementKind::Insert => split_insert(text, &mut clauses)?,
        StatementKind::Update => {
            let start = keyword_at(text, 0, "UPDATE").unwrap_or(0);
            let start = modifiers(text, start, UPDATE_MODIFIERS, &mut clauses);
            for (clause, body) in cut(text, start, Clause::Table, UPDATE_BOUNDARIES) {
                store(&mut clauses, clause, body);
            }
            if clauses.text(Clause::Table).is_empty() {
                return Err(QueryError::parse("UPDATE statement has no target table"));
            }
        }
        StatementKind::Delete => {
            let start = keyword_at(text, 0, "DELETE").unwrap_or(0);
            let start = modifiers(text, start, DELETE_MODIFIERS, &mut clauses);
            if find_keyword(text, start, "FROM").is_none() {
                return Err(QueryError::parse("DELETE statement has no FROM clause"));
            }
            for (clause, body) in cut(text, start, Clause::Columns, DELETE_BOUNDARIES) {
                store(&mut clauses, clause, body);
            }
        }
        StatementKind::Truncate => {
            let mut start = keyword_at(text, 0, "TRUNCATE").unwrap_or(0);
            let rest = &text[start..];
            let offset = rest.len() - rest.trim_start().len();
            if let Some(end) = keyword_at(text, start + offset, "TABLE") {
                start = end;
            }
            let table = text[start..].trim();
            if table.is_empty() {
                return Err(QueryError::parse("TRUNCATE statement has no table"));
            }
            clauses.set(Clause::Table, table);
        }
        StatementKind::Unrecognized => {}
    }
    Ok(clauses)
}

/// Store a region, splitting joins off the from/table region.
///
/// `LIMIT offset, count` is stored as `count OFFSET offset`.
fn store(clauses: &mut Clauses, clause: Clause, body: &str) {
    match clause {
        Clause::From | Clause::Table => {
            let (table, joins) = split_joins(body);
            clauses.set(clause, table);
            clauses.set(Clause::Joins, joins);
        }
        Clause::Limit => clauses.set(clause, LimitSpec::parse(body).render()),
        _ => clauses.set(clause, body),
    }
}

/// Separate the leading table reference from its join chain.
pub(crate) fn split_joins(region: &str) -> (&str, &str) {
    match find_any_keyword(region, 0, JOIN_KEYWORDS) {
        Some((start, _, _)) => (&region[..start], &region[start..]),
        None => (region, ""),
    }
}

/// Slice `text` from `start` into the lead clause and each boundary clause
/// found, searching boundaries in canonical order.
fn cut<'a>(
    text: &'a str,
    start: usize,
    lead: Clause,
    boundaries: &[(Clause, &str)],
) -> Vec<(Clause, &'a str)> {
    let mut found: Vec<(Clause, usize, usize)> = Vec::new();
    let mut cursor = start;
    for &(clause, keyword) in boundaries {
        if let Some((kw_start, kw_end)) = find_keyword(text, cursor, keyword) {
            found.push((clause, kw_start, kw_end));
            cursor = kw_end;
        }
    }

    let lead_end = found.first().map_or(text.len(), |&(_, kw_start, _)| kw_start);
    let mut regions = vec![(lead, &text[start..lead_end])];
    for (i, &(clause, _, body_start)) in found.iter().enumerate() {
        let end = found
            .get(i + 1)
            .map_or(text.len(), |&(_, next_start, _)| next_start);
        regions.push((clause, &text[body_start..end]));
    }
    regions
}

/// Consume statement modifiers after the verb, returning the new offset.
fn modifiers(text: &str, mut pos: usize, allowed: &[&str], clauses: &mut Clauses) -> usize {
    let mut found = Vec::new();
    loop {
        let at = skip_ws(text, pos);
        match allowed.iter().find_map(|m| keyword_at(text, at, m).map(|end| (m, end))) {
            Some((modifier, end)) => {
                found.push(*modifier);
                pos = end;
            }
            None => break,
        }
    }
    clauses.set(Clause::Modifiers, found.join(" "));
    pos
}

fn skip_ws(text: &str, pos: usize) -> usize {
    let rest = &text[pos..];
    pos + (rest.len() - rest.trim_start().len())
}

/// Offset just past a (possibly dotted, possibly backticked) table name.
fn table_name_end(text: &str, start: usize) -> usize {
    let bytes = text.as_bytes();
    let mut pos = start;
    while pos < bytes.len() {
        match bytes[pos] {
            b'`' => {
                pos += 1;
                while pos < bytes.len() && bytes[pos] != b'`' {
                    pos += 1;
                }
                pos += 1;
            }
            b if b.is_ascii_whitespace() || b == b'(' || b == b',' => break,
            _ => pos += 1,
        }
    }
    pos.min(bytes.len())
}

fn split_insert(text: &str, clauses: &mut Clauses) -> QueryResult<()> {
    let start = keyword_at(text, 0, "INSERT").unwrap_or(0);
    let mut pos = modifiers(text, start, INSERT_MODIFIERS, clauses);
    pos = skip_ws(text, pos);
    if let Some(end) = keyword_at(text, pos, "INTO") {
        pos = skip_ws(text, end);
    }

    let target_end = table_name_end(text, pos);
    let target = text[pos..target_end].trim();
    if target.is_empty() {
        return Err(QueryError::parse("INSERT statement has no target table"));
    }
    clauses.set(Clause::Into, target);
    pos = skip_ws(text, target_end);

    if text[pos..].starts_with('(') {
        let close = matching_paren(text, pos)
            .ok_or_else(|| QueryError::parse("unbalanced parenthesis after INSERT target"))?;
        let inner = &text[pos + 1..close];
        if !starts_with_keyword(inner, "SELECT") {
            clauses.set(Clause::Columns, inner);
            pos = skip_ws(text, close + 1);
        }
    }

    let (body_end, update) = match find_keyword(text, pos, "ON DUPLICATE KEY UPDATE") {
        Some((kw_start, kw_end)) => (kw_start, &text[kw_end..]),
        None => (text.len(), ""),
    };
    clauses.set(Clause::OnDuplicateKeyUpdate, update);

    let body = text[pos..body_end].trim();
    if body.is_empty() {
        return Ok(());
    }
    if let Some(end) = keyword_at(body, 0, "VALUES").or_else(|| keyword_at(body, 0, "VALUE")) {
        clauses.set(Clause::Values, &body[end..]);
    } else if let Some(end) = keyword_at(body, 0, "SET") {
        clauses.set(Clause::Set, &body[end..]);
    } else if starts_with_keyword(body, "SELECT") || body.starts_with('(') {
        clauses.set(Clause::Subquery, body);
    } else {
        return Err(QueryError::parse(format!(
            "unexpected '{body}' in INSERT statement"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(sql: &str) -> Vec<(Clause, String)> {
        let kind = StatementKind::classify(sql);
        split(kind, normalize(sql))
            .unwrap()
            .iter()
            .filter(|(_, span)| !span.is_empty())
            .map(|(clause, span)| (clause, span.as_str().to_string()))
            .collect()
    }

    fn owned(expected: &[(Clause, &str)]) -> Vec<(Clause, String)> {
        expected.iter().map(|(c, s)| (*c, s.to_string())).collect()
    }

    #[test]
    fn normalizes_terminators() {
        assert_eq!(normalize("  SELECT 1 ; ;\n"), "SELECT 1");
    }

    #[test]
    fn splits_full_select() {
        let got = parts(
            "SELECT id, description FROM `test` LEFT JOIN x ON test.x_id = x.id \
             WHERE id > 10 GROUP BY type_id HAVING SUM(qty) > 10 ORDER BY xyz LIMIT 4, 10",
        );
        assert_eq!(
            got,
            owned(&[
                (Clause::Columns, "id, description"),
                (Clause::From, "`test`"),
                (Clause::Joins, "LEFT JOIN x ON test.x_id = x.id"),
                (Clause::Where, "id > 10"),
                (Clause::GroupBy, "type_id"),
                (Clause::Having, "SUM(qty) > 10"),
                (Clause::OrderBy, "xyz"),
                (Clause::Limit, "10 OFFSET 4"),
            ])
        );
    }

    #[test]
    fn keywords_inside_subqueries_do_not_split() {
        let got = parts("SELECT a, (SELECT MAX(b) FROM y WHERE y.a = x.a) FROM x WHERE a IN (SELECT a FROM z)");
        assert_eq!(
            got,
            owned(&[
                (Clause::Columns, "a, (SELECT MAX(b) FROM y WHERE y.a = x.a)"),
                (Clause::From, "x"),
                (Clause::Where, "a IN (SELECT a FROM z)"),
            ])
        );
    }

    #[test]
    fn splits_insert_forms() {
        assert_eq!(
            parts("INSERT INTO table (a,b,c) VALUES (1,2,3)"),
            owned(&[
                (Clause::Into, "table"),
                (Clause::Columns, "a,b,c"),
                (Clause::Values, "(1,2,3)"),
            ])
        );
        assert_eq!(
            parts("INSERT IGNORE INTO `test` SET a=1 ON DUPLICATE KEY UPDATE a = a + 1"),
            owned(&[
                (Clause::Modifiers, "IGNORE"),
                (Clause::Into, "`test`"),
                (Clause::Set, "a=1"),
                (Clause::OnDuplicateKeyUpdate, "a = a + 1"),
            ])
        );
        assert_eq!(
            parts("INSERT INTO foo SELECT * FROM bar"),
            owned(&[(Clause::Into, "foo"), (Clause::Subquery, "SELECT * FROM bar")])
        );
    }

    #[test]
    fn splits_update_and_delete() {
        assert_eq!(
            parts("UPDATE `test` LEFT JOIN x ON test.x_id = x.id SET a=1 WHERE b=2 LIMIT 5"),
            owned(&[
                (Clause::Table, "`test`"),
                (Clause::Joins, "LEFT JOIN x ON test.x_id = x.id"),
                (Clause::Set, "a=1"),
                (Clause::Where, "b=2"),
                (Clause::Limit, "5"),
            ])
        );
        assert_eq!(
            parts("DELETE `test`.* FROM `test` WHERE id = 1"),
            owned(&[
                (Clause::Columns, "`test`.*"),
                (Clause::From, "`test`"),
                (Clause::Where, "id = 1"),
            ])
        );
    }

    #[test]
    fn rejects_unparsable_required_clauses() {
        assert!(split(StatementKind::Insert, "INSERT INTO").is_err());
        assert!(split(StatementKind::Delete, "DELETE `test`").is_err());
        assert!(split(StatementKind::Truncate, "TRUNCATE TABLE").is_err());
        assert!(split(StatementKind::Insert, "INSERT INTO t garbage").is_err());
    }
}
