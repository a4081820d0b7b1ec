//! Quoting of identifiers and literal values for injected fragments.
//!
//! - Identifiers are wrapped in backticks per dotted segment (`` `t`.`id` ``),
//!   with embedded backticks doubled.
//! - Strings are double-quoted with MySQL backslash escapes.
//! - Numbers render bare, null renders `NULL`.
//!
//! [`quote_identifiers`] walks free-form SQL (predicates, assignments, join
//! conditions) and quotes every bare identifier it finds while leaving
//! keywords, function names, literals and placeholders untouched.

use std::fmt::Write;

use crate::error::{QueryError, QueryResult};
use crate::scan::is_ident_byte;

/// A scalar value injected into statement text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL `NULL` (`DEFAULT` inside `VALUES` rows).
    Null,
    /// Rendered as `TRUE` / `FALSE`.
    Bool(bool),
    /// Signed integer, rendered bare.
    Int(i64),
    /// Unsigned integer, rendered bare.
    UInt(u64),
    /// Floating point, rendered bare (non-finite values render `NULL`).
    Float(f64),
    /// String, rendered double-quoted and escaped.
    Text(String),
    /// SQL expression copied verbatim (e.g. `NOW()`).
    Raw(String),
}

impl Value {
    /// A verbatim SQL expression.
    ///
    /// # Safety
    /// The text is not escaped; never pass user input here.
    pub fn raw(expr: impl Into<String>) -> Self {
        Value::Raw(expr.into())
    }

    /// `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render as a SQL literal.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        match self {
            Value::Null => out.push_str("NULL"),
            Value::Bool(true) => out.push_str("TRUE"),
            Value::Bool(false) => out.push_str("FALSE"),
            Value::Int(v) => {
                let _ = write!(out, "{v}");
            }
            Value::UInt(v) => {
                let _ = write!(out, "{v}");
            }
            Value::Float(v) if v.is_finite() => {
                let _ = write!(out, "{v}");
            }
            Value::Float(_) => out.push_str("NULL"),
            Value::Text(s) => quote_string_into(s, out),
            Value::Raw(expr) => out.push_str(expr),
        }
    }

    /// Render as an element of a `VALUES` row (`NULL` becomes `DEFAULT`).
    pub(crate) fn to_row_sql(&self) -> String {
        match self {
            Value::Null => "DEFAULT".to_string(),
            other => other.to_sql(),
        }
    }

    /// Unquoted textual form, used when a value is spliced into a `LIKE`
    /// pattern before quoting.
    pub(crate) fn plain_text(&self) -> String {
        match self {
            Value::Text(s) | Value::Raw(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_sql(),
        }
    }
}

macro_rules! impl_value_from {
    ($variant:ident as $target:ty: $($t:ty),+) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(<$target>::from(v))
                }
            }
        )+
    };
}

impl_value_from!(Int as i64: i8, i16, i32, i64);
impl_value_from!(UInt as u64: u8, u16, u32, u64);
impl_value_from!(Float as f64: f32, f64);
impl_value_from!(Bool as bool: bool);

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        u64::try_from(v).map_or_else(|_| Value::Text(v.to_string()), Value::UInt)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(feature = "chrono")]
impl From<chrono::NaiveDate> for Value {
    fn from(v: chrono::NaiveDate) -> Self {
        Value::Text(v.format("%Y-%m-%d").to_string())
    }
}

#[cfg(feature = "chrono")]
impl From<chrono::NaiveDateTime> for Value {
    fn from(v: chrono::NaiveDateTime) -> Self {
        Value::Text(v.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

#[cfg(feature = "chrono")]
impl<Tz: chrono::TimeZone> From<chrono::DateTime<Tz>> for Value {
    fn from(v: chrono::DateTime<Tz>) -> Self {
        Value::from(v.naive_utc())
    }
}

#[cfg(feature = "uuid")]
impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Text(v.hyphenated().to_string())
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = QueryError;

    /// Convert a JSON scalar. Arrays and objects are rejected.
    fn try_from(json: serde_json::Value) -> QueryResult<Self> {
        use serde_json::Value as Json;

        match json {
            Json::Null => Ok(Value::Null),
            Json::Bool(b) => Ok(Value::Bool(b)),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Value::UInt(u))
                } else {
                    n.as_f64().map(Value::Float).ok_or_else(|| {
                        QueryError::invalid_argument(format!("unrepresentable number {n}"))
                    })
                }
            }
            Json::String(s) => Ok(Value::Text(s)),
            other => Err(QueryError::invalid_argument(format!(
                "expected a JSON scalar, got {other}"
            ))),
        }
    }
}

/// Double-quote and escape a string literal.
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    quote_string_into(s, &mut out);
    out
}

fn quote_string_into(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x1a' => out.push_str("\\Z"),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Backtick-quote a single identifier segment, doubling embedded backticks.
fn quote_segment(segment: &str, out: &mut String) {
    out.push('`');
    for ch in segment.chars() {
        if ch == '`' {
            out.push_str("``");
        } else {
            out.push(ch);
        }
    }
    out.push('`');
}

/// One segment of a dotted identifier chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Bare(&'a str),
    Quoted(&'a str),
    Star,
}

/// Split `text` into a dotted identifier chain, or `None` if it is anything
/// else (an expression, an alias form, a literal...).
fn identifier_chain(text: &str) -> Option<Vec<Segment<'_>>> {
    let bytes = text.as_bytes();
    let mut segments = Vec::new();
    let mut pos = 0;

    loop {
        if pos >= bytes.len() {
            return None;
        }
        match bytes[pos] {
            b'`' => {
                let start = pos;
                pos += 1;
                loop {
                    match bytes.get(pos) {
                        Some(b'`') if bytes.get(pos + 1) == Some(&b'`') => pos += 2,
                        Some(b'`') => break,
                        Some(_) => pos += 1,
                        None => return None,
                    }
                }
                pos += 1;
                segments.push(Segment::Quoted(&text[start..pos]));
            }
            b'*' => {
                pos += 1;
                segments.push(Segment::Star);
            }
            _ => {
                let start = pos;
                while pos < bytes.len() && is_ident_byte(bytes[pos]) {
                    pos += 1;
                }
                let word = &text[start..pos];
                if word.is_empty() || word.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                segments.push(Segment::Bare(word));
            }
        }

        match bytes.get(pos) {
            None => break,
            Some(b'.') if !matches!(segments.last(), Some(Segment::Star)) => pos += 1,
            Some(_) => return None,
        }
    }

    // `*` may only close a chain.
    let stars = segments.iter().filter(|s| matches!(s, Segment::Star)).count();
    if stars > 1 || (stars == 1 && !matches!(segments.last(), Some(Segment::Star))) {
        return None;
    }
    Some(segments)
}

fn write_chain(segments: &[Segment<'_>], out: &mut String) {
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        match segment {
            Segment::Bare(word) => quote_segment(word, out),
            Segment::Quoted(raw) => out.push_str(raw),
            Segment::Star => out.push('*'),
        }
    }
}

/// Whether `text` is a plain (optionally dotted) identifier.
pub(crate) fn is_identifier(text: &str) -> bool {
    identifier_chain(text.trim())
        .is_some_and(|chain| !chain.iter().any(|s| matches!(s, Segment::Star)))
}

/// Quote an identifier per dotted segment: `test.id` → `` `test`.`id` ``.
///
/// Segments that are already backtick-quoted are kept as written.
pub fn quote_identifier(name: &str) -> String {
    let name = name.trim();
    match identifier_chain(name) {
        Some(chain) => {
            let mut out = String::with_capacity(name.len() + 4);
            write_chain(&chain, &mut out);
            out
        }
        None => {
            let mut out = String::with_capacity(name.len() + 2);
            quote_segment(name, &mut out);
            out
        }
    }
}

/// Quote a column/group/order term.
///
/// Identifier chains are quoted (`test.*` → `` `test`.* ``); anything that
/// looks like an expression, a function call or an aliased term is kept
/// verbatim.
pub fn quote_column(term: &str) -> String {
    let term = term.trim();
    match identifier_chain(term) {
        Some(chain) => {
            let mut out = String::with_capacity(term.len() + 4);
            write_chain(&chain, &mut out);
            out
        }
        None => term.to_string(),
    }
}

/// Quote a table reference: the table name is quoted, an alias or a
/// derived table is kept verbatim.
pub fn quote_table(table: &str) -> String {
    let table = table.trim();
    if table.starts_with('(') {
        return table.to_string();
    }
    let (name, rest) = match table.find(|c: char| c.is_ascii_whitespace()) {
        Some(at) => table.split_at(at),
        None => (table, ""),
    };
    match identifier_chain(name) {
        Some(chain) if !chain.iter().any(|s| matches!(s, Segment::Star)) => {
            let mut out = String::with_capacity(table.len() + 4);
            write_chain(&chain, &mut out);
            out.push_str(rest);
            out
        }
        _ => table.to_string(),
    }
}

/// Words that are never treated as identifiers by [`quote_identifiers`].
const RESERVED: &[&str] = &[
    "ACCESSIBLE", "AGAINST", "ALL", "AND", "ANY", "AS", "ASC", "BETWEEN", "BINARY", "BOOLEAN",
    "BY", "CASE", "CHAR", "CHARACTER", "COLLATE", "CROSS", "CURRENT_DATE", "CURRENT_TIME",
    "CURRENT_TIMESTAMP", "CURRENT_USER", "DATE", "DATETIME", "DAY", "DAY_HOUR", "DAY_MINUTE",
    "DAY_SECOND", "DECIMAL", "DEFAULT", "DESC", "DISTINCT", "DIV", "DOUBLE", "ELSE", "END",
    "ESCAPE", "EXISTS", "EXPANSION", "FALSE", "FLOAT", "FROM", "GROUP", "HAVING", "HOUR",
    "HOUR_MINUTE", "HOUR_SECOND", "IN", "INNER", "INTEGER", "INTERVAL", "IS", "JOIN", "JSON",
    "LANGUAGE", "LEFT", "LIKE", "LIMIT", "LOCALTIME", "LOCALTIMESTAMP", "MICROSECOND", "MINUTE",
    "MINUTE_SECOND", "MOD", "MODE", "MONTH", "NATURAL", "NCHAR", "NOT", "NULL", "OFFSET", "ON",
    "OR", "ORDER", "OUTER", "QUARTER", "QUERY", "REGEXP", "RIGHT", "RLIKE", "SECOND", "SELECT",
    "SEPARATOR", "SIGNED", "SOME", "SOUNDS", "THEN", "TIME", "TIMESTAMP", "TRUE", "UNION",
    "UNKNOWN", "UNSIGNED", "USING", "WEEK", "WHEN", "WHERE", "WITH", "XOR", "YEAR", "YEAR_MONTH",
];

fn is_reserved(word: &str) -> bool {
    RESERVED.iter().any(|kw| kw.eq_ignore_ascii_case(word))
}

/// Backtick-quote every bare identifier in a free-form SQL fragment.
///
/// String literals, backticked identifiers, numbers, `?` and `:name`
/// placeholders, `@variables`, keywords and function names (a word directly
/// followed by `(`) are copied verbatim. Dotted chains are quoted per segment.
pub fn quote_identifiers(sql: &str) -> String {
    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len() + 8);
    let mut pos = 0;
    let mut copied = 0;

    while pos < bytes.len() {
        let b = bytes[pos];
        match b {
            b'\'' | b'"' => {
                pos = skip_quoted(bytes, pos);
            }
            b'`' | b'_' | b'$' | b'a'..=b'z' | b'A'..=b'Z' | 0x80..=0xff => {
                let prev = pos.checked_sub(1).map(|p| bytes[p]);
                let start = pos;
                pos = chain_end(bytes, pos);

                // `:name`, `@var`, and identifiers glued to a number are not ours.
                if matches!(prev, Some(b':' | b'@' | b'.')) || prev.is_some_and(is_ident_byte) {
                    continue;
                }
                let chain_text = &sql[start..pos];
                let Some(chain) = identifier_chain(chain_text) else {
                    continue;
                };
                let next = bytes[pos..].iter().find(|c| !c.is_ascii_whitespace());
                let is_function = next == Some(&b'(');
                // `x'41'`, `_utf8'a'`, `DATE '2020-01-01'`: prefixes of a literal.
                let is_literal_prefix = matches!(next, Some(b'\'' | b'"'));
                let is_keyword = matches!(chain[..], [Segment::Bare(word)] if is_reserved(word));
                let has_bare = chain.iter().any(|s| matches!(s, Segment::Bare(_)));
                if is_function || is_literal_prefix || is_keyword || !has_bare {
                    continue;
                }

                out.push_str(&sql[copied..start]);
                write_chain(&chain, &mut out);
                copied = pos;
            }
            b'0'..=b'9' => {
                while pos < bytes.len() && (is_ident_byte(bytes[pos]) || bytes[pos] == b'.') {
                    pos += 1;
                }
            }
            _ => pos += 1,
        }
    }

    out.push_str(&sql[copied..]);
    out
}

/// Offset just past the string literal starting at `start`.
pub(crate) fn skip_quoted(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b if b == quote => {
                if bytes.get(pos + 1) == Some(&quote) {
                    pos += 2;
                } else {
                    return pos + 1;
                }
            }
            _ => pos += 1,
        }
    }
    bytes.len()
}

/// Offset just past the backticked identifier starting at `start`.
pub(crate) fn skip_backticked(bytes: &[u8], start: usize) -> usize {
    let mut pos = start + 1;
    while pos < bytes.len() {
        if bytes[pos] == b'`' {
            if bytes.get(pos + 1) == Some(&b'`') {
                pos += 2;
                continue;
            }
            return pos + 1;
        }
        pos += 1;
    }
    bytes.len()
}

/// Offset just past the dotted identifier chain starting at `start`.
fn chain_end(bytes: &[u8], start: usize) -> usize {
    let mut pos = start;
    loop {
        if bytes.get(pos) == Some(&b'`') {
            pos += 1;
            while pos < bytes.len() {
                if bytes[pos] == b'`' {
                    if bytes.get(pos + 1) == Some(&b'`') {
                        pos += 2;
                        continue;
                    }
                    break;
                }
                pos += 1;
            }
            pos = (pos + 1).min(bytes.len());
        } else if bytes.get(pos) == Some(&b'*') && pos > start {
            return pos + 1;
        } else {
            while pos < bytes.len() && is_ident_byte(bytes[pos]) {
                pos += 1;
            }
        }

        match (bytes.get(pos), bytes.get(pos + 1)) {
            (Some(b'.'), Some(&next)) if next == b'`' || next == b'*' || is_ident_byte(next) => {
                pos += 1;
            }
            _ => return pos,
        }
    }
}
