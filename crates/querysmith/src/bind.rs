//! Placeholder substitution.
//!
//! Two placeholder styles are understood, both ignored inside string literals
//! and backticked identifiers:
//!
//! - `:name`, replaced from a name → value map; unknown names stay as written.
//! - `?`, filled positionally. A `%` glued to either side (`?%`, `%?`) turns
//!   the placeholder into a `LIKE` pattern: the wildcard joins the value inside
//!   the quoted literal.

use std::collections::{BTreeMap, HashMap};

use crate::error::{QueryError, QueryResult};
use crate::quote::{Value, quote_string, skip_backticked, skip_quoted};
use crate::scan::is_ident_byte;

/// Values for [`Statement::bind`](crate::Statement::bind).
#[derive(Debug, Clone, PartialEq)]
pub enum Bindings {
    /// `:name` → value. Keys may be given with or without the leading `:`.
    Named(BTreeMap<String, Value>),
    /// Values for `?` placeholders, in order.
    Positional(Vec<Value>),
}

impl Bindings {
    /// Named bindings from any `(name, value)` iterator.
    pub fn named<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Bindings::Named(
            items
                .into_iter()
                .map(|(k, v)| {
                    let key: String = k.into();
                    (key.trim_start_matches(':').to_string(), v.into())
                })
                .collect(),
        )
    }

    /// Positional bindings from any value iterator.
    pub fn positional<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Bindings::Positional(items.into_iter().map(Into::into).collect())
    }

    /// A JSON object binds by name, a JSON array binds positionally.
    pub fn from_json(json: serde_json::Value) -> QueryResult<Self> {
        match json {
            serde_json::Value::Object(map) => {
                let values = map
                    .into_iter()
                    .map(|(k, v)| Ok((k, Value::try_from(v)?)))
                    .collect::<QueryResult<Vec<_>>>()?;
                Ok(Bindings::named(values))
            }
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(Value::try_from)
                .collect::<QueryResult<Vec<_>>>()
                .map(Bindings::Positional),
            other => Err(QueryError::invalid_argument(format!(
                "bindings must be a JSON object or array, got {other}"
            ))),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for Bindings {
    fn from(v: Vec<(K, V)>) -> Self {
        Bindings::named(v)
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Bindings {
    fn from(v: [(K, V); N]) -> Self {
        Bindings::named(v)
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for Bindings {
    fn from(v: BTreeMap<K, V>) -> Self {
        Bindings::named(v)
    }
}

impl<K: Into<String>, V: Into<Value>> From<HashMap<K, V>> for Bindings {
    fn from(v: HashMap<K, V>) -> Self {
        Bindings::named(v)
    }
}

impl From<Vec<Value>> for Bindings {
    fn from(v: Vec<Value>) -> Self {
        Bindings::Positional(v)
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Replace `:name` placeholders found in `values`.
pub(crate) fn bind_named(sql: &str, values: &BTreeMap<String, Value>) -> String {
    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len() + 16);
    let mut pos = 0;
    let mut copied = 0;
    let mut bound = 0usize;

    while pos < bytes.len() {
        match bytes[pos] {
            b'\'' | b'"' => pos = skip_quoted(bytes, pos),
            b'`' => pos = skip_backticked(bytes, pos),
            b':' => {
                let prev = pos.checked_sub(1).map(|p| bytes[p]);
                // `::` casts and `a:b` are not placeholders.
                if prev.is_some_and(|b| b == b':' || is_ident_byte(b)) {
                    pos += 1;
                    continue;
                }
                let name_start = pos + 1;
                let mut name_end = name_start;
                while name_end < bytes.len() && is_name_byte(bytes[name_end]) {
                    name_end += 1;
                }
                if name_end == name_start {
                    pos += 1;
                    continue;
                }
                if let Some(value) = values.get(&sql[name_start..name_end]) {
                    out.push_str(&sql[copied..pos]);
                    value.write_sql(&mut out);
                    copied = name_end;
                    bound += 1;
                }
                pos = name_end;
            }
            _ => pos += 1,
        }
    }
    out.push_str(&sql[copied..]);

    #[cfg(feature = "tracing")]
    tracing::trace!(target: "querysmith", bound, "bound named placeholders");
    #[cfg(not(feature = "tracing"))]
    let _ = bound;

    out
}

/// Fill `?` placeholders in order.
///
/// Returns the substituted text and the number of placeholders seen.
/// Placeholders beyond the supplied values are left untouched; surplus values
/// are ignored.
pub(crate) fn substitute_positional(sql: &str, values: &[Value]) -> (String, usize) {
    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len() + values.len() * 8);
    let mut pos = 0;
    let mut copied = 0;
    let mut seen = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'\'' | b'"' => pos = skip_quoted(bytes, pos),
            b'`' => pos = skip_backticked(bytes, pos),
            b'?' => {
                let index = seen;
                seen += 1;
                let Some(value) = values.get(index) else {
                    pos += 1;
                    continue;
                };
                let lead = pos > copied && bytes[pos - 1] == b'%';
                let trail = bytes.get(pos + 1) == Some(&b'%');
                let start = if lead { pos - 1 } else { pos };
                let end = if trail { pos + 2 } else { pos + 1 };

                out.push_str(&sql[copied..start]);
                if lead || trail {
                    let mut pattern = String::new();
                    if lead {
                        pattern.push('%');
                    }
                    pattern.push_str(&value.plain_text());
                    if trail {
                        pattern.push('%');
                    }
                    out.push_str(&quote_string(&pattern));
                } else {
                    value.write_sql(&mut out);
                }
                copied = end;
                pos = end;
            }
            _ => pos += 1,
        }
    }
    out.push_str(&sql[copied..]);
    (out, seen)
}

/// Number of `?` placeholders outside literals.
pub(crate) fn count_positional(sql: &str) -> usize {
    substitute_positional(sql, &[]).1
}
