//! Argument types accepted by the mutation operations.
//!
//! Each operation takes `impl Into<...>` so callers can pass plain strings,
//! tuples, arrays or maps without naming these types.

use std::collections::{BTreeMap, HashMap};

use crate::quote::Value;

/// One or more column/table/order terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Names(pub Vec<String>);

impl Names {
    pub(crate) fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl From<&str> for Names {
    fn from(v: &str) -> Self {
        Names(vec![v.to_string()])
    }
}

impl From<String> for Names {
    fn from(v: String) -> Self {
        Names(vec![v])
    }
}

impl From<&String> for Names {
    fn from(v: &String) -> Self {
        Names(vec![v.clone()])
    }
}

impl From<Vec<&str>> for Names {
    fn from(v: Vec<&str>) -> Self {
        Names(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Names {
    fn from(v: Vec<String>) -> Self {
        Names(v)
    }
}

impl From<&[&str]> for Names {
    fn from(v: &[&str]) -> Self {
        Names(v.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Names {
    fn from(v: [&str; N]) -> Self {
        Names(v.iter().map(|s| s.to_string()).collect())
    }
}

/// Column/value pairs, kept in caller order.
pub type Pairs = Vec<(String, Value)>;

fn pairs<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Pairs
where
    K: Into<String>,
    V: Into<Value>,
{
    items.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// A `WHERE`/`HAVING` criterion.
#[derive(Debug, Clone, PartialEq)]
pub enum Criteria {
    /// A column name or an expression, optionally with `?` placeholders.
    Expr(String),
    /// `col = value` comparisons joined by `AND`.
    Pairs(Pairs),
}

impl From<&str> for Criteria {
    fn from(v: &str) -> Self {
        Criteria::Expr(v.to_string())
    }
}

impl From<String> for Criteria {
    fn from(v: String) -> Self {
        Criteria::Expr(v)
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for Criteria {
    fn from(v: Vec<(K, V)>) -> Self {
        Criteria::Pairs(pairs(v))
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Criteria {
    fn from(v: [(K, V); N]) -> Self {
        Criteria::Pairs(pairs(v))
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for Criteria {
    fn from(v: BTreeMap<K, V>) -> Self {
        Criteria::Pairs(pairs(v))
    }
}

/// Values bound to a criterion.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Params {
    #[default]
    None,
    /// A single value: compared with `=` for a bare column, or filling the
    /// only placeholder.
    One(Value),
    /// A list: `IN (...)` for a bare column, or one value per placeholder.
    List(Vec<Value>),
}

impl Params {
    pub(crate) fn is_none(&self) -> bool {
        matches!(self, Params::None)
    }

    pub(crate) fn into_values(self) -> Vec<Value> {
        match self {
            Params::None => Vec::new(),
            Params::One(v) => vec![v],
            Params::List(vs) => vs,
        }
    }
}

macro_rules! impl_params_from_scalar {
    ($($t:ty),+) => {
        $(
            impl From<$t> for Params {
                fn from(v: $t) -> Self {
                    Params::One(Value::from(v))
                }
            }
        )+
    };
}

impl_params_from_scalar!(
    i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64, bool, &str, String, &String
);

impl From<Value> for Params {
    fn from(v: Value) -> Self {
        Params::One(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Params {
    fn from(v: Option<T>) -> Self {
        Params::One(Value::from(v))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Params {
    fn from(v: Vec<T>) -> Self {
        Params::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Params {
    fn from(v: [T; N]) -> Self {
        Params::List(v.into_iter().map(Into::into).collect())
    }
}

/// An assignment list for `SET`.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignments {
    /// Raw assignments (`abc=12`). On an insert, a `SELECT` here becomes the
    /// insert's source query.
    Expr(String),
    /// `` `col` = value `` pairs.
    Pairs(Pairs),
}

impl From<&str> for Assignments {
    fn from(v: &str) -> Self {
        Assignments::Expr(v.to_string())
    }
}

impl From<String> for Assignments {
    fn from(v: String) -> Self {
        Assignments::Expr(v)
    }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for Assignments {
    fn from((k, v): (K, V)) -> Self {
        Assignments::Pairs(vec![(k.into(), v.into())])
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for Assignments {
    fn from(v: Vec<(K, V)>) -> Self {
        Assignments::Pairs(pairs(v))
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Assignments {
    fn from(v: [(K, V); N]) -> Self {
        Assignments::Pairs(pairs(v))
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for Assignments {
    fn from(v: BTreeMap<K, V>) -> Self {
        Assignments::Pairs(pairs(v))
    }
}

impl<K: Into<String>, V: Into<Value>> From<HashMap<K, V>> for Assignments {
    fn from(v: HashMap<K, V>) -> Self {
        let mut pairs = pairs(v);
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        Assignments::Pairs(pairs)
    }
}

/// One `VALUES` row.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    /// Raw row content, with or without the surrounding parentheses.
    Expr(String),
    /// Values quoted by type; `Null` renders as `DEFAULT`.
    Values(Vec<Value>),
}

impl From<&str> for Row {
    fn from(v: &str) -> Self {
        Row::Expr(v.to_string())
    }
}

impl From<String> for Row {
    fn from(v: String) -> Self {
        Row::Expr(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Row {
    fn from(v: Vec<T>) -> Self {
        Row::Values(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Row {
    fn from(v: [T; N]) -> Self {
        Row::Values(v.into_iter().map(Into::into).collect())
    }
}

/// Argument of [`Statement::limit`](crate::Statement::limit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitInput {
    Count(u64),
    CountOffset(u64, u64),
    /// Any `LIMIT` body, e.g. `"50 OFFSET 30"` or `"4, 10"`.
    Expr(String),
}

impl From<u64> for LimitInput {
    fn from(v: u64) -> Self {
        LimitInput::Count(v)
    }
}

impl From<(u64, u64)> for LimitInput {
    fn from((count, offset): (u64, u64)) -> Self {
        LimitInput::CountOffset(count, offset)
    }
}

impl From<&str> for LimitInput {
    fn from(v: &str) -> Self {
        LimitInput::Expr(v.to_string())
    }
}

impl From<String> for LimitInput {
    fn from(v: String) -> Self {
        LimitInput::Expr(v)
    }
}

/// Argument of
/// [`Statement::on_duplicate_key_update`](crate::Statement::on_duplicate_key_update).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DuplicateKeyUpdate {
    /// `` `c` = VALUES(`c`) `` for every column the insert writes.
    #[default]
    All,
    /// `` `c` = VALUES(`c`) `` for the listed columns.
    Columns(Vec<String>),
    /// `` `c` = value `` pairs.
    Pairs(Pairs),
}

impl From<&str> for DuplicateKeyUpdate {
    fn from(v: &str) -> Self {
        DuplicateKeyUpdate::Columns(vec![v.to_string()])
    }
}

impl From<String> for DuplicateKeyUpdate {
    fn from(v: String) -> Self {
        DuplicateKeyUpdate::Columns(vec![v])
    }
}

impl From<Vec<&str>> for DuplicateKeyUpdate {
    fn from(v: Vec<&str>) -> Self {
        DuplicateKeyUpdate::Columns(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for DuplicateKeyUpdate {
    fn from(v: Vec<String>) -> Self {
        DuplicateKeyUpdate::Columns(v)
    }
}

impl<const N: usize> From<[&str; N]> for DuplicateKeyUpdate {
    fn from(v: [&str; N]) -> Self {
        DuplicateKeyUpdate::Columns(v.iter().map(|s| s.to_string()).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for DuplicateKeyUpdate {
    fn from(v: Vec<(K, V)>) -> Self {
        DuplicateKeyUpdate::Pairs(pairs(v))
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for DuplicateKeyUpdate {
    fn from(v: [(K, V); N]) -> Self {
        DuplicateKeyUpdate::Pairs(pairs(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_from_scalars_and_lists() {
        assert_eq!(Params::from(1), Params::One(Value::Int(1)));
        assert_eq!(
            Params::from(["a", "b"]),
            Params::List(vec![Value::from("a"), Value::from("b")])
        );
        assert_eq!(Params::from(None::<i32>), Params::One(Value::Null));
        assert!(Params::default().is_none());
    }

    #[test]
    fn names_skip_blank_entries() {
        let names = Names::from(vec!["a", " ", "b "]);
        assert_eq!(names.iter().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(Names::from("").is_empty());
    }

    #[test]
    fn hash_map_assignments_are_sorted() {
        let mut map = HashMap::new();
        map.insert("def", "a");
        map.insert("abc", "b");
        let Assignments::Pairs(pairs) = Assignments::from(map) else {
            panic!("expected pairs");
        };
        assert_eq!(pairs[0].0, "abc");
        assert_eq!(pairs[1].0, "def");
    }
}
