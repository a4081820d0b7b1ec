//! In-place clause mutations.
//!
//! Every operation validates its input and computes the new clause text
//! before touching the statement, so a failed call leaves it unchanged.
//! Successful calls return `&mut Self` for chaining with `?`.

use crate::bind::{count_positional, substitute_positional};
use crate::clause::{CombinationMode, Direction, LimitSpec, merge_list, merge_predicate, merge_table};
use crate::error::{QueryError, QueryResult};
use crate::kind::{Clause, StatementKind};
use crate::quote::{Value, is_identifier, quote_column, quote_identifier, quote_identifiers, quote_table};
use crate::scan::{find_char, split_top_level, starts_with_keyword};

use super::Statement;
use super::input::{Assignments, Criteria, DuplicateKeyUpdate, LimitInput, Names, Pairs, Params, Row};

/// Join flavour for [`Statement::join_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

fn non_empty<'a>(text: &'a str, what: &str) -> QueryResult<&'a str> {
    let text = text.trim();
    if text.is_empty() {
        Err(QueryError::invalid_argument(format!("{what} must not be empty")))
    } else {
        Ok(text)
    }
}

fn quoted_names(names: &Names, direction: Option<Direction>) -> QueryResult<String> {
    if names.is_empty() {
        return Err(QueryError::invalid_argument("expected at least one column"));
    }
    Ok(names
        .iter()
        .map(|name| match direction {
            Some(dir) => format!("{} {}", quote_column(name), dir.keyword()),
            None => quote_column(name),
        })
        .collect::<Vec<_>>()
        .join(", "))
}

fn quoted_pairs(pairs: &Pairs) -> String {
    pairs
        .iter()
        .map(|(column, value)| format!("{} = {}", quote_identifier(column), value.to_sql()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `` `col` = value ``, `` `col` IS NULL `` or `` `col` IN (...) ``.
fn comparison(column: &str, params: Params) -> String {
    let column = quote_identifier(column);
    match params {
        Params::None => column,
        Params::One(value) if value.is_null() => format!("{column} IS NULL"),
        Params::One(value) => format!("{column} = {}", value.to_sql()),
        Params::List(values) if values.is_empty() => format!("{column} IN (NULL)"),
        Params::List(values) => format!(
            "{column} IN ({})",
            values.iter().map(Value::to_sql).collect::<Vec<_>>().join(", ")
        ),
    }
}

/// Build a predicate from criteria and parameters.
fn predicate(criteria: Criteria, params: Params) -> QueryResult<String> {
    match criteria {
        Criteria::Pairs(pairs) => {
            if pairs.is_empty() {
                return Err(QueryError::invalid_argument("criteria map must not be empty"));
            }
            if !params.is_none() {
                return Err(QueryError::invalid_argument(
                    "parameters cannot be combined with a criteria map",
                ));
            }
            Ok(pairs
                .into_iter()
                .map(|(column, value)| comparison(&column, Params::One(value)))
                .collect::<Vec<_>>()
                .join(" AND "))
        }
        Criteria::Expr(expr) => {
            let expr = non_empty(&expr, "criteria")?;
            if params.is_none() {
                return Ok(quote_identifiers(expr));
            }
            let placeholders = count_positional(expr);
            if placeholders == 0 && is_identifier(expr) {
                return Ok(comparison(expr, params));
            }
            let values = params.into_values();
            if placeholders != values.len() {
                return Err(QueryError::invalid_argument(format!(
                    "criteria has {placeholders} placeholder(s) but {} value(s) were given",
                    values.len()
                )));
            }
            Ok(substitute_positional(&quote_identifiers(expr), &values).0)
        }
    }
}

impl Statement {
    fn require(&self, operation: &str, allowed: bool) -> QueryResult<()> {
        if allowed {
            Ok(())
        } else {
            Err(QueryError::unsupported(format!(
                "Unable to apply {operation}() to a {} query.",
                self.kind.label()
            )))
        }
    }

    fn is_filtered(&self) -> bool {
        self.kind.is_select() || matches!(self.kind, StatementKind::Update | StatementKind::Delete)
    }

    fn write(&mut self, operation: &str, mode: CombinationMode, clause: Clause, text: String) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "querysmith",
            operation,
            kind = ?self.kind,
            mode = ?mode,
            clause = %clause,
            "statement mutated"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = (operation, mode);

        self.clauses.set(clause, text);
    }

    // ==================== Columns ====================

    /// Append columns to the column list (Select, Delete target list, Insert
    /// column list).
    pub fn column(&mut self, names: impl Into<Names>) -> QueryResult<&mut Self> {
        self.column_with(names, CombinationMode::Append)
    }

    pub fn column_with(
        &mut self,
        names: impl Into<Names>,
        mode: CombinationMode,
    ) -> QueryResult<&mut Self> {
        self.require(
            "column",
            self.kind.is_select() || matches!(self.kind, StatementKind::Delete | StatementKind::Insert),
        )?;
        let fragment = quoted_names(&names.into(), None)?;
        let merged = merge_list(self.text(Clause::Columns), &fragment, mode);
        self.write("column", mode, Clause::Columns, merged);
        Ok(self)
    }

    // ==================== Tables ====================

    /// Replace the source table of a Select or Delete.
    pub fn from(&mut self, table: &str) -> QueryResult<&mut Self> {
        self.from_with(table, CombinationMode::Replace)
    }

    /// Combine with the source table; Append/Prepend produce a comma join.
    pub fn from_with(&mut self, table: &str, mode: CombinationMode) -> QueryResult<&mut Self> {
        self.require(
            "from",
            self.kind.is_select() || self.kind == StatementKind::Delete,
        )?;
        let table = quote_table(non_empty(table, "table")?);
        let merged = merge_table(self.text(Clause::From), &table, mode);
        self.write("from", mode, Clause::From, merged);
        Ok(self)
    }

    /// Replace the insert target (`INTO`).
    pub fn into_table(&mut self, table: &str) -> QueryResult<&mut Self> {
        self.require("into_table", self.kind == StatementKind::Insert)?;
        let table = quote_table(non_empty(table, "table")?);
        self.write("into_table", CombinationMode::Replace, Clause::Into, table);
        Ok(self)
    }

    /// Replace the update target.
    pub fn table(&mut self, table: &str) -> QueryResult<&mut Self> {
        self.table_with(table, CombinationMode::Replace)
    }

    /// Combine with the update target. Truncate statements reject this.
    pub fn table_with(&mut self, table: &str, mode: CombinationMode) -> QueryResult<&mut Self> {
        self.require("table", self.kind == StatementKind::Update)?;
        let table = quote_table(non_empty(table, "table")?);
        let merged = merge_table(self.text(Clause::Table), &table, mode);
        self.write("table", mode, Clause::Table, merged);
        Ok(self)
    }

    // ==================== Joins ====================

    pub fn inner_join(&mut self, table: &str, on: Option<&str>) -> QueryResult<&mut Self> {
        self.join_with(JoinKind::Inner, table, on, CombinationMode::Append)
    }

    pub fn left_join(&mut self, table: &str, on: Option<&str>) -> QueryResult<&mut Self> {
        self.join_with(JoinKind::Left, table, on, CombinationMode::Append)
    }

    pub fn right_join(&mut self, table: &str, on: Option<&str>) -> QueryResult<&mut Self> {
        self.join_with(JoinKind::Right, table, on, CombinationMode::Append)
    }

    /// Add a join to the source (Select/Delete) or target (Update) table.
    ///
    /// - Append: `` base JOIN `t` ON ... ``; an existing join chain is
    ///   parenthesized first so the new join applies to the whole chain.
    /// - Prepend: the new table becomes the base and the previous base (with
    ///   its chain, parenthesized) becomes the joined operand.
    /// - Replace is not supported.
    pub fn join_with(
        &mut self,
        kind: JoinKind,
        table: &str,
        on: Option<&str>,
        mode: CombinationMode,
    ) -> QueryResult<&mut Self> {
        self.require("join", self.is_filtered())?;
        if mode == CombinationMode::Replace {
            return Err(QueryError::unsupported("Replacing joins is not supported."));
        }
        let base_clause = if self.kind == StatementKind::Update {
            Clause::Table
        } else {
            Clause::From
        };
        let base = self.text(base_clause);
        if base.is_empty() {
            return Err(QueryError::unsupported(
                "Unable to add a join: query has no table to join onto.",
            ));
        }

        let table = quote_table(non_empty(table, "table")?);
        let on = match on.map(str::trim) {
            Some(condition) if !condition.is_empty() => {
                format!(" ON {}", quote_identifiers(condition))
            }
            _ => String::new(),
        };
        let joins = self.text(Clause::Joins);

        let (new_base, new_joins) = if mode == CombinationMode::Append {
            let base = if joins.is_empty() {
                base.to_string()
            } else {
                format!("({base} {joins})")
            };
            (base, format!("{} {table}{on}", kind.keyword()))
        } else {
            let chain = if joins.is_empty() {
                base.to_string()
            } else {
                format!("{base} {joins}")
            };
            let operand = if !joins.is_empty() || find_char(base, 0, b',').is_some() {
                format!("({chain})")
            } else {
                chain
            };
            (table, format!("{} {operand}{on}", kind.keyword()))
        };

        self.write("join", mode, base_clause, new_base);
        self.write("join", mode, Clause::Joins, new_joins);
        Ok(self)
    }

    // ==================== Predicates ====================

    /// AND a predicate onto `WHERE`. Bare identifiers are backtick-quoted;
    /// `?` placeholders are left for [`bind`](Self::bind).
    pub fn where_(&mut self, criteria: impl Into<Criteria>) -> QueryResult<&mut Self> {
        self.where_with(criteria, Params::None, CombinationMode::Append)
    }

    /// AND a parameterized predicate onto `WHERE`.
    ///
    /// A bare column compares with `=` (or `IN (...)` for a list); an
    /// expression has its `?` placeholders filled in order.
    pub fn where_bind(
        &mut self,
        criteria: impl Into<Criteria>,
        params: impl Into<Params>,
    ) -> QueryResult<&mut Self> {
        self.where_with(criteria, params, CombinationMode::Append)
    }

    pub fn where_with(
        &mut self,
        criteria: impl Into<Criteria>,
        params: impl Into<Params>,
        mode: CombinationMode,
    ) -> QueryResult<&mut Self> {
        self.require("where", self.is_filtered())?;
        self.add_predicate("where", Clause::Where, criteria.into(), params.into(), mode)
    }

    pub fn having(&mut self, criteria: impl Into<Criteria>) -> QueryResult<&mut Self> {
        self.having_with(criteria, Params::None, CombinationMode::Append)
    }

    pub fn having_bind(
        &mut self,
        criteria: impl Into<Criteria>,
        params: impl Into<Params>,
    ) -> QueryResult<&mut Self> {
        self.having_with(criteria, params, CombinationMode::Append)
    }

    pub fn having_with(
        &mut self,
        criteria: impl Into<Criteria>,
        params: impl Into<Params>,
        mode: CombinationMode,
    ) -> QueryResult<&mut Self> {
        self.require("having", self.kind.is_select())?;
        self.add_predicate("having", Clause::Having, criteria.into(), params.into(), mode)
    }

    fn add_predicate(
        &mut self,
        operation: &str,
        clause: Clause,
        criteria: Criteria,
        params: Params,
        mode: CombinationMode,
    ) -> QueryResult<&mut Self> {
        let fragment = predicate(criteria, params)?;
        let merged = merge_predicate(self.text(clause), &fragment, mode);
        self.write(operation, mode, clause, merged);
        Ok(self)
    }

    // ==================== Grouping and ordering ====================

    pub fn group_by(&mut self, names: impl Into<Names>) -> QueryResult<&mut Self> {
        self.group_by_with(names, CombinationMode::Append)
    }

    pub fn group_by_with(
        &mut self,
        names: impl Into<Names>,
        mode: CombinationMode,
    ) -> QueryResult<&mut Self> {
        self.require("group_by", self.kind.is_select())?;
        let fragment = quoted_names(&names.into(), None)?;
        let merged = merge_list(self.text(Clause::GroupBy), &fragment, mode);
        self.write("group_by", mode, Clause::GroupBy, merged);
        Ok(self)
    }

    /// Sort by the given terms before any existing ones.
    pub fn order_by(&mut self, names: impl Into<Names>) -> QueryResult<&mut Self> {
        self.order_by_with(names, None, CombinationMode::Prepend)
    }

    pub fn order_by_dir(
        &mut self,
        names: impl Into<Names>,
        direction: Direction,
    ) -> QueryResult<&mut Self> {
        self.order_by_with(names, Some(direction), CombinationMode::Prepend)
    }

    /// `direction`, when given, is appended to every term.
    pub fn order_by_with(
        &mut self,
        names: impl Into<Names>,
        direction: Option<Direction>,
        mode: CombinationMode,
    ) -> QueryResult<&mut Self> {
        self.require("order_by", self.is_filtered())?;
        let fragment = quoted_names(&names.into(), direction)?;
        let merged = merge_list(self.text(Clause::OrderBy), &fragment, mode);
        self.write("order_by", mode, Clause::OrderBy, merged);
        Ok(self)
    }

    // ==================== Limits ====================

    /// Replace the `LIMIT` clause.
    ///
    /// Accepts a count, a `(count, offset)` pair, or any `LIMIT` body. The
    /// legacy `offset, count` form is normalized to `count OFFSET offset`.
    pub fn limit(&mut self, limit: impl Into<LimitInput>) -> QueryResult<&mut Self> {
        self.require("limit", self.is_filtered())?;
        let body = match limit.into() {
            LimitInput::Count(count) => count.to_string(),
            LimitInput::CountOffset(count, offset) => format!("{count} OFFSET {offset}"),
            LimitInput::Expr(expr) => LimitSpec::parse(non_empty(&expr, "limit")?).render(),
        };
        self.write("limit", CombinationMode::Replace, Clause::Limit, body);
        Ok(self)
    }

    /// Limit to page `page` (1-based).
    ///
    /// Without an explicit size the current numeric `LIMIT` count is the
    /// page size.
    pub fn page(&mut self, page: u64, size: impl Into<Option<u64>>) -> QueryResult<&mut Self> {
        self.require("page", self.kind.is_select())?;
        if page == 0 {
            return Err(QueryError::invalid_argument("page numbers start at 1"));
        }
        let size = match size.into() {
            Some(size) => size,
            None => LimitSpec::parse(self.text(Clause::Limit))
                .numeric_count()
                .ok_or_else(|| {
                    QueryError::invalid_argument(
                        "Unable to paginate: query has no numeric LIMIT to use as page size.",
                    )
                })?,
        };
        if size == 0 {
            return Err(QueryError::invalid_argument("page size must be greater than zero"));
        }
        let offset = (page - 1)
            .checked_mul(size)
            .ok_or_else(|| QueryError::invalid_argument("page offset overflows"))?;
        self.write(
            "page",
            CombinationMode::Replace,
            Clause::Limit,
            format!("{size} OFFSET {offset}"),
        );
        Ok(self)
    }

    // ==================== Assignments ====================

    pub fn set(&mut self, assignments: impl Into<Assignments>) -> QueryResult<&mut Self> {
        self.set_with(assignments, CombinationMode::Append)
    }

    /// Combine with the `SET` list of an Insert or Update.
    ///
    /// On an Insert, a `SELECT ...` string becomes the insert's source query,
    /// clearing any `SET` list or `VALUES` rows.
    pub fn set_with(
        &mut self,
        assignments: impl Into<Assignments>,
        mode: CombinationMode,
    ) -> QueryResult<&mut Self> {
        self.require(
            "set",
            matches!(self.kind, StatementKind::Insert | StatementKind::Update),
        )?;
        let assignments = assignments.into();

        if self.kind == StatementKind::Insert {
            if let Assignments::Expr(expr) = &assignments {
                if starts_with_keyword(expr, "SELECT") {
                    let source = expr.trim().to_string();
                    self.clauses.clear(Clause::Set);
                    self.clauses.clear(Clause::Values);
                    self.write("set", CombinationMode::Replace, Clause::Subquery, source);
                    return Ok(self);
                }
            }
            if !self.text(Clause::Values).is_empty() || !self.text(Clause::Subquery).is_empty() {
                return Err(QueryError::unsupported(
                    "Unable to add SET assignments: INSERT already has VALUES or a SELECT source.",
                ));
            }
        }

        let fragment = match assignments {
            Assignments::Expr(expr) => quote_identifiers(non_empty(&expr, "assignment")?),
            Assignments::Pairs(pairs) if pairs.is_empty() => {
                return Err(QueryError::invalid_argument("assignment list must not be empty"));
            }
            Assignments::Pairs(pairs) => quoted_pairs(&pairs),
        };
        let merged = merge_list(self.text(Clause::Set), &fragment, mode);
        self.write("set", mode, Clause::Set, merged);
        Ok(self)
    }

    // ==================== Insert rows ====================

    pub fn values(&mut self, row: impl Into<Row>) -> QueryResult<&mut Self> {
        self.values_with(row, CombinationMode::Append)
    }

    /// Combine with the `VALUES` rows of an Insert.
    pub fn values_with(&mut self, row: impl Into<Row>, mode: CombinationMode) -> QueryResult<&mut Self> {
        self.require("values", self.kind == StatementKind::Insert)?;
        if !self.text(Clause::Set).is_empty() || !self.text(Clause::Subquery).is_empty() {
            return Err(QueryError::unsupported(
                "Unable to add VALUES: INSERT already has SET assignments or a SELECT source.",
            ));
        }
        let rows = match row.into() {
            Row::Expr(expr) => {
                let expr = non_empty(&expr, "row")?;
                let tuples = split_top_level(expr, b',');
                if tuples.iter().all(|t| t.starts_with('(') && t.ends_with(')')) {
                    expr.to_string()
                } else {
                    format!("({expr})")
                }
            }
            Row::Values(values) if values.is_empty() => {
                return Err(QueryError::invalid_argument("row must not be empty"));
            }
            Row::Values(values) => format!(
                "({})",
                values.iter().map(Value::to_row_sql).collect::<Vec<_>>().join(", ")
            ),
        };
        let merged = merge_list(self.text(Clause::Values), &rows, mode);
        self.write("values", mode, Clause::Values, merged);
        Ok(self)
    }

    // ==================== ON DUPLICATE KEY UPDATE ====================

    pub fn on_duplicate_key_update(
        &mut self,
        update: impl Into<DuplicateKeyUpdate>,
    ) -> QueryResult<&mut Self> {
        self.on_duplicate_key_update_with(update, CombinationMode::Append)
    }

    /// Combine with the `ON DUPLICATE KEY UPDATE` list of an Insert.
    ///
    /// [`DuplicateKeyUpdate::All`] derives `` `c` = VALUES(`c`) `` for the
    /// insert's column list, or the targets of its `SET` list.
    pub fn on_duplicate_key_update_with(
        &mut self,
        update: impl Into<DuplicateKeyUpdate>,
        mode: CombinationMode,
    ) -> QueryResult<&mut Self> {
        self.require("on_duplicate_key_update", self.kind == StatementKind::Insert)?;
        let fragment = match update.into() {
            DuplicateKeyUpdate::All => {
                let columns = self.written_columns();
                if columns.is_empty() {
                    return Err(QueryError::unsupported(
                        "Unable to derive ON DUPLICATE KEY UPDATE columns: INSERT has no column list.",
                    ));
                }
                values_assignments(columns.iter().map(String::as_str))
            }
            DuplicateKeyUpdate::Columns(columns) => {
                let columns: Vec<&str> = columns
                    .iter()
                    .map(|c| c.trim())
                    .filter(|c| !c.is_empty())
                    .collect();
                if columns.is_empty() {
                    return Err(QueryError::invalid_argument("expected at least one column"));
                }
                values_assignments(columns.into_iter())
            }
            DuplicateKeyUpdate::Pairs(pairs) if pairs.is_empty() => {
                return Err(QueryError::invalid_argument("assignment list must not be empty"));
            }
            DuplicateKeyUpdate::Pairs(pairs) => quoted_pairs(&pairs),
        };
        let merged = merge_list(self.text(Clause::OnDuplicateKeyUpdate), &fragment, mode);
        self.write("on_duplicate_key_update", mode, Clause::OnDuplicateKeyUpdate, merged);
        Ok(self)
    }

    /// Columns an Insert writes: its column list, else its `SET` targets.
    fn written_columns(&self) -> Vec<String> {
        let listed = split_top_level(self.text(Clause::Columns), b',');
        if !listed.is_empty() {
            return listed.into_iter().map(str::to_string).collect();
        }
        split_top_level(self.text(Clause::Set), b',')
            .into_iter()
            .filter_map(|item| find_char(item, 0, b'=').map(|eq| item[..eq].trim().to_string()))
            .filter(|column| !column.is_empty())
            .collect()
    }
}

fn values_assignments<'a>(columns: impl Iterator<Item = &'a str>) -> String {
    columns
        .map(|column| {
            let column = quote_identifier(column);
            format!("{column} = VALUES({column})")
        })
        .collect::<Vec<_>>()
        .join(", ")
}
