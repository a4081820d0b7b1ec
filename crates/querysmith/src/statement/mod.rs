//! The mutable statement model.
//!
//! A [`Statement`] is parsed once into clause spans, mutated in place through
//! the operations in this module, and rendered back to text on demand.
//!
//! ```
//! use querysmith::{CombinationMode, Statement};
//!
//! let mut stmt = Statement::parse("SELECT id, description FROM `test` WHERE id > 10")?;
//! stmt.where_("status = 1")?.order_by("parent_id")?.limit(10)?;
//! assert_eq!(
//!     stmt.to_string(),
//!     "SELECT id, description FROM `test` WHERE (id > 10) AND (`status` = 1) \
//!      ORDER BY `parent_id` LIMIT 10"
//! );
//! # Ok::<(), querysmith::QueryError>(())
//! ```

mod input;
mod mutate;


use std::fmt;
use std::str::FromStr;

use crate::bind::{self, Bindings};
use crate::clause::ClauseSpan;
use crate::error::{QueryError, QueryResult};
use crate::kind::{Clause, StatementKind};
use crate::split::{self, Clauses};
use crate::subquery::{self, SubqueryRef};

pub use input::{Assignments, Criteria, DuplicateKeyUpdate, LimitInput, Names, Pairs, Params, Row};
pub use mutate::JoinKind;

/// A single MySQL statement held as ordered clause spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    kind: StatementKind,
    clauses: Clauses,
    original: String,
}

impl Statement {
    /// Classify and split `sql`.
    ///
    /// Trailing `;` and surrounding whitespace are dropped. Statements that
    /// are not SELECT/INSERT/UPDATE/DELETE/TRUNCATE parse as
    /// [`StatementKind::Unrecognized`] and render verbatim.
    pub fn parse(sql: &str) -> QueryResult<Self> {
        let text = split::normalize(sql);
        if text.is_empty() {
            return Err(QueryError::parse("empty statement"));
        }
        let kind = StatementKind::classify(text);
        let clauses = split::split(kind, text)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "querysmith",
            kind = ?kind,
            clauses = clauses.iter().filter(|(_, span)| !span.is_empty()).count(),
            "parsed statement"
        );

        Ok(Self {
            kind,
            clauses,
            original: sql.to_string(),
        })
    }

    /// Kind decided at parse time; never changes.
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// The text this statement was parsed from, unmodified.
    pub fn original_text(&self) -> &str {
        &self.original
    }

    /// The statement itself. Kept for callers that hold a wrapper and want
    /// the underlying statement.
    pub fn base_statement(&self) -> &Statement {
        self
    }

    /// Current span of `clause`, or `None` when the clause is not part of
    /// this kind's grammar. Legal but absent clauses return an empty span.
    pub fn clause(&self, clause: Clause) -> Option<&ClauseSpan> {
        self.clauses.get(clause)
    }

    /// Non-empty clauses in canonical order.
    pub fn parts(&self) -> Vec<(Clause, &str)> {
        self.clauses
            .iter()
            .filter(|(_, span)| !span.is_empty())
            .map(|(clause, span)| (clause, span.as_str()))
            .collect()
    }

    /// Render the current clause state.
    ///
    /// Keywords are upper-case, clauses are separated by single spaces and
    /// clause bodies are emitted as stored.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.original.len() + 32);
        match self.kind {
            StatementKind::Select | StatementKind::SelectDistinct => {
                out.push_str(self.kind.verb());
                out.push(' ');
                let columns = self.text(Clause::Columns);
                out.push_str(if columns.is_empty() { "*" } else { columns });
                self.push_clause(&mut out, "FROM", Clause::From);
                self.push_clause(&mut out, "", Clause::Joins);
                self.push_clause(&mut out, "WHERE", Clause::Where);
                self.push_clause(&mut out, "GROUP BY", Clause::GroupBy);
                self.push_clause(&mut out, "HAVING", Clause::Having);
                self.push_clause(&mut out, "ORDER BY", Clause::OrderBy);
                self.push_clause(&mut out, "LIMIT", Clause::Limit);
            }
            StatementKind::Insert => {
                out.push_str("INSERT");
                self.push_clause(&mut out, "", Clause::Modifiers);
                self.push_clause(&mut out, "INTO", Clause::Into);
                let columns = self.text(Clause::Columns);
                if !columns.is_empty() {
                    out.push_str(" (");
                    out.push_str(columns);
                    out.push(')');
                }
                self.push_clause(&mut out, "VALUES", Clause::Values);
                self.push_clause(&mut out, "SET", Clause::Set);
                self.push_clause(&mut out, "", Clause::Subquery);
                self.push_clause(&mut out, "ON DUPLICATE KEY UPDATE", Clause::OnDuplicateKeyUpdate);
            }
            StatementKind::Update => {
                out.push_str("UPDATE");
                self.push_clause(&mut out, "", Clause::Modifiers);
                self.push_clause(&mut out, "", Clause::Table);
                self.push_clause(&mut out, "", Clause::Joins);
                self.push_clause(&mut out, "SET", Clause::Set);
                self.push_clause(&mut out, "WHERE", Clause::Where);
                self.push_clause(&mut out, "ORDER BY", Clause::OrderBy);
                self.push_clause(&mut out, "LIMIT", Clause::Limit);
            }
            StatementKind::Delete => {
                out.push_str("DELETE");
                self.push_clause(&mut out, "", Clause::Modifiers);
                self.push_clause(&mut out, "", Clause::Columns);
                self.push_clause(&mut out, "FROM", Clause::From);
                self.push_clause(&mut out, "", Clause::Joins);
                self.push_clause(&mut out, "WHERE", Clause::Where);
                self.push_clause(&mut out, "ORDER BY", Clause::OrderBy);
                self.push_clause(&mut out, "LIMIT", Clause::Limit);
            }
            StatementKind::Truncate => {
                out.push_str("TRUNCATE TABLE");
                self.push_clause(&mut out, "", Clause::Table);
            }
            StatementKind::Unrecognized => out.push_str(split::normalize(&self.original)),
        }
        out
    }

    fn push_clause(&self, out: &mut String, keyword: &str, clause: Clause) {
        let body = self.text(clause);
        if body.is_empty() {
            return;
        }
        out.push(' ');
        if !keyword.is_empty() {
            out.push_str(keyword);
            out.push(' ');
        }
        out.push_str(body);
    }

    pub(crate) fn text(&self, clause: Clause) -> &str {
        self.clauses.text(clause)
    }

    // ==================== Inspection ====================

    /// Top-level items of the column list.
    ///
    /// Only select statements have an extractable column list; every other
    /// kind fails with [`QueryError::UnsupportedOperation`].
    pub fn columns(&self) -> QueryResult<Vec<String>> {
        if !self.kind.is_select() {
            return Err(QueryError::unsupported(format!(
                "It's not possible to extract columns of a {} query.",
                self.kind.label()
            )));
        }
        let columns = self.clauses.get(Clause::Columns);
        Ok(columns
            .map(|span| span.items().into_iter().map(str::to_string).collect())
            .unwrap_or_default())
    }

    /// Every `SELECT` nested in the rendered statement, in document order.
    pub fn subqueries(&self) -> Vec<SubqueryRef> {
        subquery::locate(&self.render(), self.kind)
    }

    /// Text of the `n`th (1-based) nested `SELECT`, without its enclosing
    /// parentheses. Parse it with [`Statement::parse`] to rewrite it.
    pub fn subquery(&self, n: usize) -> QueryResult<String> {
        let found = self.subqueries();
        let count = found.len();
        n.checked_sub(1)
            .and_then(|i| found.into_iter().nth(i))
            .map(|sub| sub.text)
            .ok_or(QueryError::IndexOutOfRange { index: n, count })
    }

    /// Render with placeholders substituted.
    ///
    /// Named bindings replace `:name` placeholders; unknown names are left in
    /// place. Positional bindings fill `?` placeholders in order. Placeholders
    /// inside string literals are never touched. The statement itself is not
    /// modified.
    pub fn bind(&self, bindings: impl Into<Bindings>) -> String {
        let rendered = self.render();
        match bindings.into() {
            Bindings::Named(values) => bind::bind_named(&rendered, &values),
            Bindings::Positional(values) => bind::substitute_positional(&rendered, &values).0,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for Statement {
    type Err = QueryError;

    fn from_str(s: &str) -> QueryResult<Self> {
        Statement::parse(s)
    }
}

impl TryFrom<&str> for Statement {
    type Error = QueryError;

    fn try_from(s: &str) -> QueryResult<Self> {
        Statement::parse(s)
    }
}
