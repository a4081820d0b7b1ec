//! Statement classification and per-kind clause grammar.

use std::fmt;

use crate::scan::keyword_at;

/// The kind of a statement, decided once from its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// `SELECT ...`
    Select,
    /// `SELECT DISTINCT ...`
    SelectDistinct,
    /// `INSERT ...`
    Insert,
    /// `UPDATE ...`
    Update,
    /// `DELETE ...`
    Delete,
    /// `TRUNCATE [TABLE] ...`
    Truncate,
    /// Anything else; rendered verbatim, rejects every clause operation.
    Unrecognized,
}

/// A named clause of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    /// Statement modifiers such as `IGNORE` or `LOW_PRIORITY`.
    Modifiers,
    /// Column list (Select), target list (Delete) or insert column list.
    Columns,
    /// Source table reference, without joins.
    From,
    /// Join chain following the source/target table.
    Joins,
    /// `WHERE` predicate.
    Where,
    /// `GROUP BY` list.
    GroupBy,
    /// `HAVING` predicate.
    Having,
    /// `ORDER BY` list.
    OrderBy,
    /// `LIMIT` count and optional `OFFSET`.
    Limit,
    /// Insert target table.
    Into,
    /// Insert `VALUES` rows.
    Values,
    /// Assignment list.
    Set,
    /// Embedded `SELECT` feeding an insert.
    Subquery,
    /// `ON DUPLICATE KEY UPDATE` assignment list.
    OnDuplicateKeyUpdate,
    /// Update/Truncate target table.
    Table,
}

impl Clause {
    /// Lower-case clause name, as used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Clause::Modifiers => "modifiers",
            Clause::Columns => "columns",
            Clause::From => "from",
            Clause::Joins => "joins",
            Clause::Where => "where",
            Clause::GroupBy => "group by",
            Clause::Having => "having",
            Clause::OrderBy => "order by",
            Clause::Limit => "limit",
            Clause::Into => "into",
            Clause::Values => "values",
            Clause::Set => "set",
            Clause::Subquery => "subquery",
            Clause::OnDuplicateKeyUpdate => "on duplicate key update",
            Clause::Table => "table",
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const SELECT_CLAUSES: &[Clause] = &[
    Clause::Columns,
    Clause::From,
    Clause::Joins,
    Clause::Where,
    Clause::GroupBy,
    Clause::Having,
    Clause::OrderBy,
    Clause::Limit,
];

const INSERT_CLAUSES: &[Clause] = &[
    Clause::Modifiers,
    Clause::Into,
    Clause::Columns,
    Clause::Values,
    Clause::Set,
    Clause::Subquery,
    Clause::OnDuplicateKeyUpdate,
];

const UPDATE_CLAUSES: &[Clause] = &[
    Clause::Modifiers,
    Clause::Table,
    Clause::Joins,
    Clause::Set,
    Clause::Where,
    Clause::OrderBy,
    Clause::Limit,
];

const DELETE_CLAUSES: &[Clause] = &[
    Clause::Modifiers,
    Clause::Columns,
    Clause::From,
    Clause::Joins,
    Clause::Where,
    Clause::OrderBy,
    Clause::Limit,
];

const TRUNCATE_CLAUSES: &[Clause] = &[Clause::Table];

impl StatementKind {
    /// Classify a statement from its first significant keyword(s).
    pub fn classify(sql: &str) -> Self {
        let text = sql.trim_start();
        let offset = sql.len() - text.len();
        let keyword = |kw: &str| keyword_at(sql, offset, kw).is_some();

        if keyword("SELECT") {
            if keyword("SELECT DISTINCT") {
                StatementKind::SelectDistinct
            } else {
                StatementKind::Select
            }
        } else if keyword("INSERT") {
            StatementKind::Insert
        } else if keyword("UPDATE") {
            StatementKind::Update
        } else if keyword("DELETE") {
            StatementKind::Delete
        } else if keyword("TRUNCATE") {
            StatementKind::Truncate
        } else {
            StatementKind::Unrecognized
        }
    }

    /// Legal clauses for this kind, in canonical render order.
    pub fn clauses(self) -> &'static [Clause] {
        match self {
            StatementKind::Select | StatementKind::SelectDistinct => SELECT_CLAUSES,
            StatementKind::Insert => INSERT_CLAUSES,
            StatementKind::Update => UPDATE_CLAUSES,
            StatementKind::Delete => DELETE_CLAUSES,
            StatementKind::Truncate => TRUNCATE_CLAUSES,
            StatementKind::Unrecognized => &[],
        }
    }

    /// Whether `clause` is part of this kind's grammar.
    pub fn allows(self, clause: Clause) -> bool {
        self.clauses().contains(&clause)
    }

    /// `true` for `Select` and `SelectDistinct`.
    pub fn is_select(self) -> bool {
        matches!(self, StatementKind::Select | StatementKind::SelectDistinct)
    }

    /// Leading verb, as rendered.
    pub fn verb(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::SelectDistinct => "SELECT DISTINCT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
            StatementKind::Truncate => "TRUNCATE",
            StatementKind::Unrecognized => "",
        }
    }

    /// Upper-case name used in error messages.
    pub(crate) fn label(self) -> &'static str {
        match self {
            StatementKind::Select | StatementKind::SelectDistinct => "SELECT",
            StatementKind::Unrecognized => "unrecognized",
            other => other.verb(),
        }
    }
}
