//! # querysmith
//!
//! Inspect and rewrite hand-written MySQL statements without building an AST.
//!
//! ## Features
//!
//! - **Clause-level model**: a statement is classified once and cut into
//!   clause spans; untouched clauses render exactly as written
//! - **Surgical edits**: add columns, tables, joins, predicates, ordering,
//!   limits, assignments and rows with Append / Prepend / Replace semantics
//! - **Safe injection**: identifiers are backtick-quoted and values are
//!   quoted by type before they reach the statement text
//! - **Subqueries**: locate nested `SELECT`s and work on them as statements
//! - **Binding**: substitute `:name` or `?` placeholders at render time
//! - **Named queries**: resolve canonical statements through a pluggable,
//!   process-wide resolver
//!
//! ## Example
//!
//! ```
//! use querysmith::{CombinationMode, Statement};
//!
//! let mut stmt = Statement::parse("SELECT id, description FROM `test` WHERE id > 10")?;
//! stmt.column("abc")?
//!     .where_bind("xyz = ? OR abc = ?", [10, 20])?
//!     .left_join("abc", Some("test.id = abc.idTest"))?
//!     .limit((50, 30))?;
//!
//! assert_eq!(
//!     stmt.to_string(),
//!     "SELECT id, description, `abc` FROM `test` \
//!      LEFT JOIN `abc` ON `test`.`id` = `abc`.`idTest` \
//!      WHERE (id > 10) AND (`xyz` = 10 OR `abc` = 20) LIMIT 50 OFFSET 30"
//! );
//!
//! stmt.where_with("status", 1, CombinationMode::Replace)?;
//! assert_eq!(stmt.clause(querysmith::Clause::Where).unwrap().as_str(), "`status` = 1");
//! # Ok::<(), querysmith::QueryError>(())
//! ```

pub mod bind;
pub mod clause;
pub mod error;
pub mod kind;
pub mod named;
pub mod quote;
pub mod statement;
pub mod subquery;

mod scan;
mod split;

pub use bind::Bindings;
pub use clause::{ClauseSpan, CombinationMode, Direction};
pub use error::{QueryError, QueryResult};
pub use kind::{Clause, StatementKind};
pub use named::{NamedQueries, Resolver};
pub use quote::{Value, quote_column, quote_identifier, quote_identifiers, quote_string, quote_table};
pub use statement::{
    Assignments, Criteria, DuplicateKeyUpdate, JoinKind, LimitInput, Names, Pairs, Params, Row,
    Statement,
};
pub use subquery::SubqueryRef;

/// Parse `sql` into a [`Statement`].
pub fn parse(sql: &str) -> QueryResult<Statement> {
    Statement::parse(sql)
}
