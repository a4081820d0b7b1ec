//! Process-wide named-query registry.
//!
//! Applications keep canonical statements somewhere (files, a table, a
//! compiled-in map) and install a resolver that turns a name into SQL text.
//! [`NamedQueries::resolve`] then parses the text into a fresh [`Statement`].
//!
//! ```
//! use querysmith::NamedQueries;
//!
//! NamedQueries::configure(|name| format!("SELECT * FROM {name}"));
//! let stmt = NamedQueries::resolve("foo")?;
//! assert_eq!(stmt.to_string(), "SELECT * FROM foo");
//! NamedQueries::reset();
//! # Ok::<(), querysmith::QueryError>(())
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{QueryError, QueryResult};
use crate::statement::Statement;

/// Maps a query name to SQL text.
pub type Resolver = Arc<dyn Fn(&str) -> String + Send + Sync>;

static RESOLVER: RwLock<Option<Resolver>> = RwLock::new(None);

/// Entry point to the process-wide resolver slot.
///
/// The slot is shared by every thread; the last `configure` wins.
pub struct NamedQueries;

impl NamedQueries {
    /// Install `resolver`, replacing any previous one.
    pub fn configure<F>(resolver: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::replace(Some(Arc::new(resolver)));
    }

    /// Remove the installed resolver.
    pub fn reset() {
        Self::replace(None);
    }

    /// Swap the slot's content, returning what was installed before.
    pub fn replace(resolver: Option<Resolver>) -> Option<Resolver> {
        let configured = resolver.is_some();
        let mut slot = RESOLVER.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *slot, resolver);
        drop(slot);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "querysmith",
            configured,
            replaced = previous.is_some(),
            "named query resolver updated"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = configured;

        previous
    }

    /// Whether a resolver is installed.
    pub fn is_configured() -> bool {
        RESOLVER
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Resolve `name` and parse the result into a new statement.
    ///
    /// Fails with [`QueryError::UnconfiguredRegistry`] when no resolver is
    /// installed. The resolver runs outside the lock, so it may itself call
    /// into the registry.
    pub fn resolve(name: &str) -> QueryResult<Statement> {
        let resolver = RESOLVER
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(QueryError::UnconfiguredRegistry)?;

        let sql = resolver(name);

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "querysmith", name, "resolved named query");

        Statement::parse(&sql)
    }
}

impl Statement {
    /// Shorthand for [`NamedQueries::resolve`].
    pub fn named(name: &str) -> QueryResult<Statement> {
        NamedQueries::resolve(name)
    }
}
