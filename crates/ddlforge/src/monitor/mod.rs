//! Query hooks around statement execution.
//!
//! Hooks registered on a [`Db`](crate::Db) see every statement right before it
//! is sent (and may abort it) and again after the database answered.
//!
//! # Example
//!
//! ```rust,ignore
//! use ddlforge::monitor::{HookAction, QueryEvent, QueryHook};
//!
//! struct NoTempTables;
//!
//! impl QueryHook for NoTempTables {
//!     fn before_query(&self, event: &QueryEvent) -> HookAction {
//!         if event.sql.starts_with("CREATE TEMP") {
//!             HookAction::Abort("temp tables are disabled".into())
//!         } else {
//!             HookAction::Continue
//!         }
//!     }
//! }
//!
//! let db = Db::new(PgDialect::new()).with_hook(NoTempTables);
//! ```

mod types;

#[cfg(feature = "tracing")]
mod tracing_hook;

#[cfg(test)]
mod tests;

pub use types::{HookAction, QueryEvent, QueryHook, QueryResult};

#[cfg(feature = "tracing")]
pub use tracing_hook::TracingQueryHook;

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
