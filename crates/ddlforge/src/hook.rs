//! Model lifecycle hooks for CREATE TABLE.
//!
//! A model opts into a hook by returning itself from the matching capability
//! method on [`Model`](crate::schema::Model). Models that don't are simply
//! skipped.
//!
//! Hooks are async; cancelling the `exec` future cancels the hook with it.

use crate::error::DdlResult;
use crate::query::CreateTableQuery;

/// Runs before the statement is rendered.
///
/// Returning an error aborts `exec` before any SQL is built or sent.
#[async_trait::async_trait]
pub trait BeforeCreateTableHook: Send + Sync {
    async fn before_create_table(&self, query: &CreateTableQuery) -> DdlResult<()>;
}

/// Runs after the statement executed successfully.
///
/// The table already exists when this runs; an error here is reported to the
/// caller but does not undo the CREATE TABLE.
#[async_trait::async_trait]
pub trait AfterCreateTableHook: Send + Sync {
    async fn after_create_table(&self, query: &CreateTableQuery) -> DdlResult<()>;
}
