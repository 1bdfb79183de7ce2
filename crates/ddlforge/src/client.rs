//! Execution seam: anything that can run a rendered statement.

use crate::error::DdlResult;

/// A trait that unifies database clients and transactions.
///
/// Rendered statements are fully inlined, so no bind parameters are passed.
/// Cancellation and timeouts belong to the implementation (and to
/// [`DbConfig::query_timeout`](crate::DbConfig::query_timeout)).
pub trait GenericClient: Send + Sync {
    /// Execute a statement and return the number of affected rows.
    fn execute(&self, sql: &str) -> impl std::future::Future<Output = DdlResult<u64>> + Send;

    /// Get a cancel token for best-effort server-side cancellation.
    ///
    /// Default returns `None`.
    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        None
    }
}

impl GenericClient for tokio_postgres::Client {
    async fn execute(&self, sql: &str) -> DdlResult<u64> {
        Ok(tokio_postgres::Client::execute(self, sql, &[]).await?)
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        Some(tokio_postgres::Client::cancel_token(self))
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    async fn execute(&self, sql: &str) -> DdlResult<u64> {
        Ok(tokio_postgres::Transaction::execute(self, sql, &[]).await?)
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        Some(tokio_postgres::Transaction::cancel_token(self))
    }
}

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::Client {
    async fn execute(&self, sql: &str) -> DdlResult<u64> {
        Ok(tokio_postgres::Client::execute(self, sql, &[]).await?)
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        Some(tokio_postgres::Client::cancel_token(self))
    }
}
