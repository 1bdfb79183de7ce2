//! The `Db` handle: dialect, configuration, buffer pool and query hooks.

use crate::buffer::{BufferPool, BufferPoolConfig};
use crate::client::GenericClient;
use crate::dialect::Formatter;
use crate::error::{DdlError, DdlResult, HookStage};
use crate::monitor::{HookAction, QueryEvent, QueryHook, QueryResult};
use crate::query::CreateTableQuery;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Configuration shared by every statement created from a [`Db`].
#[derive(Debug, Clone, Default)]
pub struct DbConfig {
    /// Width applied to `VARCHAR` columns of new CREATE TABLE queries.
    /// `0` (default) leaves the type untouched.
    pub default_varchar: u32,
    /// Statement timeout. `None` means no timeout (default).
    pub query_timeout: Option<Duration>,
    /// Render buffer pool tuning.
    pub buffer_pool: BufferPoolConfig,
}

impl DbConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default varchar width.
    pub fn with_default_varchar(mut self, width: u32) -> Self {
        self.default_varchar = width;
        self
    }

    /// Set the statement timeout.
    ///
    /// Statements exceeding it fail with [`DdlError::Timeout`]; a server-side
    /// cancel is attempted when the client exposes a cancel token.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Set the buffer pool configuration.
    pub fn with_buffer_pool(mut self, config: BufferPoolConfig) -> Self {
        self.buffer_pool = config;
        self
    }
}

/// Entry point for building statements against one dialect.
///
/// Cheap to clone; clones share the buffer pool.
///
/// # Example
///
/// ```
/// use ddlforge::Db;
/// use ddlforge::dialect::PgDialect;
/// use ddlforge::schema::{Column, TableSchema, sqltype};
///
/// let db = Db::new(PgDialect::new());
/// let users = TableSchema::new("users").column(Column::new("id", sqltype::BIGINT));
/// let sql = db.new_create_table().model(users).if_not_exists().to_sql()?;
/// assert_eq!(sql, r#"CREATE TABLE IF NOT EXISTS "users" (id BIGINT)"#);
/// # Ok::<(), ddlforge::DdlError>(())
/// ```
#[derive(Clone)]
pub struct Db {
    formatter: Arc<dyn Formatter>,
    config: DbConfig,
    buffers: Arc<BufferPool>,
    hooks: Vec<Arc<dyn QueryHook>>,
}

impl fmt::Debug for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db")
            .field("dialect", &self.formatter.name())
            .field("config", &self.config)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl Db {
    /// Create a handle for `dialect` with default configuration.
    pub fn new<F: Formatter + 'static>(dialect: F) -> Self {
        Self::from_arc(Arc::new(dialect))
    }

    /// Create a handle from a shared formatter.
    pub fn from_arc(formatter: Arc<dyn Formatter>) -> Self {
        let config = DbConfig::default();
        Self {
            formatter,
            buffers: Arc::new(BufferPool::new(config.buffer_pool)),
            config,
            hooks: Vec::new(),
        }
    }

    /// Replace the configuration. This also resets the buffer pool.
    pub fn with_config(mut self, config: DbConfig) -> Self {
        self.buffers = Arc::new(BufferPool::new(config.buffer_pool));
        self.config = config;
        self
    }

    /// Register a query hook. Hooks run in registration order.
    pub fn with_hook<H: QueryHook + 'static>(self, hook: H) -> Self {
        self.with_hook_arc(Arc::new(hook))
    }

    /// Register an Arc-wrapped query hook.
    pub fn with_hook_arc(mut self, hook: Arc<dyn QueryHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// The dialect formatter.
    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// The render buffer pool.
    pub fn buffers(&self) -> &BufferPool {
        &self.buffers
    }

    /// Start a CREATE TABLE statement.
    pub fn new_create_table(&self) -> CreateTableQuery {
        CreateTableQuery::new(self.clone())
    }

    fn apply_hooks(&self, event: &QueryEvent) -> DdlResult<()> {
        for hook in &self.hooks {
            if let HookAction::Abort(reason) = hook.before_query(event) {
                return Err(DdlError::hook(HookStage::BeforeQuery, reason));
            }
        }
        Ok(())
    }

    fn report_result(&self, event: &QueryEvent, duration: Duration, result: &QueryResult) {
        for hook in &self.hooks {
            hook.after_query(event, duration, result);
        }
    }

    async fn execute_with_timeout<C, F>(&self, conn: &C, future: F) -> DdlResult<u64>
    where
        C: GenericClient,
        F: std::future::Future<Output = DdlResult<u64>> + Send,
    {
        match self.config.query_timeout {
            Some(timeout) => {
                tokio::pin!(future);
                tokio::select! {
                    result = &mut future => result,
                    _ = tokio::time::sleep(timeout) => {
                        if let Some(cancel_token) = conn.cancel_token() {
                            tokio::spawn(async move {
                                let _ = cancel_token.cancel_query(tokio_postgres::NoTls).await;
                            });
                        }
                        Err(DdlError::Timeout(timeout))
                    }
                }
            }
            None => future.await,
        }
    }

    /// Send `event.sql` through the hooks to `conn`.
    pub(crate) async fn exec<C: GenericClient>(&self, conn: &C, event: &QueryEvent) -> DdlResult<u64> {
        self.apply_hooks(event)?;

        let start = Instant::now();
        let result = self
            .execute_with_timeout(conn, conn.execute(&event.sql))
            .await;
        let duration = start.elapsed();

        let outcome = match &result {
            Ok(n) => QueryResult::Affected(*n),
            Err(DdlError::Timeout(d)) => QueryResult::Error(format!("timeout after {d:?}")),
            Err(e) => QueryResult::error(e.to_string()),
        };
        self.report_result(event, duration, &outcome);

        result
    }
}
