use super::truncate_sql_bytes;
use super::types::{HookAction, QueryEvent, QueryHook, QueryResult};
use std::time::Duration;
use tracing::Level;

/// A `tracing`-based hook that emits every statement before it is sent and
/// its outcome afterwards.
///
/// Enable via the crate feature: `ddlforge = { features = ["tracing"] }`.
#[derive(Debug, Clone)]
pub struct TracingQueryHook {
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for TracingQueryHook {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl TracingQueryHook {
    /// Create a new hook with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }
}

/// Dispatch a tracing event at a runtime-determined level.
macro_rules! emit_at_level {
    ($level:expr, $($field:tt)*) => {
        match $level {
            Level::ERROR => tracing::error!($($field)*),
            Level::WARN  => tracing::warn!($($field)*),
            Level::INFO  => tracing::info!($($field)*),
            Level::DEBUG => tracing::debug!($($field)*),
            Level::TRACE => tracing::trace!($($field)*),
        }
    };
}

impl QueryHook for TracingQueryHook {
    fn before_query(&self, event: &QueryEvent) -> HookAction {
        let sql = self.truncate_sql(&event.sql);
        let table = event.table.as_deref().unwrap_or("-");
        emit_at_level!(
            self.level,
            target: "ddlforge.sql",
            operation = event.operation,
            dialect = event.dialect,
            table,
            sql = %sql,
        );
        HookAction::Continue
    }

    fn after_query(&self, event: &QueryEvent, duration: Duration, result: &QueryResult) {
        let table = event.table.as_deref().unwrap_or("-");
        if result.is_error() {
            tracing::warn!(
                target: "ddlforge.sql",
                operation = event.operation,
                table,
                ?duration,
                result = %result,
            );
        } else {
            emit_at_level!(
                self.level,
                target: "ddlforge.sql",
                operation = event.operation,
                table,
                ?duration,
                result = %result,
            );
        }
    }
}
