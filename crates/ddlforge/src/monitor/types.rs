use std::fmt;
use std::time::Duration;

/// A statement about to be (or just) sent to the database.
#[derive(Debug, Clone)]
pub struct QueryEvent {
    /// Statement kind, e.g. `"CREATE TABLE"`.
    pub operation: &'static str,
    /// Name of the dialect that rendered the SQL.
    pub dialect: &'static str,
    /// Target table of the model, if any.
    pub table: Option<String>,
    /// Rendered SQL.
    pub sql: String,
}

/// Maximum length for error messages in `QueryResult::Error`.
const MAX_ERROR_LEN: usize = 512;

/// Outcome of a statement for hooks.
#[derive(Debug, Clone)]
pub enum QueryResult {
    /// Statement succeeded and reported this many affected rows.
    Affected(u64),
    /// Statement failed (message truncated to 512 bytes).
    Error(String),
}

impl QueryResult {
    /// Create an error result, truncating the message.
    pub fn error(msg: String) -> Self {
        if msg.len() > MAX_ERROR_LEN {
            let truncated = super::truncate_sql_bytes(&msg, MAX_ERROR_LEN);
            Self::Error(format!("{truncated}..."))
        } else {
            Self::Error(msg)
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Affected(n) => write!(f, "{n} affected"),
            QueryResult::Error(e) => write!(f, "error: {e}"),
        }
    }
}

/// What to do after a hook inspected a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookAction {
    /// Send the statement.
    Continue,
    /// Do not send the statement; `exec` fails with this reason.
    Abort(String),
}

/// Hook into statement execution.
///
/// Hooks run synchronously on the calling task and must not block.
pub trait QueryHook: Send + Sync {
    /// Called before the statement is sent.
    fn before_query(&self, event: &QueryEvent) -> HookAction {
        let _ = event;
        HookAction::Continue
    }

    /// Called after the database answered (success or failure).
    fn after_query(&self, _event: &QueryEvent, _duration: Duration, _result: &QueryResult) {}
}
