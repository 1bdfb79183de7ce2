//! Error types for ddlforge

use std::fmt;
use thiserror::Error;

/// Result type alias for ddlforge operations
pub type DdlResult<T> = Result<T, DdlError>;

/// Error types for rendering and executing statements
#[derive(Debug, Error)]
pub enum DdlError {
    /// Builder configuration error (sticky: every render returns the same one)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A caller-supplied fragment could not be rendered
    #[error("Fragment error: {0}")]
    Fragment(#[from] FragmentError),

    /// A model hook or query hook rejected the statement
    #[error("{stage} hook failed: {message}")]
    Hook { stage: HookStage, message: String },

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Query timeout error
    #[error("Query timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

/// Errors recorded while a builder is being configured.
///
/// Kept separate from [`DdlError`] because it must be `Clone`: once a builder
/// is poisoned, every render hands out the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No model (schema snapshot) was configured.
    #[error("no model configured: call .model() before rendering CREATE TABLE")]
    MissingModel,

    /// `table("")` was called.
    #[error("table name cannot be empty")]
    EmptyTableName,

    /// The schema snapshot is internally inconsistent.
    #[error("invalid schema for table '{table}': {message}")]
    InvalidSchema { table: String, message: String },
}

/// Errors raised while expanding a `?` template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    #[error("template has {placeholders} placeholder(s) but only {args} argument(s) in {template:?}")]
    TooFewArgs {
        template: String,
        placeholders: usize,
        args: usize,
    },

    #[error("template has {placeholders} placeholder(s) but {args} argument(s) in {template:?}")]
    TooManyArgs {
        template: String,
        placeholders: usize,
        args: usize,
    },

    #[error("unsupported argument: {0}")]
    UnsupportedArg(String),
}

impl ConfigError {
    /// Create an invalid-schema error
    pub fn invalid_schema(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            table: table.into(),
            message: message.into(),
        }
    }
}

/// Where a hook failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    /// Model hook run before the statement is rendered.
    BeforeCreateTable,
    /// Model hook run after the statement was executed.
    AfterCreateTable,
    /// A [`QueryHook`](crate::monitor::QueryHook) aborted the statement.
    BeforeQuery,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HookStage::BeforeCreateTable => "BeforeCreateTable",
            HookStage::AfterCreateTable => "AfterCreateTable",
            HookStage::BeforeQuery => "BeforeQuery",
        })
    }
}

impl DdlError {
    /// Create a hook error for the given stage
    pub fn hook(stage: HookStage, message: impl Into<String>) -> Self {
        Self::Hook {
            stage,
            message: message.into(),
        }
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a fragment error
    pub fn is_fragment(&self) -> bool {
        matches!(self, Self::Fragment(_))
    }

    /// Check if this is a hook error
    pub fn is_hook(&self) -> bool {
        matches!(self, Self::Hook { .. })
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// The hook stage that failed, if this is a hook error
    pub fn hook_stage(&self) -> Option<HookStage> {
        match self {
            Self::Hook { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for DdlError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
