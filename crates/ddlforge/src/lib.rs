//! # ddlforge
//!
//! Dialect-aware `CREATE TABLE` rendering for Rust.
//!
//! ## Features
//!
//! - **Byte-exact output**: fixed clause order, deterministic constraint order
//! - **Dialects**: identifier quoting, literals and feature flags per backend
//! - **Fragments**: quoted identifiers or trusted SQL templates with `?` args
//! - **Sticky errors**: the first configuration error is returned by every render
//! - **Model hooks**: before/after create hooks as opt-in capabilities
//! - **Query hooks**: inspect or abort statements, `tracing` integration
//!
//! ## Example
//!
//! ```
//! use ddlforge::dialect::MySqlDialect;
//! use ddlforge::schema::{Column, TableSchema, sqltype};
//! use ddlforge::Db;
//!
//! let schema = TableSchema::new("table")
//!     .column(Column::new("id", sqltype::INTEGER).auto_increment())
//!     .column(Column::new("name", sqltype::VARCHAR))
//!     .primary_key(["id"]);
//!
//! let sql = Db::new(MySqlDialect::new())
//!     .new_create_table()
//!     .model(schema)
//!     .if_not_exists()
//!     .varchar(255)
//!     .to_sql()?;
//!
//! assert_eq!(
//!     sql,
//!     "CREATE TABLE IF NOT EXISTS `table` (id INTEGER AUTO_INCREMENT, name varchar(255), PRIMARY KEY (id))"
//! );
//! # Ok::<(), ddlforge::DdlError>(())
//! ```

pub mod buffer;
pub mod client;
pub mod db;
pub mod dialect;
pub mod error;
pub mod fragment;
pub mod hook;
pub mod monitor;
pub mod query;
pub mod schema;

pub use buffer::{BufferPool, BufferPoolConfig, PooledBuffer};
pub use client::GenericClient;
pub use db::{Db, DbConfig};
pub use dialect::{Feature, Features, Formatter, MySqlDialect, PgDialect, SqliteDialect};
pub use error::{ConfigError, DdlError, DdlResult, FragmentError, HookStage};
pub use fragment::{Arg, Fragment};
pub use hook::{AfterCreateTableHook, BeforeCreateTableHook};
pub use monitor::{HookAction, QueryEvent, QueryHook, QueryResult};
pub use query::CreateTableQuery;
pub use schema::{Column, Model, TableSchema};

#[cfg(feature = "tracing")]
pub use monitor::TracingQueryHook;

// Re-exported so hook implementations don't need their own dependency.
pub use async_trait::async_trait;
