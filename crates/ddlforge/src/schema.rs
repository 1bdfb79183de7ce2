//! Table schema snapshots.
//!
//! A [`TableSchema`] is the resolved, read-only description of a table that
//! the renderer walks: ordered columns, primary key, and unique groups. It is
//! normally produced by a reflection layer; the builders here exist so that
//! snapshots can also be written by hand.
//!
//! # Example
//!
//! ```
//! use ddlforge::schema::{Column, TableSchema, sqltype};
//!
//! let users = TableSchema::new("users")
//!     .column(Column::new("id", sqltype::BIGINT).auto_increment())
//!     .column(Column::new("email", sqltype::VARCHAR).not_null())
//!     .primary_key(["id"])
//!     .unique("", ["email"]);
//! assert!(users.validate().is_ok());
//! ```

use crate::error::ConfigError;
use crate::hook::{AfterCreateTableHook, BeforeCreateTableHook};
use std::collections::{BTreeMap, HashSet};

/// Common SQL type names as reported by reflection.
pub mod sqltype {
    pub const BOOLEAN: &str = "BOOLEAN";
    pub const SMALLINT: &str = "SMALLINT";
    pub const INTEGER: &str = "INTEGER";
    pub const BIGINT: &str = "BIGINT";
    pub const REAL: &str = "REAL";
    pub const DOUBLE_PRECISION: &str = "DOUBLE PRECISION";
    /// The generic variable-length string type. Subject to the varchar width override.
    pub const VARCHAR: &str = "VARCHAR";
    pub const TEXT: &str = "TEXT";
    pub const TIMESTAMP: &str = "TIMESTAMP";
    pub const JSON: &str = "JSON";
    pub const JSONB: &str = "JSONB";
    pub const BLOB: &str = "BLOB";
}

/// A column of a [`TableSchema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Name as written into SQL. Emitted verbatim.
    pub sql_name: String,
    /// Type the reflection layer derived for this column.
    pub discovered_sql_type: String,
    /// Type to use in CREATE TABLE. Equal to `discovered_sql_type` unless overridden.
    pub create_table_sql_type: String,
    pub not_null: bool,
    pub auto_increment: bool,
    /// Default-value SQL expression. Empty means none.
    pub sql_default: String,
}

impl Column {
    /// Create a nullable column whose SQL name equals `name`.
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        let name = name.into();
        let sql_type = sql_type.into();
        Self {
            sql_name: name.clone(),
            name,
            create_table_sql_type: sql_type.clone(),
            discovered_sql_type: sql_type,
            not_null: false,
            auto_increment: false,
            sql_default: String::new(),
        }
    }

    /// Force the CREATE TABLE type, keeping the discovered one.
    pub fn create_type(mut self, sql_type: impl Into<String>) -> Self {
        self.create_table_sql_type = sql_type.into();
        self
    }

    /// Override the SQL name (e.g. an already-quoted identifier).
    pub fn sql_name(mut self, sql_name: impl Into<String>) -> Self {
        self.sql_name = sql_name.into();
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Set the default-value SQL expression (e.g. `now()` or `'active'`).
    pub fn default_expr(mut self, expr: impl Into<String>) -> Self {
        self.sql_default = expr.into();
        self
    }
}

/// Resolved description of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Table name. Quoted by the dialect when used as a CREATE TABLE target.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
    /// Primary key column names.
    pub pks: Vec<String>,
    /// Unique groups keyed by constraint name (`""` = anonymous), in name order.
    pub unique: BTreeMap<String, Vec<String>>,
}

impl TableSchema {
    /// Create an empty table schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            pks: Vec::new(),
            unique: BTreeMap::new(),
        }
    }

    /// Append a column.
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Set the primary key columns.
    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pks = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Add columns to a unique group. Groups sharing a name are merged.
    pub fn unique<I, S>(mut self, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique
            .entry(name.into())
            .or_default()
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Look up a column by name.
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check if this table has a column with the given name.
    pub fn has_column(&self, name: &str) -> bool {
        self.get_column(name).is_some()
    }

    /// SQL name for a column, falling back to `name` itself.
    pub(crate) fn sql_name_of<'a>(&'a self, name: &'a str) -> &'a str {
        self.get_column(name).map_or(name, |c| c.sql_name.as_str())
    }

    /// Check that every key and unique group references known columns.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyTableName);
        }

        let mut seen = HashSet::with_capacity(self.columns.len());
        for col in &self.columns {
            if col.name.is_empty() {
                return Err(ConfigError::invalid_schema(&self.name, "column with empty name"));
            }
            if !seen.insert(col.name.as_str()) {
                return Err(ConfigError::invalid_schema(
                    &self.name,
                    format!("duplicate column '{}'", col.name),
                ));
            }
        }

        let mut pk_seen = HashSet::with_capacity(self.pks.len());
        for pk in &self.pks {
            if !seen.contains(pk.as_str()) {
                return Err(ConfigError::invalid_schema(
                    &self.name,
                    format!("primary key column '{pk}' does not exist"),
                ));
            }
            if !pk_seen.insert(pk.as_str()) {
                return Err(ConfigError::invalid_schema(
                    &self.name,
                    format!("primary key column '{pk}' listed twice"),
                ));
            }
        }

        for (name, cols) in &self.unique {
            if cols.is_empty() {
                return Err(ConfigError::invalid_schema(
                    &self.name,
                    format!("unique group '{name}' has no columns"),
                ));
            }
            if let Some(missing) = cols.iter().find(|c| !seen.contains(c.as_str())) {
                return Err(ConfigError::invalid_schema(
                    &self.name,
                    format!("unique group '{name}' references unknown column '{missing}'"),
                ));
            }
        }

        Ok(())
    }
}

/// A table model: a schema snapshot plus optional lifecycle hooks.
///
/// Hooks are capabilities. The default methods return `None`, which makes the
/// corresponding hook a no-op.
///
/// # Example
///
/// ```
/// use ddlforge::hook::BeforeCreateTableHook;
/// use ddlforge::schema::{Column, Model, TableSchema, sqltype};
/// use ddlforge::{CreateTableQuery, DdlResult};
///
/// struct Users(TableSchema);
///
/// #[ddlforge::async_trait]
/// impl BeforeCreateTableHook for Users {
///     async fn before_create_table(&self, _query: &CreateTableQuery) -> DdlResult<()> {
///         Ok(())
///     }
/// }
///
/// impl Model for Users {
///     fn table_schema(&self) -> &TableSchema {
///         &self.0
///     }
///
///     fn before_create_table_hook(&self) -> Option<&dyn BeforeCreateTableHook> {
///         Some(self)
///     }
/// }
/// ```
pub trait Model: Send + Sync {
    /// The schema snapshot for this model.
    fn table_schema(&self) -> &TableSchema;

    /// Hook run before CREATE TABLE is rendered.
    fn before_create_table_hook(&self) -> Option<&dyn BeforeCreateTableHook> {
        None
    }

    /// Hook run after CREATE TABLE was executed.
    fn after_create_table_hook(&self) -> Option<&dyn AfterCreateTableHook> {
        None
    }
}

impl Model for TableSchema {
    fn table_schema(&self) -> &TableSchema {
        self
    }
}
