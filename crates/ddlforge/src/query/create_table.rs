//! CREATE TABLE builder.

use crate::client::GenericClient;
use crate::db::Db;
use crate::dialect::{Feature, Formatter};
use crate::error::{ConfigError, DdlResult};
use crate::fragment::{Arg, Fragment};
use crate::monitor::QueryEvent;
use crate::schema::{Column, Model, TableSchema, sqltype};
use std::fmt::{self, Write};
use std::sync::Arc;

/// CREATE TABLE builder.
///
/// Rendered clause order:
///
/// ```text
/// CREATE [TEMP] TABLE [IF NOT EXISTS] <target> (<columns>
///     [, PRIMARY KEY (...)] [, [CONSTRAINT <name>] UNIQUE (...)]*
///     [, FOREIGN KEY ...]*) [PARTITION BY ...] [TABLESPACE ...]
/// ```
#[derive(Clone)]
#[must_use]
pub struct CreateTableQuery {
    db: Db,
    /// First configuration error, if any.
    status: Result<(), ConfigError>,
    model: Option<Arc<dyn Model>>,
    tables: Vec<Fragment>,
    model_table: Fragment,
    temp: bool,
    if_not_exists: bool,
    varchar: u32,
    fks: Vec<Fragment>,
    partition_by: Fragment,
    tablespace: Fragment,
}

impl fmt::Debug for CreateTableQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateTableQuery")
            .field("status", &self.status)
            .field("model", &self.table_schema().map(|t| t.name.as_str()))
            .field("tables", &self.tables)
            .field("model_table", &self.model_table)
            .field("temp", &self.temp)
            .field("if_not_exists", &self.if_not_exists)
            .field("varchar", &self.varchar)
            .field("fks", &self.fks)
            .field("partition_by", &self.partition_by)
            .field("tablespace", &self.tablespace)
            .finish()
    }
}

impl CreateTableQuery {
    /// Create a builder bound to `db`'s dialect and configuration.
    pub fn new(db: Db) -> Self {
        let varchar = db.config().default_varchar;
        Self {
            db,
            status: Ok(()),
            model: None,
            tables: Vec::new(),
            model_table: Fragment::Zero,
            temp: false,
            if_not_exists: false,
            varchar,
            fks: Vec::new(),
            partition_by: Fragment::Zero,
            tablespace: Fragment::Zero,
        }
    }

    fn configure(mut self, f: impl FnOnce(&mut Self) -> Result<(), ConfigError>) -> Self {
        if self.status.is_ok() {
            self.status = f(&mut self);
        }
        self
    }

    /// Set the model whose schema is rendered.
    ///
    /// An inconsistent schema poisons the builder.
    pub fn model<M: Model + 'static>(self, model: M) -> Self {
        self.model_arc(Arc::new(model))
    }

    /// Set an Arc-wrapped model.
    pub fn model_arc(self, model: Arc<dyn Model>) -> Self {
        self.configure(|q| {
            model.table_schema().validate()?;
            q.model = Some(model);
            Ok(())
        })
    }

    /// Add a target table name. Only the first configured table is rendered.
    pub fn table(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.configure(|q| {
            if name.is_empty() {
                return Err(ConfigError::EmptyTableName);
            }
            q.tables.push(Fragment::ident(name));
            Ok(())
        })
    }

    /// Add several target table names.
    pub fn tables<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(self, |q, name| q.table(name))
    }

    /// Add a target given as a SQL expression.
    pub fn table_expr(self, template: impl Into<String>, args: Vec<Arg>) -> Self {
        let fragment = Fragment::safe(template, args);
        self.configure(|q| {
            q.tables.push(fragment);
            Ok(())
        })
    }

    /// Replace the target entirely, taking precedence over `table`.
    pub fn model_table_expr(self, template: impl Into<String>, args: Vec<Arg>) -> Self {
        let fragment = Fragment::safe(template, args);
        self.configure(|q| {
            q.model_table = fragment;
            Ok(())
        })
    }

    /// Emit `TEMP`.
    pub fn temp(self) -> Self {
        self.configure(|q| {
            q.temp = true;
            Ok(())
        })
    }

    /// Emit `IF NOT EXISTS`.
    pub fn if_not_exists(self) -> Self {
        self.configure(|q| {
            q.if_not_exists = true;
            Ok(())
        })
    }

    /// Render `VARCHAR` columns as `varchar(n)`. `0` disables the override.
    ///
    /// Columns whose CREATE TABLE type was set explicitly are not affected.
    pub fn varchar(self, n: u32) -> Self {
        self.configure(|q| {
            q.varchar = n;
            Ok(())
        })
    }

    /// Append a `FOREIGN KEY` constraint. Rendered in the order added.
    ///
    /// ```ignore
    /// .foreign_key("(author_id) REFERENCES ? (id) ON DELETE ?", args![Arg::ident("users"), Arg::safe("CASCADE")])
    /// ```
    pub fn foreign_key(self, template: impl Into<String>, args: Vec<Arg>) -> Self {
        let fragment = Fragment::safe(template, args);
        self.configure(|q| {
            q.fks.push(fragment);
            Ok(())
        })
    }

    /// Set the `PARTITION BY` expression.
    pub fn partition_by(self, template: impl Into<String>, args: Vec<Arg>) -> Self {
        let fragment = Fragment::safe(template, args);
        self.configure(|q| {
            q.partition_by = fragment;
            Ok(())
        })
    }

    /// Set the `TABLESPACE` expression.
    pub fn tablespace(self, template: impl Into<String>, args: Vec<Arg>) -> Self {
        let fragment = Fragment::safe(template, args);
        self.configure(|q| {
            q.tablespace = fragment;
            Ok(())
        })
    }

    /// The statement kind.
    pub fn operation(&self) -> &'static str {
        "CREATE TABLE"
    }

    /// The recorded configuration error, if the builder is poisoned.
    pub fn err(&self) -> Option<&ConfigError> {
        self.status.as_ref().err()
    }

    /// The configured model's schema.
    pub fn table_schema(&self) -> Option<&TableSchema> {
        self.model.as_deref().map(|m| m.table_schema())
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Render into `out` with `fmt`.
    ///
    /// On error `out` is truncated back to its original length.
    pub fn append_query(&self, fmt: &dyn Formatter, out: &mut String) -> DdlResult<()> {
        let start = out.len();
        let result = self.write_query(fmt, out);
        if result.is_err() {
            out.truncate(start);
        }
        result
    }

    /// Render with the `Db` dialect.
    pub fn to_sql(&self) -> DdlResult<String> {
        let mut buf = self.db.buffers().acquire();
        self.append_query(self.db.formatter(), &mut buf)?;
        Ok(buf.as_str().to_owned())
    }

    fn write_query(&self, fmt: &dyn Formatter, b: &mut String) -> DdlResult<()> {
        self.status.clone()?;
        let Some(model) = &self.model else {
            return Err(ConfigError::MissingModel.into());
        };
        let table = model.table_schema();

        b.push_str("CREATE ");
        if self.temp {
            b.push_str("TEMP ");
        }
        b.push_str("TABLE ");
        if self.if_not_exists {
            b.push_str("IF NOT EXISTS ");
        }
        self.append_first_table(fmt, b, table)?;

        b.push_str(" (");
        let body = b.len();

        for col in &table.columns {
            push_sep(b, body);
            b.push_str(&col.sql_name);
            b.push(' ');
            self.append_sql_type(b, col);
            if col.not_null {
                b.push_str(" NOT NULL");
            }
            if fmt.has(Feature::AutoIncrement) && col.auto_increment {
                b.push_str(" AUTO_INCREMENT");
            }
            if !col.sql_default.is_empty() {
                b.push_str(" DEFAULT ");
                b.push_str(&col.sql_default);
            }
        }

        append_pk_constraint(b, body, table);
        append_unique_constraints(fmt, b, body, table);
        self.append_fk_constraints(fmt, b, body)?;

        b.push(')');

        if !self.partition_by.is_zero() {
            b.push_str(" PARTITION BY ");
            self.partition_by.append_to(fmt, b)?;
        }

        if !self.tablespace.is_zero() {
            b.push_str(" TABLESPACE ");
            self.tablespace.append_to(fmt, b)?;
        }

        Ok(())
    }

    fn append_first_table(
        &self,
        fmt: &dyn Formatter,
        b: &mut String,
        table: &TableSchema,
    ) -> DdlResult<()> {
        if !self.model_table.is_zero() {
            return self.model_table.append_to(fmt, b);
        }
        match self.tables.first() {
            Some(first) => first.append_to(fmt, b),
            None => {
                fmt.append_ident(b, &table.name);
                Ok(())
            }
        }
    }

    // Explicit create type > varchar width override > discovered type.
    fn append_sql_type(&self, b: &mut String, col: &Column) {
        if col.create_table_sql_type != col.discovered_sql_type {
            b.push_str(&col.create_table_sql_type);
            return;
        }

        if self.varchar > 0 && col.create_table_sql_type == sqltype::VARCHAR {
            let _ = write!(b, "varchar({})", self.varchar);
            return;
        }

        b.push_str(&col.create_table_sql_type);
    }

    fn append_fk_constraints(&self, fmt: &dyn Formatter, b: &mut String, body: usize) -> DdlResult<()> {
        for fk in &self.fks {
            push_sep(b, body);
            b.push_str("FOREIGN KEY ");
            fk.append_to(fmt, b)?;
        }
        Ok(())
    }

    /// Run the statement against `conn`.
    ///
    /// 1. The model's before-create hook; an error here returns before any SQL
    ///    is rendered or sent.
    /// 2. Render, run query hooks, execute.
    /// 3. The model's after-create hook. The table already exists at this
    ///    point, so an error here does not mean nothing happened.
    pub async fn exec<C: GenericClient>(&self, conn: &C) -> DdlResult<u64> {
        let table_name = self.table_schema().map(|t| t.name.clone());

        if let Some(hook) = self.model.as_deref().and_then(|m| m.before_create_table_hook()) {
            if let Err(err) = hook.before_create_table(self).await {
                #[cfg(feature = "tracing")]
                tracing::warn!(target: "ddlforge.sql", table = ?table_name, error = %err, "BeforeCreateTable hook failed");
                return Err(err);
            }
        }

        let sql = self.to_sql()?;
        let event = QueryEvent {
            operation: self.operation(),
            dialect: self.db.formatter().name(),
            table: table_name,
            sql,
        };

        let affected = self.db.exec(conn, &event).await?;

        if let Some(hook) = self.model.as_deref().and_then(|m| m.after_create_table_hook()) {
            if let Err(err) = hook.after_create_table(self).await {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    target: "ddlforge.sql",
                    table = ?event.table,
                    error = %err,
                    "table created but AfterCreateTable hook failed"
                );
                return Err(err);
            }
        }

        Ok(affected)
    }
}

fn push_sep(b: &mut String, body: usize) {
    if b.len() > body {
        b.push_str(", ");
    }
}

fn append_columns(b: &mut String, table: &TableSchema, names: &[String]) {
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            b.push_str(", ");
        }
        b.push_str(table.sql_name_of(name));
    }
}

fn append_pk_constraint(b: &mut String, body: usize, table: &TableSchema) {
    if table.pks.is_empty() {
        return;
    }

    push_sep(b, body);
    b.push_str("PRIMARY KEY (");
    append_columns(b, table, &table.pks);
    b.push(')');
}

// BTreeMap order: anonymous ("") first, then by name.
fn append_unique_constraints(fmt: &dyn Formatter, b: &mut String, body: usize, table: &TableSchema) {
    for (name, cols) in &table.unique {
        push_sep(b, body);
        if !name.is_empty() {
            b.push_str("CONSTRAINT ");
            fmt.append_ident(b, name);
            b.push(' ');
        }
        b.push_str("UNIQUE (");
        append_columns(b, table, cols);
        b.push(')');
    }
}
