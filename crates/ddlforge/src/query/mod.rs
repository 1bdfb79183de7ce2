//! Statement builders.
//!
//! Builders are configured through consuming, chainable setters and rendered
//! any number of times afterwards. Rendering never mutates the builder.
//!
//! Configuration errors are sticky: the first one poisons the builder, later
//! setters become no-ops, and every render returns that same error.
//!
//! # Usage
//!
//! ```ignore
//! let db = Db::new(PgDialect::new());
//!
//! db.new_create_table()
//!     .model(users_schema)
//!     .if_not_exists()
//!     .varchar(255)
//!     .foreign_key("(org_id) REFERENCES ? (id) ON DELETE CASCADE", args![Arg::ident("orgs")])
//!     .exec(&client)
//!     .await?;
//! ```

mod create_table;


pub use create_table::CreateTableQuery;
