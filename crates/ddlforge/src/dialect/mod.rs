//! SQL dialects.
//!
//! A dialect is the [`Formatter`] the renderer calls for every identifier and
//! literal it writes, plus the feature flags that gate dialect-specific syntax.
//!
//! Formatters are stateless: one value can be shared (`Arc<dyn Formatter>`)
//! across any number of concurrent renders.
//!
//! # Example
//!
//! ```
//! use ddlforge::dialect::{Feature, Formatter, MySqlDialect, PgDialect};
//!
//! let mut out = String::new();
//! PgDialect::new().append_ident(&mut out, "public.users");
//! assert_eq!(out, r#""public"."users""#);
//!
//! assert!(MySqlDialect::new().has(Feature::AutoIncrement));
//! assert!(!PgDialect::new().has(Feature::AutoIncrement));
//! ```

mod mysql;
mod pg;
mod sqlite;

#[cfg(test)]
mod tests;

pub use mysql::MySqlDialect;
pub use pg::PgDialect;
pub use sqlite::SqliteDialect;

use std::fmt::Write;

/// Dialect feature flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Feature {
    /// Columns can be declared with ` AUTO_INCREMENT`.
    AutoIncrement = 0,
}

impl Feature {
    const fn bit(self) -> u32 {
        1 << (self as u8)
    }
}

/// A set of [`Feature`] flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Features(u32);

impl Features {
    /// The empty set.
    pub const fn empty() -> Self {
        Features(0)
    }

    /// Add a feature.
    pub const fn with(self, feature: Feature) -> Self {
        Features(self.0 | feature.bit())
    }

    /// Remove a feature.
    pub const fn without(self, feature: Feature) -> Self {
        Features(self.0 & !feature.bit())
    }

    /// Check whether `feature` is in the set.
    pub const fn contains(self, feature: Feature) -> bool {
        self.0 & feature.bit() != 0
    }
}

/// Dialect boundary used while rendering.
///
/// Implementations must not keep per-call state.
pub trait Formatter: Send + Sync {
    /// Dialect name, used in logs.
    fn name(&self) -> &'static str;

    /// The features this dialect supports.
    fn features(&self) -> Features;

    /// Check whether the dialect supports `feature`.
    fn has(&self, feature: Feature) -> bool {
        self.features().contains(feature)
    }

    /// The identifier quote character.
    fn ident_quote(&self) -> char {
        '"'
    }

    /// Append a quoted identifier.
    ///
    /// Each `.`-separated part is quoted separately and embedded quote
    /// characters are doubled, so distinct names never collide.
    fn append_ident(&self, out: &mut String, ident: &str) {
        let quote = self.ident_quote();
        for (i, part) in ident.split('.').enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push(quote);
            for ch in part.chars() {
                if ch == quote {
                    out.push(quote);
                }
                out.push(ch);
            }
            out.push(quote);
        }
    }

    /// Append a single-quoted string literal.
    fn append_string(&self, out: &mut String, s: &str) {
        out.push('\'');
        for ch in s.chars() {
            if ch == '\'' {
                out.push('\'');
            }
            out.push(ch);
        }
        out.push('\'');
    }

    /// Append a boolean literal.
    fn append_bool(&self, out: &mut String, v: bool) {
        out.push_str(if v { "TRUE" } else { "FALSE" });
    }

    /// Append a binary literal (`X'..'` by default).
    fn append_bytes(&self, out: &mut String, bytes: &[u8]) {
        out.push_str("X'");
        push_hex(out, bytes);
        out.push('\'');
    }
}

pub(crate) fn push_hex(out: &mut String, bytes: &[u8]) {
    out.reserve(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
}
