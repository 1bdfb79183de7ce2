//! SQL fragments.
//!
//! A [`Fragment`] is either an identifier that the dialect will quote
//! ([`Fragment::ident`]) or a trusted SQL template whose `?` placeholders are
//! filled from positional [`Arg`]s at render time ([`Fragment::safe`]).
//!
//! - `?` consumes the next argument.
//! - `\?` emits a literal `?` (e.g. the jsonb `?` operator).
//! - The number of placeholders must match the number of arguments exactly.
//!
//! # Example
//!
//! ```
//! use ddlforge::dialect::PgDialect;
//! use ddlforge::{Arg, Fragment};
//!
//! let fk = Fragment::safe(
//!     "(owner_id) REFERENCES ? (id) ON DELETE ?",
//!     vec![Arg::ident("users"), Arg::safe("CASCADE")],
//! );
//! let mut out = String::new();
//! fk.append_to(&PgDialect::new(), &mut out)?;
//! assert_eq!(out, r#"(owner_id) REFERENCES "users" (id) ON DELETE CASCADE"#);
//! # Ok::<(), ddlforge::DdlError>(())
//! ```

use crate::dialect::Formatter;
use crate::error::{DdlResult, FragmentError};
use std::fmt::Write;

/// A piece of SQL text.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Fragment {
    /// Unset. Renders nothing.
    #[default]
    Zero,
    /// A name emitted as a dialect-quoted identifier.
    Unsafe(String),
    /// SQL syntax plus positional arguments for its `?` placeholders.
    Safe { template: String, args: Vec<Arg> },
}

impl Fragment {
    /// An identifier, quoted by the dialect when rendered.
    pub fn ident(name: impl Into<String>) -> Self {
        Fragment::Unsafe(name.into())
    }

    /// A SQL template with positional arguments.
    pub fn safe(template: impl Into<String>, args: Vec<Arg>) -> Self {
        Fragment::Safe {
            template: template.into(),
            args,
        }
    }

    /// A SQL template without arguments.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::safe(sql, Vec::new())
    }

    /// True only for the unset fragment.
    pub fn is_zero(&self) -> bool {
        matches!(self, Fragment::Zero)
    }

    /// Render into `out`.
    ///
    /// On error `out` may hold a partial rendering; callers discard it.
    pub fn append_to(&self, fmt: &dyn Formatter, out: &mut String) -> DdlResult<()> {
        match self {
            Fragment::Zero => Ok(()),
            Fragment::Unsafe(name) => {
                fmt.append_ident(out, name);
                Ok(())
            }
            Fragment::Safe { template, args } => append_template(fmt, out, template, args),
        }
    }
}

fn append_template(
    fmt: &dyn Formatter,
    out: &mut String,
    template: &str,
    args: &[Arg],
) -> DdlResult<()> {
    let mut next = 0usize;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'?') => {
                chars.next();
                out.push('?');
            }
            '?' => {
                let Some(arg) = args.get(next) else {
                    return Err(FragmentError::TooFewArgs {
                        template: template.to_string(),
                        placeholders: count_placeholders(template),
                        args: args.len(),
                    }
                    .into());
                };
                next += 1;
                arg.append_to(fmt, out)?;
            }
            _ => out.push(c),
        }
    }

    if next != args.len() {
        return Err(FragmentError::TooManyArgs {
            template: template.to_string(),
            placeholders: next,
            args: args.len(),
        }
        .into());
    }
    Ok(())
}

fn count_placeholders(template: &str) -> usize {
    let mut n = 0;
    let mut prev_backslash = false;
    for c in template.chars() {
        if c == '?' && !prev_backslash {
            n += 1;
        }
        prev_backslash = c == '\\' && !prev_backslash;
    }
    n
}

/// A positional argument for a [`Fragment::Safe`] template.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    /// Must be finite.
    Float(f64),
    /// Rendered as a dialect string literal.
    Str(String),
    Bytes(Vec<u8>),
    /// Rendered as a dialect-quoted identifier.
    Ident(String),
    /// Trusted SQL, emitted verbatim.
    Safe(String),
    /// Nested fragment, rendered recursively.
    Fragment(Box<Fragment>),
    /// Rendered as a string literal holding the JSON text.
    Json(serde_json::Value),
}

impl Arg {
    pub fn ident(name: impl Into<String>) -> Self {
        Arg::Ident(name.into())
    }

    pub fn safe(sql: impl Into<String>) -> Self {
        Arg::Safe(sql.into())
    }

    pub fn fragment(fragment: Fragment) -> Self {
        Arg::Fragment(Box::new(fragment))
    }

    /// Serialize `value` and pass it as a JSON literal.
    pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        Ok(Arg::Json(serde_json::to_value(value)?))
    }

    pub(crate) fn append_to(&self, fmt: &dyn Formatter, out: &mut String) -> DdlResult<()> {
        match self {
            Arg::Null => out.push_str("NULL"),
            Arg::Bool(v) => fmt.append_bool(out, *v),
            Arg::Int(v) => {
                let _ = write!(out, "{v}");
            }
            Arg::UInt(v) => {
                let _ = write!(out, "{v}");
            }
            Arg::Float(v) => {
                if !v.is_finite() {
                    return Err(FragmentError::UnsupportedArg(format!(
                        "non-finite float {v} has no SQL literal"
                    ))
                    .into());
                }
                let _ = write!(out, "{v:?}");
            }
            Arg::Str(s) => fmt.append_string(out, s),
            Arg::Bytes(b) => fmt.append_bytes(out, b),
            Arg::Ident(name) => fmt.append_ident(out, name),
            Arg::Safe(sql) => out.push_str(sql),
            Arg::Fragment(f) => f.append_to(fmt, out)?,
            Arg::Json(v) => fmt.append_string(out, &v.to_string()),
        }
        Ok(())
    }
}

macro_rules! impl_from_int {
    ($variant:ident: $target:ty => $($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(v: $t) -> Self {
                    Arg::$variant(<$target>::from(v))
                }
            }
        )*
    };
}

impl_from_int!(Int: i64 => i8, i16, i32, i64);
impl_from_int!(UInt: u64 => u8, u16, u32, u64);

impl From<f32> for Arg {
    fn from(v: f32) -> Self {
        Arg::Float(f64::from(v))
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Float(v)
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Str(v.to_string())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Str(v)
    }
}

impl From<Vec<u8>> for Arg {
    fn from(v: Vec<u8>) -> Self {
        Arg::Bytes(v)
    }
}

impl From<&[u8]> for Arg {
    fn from(v: &[u8]) -> Self {
        Arg::Bytes(v.to_vec())
    }
}

impl From<Fragment> for Arg {
    fn from(v: Fragment) -> Self {
        Arg::fragment(v)
    }
}

impl From<serde_json::Value> for Arg {
    fn from(v: serde_json::Value) -> Self {
        Arg::Json(v)
    }
}

impl From<uuid::Uuid> for Arg {
    fn from(v: uuid::Uuid) -> Self {
        Arg::Str(v.to_string())
    }
}

impl From<chrono::NaiveDate> for Arg {
    fn from(v: chrono::NaiveDate) -> Self {
        Arg::Str(v.format("%Y-%m-%d").to_string())
    }
}

impl From<chrono::NaiveDateTime> for Arg {
    fn from(v: chrono::NaiveDateTime) -> Self {
        Arg::Str(v.format("%Y-%m-%d %H:%M:%S%.f").to_string())
    }
}

impl From<chrono::DateTime<chrono::Utc>> for Arg {
    fn from(v: chrono::DateTime<chrono::Utc>) -> Self {
        Arg::Str(v.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true))
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        v.map_or(Arg::Null, Into::into)
    }
}

/// Build a `Vec<Arg>` from heterogeneous values.
///
/// ```
/// let args = ddlforge::args![1, "x", None::<i32>];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => { ::std::vec::Vec::<$crate::Arg>::new() };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),+]
    };
}
