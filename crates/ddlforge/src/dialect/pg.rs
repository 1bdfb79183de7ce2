use super::{Features, Formatter, push_hex};

/// PostgreSQL.
///
/// Postgres has no `AUTO_INCREMENT` keyword (auto-increment columns are
/// expected to carry a serial/identity type instead), so the default feature
/// set is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgDialect {
    features: Features,
}

impl PgDialect {
    pub const fn new() -> Self {
        Self {
            features: Features::empty(),
        }
    }

    /// Override the feature set.
    pub const fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }
}

impl Formatter for PgDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn features(&self) -> Features {
        self.features
    }

    fn append_bytes(&self, out: &mut String, bytes: &[u8]) {
        out.push_str("'\\x");
        push_hex(out, bytes);
        out.push('\'');
    }
}
