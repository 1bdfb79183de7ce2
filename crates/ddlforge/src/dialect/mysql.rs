use super::{Feature, Features, Formatter};

/// MySQL / MariaDB.
#[derive(Debug, Clone, Copy)]
pub struct MySqlDialect {
    features: Features,
}

impl Default for MySqlDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl MySqlDialect {
    pub const fn new() -> Self {
        Self {
            features: Features::empty().with(Feature::AutoIncrement),
        }
    }

    /// Override the feature set.
    pub const fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }
}

impl Formatter for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn features(&self) -> Features {
        self.features
    }

    fn ident_quote(&self) -> char {
        '`'
    }

    // Backslash is an escape character under the default sql_mode.
    fn append_string(&self, out: &mut String, s: &str) {
        out.push('\'');
        for ch in s.chars() {
            match ch {
                '\'' => out.push_str("''"),
                '\\' => out.push_str("\\\\"),
                _ => out.push(ch),
            }
        }
        out.push('\'');
    }
}
