use super::{Features, Formatter};

/// SQLite.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect {
    features: Features,
}

impl SqliteDialect {
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

impl Formatter for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn features(&self) -> Features {
        self.features
    }

    fn append_bool(&self, out: &mut String, v: bool) {
        out.push(if v { '1' } else { '0' });
    }
}
