//! Query layer configuration.

use std::env;

/// Connection-wide query defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryConfig {
    /// Prefix prepended to every table name (e.g. `staging_`).
    pub table_prefix: String,
    /// Compile requests without sending them.
    pub dry_run: bool,
    /// Use strongly consistent reads unless a request says otherwise.
    pub consistent_read: bool,
}

impl QueryConfig {
    /// Create configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            table_prefix: env::var("DYNAQUERY_TABLE_PREFIX").unwrap_or_default(),
            dry_run: env_bool("DYNAQUERY_DRY_RUN", false),
            consistent_read: env_bool("DYNAQUERY_CONSISTENT_READ", false),
        }
    }

    /// Set the table prefix.
    #[must_use]
    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    /// Enable or disable dry run for every request.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key).map_or(default, |v| {
        matches!(v.as_str(), "1" | "true" | "yes" | "TRUE" | "YES")
    })
}
