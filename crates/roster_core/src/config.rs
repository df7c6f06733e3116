//! Runtime configuration for roster entry points.
//!
//! # Responsibility
//! - Collect database path, logging and paging defaults in one value.
//! - Read overrides from `ROSTER_*` environment variables.
//!
//! # Invariants
//! - Blank environment values are ignored, never treated as overrides.
//! - `default_page_limit <= max_page_limit`.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "ROSTER_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "ROSTER_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "ROSTER_LOG_DIR";
pub const ENV_PAGE_LIMIT: &str = "ROSTER_PAGE_LIMIT";

const DEFAULT_PAGE_LIMIT: i64 = 10;
const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for `{key}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Default and maximum page size applied to caller-supplied limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl PageLimits {
    /// `None` becomes the default; values above the maximum are clamped.
    ///
    /// Non-positive values pass through untouched so page-request
    /// validation can reject them.
    pub fn normalize(&self, limit: Option<i64>) -> i64 {
        match limit {
            None => self.default_limit,
            Some(value) if value > self.max_limit => self.max_limit,
            Some(value) => value,
        }
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
            max_limit: MAX_PAGE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// `None` means an in-memory database.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub page_limits: PageLimits,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            page_limits: PageLimits::default(),
        }
    }
}

impl CoreConfig {
    /// Reads `ROSTER_*` overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = Some(PathBuf::from(path));
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = read(ENV_PAGE_LIMIT) {
            let limit = raw
                .parse::<i64>()
                .ok()
                .filter(|value| (1..=MAX_PAGE_LIMIT).contains(value))
                .ok_or(ConfigError::InvalidValue {
                    key: ENV_PAGE_LIMIT,
                    value: raw,
                })?;
            config.page_limits.default_limit = limit;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, PageLimits, ENV_DB_PATH, ENV_PAGE_LIMIT};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = CoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.page_limits.default_limit, 10);
    }

    #[test]
    fn overrides_are_trimmed_and_blank_values_ignored() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "  /tmp/roster.db "),
            ("ROSTER_LOG_DIR", "   "),
            (ENV_PAGE_LIMIT, "25"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/roster.db")));
        assert_eq!(config.log_dir, None);
        assert_eq!(config.page_limits.default_limit, 25);
    }

    #[test]
    fn invalid_page_limit_is_rejected() {
        for raw in ["abc", "0", "1000"] {
            let err = CoreConfig::from_lookup(lookup_from(&[(ENV_PAGE_LIMIT, raw)])).unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidValue {
                    key: ENV_PAGE_LIMIT,
                    value: raw.to_string()
                }
            );
        }
    }

    #[test]
    fn normalize_defaults_and_clamps() {
        let limits = PageLimits::default();
        assert_eq!(limits.normalize(None), 10);
        assert_eq!(limits.normalize(Some(500)), 100);
        assert_eq!(limits.normalize(Some(2)), 2);
        assert_eq!(limits.normalize(Some(0)), 0);
    }
}
