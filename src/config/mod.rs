use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub store: StoreConfig,
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Defaults applied to every store built with `StoreOptions::new`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub cache_ttl_ms: u64,
    pub cache_max_size: Option<usize>,
    pub persist_dir: PathBuf,
    pub persist_version: u32,
    pub logging_enabled: bool,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub max_limit: Option<usize>,
    pub max_nested_depth: u32,
    pub debug_logging: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let mut config = Self::profile(environment);
        config.apply_env();
        config
    }

    /// Built-in defaults for an environment, before env var overrides
    pub fn profile(environment: Environment) -> Self {
        let development = Self {
            environment: Environment::Development,
            store: StoreConfig {
                cache_ttl_ms: 5 * 60 * 1000,
                cache_max_size: Some(100),
                persist_dir: PathBuf::from(".estate"),
                persist_version: 1,
                logging_enabled: true,
                log_level: "debug".to_string(),
            },
            filter: FilterConfig {
                max_limit: Some(1000),
                max_nested_depth: 10,
                debug_logging: true,
            },
        };

        match environment {
            Environment::Development => development,
            Environment::Staging => Self {
                environment,
                store: StoreConfig { log_level: "info".to_string(), ..development.store },
                filter: FilterConfig { max_limit: Some(500), max_nested_depth: 5, debug_logging: false },
            },
            Environment::Production => Self {
                environment,
                store: StoreConfig {
                    cache_max_size: Some(500),
                    persist_dir: PathBuf::from("/var/lib/estate"),
                    log_level: "warn".to_string(),
                    ..development.store
                },
                filter: FilterConfig { max_limit: Some(100), max_nested_depth: 3, debug_logging: false },
            },
        }
    }

    fn apply_env(&mut self) {
        override_from_env("STORE_CACHE_TTL_MS", &mut self.store.cache_ttl_ms);
        override_optional_from_env("STORE_CACHE_MAX_SIZE", &mut self.store.cache_max_size);
        override_from_env("STORE_PERSIST_DIR", &mut self.store.persist_dir);
        override_from_env("STORE_PERSIST_VERSION", &mut self.store.persist_version);
        override_from_env("STORE_LOGGING_ENABLED", &mut self.store.logging_enabled);
        override_from_env("STORE_LOG_LEVEL", &mut self.store.log_level);

        override_optional_from_env("FILTER_MAX_LIMIT", &mut self.filter.max_limit);
        override_from_env("FILTER_MAX_NESTED_DEPTH", &mut self.filter.max_nested_depth);
        override_from_env("FILTER_DEBUG_LOGGING", &mut self.filter.debug_logging);
    }
}

// Unparseable values keep the profile default
fn override_from_env<T: FromStr>(key: &str, target: &mut T) {
    if let Some(value) = env::var(key).ok().and_then(|v| v.parse().ok()) {
        *target = value;
    }
}

// Set but unparseable (e.g. "none") clears the bound
fn override_optional_from_env<T: FromStr>(key: &str, target: &mut Option<T>) {
    if let Ok(v) = env::var(key) {
        *target = v.parse().ok();
    }
}

/// Process-wide configuration, read from the environment on first use
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_profile_is_permissive() {
        let config = AppConfig::profile(Environment::Development);
        assert_eq!(config.store.cache_ttl_ms, 300_000);
        assert_eq!(config.store.cache_max_size, Some(100));
        assert_eq!(config.filter.max_limit, Some(1000));
        assert!(config.filter.debug_logging);
    }

    #[test]
    fn production_profile_tightens_limits() {
        let config = AppConfig::profile(Environment::Production);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.filter.max_limit, Some(100));
        assert_eq!(config.filter.max_nested_depth, 3);
        assert_eq!(config.store.log_level, "warn");
        assert_eq!(config.store.cache_ttl_ms, 300_000, "inherits the development ttl");
    }

    #[test]
    fn unparseable_override_keeps_default() {
        let mut depth = 7u32;
        std::env::set_var("ESTATE_TEST_DEPTH", "deep");
        override_from_env("ESTATE_TEST_DEPTH", &mut depth);
        assert_eq!(depth, 7);

        let mut limit = Some(10usize);
        std::env::set_var("ESTATE_TEST_LIMIT", "none");
        override_optional_from_env("ESTATE_TEST_LIMIT", &mut limit);
        assert_eq!(limit, None);
    }
}
