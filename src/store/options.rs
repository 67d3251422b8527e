use std::time::Duration;

use crate::config::CONFIG;
use crate::error::StoreError;
use crate::models::Entity;

use super::observer::StoreObserver;
use super::transform::{JsonTransformer, Transformer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "error" => LogLevel::Error,
            "warn" | "warning" => LogLevel::Warn,
            "debug" | "trace" => LogLevel::Debug,
            _ => LogLevel::Info,
        }
    }
}

/// Gate for the tracing events a store emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggingOptions {
    pub enabled: bool,
    pub level: LogLevel,
}

impl LoggingOptions {
    pub fn disabled() -> Self {
        Self { enabled: false, level: LogLevel::Error }
    }

    pub fn allows(&self, level: LogLevel) -> bool {
        self.enabled && level <= self.level
    }
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            enabled: CONFIG.store.logging_enabled,
            level: LogLevel::parse(&CONFIG.store.log_level),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub max_size: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_millis(CONFIG.store.cache_ttl_ms),
            max_size: CONFIG.store.cache_max_size,
        }
    }
}

pub type ErrorCallback = Box<dyn Fn(&StoreError) + Send + Sync>;

/// Construction options for a `Store`
pub struct StoreOptions<T> {
    pub name: String,
    pub persist: bool,
    pub version: u32,
    pub cache: CacheConfig,
    pub logging: LoggingOptions,
    pub max_limit: Option<usize>,
    pub(crate) transformer: Box<dyn Transformer<T>>,
    pub(crate) on_error: Option<ErrorCallback>,
    pub(crate) observers: Vec<Box<dyn StoreObserver<T>>>,
}

impl<T: Entity> StoreOptions<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            persist: false,
            version: CONFIG.store.persist_version,
            cache: CacheConfig::default(),
            logging: LoggingOptions::default(),
            max_limit: CONFIG.filter.max_limit,
            transformer: Box::new(JsonTransformer),
            on_error: None,
            observers: Vec::new(),
        }
    }

    /// Options named after the entity's store
    pub fn for_entity() -> Self {
        Self::new(T::STORE_NAME)
    }

    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    pub fn logging(mut self, logging: LoggingOptions) -> Self {
        self.logging = logging;
        self
    }

    pub fn max_limit(mut self, max_limit: Option<usize>) -> Self {
        self.max_limit = max_limit;
        self
    }

    pub fn transformer(mut self, transformer: impl Transformer<T> + 'static) -> Self {
        self.transformer = Box::new(transformer);
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&StoreError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn observer(mut self, observer: impl StoreObserver<T> + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_gate_by_severity() {
        let logging = LoggingOptions { enabled: true, level: LogLevel::Warn };
        assert!(logging.allows(LogLevel::Error));
        assert!(logging.allows(LogLevel::Warn));
        assert!(!logging.allows(LogLevel::Debug));
        assert!(!LoggingOptions::disabled().allows(LogLevel::Error));
    }

    #[test]
    fn unknown_level_defaults_to_info() {
        assert_eq!(LogLevel::parse("WARNING"), LogLevel::Warn);
        assert_eq!(LogLevel::parse("verbose"), LogLevel::Info);
    }
}
