//! Ferrous DNS Cache Domain Layer
pub mod config;
pub mod errors;
pub mod validators;

pub use config::{
    CacheBackend, CacheConfig, CliOverrides, Config, ConfigError, LoggingConfig, OptionKey,
    RefreshStrategy, RefreshType,
};
pub use errors::{DomainError, OptionError};
