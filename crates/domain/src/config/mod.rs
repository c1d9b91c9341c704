//! Configuration module for Ferrous DNS Cache
//!
//! - `root`: Main configuration file
//! - `cache`: Back-end selection and refresh scheduling
//! - `options`: Option keys understood by caches and refreshers
//! - `refresh`: Refresh algorithm selection
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod cache;
pub mod errors;
pub mod logging;
pub mod options;
pub mod refresh;
pub mod root;

pub use cache::{CacheBackend, CacheConfig};
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use options::OptionKey;
pub use refresh::{RefreshStrategy, RefreshType};
pub use root::{CliOverrides, Config};
