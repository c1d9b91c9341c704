pub mod config;

pub use config::{load_config, log_config};
