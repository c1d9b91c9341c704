//! Ferrous DNS Cache Application Layer
pub mod options;
pub mod ports;

pub use options::{
    cache_options, find_option, refresh_plan, ConfigOption, OptionValue, RefreshOptions,
};
