use crate::config::OptionKey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("lookup {name}: {reason}")]
    LookupFailed { name: String, reason: String },

    #[error(transparent)]
    Option(#[from] OptionError),
}

/// Rejection raised while applying an option to a cache or refresher.
///
/// `Unsupported` carries no payload so callers can compare against it directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    #[error("option is not supported")]
    Unsupported,

    #[error("value of option {0} is the wrong type")]
    WrongType(OptionKey),

    #[error("option {0} is required")]
    MissingRequired(OptionKey),

    #[error("value of option {key} is invalid: {reason}")]
    InvalidValue { key: OptionKey, reason: String },
}
