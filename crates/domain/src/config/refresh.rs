use super::OptionKey;
use crate::OptionError;
use serde::{Deserialize, Serialize};

/// Refresher selected through the `RefreshType` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshType {
    /// Silently refuse to refresh.
    Off,
    /// One lookup at a time, paced by the sleep time.
    #[default]
    Linear,
    /// Waves of `RefreshBatchSize` concurrent lookups, paced by the sleep time.
    Batch,
}

impl RefreshType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "none" => Some(Self::Off),
            "linear" | "sequential" => Some(Self::Linear),
            "batch" | "parallel" => Some(Self::Batch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Linear => "linear",
            Self::Batch => "batch",
        }
    }
}

/// Fully resolved refresh algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshStrategy {
    Off,
    #[default]
    Sequential,
    WindowedParallel { window: usize },
}

impl RefreshStrategy {
    /// Combines a [`RefreshType`] with its batch size.
    ///
    /// The batch size is mandatory (and must be positive) for [`RefreshType::Batch`]
    /// and ignored otherwise.
    pub fn from_parts(kind: RefreshType, batch_size: Option<usize>) -> Result<Self, OptionError> {
        match kind {
            RefreshType::Off => Ok(Self::Off),
            RefreshType::Linear => Ok(Self::Sequential),
            RefreshType::Batch => match batch_size {
                None | Some(0) => Err(OptionError::MissingRequired(OptionKey::RefreshBatchSize)),
                Some(window) => Ok(Self::WindowedParallel { window }),
            },
        }
    }

    pub fn kind(&self) -> RefreshType {
        match self {
            Self::Off => RefreshType::Off,
            Self::Sequential => RefreshType::Linear,
            Self::WindowedParallel { .. } => RefreshType::Batch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_requires_positive_window() {
        assert_eq!(
            RefreshStrategy::from_parts(RefreshType::Batch, None),
            Err(OptionError::MissingRequired(OptionKey::RefreshBatchSize))
        );
        assert_eq!(
            RefreshStrategy::from_parts(RefreshType::Batch, Some(0)),
            Err(OptionError::MissingRequired(OptionKey::RefreshBatchSize))
        );
        assert_eq!(
            RefreshStrategy::from_parts(RefreshType::Batch, Some(15)),
            Ok(RefreshStrategy::WindowedParallel { window: 15 })
        );
    }

    #[test]
    fn test_batch_size_ignored_for_other_kinds() {
        assert_eq!(
            RefreshStrategy::from_parts(RefreshType::Linear, Some(4)),
            Ok(RefreshStrategy::Sequential)
        );
        assert_eq!(
            RefreshStrategy::from_parts(RefreshType::Off, None),
            Ok(RefreshStrategy::Off)
        );
    }

    #[test]
    fn test_refresh_type_from_str() {
        assert_eq!(RefreshType::from_str("BATCH"), Some(RefreshType::Batch));
        assert_eq!(RefreshType::from_str("sequential"), Some(RefreshType::Linear));
        assert_eq!(RefreshType::from_str("sometimes"), None);
    }
}
