//! Dynamically typed options for caches and refreshers.
//!
//! Options arrive as `(key, value)` records and are validated into typed
//! settings when applied. Each consumer recognizes its own subset of
//! [`OptionKey`]s and answers anything else with [`OptionError::Unsupported`].

use crate::ports::AddressResolver;
use ferrous_dnscache_domain::{
    CacheBackend, CacheConfig, OptionError, OptionKey, RefreshStrategy, RefreshType,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Duration(Duration),
    RefreshType(RefreshType),
    Resolver(Arc<dyn AddressResolver>),
}

impl OptionValue {
    pub fn as_bool(&self, key: OptionKey) -> Result<bool, OptionError> {
        match self {
            Self::Bool(v) => Ok(*v),
            _ => Err(OptionError::WrongType(key)),
        }
    }

    pub fn as_duration(&self, key: OptionKey) -> Result<Duration, OptionError> {
        match self {
            Self::Duration(v) => Ok(*v),
            _ => Err(OptionError::WrongType(key)),
        }
    }

    /// Non-negative integer, e.g. a capacity or a batch size.
    pub fn as_size(&self, key: OptionKey) -> Result<usize, OptionError> {
        match self {
            Self::Int(v) => usize::try_from(*v).map_err(|_| OptionError::InvalidValue {
                key,
                reason: format!("{v} is negative"),
            }),
            _ => Err(OptionError::WrongType(key)),
        }
    }

    pub fn as_refresh_type(&self, key: OptionKey) -> Result<RefreshType, OptionError> {
        match self {
            Self::RefreshType(v) => Ok(*v),
            _ => Err(OptionError::WrongType(key)),
        }
    }

    pub fn as_resolver(&self, key: OptionKey) -> Result<Arc<dyn AddressResolver>, OptionError> {
        match self {
            Self::Resolver(v) => Ok(Arc::clone(v)),
            _ => Err(OptionError::WrongType(key)),
        }
    }
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::Duration(v) => f.debug_tuple("Duration").field(v).finish(),
            Self::RefreshType(v) => f.debug_tuple("RefreshType").field(v).finish(),
            Self::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

/// One `(key, value)` option record.
#[derive(Debug, Clone)]
pub struct ConfigOption {
    pub key: OptionKey,
    pub value: OptionValue,
}

impl ConfigOption {
    pub fn new(key: OptionKey, value: OptionValue) -> Self {
        Self { key, value }
    }

    pub fn bool(key: OptionKey, value: bool) -> Self {
        Self::new(key, OptionValue::Bool(value))
    }

    pub fn int(key: OptionKey, value: i64) -> Self {
        Self::new(key, OptionValue::Int(value))
    }

    pub fn duration(key: OptionKey, value: Duration) -> Self {
        Self::new(key, OptionValue::Duration(value))
    }

    pub fn refresh_type(value: RefreshType) -> Self {
        Self::new(OptionKey::RefreshType, OptionValue::RefreshType(value))
    }

    pub fn resolver(value: Arc<dyn AddressResolver>) -> Self {
        Self::new(OptionKey::Resolver, OptionValue::Resolver(value))
    }
}

/// First value given for `key`, if any.
pub fn find_option(options: &[ConfigOption], key: OptionKey) -> Option<&OptionValue> {
    options.iter().find(|o| o.key == key).map(|o| &o.value)
}

/// Pacing and deadline of a refresh pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOptions {
    pub shuffle: bool,
    /// Delay between lookups (sequential) or between waves (windowed).
    pub sleep: Duration,
    /// Deadline measured from the start of the pass; zero means none.
    pub timeout: Duration,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            shuffle: true,
            sleep: Duration::from_secs(1),
            timeout: Duration::ZERO,
        }
    }
}

impl RefreshOptions {
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_sleep(mut self, sleep: Duration) -> Self {
        self.sleep = sleep;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn apply(self, opt: &ConfigOption) -> Result<Self, OptionError> {
        match opt.key {
            OptionKey::RefreshShuffle => Ok(self.with_shuffle(opt.value.as_bool(opt.key)?)),
            OptionKey::RefreshSleepTime => Ok(self.with_sleep(opt.value.as_duration(opt.key)?)),
            OptionKey::RefreshTimeout => Ok(self.with_timeout(opt.value.as_duration(opt.key)?)),
            _ => Err(OptionError::Unsupported),
        }
    }
}

/// Parses the options of a standalone refresher into its strategy and pacing.
///
/// Recognized keys: RefreshType (default linear), RefreshBatchSize (required
/// for batch), RefreshShuffle, RefreshSleepTime and RefreshTimeout.
pub fn refresh_plan(
    options: &[ConfigOption],
) -> Result<(RefreshStrategy, RefreshOptions), OptionError> {
    let mut kind = RefreshType::default();
    let mut batch_size = None;
    let mut refresh = RefreshOptions::default();

    for opt in options {
        match opt.key {
            OptionKey::RefreshType => kind = opt.value.as_refresh_type(opt.key)?,
            OptionKey::RefreshBatchSize => batch_size = Some(opt.value.as_size(opt.key)?),
            _ => refresh = refresh.apply(opt)?,
        }
    }

    Ok((RefreshStrategy::from_parts(kind, batch_size)?, refresh))
}

/// Translates a configuration file section into cache options.
pub fn cache_options(
    config: &CacheConfig,
    resolver: Option<Arc<dyn AddressResolver>>,
) -> Vec<ConfigOption> {
    let mut options = vec![
        ConfigOption::bool(OptionKey::RefreshShuffle, config.refresh_shuffle),
        ConfigOption::duration(
            OptionKey::RefreshSleepTime,
            Duration::from_millis(config.refresh_sleep_ms),
        ),
        ConfigOption::refresh_type(config.refresh_type),
    ];

    if let Some(batch_size) = config.refresh_batch_size {
        options.push(ConfigOption::int(
            OptionKey::RefreshBatchSize,
            i64::try_from(batch_size).unwrap_or(i64::MAX),
        ));
    }

    if let Some(resolver) = resolver {
        options.push(ConfigOption::resolver(resolver));
    }

    if config.backend == CacheBackend::Lru {
        options.push(ConfigOption::int(
            OptionKey::CacheSize,
            i64::try_from(config.size).unwrap_or(i64::MAX),
        ));
        options.push(ConfigOption::bool(OptionKey::AllowRefresh, config.allow_refresh));
        if config.item_ttl_secs > 0 {
            options.push(ConfigOption::duration(
                OptionKey::ItemTtl,
                Duration::from_secs(config.item_ttl_secs),
            ));
        }
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_options_apply() {
        let opts = RefreshOptions::default()
            .apply(&ConfigOption::bool(OptionKey::RefreshShuffle, false))
            .unwrap()
            .apply(&ConfigOption::duration(
                OptionKey::RefreshSleepTime,
                Duration::from_millis(5),
            ))
            .unwrap();

        assert!(!opts.shuffle);
        assert_eq!(opts.sleep, Duration::from_millis(5));
        assert_eq!(opts.timeout, Duration::ZERO);
    }

    #[test]
    fn test_refresh_options_reject_wrong_type_and_foreign_keys() {
        let base = RefreshOptions::default();

        assert_eq!(
            base.apply(&ConfigOption::int(OptionKey::RefreshShuffle, 16)),
            Err(OptionError::WrongType(OptionKey::RefreshShuffle))
        );
        assert_eq!(
            base.apply(&ConfigOption::bool(OptionKey::RefreshTimeout, true)),
            Err(OptionError::WrongType(OptionKey::RefreshTimeout))
        );
        assert_eq!(
            base.apply(&ConfigOption::int(OptionKey::CacheSize, 5)),
            Err(OptionError::Unsupported)
        );
    }

    #[test]
    fn test_refresh_plan_batch() {
        let (strategy, refresh) = refresh_plan(&[
            ConfigOption::refresh_type(RefreshType::Batch),
            ConfigOption::int(OptionKey::RefreshBatchSize, 15),
            ConfigOption::duration(OptionKey::RefreshTimeout, Duration::from_secs(3)),
        ])
        .unwrap();

        assert_eq!(strategy, RefreshStrategy::WindowedParallel { window: 15 });
        assert_eq!(refresh.timeout, Duration::from_secs(3));
        assert!(refresh.shuffle);
    }

    #[test]
    fn test_refresh_plan_batch_without_size() {
        let result = refresh_plan(&[ConfigOption::refresh_type(RefreshType::Batch)]);

        assert_eq!(
            result.unwrap_err(),
            OptionError::MissingRequired(OptionKey::RefreshBatchSize)
        );
    }

    #[test]
    fn test_negative_size_is_invalid() {
        let err = OptionValue::Int(-1)
            .as_size(OptionKey::CacheSize)
            .unwrap_err();

        assert!(matches!(
            err,
            OptionError::InvalidValue {
                key: OptionKey::CacheSize,
                ..
            }
        ));
    }

    #[test]
    fn test_cache_options_for_lru() {
        let config = CacheConfig {
            backend: CacheBackend::Lru,
            size: 64,
            item_ttl_secs: 30,
            ..CacheConfig::default()
        };

        let options = cache_options(&config, None);

        assert!(matches!(
            find_option(&options, OptionKey::CacheSize),
            Some(OptionValue::Int(64))
        ));
        assert!(matches!(
            find_option(&options, OptionKey::ItemTtl),
            Some(OptionValue::Duration(d)) if *d == Duration::from_secs(30)
        ));
        assert!(find_option(&options, OptionKey::Resolver).is_none());
    }

    #[test]
    fn test_cache_options_for_map_skip_lru_keys() {
        let options = cache_options(&CacheConfig::default(), None);

        assert!(find_option(&options, OptionKey::CacheSize).is_none());
        assert!(find_option(&options, OptionKey::AllowRefresh).is_none());
        assert!(find_option(&options, OptionKey::ItemTtl).is_none());
    }
}
