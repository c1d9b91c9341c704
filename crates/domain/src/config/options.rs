use std::fmt;

/// Names of the options accepted by caches and refreshers.
///
/// The set is shared, but each consumer recognizes only a subset of it;
/// anything outside that subset is reported as
/// [`OptionError::Unsupported`](crate::OptionError::Unsupported).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    /// An `AddressResolver`, used for every live lookup.
    Resolver,
    /// A bool. True shuffles the key snapshot before a refresh pass.
    RefreshShuffle,
    /// A duration. Delay between lookups (linear) or waves (batch); zero disables it.
    RefreshSleepTime,
    /// A [`RefreshType`](super::RefreshType).
    RefreshType,
    /// An integer. Lookups per wave when the batch refresher is used.
    RefreshBatchSize,
    /// A duration. Deadline for one refresh pass; zero means none.
    RefreshTimeout,
    /// An integer. Number of entries a bounded cache may hold.
    CacheSize,
    /// A duration. Idle lifetime of entries in a bounded cache.
    ItemTtl,
    /// A bool. False makes a bounded cache silently decline refreshes.
    AllowRefresh,
}

impl OptionKey {
    pub const ALL: [OptionKey; 9] = [
        Self::Resolver,
        Self::RefreshShuffle,
        Self::RefreshSleepTime,
        Self::RefreshType,
        Self::RefreshBatchSize,
        Self::RefreshTimeout,
        Self::CacheSize,
        Self::ItemTtl,
        Self::AllowRefresh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resolver => "Resolver",
            Self::RefreshShuffle => "RefreshShuffle",
            Self::RefreshSleepTime => "RefreshSleepTime",
            Self::RefreshType => "RefreshType",
            Self::RefreshBatchSize => "RefreshBatchSize",
            Self::RefreshTimeout => "RefreshTimeout",
            Self::CacheSize => "CacheSize",
            Self::ItemTtl => "ItemTTL",
            Self::AllowRefresh => "AllowRefresh",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_round_trip() {
        for key in OptionKey::ALL {
            assert_eq!(OptionKey::from_str(key.as_str()), Some(key));
        }
        assert_eq!(OptionKey::from_str("itemttl"), Some(OptionKey::ItemTtl));
        assert_eq!(OptionKey::from_str("NotAnOption"), None);
    }
}
