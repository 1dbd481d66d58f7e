//! Configuration types for EngageDB.
//!
//! # Example
//! ```rust
//! use engagedb::{Config, RankingConfig, SyncMode};
//!
//! let config = Config {
//!     sync_mode: SyncMode::Fast,
//!     ranking: RankingConfig { default_limit: 30 },
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::scoring::{MAX_RANK_LIMIT, MIN_RANK_LIMIT};

/// Database configuration options.
///
/// All fields have defaults; override with struct update syntax.
#[derive(Clone, Debug)]
pub struct Config {
    /// Cache size in megabytes for the storage engine.
    ///
    /// Default: 64 MB
    pub cache_size_mb: usize,

    /// Durability mode for write operations.
    pub sync_mode: SyncMode,

    /// Listing defaults.
    pub ranking: RankingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_size_mb: 64,
            sync_mode: SyncMode::Normal,
            ranking: RankingConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new Config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration.
    ///
    /// Called automatically by `EngageDB::open()`.
    ///
    /// # Errors
    /// Returns `ValidationError` if:
    /// - `cache_size_mb` is 0
    /// - `ranking.default_limit` is outside `[1, 50]`
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cache_size_mb == 0 {
            return Err(ValidationError::invalid_field(
                "cache_size_mb",
                "must be greater than 0",
            ));
        }

        let limit = self.ranking.default_limit;
        if !(MIN_RANK_LIMIT..=MAX_RANK_LIMIT).contains(&limit) {
            return Err(ValidationError::invalid_field(
                "ranking.default_limit",
                format!(
                    "must be between {} and {}, got {}",
                    MIN_RANK_LIMIT, MAX_RANK_LIMIT, limit
                ),
            ));
        }

        Ok(())
    }
}

/// Listing configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankingConfig {
    /// Page size used when a [`RankQuery`](crate::RankQuery) carries no limit.
    ///
    /// Default: 20
    pub default_limit: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self { default_limit: 20 }
    }
}

/// Durability mode for write operations.
///
/// Controls the trade-off between write performance and crash safety.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncMode {
    /// Sync to disk on transaction commit.
    #[default]
    Normal,

    /// Defer the sync; recent facts may be lost on crash.
    Fast,

    /// Sync on commit with two-phase commit enabled.
    Paranoid,
}

impl SyncMode {
    /// Returns true if this mode uses two-phase commit.
    pub fn is_paranoid(&self) -> bool {
        matches!(self, Self::Paranoid)
    }

    /// Returns true if this mode is async (may lose data on crash).
    pub fn is_fast(&self) -> bool {
        matches!(self, Self::Fast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cache_size_mb, 64);
        assert_eq!(config.sync_mode, SyncMode::Normal);
        assert_eq!(config.ranking.default_limit, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_cache_size_zero() {
        let config = Config {
            cache_size_mb: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ValidationError::InvalidField { field, .. } if field == "cache_size_mb")
        );
    }

    #[test]
    fn test_validate_default_limit_bounds() {
        for bad in [0, 51, 1000] {
            let config = Config {
                ranking: RankingConfig { default_limit: bad },
                ..Default::default()
            };
            assert!(config.validate().is_err(), "limit {} should be rejected", bad);
        }

        for good in [1, 50] {
            let config = Config {
                ranking: RankingConfig {
                    default_limit: good,
                },
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_sync_mode_checks() {
        assert!(!SyncMode::Normal.is_fast());
        assert!(!SyncMode::Normal.is_paranoid());
        assert!(SyncMode::Fast.is_fast());
        assert!(SyncMode::Paranoid.is_paranoid());
    }
}
