//! RON-driven layout configuration.
//!
//! ```ron
//! (
//!     strategy: Subtree,
//!     max_ancestor_hops: 64,
//!     max_nesting_depth: 16,
//! )
//! ```
//!
//! Every field is optional; missing fields take the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use braid_types::{DEFAULT_MAX_ANCESTOR_HOPS, DEFAULT_MAX_NESTING_DEPTH};

use crate::{ConfigError, Result};

/// Which lane allocator drives the gutter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LaneStrategy {
    /// Reclaim lanes as branches end; compact per row.
    #[default]
    Timeline,
    /// Fixed lane per branch from the full forest.
    Subtree,
}

/// Tunables for one layout pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub strategy: LaneStrategy,
    /// Circuit breaker for parent-chain walks.
    pub max_ancestor_hops: usize,
    /// Circuit breaker for nested group markers in one text.
    pub max_nesting_depth: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            strategy: LaneStrategy::default(),
            max_ancestor_hops: DEFAULT_MAX_ANCESTOR_HOPS,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl LayoutConfig {
    /// Parse and validate a config from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let config: LayoutConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_ron_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), ?config, "loaded layout config");
        Ok(config)
    }

    /// Reject ceilings that would disable the feature they guard.
    pub fn validate(&self) -> Result<()> {
        if self.max_ancestor_hops == 0 {
            return Err(ConfigError::Invalid("max_ancestor_hops must be at least 1".into()));
        }
        if self.max_nesting_depth == 0 {
            return Err(ConfigError::Invalid("max_nesting_depth must be at least 1".into()));
        }
        Ok(())
    }

    pub fn with_strategy(mut self, strategy: LaneStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = LayoutConfig::default();
        assert_eq!(config.strategy, LaneStrategy::Timeline);
        assert_eq!(config.max_ancestor_hops, 100);
        assert_eq!(config.max_nesting_depth, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_ron() {
        let config = LayoutConfig::from_ron_str("(strategy: Subtree)").unwrap();
        assert_eq!(config.strategy, LaneStrategy::Subtree);
        assert_eq!(config.max_ancestor_hops, 100);

        let config = LayoutConfig::from_ron_str("(max_ancestor_hops: 8, max_nesting_depth: 4)").unwrap();
        assert_eq!(config.strategy, LaneStrategy::Timeline);
        assert_eq!(config.max_ancestor_hops, 8);
        assert_eq!(config.max_nesting_depth, 4);
    }

    #[test]
    fn test_rejects_zero_ceilings() {
        let err = LayoutConfig::from_ron_str("(max_ancestor_hops: 0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = LayoutConfig::from_ron_str("(max_nesting_depth: 0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_ron() {
        let err = LayoutConfig::from_ron_str("(strategy: Sideways)").unwrap_err();
        assert!(matches!(err, ConfigError::Ron(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "(strategy: Subtree, max_nesting_depth: 3)").unwrap();
        let config = LayoutConfig::load(file.path()).unwrap();
        assert_eq!(config.strategy, LaneStrategy::Subtree);
        assert_eq!(config.max_nesting_depth, 3);

        let err = LayoutConfig::load("/definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("timeline".parse::<LaneStrategy>().unwrap(), LaneStrategy::Timeline);
        assert_eq!("SUBTREE".parse::<LaneStrategy>().unwrap(), LaneStrategy::Subtree);
        assert!("static".parse::<LaneStrategy>().is_err());
        assert_eq!(LaneStrategy::Subtree.to_string(), "subtree");
    }
}
