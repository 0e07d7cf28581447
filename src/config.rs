use serde::{Deserialize, Serialize};

use crate::error::{QuadtreeError, Result};

pub const DEFAULT_MAX_OBJECTS: usize = 5;
pub const DEFAULT_MAX_LEVELS: u32 = 5;

/// Construction-time tuning shared by every node of a tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadtreeConfig {
    /// Leaf capacity. A leaf splits once it holds more than this many rectangles.
    #[serde(default = "default_max_objects")]
    pub max_objects: usize,
    /// Deepest level that may still split. Leaves at this level grow without bound.
    #[serde(default = "default_max_levels")]
    pub max_levels: u32,
}

fn default_max_objects() -> usize {
    DEFAULT_MAX_OBJECTS
}

fn default_max_levels() -> u32 {
    DEFAULT_MAX_LEVELS
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            max_objects: DEFAULT_MAX_OBJECTS,
            max_levels: DEFAULT_MAX_LEVELS,
        }
    }
}

impl QuadtreeConfig {
    pub fn new(max_objects: usize, max_levels: u32) -> Self {
        Self {
            max_objects,
            max_levels,
        }
    }

    /// Reads a config from TOML. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| QuadtreeError::InvalidConfig(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = QuadtreeConfig::default();
        assert_eq!(config.max_objects, 5);
        assert_eq!(config.max_levels, 5);
    }

    #[test]
    fn from_toml() {
        let config = QuadtreeConfig::from_toml_str("max_objects = 8\nmax_levels = 3\n").unwrap();
        assert_eq!(config, QuadtreeConfig::new(8, 3));

        let config = QuadtreeConfig::from_toml_str("max_levels = 2").unwrap();
        assert_eq!(config, QuadtreeConfig::new(DEFAULT_MAX_OBJECTS, 2));

        assert_eq!(QuadtreeConfig::from_toml_str("").unwrap(), QuadtreeConfig::default());
    }

    #[test]
    fn bad_toml() {
        assert!(matches!(
            QuadtreeConfig::from_toml_str("max_objects = \"many\""),
            Err(QuadtreeError::InvalidConfig(_))
        ));
        assert!(matches!(
            QuadtreeConfig::from_toml_str("max_levels = -1"),
            Err(QuadtreeError::InvalidConfig(_))
        ));
    }
}
