//! Tunables the spec leaves "implementation-chosen" or lists as bit-exact defaults.

use serde::{Deserialize, Serialize};

/// Added to a scalar divisor before dividing, to avoid division by zero.
pub const TINY_TOLERANCE: f64 = 1e-300;

/// Default tolerance used by equality comparisons (`Matrix::approx_eq` and friends).
pub const DEFAULT_EQUALITY_TOLERANCE: f64 = 1e-10;

/// Bytes read per chunk by the CSV loader/saver.
pub const BUFFER_SIZE: usize = 8192;

/// Minimum row-slice size the scheduler will hand to a single worker before it
/// stops subdividing further.
pub const DEFAULT_TILE_THRESHOLD: usize = 64;

/// Process-wide tunables, overridable by a boundary adapter (a CLI, a config
/// file loaded with `serde_json`). Every field defaults to the spec's documented
/// bit-exact constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tiny_tolerance: f64,
    pub equality_tolerance: f64,
    pub buffer_size: usize,
    pub tile_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tiny_tolerance: TINY_TOLERANCE,
            equality_tolerance: DEFAULT_EQUALITY_TOLERANCE,
            buffer_size: BUFFER_SIZE,
            tile_threshold: DEFAULT_TILE_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Parses an `EngineConfig` from a JSON document, falling back to documented
    /// defaults for any field the document omits.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_constants() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.tiny_tolerance, 1e-300);
        assert_eq!(cfg.equality_tolerance, 1e-10);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg = EngineConfig::from_json(r#"{"tile_threshold": 16}"#).unwrap();
        assert_eq!(cfg.tile_threshold, 16);
        assert_eq!(cfg.tiny_tolerance, TINY_TOLERANCE);
    }
}
