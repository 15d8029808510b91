use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::{BoardGeometry, PieceCatalog},
};

/// Construction-time constants of a game.
///
/// Fields missing from a serialized config fall back to the reference
/// values of [`GameConfig::default`].
///
/// # Example
///
/// ```
/// use donutris_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{"ring_count": 6}"#).unwrap();
/// assert_eq!(config.ring_count, 6);
/// assert_eq!(config.segments_per_ring, 32);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of concentric rings.
    pub ring_count: usize,
    /// Number of angular segments in every ring.
    pub segments_per_ring: usize,
    /// Period of the automatic inward move, in milliseconds.
    pub move_interval_ms: u64,
    /// Points awarded for each cleared ring.
    pub score_per_ring: usize,
    /// Templates new pieces are drawn from.
    pub catalog: PieceCatalog,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ring_count: 8,
            segments_per_ring: 32,
            move_interval_ms: 1000,
            score_per_ring: 100,
            catalog: PieceCatalog::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = BoardGeometry::MAX_DIMENSION;
        if !(1..=max).contains(&self.ring_count) {
            return Err(ConfigError::RingCount {
                actual: self.ring_count,
                max,
            });
        }
        // Four entry directions need four distinct segments
        if !(4..=max).contains(&self.segments_per_ring) {
            return Err(ConfigError::SegmentCount {
                actual: self.segments_per_ring,
                max,
            });
        }
        if self.move_interval_ms == 0 {
            return Err(ConfigError::ZeroMoveInterval);
        }
        if self.catalog.templates().is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        Ok(())
    }

    /// Board dimensions.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions have not passed [`Self::validate`].
    #[must_use]
    pub fn geometry(&self) -> BoardGeometry {
        BoardGeometry::new(self.ring_count, self.segments_per_ring)
    }

    #[must_use]
    pub fn move_interval(&self) -> Duration {
        Duration::from_millis(self.move_interval_ms)
    }
}
