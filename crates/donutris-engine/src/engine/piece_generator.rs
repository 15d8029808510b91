use std::fmt::{self, Write as _};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{BoardGeometry, Piece, PieceCatalog};

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the generator behind [`PieceGenerator`]. Two games
/// started from the same seed and fed the same commands play out identically.
///
/// # Example
///
/// ```
/// use donutris_engine::{GameConfig, GameSession, PieceSeed};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
///
/// let a = GameSession::new(GameConfig::default(), seed).unwrap();
/// let b = GameSession::new(GameConfig::default(), seed).unwrap();
/// assert_eq!(a.falling_piece(), b.falling_piece());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl From<u64> for PieceSeed {
    fn from(value: u64) -> Self {
        Self(u128::from(value).to_be_bytes())
    }
}

impl From<PieceSeed> for u128 {
    fn from(seed: PieceSeed) -> Self {
        u128::from_be_bytes(seed.0)
    }
}

impl PieceSeed {
    /// Returns the seed offset by `n`, treating it as a 128-bit integer.
    #[must_use]
    pub fn wrapping_add(self, n: u64) -> Self {
        Self(
            u128::from_be_bytes(self.0)
                .wrapping_add(u128::from(n))
                .to_be_bytes(),
        )
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{self}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Seeded source of new falling pieces.
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: Pcg32,
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    /// Creates a generator with a random seed.
    ///
    /// For deterministic games, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// Spawns the next piece on the rim.
    pub fn spawn(&mut self, catalog: &PieceCatalog, geometry: &BoardGeometry) -> Piece {
        Piece::spawn(catalog, geometry, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_serialization() {
        let seed = PieceSeed::from(0x1234_u64);
        let json = serde_json::to_string(&seed).unwrap();
        assert_eq!(json, "\"00000000000000000000000000001234\"");
        let parsed: PieceSeed = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, seed);
    }

    #[test]
    fn test_seed_deserialization_errors() {
        assert!(serde_json::from_str::<PieceSeed>("\"1234\"").is_err());
        assert!(serde_json::from_str::<PieceSeed>("\"zz000000000000000000000000001234\"").is_err());
    }

    #[test]
    fn test_seed_wrapping_add() {
        assert_eq!(PieceSeed::from(5).wrapping_add(3), PieceSeed::from(8));
        assert_eq!(PieceSeed([0xFF; 16]).wrapping_add(1), PieceSeed([0; 16]));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let catalog = PieceCatalog::default();
        let geometry = BoardGeometry::new(8, 32);
        let seed = PieceSeed::from(7);
        let mut a = PieceGenerator::with_seed(seed);
        let mut b = PieceGenerator::with_seed(seed);
        for _ in 0..50 {
            assert_eq!(a.spawn(&catalog, &geometry), b.spawn(&catalog, &geometry));
        }
    }
}
