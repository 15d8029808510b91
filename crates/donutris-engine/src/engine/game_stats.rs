use serde::Serialize;

/// Number of histogram buckets for simultaneous ring clears.
///
/// The last bucket also counts placements that cleared more rings.
const RING_CLEAR_BUCKETS: usize = 5;

/// Game statistics: score, placed pieces and cleared rings.
///
/// Every cleared ring is worth the same number of points, so the score is
/// simply `total_cleared_rings * score_per_ring`.
///
/// # Example
///
/// ```
/// use donutris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_placement(2, 100);
///
/// assert_eq!(stats.score(), 200);
/// assert_eq!(stats.total_cleared_rings(), 2);
/// assert_eq!(stats.ring_clear_counter()[2], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_rings: usize,
    ring_clear_counter: [usize; RING_CLEAR_BUCKETS],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_rings: 0,
            ring_clear_counter: [0; RING_CLEAR_BUCKETS],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the number of pieces committed to the board.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_rings(&self) -> usize {
        self.total_cleared_rings
    }

    /// Returns a histogram of placements by rings cleared at once.
    ///
    /// Index `n` counts placements that cleared `n` rings; the last index
    /// also includes anything larger.
    #[must_use]
    pub const fn ring_clear_counter(&self) -> &[usize; RING_CLEAR_BUCKETS] {
        &self.ring_clear_counter
    }

    /// Records one placement that cleared `cleared_rings` rings.
    pub fn complete_piece_placement(&mut self, cleared_rings: usize, score_per_ring: usize) {
        self.completed_pieces += 1;
        self.total_cleared_rings += cleared_rings;
        self.ring_clear_counter[cleared_rings.min(RING_CLEAR_BUCKETS - 1)] += 1;
        self.score += cleared_rings * score_per_ring;
    }
}
