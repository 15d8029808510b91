pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding when moving falling piece")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("ring {ring} out of range (ring count: {ring_count})")]
pub struct OutOfRangeError {
    pub ring: i32,
    pub ring_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("ring count must be between 1 and {max}, got {actual}")]
    RingCount { actual: usize, max: usize },
    #[display("segments per ring must be between 4 and {max}, got {actual}")]
    SegmentCount { actual: usize, max: usize },
    #[display("move interval must be positive")]
    ZeroMoveInterval,
    #[display("piece catalog is empty")]
    EmptyCatalog,
}
