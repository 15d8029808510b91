pub use self::{board::*, geometry::*, piece::*};

pub(crate) mod board;
pub(crate) mod geometry;
pub(crate) mod piece;
