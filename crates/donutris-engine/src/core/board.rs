use log::debug;

use crate::OutOfRangeError;

use super::{
    geometry::BoardGeometry,
    piece::{Piece, PieceColor},
};

/// Occupancy state of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum Cell {
    #[default]
    Empty,
    /// Cell committed by a placed piece of the given color.
    Filled(PieceColor),
}

/// One concentric ring of cells, indexed by segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    cells: Vec<Cell>,
}

impl Ring {
    fn empty(segments: usize) -> Self {
        Self {
            cells: vec![Cell::Empty; segments],
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_filled())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }
}

/// Occupancy grid of the radial board.
///
/// Ring `0` is the outer rim and doubles as the danger zone: any filled cell
/// there after a placement ends the game. Every ring has exactly
/// `segments_per_ring` cells.
///
/// # Example
///
/// ```
/// use donutris_engine::{Board, BoardGeometry, PieceColor};
///
/// let geometry = BoardGeometry::new(3, 4);
/// let mut board = Board::new(geometry);
/// let red = PieceColor::new(0xFF, 0, 0);
///
/// board.place((0..4).map(|s| (2, s)), red);
/// assert_eq!(board.clear_full_rings(), 1);
/// assert!(!board.is_occupied(2, 0).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    geometry: BoardGeometry,
    rings: Vec<Ring>,
}

impl Board {
    /// Creates a board with every cell empty.
    #[must_use]
    pub fn new(geometry: BoardGeometry) -> Self {
        let rings = (0..geometry.ring_count())
            .map(|_| Ring::empty(geometry.segments_per_ring()))
            .collect();
        Self { geometry, rings }
    }

    #[must_use]
    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    /// Rings from the rim (index 0) inward.
    #[must_use]
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// Returns the cell at `(ring, segment)`.
    ///
    /// The segment is wrapped first, so only the ring can be out of range.
    #[expect(clippy::cast_sign_loss)]
    pub fn cell(&self, ring: i32, segment: i32) -> Result<Cell, OutOfRangeError> {
        if !self.geometry.contains_ring(ring) {
            return Err(OutOfRangeError {
                ring,
                ring_count: self.geometry.ring_count(),
            });
        }
        let segment = self.geometry.wrap_segment(segment);
        Ok(self.rings[ring as usize].cells[segment])
    }

    pub fn is_occupied(&self, ring: i32, segment: i32) -> Result<bool, OutOfRangeError> {
        self.cell(ring, segment).map(|c| c.is_filled())
    }

    /// Fills the given cells with `color` and returns how many were written.
    ///
    /// Cells whose ring lies outside the board are skipped; segments wrap.
    #[expect(clippy::cast_sign_loss)]
    pub fn place<I>(&mut self, cells: I, color: PieceColor) -> usize
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let mut written = 0;
        for (ring, segment) in cells {
            if !self.geometry.contains_ring(ring) {
                debug!("dropping out-of-range cell ({ring}, {segment}) on placement");
                continue;
            }
            let segment = self.geometry.wrap_segment(segment);
            self.rings[ring as usize].cells[segment] = Cell::Filled(color);
            written += 1;
        }
        written
    }

    /// Commits every cell of `piece` to the board.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn fill_piece(&mut self, piece: &Piece) -> usize {
        let geometry = self.geometry;
        let cells = piece
            .occupied_cells(&geometry)
            .map(|(ring, segment)| (ring, segment as i32));
        self.place(cells, piece.color())
    }

    /// Clears every full ring and returns how many were cleared.
    ///
    /// Rings are scanned from the rim inward. When ring `k` is full it is
    /// removed, rings `0..k` each move one step inward, and ring 0 becomes
    /// empty. Shifting only touches rings that were already scanned, so a
    /// single pass sees every ring once in its final position.
    pub fn clear_full_rings(&mut self) -> usize {
        let mut count = 0;
        for ring in 0..self.rings.len() {
            if !self.rings[ring].is_full() {
                continue;
            }
            self.rings[..=ring].rotate_right(1);
            self.rings[0] = Ring::empty(self.geometry.segments_per_ring());
            count += 1;
            debug!("cleared ring {ring}");
        }
        count
    }

    /// Returns whether the rim (ring 0) has any filled cell.
    #[must_use]
    pub fn is_danger_zone_violated(&self) -> bool {
        !self.rings[0].is_empty()
    }

    /// Number of filled cells on the whole board.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rings
            .iter()
            .flat_map(|r| r.cells.iter())
            .filter(|c| c.is_filled())
            .count()
    }
}
