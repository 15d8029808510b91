use log::{debug, trace};

use crate::{
    PieceCollisionError,
    core::{Board, BoardGeometry, Piece, PieceCatalog, ShiftDirection},
};

use super::piece_generator::{PieceGenerator, PieceSeed};

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum TopOutReason {
    /// The placed piece left cells on the rim.
    #[display("piece placed in the danger zone")]
    DangerZone,
    /// The next piece collided at its spawn position.
    #[display("spawn position blocked")]
    SpawnBlocked,
}

/// Outcome of an inward move attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum InwardMove {
    /// The piece advanced one ring.
    Moved,
    /// The piece was committed to the board and a new piece spawned.
    Placed { cleared_rings: usize },
    /// The piece was committed and the game is over; no piece is falling.
    ToppedOut {
        cleared_rings: usize,
        reason: TopOutReason,
    },
}

/// Board plus the falling piece and the source of new pieces.
///
/// This is the simulation step logic without scoring or session state.
/// Moves are validated against the board; a rejected move leaves the field
/// untouched and reports [`PieceCollisionError`].
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    falling_piece: Option<Piece>,
    catalog: PieceCatalog,
    generator: PieceGenerator,
}

impl GameField {
    /// Creates an empty board and spawns the first piece.
    ///
    /// If the first piece already collides (only possible with shapes that
    /// reach outside the rim), the field starts with no falling piece.
    #[must_use]
    pub fn new(geometry: BoardGeometry, catalog: PieceCatalog, seed: PieceSeed) -> Self {
        let mut this = Self {
            board: Board::new(geometry),
            falling_piece: None,
            catalog,
            generator: PieceGenerator::with_seed(seed),
        };
        let piece = this.generator.spawn(&this.catalog, &geometry);
        if this.collides(&piece) {
            debug!("first piece collides at spawn");
        } else {
            this.falling_piece = Some(piece);
        }
        this
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn geometry(&self) -> &BoardGeometry {
        self.board.geometry()
    }

    #[must_use]
    pub fn falling_piece(&self) -> Option<&Piece> {
        self.falling_piece.as_ref()
    }

    /// Replaces the falling piece if it fits on the board.
    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.collides(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = Some(piece);
        Ok(())
    }

    #[must_use]
    pub fn collides(&self, piece: &Piece) -> bool {
        self.collides_with_offset(piece, 0, 0)
    }

    /// Checks `piece` moved by the given ring and segment offsets.
    ///
    /// Any cell off the ring axis counts as a collision, on the rim side as
    /// well as past the innermost ring. The segment axis always wraps.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn collides_with_offset(&self, piece: &Piece, ring_offset: i32, segment_offset: i32) -> bool {
        piece
            .occupied_cells(self.board.geometry())
            .any(|(ring, segment)| {
                self.board
                    .is_occupied(ring + ring_offset, segment as i32 + segment_offset)
                    .unwrap_or(true)
            })
    }

    pub fn try_shift(&mut self, direction: ShiftDirection) -> Result<(), PieceCollisionError> {
        let piece = self
            .falling_piece
            .as_ref()
            .ok_or(PieceCollisionError)?
            .shifted(direction, self.board.geometry());
        self.set_falling_piece(piece)
            .inspect_err(|_| trace!("shift {direction:?} rejected"))
    }

    pub fn try_rotate(&mut self) -> Result<(), PieceCollisionError> {
        let piece = self
            .falling_piece
            .as_ref()
            .ok_or(PieceCollisionError)?
            .rotated();
        self.set_falling_piece(piece)
            .inspect_err(|_| trace!("rotation rejected"))
    }

    /// Moves the falling piece one ring inward, or places it if blocked.
    ///
    /// Placement commits the piece at its current position, then checks the
    /// danger zone before clearing any ring: a piece left on the rim ends the
    /// game even if it completed an inner ring. Otherwise full rings are
    /// cleared and the next piece is spawned; if that piece collides the game
    /// ends as well.
    ///
    /// Returns `None` when there is no falling piece.
    pub fn move_inward(&mut self) -> Option<InwardMove> {
        let piece = self.falling_piece.take()?;
        if !self.collides_with_offset(&piece, 1, 0) {
            self.falling_piece = Some(piece.moved_inward());
            return Some(InwardMove::Moved);
        }
        Some(self.place_piece(&piece))
    }

    fn place_piece(&mut self, piece: &Piece) -> InwardMove {
        let written = self.board.fill_piece(piece);
        debug!(
            "placed piece at ({}, {}) with {written} cells",
            piece.ring(),
            piece.segment()
        );

        if self.board.is_danger_zone_violated() {
            return InwardMove::ToppedOut {
                cleared_rings: 0,
                reason: TopOutReason::DangerZone,
            };
        }

        let cleared_rings = self.board.clear_full_rings();

        let geometry = *self.board.geometry();
        let next = self.generator.spawn(&self.catalog, &geometry);
        if self.collides(&next) {
            return InwardMove::ToppedOut {
                cleared_rings,
                reason: TopOutReason::SpawnBlocked,
            };
        }
        self.falling_piece = Some(next);
        InwardMove::Placed { cleared_rings }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{Cell, CellOffset, PieceColor, PieceShape, PieceTemplate};

    use super::*;

    const RED: PieceColor = PieceColor::new(0xFF, 0, 0);
    const GRAY: PieceColor = PieceColor::new(0x80, 0x80, 0x80);

    fn shape(offsets: &[(i32, i32)]) -> PieceShape {
        PieceShape::new(offsets.iter().copied().map(CellOffset::from)).unwrap()
    }

    fn single_template_field(ring_count: usize, offsets: &[(i32, i32)]) -> GameField {
        let catalog =
            PieceCatalog::new(vec![PieceTemplate::from_offsets("test", offsets, RED)]).unwrap();
        GameField::new(BoardGeometry::new(ring_count, 4), catalog, PieceSeed::from(1))
    }

    fn piece_at(offsets: &[(i32, i32)], ring: usize, segment: usize) -> Piece {
        Piece::with_position(shape(offsets), RED, ring, segment)
    }

    fn cells(field: &GameField) -> Vec<(i32, usize)> {
        let mut cells: Vec<_> = field
            .falling_piece()
            .unwrap()
            .occupied_cells(field.geometry())
            .collect();
        cells.sort_unstable();
        cells
    }

    #[test]
    fn test_first_piece_on_rim() {
        let field = single_template_field(3, &[(0, 0), (0, 1)]);
        let piece = field.falling_piece().unwrap();
        assert_eq!(piece.ring(), 0);
        assert!(piece.segment() < 4);
    }

    #[test]
    fn test_shift_right_moves_both_cells() {
        let mut field = single_template_field(3, &[(0, 0), (0, 1)]);
        field.set_falling_piece(piece_at(&[(0, 0), (0, 1)], 0, 0)).unwrap();

        field.try_shift(ShiftDirection::Right).unwrap();
        assert_eq!(field.falling_piece().unwrap().segment(), 1);
        assert_eq!(cells(&field), vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn test_shift_wraps_around_circle() {
        let mut field = single_template_field(3, &[(0, 0)]);
        field.set_falling_piece(piece_at(&[(0, 0), (0, 1)], 1, 0)).unwrap();

        field.try_shift(ShiftDirection::Left).unwrap();
        assert_eq!(cells(&field), vec![(1, 0), (1, 3)]);
    }

    #[test]
    fn test_blocked_shift_is_rejected_without_change() {
        let mut field = single_template_field(3, &[(0, 0)]);
        field.board.place([(1, 2)], GRAY);
        field.set_falling_piece(piece_at(&[(0, 0), (0, 1)], 1, 0)).unwrap();

        assert!(field.try_shift(ShiftDirection::Right).is_err());
        assert_eq!(cells(&field), vec![(1, 0), (1, 1)]);
    }

    #[test]
    fn test_rotation_off_the_rim_is_rejected() {
        let mut field = single_template_field(4, &[(0, 0)]);
        // Rotating (0,1) gives (-1,0): above the rim at ring 0
        field.set_falling_piece(piece_at(&[(0, 0), (0, 1)], 0, 0)).unwrap();
        assert!(field.try_rotate().is_err());

        field.set_falling_piece(piece_at(&[(0, 0), (0, 1)], 1, 0)).unwrap();
        field.try_rotate().unwrap();
        assert_eq!(cells(&field), vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn test_rotation_past_inner_edge_is_rejected() {
        let mut field = single_template_field(3, &[(0, 0)]);
        // Rotating (0,-1) gives (1,0): past the innermost ring at ring 2
        field.set_falling_piece(piece_at(&[(0, 0), (0, -1)], 2, 1)).unwrap();
        assert!(field.try_rotate().is_err());
    }

    #[test]
    fn test_collides_with_offset() {
        let mut field = single_template_field(3, &[(0, 0)]);
        field.board.place([(2, 1)], GRAY);
        let piece = piece_at(&[(0, 0)], 1, 0);
        assert!(!field.collides(&piece));
        assert!(field.collides_with_offset(&piece, 1, 1));
        assert!(field.collides_with_offset(&piece, 1, -3));
        assert!(!field.collides_with_offset(&piece, 1, 0));
        assert!(field.collides_with_offset(&piece, 2, 0));
        assert!(field.collides_with_offset(&piece, -2, 0));
    }

    #[test]
    fn test_move_inward_advances_ring() {
        let mut field = single_template_field(3, &[(0, 0)]);
        field.set_falling_piece(piece_at(&[(0, 0)], 0, 2)).unwrap();

        assert_eq!(field.move_inward(), Some(InwardMove::Moved));
        assert_eq!(field.falling_piece().unwrap().ring(), 1);
        assert_eq!(field.board().occupied_count(), 0);
    }

    #[test]
    fn test_blocked_move_places_piece_and_spawns_next() {
        let mut field = single_template_field(4, &[(0, 0)]);
        field.board.place([(3, 2)], GRAY);
        field.set_falling_piece(piece_at(&[(0, 0), (0, 1)], 2, 1)).unwrap();

        assert_eq!(
            field.move_inward(),
            Some(InwardMove::Placed { cleared_rings: 0 })
        );
        assert_eq!(field.board().cell(2, 1), Ok(Cell::Filled(RED)));
        assert_eq!(field.board().cell(2, 2), Ok(Cell::Filled(RED)));
        assert_eq!(field.board().occupied_count(), 3);
        assert_eq!(field.falling_piece().unwrap().ring(), 0);
    }

    #[test]
    fn test_piece_stops_at_innermost_ring() {
        let mut field = single_template_field(3, &[(0, 0)]);
        field.set_falling_piece(piece_at(&[(0, 0)], 0, 0)).unwrap();

        assert_eq!(field.move_inward(), Some(InwardMove::Moved));
        assert_eq!(field.move_inward(), Some(InwardMove::Moved));
        assert!(field.move_inward().unwrap().is_placed());
        assert_eq!(field.board().cell(2, 0), Ok(Cell::Filled(RED)));
    }

    #[test]
    fn test_placement_clears_completed_ring() {
        let mut field = single_template_field(3, &[(0, 0)]);
        field.board.place([(2, 0), (2, 1), (2, 2)], GRAY);
        field.board.place([(1, 0)], GRAY);
        field.set_falling_piece(piece_at(&[(0, 0)], 2, 3)).unwrap();

        assert_eq!(
            field.move_inward(),
            Some(InwardMove::Placed { cleared_rings: 1 })
        );
        // Ring 1 content moved into ring 2
        assert_eq!(field.board().cell(2, 0), Ok(Cell::Filled(GRAY)));
        assert_eq!(field.board().occupied_count(), 1);
    }

    #[test]
    fn test_danger_zone_wins_over_ring_clear() {
        let mut field = single_template_field(3, &[(0, 0)]);
        // Ring 1 is one cell short; the piece completes it but also sits on the rim
        field.board.place([(1, 1), (1, 2), (1, 3)], GRAY);
        field.board.place([(2, 0)], GRAY);
        field.set_falling_piece(piece_at(&[(0, 0), (1, 0)], 0, 0)).unwrap();

        assert_eq!(
            field.move_inward(),
            Some(InwardMove::ToppedOut {
                cleared_rings: 0,
                reason: TopOutReason::DangerZone
            })
        );
        assert!(field.falling_piece().is_none());
        assert!(field.board().rings()[1].is_full());
        assert!(field.board().is_danger_zone_violated());
        assert_eq!(field.move_inward(), None);
    }

    #[test]
    fn test_spawn_blocked_ends_game() {
        // The only template covers all of ring 1 when spawned
        let mut field = single_template_field(4, &[(0, 0), (1, 0), (1, 1), (1, 2), (1, 3)]);
        field.board.place([(2, 2)], GRAY);
        field.set_falling_piece(piece_at(&[(0, 0)], 1, 2)).unwrap();

        assert_eq!(
            field.move_inward(),
            Some(InwardMove::ToppedOut {
                cleared_rings: 0,
                reason: TopOutReason::SpawnBlocked
            })
        );
        assert!(field.falling_piece().is_none());
        assert_eq!(field.board().cell(1, 2), Ok(Cell::Filled(RED)));
        assert!(!field.board().is_danger_zone_violated());
    }
}
