use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

use super::geometry::BoardGeometry;

/// Position of a piece cell relative to the piece anchor.
///
/// Serialized as a `[ring, segment]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct CellOffset {
    pub ring: i32,
    pub segment: i32,
}

impl CellOffset {
    #[must_use]
    pub const fn new(ring: i32, segment: i32) -> Self {
        Self { ring, segment }
    }

    /// Quarter turn in ring/segment space: `(r, s) -> (-s, r)`.
    ///
    /// Ring and segment have different units, so this only approximates a
    /// geometric rotation. Four applications give back the original offset.
    #[must_use]
    pub const fn rotated(self) -> Self {
        Self {
            ring: -self.segment,
            segment: self.ring,
        }
    }
}

impl From<(i32, i32)> for CellOffset {
    fn from((ring, segment): (i32, i32)) -> Self {
        Self { ring, segment }
    }
}

impl From<CellOffset> for (i32, i32) {
    fn from(offset: CellOffset) -> Self {
        (offset.ring, offset.segment)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ShapeError {
    #[display("piece shape has no cells")]
    Empty,
    #[display("piece shape has more than {MAX_PIECE_CELLS} cells")]
    Oversized,
    #[display("piece shape has duplicate offset ({ring}, {segment})")]
    DuplicateOffset { ring: i32, segment: i32 },
    #[display("piece shape offset ({ring}, {segment}) exceeds {max} in magnitude")]
    OffsetOutOfRange { ring: i32, segment: i32, max: i32 },
}

const MAX_PIECE_CELLS: usize = 8;

/// Set of cell offsets making up a piece.
///
/// Always non-empty, without duplicates, and at most [`PieceShape::MAX_CELLS`] cells.
/// Every offset component is within `±PieceShape::MAX_OFFSET`, so adding an
/// anchor position never overflows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CellOffset>", into = "Vec<CellOffset>")]
pub struct PieceShape {
    offsets: ArrayVec<CellOffset, MAX_PIECE_CELLS>,
}

impl PieceShape {
    pub const MAX_CELLS: usize = MAX_PIECE_CELLS;
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const MAX_OFFSET: i32 = BoardGeometry::MAX_DIMENSION as i32;

    pub fn new<I>(offsets: I) -> Result<Self, ShapeError>
    where
        I: IntoIterator<Item = CellOffset>,
    {
        let mut shape = ArrayVec::new();
        for offset in offsets {
            let max = Self::MAX_OFFSET.unsigned_abs();
            if offset.ring.unsigned_abs() > max || offset.segment.unsigned_abs() > max {
                return Err(ShapeError::OffsetOutOfRange {
                    ring: offset.ring,
                    segment: offset.segment,
                    max: Self::MAX_OFFSET,
                });
            }
            if shape.contains(&offset) {
                return Err(ShapeError::DuplicateOffset {
                    ring: offset.ring,
                    segment: offset.segment,
                });
            }
            shape.try_push(offset).map_err(|_| ShapeError::Oversized)?;
        }
        if shape.is_empty() {
            return Err(ShapeError::Empty);
        }
        Ok(Self { offsets: shape })
    }

    pub fn offsets(&self) -> impl Iterator<Item = CellOffset> + '_ {
        self.offsets.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Applies [`CellOffset::rotated`] to every offset.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            offsets: self.offsets.iter().map(|o| o.rotated()).collect(),
        }
    }
}

impl TryFrom<Vec<CellOffset>> for PieceShape {
    type Error = ShapeError;

    fn try_from(offsets: Vec<CellOffset>) -> Result<Self, Self::Error> {
        Self::new(offsets)
    }
}

impl From<PieceShape> for Vec<CellOffset> {
    fn from(shape: PieceShape) -> Self {
        shape.offsets.into_iter().collect()
    }
}

/// Opaque color token carried by pieces and filled cells.
///
/// Serialized as `"#RRGGBB"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PieceColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PieceColor {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for PieceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid color '{input}', expected '#RRGGBB'")]
pub struct ColorParseError {
    pub input: String,
}

impl FromStr for PieceColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError {
            input: s.to_owned(),
        };
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for PieceColor {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PieceColor> for String {
    fn from(color: PieceColor) -> Self {
        color.to_string()
    }
}

/// A named shape and color that pieces are spawned from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceTemplate {
    pub name: String,
    pub shape: PieceShape,
    pub color: PieceColor,
}

impl PieceTemplate {
    /// Builds a template from literal offsets.
    ///
    /// # Panics
    ///
    /// Panics if `offsets` is not a valid [`PieceShape`].
    #[must_use]
    pub fn from_offsets(name: &str, offsets: &[(i32, i32)], color: PieceColor) -> Self {
        let shape = PieceShape::new(offsets.iter().copied().map(CellOffset::from))
            .unwrap_or_else(|e| panic!("invalid shape for '{name}': {e}"));
        Self {
            name: name.to_owned(),
            shape,
            color,
        }
    }
}

/// Non-empty list of piece templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PieceTemplate>", into = "Vec<PieceTemplate>")]
pub struct PieceCatalog {
    templates: Vec<PieceTemplate>,
}

impl Default for PieceCatalog {
    fn default() -> Self {
        Self {
            templates: vec![
                PieceTemplate::from_offsets(
                    "L",
                    &[(0, 0), (0, 1), (0, 2), (1, 2)],
                    PieceColor::new(0xFF, 0x00, 0x00),
                ),
                PieceTemplate::from_offsets(
                    "reverse-L",
                    &[(0, 0), (0, 1), (0, 2), (1, 0)],
                    PieceColor::new(0x00, 0xFF, 0x00),
                ),
                PieceTemplate::from_offsets(
                    "square",
                    &[(0, 0), (0, 1), (1, 0), (1, 1)],
                    PieceColor::new(0x00, 0x00, 0xFF),
                ),
                PieceTemplate::from_offsets(
                    "line",
                    &[(0, 0), (0, 1), (0, 2), (0, 3)],
                    PieceColor::new(0xFF, 0xFF, 0x00),
                ),
                PieceTemplate::from_offsets(
                    "T",
                    &[(0, 0), (0, 1), (0, 2), (1, 1)],
                    PieceColor::new(0xFF, 0x00, 0xFF),
                ),
            ],
        }
    }
}

impl PieceCatalog {
    pub fn new(templates: Vec<PieceTemplate>) -> Result<Self, ConfigError> {
        if templates.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        Ok(Self { templates })
    }

    #[must_use]
    pub fn templates(&self) -> &[PieceTemplate] {
        &self.templates
    }

    /// Picks a template uniformly at random.
    pub fn choose<R>(&self, rng: &mut R) -> &PieceTemplate
    where
        R: Rng + ?Sized,
    {
        &self.templates[rng.random_range(0..self.templates.len())]
    }
}

impl TryFrom<Vec<PieceTemplate>> for PieceCatalog {
    type Error = ConfigError;

    fn try_from(templates: Vec<PieceTemplate>) -> Result<Self, Self::Error> {
        Self::new(templates)
    }
}

impl From<PieceCatalog> for Vec<PieceTemplate> {
    fn from(catalog: PieceCatalog) -> Self {
        catalog.templates
    }
}

/// Cardinal angle at which a new piece enters the rim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDirection {
    Top,
    Right,
    Bottom,
    Left,
}

impl Distribution<EntryDirection> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> EntryDirection {
        match rng.random_range(0..4) {
            0 => EntryDirection::Top,
            1 => EntryDirection::Right,
            2 => EntryDirection::Bottom,
            _ => EntryDirection::Left,
        }
    }
}

/// Angular direction for shifting a piece along its ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    /// Towards lower segment indices.
    Left,
    /// Towards higher segment indices.
    Right,
}

impl ShiftDirection {
    const fn delta(self) -> i32 {
        match self {
            ShiftDirection::Left => -1,
            ShiftDirection::Right => 1,
        }
    }
}

/// A falling piece: shape, anchor position and color.
///
/// Pieces are immutable; movement and rotation return new candidates that
/// the caller must collision-check before committing.
///
/// # Example
///
/// ```
/// use donutris_engine::{BoardGeometry, PieceCatalog, Piece, ShiftDirection};
///
/// let geometry = BoardGeometry::new(8, 32);
/// let catalog = PieceCatalog::default();
/// let piece = Piece::new(&catalog.templates()[3], 0);
///
/// let moved = piece.shifted(ShiftDirection::Left, &geometry);
/// assert_eq!(moved.segment(), 31);
/// assert_eq!(moved.moved_inward().ring(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    shape: PieceShape,
    ring: usize,
    segment: usize,
    color: PieceColor,
}

impl Piece {
    /// Places `template` on the rim (ring 0) at `segment`.
    #[must_use]
    pub fn new(template: &PieceTemplate, segment: usize) -> Self {
        Self {
            shape: template.shape.clone(),
            ring: 0,
            segment,
            color: template.color,
        }
    }

    #[must_use]
    pub fn with_position(shape: PieceShape, color: PieceColor, ring: usize, segment: usize) -> Self {
        Self {
            shape,
            ring,
            segment,
            color,
        }
    }

    /// Picks a template and one of the four entry directions uniformly at random.
    pub fn spawn<R>(catalog: &PieceCatalog, geometry: &BoardGeometry, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let template = catalog.choose(rng);
        let direction: EntryDirection = rng.random();
        Self::new(template, geometry.entry_segment(direction))
    }

    #[must_use]
    pub fn shape(&self) -> &PieceShape {
        &self.shape
    }

    #[must_use]
    pub fn ring(&self) -> usize {
        self.ring
    }

    #[must_use]
    pub fn segment(&self) -> usize {
        self.segment
    }

    #[must_use]
    pub fn color(&self) -> PieceColor {
        self.color
    }

    /// Absolute `(ring, segment)` cells of the piece.
    ///
    /// Segments are wrapped; rings are reported as-is and may lie outside the
    /// board.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn occupied_cells<'a>(
        &'a self,
        geometry: &'a BoardGeometry,
    ) -> impl Iterator<Item = (i32, usize)> + 'a {
        let ring = self.ring as i32;
        let segment = self.segment as i32;
        self.shape.offsets().map(move |offset| {
            (
                ring + offset.ring,
                geometry.wrap_segment(segment + offset.segment),
            )
        })
    }

    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn shifted(&self, direction: ShiftDirection, geometry: &BoardGeometry) -> Self {
        Self {
            segment: geometry.wrap_segment(self.segment as i32 + direction.delta()),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn moved_inward(&self) -> Self {
        Self {
            ring: self.ring + 1,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn shape(offsets: &[(i32, i32)]) -> PieceShape {
        PieceShape::new(offsets.iter().copied().map(CellOffset::from)).unwrap()
    }

    #[test]
    fn test_shape_rejects_invalid_offsets() {
        assert_eq!(PieceShape::new(std::iter::empty()), Err(ShapeError::Empty));
        assert_eq!(
            PieceShape::new([CellOffset::new(0, 1), CellOffset::new(0, 1)]),
            Err(ShapeError::DuplicateOffset {
                ring: 0,
                segment: 1
            })
        );
        let too_many = (0..=8).map(|s| CellOffset::new(0, s));
        assert_eq!(PieceShape::new(too_many), Err(ShapeError::Oversized));

        let far = [CellOffset::new(0, 0), CellOffset::new(0, i32::MAX)];
        assert_eq!(
            PieceShape::new(far),
            Err(ShapeError::OffsetOutOfRange {
                ring: 0,
                segment: i32::MAX,
                max: PieceShape::MAX_OFFSET
            })
        );
        assert!(PieceShape::new([CellOffset::new(i32::MIN, 0)]).is_err());
        let edge = [CellOffset::new(-PieceShape::MAX_OFFSET, PieceShape::MAX_OFFSET)];
        assert!(PieceShape::new(edge).is_ok());
    }

    #[test]
    fn test_rotation_transform() {
        let rotated = shape(&[(0, 0), (0, 1), (0, 2), (1, 2)]).rotated();
        let offsets: Vec<_> = rotated.offsets().map(<(i32, i32)>::from).collect();
        assert_eq!(offsets, vec![(0, 0), (-1, 0), (-2, 0), (-2, 1)]);
    }

    #[test]
    fn test_occupied_cells_wrap() {
        let geometry = BoardGeometry::new(3, 4);
        let piece = Piece::with_position(
            shape(&[(0, 0), (0, 1), (1, -1)]),
            PieceColor::new(1, 2, 3),
            1,
            3,
        );
        let cells: Vec<_> = piece.occupied_cells(&geometry).collect();
        assert_eq!(cells, vec![(1, 3), (1, 0), (2, 2)]);
    }

    #[test]
    fn test_shift_wraps_anchor() {
        let geometry = BoardGeometry::new(3, 4);
        let piece = Piece::with_position(shape(&[(0, 0)]), PieceColor::new(0, 0, 0), 0, 0);
        assert_eq!(piece.shifted(ShiftDirection::Left, &geometry).segment(), 3);
        assert_eq!(piece.shifted(ShiftDirection::Right, &geometry).segment(), 1);
        let back = piece
            .shifted(ShiftDirection::Left, &geometry)
            .shifted(ShiftDirection::Right, &geometry);
        assert_eq!(back, piece);
    }

    #[test]
    fn test_spawn_starts_on_rim_at_cardinal_segment() {
        let geometry = BoardGeometry::new(8, 32);
        let catalog = PieceCatalog::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut seen_segments = BTreeSet::new();
        let mut seen_colors = BTreeSet::new();
        for _ in 0..200 {
            let piece = Piece::spawn(&catalog, &geometry, &mut rng);
            assert_eq!(piece.ring(), 0);
            assert!([0, 8, 16, 24].contains(&piece.segment()));
            assert!(catalog.templates().iter().any(|t| t.shape == *piece.shape()));
            seen_segments.insert(piece.segment());
            seen_colors.insert(piece.color().to_string());
        }
        assert_eq!(seen_segments.len(), 4);
        assert_eq!(seen_colors.len(), catalog.templates().len());
    }

    #[test]
    fn test_color_parse_and_display() {
        let color: PieceColor = "#FF00aa".parse().unwrap();
        assert_eq!(color, PieceColor::new(0xFF, 0x00, 0xAA));
        assert_eq!(color.to_string(), "#FF00AA");

        assert!("FF00AA".parse::<PieceColor>().is_err());
        assert!("#FF00A".parse::<PieceColor>().is_err());
        assert!("#GG0000".parse::<PieceColor>().is_err());
    }

    #[test]
    fn test_template_deserialization() {
        let json = r##"{"name": "bar", "shape": [[0, 0], [0, 1]], "color": "#123456"}"##;
        let template: PieceTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(template.shape, shape(&[(0, 0), (0, 1)]));
        assert_eq!(template.color, PieceColor::new(0x12, 0x34, 0x56));

        let duplicate = r##"{"name": "bad", "shape": [[0, 0], [0, 0]], "color": "#123456"}"##;
        assert!(serde_json::from_str::<PieceTemplate>(duplicate).is_err());

        assert!(serde_json::from_str::<PieceCatalog>("[]").is_err());
    }

    fn arb_shape() -> impl Strategy<Value = PieceShape> {
        prop::collection::hash_set((-4i32..=4, -4i32..=4), 1..=PieceShape::MAX_CELLS)
            .prop_map(|set| PieceShape::new(set.into_iter().map(CellOffset::from)).unwrap())
    }

    proptest! {
        #[test]
        fn four_rotations_are_identity(shape in arb_shape()) {
            let rotated = shape.rotated().rotated().rotated().rotated();
            prop_assert_eq!(rotated, shape);
        }

        #[test]
        fn rotation_preserves_cell_count(shape in arb_shape()) {
            let cells: BTreeSet<_> = shape.rotated().offsets().map(<(i32, i32)>::from).collect();
            prop_assert_eq!(cells.len(), shape.len());
        }
    }
}
