use std::collections::HashMap;

use donutris_engine::{Board, BoardGeometry, Cell, Piece, PieceColor, PolarLayout};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols::Marker,
    widgets::{
        Block as BlockWidget, BlockExt as _, Widget,
        canvas::{Canvas, Circle, Line, Points},
    },
};

use super::{color, piece_color};

/// Samples per cell along the ring axis.
const RING_SAMPLES: u16 = 4;
/// Samples per cell along the angular axis.
const SEGMENT_SAMPLES: u16 = 6;

/// Draws the radial board and the falling piece as filled wedges.
///
/// The board is laid out with [`PolarLayout::fit`] in a square canvas of side
/// 2 centered on the origin. Segment 0 points right and segment indices grow
/// clockwise on screen.
#[derive(Debug)]
pub struct DonutDisplay<'a> {
    board: &'a Board,
    falling_piece: Option<&'a Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> DonutDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            falling_piece: None,
            block: None,
        }
    }

    pub fn falling_piece(self, piece: Option<&'a Piece>) -> Self {
        Self {
            falling_piece: piece,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    /// Minimum size that keeps every ring distinguishable.
    pub fn min_height(&self) -> u16 {
        let rings = u16::try_from(self.board.geometry().ring_count()).unwrap_or(u16::MAX);
        rings.saturating_mul(3) + super::block_vertical_margin(self.block.as_ref())
    }

    /// Width matching `height` so the donut stays round on a 1:2 terminal cell.
    pub fn width_for(&self, height: u16) -> u16 {
        let inner = height.saturating_sub(super::block_vertical_margin(self.block.as_ref()));
        inner.saturating_mul(2) + super::block_horizontal_margin(self.block.as_ref())
    }

    /// Colored canvas points for every filled cell, falling piece included.
    fn wedges(&self, layout: &PolarLayout) -> HashMap<PieceColor, Vec<(f64, f64)>> {
        let geometry = self.board.geometry();
        let mut wedges: HashMap<PieceColor, Vec<(f64, f64)>> = HashMap::new();

        for (ring, cells) in self.board.rings().iter().enumerate() {
            for (segment, cell) in cells.cells().iter().enumerate() {
                if let Cell::Filled(color) = cell {
                    let points = wedges.entry(*color).or_default();
                    push_wedge(points, layout, geometry, ring, segment);
                }
            }
        }

        if let Some(piece) = self.falling_piece {
            let points = wedges.entry(piece.color()).or_default();
            for (ring, segment) in piece.occupied_cells(geometry) {
                if let Ok(ring) = usize::try_from(ring)
                    && ring < geometry.ring_count()
                {
                    push_wedge(points, layout, geometry, ring, segment);
                }
            }
        }
        wedges
    }
}

fn push_wedge(
    points: &mut Vec<(f64, f64)>,
    layout: &PolarLayout,
    geometry: &BoardGeometry,
    ring: usize,
    segment: usize,
) {
    #[expect(clippy::cast_precision_loss)]
    let (ring, segment) = (ring as f32, segment as f32);
    for i in 0..RING_SAMPLES {
        let r = ring + (f32::from(i) + 0.5) / f32::from(RING_SAMPLES);
        for j in 0..SEGMENT_SAMPLES {
            let s = segment + (f32::from(j) + 0.5) / f32::from(SEGMENT_SAMPLES);
            let p = layout.point(geometry, r, s);
            points.push(to_canvas(p.x, p.y));
        }
    }
}

/// Converts layout coordinates (y down) to canvas coordinates (y up).
fn to_canvas(x: f32, y: f32) -> (f64, f64) {
    (f64::from(x), -f64::from(y))
}

/// Canvas bounds that keep a circle of radius 1 round inside `area`.
///
/// Terminal cells are roughly twice as tall as they are wide.
fn canvas_bounds(area: Rect) -> ([f64; 2], [f64; 2]) {
    let width = f64::from(area.width.max(1));
    let height = f64::from(area.height.max(1)) * 2.0;
    if width >= height {
        let x = width / height;
        ([-x, x], [-1.0, 1.0])
    } else {
        let y = height / width;
        ([-1.0, 1.0], [-y, y])
    }
}

impl Widget for DonutDisplay<'_> {
    #[expect(clippy::cast_precision_loss)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let geometry = *self.board.geometry();
        let layout = PolarLayout::fit(&geometry, 2.0);
        let wedges = self.wedges(&layout);
        let (x_bounds, y_bounds) = canvas_bounds(area);

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                for ring in 0..=geometry.ring_count() {
                    let radius = layout.outer_radius - ring as f32 * layout.ring_width;
                    ctx.draw(&Circle {
                        x: 0.0,
                        y: 0.0,
                        radius: f64::from(radius),
                        color: color::DARK_GRAY,
                    });
                }
                for segment in 0..geometry.segments_per_ring() {
                    let outer = layout.point(&geometry, 0.0, segment as f32);
                    let inner =
                        layout.point(&geometry, geometry.ring_count() as f32, segment as f32);
                    let (x1, y1) = to_canvas(outer.x, outer.y);
                    let (x2, y2) = to_canvas(inner.x, inner.y);
                    ctx.draw(&Line::new(x1, y1, x2, y2, color::DARK_GRAY));
                }
                ctx.layer();
                for (color, coords) in &wedges {
                    ctx.draw(&Points {
                        coords,
                        color: piece_color(*color),
                    });
                }
            })
            .render(area, buf);
    }
}
