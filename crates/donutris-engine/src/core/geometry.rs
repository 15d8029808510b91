use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::piece::EntryDirection;

/// Dimensions of the radial board.
///
/// Rings are indexed from the outer rim (`0`) toward the hole
/// (`ring_count - 1`). Segments are angular slices and wrap around the circle.
///
/// # Example
///
/// ```
/// use donutris_engine::BoardGeometry;
///
/// let geometry = BoardGeometry::new(8, 32);
/// assert_eq!(geometry.wrap_segment(-1), 31);
/// assert_eq!(geometry.wrap_segment(32), 0);
/// assert!(geometry.contains_ring(7));
/// assert!(!geometry.contains_ring(8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    ring_count: usize,
    segments_per_ring: usize,
}

impl BoardGeometry {
    /// Upper bound for either dimension, keeping every index representable as `i32`.
    pub const MAX_DIMENSION: usize = 1024;

    #[must_use]
    pub const fn new(ring_count: usize, segments_per_ring: usize) -> Self {
        assert!(ring_count > 0 && ring_count <= Self::MAX_DIMENSION);
        assert!(segments_per_ring > 0 && segments_per_ring <= Self::MAX_DIMENSION);
        Self {
            ring_count,
            segments_per_ring,
        }
    }

    #[must_use]
    pub const fn ring_count(&self) -> usize {
        self.ring_count
    }

    #[must_use]
    pub const fn segments_per_ring(&self) -> usize {
        self.segments_per_ring
    }

    /// Maps any segment value onto `[0, segments_per_ring)`.
    ///
    /// All angular arithmetic goes through here; it is idempotent and never
    /// returns an out-of-range index.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]
    pub const fn wrap_segment(&self, segment: i32) -> usize {
        segment.rem_euclid(self.segments_per_ring as i32) as usize
    }

    /// Returns whether `ring` lies on the board. The ring axis does not wrap.
    #[must_use]
    #[expect(clippy::cast_sign_loss)]
    pub const fn contains_ring(&self, ring: i32) -> bool {
        ring >= 0 && (ring as usize) < self.ring_count
    }

    /// Segment where a piece entering from `direction` is anchored.
    #[must_use]
    pub const fn entry_segment(&self, direction: EntryDirection) -> usize {
        let n = self.segments_per_ring;
        match direction {
            EntryDirection::Top => 0,
            EntryDirection::Right => n / 4,
            EntryDirection::Bottom => n / 2,
            EntryDirection::Left => 3 * n / 4,
        }
    }
}

/// Screen-space placement of the donut, used by renderers only.
///
/// The outer edge of ring `r` sits at `outer_radius - r * ring_width`; the
/// hole in the middle has radius `outer_radius - ring_count * ring_width`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarLayout {
    pub center: Vec2,
    pub outer_radius: f32,
    pub ring_width: f32,
}

impl Default for PolarLayout {
    fn default() -> Self {
        Self {
            center: Vec2::new(300.0, 300.0),
            outer_radius: 240.0,
            ring_width: 20.0,
        }
    }
}

impl PolarLayout {
    /// Fits `geometry` into a square of side `size` centered at the origin,
    /// leaving the innermost third of the radius as the hole.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn fit(geometry: &BoardGeometry, size: f32) -> Self {
        let outer_radius = size / 2.0;
        let ring_width = outer_radius * 2.0 / 3.0 / geometry.ring_count() as f32;
        Self {
            center: Vec2::ZERO,
            outer_radius,
            ring_width,
        }
    }

    /// Radius of the empty hole inside the innermost ring.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn inner_radius(&self, geometry: &BoardGeometry) -> f32 {
        self.outer_radius - geometry.ring_count() as f32 * self.ring_width
    }

    /// Point at the outer edge of `ring`, at the start angle of `segment`.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn to_cartesian(&self, geometry: &BoardGeometry, ring: usize, segment: usize) -> Vec2 {
        self.point(geometry, ring as f32, segment as f32)
    }

    /// Like [`Self::to_cartesian`], with fractional ring and segment positions.
    ///
    /// `point(g, r + 0.5, s + 0.5)` is the middle of the wedge at `(r, s)`.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn point(&self, geometry: &BoardGeometry, ring: f32, segment: f32) -> Vec2 {
        let radius = self.outer_radius - ring * self.ring_width;
        let angle = segment * TAU / geometry.segments_per_ring() as f32;
        self.center + Vec2::new(radius * angle.cos(), radius * angle.sin())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_wrap_segment_basic() {
        let geometry = BoardGeometry::new(8, 32);
        assert_eq!(geometry.wrap_segment(0), 0);
        assert_eq!(geometry.wrap_segment(31), 31);
        assert_eq!(geometry.wrap_segment(32), 0);
        assert_eq!(geometry.wrap_segment(-1), 31);
        assert_eq!(geometry.wrap_segment(-33), 31);
        assert_eq!(geometry.wrap_segment(65), 1);
    }

    #[test]
    fn test_contains_ring() {
        let geometry = BoardGeometry::new(3, 4);
        assert!(!geometry.contains_ring(-1));
        assert!(geometry.contains_ring(0));
        assert!(geometry.contains_ring(2));
        assert!(!geometry.contains_ring(3));
    }

    #[test]
    fn test_entry_segments() {
        let geometry = BoardGeometry::new(8, 32);
        assert_eq!(geometry.entry_segment(EntryDirection::Top), 0);
        assert_eq!(geometry.entry_segment(EntryDirection::Right), 8);
        assert_eq!(geometry.entry_segment(EntryDirection::Bottom), 16);
        assert_eq!(geometry.entry_segment(EntryDirection::Left), 24);

        // Integer floor for sizes not divisible by 4
        let geometry = BoardGeometry::new(8, 10);
        assert_eq!(geometry.entry_segment(EntryDirection::Right), 2);
        assert_eq!(geometry.entry_segment(EntryDirection::Bottom), 5);
        assert_eq!(geometry.entry_segment(EntryDirection::Left), 7);
    }

    #[test]
    fn test_to_cartesian_radius_and_angle() {
        let geometry = BoardGeometry::new(8, 32);
        let layout = PolarLayout::default();

        let p = layout.to_cartesian(&geometry, 0, 0);
        assert!((p - Vec2::new(540.0, 300.0)).length() < 1e-3);

        // Quarter turn, two rings in
        let p = layout.to_cartesian(&geometry, 2, 8);
        assert!((p - Vec2::new(300.0, 500.0)).length() < 1e-3);

        assert!((layout.inner_radius(&geometry) - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_radius_decreases_with_ring() {
        let geometry = BoardGeometry::new(8, 32);
        let layout = PolarLayout::default();
        let mut prev = f32::INFINITY;
        for ring in 0..geometry.ring_count() {
            let r = (layout.to_cartesian(&geometry, ring, 5) - layout.center).length();
            assert!(r < prev);
            prev = r;
        }
    }

    #[test]
    fn test_fit_layout() {
        let geometry = BoardGeometry::new(8, 32);
        let layout = PolarLayout::fit(&geometry, 90.0);
        assert!((layout.outer_radius - 45.0).abs() < 1e-3);
        assert!((layout.inner_radius(&geometry) - 15.0).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn wrap_segment_is_in_range_and_idempotent(segments in 1usize..=256, s in any::<i32>()) {
            let geometry = BoardGeometry::new(4, segments);
            let wrapped = geometry.wrap_segment(s);
            prop_assert!(wrapped < segments);
            #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
            let again = geometry.wrap_segment(wrapped as i32);
            prop_assert_eq!(again, wrapped);
        }
    }
}
