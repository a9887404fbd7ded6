//! Outline strip generation.
//!
//! Converts a polyline into the paired vertex records the outline kernel
//! extrudes. Each point emits two vertices sharing position and neighbors,
//! with `direction = +arc` and `-arc`; drawn as a triangle strip they form
//! the ribbon.

use glam::Vec3;

use super::OutlineVertex;

/// Arc length assigned to the first point.
///
/// `direction` must never be zero, since its sign selects the extrusion side.
pub const START_ARC_LENGTH: f32 = 1.0e-3;

/// A polyline in body-centered world coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlinePath {
    points: Vec<Vec3>,
    closed: bool,
}

impl OutlinePath {
    /// Open path through `points`. Consecutive duplicates are dropped.
    pub fn open(points: impl IntoIterator<Item = Vec3>) -> Self {
        Self {
            points: dedup(points),
            closed: false,
        }
    }

    /// Closed ring through `points`; the closing segment is implicit.
    ///
    /// Rings with fewer than three distinct points are drawn as open paths.
    pub fn closed(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut points = dedup(points);
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Self { points, closed: true }
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed && self.points.len() >= 3
    }

    /// Total arc length, including the closing segment of a ring.
    pub fn length(&self) -> f32 {
        let open: f32 = self.points.windows(2).map(|w| (w[1] - w[0]).length()).sum();
        match (self.is_closed(), self.points.first(), self.points.last()) {
            (true, Some(first), Some(last)) => open + (*first - *last).length(),
            _ => open,
        }
    }

    /// Triangle-strip vertices for the outline kernel.
    ///
    /// Returns an empty vector for paths with fewer than two distinct points.
    pub fn strip_vertices(&self) -> Vec<OutlineVertex> {
        let pts = &self.points;
        let n = pts.len();
        if n < 2 {
            log::debug!("outline path with {n} distinct point(s) produces no geometry");
            return Vec::new();
        }

        let closed = self.is_closed();
        // A ring revisits its first point so the strip closes.
        let count = if closed { n + 1 } else { n };

        let mut out = Vec::with_capacity(count * 2);
        let mut arc = START_ARC_LENGTH;

        for i in 0..count {
            let idx = i % n;
            let pos = pts[idx];
            if i > 0 {
                arc += (pos - pts[(i - 1) % n]).length();
            }

            let (prev, mut next) = if closed {
                (pts[(idx + n - 1) % n], pts[(idx + 1) % n])
            } else {
                (
                    if i == 0 { pos } else { pts[i - 1] },
                    if i + 1 == n { pos } else { pts[i + 1] },
                )
            };
            // Path doubling back on itself: use the incoming segment.
            if prev == next {
                next = pos;
            }

            out.push(OutlineVertex::new(pos, prev, next, arc));
            out.push(OutlineVertex::new(pos, prev, next, -arc));
        }

        out
    }
}

fn dedup(points: impl IntoIterator<Item = Vec3>) -> Vec<Vec3> {
    let mut out: Vec<Vec3> = points.into_iter().collect();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(vertices: &[OutlineVertex]) {
        assert_eq!(vertices.len() % 2, 0);
        for pair in vertices.chunks(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.direction, -b.direction);
            assert!(a.direction > 0.0);
            assert_ne!(a.prev_pos, a.next_pos);
        }
    }

    #[test]
    fn segment_emits_two_pairs() {
        let a = Vec3::new(6.4e6, 0.0, 0.0);
        let b = Vec3::new(6.4e6, 100.0, 0.0);
        let v = OutlinePath::open([a, b]).strip_vertices();

        assert_eq!(v.len(), 4);
        assert_well_formed(&v);
        assert_eq!(v[0].direction, START_ARC_LENGTH);
        assert_eq!(v[2].direction, START_ARC_LENGTH + 100.0);
        // endpoints use themselves as the missing neighbor
        assert_eq!(v[0].prev_pos, a.to_array());
        assert_eq!(v[0].next_pos, b.to_array());
        assert_eq!(v[2].prev_pos, a.to_array());
        assert_eq!(v[2].next_pos, b.to_array());
    }

    #[test]
    fn repeated_points_are_dropped() {
        let a = Vec3::X;
        let b = Vec3::Y;
        let path = OutlinePath::open([a, a, b, b, b]);
        assert_eq!(path.points(), &[a, b]);
        assert_eq!(path.strip_vertices().len(), 4);
    }

    #[test]
    fn single_point_produces_nothing() {
        assert!(OutlinePath::open([Vec3::ONE, Vec3::ONE]).strip_vertices().is_empty());
        assert!(OutlinePath::default().strip_vertices().is_empty());
    }

    #[test]
    fn ring_revisits_first_point() {
        let square = [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let path = OutlinePath::closed(square);
        assert!(path.is_closed());
        assert_eq!(path.points().len(), 4);
        assert_eq!(path.length(), 4.0);

        let v = path.strip_vertices();
        assert_eq!(v.len(), 10);
        assert_well_formed(&v);
        assert_eq!(v[8].pos, v[0].pos);
        assert!((v[8].direction - (START_ARC_LENGTH + 4.0)).abs() < 1e-5);
        // the first point's neighbors wrap around the ring
        assert_eq!(v[0].prev_pos, square[3].to_array());
        assert_eq!(v[8].next_pos, square[1].to_array());
    }

    #[test]
    fn two_point_ring_is_drawn_open() {
        let path = OutlinePath::closed([Vec3::X, Vec3::Y]);
        assert!(!path.is_closed());
        let v = path.strip_vertices();
        assert_eq!(v.len(), 4);
        assert_well_formed(&v);
    }

    #[test]
    fn doubling_back_keeps_a_defined_tangent() {
        let a = Vec3::new(0.0, 0.0, 1.0);
        let b = Vec3::new(1.0, 0.0, 1.0);
        let v = OutlinePath::open([a, b, a]).strip_vertices();
        assert_eq!(v.len(), 6);
        assert_well_formed(&v);
        assert_eq!(v[2].prev_pos, a.to_array());
        assert_eq!(v[2].next_pos, b.to_array());
    }
}
