//! Board outline as four image points.
//!
//! A [`Quadrilateral`] always stores its corners in canonical order
//! (top-left, top-right, bottom-right, bottom-left), so every consumer can
//! index corners by role instead of re-sorting.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Non-degenerate convex quadrilateral in canonical corner order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quadrilateral {
    corners: [Point2<f32>; 4],
}

/// Lengths of the four sides of a [`Quadrilateral`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeLengths {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeLengths {
    pub fn max(&self) -> f32 {
        self.top.max(self.right).max(self.bottom).max(self.left)
    }

    pub fn min(&self) -> f32 {
        self.top.min(self.right).min(self.bottom).min(self.left)
    }
}

// Ties are broken on the coordinates so the choice never depends on input order.
fn extreme_by<F>(pts: &[Point2<f32>; 4], key: F, want_max: bool) -> usize
where
    F: Fn(&Point2<f32>) -> f32,
{
    let cmp = |a: &Point2<f32>, b: &Point2<f32>| -> Ordering {
        key(a)
            .total_cmp(&key(b))
            .then(a.x.total_cmp(&b.x))
            .then(a.y.total_cmp(&b.y))
    };
    let mut best = 0;
    for i in 1..4 {
        let ord = cmp(&pts[i], &pts[best]);
        let better = if want_max {
            ord == Ordering::Greater
        } else {
            ord == Ordering::Less
        };
        if better {
            best = i;
        }
    }
    best
}

#[inline]
fn cross(o: Point2<f32>, a: Point2<f32>, b: Point2<f32>) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

impl Quadrilateral {
    /// Canonicalize four unordered points.
    ///
    /// top-left minimizes `x + y`, bottom-right maximizes it, top-right
    /// minimizes `y - x`, bottom-left maximizes it. Returns `None` when two
    /// roles land on the same point or the result is not a convex polygon
    /// with positive area.
    pub fn from_unordered(pts: [Point2<f32>; 4]) -> Option<Self> {
        let tl = extreme_by(&pts, |p| p.x + p.y, false);
        let br = extreme_by(&pts, |p| p.x + p.y, true);
        let tr = extreme_by(&pts, |p| p.y - p.x, false);
        let bl = extreme_by(&pts, |p| p.y - p.x, true);

        let roles = [tl, tr, br, bl];
        for i in 0..4 {
            for j in (i + 1)..4 {
                if roles[i] == roles[j] {
                    return None;
                }
            }
        }

        let quad = Self {
            corners: [pts[tl], pts[tr], pts[br], pts[bl]],
        };
        quad.is_convex().then_some(quad)
    }

    /// Corners as `[top_left, top_right, bottom_right, bottom_left]`.
    pub fn corners(&self) -> [Point2<f32>; 4] {
        self.corners
    }

    pub fn top_left(&self) -> Point2<f32> {
        self.corners[0]
    }

    pub fn top_right(&self) -> Point2<f32> {
        self.corners[1]
    }

    pub fn bottom_right(&self) -> Point2<f32> {
        self.corners[2]
    }

    pub fn bottom_left(&self) -> Point2<f32> {
        self.corners[3]
    }

    pub fn edge_lengths(&self) -> EdgeLengths {
        let [tl, tr, br, bl] = self.corners;
        EdgeLengths {
            top: (tr - tl).norm(),
            right: (br - tr).norm(),
            bottom: (br - bl).norm(),
            left: (bl - tl).norm(),
        }
    }

    /// Shortest side over longest side, in `[0, 1]`.
    pub fn side_ratio(&self) -> f32 {
        let e = self.edge_lengths();
        let max = e.max();
        if max <= 0.0 {
            return 0.0;
        }
        e.min() / max
    }

    /// Average width over average height, folded into `[0, 1]` so a
    /// landscape and a portrait outline of the same proportion score equally.
    pub fn aspect_ratio(&self) -> f32 {
        let e = self.edge_lengths();
        let w = 0.5 * (e.top + e.bottom);
        let h = 0.5 * (e.left + e.right);
        let (lo, hi) = if w < h { (w, h) } else { (h, w) };
        if hi <= 0.0 {
            return 0.0;
        }
        lo / hi
    }

    /// Shoelace area in square pixels.
    pub fn area(&self) -> f32 {
        let c = &self.corners;
        let mut twice = 0.0f32;
        for i in 0..4 {
            let j = (i + 1) % 4;
            twice += c[i].x * c[j].y - c[j].x * c[i].y;
        }
        0.5 * twice.abs()
    }

    fn is_convex(&self) -> bool {
        let c = &self.corners;
        let mut sign = 0.0f32;
        for i in 0..4 {
            let z = cross(c[i], c[(i + 1) % 4], c[(i + 2) % 4]);
            if z.abs() <= f32::EPSILON {
                return false;
            }
            if sign == 0.0 {
                sign = z.signum();
            } else if z.signum() != sign {
                return false;
            }
        }
        true
    }
}
