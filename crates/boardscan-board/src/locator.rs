//! Board outline search.
//!
//! The photo is converted to gray, blurred and binarized at a descending
//! list of thresholds. At each threshold the largest external contours are
//! simplified to polygons; the first 4-vertex polygon that looks like a
//! square seen under moderate perspective is the board.

use crate::imaging::gray_from_rgb;
use crate::{DetectError, LocatorParams};
use boardscan_core::Quadrilateral;
use image::RgbImage;
use imageproc::contours::{find_contours_with_threshold, BorderType, Contour};
use imageproc::geometry::{arc_length, contour_area};
use imageproc::point::Point;
use log::{debug, info};
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Find the board outline in a photo.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params), fields(width = img.width(), height = img.height()))
)]
pub fn locate_board(img: &RgbImage, params: &LocatorParams) -> Result<Quadrilateral, DetectError> {
    let gray = gray_from_rgb(img);
    let blurred = if params.blur_sigma > 0.0 {
        imageproc::filter::gaussian_blur_f32(&gray, params.blur_sigma)
    } else {
        gray
    };

    let image_area = img.width() as f64 * img.height() as f64;
    let min_area = params.min_area_frac as f64 * image_area;

    for &threshold in &params.thresholds {
        let mut candidates: Vec<(f64, Vec<Point<i32>>)> =
            find_contours_with_threshold::<i32>(&blurred, threshold)
                .into_iter()
                .filter(is_external)
                .map(|c| (contour_area(&c.points), c.points))
                .collect();
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

        debug!(
            "threshold {}: {} external contours, largest area {:.0}",
            threshold,
            candidates.len(),
            candidates.first().map_or(0.0, |c| c.0)
        );

        for (area, points) in candidates.iter().take(params.max_contours_per_threshold) {
            if *area < min_area {
                break;
            }
            if let Some(quad) = square_like_quad(points, params) {
                info!(
                    "board outline at threshold {}: area {:.0} ({:.0}% of image)",
                    threshold,
                    area,
                    100.0 * area / image_area
                );
                return Ok(quad);
            }
        }
    }

    debug!("no square-like outline at any threshold");
    Err(DetectError::BoardNotFound)
}

fn is_external(c: &Contour<i32>) -> bool {
    c.border_type == BorderType::Outer && c.parent.is_none()
}

/// Simplify a contour and accept it if it is a square-like quadrilateral.
pub(crate) fn square_like_quad(
    points: &[Point<i32>],
    params: &LocatorParams,
) -> Option<Quadrilateral> {
    if points.len() < 4 {
        return None;
    }
    let perimeter = arc_length(points, true);
    let epsilon = params.approx_epsilon_frac as f64 * perimeter;
    let approx = approximate_closed_polygon(points, epsilon);
    if approx.len() != 4 {
        debug!("contour simplifies to {} vertices, skipping", approx.len());
        return None;
    }

    let corners = [0, 1, 2, 3].map(|i| Point2::new(approx[i].x as f32, approx[i].y as f32));
    let quad = Quadrilateral::from_unordered(corners)?;

    let side_ratio = quad.side_ratio();
    let aspect = quad.aspect_ratio();
    if side_ratio < params.min_side_ratio || aspect < params.min_aspect_ratio {
        debug!(
            "quad rejected: side ratio {:.2}, aspect {:.2}",
            side_ratio, aspect
        );
        return None;
    }
    Some(quad)
}

fn perpendicular_distance(p: Point<i32>, a: Point<i32>, b: Point<i32>) -> f64 {
    let (px, py) = (p.x as f64, p.y as f64);
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (dx, dy) = (b.x as f64 - ax, b.y as f64 - ay);
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-12 {
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }
    ((px - ax) * dy - (py - ay) * dx).abs() / len
}

fn farthest_from(points: &[Point<i32>], from: Point<i32>) -> usize {
    let mut best = 0;
    let mut best_d = -1i64;
    for (i, p) in points.iter().enumerate() {
        let dx = (p.x - from.x) as i64;
        let dy = (p.y - from.y) as i64;
        let d = dx * dx + dy * dy;
        if d > best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

/// Douglas-Peucker on an open run of indices `[start, end]` (wrapping), pushing
/// kept interior indices into `keep`.
fn simplify_run(points: &[Point<i32>], start: usize, end: usize, epsilon: f64, keep: &mut Vec<usize>) {
    let n = points.len();
    let mut stack = vec![(start, end)];
    while let Some((s, e)) = stack.pop() {
        let span = (e + n - s) % n;
        if span < 2 {
            continue;
        }
        let mut best = None;
        let mut best_d = epsilon;
        for step in 1..span {
            let i = (s + step) % n;
            let d = perpendicular_distance(points[i], points[s], points[e]);
            if d > best_d {
                best_d = d;
                best = Some(i);
            }
        }
        if let Some(i) = best {
            keep.push(i);
            stack.push((s, i));
            stack.push((i, e));
        }
    }
}

/// Douglas-Peucker simplification of a closed curve.
///
/// The curve is split at two mutually distant points, which are vertices of
/// any convex outline, and each half is simplified independently.
pub(crate) fn approximate_closed_polygon(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let a = farthest_from(points, points[0]);
    let b = farthest_from(points, points[a]);
    if a == b {
        return vec![points[a]];
    }

    let mut keep = vec![a, b];
    simplify_run(points, a, b, epsilon, &mut keep);
    simplify_run(points, b, a, epsilon, &mut keep);

    // Restore traversal order starting from `a`.
    keep.sort_by_key(|&i| (i + n - a) % n);
    keep.dedup();
    keep.into_iter().map(|i| points[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{noise_image, render_board, BoardStyle};
    use image::Rgb;

    fn rect_outline(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<Point<i32>> {
        let mut pts = Vec::new();
        for x in x0..x1 {
            pts.push(Point::new(x, y0));
        }
        for y in y0..y1 {
            pts.push(Point::new(x1, y));
        }
        for x in (x0 + 1..=x1).rev() {
            pts.push(Point::new(x, y1));
        }
        for y in (y0 + 1..=y1).rev() {
            pts.push(Point::new(x0, y));
        }
        pts
    }

    /// Rasterized closed outline through `corners`, in order.
    fn polygon_outline(corners: &[(i32, i32)]) -> Vec<Point<i32>> {
        let mut pts = Vec::new();
        for (k, &(x0, y0)) in corners.iter().enumerate() {
            let (x1, y1) = corners[(k + 1) % corners.len()];
            let steps = (x1 - x0).abs().max((y1 - y0).abs());
            for i in 0..steps {
                let t = i as f64 / steps as f64;
                pts.push(Point::new(
                    (x0 as f64 + t * (x1 - x0) as f64).round() as i32,
                    (y0 as f64 + t * (y1 - y0) as f64).round() as i32,
                ));
            }
        }
        pts
    }

    /// A bright plate and a larger dim one on a dark background.
    fn two_plates() -> RgbImage {
        RgbImage::from_fn(640, 480, |x, y| {
            let level = if (20..210).contains(&x) && (20..210).contains(&y) {
                230
            } else if (300..520).contains(&x) && (200..420).contains(&y) {
                170
            } else {
                20
            };
            Rgb([level; 3])
        })
    }

    #[test]
    fn rectangle_outline_simplifies_to_four_corners() {
        let pts = rect_outline(10, 20, 110, 100);
        let perimeter = arc_length(&pts, true);
        let approx = approximate_closed_polygon(&pts, 0.02 * perimeter);
        assert_eq!(approx.len(), 4);
        for corner in [
            Point::new(10, 20),
            Point::new(110, 20),
            Point::new(110, 100),
            Point::new(10, 100),
        ] {
            assert!(approx.contains(&corner), "missing corner {corner:?}");
        }
    }

    #[test]
    fn elongated_outline_is_not_square_like() {
        let pts = rect_outline(0, 0, 300, 100);
        assert!(square_like_quad(&pts, &LocatorParams::default()).is_none());
        let pts = rect_outline(0, 0, 300, 280);
        assert!(square_like_quad(&pts, &LocatorParams::default()).is_some());
    }

    #[test]
    fn finds_framed_board() {
        let style = BoardStyle::default();
        let img = render_board(480, 420, 60, 40, &style);
        let quad = locate_board(&img, &LocatorParams::default()).expect("board");
        // Last frame pixel, the contour runs through pixel centers.
        let last = (style.plane_side() - 1) as f32;
        let expected = [
            Point2::new(60.0, 40.0),
            Point2::new(60.0 + last, 40.0),
            Point2::new(60.0 + last, 40.0 + last),
            Point2::new(60.0, 40.0 + last),
        ];
        for (got, want) in quad.corners().iter().zip(expected.iter()) {
            assert!((got - want).norm() < 3.0, "corner {got:?} vs {want:?}");
        }
    }

    #[test]
    fn aspect_check_rejects_outline_with_acceptable_sides() {
        let corners = [(15, 0), (171, 0), (186, 300), (0, 300)];
        let quad = Quadrilateral::from_unordered(
            corners.map(|(x, y)| Point2::new(x as f32, y as f32)),
        )
        .expect("convex");
        assert!(quad.side_ratio() >= 0.5, "side ratio {}", quad.side_ratio());
        assert!(quad.aspect_ratio() < 0.6, "aspect {}", quad.aspect_ratio());

        let outline = polygon_outline(&corners);
        assert!(square_like_quad(&outline, &LocatorParams::default()).is_none());

        let relaxed = LocatorParams {
            min_aspect_ratio: 0.5,
            ..LocatorParams::default()
        };
        let accepted = square_like_quad(&outline, &relaxed).expect("sides alone pass");
        assert_eq!(accepted.top_left(), Point2::new(15.0, 0.0));
        assert_eq!(accepted.top_right(), Point2::new(171.0, 0.0));
        assert_eq!(accepted.bottom_right(), Point2::new(186.0, 300.0));
        assert_eq!(accepted.bottom_left(), Point2::new(0.0, 300.0));
    }

    #[test]
    fn board_below_area_floor_is_ignored() {
        let style = BoardStyle {
            cell: 10,
            frame: 5,
            ..BoardStyle::default()
        };
        // 90 px plate: 8100 px against a 30720 px floor.
        let img = render_board(640, 480, 200, 150, &style);
        assert_eq!(
            locate_board(&img, &LocatorParams::default()),
            Err(DetectError::BoardNotFound)
        );

        let params = LocatorParams {
            min_area_frac: 0.01,
            ..LocatorParams::default()
        };
        let quad = locate_board(&img, &params).expect("small board");
        assert!(quad.area() < 0.1 * 640.0 * 480.0);
        assert!((quad.top_left() - Point2::new(200.0, 150.0)).norm() < 3.0);
    }

    #[test]
    fn first_listed_threshold_decides() {
        let img = two_plates();
        let bright_first = LocatorParams {
            thresholds: vec![200, 160],
            ..LocatorParams::default()
        };
        let quad = locate_board(&img, &bright_first).expect("bright plate");
        assert!((quad.top_left() - Point2::new(20.0, 20.0)).norm() < 4.0);
        assert!(quad.area() > 0.1 * 640.0 * 480.0);

        // At 160 both plates are foreground and the larger dim one ranks first.
        let dim_first = LocatorParams {
            thresholds: vec![160, 200],
            ..LocatorParams::default()
        };
        let quad = locate_board(&img, &dim_first).expect("dim plate");
        assert!((quad.top_left() - Point2::new(300.0, 200.0)).norm() < 4.0);
        assert!((quad.bottom_right() - Point2::new(519.0, 419.0)).norm() < 4.0);
    }

    #[test]
    fn noise_has_no_board() {
        let img = noise_image(400, 400, 7);
        assert_eq!(
            locate_board(&img, &LocatorParams::default()),
            Err(DetectError::BoardNotFound)
        );
    }

    #[test]
    fn uniform_dark_photo_has_no_board() {
        let img = RgbImage::from_pixel(200, 200, Rgb([30, 30, 30]));
        assert_eq!(
            locate_board(&img, &LocatorParams::default()),
            Err(DetectError::BoardNotFound)
        );
    }
}
