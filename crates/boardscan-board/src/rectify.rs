//! Perspective correction of the located board.

use crate::imaging::{into_rgb_image, rgb_view};
use crate::DetectError;
use boardscan_core::{homography_from_4pt, warp_perspective_rgb, Homography, Quadrilateral};
use image::RgbImage;
use log::debug;
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Square, fronto-parallel view of the board outline.
#[derive(Clone, Debug)]
pub struct RectifiedBoard {
    /// `side x side` RGB buffer.
    pub image: RgbImage,
    /// Outline in the source photo, canonical corner order.
    pub quad: Quadrilateral,
    /// Maps rectified pixel indices back into source photo pixels.
    pub h_img_from_rect: Homography,
}

impl RectifiedBoard {
    pub fn side(&self) -> u32 {
        self.image.width()
    }

    /// Source photo position of a rectified pixel.
    pub fn to_image(&self, p: Point2<f32>) -> Point2<f32> {
        self.h_img_from_rect.apply(p)
    }
}

/// Side length of the rectified square: the longest projected edge, rounded up.
pub fn rectified_side(quad: &Quadrilateral) -> u32 {
    quad.edge_lengths().max().ceil().max(0.0) as u32
}

/// Warp the inside of `quad` into a square image.
///
/// The corners of the outline land on the corner pixels of the output, so
/// the whole board, frame included, fills the rectified image.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(img, quad), fields(side = rectified_side(quad)))
)]
pub fn rectify_board(img: &RgbImage, quad: &Quadrilateral) -> Result<RectifiedBoard, DetectError> {
    let side = rectified_side(quad);
    if side < 2 {
        return Err(DetectError::DegenerateQuad);
    }

    let s = (side - 1) as f32;
    let rect_corners = [
        Point2::new(0.0, 0.0),
        Point2::new(s, 0.0),
        Point2::new(s, s),
        Point2::new(0.0, s),
    ];
    let h_img_from_rect =
        homography_from_4pt(&rect_corners, &quad.corners()).ok_or(DetectError::DegenerateQuad)?;

    let warped = warp_perspective_rgb(&rgb_view(img), h_img_from_rect, side as usize, side as usize);
    let image = into_rgb_image(warped).ok_or(DetectError::DegenerateQuad)?;

    debug!(
        "rectified {:?} into {}x{}",
        quad.corners().map(|p| (p.x.round(), p.y.round())),
        side,
        side
    );

    Ok(RectifiedBoard {
        image,
        quad: *quad,
        h_img_from_rect,
    })
}

/// Canonicalize four unordered corners and rectify.
pub fn rectify_points(img: &RgbImage, pts: [Point2<f32>; 4]) -> Result<RectifiedBoard, DetectError> {
    let quad = Quadrilateral::from_unordered(pts).ok_or(DetectError::DegenerateQuad)?;
    rectify_board(img, &quad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use image::Rgb;

    fn skewed() -> [Point2<f32>; 4] {
        [
            Point2::new(150.0, 60.0),
            Point2::new(500.0, 80.0),
            Point2::new(540.0, 420.0),
            Point2::new(110.0, 400.0),
        ]
    }

    #[test]
    fn output_is_square_and_covers_longest_edge() {
        let img = RgbImage::from_pixel(640, 480, Rgb([120, 120, 120]));
        let quad = Quadrilateral::from_unordered(skewed()).expect("convex");
        let board = rectify_board(&img, &quad).expect("rectified");
        assert_eq!(board.image.width(), board.image.height());
        assert!(board.side() as f32 >= quad.edge_lengths().max());
    }

    #[test]
    fn corners_map_back_to_outline() {
        let img = RgbImage::new(640, 480);
        let pts = skewed();
        let board = rectify_points(&img, [pts[2], pts[0], pts[3], pts[1]]).expect("rectified");
        let s = (board.side() - 1) as f32;
        for (rect, want) in [
            Point2::new(0.0, 0.0),
            Point2::new(s, 0.0),
            Point2::new(s, s),
            Point2::new(0.0, s),
        ]
        .iter()
        .zip(pts.iter())
        {
            let got = board.to_image(*rect);
            assert_abs_diff_eq!(got.x, want.x, epsilon = 1e-2);
            assert_abs_diff_eq!(got.y, want.y, epsilon = 1e-2);
        }
    }

    #[test]
    fn axis_aligned_outline_is_a_crop() {
        let mut img = RgbImage::from_pixel(50, 40, Rgb([0, 0, 0]));
        for y in 10..30 {
            for x in 20..40 {
                img.put_pixel(x, y, Rgb([200, 10, 10]));
            }
        }
        let board = rectify_points(
            &img,
            [
                Point2::new(20.0, 10.0),
                Point2::new(39.0, 10.0),
                Point2::new(39.0, 29.0),
                Point2::new(20.0, 29.0),
            ],
        )
        .expect("rectified");
        assert_eq!(board.side(), 19);
        assert!(board.image.pixels().all(|p| p.0 == [200, 10, 10]));
    }

    #[test]
    fn collapsed_outline_is_degenerate() {
        let img = RgbImage::new(10, 10);
        let p = Point2::new(5.0, 5.0);
        assert_eq!(
            rectify_points(&img, [p, p, p, p]).unwrap_err(),
            DetectError::DegenerateQuad
        );
    }
}
