//! Rendered boards with known geometry, for tests and benchmarks.
//!
//! The board plane is an 8x8 checkerboard surrounded by a light frame,
//! `8 * cell + 2 * frame` units wide. Square `(row, col)` is light when
//! `(row + col)` is even, so `a8` is light as on a real board.

use boardscan_core::homography_from_4pt;
use image::{Rgb, RgbImage};
use nalgebra::Point2;

/// Sizes and gray levels of a rendered board.
#[derive(Clone, Debug)]
pub struct BoardStyle {
    pub cell: u32,
    pub frame: u32,
    pub background: u8,
    pub frame_level: u8,
    pub light: u8,
    pub dark: u8,
}

impl Default for BoardStyle {
    fn default() -> Self {
        Self {
            cell: 40,
            frame: 20,
            background: 40,
            frame_level: 230,
            light: 190,
            dark: 60,
        }
    }
}

impl BoardStyle {
    /// Side of the board plane, frame included.
    pub fn plane_side(&self) -> u32 {
        8 * self.cell + 2 * self.frame
    }

    /// Gray level at integer plane coordinates, `None` outside the plane.
    pub fn plane_level(&self, u: i64, v: i64) -> Option<u8> {
        let side = self.plane_side() as i64;
        if u < 0 || v < 0 || u >= side || v >= side {
            return None;
        }
        let f = self.frame as i64;
        if u < f || v < f || u >= side - f || v >= side - f {
            return Some(self.frame_level);
        }
        let col = (u - f) / self.cell as i64;
        let row = (v - f) / self.cell as i64;
        Some(if (row + col) % 2 == 0 {
            self.light
        } else {
            self.dark
        })
    }
}

/// Photo corners of the perspective board drawn by [`render_warped_board`].
pub const WARPED_BOARD_CORNERS: [[f32; 2]; 4] =
    [[150.0, 60.0], [500.0, 80.0], [540.0, 420.0], [110.0, 400.0]];

fn gray(v: u8) -> Rgb<u8> {
    Rgb([v, v, v])
}

/// Axis-aligned board with its top-left plane corner at `(x0, y0)`.
pub fn render_board(width: u32, height: u32, x0: u32, y0: u32, style: &BoardStyle) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let level = style
            .plane_level(x as i64 - x0 as i64, y as i64 - y0 as i64)
            .unwrap_or(style.background);
        gray(level)
    })
}

/// Board plane projected onto `corners` (top-left, top-right, bottom-right,
/// bottom-left) with nearest-neighbour sampling.
pub fn render_board_in_quad(
    width: u32,
    height: u32,
    corners: [Point2<f32>; 4],
    style: &BoardStyle,
) -> Option<RgbImage> {
    let s = style.plane_side() as f32;
    let plane = [
        Point2::new(0.0, 0.0),
        Point2::new(s, 0.0),
        Point2::new(s, s),
        Point2::new(0.0, s),
    ];
    let h_plane_from_img = homography_from_4pt(&corners, &plane)?;
    Some(RgbImage::from_fn(width, height, |x, y| {
        let p = h_plane_from_img.apply(Point2::new(x as f32 + 0.5, y as f32 + 0.5));
        let level = style
            .plane_level(p.x.floor() as i64, p.y.floor() as i64)
            .unwrap_or(style.background);
        gray(level)
    }))
}

/// The default style seen under moderate perspective in a 640x480 photo.
pub fn render_warped_board(width: u32, height: u32, style: &BoardStyle) -> RgbImage {
    let corners = WARPED_BOARD_CORNERS.map(|[x, y]| Point2::new(x, y));
    render_board_in_quad(width, height, corners, style)
        .unwrap_or_else(|| RgbImage::from_pixel(width, height, gray(style.background)))
}

/// Deterministic per-pixel uniform noise (xorshift).
pub fn noise_image(width: u32, height: u32, seed: u64) -> RgbImage {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 24) as u8
    };
    RgbImage::from_fn(width, height, |_, _| Rgb([next(), next(), next()]))
}
