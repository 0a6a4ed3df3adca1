//! Crop of the rectified board down to the playing surface.

use crate::grid_lines::{GridLines, LINES_PER_AXIS};
use image::{imageops, RgbImage};
use log::debug;

/// Playing surface with grid lines expressed in crop coordinates.
#[derive(Clone, Debug)]
pub struct BoardRegion {
    pub image: RgbImage,
    pub lines: GridLines,
    /// Top-left corner of the crop in rectified pixels, `(x, y)`.
    pub origin: (u32, u32),
}

/// Crop start along one axis: a window of `side` centered on the line span,
/// shifted to stay inside `[0, dim)`.
///
/// The window is shifted rather than clipped, so the crop keeps `side` on
/// both axes. Whenever the centered window fits in the image the two agree.
fn crop_start(lines: &[f32; LINES_PER_AXIS], side: u32, dim: u32) -> u32 {
    let mid = 0.5 * (lines[0] + lines[LINES_PER_AXIS - 1]);
    let start = (mid - side as f32 / 2.0).round();
    let max_start = dim.saturating_sub(side) as f32;
    start.clamp(0.0, max_start) as u32
}

fn translate(lines: &[f32; LINES_PER_AXIS], offset: u32, side: u32) -> [f32; LINES_PER_AXIS] {
    lines.map(|p| (p - offset as f32).clamp(0.0, side as f32))
}

/// Cut a square window of `8 * cell_size` around the grid.
pub fn extract_board_region(rectified: &RgbImage, lines: &GridLines) -> BoardRegion {
    let (w, h) = rectified.dimensions();
    let side = ((8.0 * lines.cell_size()).round() as u32).min(w).min(h);

    let x0 = crop_start(&lines.cols, side, w);
    let y0 = crop_start(&lines.rows, side, h);
    let image = imageops::crop_imm(rectified, x0, y0, side, side).to_image();

    let lines = GridLines {
        rows: translate(&lines.rows, y0, side),
        cols: translate(&lines.cols, x0, side),
    };
    debug!("board region {side}x{side} at ({x0}, {y0})");

    BoardRegion {
        image,
        lines,
        origin: (x0, y0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(first: f32, step: f32) -> [f32; 9] {
        std::array::from_fn(|k| first + step * k as f32)
    }

    #[test]
    fn crop_is_centered_on_the_grid() {
        let img = RgbImage::new(400, 400);
        let grid = GridLines {
            rows: lines(30.0, 40.0),
            cols: lines(50.0, 40.0),
        };
        let region = extract_board_region(&img, &grid);
        assert_eq!(region.image.dimensions(), (320, 320));
        assert_eq!(region.origin, (50, 30));
        assert_eq!(region.lines.rows, lines(0.0, 40.0));
        assert_eq!(region.lines.cols, lines(0.0, 40.0));
    }

    #[test]
    fn shorter_axis_is_widened_around_its_midpoint() {
        let img = RgbImage::new(400, 400);
        let grid = GridLines {
            rows: lines(40.0, 40.0),
            cols: lines(60.0, 36.0),
        };
        // cell 40 -> side 320; cols mid 204 -> start 44.
        let region = extract_board_region(&img, &grid);
        assert_eq!(region.origin, (44, 40));
        assert_eq!(region.lines.cols[0], 16.0);
        assert_eq!(region.lines.cols[8], 304.0);
    }

    #[test]
    fn crop_is_clipped_to_image() {
        let img = RgbImage::new(330, 330);
        let grid = GridLines {
            rows: lines(2.0, 40.0),
            cols: lines(12.0, 40.0),
        };
        let region = extract_board_region(&img, &grid);
        assert_eq!(region.origin, (10, 2));
        assert_eq!(region.image.dimensions(), (320, 320));
    }

    #[test]
    fn overflowing_window_is_shifted_not_shrunk() {
        let img = RgbImage::new(330, 330);
        // cell 40 -> side 320; cols mid 144 -> centered start -16.
        let grid = GridLines {
            rows: lines(0.0, 40.0),
            cols: lines(0.0, 36.0),
        };
        let region = extract_board_region(&img, &grid);
        assert_eq!(region.origin, (0, 0));
        assert_eq!(region.image.dimensions(), (320, 320));
        assert_eq!(region.lines.cols[8], 288.0);
    }
}
