//! Slicing the board region into 64 named patches.

use crate::region::BoardRegion;
use crate::DetectError;
use boardscan_position::{SquareName, BOARD_SIZE};
use image::{imageops, RgbImage};
use std::collections::BTreeMap;

/// One board square and its pixels.
#[derive(Clone, Debug)]
pub struct Square {
    pub name: SquareName,
    /// Grid row, 0 at the top (rank 8).
    pub row: usize,
    /// Grid column, 0 at the left (file a).
    pub col: usize,
    pub patch: RgbImage,
}

/// All 64 squares in grid order: rank 8 to 1, file a to h within a rank.
#[derive(Clone, Debug)]
pub struct BoardSquares {
    squares: Vec<Square>,
}

impl BoardSquares {
    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter()
    }

    pub fn get(&self, name: SquareName) -> Option<&Square> {
        self.squares.iter().find(|s| s.name == name)
    }

    pub fn at(&self, row: usize, col: usize) -> Option<&Square> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return None;
        }
        self.squares.get(row * BOARD_SIZE + col)
    }

    pub fn as_slice(&self) -> &[Square] {
        &self.squares
    }

    /// Patches keyed by square name.
    pub fn into_map(self) -> BTreeMap<SquareName, RgbImage> {
        self.squares.into_iter().map(|s| (s.name, s.patch)).collect()
    }
}

/// Cut the region along its grid lines.
///
/// Fails on the first square whose rounded bounds enclose no pixel.
pub fn split_squares(region: &BoardRegion) -> Result<BoardSquares, DetectError> {
    let (w, h) = region.image.dimensions();
    let px = |v: f32, max: u32| (v.round().max(0.0) as u32).min(max);
    let rows = region.lines.rows.map(|v| px(v, h));
    let cols = region.lines.cols.map(|v| px(v, w));

    let mut squares = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
    for name in SquareName::all() {
        let (row, col) = name.grid();
        let (x0, x1) = (cols[col], cols[col + 1]);
        let (y0, y1) = (rows[row], rows[row + 1]);
        if x1 <= x0 || y1 <= y0 {
            return Err(DetectError::EmptySquare {
                square: name.to_string(),
            });
        }
        let patch = imageops::crop_imm(&region.image, x0, y0, x1 - x0, y1 - y0).to_image();
        squares.push(Square {
            name,
            row,
            col,
            patch,
        });
    }
    Ok(BoardSquares { squares })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_lines::GridLines;
    use image::Rgb;
    use std::collections::HashSet;

    fn region(lines: [f32; 9]) -> BoardRegion {
        let mut image = RgbImage::new(160, 160);
        for (x, y, p) in image.enumerate_pixels_mut() {
            *p = Rgb([(x / 20) as u8, (y / 20) as u8, 0]);
        }
        BoardRegion {
            image,
            lines: GridLines {
                rows: lines,
                cols: lines,
            },
            origin: (0, 0),
        }
    }

    #[test]
    fn yields_64_unique_named_patches() {
        let lines = std::array::from_fn(|k| 20.0 * k as f32);
        let squares = split_squares(&region(lines)).expect("split");
        assert_eq!(squares.len(), 64);
        let names: HashSet<String> = squares.iter().map(|s| s.name.to_string()).collect();
        assert_eq!(names.len(), 64);
        for file in 'a'..='h' {
            for rank in 1..=8 {
                assert!(names.contains(&format!("{file}{rank}")));
            }
        }
        assert!(squares.iter().all(|s| s.patch.dimensions() == (20, 20)));
    }

    #[test]
    fn top_left_is_a8_and_bottom_right_is_h1() {
        let lines = std::array::from_fn(|k| 20.0 * k as f32);
        let squares = split_squares(&region(lines)).expect("split");
        let a8 = squares.at(0, 0).expect("a8");
        assert_eq!(a8.name.to_string(), "a8");
        assert_eq!(a8.patch.get_pixel(5, 5).0, [0, 0, 0]);
        let h1 = squares.get("h1".parse().expect("name")).expect("h1");
        assert_eq!((h1.row, h1.col), (7, 7));
        assert_eq!(h1.patch.get_pixel(5, 5).0, [7, 7, 0]);
        let map = squares.into_map();
        assert_eq!(map.len(), 64);
    }

    #[test]
    fn collapsed_line_pair_is_an_error() {
        let mut lines: [f32; 9] = std::array::from_fn(|k| 20.0 * k as f32);
        lines[3] = 40.2;
        let err = split_squares(&region(lines)).unwrap_err();
        assert_eq!(
            err,
            DetectError::EmptySquare {
                square: "c8".to_string()
            }
        );
    }
}
