//! Chessboard photo to 64 named square patches.
//!
//! ## Quickstart
//!
//! ```
//! use boardscan_board::synthetic::{render_warped_board, BoardStyle};
//! use boardscan_board::{BoardScanner, ScanParams};
//!
//! let photo = render_warped_board(640, 480, &BoardStyle::default());
//! let scanner = BoardScanner::new(ScanParams::default());
//! let result = scanner.scan(&photo)?;
//! assert_eq!(result.squares.len(), 64);
//! # Ok::<(), boardscan_board::DetectError>(())
//! ```
//!
//! Pipeline:
//! 1. Threshold sweep over the blurred gray photo, largest external contours
//!    first; the first square-like 4-vertex outline is the board.
//! 2. Homography warp of the outline into a square image.
//! 3. Row and column edge-energy profiles; 9 evenly spaced peaks per axis.
//! 4. Crop to `8 * cell` around the grid and cut 64 patches, `a8` top-left.
//! 5. Light/dark parity check on mean square brightness.

mod error;
mod grid_lines;
mod imaging;
mod locator;
mod params;
mod rectify;
mod region;
mod scanner;
mod squares;
pub mod synthetic;
mod validate;

pub use error::{Axis, DetectError, BOARD_NOT_DETECTED};
pub use grid_lines::{
    detect_grid_lines, edge_profile, fit_axis_lines, gap_cv, line_candidates, GridLines,
    LineCandidate, LINES_PER_AXIS,
};
pub use imaging::{gray_from_rgb, mean_brightness, rgb_view};
pub use locator::locate_board;
pub use params::{GridLineParams, LocatorParams, ScanParams, ValidatorParams};
pub use rectify::{rectified_side, rectify_board, rectify_points, RectifiedBoard};
pub use region::{extract_board_region, BoardRegion};
pub use scanner::{BoardScanner, ScanResult};
pub use squares::{split_squares, BoardSquares, Square};
pub use validate::{
    checkerboard_report, parity_agreement, square_brightness, validate_checkerboard,
    CheckerboardReport,
};

pub use boardscan_core::Quadrilateral;
