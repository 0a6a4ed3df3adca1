//! High-level facade crate for the `boardscan-*` workspace.
//!
//! This crate provides:
//! - re-exports of the board, geometry and position crates
//! - the [`PieceClassifier`] seam and an argmax adapter over score models
//! - [`recognize`], running a scan and a classifier to a FEN placement
//! - JSON config and report helpers for the `boardscan` binary
//!
//! ## Quickstart
//!
//! ```no_run
//! use boardscan::board::{BoardScanner, ScanParams};
//! use boardscan::io::{load_rgb, save_squares};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let photo = load_rgb("board.jpg")?;
//! let result = BoardScanner::new(ScanParams::default()).scan(&photo)?;
//! save_squares(&result.squares, "squares")?;
//! # Ok(())
//! # }
//! ```
//!
//! With a classifier:
//!
//! ```
//! use boardscan::board::synthetic::{render_warped_board, BoardStyle};
//! use boardscan::board::{BoardSquares, ScanParams};
//! use boardscan::position::Position;
//! use boardscan::{recognize, ClassifyError};
//!
//! let photo = render_warped_board(640, 480, &BoardStyle::default());
//! let empty = |_: &BoardSquares| -> Result<Position, ClassifyError> { Ok(Position::empty()) };
//! let rec = recognize(&photo, &ScanParams::default(), &empty)?;
//! assert_eq!(rec.placement, "8/8/8/8/8/8/8/8");
//! # Ok::<(), boardscan::RecognizeError>(())
//! ```
//!
//! ## API map
//! - `boardscan::core`: homography, quadrilateral and logging helpers.
//! - `boardscan::board`: locate, rectify, grid, crop, split and validate.
//! - `boardscan::position`: square names, labels, positions and FEN placement.
//! - `boardscan::io`: JSON config/report and image file helpers.

pub use boardscan_board as board;
pub use boardscan_core as core;
pub use boardscan_position as position;

mod classifier;
pub mod io;
mod recognize;

pub use classifier::{
    preprocess_square, ArgmaxClassifier, ClassifyError, PieceClassifier, ScoreModel,
    SquarePrediction, MODEL_INPUT_SIZE,
};
pub use recognize::{
    placement_from_codes, recognize, rgb_image_from_slice, scan_rgb_u8, Recognition,
    RecognizeError,
};
