use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid axis: `Rows` holds horizontal lines (y positions), `Cols` vertical ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Rows,
    Cols,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Rows => f.write_str("rows"),
            Axis::Cols => f.write_str("cols"),
        }
    }
}

/// Terminal failures of a board scan.
///
/// The scan is deterministic, so none of these is worth retrying on the
/// same photo.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    #[error("invalid image dimensions (width={width}, height={height})")]
    InvalidImage { width: u32, height: u32 },
    #[error("no square-like board outline found")]
    BoardNotFound,
    #[error("board outline is degenerate, cannot rectify")]
    DegenerateQuad,
    #[error("no uniform 9-line grid found along {axis}")]
    GridNotFound { axis: Axis },
    #[error("grid spans disagree (rows={row_span:.1}px, cols={col_span:.1}px)")]
    GridInconsistent { row_span: f32, col_span: f32 },
    #[error("square {square} has zero area")]
    EmptySquare { square: String },
    #[error("squares do not alternate like a chessboard (agreement={agreement:?})")]
    CheckerboardMismatch { agreement: Option<f32> },
}

/// The single message surfaced to end users for any scan failure.
pub const BOARD_NOT_DETECTED: &str = "could not detect board";

impl DetectError {
    /// Message for end users; the variant itself is for logs and reports.
    pub fn user_message(&self) -> &'static str {
        BOARD_NOT_DETECTED
    }
}
