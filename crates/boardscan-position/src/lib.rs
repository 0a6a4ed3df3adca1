//! Square names, classifier labels and FEN piece placement.
//!
//! ```
//! use boardscan_position::{Position, SquareLabel, SquareName};
//!
//! let mut position = Position::empty();
//! position.set("e1".parse::<SquareName>()?, SquareLabel::WhiteKing);
//! position.set("e8".parse::<SquareName>()?, SquareLabel::BlackKing);
//! assert_eq!(position.to_placement(), "4k3/8/8/8/8/8/8/4K3");
//! # Ok::<(), boardscan_position::PositionError>(())
//! ```

mod error;
mod fen;
mod label;
mod position;
mod square;

pub use error::PositionError;
pub use fen::encode_placement;
pub use label::{SquareLabel, CLASSIFIER_ORDER};
pub use position::Position;
pub use square::{SquareName, BOARD_SIZE};
