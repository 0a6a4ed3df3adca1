/// Errors raised while building a [`crate::Position`] from keyed labels.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("invalid square name {0:?} (expected a1..h8)")]
    InvalidSquareName(String),
    #[error("square {0} listed more than once")]
    DuplicateSquare(String),
    #[error("expected 64 squares, got {got}")]
    MissingSquare { got: usize },
    #[error("unknown square label {0:?}")]
    UnknownLabel(String),
}
