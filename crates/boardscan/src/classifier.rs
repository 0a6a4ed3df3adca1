//! Piece classification seam.
//!
//! The trained model lives outside this workspace. Callers construct a
//! classifier once and pass it to [`crate::recognize`]; nothing here caches
//! or loads a model behind the caller's back.

use boardscan_board::BoardSquares;
use boardscan_position::{Position, PositionError, SquareLabel, SquareName, CLASSIFIER_ORDER};
use image::imageops::{self, FilterType};
use image::RgbImage;
use log::debug;

/// Side of the square input the bundled class order was trained on.
pub const MODEL_INPUT_SIZE: u32 = 180;

#[derive(thiserror::Error, Debug)]
pub enum ClassifyError {
    #[error("model returned {got} score vectors for {expected} squares")]
    BatchSize { expected: usize, got: usize },
    #[error("score vector for {square} has {got} entries, expected {expected}")]
    ScoreLength {
        square: String,
        expected: usize,
        got: usize,
    },
    #[error("score vector for {square} has no finite maximum")]
    NoFiniteScore { square: String },
    #[error(transparent)]
    Position(#[from] PositionError),
    #[error("model failed: {0}")]
    Model(String),
}

/// Labels all 64 squares of a scanned board.
pub trait PieceClassifier: Send + Sync {
    fn classify(&self, squares: &BoardSquares) -> Result<Position, ClassifyError>;
}

impl<F> PieceClassifier for F
where
    F: Fn(&BoardSquares) -> Result<Position, ClassifyError> + Send + Sync,
{
    fn classify(&self, squares: &BoardSquares) -> Result<Position, ClassifyError> {
        self(squares)
    }
}

/// A model producing one score per class for each input patch.
///
/// Scores are indexed by [`CLASSIFIER_ORDER`]; patches arrive already
/// resized to the classifier's input size.
pub trait ScoreModel: Send + Sync {
    fn scores(&self, batch: &[RgbImage]) -> Result<Vec<Vec<f32>>, ClassifyError>;
}

/// Resize a square patch to the model input size (triangle filter).
pub fn preprocess_square(patch: &RgbImage, size: u32) -> RgbImage {
    if patch.dimensions() == (size, size) {
        return patch.clone();
    }
    imageops::resize(patch, size, size, FilterType::Triangle)
}

/// Best class of one square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SquarePrediction {
    pub square: SquareName,
    pub label: SquareLabel,
    /// Score of the chosen class, as returned by the model.
    pub confidence: f32,
}

// First maximum wins, matching the usual argmax convention.
fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &s) in scores.iter().enumerate() {
        if !s.is_finite() {
            continue;
        }
        if best.is_none_or(|(_, b)| s > b) {
            best = Some((i, s));
        }
    }
    best
}

/// [`PieceClassifier`] that runs a [`ScoreModel`] on all 64 squares in one
/// batch and keeps the highest-scoring class per square.
#[derive(Clone, Debug)]
pub struct ArgmaxClassifier<M> {
    model: M,
    input_size: u32,
}

impl<M: ScoreModel> ArgmaxClassifier<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            input_size: MODEL_INPUT_SIZE,
        }
    }

    pub fn with_input_size(mut self, size: u32) -> Self {
        self.input_size = size;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Per-square predictions in scan order (rank 8 to 1, file a to h).
    pub fn predict(&self, squares: &BoardSquares) -> Result<Vec<SquarePrediction>, ClassifyError> {
        let batch: Vec<RgbImage> = squares
            .iter()
            .map(|s| preprocess_square(&s.patch, self.input_size))
            .collect();
        let scores = self.model.scores(&batch)?;
        if scores.len() != batch.len() {
            return Err(ClassifyError::BatchSize {
                expected: batch.len(),
                got: scores.len(),
            });
        }

        squares
            .iter()
            .zip(scores.iter())
            .map(|(sq, row)| {
                if row.len() != CLASSIFIER_ORDER.len() {
                    return Err(ClassifyError::ScoreLength {
                        square: sq.name.to_string(),
                        expected: CLASSIFIER_ORDER.len(),
                        got: row.len(),
                    });
                }
                let (idx, confidence) = argmax(row).ok_or_else(|| ClassifyError::NoFiniteScore {
                    square: sq.name.to_string(),
                })?;
                Ok(SquarePrediction {
                    square: sq.name,
                    label: CLASSIFIER_ORDER[idx],
                    confidence,
                })
            })
            .collect()
    }
}

impl<M: ScoreModel> PieceClassifier for ArgmaxClassifier<M> {
    fn classify(&self, squares: &BoardSquares) -> Result<Position, ClassifyError> {
        let predictions = self.predict(squares)?;
        let position =
            Position::from_labels(predictions.iter().map(|p| (p.square.to_string(), p.label)))?;
        debug!("classified {} pieces", position.piece_count());
        Ok(position)
    }
}
