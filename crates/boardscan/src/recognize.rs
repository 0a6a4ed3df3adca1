//! Photo to piece placement.

use crate::classifier::{ClassifyError, PieceClassifier};
use boardscan_board::{BoardScanner, DetectError, ScanParams, ScanResult};
use boardscan_core::RgbImageView;
use boardscan_position::{Position, PositionError};
use image::RgbImage;
use log::info;

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(thiserror::Error, Debug)]
pub enum RecognizeError {
    #[error(transparent)]
    Detect(#[from] DetectError),
    #[error(transparent)]
    Classify(#[from] ClassifyError),
    #[error(transparent)]
    Position(#[from] PositionError),
}

impl RecognizeError {
    /// Message for end users.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Detect(e) => e.user_message(),
            Self::Classify(_) => "could not classify squares",
            Self::Position(_) => "invalid position",
        }
    }
}

/// Scanned board with its classified position.
#[derive(Clone, Debug)]
pub struct Recognition {
    pub scan: ScanResult,
    pub position: Position,
    /// FEN piece-placement field.
    pub placement: String,
}

/// Scan a photo, classify its squares and encode the position.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params, classifier), fields(width = img.width(), height = img.height()))
)]
pub fn recognize<C>(
    img: &RgbImage,
    params: &ScanParams,
    classifier: &C,
) -> Result<Recognition, RecognizeError>
where
    C: PieceClassifier + ?Sized,
{
    let scan = BoardScanner::new(params.clone()).scan(img)?;
    let position = classifier.classify(&scan.squares)?;
    let placement = position.to_placement();
    info!("recognized placement {placement}");
    Ok(Recognition {
        scan,
        position,
        placement,
    })
}

/// Copy a decoded interleaved RGB buffer into an image, rejecting
/// zero-sized or mis-sized input.
pub fn rgb_image_from_slice(width: u32, height: u32, data: &[u8]) -> Result<RgbImage, DetectError> {
    let invalid = DetectError::InvalidImage { width, height };
    if width == 0 || height == 0 {
        return Err(invalid);
    }
    let view = RgbImageView::from_slice(width as usize, height as usize, data)
        .ok_or_else(|| invalid.clone())?;
    RgbImage::from_raw(width, height, view.data.to_vec()).ok_or(invalid)
}

/// [`BoardScanner::scan`] on a raw interleaved RGB buffer.
pub fn scan_rgb_u8(
    width: u32,
    height: u32,
    data: &[u8],
    params: &ScanParams,
) -> Result<ScanResult, DetectError> {
    let img = rgb_image_from_slice(width, height, data)?;
    BoardScanner::new(params.clone()).scan(&img)
}

/// Placement string from `(square, code)` pairs covering the board once.
/// Unknown codes count as empty squares.
pub fn placement_from_codes<I, K, V>(entries: I) -> Result<String, RecognizeError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    Ok(Position::from_codes(entries)?.to_placement())
}
