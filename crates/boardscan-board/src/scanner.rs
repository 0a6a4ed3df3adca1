//! Full photo-to-squares pipeline.

use crate::grid_lines::{detect_grid_lines, GridLines};
use crate::locator::locate_board;
use crate::rectify::rectify_board;
use crate::region::extract_board_region;
use crate::squares::{split_squares, BoardSquares};
use crate::validate::{validate_checkerboard, CheckerboardReport};
use crate::{DetectError, ScanParams};
use boardscan_core::Quadrilateral;
use image::RgbImage;
use log::{debug, info};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Output of a successful scan.
#[derive(Clone, Debug)]
pub struct ScanResult {
    /// Board outline in the photo.
    pub quad: Quadrilateral,
    /// Side of the rectified image in pixels.
    pub rectified_side: u32,
    /// Grid lines in the cropped board region.
    pub lines: GridLines,
    /// Crop origin inside the rectified image.
    pub region_origin: (u32, u32),
    pub squares: BoardSquares,
    /// `None` when validation was disabled.
    pub checkerboard: Option<CheckerboardReport>,
}

/// Board scanner: locate, rectify, grid, crop, slice and validate.
///
/// Stateless apart from its parameters, so one instance can serve any
/// number of photos from any number of threads.
#[derive(Clone, Debug, Default)]
pub struct BoardScanner {
    params: ScanParams,
}

impl BoardScanner {
    pub fn new(params: ScanParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ScanParams {
        &self.params
    }

    /// Run the pipeline on one photo. Any stage failure ends the scan.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, img),
            fields(width = img.width(), height = img.height())
        )
    )]
    pub fn scan(&self, img: &RgbImage) -> Result<ScanResult, DetectError> {
        let (width, height) = img.dimensions();
        if width < 8 || height < 8 {
            return Err(DetectError::InvalidImage { width, height });
        }

        let quad = locate_board(img, &self.params.locator)?;
        let rectified = rectify_board(img, &quad)?;
        let lines = detect_grid_lines(&rectified.image, &self.params.grid)?;
        let region = extract_board_region(&rectified.image, &lines);
        let squares = split_squares(&region)?;

        let checkerboard = if self.params.validate {
            Some(validate_checkerboard(&squares, &self.params.validator)?)
        } else {
            debug!("checkerboard validation disabled");
            None
        };

        info!(
            "scanned {}x{} photo: board {}px, cell {:.1}px",
            width,
            height,
            rectified.side(),
            region.lines.cell_size()
        );

        Ok(ScanResult {
            quad,
            rectified_side: rectified.side(),
            lines: region.lines,
            region_origin: region.origin,
            squares,
            checkerboard,
        })
    }
}
