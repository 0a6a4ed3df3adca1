//! JSON configuration and report helpers.

use crate::recognize::{Recognition, RecognizeError};
use boardscan_board::{
    BoardSquares, CheckerboardReport, DetectError, GridLines, ScanParams, ScanResult,
};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Configuration of a scan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub image_path: String,
    /// Directory for the 64 square patches (`a1.png` .. `h8.png`).
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub report_path: Option<String>,
    #[serde(default)]
    pub params: Option<ScanParams>,
}

impl ScanConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the report path.
    pub fn report_path(&self) -> PathBuf {
        self.report_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("boardscan_report.json"))
    }

    /// Scan parameters, defaults where the config has none.
    pub fn build_params(&self) -> ScanParams {
        self.params.clone().unwrap_or_default()
    }
}

/// Summary of one scan, successful or not.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    pub image_path: Option<String>,
    pub image_width: u32,
    pub image_height: u32,
    /// Board outline, top-left, top-right, bottom-right, bottom-left.
    pub quad: Option<[[f32; 2]; 4]>,
    pub rectified_side: Option<u32>,
    /// Grid lines in the cropped board region.
    pub lines: Option<GridLines>,
    pub region_origin: Option<[u32; 2]>,
    pub checkerboard: Option<CheckerboardReport>,
    /// Written patch files, in scan order.
    #[serde(default)]
    pub squares: Vec<String>,
    pub placement: Option<String>,
    pub error: Option<String>,
}

impl ScanReport {
    pub fn new(image_path: Option<String>, image: &RgbImage) -> Self {
        Self {
            image_path,
            image_width: image.width(),
            image_height: image.height(),
            ..Self::default()
        }
    }

    /// Fill in the geometry of a scan outcome, or its error.
    pub fn record(&mut self, outcome: &Result<ScanResult, DetectError>) {
        match outcome {
            Ok(result) => self.record_scan(result),
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Like [`ScanReport::record`], plus the placement of a classified board.
    pub fn record_recognition(&mut self, outcome: &Result<Recognition, RecognizeError>) {
        match outcome {
            Ok(recognition) => {
                self.record_scan(&recognition.scan);
                self.placement = Some(recognition.placement.clone());
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn record_scan(&mut self, result: &ScanResult) {
        self.quad = Some(result.quad.corners().map(|p| [p.x, p.y]));
        self.rectified_side = Some(result.rectified_side);
        self.lines = Some(result.lines);
        self.region_origin = Some([result.region_origin.0, result.region_origin.1]);
        self.checkerboard = result.checkerboard;
        self.error = None;
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Decode an image file into RGB.
pub fn load_rgb(path: impl AsRef<Path>) -> Result<RgbImage, IoError> {
    Ok(image::open(path)?.to_rgb8())
}

/// Write every patch as `<dir>/<square>.png`, creating `dir` if needed.
pub fn save_squares(squares: &BoardSquares, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, IoError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(squares.len());
    for square in squares.iter() {
        let path = dir.join(format!("{}.png", square.name));
        square.patch.save(&path)?;
        written.push(path);
    }
    Ok(written)
}
