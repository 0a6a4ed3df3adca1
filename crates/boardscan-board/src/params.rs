use serde::{Deserialize, Serialize};

/// Parameters of the board outline search.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LocatorParams {
    /// Gaussian blur sigma applied to the grayscale photo before thresholding.
    pub blur_sigma: f32,
    /// Binarization thresholds, tried in order. Order matters: the first
    /// accepted outline wins.
    pub thresholds: Vec<u8>,
    /// How many of the largest external contours to examine per threshold.
    pub max_contours_per_threshold: usize,
    /// Minimal contour area as a fraction of the image area.
    pub min_area_frac: f32,
    /// Polygon approximation tolerance as a fraction of the contour perimeter.
    pub approx_epsilon_frac: f32,
    /// Minimal shortest-side / longest-side ratio of an accepted outline.
    pub min_side_ratio: f32,
    /// Minimal average-width / average-height ratio (folded to `<= 1`).
    pub min_aspect_ratio: f32,
}

impl Default for LocatorParams {
    fn default() -> Self {
        Self {
            blur_sigma: 1.1,
            thresholds: vec![200, 180, 160, 140],
            max_contours_per_threshold: 5,
            min_area_frac: 0.10,
            approx_epsilon_frac: 0.02,
            min_side_ratio: 0.5,
            min_aspect_ratio: 0.6,
        }
    }
}

/// Parameters of the gradient-profile grid line search.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct GridLineParams {
    /// Box smoothing length as a fraction of the axis extent (at least 3 taps, odd).
    pub smoothing_frac: f32,
    /// Local-maximum half window as a fraction of the expected cell spacing (`extent / 8`).
    pub peak_window_frac: f32,
    /// Peaks weaker than this fraction of the strongest profile value are ignored.
    pub min_peak_rel: f32,
    /// Number of strongest peaks kept as line candidates.
    pub max_candidates: usize,
    /// Minimal outer-line separation as a fraction of the axis extent.
    pub min_span_frac: f32,
    /// Match radius around each predicted line, as a fraction of the spacing.
    pub match_tolerance: f32,
    /// Maximal coefficient of variation of the 8 realized gaps.
    pub max_gap_cv: f32,
    /// Minimal `min(row_span, col_span) / max(row_span, col_span)`.
    pub min_span_ratio: f32,
}

impl Default for GridLineParams {
    fn default() -> Self {
        Self {
            smoothing_frac: 0.01,
            peak_window_frac: 0.3,
            min_peak_rel: 0.05,
            max_candidates: 30,
            min_span_frac: 0.5,
            match_tolerance: 0.15,
            max_gap_cv: 0.10,
            min_span_ratio: 0.8,
        }
    }
}

/// Parameters of the light/dark alternation check.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidatorParams {
    /// Minimal difference (gray levels) between the light and dark group means.
    pub min_contrast: f32,
    /// Minimal fraction of squares agreeing with the expected parity.
    pub min_agreement: f32,
}

impl Default for ValidatorParams {
    fn default() -> Self {
        Self {
            min_contrast: 20.0,
            min_agreement: 0.75,
        }
    }
}

/// Parameters of the whole scan.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanParams {
    pub locator: LocatorParams,
    pub grid: GridLineParams,
    pub validator: ValidatorParams,
    /// Run the checkerboard gate after slicing. Disabling it is only meant
    /// for inspecting rejected photos.
    pub validate: bool,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            locator: LocatorParams::default(),
            grid: GridLineParams::default(),
            validator: ValidatorParams::default(),
            validate: true,
        }
    }
}
