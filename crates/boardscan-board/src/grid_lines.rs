//! 9 + 9 grid line search on a rectified board.
//!
//! Each axis is reduced to a 1-D edge energy profile. Local maxima of the
//! profile are line candidates; a grid hypothesis is a pair of candidates
//! taken as the outer lines, and it holds when all 9 evenly spaced positions
//! between them land on real candidates.

use crate::imaging::gray_from_rgb;
use crate::{Axis, DetectError, GridLineParams};
use image::{GrayImage, RgbImage};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Number of lines per axis on an 8x8 board.
pub const LINES_PER_AXIS: usize = 9;

/// Horizontal (`rows`, y positions) and vertical (`cols`, x positions)
/// board lines, each strictly increasing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLines {
    pub rows: [f32; LINES_PER_AXIS],
    pub cols: [f32; LINES_PER_AXIS],
}

impl GridLines {
    pub fn row_span(&self) -> f32 {
        self.rows[LINES_PER_AXIS - 1] - self.rows[0]
    }

    pub fn col_span(&self) -> f32 {
        self.cols[LINES_PER_AXIS - 1] - self.cols[0]
    }

    /// `min(span) / max(span)`; 1 for a perfectly square grid.
    pub fn span_ratio(&self) -> f32 {
        let (r, c) = (self.row_span(), self.col_span());
        let hi = r.max(c);
        if hi <= 0.0 {
            return 0.0;
        }
        r.min(c) / hi
    }

    /// Cell size implied by the larger span.
    pub fn cell_size(&self) -> f32 {
        self.row_span().max(self.col_span()) / 8.0
    }

    pub fn axis(&self, axis: Axis) -> &[f32; LINES_PER_AXIS] {
        match axis {
            Axis::Rows => &self.rows,
            Axis::Cols => &self.cols,
        }
    }
}

/// Coefficient of variation (population std / mean) of the 8 gaps.
pub fn gap_cv(lines: &[f32; LINES_PER_AXIS]) -> f64 {
    let gaps: Vec<f64> = lines.windows(2).map(|w| (w[1] - w[0]) as f64).collect();
    let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
    if mean <= 0.0 {
        return f64::INFINITY;
    }
    let var = gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / gaps.len() as f64;
    var.sqrt() / mean
}

/// Edge energy per row (`Axis::Rows`) or per column (`Axis::Cols`).
///
/// Rows use the vertical derivative summed along x, columns the horizontal
/// derivative summed along y.
pub fn edge_profile(gray: &GrayImage, axis: Axis) -> Vec<f64> {
    let (w, h) = gray.dimensions();
    match axis {
        Axis::Rows => {
            let gy = vertical_sobel(gray);
            let mut profile = vec![0.0f64; h as usize];
            for (_, y, p) in gy.enumerate_pixels() {
                profile[y as usize] += (p.0[0] as f64).abs();
            }
            profile
        }
        Axis::Cols => {
            let gx = horizontal_sobel(gray);
            let mut profile = vec![0.0f64; w as usize];
            for (x, _, p) in gx.enumerate_pixels() {
                profile[x as usize] += (p.0[0] as f64).abs();
            }
            profile
        }
    }
}

/// Centered moving sum with zero padding; `len` is forced odd.
fn box_smooth(profile: &[f64], len: usize) -> Vec<f64> {
    let half = len / 2;
    let n = profile.len();
    let mut prefix = vec![0.0f64; n + 1];
    for (i, v) in profile.iter().enumerate() {
        prefix[i + 1] = prefix[i] + v;
    }
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half + 1).min(n);
            prefix[hi] - prefix[lo]
        })
        .collect()
}

fn smoothing_len(n: usize, params: &GridLineParams) -> usize {
    let len = ((n as f32 * params.smoothing_frac).round() as usize).max(3);
    len | 1
}

/// A local maximum of the smoothed profile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineCandidate {
    pub position: f32,
    pub strength: f64,
}

/// Local maxima that dominate a window of `peak_window_frac * n / 8` on
/// each side. Flat tops report their midpoint.
fn find_peaks(profile: &[f64], params: &GridLineParams) -> Vec<LineCandidate> {
    let n = profile.len();
    let max = profile.iter().cloned().fold(0.0f64, f64::max);
    if n == 0 || max <= 0.0 {
        return Vec::new();
    }
    let floor = params.min_peak_rel as f64 * max;
    let half = ((params.peak_window_frac * n as f32 / 8.0).round() as usize).max(1);

    let mut peaks = Vec::new();
    let mut i = 0;
    while i < n {
        let v = profile[i];
        let starts_plateau = i == 0 || profile[i - 1] < v;
        if v <= floor || !starts_plateau {
            i += 1;
            continue;
        }
        let mut j = i;
        while j + 1 < n && profile[j + 1] == v {
            j += 1;
        }
        let lo = i.saturating_sub(half);
        let hi = (j + half).min(n - 1);
        if profile[lo..=hi].iter().all(|&p| p <= v) {
            peaks.push(LineCandidate {
                position: (i + j) as f32 / 2.0,
                strength: v,
            });
        }
        i = j + 1;
    }
    peaks
}

/// Strongest `max_candidates` peaks, sorted by position.
pub fn line_candidates(profile: &[f64], params: &GridLineParams) -> Vec<LineCandidate> {
    let smoothed = box_smooth(profile, smoothing_len(profile.len(), params));
    let mut peaks = find_peaks(&smoothed, params);
    peaks.sort_by(|a, b| {
        b.strength
            .total_cmp(&a.strength)
            .then(a.position.total_cmp(&b.position))
    });
    peaks.truncate(params.max_candidates);
    peaks.sort_by(|a, b| a.position.total_cmp(&b.position));
    peaks
}

fn nearest(candidates: &[f32], x: f32) -> Option<f32> {
    candidates
        .iter()
        .copied()
        .min_by(|a, b| (a - x).abs().total_cmp(&(b - x).abs()))
}

/// Best uniformly spaced 9-line fit among sorted candidate positions on an
/// axis of length `extent`.
pub fn fit_axis_lines(
    candidates: &[f32],
    extent: usize,
    params: &GridLineParams,
) -> Option<[f32; LINES_PER_AXIS]> {
    let min_sep = params.min_span_frac * extent as f32;
    let mut best: Option<([f32; LINES_PER_AXIS], f64)> = None;

    for (ia, &start) in candidates.iter().enumerate() {
        for &end in &candidates[ia + 1..] {
            let sep = end - start;
            if sep < min_sep {
                continue;
            }
            let spacing = sep / 8.0;
            let tol = params.match_tolerance * spacing;

            let mut lines = [0.0f32; LINES_PER_AXIS];
            let mut ok = true;
            for (k, slot) in lines.iter_mut().enumerate() {
                let expected = start + k as f32 * spacing;
                match nearest(candidates, expected) {
                    Some(c) if (c - expected).abs() <= tol => *slot = c,
                    _ => {
                        ok = false;
                        break;
                    }
                }
            }
            if !ok || lines.windows(2).any(|w| w[1] <= w[0]) {
                continue;
            }

            let cv = gap_cv(&lines);
            if cv > params.max_gap_cv as f64 {
                continue;
            }
            let span = lines[LINES_PER_AXIS - 1] - lines[0];
            let better = match &best {
                None => true,
                Some((b, bcv)) => {
                    let bspan = b[LINES_PER_AXIS - 1] - b[0];
                    cv < bcv - 1e-9 || ((cv - bcv).abs() <= 1e-9 && span > bspan)
                }
            };
            if better {
                best = Some((lines, cv));
            }
        }
    }

    best.map(|(lines, _)| lines)
}

fn detect_axis(
    gray: &GrayImage,
    axis: Axis,
    params: &GridLineParams,
) -> Result<[f32; LINES_PER_AXIS], DetectError> {
    let profile = edge_profile(gray, axis);
    let candidates = line_candidates(&profile, params);
    let positions: Vec<f32> = candidates.iter().map(|c| c.position).collect();
    debug!("{axis}: {} line candidates {:?}", positions.len(), positions);

    let lines = fit_axis_lines(&positions, profile.len(), params).ok_or_else(|| {
        debug!("{axis}: no uniform 9-line hypothesis");
        DetectError::GridNotFound { axis }
    })?;
    debug!("{axis}: lines {:?} (gap cv {:.4})", lines, gap_cv(&lines));
    Ok(lines)
}

/// Find the 9 row and 9 column lines of a rectified board.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(img, params), fields(side = img.width()))
)]
pub fn detect_grid_lines(img: &RgbImage, params: &GridLineParams) -> Result<GridLines, DetectError> {
    let gray = gray_from_rgb(img);
    let rows = detect_axis(&gray, Axis::Rows, params)?;
    let cols = detect_axis(&gray, Axis::Cols, params)?;
    let grid = GridLines { rows, cols };

    if grid.span_ratio() < params.min_span_ratio {
        debug!(
            "row span {:.1} and col span {:.1} disagree",
            grid.row_span(),
            grid.col_span()
        );
        return Err(DetectError::GridInconsistent {
            row_span: grid.row_span(),
            col_span: grid.col_span(),
        });
    }

    info!(
        "grid found: row span {:.1}px, col span {:.1}px",
        grid.row_span(),
        grid.col_span()
    );
    Ok(grid)
}
