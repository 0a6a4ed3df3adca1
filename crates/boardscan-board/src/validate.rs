//! Light/dark alternation check on the sliced squares.

use crate::imaging::mean_brightness;
use crate::squares::BoardSquares;
use crate::{DetectError, ValidatorParams};
use boardscan_position::BOARD_SIZE;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Outcome of the checkerboard test.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckerboardReport {
    /// Best agreement over the two parity assignments, `None` when neither
    /// had enough contrast to judge.
    pub agreement: Option<f32>,
    /// `(row + col) % 2` of the squares taken as light in the best assignment.
    pub light_parity: Option<u8>,
    pub accepted: bool,
}

/// Mean luma per square in grid order (row-major from the image top).
pub fn square_brightness(squares: &BoardSquares) -> Vec<f32> {
    squares.iter().map(|s| mean_brightness(&s.patch)).collect()
}

/// Agreement of the `(row + col) % 2 == light_parity` assignment, or `None`
/// when its light and dark groups differ by less than `min_contrast`.
///
/// `brightness` is row-major with 8 columns.
pub fn parity_agreement(brightness: &[f32], light_parity: u8, min_contrast: f32) -> Option<f32> {
    if brightness.is_empty() {
        return None;
    }
    let is_light = |i: usize| ((i / BOARD_SIZE + i % BOARD_SIZE) % 2) as u8 == light_parity;

    let (mut light_sum, mut light_n, mut dark_sum, mut dark_n) = (0.0f64, 0usize, 0.0f64, 0usize);
    for (i, &b) in brightness.iter().enumerate() {
        if is_light(i) {
            light_sum += b as f64;
            light_n += 1;
        } else {
            dark_sum += b as f64;
            dark_n += 1;
        }
    }
    if light_n == 0 || dark_n == 0 {
        return None;
    }
    let light_mean = light_sum / light_n as f64;
    let dark_mean = dark_sum / dark_n as f64;
    if light_mean - dark_mean < min_contrast as f64 {
        return None;
    }

    let midpoint = 0.5 * (light_mean + dark_mean);
    let matches = brightness
        .iter()
        .enumerate()
        .filter(|&(i, &b)| (b as f64 > midpoint) == is_light(i))
        .count();
    Some(matches as f32 / brightness.len() as f32)
}

/// Score both parity assignments and keep the better one.
pub fn checkerboard_report(brightness: &[f32], params: &ValidatorParams) -> CheckerboardReport {
    let best = (0u8..2)
        .filter_map(|p| parity_agreement(brightness, p, params.min_contrast).map(|a| (p, a)))
        .max_by(|a, b| a.1.total_cmp(&b.1));

    match best {
        Some((parity, agreement)) => CheckerboardReport {
            agreement: Some(agreement),
            light_parity: Some(parity),
            accepted: agreement >= params.min_agreement,
        },
        None => CheckerboardReport {
            agreement: None,
            light_parity: None,
            accepted: false,
        },
    }
}

/// Reject square sets that do not alternate like a chessboard.
pub fn validate_checkerboard(
    squares: &BoardSquares,
    params: &ValidatorParams,
) -> Result<CheckerboardReport, DetectError> {
    let brightness = square_brightness(squares);
    let report = checkerboard_report(&brightness, params);
    if !report.accepted {
        debug!("checkerboard rejected: agreement {:?}", report.agreement);
        return Err(DetectError::CheckerboardMismatch {
            agreement: report.agreement,
        });
    }
    info!(
        "checkerboard accepted: agreement {:.3}",
        report.agreement.unwrap_or_default()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern<F: Fn(usize, usize) -> f32>(f: F) -> Vec<f32> {
        (0..64).map(|i| f(i / 8, i % 8)).collect()
    }

    #[test]
    fn perfect_alternation_is_accepted() {
        let b = pattern(|r, c| if (r + c) % 2 == 0 { 200.0 } else { 50.0 });
        let report = checkerboard_report(&b, &ValidatorParams::default());
        assert_eq!(report.agreement, Some(1.0));
        assert_eq!(report.light_parity, Some(0));
        assert!(report.accepted);

        let inverted = pattern(|r, c| if (r + c) % 2 == 1 { 200.0 } else { 50.0 });
        let report = checkerboard_report(&inverted, &ValidatorParams::default());
        assert_eq!(report.light_parity, Some(1));
        assert!(report.accepted);
    }

    #[test]
    fn uniform_brightness_is_inconclusive() {
        let b = vec![180.0; 64];
        let report = checkerboard_report(&b, &ValidatorParams::default());
        assert_eq!(report.agreement, None);
        assert!(!report.accepted);
    }

    #[test]
    fn stripes_are_rejected() {
        // Column stripes: parity groups have equal means.
        let b = pattern(|_, c| if c % 2 == 0 { 200.0 } else { 50.0 });
        assert!(!checkerboard_report(&b, &ValidatorParams::default()).accepted);
    }

    #[test]
    fn half_bright_board_is_rejected() {
        let b = pattern(|r, c| {
            let base = if r < 4 { 200.0 } else { 40.0 };
            base + if (r + c) % 2 == 0 { 30.0 } else { 0.0 }
        });
        let report = checkerboard_report(&b, &ValidatorParams::default());
        assert_eq!(report.agreement, Some(0.5));
        assert!(!report.accepted);
    }

    #[test]
    fn shuffled_board_is_rejected() {
        let board = pattern(|r, c| if (r + c) % 2 == 0 { 200.0 } else { 50.0 });
        let b: Vec<f32> = (0..64).map(|i| board[(i * 29 + 7) % 64]).collect();
        let report = checkerboard_report(&b, &ValidatorParams::default());
        assert_eq!(report.agreement, Some(0.625));
        assert!(!report.accepted);
    }

    #[test]
    fn a_few_occluded_squares_are_tolerated() {
        let mut b = pattern(|r, c| if (r + c) % 2 == 0 { 190.0 } else { 60.0 });
        for i in [3, 17, 28, 40, 51, 62] {
            b[i] = 240.0 - b[i];
        }
        let report = checkerboard_report(&b, &ValidatorParams::default());
        assert!(report.accepted, "{report:?}");
        assert!(report.agreement.expect("contrast") < 1.0);
    }
}
