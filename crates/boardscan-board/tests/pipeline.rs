use boardscan_board::synthetic::{
    noise_image, render_board, render_warped_board, BoardStyle, WARPED_BOARD_CORNERS,
};
use boardscan_board::{BoardScanner, DetectError, ScanParams, BOARD_NOT_DETECTED};
use image::{Rgb, RgbImage};
use std::collections::HashSet;

/// Uniformly gray squares separated by drawn dark lines: a perfect grid
/// with no light/dark alternation.
fn ruled_board() -> RgbImage {
    let style = BoardStyle {
        light: 190,
        dark: 190,
        ..BoardStyle::default()
    };
    let (x0, y0) = (60u32, 40u32);
    let mut img = render_board(480, 420, x0, y0, &style);
    let f = style.frame;
    let end = f + 8 * style.cell;
    for k in 0..9 {
        let p = f + k * style.cell;
        for t in (f - 1)..=end {
            for q in [p - 1, p] {
                img.put_pixel(x0 + t, y0 + q, Rgb([60, 60, 60]));
                img.put_pixel(x0 + q, y0 + t, Rgb([60, 60, 60]));
            }
        }
    }
    img
}

#[test]
fn warped_board_yields_64_named_patches() {
    let _ = env_logger::builder().is_test(true).try_init();

    let photo = render_warped_board(640, 480, &BoardStyle::default());
    let result = BoardScanner::default().scan(&photo).expect("board detected");

    for (got, want) in result.quad.corners().iter().zip(WARPED_BOARD_CORNERS.iter()) {
        let d = ((got.x - want[0]).powi(2) + (got.y - want[1]).powi(2)).sqrt();
        assert!(d < 5.0, "corner {got:?} too far from {want:?}");
    }
    assert!(result.rectified_side as f32 >= result.quad.edge_lengths().max());

    let names: HashSet<String> = result.squares.iter().map(|s| s.name.to_string()).collect();
    assert_eq!(names.len(), 64);
    assert!(result
        .squares
        .iter()
        .all(|s| s.patch.width() > 0 && s.patch.height() > 0));

    let report = result.checkerboard.expect("validation ran");
    assert!(report.accepted);
    assert!(report.agreement.expect("contrast") >= 0.9);
    assert_eq!(report.light_parity, Some(0));
}

#[test]
fn noise_photo_has_no_board() {
    let err = BoardScanner::default()
        .scan(&noise_image(640, 480, 1234))
        .unwrap_err();
    assert_eq!(err, DetectError::BoardNotFound);
    assert_eq!(err.user_message(), BOARD_NOT_DETECTED);
}

#[test]
fn grid_without_alternation_is_rejected() {
    let photo = ruled_board();
    let err = BoardScanner::default().scan(&photo).unwrap_err();
    assert_eq!(err, DetectError::CheckerboardMismatch { agreement: None });
}

#[test]
fn disabling_validation_returns_unchecked_squares() {
    let photo = ruled_board();
    let params = ScanParams {
        validate: false,
        ..ScanParams::default()
    };
    let result = BoardScanner::new(params).scan(&photo).expect("grid found");
    assert_eq!(result.squares.len(), 64);
    assert!(result.checkerboard.is_none());
}

#[test]
fn partial_json_overrides_keep_defaults() {
    let params: ScanParams =
        serde_json::from_str(r#"{ "locator": { "thresholds": [220] }, "validate": false }"#)
            .expect("params json");
    assert_eq!(params.locator.thresholds, vec![220]);
    assert_eq!(params.locator.max_contours_per_threshold, 5);
    assert_eq!(params.grid.max_candidates, 30);
    assert!(!params.validate);

    // Frame level 230 survives a 220 threshold.
    let photo = render_warped_board(640, 480, &BoardStyle::default());
    assert!(BoardScanner::new(params).scan(&photo).is_ok());
}
