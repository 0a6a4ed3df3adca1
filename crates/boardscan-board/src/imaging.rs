//! Adapters between `image` buffers and the lightweight core views.

use boardscan_core::{luma, RgbImageView};
use image::{GrayImage, Luma, RgbImage};

/// Borrow an `image::RgbImage` as a core view.
pub fn rgb_view(img: &RgbImage) -> RgbImageView<'_> {
    RgbImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Move a core buffer into an `image::RgbImage`.
pub(crate) fn into_rgb_image(img: boardscan_core::RgbImage) -> Option<RgbImage> {
    let w = u32::try_from(img.width).ok()?;
    let h = u32::try_from(img.height).ok()?;
    RgbImage::from_raw(w, h, img.data)
}

/// Grayscale conversion with the same luma weights the validator uses.
pub fn gray_from_rgb(img: &RgbImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let v = luma(img.get_pixel(x, y).0);
        Luma([v.round().clamp(0.0, 255.0) as u8])
    })
}

/// Mean luma of a patch; zero for an empty patch.
pub fn mean_brightness(img: &RgbImage) -> f32 {
    let n = img.width() as usize * img.height() as usize;
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = img.pixels().map(|p| luma(p.0) as f64).sum();
    (sum / n as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn gray_of_white_is_white() {
        let img = RgbImage::from_pixel(3, 2, Rgb([255, 255, 255]));
        let gray = gray_from_rgb(&img);
        assert!(gray.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn mean_brightness_averages_pixels() {
        let mut img = RgbImage::from_pixel(2, 1, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([100, 100, 100]));
        assert!((mean_brightness(&img) - 50.0).abs() < 1e-3);
        assert_eq!(mean_brightness(&RgbImage::new(0, 0)), 0.0);
    }
}
