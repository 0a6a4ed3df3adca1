//! Core types and utilities for photographed-chessboard rectification.
//!
//! Purely geometric: no dependency on an image decoding crate. Pixels come
//! in as borrowed interleaved RGB views.

mod homography;
mod image;
mod logger;
mod quad;

pub use homography::{homography_from_4pt, warp_perspective_rgb, Homography};
pub use image::{luma, sample_bilinear_rgb, sample_bilinear_rgb_u8, RgbImage, RgbImageView};
pub use quad::{EdgeLengths, Quadrilateral};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
