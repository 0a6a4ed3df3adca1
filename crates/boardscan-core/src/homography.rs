use crate::{sample_bilinear_rgb_u8, RgbImage, RgbImageView};
use nalgebra::{Matrix3, Point2, RowSVector, SMatrix, SVector, Vector2, Vector3};

/// Planar projective transform acting on homogeneous pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    #[inline]
    pub fn apply(&self, p: Point2<f32>) -> Point2<f32> {
        let v = self.h * p.cast::<f64>().to_homogeneous();
        Point2::new((v.x / v.z) as f32, (v.y / v.z) as f32)
    }

    pub fn inverse(&self) -> Option<Self> {
        self.h.try_inverse().map(Self::new)
    }
}

/// Similarity that moves the centroid of `pts` to the origin and scales their
/// mean distance from it to `sqrt(2)`.
fn conditioning(pts: &[Point2<f32>; 4]) -> Matrix3<f64> {
    let centroid = pts
        .iter()
        .fold(Vector2::zeros(), |acc: Vector2<f64>, p| {
            acc + Vector2::new(p.x as f64, p.y as f64)
        })
        / 4.0;
    let spread = pts
        .iter()
        .map(|p| (Vector2::new(p.x as f64, p.y as f64) - centroid).norm())
        .sum::<f64>()
        / 4.0;
    let s = if spread > 1e-12 {
        std::f64::consts::SQRT_2 / spread
    } else {
        1.0
    };
    Matrix3::new(
        s, 0.0, -s * centroid.x, //
        0.0, s, -s * centroid.y, //
        0.0, 0.0, 1.0,
    )
}

fn transform(t: &Matrix3<f64>, p: &Point2<f32>) -> (f64, f64) {
    let v = t * Vector3::new(p.x as f64, p.y as f64, 1.0);
    (v.x / v.z, v.y / v.z)
}

/// Compute H such that `dst ~ H * src` from exactly four correspondences.
///
/// Corner order must be consistent between `src` and `dst`. Returns `None`
/// when three of the points are collinear (the linear system is singular).
pub fn homography_from_4pt(src: &[Point2<f32>; 4], dst: &[Point2<f32>; 4]) -> Option<Homography> {
    let t_src = conditioning(src);
    let t_dst = conditioning(dst);

    // Eight unknowns h11..h32 with h33 fixed to 1; two rows per correspondence.
    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for (k, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
        let (x, y) = transform(&t_src, s);
        let (u, v) = transform(&t_dst, d);
        a.set_row(
            2 * k,
            &RowSVector::<f64, 8>::from_row_slice(&[x, y, 1.0, 0.0, 0.0, 0.0, -u * x, -u * y]),
        );
        a.set_row(
            2 * k + 1,
            &RowSVector::<f64, 8>::from_row_slice(&[0.0, 0.0, 0.0, x, y, 1.0, -v * x, -v * y]),
        );
        b[2 * k] = u;
        b[2 * k + 1] = v;
    }

    let x = a.lu().solve(&b)?;
    if !x.iter().all(|c| c.is_finite()) {
        return None;
    }
    let conditioned = Matrix3::from_row_slice(&[x[0], x[1], x[2], x[3], x[4], x[5], x[6], x[7], 1.0]);

    let h = t_dst.try_inverse()? * conditioned * t_src;
    let scale = h[(2, 2)];
    (scale.abs() >= 1e-12).then(|| Homography::new(h / scale))
}

/// Resample `src` into an `out_w x out_h` buffer: each output pixel index is
/// mapped through `h_img_from_out` into source pixel indices and bilinearly sampled.
pub fn warp_perspective_rgb(
    src: &RgbImageView<'_>,
    h_img_from_out: Homography,
    out_w: usize,
    out_h: usize,
) -> RgbImage {
    let mut out = RgbImage::new(out_w, out_h);

    for y in 0..out_h {
        for x in 0..out_w {
            let pi = h_img_from_out.apply(Point2::new(x as f32, y as f32));
            let v = sample_bilinear_rgb_u8(src, pi.x, pi.y);
            let idx = (y * out_w + x) * 3;
            out.data[idx..idx + 3].copy_from_slice(&v);
        }
    }

    out
}
