//! SIMD-accelerated kernel using the `wide` crate.
//!
//! The inner template row loop is vectorized four pixels at a time with
//! `f64x4` accumulators, matching the precision of the scalar kernel.

use crate::kernel::{finish_score, Kernel, ScanParams};
use crate::template::TemplatePlan;
use crate::ImageView;
use wide::f64x4;

const LANES: usize = 4;

/// Load 4 f32 values widened to f64x4.
#[inline]
fn load_f32x4_as_f64x4(slice: &[f32]) -> f64x4 {
    f64x4::from([
        f64::from(slice[0]),
        f64::from(slice[1]),
        f64::from(slice[2]),
        f64::from(slice[3]),
    ])
}

/// Horizontal sum of f64x4.
#[inline]
fn hsum(v: f64x4) -> f64 {
    let arr = v.to_array();
    arr[0] + arr[1] + arr[2] + arr[3]
}

/// SIMD-accelerated NXCC kernel.
pub struct NxccSimd;

impl Kernel for NxccSimd {
    fn score_at(
        image: ImageView<'_, f32>,
        plan: &TemplatePlan,
        x: usize,
        y: usize,
        params: ScanParams,
    ) -> f32 {
        let tpl_width = plan.width();
        let tpl_height = plan.height();
        if image.width() < tpl_width || image.height() < tpl_height {
            return f32::NEG_INFINITY;
        }
        if x > image.width() - tpl_width || y > image.height() - tpl_height {
            return f32::NEG_INFINITY;
        }

        let t_prime = plan.zero_mean();
        let simd_end = tpl_width / LANES * LANES;

        let mut dot_vec = f64x4::ZERO;
        let mut sum_i_vec = f64x4::ZERO;
        let mut sum_i2_vec = f64x4::ZERO;
        let mut dot_s = 0.0f64;
        let mut sum_i_s = 0.0f64;
        let mut sum_i2_s = 0.0f64;

        for ty in 0..tpl_height {
            let Some(img_row) = image.row(y + ty) else {
                return f32::NEG_INFINITY;
            };
            let window = &img_row[x..x + tpl_width];
            let tpl_row = &t_prime[ty * tpl_width..(ty + 1) * tpl_width];

            let mut tx = 0;
            while tx < simd_end {
                let img_vals = load_f32x4_as_f64x4(&window[tx..]);
                let tpl_vals = load_f32x4_as_f64x4(&tpl_row[tx..]);
                dot_vec += tpl_vals * img_vals;
                sum_i_vec += img_vals;
                sum_i2_vec += img_vals * img_vals;
                tx += LANES;
            }

            while tx < tpl_width {
                let value = f64::from(window[tx]);
                dot_s += f64::from(tpl_row[tx]) * value;
                sum_i_s += value;
                sum_i2_s += value * value;
                tx += 1;
            }
        }

        finish_score(
            hsum(dot_vec) + dot_s,
            hsum(sum_i_vec) + sum_i_s,
            hsum(sum_i2_vec) + sum_i2_s,
            plan.len() as f64,
            f64::from(plan.energy()),
            params.min_var_i,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::NxccSimd;
    use crate::kernel::scalar::NxccScalar;
    use crate::kernel::{Kernel, ScanParams};
    use crate::template::TemplatePlan;
    use crate::ImageView;

    #[test]
    fn simd_matches_scalar_with_remainder_lanes() {
        let (img_width, img_height) = (23, 17);
        let image: Vec<f32> = (0..img_width * img_height)
            .map(|i| ((i * 37 + (i / img_width) * 11) % 101) as f32 / 100.0)
            .collect();
        let (tpl_width, tpl_height) = (7, 5);
        let tpl: Vec<f32> = (0..tpl_width * tpl_height)
            .map(|i| ((i * 13) % 29) as f32 / 28.0)
            .collect();
        let image_view = ImageView::from_slice(&image, img_width, img_height).unwrap();
        let plan =
            TemplatePlan::from_view(ImageView::from_slice(&tpl, tpl_width, tpl_height).unwrap())
                .unwrap();

        let params = ScanParams::default();
        let scalar = NxccScalar::scan_full(image_view, &plan, params).unwrap();
        let simd = NxccSimd::scan_full(image_view, &plan, params).unwrap();
        for (a, b) in scalar.data().iter().zip(simd.data()) {
            assert!((a - b).abs() < 1e-5 || (a.is_nan() && b.is_nan()));
        }
    }
}
