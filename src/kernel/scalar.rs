//! Scalar reference kernel for NXCC evaluation.

use crate::kernel::{finish_score, Kernel, ScanParams};
use crate::template::TemplatePlan;
use crate::ImageView;

/// Scalar NXCC kernel; accumulates in `f64`.
pub struct NxccScalar;

impl Kernel for NxccScalar {
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
        let mut dot = 0.0f64;
        let mut sum_i = 0.0f64;
        let mut sum_i2 = 0.0f64;

        for ty in 0..tpl_height {
            let Some(img_row) = image.row(y + ty) else {
                return f32::NEG_INFINITY;
            };
            let window = &img_row[x..x + tpl_width];
            let base = ty * tpl_width;
            for (&t, &value) in t_prime[base..base + tpl_width].iter().zip(window) {
                let value = f64::from(value);
                dot += f64::from(t) * value;
                sum_i += value;
                sum_i2 += value * value;
            }
        }

        finish_score(
            dot,
            sum_i,
            sum_i2,
            plan.len() as f64,
            f64::from(plan.energy()),
            params.min_var_i,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::NxccScalar;
    use crate::kernel::{Kernel, ScanParams};
    use crate::template::TemplatePlan;
    use crate::ImageView;

    fn pattern(width: usize, height: usize, seed: usize) -> Vec<f32> {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let v = ((x * 17 + y * 9 + x * y + seed) & 0xFF) as f32 / 255.0;
                data.push(v);
            }
        }
        data
    }

    #[test]
    fn scan_matches_bruteforce_definition() {
        let (img_width, img_height) = (9, 7);
        let (tpl_width, tpl_height) = (3, 3);
        let image = pattern(img_width, img_height, 0);
        let tpl = pattern(tpl_width, tpl_height, 31);

        let image_view = ImageView::from_slice(&image, img_width, img_height).unwrap();
        let tpl_view = ImageView::from_slice(&tpl, tpl_width, tpl_height).unwrap();
        let plan = TemplatePlan::from_view(tpl_view).unwrap();
        let map = NxccScalar::scan_full(image_view, &plan, ScanParams::default()).unwrap();
        assert_eq!(map.width(), img_width - tpl_width + 1);
        assert_eq!(map.height(), img_height - tpl_height + 1);

        let n = (tpl_width * tpl_height) as f64;
        let t_mean = tpl.iter().map(|&v| v as f64).sum::<f64>() / n;
        for y in 0..map.height() {
            for x in 0..map.width() {
                let mut window = Vec::new();
                for ty in 0..tpl_height {
                    for tx in 0..tpl_width {
                        window.push(image[(y + ty) * img_width + x + tx] as f64);
                    }
                }
                let i_mean = window.iter().sum::<f64>() / n;
                let mut num = 0.0;
                let mut den_t = 0.0;
                let mut den_i = 0.0;
                for (t, i) in tpl.iter().zip(window.iter()) {
                    let dt = *t as f64 - t_mean;
                    let di = i - i_mean;
                    num += dt * di;
                    den_t += dt * dt;
                    den_i += di * di;
                }
                let got = *map.get(x, y).unwrap() as f64;
                if den_i / n <= 1e-8 {
                    assert!(got.is_nan(), "({x}, {y}): flat window scored {got}");
                    continue;
                }
                let expected = num / (den_t * den_i).sqrt();
                assert!((got - expected).abs() < 1e-5, "({x}, {y}): {got} vs {expected}");
            }
        }
    }

    #[test]
    fn flat_window_has_no_score() {
        let image = vec![0.7f32; 25];
        let tpl = pattern(3, 3, 5);
        let image_view = ImageView::from_slice(&image, 5, 5).unwrap();
        let plan = TemplatePlan::from_view(ImageView::from_slice(&tpl, 3, 3).unwrap()).unwrap();
        let score = NxccScalar::score_at(image_view, &plan, 1, 1, ScanParams::default());
        assert!(score.is_nan());
    }

    #[test]
    fn out_of_range_placement_is_negative_infinity() {
        let image = pattern(5, 5, 0);
        let tpl = pattern(3, 3, 5);
        let image_view = ImageView::from_slice(&image, 5, 5).unwrap();
        let plan = TemplatePlan::from_view(ImageView::from_slice(&tpl, 3, 3).unwrap()).unwrap();
        let score = NxccScalar::score_at(image_view, &plan, 3, 0, ScanParams::default());
        assert_eq!(score, f32::NEG_INFINITY);
    }
}
