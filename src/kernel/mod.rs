//! Correlation kernel implementations.
//!
//! A kernel evaluates the normalized cross-correlation of a [`TemplatePlan`]
//! at every placement where the template fits inside the image. Placement
//! `(x, y)` is the template's top-left corner; the resulting map is
//! `(width - tw + 1) x (height - th + 1)`.

use crate::image::OwnedImage;
use crate::template::TemplatePlan;
use crate::util::{PatchError, PatchResult};
use crate::ImageView;

/// Scan configuration for kernel evaluations.
#[derive(Clone, Copy, Debug)]
pub struct ScanParams {
    /// Per-pixel variance below which an image window is treated as flat and
    /// has no defined score.
    pub min_var_i: f32,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self { min_var_i: 1e-8 }
    }
}

/// Kernel trait for scoring and scan operations.
pub trait Kernel {
    /// Computes the score at a single placement (top-left coordinates).
    ///
    /// Returns `f32::NAN` for flat windows, where the coefficient is
    /// undefined, and `f32::NEG_INFINITY` for placements outside the valid
    /// range.
    fn score_at(
        image: ImageView<'_, f32>,
        plan: &TemplatePlan,
        x: usize,
        y: usize,
        params: ScanParams,
    ) -> f32;

    /// Fills `out` with the scores of placement row `y`.
    fn scan_row(
        image: ImageView<'_, f32>,
        plan: &TemplatePlan,
        y: usize,
        params: ScanParams,
        out: &mut [f32],
    ) {
        for (x, slot) in out.iter_mut().enumerate() {
            *slot = Self::score_at(image, plan, x, y, params);
        }
    }

    /// Scans the full valid placement range and returns the score map.
    fn scan_full(
        image: ImageView<'_, f32>,
        plan: &TemplatePlan,
        params: ScanParams,
    ) -> PatchResult<OwnedImage<f32>> {
        let (out_width, out_height) = placement_range(image, plan)?;
        let mut scores = vec![0.0f32; out_width * out_height];
        for (y, row) in scores.chunks_exact_mut(out_width).enumerate() {
            Self::scan_row(image, plan, y, params, row);
        }
        OwnedImage::new(scores, out_width, out_height)
    }
}

/// Returns the size of the valid placement grid, or `TemplateTooLarge`.
pub(crate) fn placement_range(
    image: ImageView<'_, f32>,
    plan: &TemplatePlan,
) -> PatchResult<(usize, usize)> {
    let img_width = image.width();
    let img_height = image.height();
    let tpl_width = plan.width();
    let tpl_height = plan.height();
    if img_width < tpl_width || img_height < tpl_height {
        return Err(PatchError::TemplateTooLarge {
            tpl_width,
            tpl_height,
            img_width,
            img_height,
        });
    }
    Ok((img_width - tpl_width + 1, img_height - tpl_height + 1))
}

/// Turns accumulated window sums into a correlation coefficient.
///
/// `dot` is `sum(T' * I)`, `sum_i` and `sum_i2` are the window sum and sum of
/// squares over `n` pixels. Flat windows yield `NaN`.
#[inline]
pub(crate) fn finish_score(
    dot: f64,
    sum_i: f64,
    sum_i2: f64,
    n: f64,
    energy_t: f64,
    min_var_i: f32,
) -> f32 {
    let var_i = sum_i2 - (sum_i * sum_i) / n;
    if var_i / n <= f64::from(min_var_i) {
        return f32::NAN;
    }
    let score = dot / (energy_t * var_i).sqrt();
    if score.is_finite() {
        score.clamp(-1.0, 1.0) as f32
    } else {
        f32::NAN
    }
}

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(feature = "rayon")]
pub mod rayon;
