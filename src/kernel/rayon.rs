//! Rayon-parallel scan (feature-gated).
//!
//! Placement rows are independent, so the score map is filled row-parallel
//! with any [`Kernel`]; the result is identical to the sequential scan.

use crate::image::OwnedImage;
use crate::kernel::{placement_range, Kernel, ScanParams};
use crate::template::TemplatePlan;
use crate::util::PatchResult;
use crate::ImageView;
use rayon::prelude::*;

/// Row-parallel full scan for kernel `K`.
pub fn scan_full_par<K: Kernel>(
    image: ImageView<'_, f32>,
    plan: &TemplatePlan,
    params: ScanParams,
) -> PatchResult<OwnedImage<f32>> {
    let (out_width, out_height) = placement_range(image, plan)?;
    let mut scores = vec![0.0f32; out_width * out_height];
    scores
        .par_chunks_mut(out_width)
        .enumerate()
        .for_each(|(y, row)| K::scan_row(image, plan, y, params, row));
    OwnedImage::new(scores, out_width, out_height)
}
