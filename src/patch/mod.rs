//! Patch extraction from the full-resolution raster.
//!
//! Included candidates are ranked by descending normalized score (stable on
//! ties, so detection order decides) and cropped with the selection's
//! [`PatchExtent`](crate::PatchExtent). The crop for a center `(x, y)` covers
//! rows `y - half_height ..= y + half_height` and columns
//! `x - half_width ..= x + half_width` in 0-based coordinates.

#[cfg(feature = "image-io")]
pub mod export;
pub mod naming;

pub use naming::{patch_file_name, ClassTag};

use crate::image::Raster;
use crate::selection::SelectionState;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{PatchError, PatchResult};

/// One extracted patch.
#[derive(Clone, Debug, PartialEq)]
pub struct Patch {
    /// 1-based rank by descending score.
    pub rank: usize,
    /// Index of the source candidate in the selection.
    pub index: usize,
    /// Center column in the source image.
    pub x: usize,
    /// Center row in the source image.
    pub y: usize,
    /// Normalized score of the source candidate.
    pub score: f32,
    /// Cropped pixels with all source channels.
    pub raster: Raster,
}

/// Crops every included candidate of `selection` out of `raster`.
///
/// Fails with `EmptySelection` if nothing is included. An included candidate
/// whose window leaves the image is an `InvariantViolation`.
pub fn extract_patches(raster: &Raster, selection: &SelectionState) -> PatchResult<Vec<Patch>> {
    let _span = trace_span!("extract_patches", candidates = selection.len()).entered();

    let (width, height) = selection.image_size();
    if raster.width() != width || raster.height() != height {
        return Err(PatchError::InvalidDimensions {
            width: raster.width(),
            height: raster.height(),
        });
    }

    let candidates = selection.candidates();
    let mut order: Vec<usize> = selection
        .inclusion_mask()
        .iter()
        .enumerate()
        .filter_map(|(idx, &included)| included.then_some(idx))
        .collect();
    if order.is_empty() {
        return Err(PatchError::EmptySelection);
    }
    order.sort_by(|&a, &b| candidates[b].score().total_cmp(&candidates[a].score()));

    let extent = selection.extent();
    let mut patches = Vec::with_capacity(order.len());
    for (rank, index) in order.into_iter().enumerate() {
        let candidate = &candidates[index];
        let (x, y) = candidate.position();
        debug_assert!(!candidate.is_bad(), "border-excluded candidate {index} was included");
        if candidate.is_bad() || extent.is_bad(x, y, width, height) {
            trace_warn!("patch_outside_image", index = index, x = x, y = y);
            return Err(PatchError::InvariantViolation {
                reason: format!(
                    "included candidate {index} at ({x}, {y}) has its patch outside the image"
                ),
            });
        }
        let region = extent
            .window(x, y)
            .ok_or_else(|| PatchError::InvariantViolation {
                reason: format!("patch window at ({x}, {y}) starts outside the image"),
            })?;
        patches.push(Patch {
            rank: rank + 1,
            index,
            x,
            y,
            score: candidate.score(),
            raster: raster.crop(region)?,
        });
    }

    trace_event!("patches_extracted", count = patches.len());
    Ok(patches)
}
