//! Correlation engine: NXCC map between a template and an image.
//!
//! The map only covers placements where the template lies fully inside the
//! image, which is the zero-padded ("full") correlation with the template
//! extent cropped from every side. Map pixel `(mx, my)` scores the window
//! whose center is image pixel `(mx + half_width, my + half_height)`.

#[cfg(feature = "rayon")]
use crate::kernel::rayon::scan_full_par;
use crate::kernel::{Kernel, ScanParams};
use crate::template::{Template, TemplatePlan};
use crate::trace::{trace_event, trace_span};
use crate::util::PatchResult;
use crate::{ImageView, OwnedImage};

#[cfg(not(feature = "simd"))]
use crate::kernel::scalar::NxccScalar as Nxcc;
#[cfg(feature = "simd")]
use crate::kernel::simd::NxccSimd as Nxcc;

/// NXCC scores aligned to image coordinates through a fixed offset.
///
/// Placements without a defined score (flat image windows) are stored as
/// `0.0` and marked invalid; they never become candidates.
#[derive(Clone, Debug)]
pub struct CorrelationMap {
    scores: OwnedImage<f32>,
    valid: Vec<bool>,
    offset_x: usize,
    offset_y: usize,
}

impl CorrelationMap {
    /// Wraps a score map whose pixel `(0, 0)` corresponds to image pixel
    /// `(offset_x, offset_y)`.
    ///
    /// Non-finite entries are replaced by `0.0` and marked invalid.
    pub fn new(scores: OwnedImage<f32>, offset_x: usize, offset_y: usize) -> Self {
        let (width, height) = (scores.width(), scores.height());
        let mut data = scores.into_vec();
        let valid = data
            .iter_mut()
            .map(|value| {
                if value.is_finite() {
                    true
                } else {
                    *value = 0.0;
                    false
                }
            })
            .collect();
        Self {
            scores: OwnedImage::from_parts(data, width, height),
            valid,
            offset_x,
            offset_y,
        }
    }

    /// Returns the map width.
    pub fn width(&self) -> usize {
        self.scores.width()
    }

    /// Returns the map height.
    pub fn height(&self) -> usize {
        self.scores.height()
    }

    /// Returns the offset `(x, y)` from map to image coordinates.
    pub fn offset(&self) -> (usize, usize) {
        (self.offset_x, self.offset_y)
    }

    /// Returns the score at map pixel `(mx, my)`.
    pub fn get(&self, mx: usize, my: usize) -> Option<f32> {
        self.scores.get(mx, my).copied()
    }

    /// Returns the score of the window centered on image pixel `(x, y)`.
    pub fn score_at_image(&self, x: usize, y: usize) -> Option<f32> {
        let mx = x.checked_sub(self.offset_x)?;
        let my = y.checked_sub(self.offset_y)?;
        self.get(mx, my)
    }

    /// Converts map coordinates to image coordinates.
    pub fn to_image(&self, mx: usize, my: usize) -> (usize, usize) {
        (mx + self.offset_x, my + self.offset_y)
    }

    /// Returns the underlying score image.
    pub fn scores(&self) -> &OwnedImage<f32> {
        &self.scores
    }

    /// Returns `true` if map pixel `(mx, my)` holds a defined score.
    pub fn is_valid(&self, mx: usize, my: usize) -> bool {
        mx < self.width() && my < self.height() && self.valid[my * self.width() + mx]
    }

    /// Returns the validity flag of every map pixel in row-major order.
    pub fn validity(&self) -> &[bool] {
        &self.valid
    }

    /// Returns the number of map pixels with a defined score.
    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|&&v| v).count()
    }
}

/// Computes the NXCC map of `template` over `image`.
///
/// Fails with `TemplateTooLarge` if the template does not fit and with
/// `DegenerateTemplate` if it has no intensity variation.
pub fn correlate(
    image: ImageView<'_, f32>,
    template: &Template,
    params: ScanParams,
    parallel: bool,
) -> PatchResult<CorrelationMap> {
    let _span = trace_span!(
        "correlate",
        width = image.width(),
        height = image.height(),
        tpl_width = template.width(),
        tpl_height = template.height()
    )
    .entered();

    let plan = TemplatePlan::from_view(template.view())?;
    let scores = scan(image, &plan, params, parallel)?;
    let map = CorrelationMap::new(scores, template.half_width(), template.half_height());
    trace_event!(
        "correlation_map",
        width = map.width(),
        height = map.height(),
        valid = map.valid_count()
    );
    Ok(map)
}

#[cfg(feature = "rayon")]
fn scan(
    image: ImageView<'_, f32>,
    plan: &TemplatePlan,
    params: ScanParams,
    parallel: bool,
) -> PatchResult<OwnedImage<f32>> {
    if parallel {
        scan_full_par::<Nxcc>(image, plan, params)
    } else {
        <Nxcc as Kernel>::scan_full(image, plan, params)
    }
}

#[cfg(not(feature = "rayon"))]
fn scan(
    image: ImageView<'_, f32>,
    plan: &TemplatePlan,
    params: ScanParams,
    _parallel: bool,
) -> PatchResult<OwnedImage<f32>> {
    <Nxcc as Kernel>::scan_full(image, plan, params)
}
