//! Candidate detection pipeline.
//!
//! `Detector::compute` runs the full chain for one template region:
//! grayscale conversion, template cut, NXCC map, sliding-window maxima,
//! self-match suppression and normalization, border filtering. The result
//! owns a fresh [`SelectionState`]; selecting a new template means calling
//! `compute` again and discarding the previous detection.

use crate::candidate::{find_local_maxima, normalize_scores, PatchExtent};
use crate::correlation::{correlate, CorrelationMap};
use crate::image::Raster;
use crate::kernel::ScanParams;
use crate::selection::{Candidate, SelectionState};
use crate::template::{Region, Template};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{PatchError, PatchResult};
use crate::ImageView;

/// Configuration for candidate detection.
#[derive(Clone, Debug)]
pub struct DetectConfig {
    /// Fill the correlation map row-parallel (requires the `rayon` feature).
    pub parallel: bool,
    /// Per-pixel variance below which an image window scores `0.0`.
    pub min_var_i: f32,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            min_var_i: ScanParams::default().min_var_i,
        }
    }
}

/// Output of one detection run.
#[derive(Clone, Debug)]
pub struct Detection {
    template: Template,
    map: CorrelationMap,
    selection: SelectionState,
}

impl Detection {
    /// Returns the odd-sized template that was matched.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Returns the correlation map in image-aligned form.
    pub fn map(&self) -> &CorrelationMap {
        &self.map
    }

    /// Returns the selection state.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Returns the selection state for editing.
    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    /// Consumes the detection, keeping only the selection.
    pub fn into_selection(self) -> SelectionState {
        self.selection
    }
}

/// Template-based candidate detector.
#[derive(Clone, Debug, Default)]
pub struct Detector {
    cfg: DetectConfig,
}

impl Detector {
    /// Creates a detector with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the detection configuration.
    pub fn with_config(mut self, cfg: DetectConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &DetectConfig {
        &self.cfg
    }

    /// Detects candidates in `raster` for the template cut at `region`.
    pub fn compute(&self, raster: &Raster, region: Region) -> PatchResult<Detection> {
        let gray = raster.to_gray();
        self.compute_gray(gray.view(), region)
    }

    /// Detects candidates in a grayscale image.
    ///
    /// Fails with `NoCandidates` if no local maximum survives the border
    /// filter.
    pub fn compute_gray(
        &self,
        gray: ImageView<'_, f32>,
        region: Region,
    ) -> PatchResult<Detection> {
        let _span = trace_span!(
            "compute",
            x = region.x,
            y = region.y,
            width = region.width,
            height = region.height
        )
        .entered();

        let template = Template::from_region(gray, region)?;
        let params = ScanParams {
            min_var_i: self.cfg.min_var_i,
        };
        let map = correlate(gray, &template, params, self.cfg.parallel)?;
        let peaks = find_local_maxima(&map, template.width(), template.height());

        let raw: Vec<f32> = peaks.iter().map(|peak| peak.score).collect();
        let scores = normalize_scores(&raw);
        let extent = PatchExtent::for_template(&template);
        let (width, height) = (gray.width(), gray.height());

        let candidates: Vec<Candidate> = peaks
            .iter()
            .zip(scores.raw.iter().zip(&scores.normalized))
            .map(|(peak, (&raw_score, &score))| {
                let bad = extent.is_bad(peak.x, peak.y, width, height);
                Candidate::new(peak.x, peak.y, raw_score, score, bad)
            })
            .collect();

        let usable = candidates.iter().filter(|c| !c.is_bad()).count();
        trace_event!(
            "candidates",
            total = candidates.len(),
            usable = usable,
            suppressed = scores.suppressed.is_some()
        );
        if usable == 0 {
            trace_warn!("no_usable_candidates", total = candidates.len());
            return Err(PatchError::NoCandidates);
        }

        let selection = SelectionState::new(candidates, extent, width, height);
        trace_event!("threshold", value = selection.threshold());
        Ok(Detection {
            template,
            map,
            selection,
        })
    }
}
