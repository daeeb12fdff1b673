//! Selection state: threshold, manual overrides and drag edits.
//!
//! `SelectionState` owns the candidate list produced by one template and is
//! the only writer of its flags. Every mutation goes through `&mut self`, so a
//! UI drives it by translating raw input events into [`Command`]s and
//! redrawing according to the returned [`Change`]. Display state (the
//! good/bad partition, displayed positions) is recomputed on demand.

mod candidate;

pub use candidate::Candidate;

use crate::candidate::PatchExtent;
use crate::trace::trace_event;
use crate::util::math::{clamp_or_lo, median};
use crate::util::{PatchError, PatchResult};

/// User command addressed to the selection state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Move the global score threshold.
    SetThreshold(f32),
    /// Flip the manual override of a candidate.
    Toggle(usize),
    /// Start dragging a candidate from a pixel position.
    BeginDrag { index: usize, at: (isize, isize) },
    /// Report the current pointer position of a drag.
    UpdateDrag { index: usize, at: (isize, isize) },
    /// Finish a drag and move the candidate permanently.
    CommitDrag(usize),
}

/// What a command changed, so the UI knows what to redraw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    /// Nothing changed.
    None,
    /// The threshold moved; the whole partition may differ.
    Threshold,
    /// Flags of one candidate changed.
    Flags(usize),
    /// The displayed or committed position of one candidate changed.
    Position(usize),
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Drag {
    index: usize,
    start: (isize, isize),
}

/// Candidates of one template plus the user's selection edits.
#[derive(Clone, Debug)]
pub struct SelectionState {
    candidates: Vec<Candidate>,
    threshold: f32,
    extent: PatchExtent,
    image_width: usize,
    image_height: usize,
    drag: Option<Drag>,
}

impl SelectionState {
    /// Creates a selection with the threshold at the median normalized score.
    pub fn new(
        candidates: Vec<Candidate>,
        extent: PatchExtent,
        image_width: usize,
        image_height: usize,
    ) -> Self {
        let scores: Vec<f32> = candidates.iter().map(Candidate::score).collect();
        let threshold = clamp_or_lo(median(&scores).unwrap_or(0.0), 0.0, 1.0);
        Self {
            candidates,
            threshold,
            extent,
            image_width,
            image_height,
            drag: None,
        }
    }

    /// Returns all candidates in detection order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Returns candidate `index`.
    pub fn candidate(&self, index: usize) -> PatchResult<&Candidate> {
        self.candidates
            .get(index)
            .ok_or(PatchError::IndexOutOfBounds {
                index,
                len: self.candidates.len(),
                context: "candidate",
            })
    }

    /// Returns the number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns `true` if there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Returns the current threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Returns the patch extent used by the border filter.
    pub fn extent(&self) -> PatchExtent {
        self.extent
    }

    /// Returns the `(width, height)` of the source image.
    pub fn image_size(&self) -> (usize, usize) {
        (self.image_width, self.image_height)
    }

    /// Sets the threshold, clamped to `[0, 1]`. Manual flags are untouched.
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = clamp_or_lo(threshold, 0.0, 1.0);
        trace_event!("threshold", value = self.threshold);
    }

    /// Returns `true` if candidate `index` is currently included.
    pub fn is_included(&self, index: usize) -> PatchResult<bool> {
        Ok(self.candidate(index)?.is_included(self.threshold))
    }

    /// Returns the inclusion flag of every candidate.
    pub fn inclusion_mask(&self) -> Vec<bool> {
        self.candidates
            .iter()
            .map(|c| c.is_included(self.threshold))
            .collect()
    }

    /// Returns the number of included candidates.
    pub fn included_count(&self) -> usize {
        self.candidates
            .iter()
            .filter(|c| c.is_included(self.threshold))
            .count()
    }

    /// Splits candidate indices into `(included, excluded)` for display.
    pub fn good_bad_partition(&self) -> (Vec<usize>, Vec<usize>) {
        (0..self.candidates.len()).partition(|&i| self.candidates[i].is_included(self.threshold))
    }

    /// Flips the manual override of candidate `index`.
    ///
    /// An included candidate becomes manually excluded, any other becomes
    /// manually included. Border-excluded candidates are left unchanged.
    /// Returns whether anything changed.
    pub fn toggle_manual(&mut self, index: usize) -> PatchResult<bool> {
        let threshold = self.threshold;
        let candidate = self.candidate_mut(index)?;
        if candidate.bad {
            return Ok(false);
        }
        if candidate.is_included(threshold) {
            candidate.manual_bad = true;
            candidate.manual_good = false;
        } else {
            candidate.manual_good = true;
            candidate.manual_bad = false;
        }
        Ok(true)
    }

    /// Starts dragging candidate `index` from pointer position `start`.
    ///
    /// A drag already in progress on another candidate is abandoned and its
    /// offset discarded.
    pub fn begin_drag(&mut self, index: usize, start: (isize, isize)) -> PatchResult<()> {
        self.candidate(index)?;
        if let Some(previous) = self.drag.take() {
            self.candidates[previous.index].offset = (0, 0);
        }
        self.candidates[index].offset = (0, 0);
        self.drag = Some(Drag { index, start });
        Ok(())
    }

    /// Updates the pending offset of the dragged candidate.
    ///
    /// The offset is clamped so the displayed center stays inside the image.
    pub fn update_drag(&mut self, index: usize, current: (isize, isize)) -> PatchResult<()> {
        let drag = self.active_drag(index)?;
        let max_x = self.image_width.saturating_sub(1);
        let max_y = self.image_height.saturating_sub(1);
        let candidate = &mut self.candidates[index];
        candidate.offset = (
            clamp_offset(candidate.x, current.0.saturating_sub(drag.start.0), max_x),
            clamp_offset(candidate.y, current.1.saturating_sub(drag.start.1), max_y),
        );
        Ok(())
    }

    /// Commits the pending offset into the candidate center.
    ///
    /// The border filter is re-run for the moved candidate; a candidate that
    /// became bad loses its manual inclusion. Returns the new center.
    pub fn commit_drag(&mut self, index: usize) -> PatchResult<(usize, usize)> {
        self.active_drag(index)?;
        self.drag = None;
        let extent = self.extent;
        let (width, height) = (self.image_width, self.image_height);
        let candidate = &mut self.candidates[index];
        let (x, y) = candidate.position();
        candidate.x = x;
        candidate.y = y;
        candidate.offset = (0, 0);
        candidate.bad = extent.is_bad(x, y, width, height);
        if candidate.bad {
            candidate.manual_good = false;
        }
        trace_event!("candidate_moved", index = index, x = x, y = y);
        Ok((x, y))
    }

    /// Applies a command and reports what changed.
    pub fn apply(&mut self, command: Command) -> PatchResult<Change> {
        match command {
            Command::SetThreshold(threshold) => {
                self.set_threshold(threshold);
                Ok(Change::Threshold)
            }
            Command::Toggle(index) => Ok(if self.toggle_manual(index)? {
                Change::Flags(index)
            } else {
                Change::None
            }),
            Command::BeginDrag { index, at } => {
                self.begin_drag(index, at)?;
                Ok(Change::None)
            }
            Command::UpdateDrag { index, at } => {
                self.update_drag(index, at)?;
                Ok(Change::Position(index))
            }
            Command::CommitDrag(index) => {
                self.commit_drag(index)?;
                Ok(Change::Position(index))
            }
        }
    }

    fn candidate_mut(&mut self, index: usize) -> PatchResult<&mut Candidate> {
        let len = self.candidates.len();
        self.candidates
            .get_mut(index)
            .ok_or(PatchError::IndexOutOfBounds {
                index,
                len,
                context: "candidate",
            })
    }

    fn active_drag(&self, index: usize) -> PatchResult<Drag> {
        self.candidate(index)?;
        match self.drag {
            Some(drag) if drag.index == index => Ok(drag),
            _ => Err(PatchError::DragNotStarted { index }),
        }
    }
}

/// Clamps `delta` so that `base + delta` stays in `[0, max]`.
fn clamp_offset(base: usize, delta: isize, max: usize) -> isize {
    let base = isize::try_from(base).unwrap_or(isize::MAX);
    let max = isize::try_from(max).unwrap_or(isize::MAX);
    let lo = base.saturating_neg();
    let hi = max.saturating_sub(base);
    delta.clamp(lo, hi.max(lo))
}
