//! Per-candidate selection record.

/// A detected patch center with its scores and selection flags.
///
/// Flags are only changed through [`SelectionState`](crate::SelectionState),
/// which keeps `manual_good` and `manual_bad` mutually exclusive.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub(crate) x: usize,
    pub(crate) y: usize,
    pub(crate) raw_score: f32,
    pub(crate) score: f32,
    pub(crate) bad: bool,
    pub(crate) manual_good: bool,
    pub(crate) manual_bad: bool,
    pub(crate) offset: (isize, isize),
}

impl Candidate {
    /// Creates a candidate without manual overrides.
    pub fn new(x: usize, y: usize, raw_score: f32, score: f32, bad: bool) -> Self {
        Self {
            x,
            y,
            raw_score,
            score,
            bad,
            manual_good: false,
            manual_bad: false,
            offset: (0, 0),
        }
    }

    /// Returns the committed center `(x, y)`.
    pub fn center(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// Returns the displayed center, including an in-progress drag offset.
    pub fn position(&self) -> (usize, usize) {
        (
            self.x.saturating_add_signed(self.offset.0),
            self.y.saturating_add_signed(self.offset.1),
        )
    }

    /// Returns the pending drag offset `(dx, dy)`.
    pub fn offset(&self) -> (isize, isize) {
        self.offset
    }

    /// Returns the correlation coefficient after self-match suppression.
    pub fn raw_score(&self) -> f32 {
        self.raw_score
    }

    /// Returns the normalized score in `[0.1, 1.0]`.
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Returns `true` if the patch window would leave the image.
    pub fn is_bad(&self) -> bool {
        self.bad
    }

    /// Returns `true` if the user forced inclusion.
    pub fn manual_good(&self) -> bool {
        self.manual_good
    }

    /// Returns `true` if the user forced exclusion.
    pub fn manual_bad(&self) -> bool {
        self.manual_bad
    }

    /// Inclusion rule:
    /// `(score >= threshold && !(bad || manual_bad)) || manual_good`.
    pub fn is_included(&self, threshold: f32) -> bool {
        (self.score >= threshold && !(self.bad || self.manual_bad)) || self.manual_good
    }
}
