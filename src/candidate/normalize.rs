//! Score normalization for presentation and thresholding.
//!
//! The template always matches its own source location perfectly, so the
//! single highest raw score is replaced by the second-highest one before the
//! scores are min-max rescaled into `[NORMALIZED_MIN, NORMALIZED_MAX]`.

/// Lower bound of normalized scores.
pub const NORMALIZED_MIN: f32 = 0.1;
/// Upper bound of normalized scores.
pub const NORMALIZED_MAX: f32 = 1.0;

/// Raw scores after self-match suppression and their normalized values.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreSet {
    /// Raw scores with the maximum replaced by the runner-up.
    pub raw: Vec<f32>,
    /// Scores rescaled into `[NORMALIZED_MIN, NORMALIZED_MAX]`.
    pub normalized: Vec<f32>,
    /// Index whose raw value was replaced, if any.
    pub suppressed: Option<usize>,
}

/// Suppresses the self-match peak and rescales the scores.
///
/// When every adjusted score is equal (including a single score) the range is
/// degenerate and every normalized score is `NORMALIZED_MAX`.
pub fn normalize_scores(scores: &[f32]) -> ScoreSet {
    let mut raw = scores.to_vec();
    let suppressed = suppress_self_match(&mut raw);
    let normalized = rescale(&raw);
    ScoreSet {
        raw,
        normalized,
        suppressed,
    }
}

/// Replaces the first maximum with the largest of the remaining scores.
///
/// Returns the replaced index, or `None` for fewer than two scores.
pub fn suppress_self_match(scores: &mut [f32]) -> Option<usize> {
    if scores.len() < 2 {
        return None;
    }
    let mut max_idx = 0usize;
    for (idx, value) in scores.iter().enumerate().skip(1) {
        if value.total_cmp(&scores[max_idx]).is_gt() {
            max_idx = idx;
        }
    }
    let runner_up = scores
        .iter()
        .enumerate()
        .filter(|&(idx, _)| idx != max_idx)
        .map(|(_, &value)| value)
        .max_by(f32::total_cmp)?;
    scores[max_idx] = runner_up;
    Some(max_idx)
}

/// Min-max rescales into `[NORMALIZED_MIN, NORMALIZED_MAX]`.
pub fn rescale(scores: &[f32]) -> Vec<f32> {
    let Some(min) = scores.iter().copied().min_by(f32::total_cmp) else {
        return Vec::new();
    };
    let max = scores.iter().copied().max_by(f32::total_cmp).unwrap_or(min);
    let range = max - min;
    if !(range > 0.0 && range.is_finite()) {
        return vec![NORMALIZED_MAX; scores.len()];
    }
    let span = NORMALIZED_MAX - NORMALIZED_MIN;
    scores
        .iter()
        .map(|&s| {
            (NORMALIZED_MIN + span * (s - min) / range).clamp(NORMALIZED_MIN, NORMALIZED_MAX)
        })
        .collect()
}
