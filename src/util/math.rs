//! Numeric helpers shared by the template, scoring and selection code.

/// Forces a length to be odd by flooring to even and adding one.
pub(crate) fn force_odd(len: usize) -> usize {
    (len / 2) * 2 + 1
}

/// Forces the span `start..start + len` odd while keeping it inside
/// `0..limit` when it started there.
///
/// An even span grows by one; if that crosses `limit` it is shifted back by
/// one, and if it already starts at zero it shrinks by one instead.
pub(crate) fn fit_odd_span(start: usize, len: usize, limit: usize) -> (usize, usize) {
    let odd = force_odd(len);
    let fits_before = start.checked_add(len).is_some_and(|end| end <= limit);
    let fits_after = start.checked_add(odd).is_some_and(|end| end <= limit);
    if odd == len || !fits_before || fits_after {
        (start, odd)
    } else if start > 0 {
        (start - 1, odd)
    } else {
        (start, len.saturating_sub(1).max(1))
    }
}

/// Returns the median of the finite values, averaging the middle pair for
/// even counts. Returns `None` when no finite value is present.
pub(crate) fn median(values: &[f32]) -> Option<f32> {
    let mut sorted: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f32::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(0.5 * (sorted[mid - 1] + sorted[mid]))
    } else {
        Some(sorted[mid])
    }
}

/// Clamps a value into `[lo, hi]`, mapping NaN to `lo`.
pub(crate) fn clamp_or_lo(value: f32, lo: f32, hi: f32) -> f32 {
    if value.is_nan() {
        lo
    } else {
        value.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::{clamp_or_lo, fit_odd_span, force_odd, median};

    #[test]
    fn force_odd_rounds_even_up() {
        assert_eq!(force_odd(20), 21);
        assert_eq!(force_odd(21), 21);
        assert_eq!(force_odd(0), 1);
        assert_eq!(force_odd(4), 5);
    }

    #[test]
    fn odd_span_stays_inside_the_limit() {
        assert_eq!(fit_odd_span(40, 20, 100), (40, 21));
        assert_eq!(fit_odd_span(80, 20, 100), (79, 21));
        assert_eq!(fit_odd_span(0, 100, 100), (0, 99));
        assert_eq!(fit_odd_span(10, 21, 100), (10, 21));
        // Spans that never fit are left for the bounds check to reject.
        assert_eq!(fit_odd_span(90, 20, 100), (90, 21));
    }

    #[test]
    fn median_handles_odd_and_even_counts() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[f32::NAN, 1.0]), Some(1.0));
    }

    #[test]
    fn clamp_maps_nan_to_lower_bound() {
        assert_eq!(clamp_or_lo(f32::NAN, 0.0, 1.0), 0.0);
        assert_eq!(clamp_or_lo(1.5, 0.0, 1.0), 1.0);
        assert_eq!(clamp_or_lo(-0.5, 0.0, 1.0), 0.0);
    }
}
