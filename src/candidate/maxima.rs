//! Sliding-window local maxima of the correlation map.
//!
//! A map pixel is a candidate iff its value is `>=` every value in the
//! `th x tw` neighborhood centered on it, with the neighborhood clipped to the
//! map. The test is non-strict, so every pixel of a plateau is reported; no
//! deduplication is attempted. Invalid map pixels (flat image windows) take
//! no part in the comparison and are never reported. The neighborhood maximum
//! is computed with a separable monotonic-deque filter, rows first, then
//! columns.

use crate::candidate::Peak;
use crate::correlation::CorrelationMap;
use crate::trace::{trace_event, trace_span};
use std::collections::VecDeque;

/// Returns the local maxima of `map` over a `window_height x window_width`
/// neighborhood, in row-major order and image coordinates.
///
/// Even window sizes are treated as the next odd size; invalid map pixels
/// are never reported.
pub fn find_local_maxima(
    map: &CorrelationMap,
    window_width: usize,
    window_height: usize,
) -> Vec<Peak> {
    let width = map.width();
    let height = map.height();
    let radius_x = window_width / 2;
    let radius_y = window_height / 2;
    let _span = trace_span!(
        "find_local_maxima",
        width = width,
        height = height,
        radius_x = radius_x,
        radius_y = radius_y
    )
    .entered();

    let values: Vec<f32> = map
        .scores()
        .data()
        .iter()
        .zip(map.validity())
        .map(|(&v, &valid)| if valid { v } else { f32::NEG_INFINITY })
        .collect();
    let dilated = dilate(&values, width, height, radius_x, radius_y);

    let mut peaks = Vec::new();
    for my in 0..height {
        for mx in 0..width {
            let idx = my * width + mx;
            let value = values[idx];
            if value.is_finite() && value >= dilated[idx] {
                let (x, y) = map.to_image(mx, my);
                peaks.push(Peak { x, y, score: value });
            }
        }
    }

    trace_event!("local_maxima", count = peaks.len());
    peaks
}

/// Grey-level dilation with a `(2 * radius_y + 1) x (2 * radius_x + 1)`
/// rectangle, clipped at the borders.
fn dilate(
    values: &[f32],
    width: usize,
    height: usize,
    radius_x: usize,
    radius_y: usize,
) -> Vec<f32> {
    let mut rows = vec![f32::NEG_INFINITY; values.len()];
    for (src, dst) in values.chunks_exact(width).zip(rows.chunks_exact_mut(width)) {
        sliding_max(src, radius_x, dst);
    }

    let mut out = vec![f32::NEG_INFINITY; values.len()];
    let mut column = vec![0.0f32; height];
    let mut column_max = vec![f32::NEG_INFINITY; height];
    for x in 0..width {
        for (y, slot) in column.iter_mut().enumerate() {
            *slot = rows[y * width + x];
        }
        sliding_max(&column, radius_y, &mut column_max);
        for (y, &value) in column_max.iter().enumerate() {
            out[y * width + x] = value;
        }
    }
    out
}

/// Writes `max(values[i - radius ..= i + radius])` (clipped) into `out[i]`.
fn sliding_max(values: &[f32], radius: usize, out: &mut [f32]) {
    let len = values.len();
    let mut window: VecDeque<usize> = VecDeque::with_capacity(2 * radius + 1);
    for i in 0..len + radius {
        if i < len {
            let value = values[i];
            while window.back().is_some_and(|&back| values[back] <= value) {
                window.pop_back();
            }
            window.push_back(i);
        }
        if i < radius {
            continue;
        }
        let center = i - radius;
        let lo = center.saturating_sub(radius);
        while window.front().is_some_and(|&front| front < lo) {
            window.pop_front();
        }
        if let Some(&front) = window.front() {
            out[center] = values[front];
        }
    }
}
