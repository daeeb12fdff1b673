use patchpick::candidate::normalize::{NORMALIZED_MAX, NORMALIZED_MIN};
use patchpick::{
    find_local_maxima, normalize_scores, Candidate, CorrelationMap, OwnedImage, PatchExtent,
    SelectionState,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn map_from(
    values: Vec<f32>,
    width: usize,
    height: usize,
    offset: (usize, usize),
) -> CorrelationMap {
    CorrelationMap::new(OwnedImage::new(values, width, height).unwrap(), offset.0, offset.1)
}

fn brute_force_maxima(
    values: &[f32],
    width: usize,
    height: usize,
    rx: usize,
    ry: usize,
) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let v = values[y * width + x];
            let mut is_max = true;
            for ny in y.saturating_sub(ry)..=(y + ry).min(height - 1) {
                for nx in x.saturating_sub(rx)..=(x + rx).min(width - 1) {
                    if values[ny * width + nx] > v {
                        is_max = false;
                    }
                }
            }
            if is_max {
                out.push((x, y));
            }
        }
    }
    out
}

#[test]
fn local_maxima_match_bruteforce_on_random_maps() {
    let mut rng = StdRng::seed_from_u64(11);
    for &(width, height, win_w, win_h) in &[(30, 20, 5, 3), (17, 23, 7, 7), (9, 9, 21, 21)] {
        let values: Vec<f32> = (0..width * height)
            .map(|_| rng.random_range(-1.0f32..1.0))
            .collect();
        let map = map_from(values.clone(), width, height, (0, 0));
        let peaks = find_local_maxima(&map, win_w, win_h);
        let got: Vec<(usize, usize)> = peaks.iter().map(|p| (p.x, p.y)).collect();
        let expected = brute_force_maxima(&values, width, height, win_w / 2, win_h / 2);
        assert_eq!(got, expected);
    }
}

#[test]
fn peaks_are_reported_in_image_coordinates() {
    let mut values = vec![0.0f32; 25];
    values[2 * 5 + 3] = 0.8;
    values[4 * 5] = -0.5;
    let map = map_from(values, 5, 5, (10, 20));
    let peaks = find_local_maxima(&map, 3, 3);
    assert!(peaks.iter().any(|p| p.x == 13 && p.y == 22 && p.score == 0.8));
    assert!(peaks.iter().all(|p| p.x >= 10 && p.y >= 20));
}

#[test]
fn flat_plateau_marks_every_tied_pixel() {
    let map = map_from(vec![0.25f32; 6 * 4], 6, 4, (0, 0));
    let peaks = find_local_maxima(&map, 3, 3);
    assert_eq!(peaks.len(), 24);

    // One raised pixel only suppresses the plateau inside its window.
    let mut values = vec![0.0f32; 12];
    values[0] = 0.5;
    let map = map_from(values, 12, 1, (0, 0));
    let peaks = find_local_maxima(&map, 5, 1);
    let xs: Vec<usize> = peaks.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
}

#[test]
fn non_finite_values_are_never_candidates() {
    let values = vec![f32::NAN, 0.1, 0.2, f32::INFINITY, 0.0, 0.05];
    let map = map_from(values, 3, 2, (0, 0));
    assert_eq!(map.get(0, 0), Some(0.0));
    assert!(!map.is_valid(0, 0));
    assert!(!map.is_valid(0, 1));
    let peaks = find_local_maxima(&map, 3, 3);
    assert_eq!(peaks.len(), 1);
    assert_eq!((peaks[0].x, peaks[0].y), (2, 0));
}

#[test]
fn invalid_pixels_do_not_shadow_valid_neighbors() {
    // A weak negative peak next to an undefined region is still a maximum.
    let values = vec![f32::NAN, f32::NAN, -0.3, -0.5, f32::NAN, -0.6];
    let map = map_from(values, 3, 2, (0, 0));
    let peaks: Vec<(usize, usize, f32)> = find_local_maxima(&map, 3, 3)
        .iter()
        .map(|p| (p.x, p.y, p.score))
        .collect();
    assert_eq!(peaks, vec![(2, 0, -0.3), (0, 1, -0.5)]);
}

#[test]
fn normalized_scores_are_bounded_and_suppress_self_match() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..20 {
        let len = rng.random_range(2..40);
        let raw: Vec<f32> = (0..len).map(|_| rng.random_range(-1.0f32..1.0)).collect();
        let set = normalize_scores(&raw);
        assert_eq!(set.normalized.len(), len);
        for &s in &set.normalized {
            assert!((NORMALIZED_MIN..=NORMALIZED_MAX).contains(&s));
        }

        let max_idx = set.suppressed.unwrap();
        let mut order: Vec<usize> = (0..len).collect();
        order.sort_by(|&a, &b| raw[b].total_cmp(&raw[a]));
        assert_eq!(order[0], max_idx);
        let runner_up = order[1];
        assert_eq!(set.normalized[max_idx], set.normalized[runner_up]);
        assert_eq!(set.raw[max_idx], raw[runner_up]);
    }
}

#[test]
fn normalization_handles_zero_variance() {
    let set = normalize_scores(&[0.4, 0.4, 0.4]);
    assert_eq!(set.normalized, vec![1.0, 1.0, 1.0]);
    let set = normalize_scores(&[0.9, 0.4]);
    assert_eq!(set.raw, vec![0.4, 0.4]);
    assert!(set.normalized.iter().all(|s| !s.is_nan()));
    assert!(normalize_scores(&[]).normalized.is_empty());
}

#[test]
fn corner_candidate_is_bad_and_excluded() {
    let extent = PatchExtent::new(10, 10);
    let (width, height) = (100, 100);
    assert!(extent.is_bad(2, 2, width, height));

    let candidates = vec![
        Candidate::new(2, 2, 0.99, 1.0, extent.is_bad(2, 2, width, height)),
        Candidate::new(50, 50, 0.5, 0.5, extent.is_bad(50, 50, width, height)),
    ];
    let mut selection = SelectionState::new(candidates, extent, width, height);
    selection.set_threshold(0.0);
    assert_eq!(selection.inclusion_mask(), vec![false, true]);
}

#[test]
fn not_bad_implies_crop_indices_in_bounds() {
    let extent = PatchExtent::new(4, 6);
    let (width, height) = (15, 20);
    for y in 0..height {
        for x in 0..width {
            if extent.is_bad(x, y, width, height) {
                continue;
            }
            assert!(y >= extent.half_height && y + extent.half_height < height);
            assert!(x >= extent.half_width && x + extent.half_width < width);
        }
    }
}
