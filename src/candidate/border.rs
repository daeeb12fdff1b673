//! Border filter for patch windows.
//!
//! Patches are `(2 * half_height + 1) x (2 * half_width + 1)` crops centered on
//! a candidate. In 0-based coordinates a candidate is bad iff
//! `y < half_height || y >= height - half_height` or the same holds for `x`
//! (the 1-based form is `y - th < 1 || y > h - th`). A candidate that is not
//! bad has its whole window inside `[0, height) x [0, width)`.

use crate::template::{Region, Template};

/// Half extents of the patch cut around each candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatchExtent {
    /// Columns kept left and right of the center.
    pub half_width: usize,
    /// Rows kept above and below the center.
    pub half_height: usize,
}

impl PatchExtent {
    /// Creates an extent from explicit half sizes.
    pub fn new(half_width: usize, half_height: usize) -> Self {
        Self {
            half_width,
            half_height,
        }
    }

    /// Patch extent used for a template: the half extents equal the full
    /// template size, giving `(2 * th + 1) x (2 * tw + 1)` patches.
    pub fn for_template(template: &Template) -> Self {
        Self::new(template.width(), template.height())
    }

    /// Returns the patch width `2 * half_width + 1`.
    pub fn width(&self) -> usize {
        2 * self.half_width + 1
    }

    /// Returns the patch height `2 * half_height + 1`.
    pub fn height(&self) -> usize {
        2 * self.half_height + 1
    }

    /// Returns `true` if the window centered on `(x, y)` leaves a
    /// `img_width x img_height` image.
    pub fn is_bad(&self, x: usize, y: usize, img_width: usize, img_height: usize) -> bool {
        y < self.half_height
            || y >= img_height.saturating_sub(self.half_height)
            || x < self.half_width
            || x >= img_width.saturating_sub(self.half_width)
    }

    /// Returns the window centered on `(x, y)`, or `None` if it starts
    /// outside the image origin.
    pub fn window(&self, x: usize, y: usize) -> Option<Region> {
        Region::centered(x, y, self.half_width, self.half_height)
    }
}

#[cfg(test)]
mod tests {
    use super::PatchExtent;

    #[test]
    fn boundary_pixels_follow_zero_based_rule() {
        let extent = PatchExtent::new(10, 10);
        assert!(extent.is_bad(9, 50, 100, 100));
        assert!(!extent.is_bad(10, 50, 100, 100));
        assert!(!extent.is_bad(89, 50, 100, 100));
        assert!(extent.is_bad(90, 50, 100, 100));
        assert!(extent.is_bad(50, 90, 100, 100));
    }

    #[test]
    fn good_window_fits_inside_image() {
        let extent = PatchExtent::new(3, 2);
        let (w, h) = (12, 9);
        for y in 0..h {
            for x in 0..w {
                if extent.is_bad(x, y, w, h) {
                    continue;
                }
                let region = extent.window(x, y).unwrap();
                assert!(region.check_within(w, h).is_ok(), "({x}, {y})");
            }
        }
    }

    #[test]
    fn oversized_extent_marks_everything_bad() {
        let extent = PatchExtent::new(8, 8);
        assert!(extent.is_bad(8, 8, 16, 16));
        assert!(extent.is_bad(0, 0, 4, 4));
    }
}
