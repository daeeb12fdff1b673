//! Template selection and planning.
//!
//! A template is cut from the grayscale image for a user-chosen [`Region`].
//! Both sides are forced odd (`n -> 2 * floor(n / 2) + 1`) so the template has
//! a well-defined center pixel; an even side grows by one pixel towards the
//! right or bottom.

use crate::image::{ImageView, OwnedImage};
use crate::trace::trace_warn;
use crate::util::math::{fit_odd_span, force_odd};
use crate::util::{PatchError, PatchResult};

mod plan;

pub use plan::TemplatePlan;

/// Smallest accepted template side in pixels.
pub const MIN_TEMPLATE_SIDE: usize = 3;

/// Axis-aligned rectangle in 0-based image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// Left column.
    pub x: usize,
    /// Top row.
    pub y: usize,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl Region {
    /// Creates a region from its top-left corner and size.
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates the `(2 * half_height + 1) x (2 * half_width + 1)` region
    /// centered on `(cx, cy)`, or `None` if it would start left of or above
    /// the origin.
    pub fn centered(cx: usize, cy: usize, half_width: usize, half_height: usize) -> Option<Self> {
        Some(Self {
            x: cx.checked_sub(half_width)?,
            y: cy.checked_sub(half_height)?,
            width: 2 * half_width + 1,
            height: 2 * half_height + 1,
        })
    }

    /// Returns the region with both sides forced odd.
    pub fn to_odd(self) -> Self {
        Self {
            width: force_odd(self.width),
            height: force_odd(self.height),
            ..self
        }
    }

    /// Forces both sides odd without leaving a `width x height` image.
    ///
    /// Even sides grow by one pixel; a side that would then cross the image
    /// edge is shifted back by one, or shrunk when it already spans the
    /// whole image.
    pub fn to_odd_within(self, img_width: usize, img_height: usize) -> Self {
        let (x, width) = fit_odd_span(self.x, self.width, img_width);
        let (y, height) = fit_odd_span(self.y, self.height, img_height);
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns `Ok` if the region is non-empty and inside a `width x height` image.
    pub fn check_within(&self, img_width: usize, img_height: usize) -> PatchResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PatchError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let fits_x = self
            .x
            .checked_add(self.width)
            .is_some_and(|end| end <= img_width);
        let fits_y = self
            .y
            .checked_add(self.height)
            .is_some_and(|end| end <= img_height);
        if fits_x && fits_y {
            Ok(())
        } else {
            Err(PatchError::RoiOutOfBounds {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
                img_width,
                img_height,
            })
        }
    }
}

/// Owned grayscale template with odd dimensions.
#[derive(Clone, Debug)]
pub struct Template {
    img: OwnedImage<f32>,
    region: Region,
}

impl Template {
    /// Creates a template from a contiguous grayscale buffer with odd sides.
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> PatchResult<Self> {
        let img = OwnedImage::new(data, width, height)?;
        Self::from_image(img, Region::new(0, 0, width, height))
    }

    /// Crops a template from a grayscale image, forcing the region odd.
    ///
    /// See [`Region::to_odd_within`] for how even sides are adjusted.
    pub fn from_region(gray: ImageView<'_, f32>, region: Region) -> PatchResult<Self> {
        let fitted = region.to_odd_within(gray.width(), gray.height());
        if fitted.x != region.x || fitted.y != region.y || fitted.width < region.width {
            trace_warn!(
                "template_region_adjusted",
                x = fitted.x,
                y = fitted.y,
                width = fitted.width,
                height = fitted.height
            );
        }
        let region = fitted;
        if region.width > gray.width() || region.height > gray.height() {
            return Err(PatchError::TemplateTooLarge {
                tpl_width: region.width,
                tpl_height: region.height,
                img_width: gray.width(),
                img_height: gray.height(),
            });
        }
        let img = gray
            .roi(region.x, region.y, region.width, region.height)?
            .to_owned_image()?;
        Self::from_image(img, region)
    }

    fn from_image(img: OwnedImage<f32>, region: Region) -> PatchResult<Self> {
        let width = img.width();
        let height = img.height();
        if width < MIN_TEMPLATE_SIDE || height < MIN_TEMPLATE_SIDE {
            return Err(PatchError::TemplateTooSmall { width, height });
        }
        if width % 2 == 0 || height % 2 == 0 {
            return Err(PatchError::InvalidDimensions { width, height });
        }
        Ok(Self { img, region })
    }

    /// Returns a borrowed view of the template data.
    pub fn view(&self) -> ImageView<'_, f32> {
        self.img.view()
    }

    /// Returns the template width (always odd).
    pub fn width(&self) -> usize {
        self.img.width()
    }

    /// Returns the template height (always odd).
    pub fn height(&self) -> usize {
        self.img.height()
    }

    /// Returns `floor(width / 2)`.
    pub fn half_width(&self) -> usize {
        self.img.width() / 2
    }

    /// Returns `floor(height / 2)`.
    pub fn half_height(&self) -> usize {
        self.img.height() / 2
    }

    /// Returns the (odd) source region in image coordinates.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Returns the image pixel under the template's center.
    pub fn center(&self) -> (usize, usize) {
        (
            self.region.x + self.half_width(),
            self.region.y + self.half_height(),
        )
    }
}
