//! Template plan precomputation for normalized cross-correlation.

use crate::image::ImageView;
use crate::util::{PatchError, PatchResult};

/// Zero-mean template buffer with its energy, computed once per template.
pub struct TemplatePlan {
    width: usize,
    height: usize,
    mean: f32,
    energy: f32,
    zero_mean: Vec<f32>,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    ///
    /// Statistics are accumulated in `f64`; a template with (numerically)
    /// zero variance is rejected.
    pub fn from_view(tpl: ImageView<'_, f32>) -> PatchResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width
            .checked_mul(height)
            .ok_or(PatchError::InvalidDimensions { width, height })?;

        let mut sum = 0.0f64;
        for y in 0..height {
            let row = template_row(tpl, y)?;
            sum += row.iter().map(|&v| f64::from(v)).sum::<f64>();
        }
        let mean = sum / count as f64;

        let mut energy = 0.0f64;
        let mut zero_mean = Vec::with_capacity(count);
        for y in 0..height {
            for &value in template_row(tpl, y)? {
                let centered = f64::from(value) - mean;
                energy += centered * centered;
                zero_mean.push(centered as f32);
            }
        }

        if !energy.is_finite() || energy / count as f64 <= 1e-12 {
            return Err(PatchError::DegenerateTemplate {
                reason: "zero variance",
            });
        }

        Ok(Self {
            width,
            height,
            mean: mean as f32,
            energy: energy as f32,
            zero_mean,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of template pixels.
    pub fn len(&self) -> usize {
        self.zero_mean.len()
    }

    /// Returns `true` if the plan holds no pixels (never for a built plan).
    pub fn is_empty(&self) -> bool {
        self.zero_mean.is_empty()
    }

    /// Returns the mean intensity of the template.
    pub fn mean(&self) -> f32 {
        self.mean
    }

    /// Returns `sum((T - mean(T))^2)`.
    pub fn energy(&self) -> f32 {
        self.energy
    }

    /// Returns the zero-mean template buffer in row-major order.
    pub fn zero_mean(&self) -> &[f32] {
        &self.zero_mean
    }
}

fn template_row<'a>(tpl: ImageView<'a, f32>, y: usize) -> PatchResult<&'a [f32]> {
    tpl.row(y).ok_or_else(|| {
        let needed = y
            .checked_mul(tpl.stride())
            .and_then(|v| v.checked_add(tpl.width()))
            .unwrap_or(usize::MAX);
        PatchError::BufferTooSmall {
            needed,
            got: tpl.as_slice().len(),
        }
    })
}
