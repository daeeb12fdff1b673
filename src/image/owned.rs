//! Owned contiguous single-channel image buffers.

use crate::image::ImageView;
use crate::util::{PatchError, PatchResult};

/// Owned contiguous image buffer with `stride == width`.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> OwnedImage<T> {
    /// Wraps a row-major buffer holding exactly `width * height` pixels.
    pub fn new(data: Vec<T>, width: usize, height: usize) -> PatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(PatchError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(PatchError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(PatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(PatchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major pixel buffer.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x)
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, T> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Builds an image whose buffer length is already known to match.
    pub(crate) fn from_parts(data: Vec<T>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }

    pub(crate) fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Copy> OwnedImage<T> {
    /// Creates an image with every pixel set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> PatchResult<Self> {
        let len = width
            .checked_mul(height)
            .ok_or(PatchError::InvalidDimensions { width, height })?;
        Self::new(vec![value; len], width, height)
    }
}
