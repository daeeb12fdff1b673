//! Multi-channel floating point rasters normalized to `[0, 1]`.

use crate::image::OwnedImage;
use crate::template::Region;
use crate::util::{PatchError, PatchResult};

/// Maximum supported channel count (gray, gray+alpha, RGB, RGBA).
pub const MAX_CHANNELS: usize = 4;

/// Owned interleaved raster with `channels` samples per pixel.
///
/// Samples are expected in `[0, 1]`. The raster is the full-resolution source
/// that patches are cropped from; matching runs on its grayscale mean.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    data: Vec<f32>,
    width: usize,
    height: usize,
    channels: usize,
}

impl Raster {
    /// Wraps an interleaved row-major buffer.
    pub fn new(data: Vec<f32>, width: usize, height: usize, channels: usize) -> PatchResult<Self> {
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(PatchError::InvalidChannels { channels });
        }
        if width == 0 || height == 0 {
            return Err(PatchError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(channels))
            .ok_or(PatchError::InvalidDimensions { width, height })?;
        if data.len() != needed {
            return Err(PatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Builds a raster from 8-bit samples, scaling them to `[0, 1]`.
    pub fn from_u8(data: &[u8], width: usize, height: usize, channels: usize) -> PatchResult<Self> {
        let scaled = data.iter().map(|&v| f32::from(v) / 255.0).collect();
        Self::new(scaled, width, height, channels)
    }

    /// Wraps a single-channel image as a one-channel raster.
    pub fn from_gray(gray: OwnedImage<f32>) -> Self {
        let width = gray.width();
        let height = gray.height();
        Self {
            data: gray.into_vec(),
            width,
            height,
            channels: 1,
        }
    }

    /// Returns the raster width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the raster height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of interleaved channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the interleaved sample buffer.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns the samples of pixel `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[f32]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y * self.width + x) * self.channels;
        self.data.get(start..start + self.channels)
    }

    /// Unweighted mean over channels.
    pub fn to_gray(&self) -> OwnedImage<f32> {
        let inv = 1.0 / self.channels as f32;
        let gray: Vec<f32> = self
            .data
            .chunks_exact(self.channels)
            .map(|px| px.iter().sum::<f32>() * inv)
            .collect();
        OwnedImage::from_parts(gray, self.width, self.height)
    }

    /// Copies a rectangle of all channels into a new raster.
    pub fn crop(&self, region: Region) -> PatchResult<Raster> {
        region.check_within(self.width, self.height)?;
        let row_len = region.width * self.channels;
        let mut data = Vec::with_capacity(row_len * region.height);
        for y in region.y..region.y + region.height {
            let start = (y * self.width + region.x) * self.channels;
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        Raster::new(data, region.width, region.height, self.channels)
    }
}
