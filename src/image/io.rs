//! Convenience helpers for loading and saving rasters via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Integer samples are
//! normalized to `[0, 1]` on load; alpha channels are dropped.

use crate::image::Raster;
use crate::util::{PatchError, PatchResult};
use image::{DynamicImage, ImageBuffer, Luma, LumaA, Rgb, Rgba};
use std::path::Path;

/// Converts a decoded image into a gray or RGB raster.
pub fn raster_from_dynamic(img: &DynamicImage) -> PatchResult<Raster> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    if img.color().has_color() {
        let rgb = img.to_rgb32f();
        Raster::new(rgb.into_raw(), width, height, 3)
    } else {
        let gray = img.to_luma32f();
        Raster::new(gray.into_raw(), width, height, 1)
    }
}

/// Converts a raster into an 8-bit image, clamping samples to `[0, 1]`.
pub fn raster_to_dynamic(raster: &Raster) -> PatchResult<DynamicImage> {
    let width = raster.width() as u32;
    let height = raster.height() as u32;
    let bytes: Vec<u8> = raster
        .data()
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();
    let buffer_err = || PatchError::ImageIo {
        reason: format!("cannot build {width}x{height} image buffer"),
    };
    let img = match raster.channels() {
        1 => DynamicImage::ImageLuma8(
            ImageBuffer::<Luma<u8>, _>::from_raw(width, height, bytes).ok_or_else(buffer_err)?,
        ),
        2 => DynamicImage::ImageLumaA8(
            ImageBuffer::<LumaA<u8>, _>::from_raw(width, height, bytes).ok_or_else(buffer_err)?,
        ),
        3 => DynamicImage::ImageRgb8(
            ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, bytes).ok_or_else(buffer_err)?,
        ),
        4 => DynamicImage::ImageRgba8(
            ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, bytes).ok_or_else(buffer_err)?,
        ),
        channels => return Err(PatchError::InvalidChannels { channels }),
    };
    Ok(img)
}

/// Loads an image from disk as a normalized raster.
pub fn load_raster<P: AsRef<Path>>(path: P) -> PatchResult<Raster> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| PatchError::ImageIo {
        reason: format!("{}: {err}", path.display()),
    })?;
    raster_from_dynamic(&img)
}

/// Writes a raster to disk; the format follows the file extension.
pub fn save_raster<P: AsRef<Path>>(raster: &Raster, path: P) -> PatchResult<()> {
    let path = path.as_ref();
    let img = raster_to_dynamic(raster)?;
    img.save(path).map_err(|err| PatchError::ImageIo {
        reason: format!("{}: {err}", path.display()),
    })
}
