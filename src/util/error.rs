//! Error types for patchpick.

use thiserror::Error;

/// Result alias for patchpick operations.
pub type PatchResult<T> = std::result::Result<T, PatchError>;

/// Errors that can occur while detecting candidates or extracting patches.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PatchError {
    /// Width or height is zero, or the pixel count overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the declared layout requires.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A rectangle does not fit inside the image.
    #[error(
        "roi {width}x{height} at ({x}, {y}) is outside the {img_width}x{img_height} image"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Raster channel count is not supported.
    #[error("unsupported channel count: {channels}")]
    InvalidChannels { channels: usize },
    /// Template side is below the minimum of three pixels.
    #[error("template {width}x{height} is too small (minimum 3x3)")]
    TemplateTooSmall { width: usize, height: usize },
    /// Template does not fit inside the image.
    #[error("template {tpl_width}x{tpl_height} is larger than the {img_width}x{img_height} image")]
    TemplateTooLarge {
        tpl_width: usize,
        tpl_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Template statistics make correlation undefined.
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// The correlation map produced no candidates.
    #[error("no candidates found: reselect the template")]
    NoCandidates,
    /// Nothing is included in the current selection.
    #[error("no candidates selected: lower the threshold or reselect the template")]
    EmptySelection,
    /// An index is out of range for the addressed collection.
    #[error("{context} index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        context: &'static str,
    },
    /// A drag update or commit arrived without a matching `begin_drag`.
    #[error("no drag in progress for candidate {index}")]
    DragNotStarted { index: usize },
    /// Internal state broke one of its invariants.
    #[error("invariant violated: {reason}")]
    InvariantViolation { reason: String },
    /// Image decoding or encoding failed.
    #[error("image io failed: {reason}")]
    ImageIo { reason: String },
    /// Filesystem access failed.
    #[error("io failed for {path}: {reason}")]
    Io { path: String, reason: String },
}
