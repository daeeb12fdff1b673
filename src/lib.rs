//! patchpick extracts fixed-size image patches around points that look like
//! a user-selected template.
//!
//! The pipeline correlates a grayscale template with the image (NXCC), keeps
//! sliding-window local maxima as candidate centers, normalizes their scores,
//! flags candidates whose patch would leave the image, and lets a UI edit the
//! selection through [`SelectionState`] before [`extract_patches`] crops the
//! final patches from the full-resolution raster. Optional parallelism via
//! the `rayon` feature, SIMD kernels via `simd`, file I/O via `image-io`.

pub mod candidate;
pub mod correlation;
pub mod detect;
pub mod image;
pub mod kernel;
pub mod patch;
pub mod selection;
pub mod template;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;
pub use crate::image::{ImageView, OwnedImage, Raster};
pub use kernel::{Kernel, ScanParams};
pub use template::{Region, Template, TemplatePlan};
pub use util::{PatchError, PatchResult};

pub use candidate::{find_local_maxima, normalize_scores, PatchExtent, Peak, ScoreSet};
pub use correlation::{correlate, CorrelationMap};
pub use detect::{DetectConfig, Detection, Detector};
pub use patch::{extract_patches, patch_file_name, ClassTag, Patch};
pub use selection::{Candidate, Change, Command, SelectionState};
