//! Writing extracted patches to disk (feature `image-io`).

use crate::image::io::save_raster;
use crate::patch::{patch_file_name, ClassTag, Patch};
use crate::trace::{trace_event, trace_span};
use crate::util::{PatchError, PatchResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes one PNG per patch into `dir`, creating it if needed.
///
/// Files are named with [`patch_file_name`]. The first failure aborts the
/// export; files already written are left in place.
pub fn write_patches<P: AsRef<Path>>(
    dir: P,
    base: &str,
    tag: ClassTag,
    patches: &[Patch],
) -> PatchResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let _span = trace_span!("write_patches", count = patches.len()).entered();

    fs::create_dir_all(dir).map_err(|err| PatchError::Io {
        path: dir.display().to_string(),
        reason: err.to_string(),
    })?;

    let mut written = Vec::with_capacity(patches.len());
    for patch in patches {
        let path = dir.join(patch_file_name(base, tag, patch));
        save_raster(&patch.raster, &path)?;
        trace_event!("patch_written", rank = patch.rank, total = patches.len());
        written.push(path);
    }
    Ok(written)
}
