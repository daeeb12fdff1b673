//! File names for exported patches.

use crate::patch::Patch;
use std::fmt;
use std::str::FromStr;

/// Class label attached to a batch of exported patches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassTag {
    Positive,
    Negative,
    Ambiguous,
    Background,
}

impl ClassTag {
    /// All tags in display order.
    pub const ALL: [ClassTag; 4] = [
        ClassTag::Positive,
        ClassTag::Negative,
        ClassTag::Ambiguous,
        ClassTag::Background,
    ];

    /// Returns the lowercase tag used in file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassTag::Positive => "positive",
            ClassTag::Negative => "negative",
            ClassTag::Ambiguous => "ambiguous",
            ClassTag::Background => "background",
        }
    }
}

impl fmt::Display for ClassTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClassTag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown class tag `{s}`"))
    }
}

/// `{base}_{tag}_{rank:04}_x{x}_y{y}_s{score:.3}.png`
pub fn patch_file_name(base: &str, tag: ClassTag, patch: &Patch) -> String {
    format!(
        "{base}_{tag}_{:04}_x{}_y{}_s{:.3}.png",
        patch.rank, patch.x, patch.y, patch.score
    )
}
