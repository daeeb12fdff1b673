//! Candidate detection and scoring.
//!
//! Local maxima of the correlation map become candidates; their scores are
//! normalized for presentation and candidates whose patch window would leave
//! the image are flagged by the border filter.

pub mod border;
pub mod maxima;
pub mod normalize;
pub mod peak;

pub use border::PatchExtent;
pub use maxima::find_local_maxima;
pub use normalize::{normalize_scores, ScoreSet};
pub use peak::Peak;
