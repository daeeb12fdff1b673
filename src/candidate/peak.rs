//! Correlation peaks.

/// Local maximum of the correlation map in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// X coordinate (column) of the window center.
    pub x: usize,
    /// Y coordinate (row) of the window center.
    pub y: usize,
    /// NXCC score at the peak location.
    pub score: f32,
}
