use thiserror::Error;

// ---------------------------------------------------------------------------
// Typed failures of the query / render core
// ---------------------------------------------------------------------------

/// Structural failures that abort a whole query or render call.
/// Per-line resolution misses are not errors; they are collected on the
/// render result and the rest of the segment still renders.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum RenderError {
    #[error("segment index {index} out of bounds ({len} segments)")]
    SegmentOutOfBounds { index: usize, len: usize },

    #[error("wavelength window [{start}, {end}] has no overlap with the spectrum axis")]
    EmptyWindow { start: f64, end: f64 },

    #[error("per-segment radial velocities require a segment index")]
    MissingSegmentIndex,
}
