use std::collections::BTreeSet;

use super::model::SpectrumDataset;
use crate::error::RenderError;

/// Depth threshold below which lines are not worth labelling.
pub const DEFAULT_MIN_DEPTH: f64 = 0.25;

// ---------------------------------------------------------------------------
// Per-segment line counts
// ---------------------------------------------------------------------------

/// Count how many neutral lines of `element` (species exactly "{element} 1")
/// fall strictly inside each segment's wavelength range.
///
/// One count per entry of `wavelength_ranges`, in the same order. An element
/// with no catalog entries at all yields the all-zero vector, not an error.
pub fn count_lines_per_segment(dataset: &SpectrumDataset, element: &str) -> Vec<usize> {
    let neutral = format!("{element} 1");
    let waves: Vec<f64> = dataset
        .line_catalog
        .iter()
        .filter(|l| l.species == neutral)
        .map(|l| l.center_wavelength)
        .collect();

    dataset
        .wavelength_ranges
        .iter()
        .map(|&(start, end)| waves.iter().filter(|&&w| w > start && w < end).count())
        .collect()
}

// ---------------------------------------------------------------------------
// Line selection for marking
// ---------------------------------------------------------------------------

/// Return the (wavelength, species) pairs of catalog lines inside segment
/// `segment_index` that are deep enough to label and whose species is in
/// `species_set` (exact string match).
///
/// The window test is inclusive on both ends, unlike the strict interior
/// test of [`count_lines_per_segment`]: this picks displayable lines, not
/// segment-membership statistics. Output preserves catalog order.
pub fn select_lines(
    dataset: &SpectrumDataset,
    segment_index: usize,
    species_set: &BTreeSet<String>,
    min_depth: f64,
) -> Result<Vec<(f64, String)>, RenderError> {
    let &(start, end) = dataset.wavelength_ranges.get(segment_index).ok_or(
        RenderError::SegmentOutOfBounds {
            index: segment_index,
            len: dataset.wavelength_ranges.len(),
        },
    )?;

    Ok(dataset
        .line_catalog
        .iter()
        .filter(|l| {
            l.center_wavelength >= start
                && l.center_wavelength <= end
                && l.depth >= min_depth
                && species_set.contains(&l.species)
        })
        .map(|l| (l.center_wavelength, l.species.clone()))
        .collect())
}
