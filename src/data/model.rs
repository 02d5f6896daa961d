use std::fmt;

// ---------------------------------------------------------------------------
// CatalogLine – one entry of the atomic/molecular line catalog
// ---------------------------------------------------------------------------

/// A single known absorption line: rest-frame center wavelength (Å),
/// species identifier ("Element IonizationState", e.g. "Fe 1"), and
/// line depth in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogLine {
    pub center_wavelength: f64,
    pub species: String,
    pub depth: f64,
}

impl fmt::Display for CatalogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {:.4}", self.species, self.center_wavelength)
    }
}

// ---------------------------------------------------------------------------
// RadialVelocity – scalar or one value per segment
// ---------------------------------------------------------------------------

/// Line-of-sight velocity in km/s. A scalar applies to every segment;
/// the per-segment form is indexed by segment number.
#[derive(Debug, Clone, PartialEq)]
pub enum RadialVelocity {
    Scalar(f64),
    PerSegment(Vec<f64>),
}

// ---------------------------------------------------------------------------
// SpectrumDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// One loaded spectrum with its model, segment partition and line catalog.
/// Treated as read-only for the lifetime of all queries and renders.
#[derive(Debug, Clone)]
pub struct SpectrumDataset {
    /// (start, end) wavelength of each segment, in load order.
    pub wavelength_ranges: Vec<(f64, f64)>,
    /// Global wavelength axis, monotonically non-decreasing.
    pub wavelength_axis: Vec<f64>,
    /// Observed residual intensity, same length as `wavelength_axis`.
    pub observed_flux: Vec<f64>,
    /// Synthetic model intensity, same length as `wavelength_axis`.
    pub model_flux: Vec<f64>,
    pub radial_velocity: RadialVelocity,
    pub line_catalog: Vec<CatalogLine>,
}

impl SpectrumDataset {
    /// Number of wavelength segments.
    pub fn segment_count(&self) -> usize {
        self.wavelength_ranges.len()
    }

    /// Sorted list of the distinct species present in the catalog.
    pub fn species_list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .line_catalog
            .iter()
            .map(|l| l.species.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

// ---------------------------------------------------------------------------
// Species parsing
// ---------------------------------------------------------------------------

/// Extract the element (or molecule) symbol from a species string:
/// the leading alphabetic run plus an optional digit run, ignoring the
/// ionization field. "Fe 1" → "Fe", "C2 1" → "C2", "MgH 1" → "MgH".
pub fn element_symbol(species: &str) -> &str {
    let bytes = species.as_bytes();
    let mut end = 0;
    while end < bytes.len() && bytes[end].is_ascii_alphabetic() {
        end += 1;
    }
    let letters = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    // A digit run only counts when glued to the letters (molecules like C2),
    // not the space-separated ionization state.
    if letters == 0 {
        ""
    } else {
        &species[..end]
    }
}
