use std::collections::BTreeSet;

use crate::data::lines::{count_lines_per_segment, DEFAULT_MIN_DEPTH};
use crate::data::model::SpectrumDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<SpectrumDataset>,

    /// Segment currently on display.
    pub segment: usize,

    /// Explicit wavelength window overriding the segment's own range.
    pub custom_window: Option<(f64, f64)>,

    /// Distinct species in the catalog (cached for the side panel).
    pub species_options: Vec<String>,

    /// Species whose lines get marked on the plot.
    pub marked_species: BTreeSet<String>,

    /// Depth cut for markable lines.
    pub min_depth: f64,

    /// Bottom of the y-axis.
    pub y_min: f64,

    /// Whether the model curve is drawn.
    pub show_model: bool,

    /// Element whose per-segment line counts are shown in the side panel.
    pub count_element: String,

    /// Cached per-segment counts for `count_element`.
    pub segment_counts: Vec<usize>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            segment: 0,
            custom_window: None,
            species_options: Vec::new(),
            marked_species: BTreeSet::new(),
            min_depth: DEFAULT_MIN_DEPTH,
            y_min: 0.0,
            show_model: true,
            count_element: "Fe".to_string(),
            segment_counts: Vec::new(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset, reset selections and caches.
    pub fn set_dataset(&mut self, dataset: SpectrumDataset) {
        self.segment = 0;
        self.custom_window = None;
        self.species_options = dataset.species_list();
        self.marked_species.clear();
        self.segment_counts = count_lines_per_segment(&dataset, &self.count_element);
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Switch the displayed segment, clamped to the dataset. Dropping any
    /// custom window: it belonged to the previous segment.
    pub fn set_segment(&mut self, segment: usize) {
        if let Some(ds) = &self.dataset {
            self.segment = segment.min(ds.segment_count().saturating_sub(1));
            self.custom_window = None;
        }
    }

    /// Toggle whether a species is marked on the plot.
    pub fn toggle_species(&mut self, species: &str) {
        if !self.marked_species.remove(species) {
            self.marked_species.insert(species.to_string());
        }
    }

    /// Change the element of the per-segment counts and recount.
    pub fn set_count_element(&mut self, element: String) {
        self.count_element = element;
        self.recount();
    }

    /// Recompute `segment_counts` against the current dataset.
    pub fn recount(&mut self) {
        if let Some(ds) = &self.dataset {
            self.segment_counts = count_lines_per_segment(ds, &self.count_element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CatalogLine, RadialVelocity};

    fn dataset() -> SpectrumDataset {
        SpectrumDataset {
            wavelength_ranges: vec![(5000.0, 5100.0), (5100.0, 5200.0)],
            wavelength_axis: vec![5000.0, 5100.0, 5200.0],
            observed_flux: vec![1.0; 3],
            model_flux: vec![1.0; 3],
            radial_velocity: RadialVelocity::Scalar(0.0),
            line_catalog: vec![CatalogLine {
                center_wavelength: 5050.0,
                species: "Fe 1".to_string(),
                depth: 0.5,
            }],
        }
    }

    #[test]
    fn loading_a_dataset_resets_selection_and_counts() {
        let mut state = AppState::default();
        state.segment = 5;
        state.set_dataset(dataset());
        assert_eq!(state.segment, 0);
        assert_eq!(state.species_options, vec!["Fe 1".to_string()]);
        assert_eq!(state.segment_counts, vec![1, 0]);
    }

    #[test]
    fn segment_selection_is_clamped() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.set_segment(99);
        assert_eq!(state.segment, 1);
    }

    #[test]
    fn species_toggle_round_trips() {
        let mut state = AppState::default();
        state.toggle_species("Fe 1");
        assert!(state.marked_species.contains("Fe 1"));
        state.toggle_species("Fe 1");
        assert!(state.marked_species.is_empty());
    }
}
