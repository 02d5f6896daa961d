use eframe::egui::Color32;

use crate::color::element_color;
use crate::data::model::{element_symbol, CatalogLine, RadialVelocity, SpectrumDataset};
use crate::error::RenderError;

/// Speed of light in km/s, for wavelength offsets due to RV shifts.
pub const SPEED_OF_LIGHT: f64 = 299792.458;

/// Forbidden oxygen transition injected into the render-time catalog so it
/// can be labelled next to the blended Ni line, even when the physical
/// catalog omits it. Never written back to the dataset.
const O_LINE: (f64, &str, f64) = (6300.3038, "O 1", 0.2);

/// Half-width of the wavelength tolerance when resolving a mark request
/// against the catalog.
const MATCH_TOLERANCE: f64 = 0.005;

/// Minimum wavelength separation driving label overlap suppression.
const MIN_LINE_SEP: f64 = 0.02;

/// Top of the base y-range before any label headroom.
const Y_MAX_BASE: f64 = 1.05;

// ---------------------------------------------------------------------------
// Render configuration
// ---------------------------------------------------------------------------

/// Which part of the spectrum to render: a pre-partitioned segment, or an
/// explicit window. Per-segment radial velocities need a segment index, so
/// an explicit window carries one optionally; it is never inferred.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentTarget {
    Index(usize),
    Window {
        start: f64,
        end: f64,
        segment_index: Option<usize>,
    },
}

/// Pass-through styling. The core never interprets these; they ride along
/// on the result for the plotting layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotStyle {
    pub observed_color: Color32,
    pub observed_width: f32,
    pub model_color: Color32,
    pub model_width: f32,
    pub marker_width: f32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            observed_color: Color32::from_rgb(0x99, 0x99, 0x99),
            observed_width: 2.0,
            model_color: Color32::BLUE,
            model_width: 2.0,
            marker_width: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SegmentPlotConfig {
    pub target: SegmentTarget,
    /// (wavelength, species) requests to mark, resolved against the catalog.
    pub marked_lines: Vec<(f64, String)>,
    pub y_min: f64,
    pub show_model: bool,
    pub style: PlotStyle,
}

impl SegmentPlotConfig {
    pub fn for_segment(segment_index: usize) -> Self {
        Self {
            target: SegmentTarget::Index(segment_index),
            marked_lines: Vec::new(),
            y_min: 0.0,
            show_model: true,
            style: PlotStyle::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Render output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAlign {
    Center,
    /// Used when a line sits close enough to the previous label that a
    /// centered label would collide.
    Left,
}

/// One non-suppressed line marker: a vertical segment from `bottom` to
/// `top` at `wavelength`, with its label anchored at `text_y`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMark {
    pub wavelength: f64,
    pub species: String,
    pub color: Color32,
    pub align: LabelAlign,
    pub bottom: f64,
    pub top: f64,
    pub text_y: f64,
}

impl LineMark {
    /// Label text, e.g. "Fe 1 - 5171.596".
    pub fn label(&self) -> String {
        format!("{} - {:8.3}", self.species, self.wavelength)
    }
}

/// Everything the plotting layer needs to finish drawing one segment.
/// The core computes geometry; it rasterizes nothing.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// Requested wavelength window (x-axis limits).
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// Doppler-corrected wavelength axis over the resolved slice.
    pub display_wavelengths: Vec<f64>,
    pub observed: Vec<f64>,
    pub model: Vec<f64>,
    pub show_model: bool,
    pub marks: Vec<LineMark>,
    /// Mark requests that resolved to nothing within tolerance.
    pub unresolved: Vec<(f64, String)>,
    pub style: PlotStyle,
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Compute the display geometry for one segment: the Doppler-corrected
/// wavelength slice, the flux slices, and the laid-out line markers.
pub fn render_segment(
    dataset: &SpectrumDataset,
    config: &SegmentPlotConfig,
) -> Result<RenderResult, RenderError> {
    let (start, end, segment_index) = match config.target {
        SegmentTarget::Index(index) => {
            let &(s, e) = dataset.wavelength_ranges.get(index).ok_or(
                RenderError::SegmentOutOfBounds {
                    index,
                    len: dataset.wavelength_ranges.len(),
                },
            )?;
            (s, e, Some(index))
        }
        SegmentTarget::Window {
            start,
            end,
            segment_index,
        } => (start, end, segment_index),
    };

    // First axis sample at or past the window start, last at or before the
    // window end. Either side missing means the window is off the data.
    let axis = &dataset.wavelength_axis;
    let empty = RenderError::EmptyWindow { start, end };
    let beg = axis.iter().position(|&w| w >= start).ok_or(empty)?;
    let last = axis.iter().rposition(|&w| w <= end).ok_or(empty)?;
    if beg > last {
        return Err(empty);
    }

    let velocity = match &dataset.radial_velocity {
        RadialVelocity::Scalar(v) => *v,
        RadialVelocity::PerSegment(values) => {
            let index = segment_index.ok_or(RenderError::MissingSegmentIndex)?;
            *values.get(index).ok_or(RenderError::SegmentOutOfBounds {
                index,
                len: values.len(),
            })?
        }
    };
    let shift = 1.0 - velocity / SPEED_OF_LIGHT;

    let display_wavelengths: Vec<f64> = axis[beg..=last].iter().map(|&w| w * shift).collect();
    let observed = dataset.observed_flux[beg..=last].to_vec();
    let model = dataset.model_flux[beg..=last].to_vec();

    // Base y-range, with 30% headroom on top when labels are coming. The
    // layout bands are fractions of the base span, not the extended one.
    let span = Y_MAX_BASE - config.y_min;
    let mut y_max = Y_MAX_BASE;
    if !config.marked_lines.is_empty() {
        y_max += 0.3 * span;
    }
    let layout = LabelLayout {
        line_top: y_max - 0.30 * span,
        text_baseline: y_max - 0.30 * span + 0.02 * span,
        line_offset: 0.05 * span,
    };

    let (marks, unresolved) = resolve_marks(
        &dataset.line_catalog,
        &config.marked_lines,
        &display_wavelengths,
        &model,
        &layout,
    );

    Ok(RenderResult {
        x_range: (start, end),
        y_range: (config.y_min, y_max),
        display_wavelengths,
        observed,
        model,
        show_model: config.show_model,
        marks,
        unresolved,
        style: config.style.clone(),
    })
}

struct LabelLayout {
    line_top: f64,
    text_baseline: f64,
    /// Gap between the local model minimum and the marker bottom.
    line_offset: f64,
}

/// Resolve mark requests against a working copy of the catalog, then lay
/// out the survivors in wavelength order with overlap suppression.
fn resolve_marks(
    catalog: &[CatalogLine],
    requests: &[(f64, String)],
    display_wavelengths: &[f64],
    model: &[f64],
    layout: &LabelLayout,
) -> (Vec<LineMark>, Vec<(f64, String)>) {
    if requests.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let working = augmented_catalog(catalog);

    let mut resolved: Vec<&CatalogLine> = Vec::new();
    let mut unresolved: Vec<(f64, String)> = Vec::new();
    for (wave, species) in requests {
        let hit = working.iter().find(|l| {
            (l.center_wavelength - wave).abs() <= MATCH_TOLERANCE && l.species == *species
        });
        match hit {
            Some(line) => resolved.push(line),
            None => {
                log::warn!("no catalog line for {species} near {wave:.4}");
                unresolved.push((*wave, species.clone()));
            }
        }
    }

    // Suppression walks the resolved lines by wavelength, not request order.
    resolved.sort_by(|a, b| a.center_wavelength.total_cmp(&b.center_wavelength));

    let mut marks = Vec::new();
    let mut last_plotted = 0.0_f64;
    for line in resolved {
        let wave = line.center_wavelength;
        if wave <= last_plotted + 2.0 * MIN_LINE_SEP {
            continue;
        }
        let align = if wave <= last_plotted + 4.0 * MIN_LINE_SEP {
            LabelAlign::Left
        } else {
            LabelAlign::Center
        };
        last_plotted = wave;

        // Anchor the marker just above the model flux near the line. A line
        // with no display samples in reach claims its slot but draws nothing.
        let local_min = display_wavelengths
            .iter()
            .zip(model.iter())
            .filter(|(&x, _)| (x - wave).abs() <= MIN_LINE_SEP)
            .map(|(_, &y)| y)
            .fold(f64::INFINITY, f64::min);
        if !local_min.is_finite() {
            continue;
        }

        marks.push(LineMark {
            wavelength: wave,
            species: line.species.clone(),
            color: element_color(element_symbol(&line.species)),
            align,
            bottom: local_min + layout.line_offset,
            top: layout.line_top,
            text_y: layout.text_baseline,
        });
    }

    (marks, unresolved)
}

/// Working copy of the catalog with the synthetic oxygen line added,
/// sorted by wavelength.
fn augmented_catalog(catalog: &[CatalogLine]) -> Vec<CatalogLine> {
    let mut working = catalog.to_vec();
    working.push(CatalogLine {
        center_wavelength: O_LINE.0,
        species: O_LINE.1.to_string(),
        depth: O_LINE.2,
    });
    working.sort_by(|a, b| a.center_wavelength.total_cmp(&b.center_wavelength));
    working
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(wave: f64, species: &str, depth: f64) -> CatalogLine {
        CatalogLine {
            center_wavelength: wave,
            species: species.to_string(),
            depth,
        }
    }

    /// Dense axis around 5000 Å so every mark has local model samples.
    fn dataset() -> SpectrumDataset {
        let axis: Vec<f64> = (0..2000).map(|i| 4999.0 + i as f64 * 0.002).collect();
        let n = axis.len();
        SpectrumDataset {
            wavelength_ranges: vec![(4999.0, 5003.0)],
            wavelength_axis: axis,
            observed_flux: vec![0.95; n],
            model_flux: vec![0.9; n],
            radial_velocity: RadialVelocity::Scalar(0.0),
            line_catalog: vec![
                line(5000.000, "Fe 1", 0.5),
                line(5000.010, "Fe 1", 0.4),
                line(5000.050, "Ti 1", 0.6),
                line(5002.000, "Xx 1", 0.3),
            ],
        }
    }

    fn config(marks: Vec<(f64, String)>) -> SegmentPlotConfig {
        SegmentPlotConfig {
            marked_lines: marks,
            ..SegmentPlotConfig::for_segment(0)
        }
    }

    #[test]
    fn zero_velocity_leaves_axis_untouched() {
        let ds = dataset();
        let out = render_segment(&ds, &config(vec![])).unwrap();
        assert_eq!(out.display_wavelengths, ds.wavelength_axis);
        assert_eq!(out.observed.len(), out.display_wavelengths.len());
    }

    #[test]
    fn tenth_of_c_scales_axis_by_0_9() {
        let mut ds = dataset();
        ds.radial_velocity = RadialVelocity::Scalar(SPEED_OF_LIGHT / 10.0);
        let out = render_segment(&ds, &config(vec![])).unwrap();
        for (shifted, raw) in out.display_wavelengths.iter().zip(&ds.wavelength_axis) {
            assert!((shifted - raw * 0.9).abs() < 1e-9);
        }
    }

    #[test]
    fn per_segment_velocity_needs_an_index() {
        let mut ds = dataset();
        ds.radial_velocity = RadialVelocity::PerSegment(vec![10.0]);

        let mut cfg = config(vec![]);
        cfg.target = SegmentTarget::Window {
            start: 4999.5,
            end: 5001.0,
            segment_index: None,
        };
        assert_eq!(
            render_segment(&ds, &cfg).unwrap_err(),
            RenderError::MissingSegmentIndex
        );

        cfg.target = SegmentTarget::Window {
            start: 4999.5,
            end: 5001.0,
            segment_index: Some(0),
        };
        assert!(render_segment(&ds, &cfg).is_ok());
    }

    #[test]
    fn off_axis_window_is_an_empty_window_error() {
        let ds = dataset();
        let mut cfg = config(vec![]);
        cfg.target = SegmentTarget::Window {
            start: 1.0,
            end: 2.0,
            segment_index: None,
        };
        assert_eq!(
            render_segment(&ds, &cfg).unwrap_err(),
            RenderError::EmptyWindow {
                start: 1.0,
                end: 2.0
            }
        );
    }

    #[test]
    fn label_headroom_only_when_marks_requested() {
        let ds = dataset();
        let plain = render_segment(&ds, &config(vec![])).unwrap();
        assert_eq!(plain.y_range, (0.0, 1.05));

        let marked =
            render_segment(&ds, &config(vec![(5000.000, "Fe 1".to_string())])).unwrap();
        assert!((marked.y_range.1 - 1.365).abs() < 1e-12);
        let mark = &marked.marks[0];
        // Label line top sits 30% of the base span below the extended top.
        assert!((mark.top - (1.365 - 0.315)).abs() < 1e-12);
        assert!((mark.text_y - (mark.top + 0.021)).abs() < 1e-12);
        // Marker bottom floats 5% of the base span above the local model.
        assert!((mark.bottom - (0.9 + 0.0525)).abs() < 1e-12);
    }

    #[test]
    fn close_neighbours_are_suppressed_then_left_aligned() {
        let ds = dataset();
        let requests = vec![
            (5000.000, "Fe 1".to_string()),
            (5000.010, "Fe 1".to_string()),
            (5000.050, "Ti 1".to_string()),
        ];
        let out = render_segment(&ds, &config(requests)).unwrap();

        let plotted: Vec<(f64, LabelAlign)> = out
            .marks
            .iter()
            .map(|m| (m.wavelength, m.align))
            .collect();
        // 5000.010 is within 2*sep of 5000.000 and vanishes; 5000.050 lands
        // in the 2–4*sep band and keeps its label left-aligned.
        assert_eq!(
            plotted,
            vec![
                (5000.000, LabelAlign::Center),
                (5000.050, LabelAlign::Left)
            ]
        );
    }

    #[test]
    fn requests_resolve_within_tolerance_only() {
        let mut ds = dataset();
        ds.line_catalog = vec![line(4999.997, "Fe 1", 0.5)];
        let requests = vec![
            (5000.000, "Fe 1".to_string()), // 0.003 away: resolves
            (5000.010, "Fe 1".to_string()), // 0.013 away: miss
        ];
        let out = render_segment(&ds, &config(requests)).unwrap();

        assert_eq!(out.marks.len(), 1);
        assert_eq!(out.marks[0].wavelength, 4999.997);
        assert_eq!(out.unresolved, vec![(5000.010, "Fe 1".to_string())]);
    }

    #[test]
    fn species_must_match_exactly() {
        let ds = dataset();
        let out =
            render_segment(&ds, &config(vec![(5000.000, "Fe 2".to_string())])).unwrap();
        assert!(out.marks.is_empty());
        assert_eq!(out.unresolved.len(), 1);
    }

    #[test]
    fn synthetic_oxygen_line_is_markable() {
        let mut ds = dataset();
        // Axis spanning the oxygen transition; no O line in the catalog.
        ds.wavelength_axis = (0..2000).map(|i| 6299.0 + i as f64 * 0.002).collect();
        let n = ds.wavelength_axis.len();
        ds.observed_flux = vec![0.95; n];
        ds.model_flux = vec![0.9; n];
        ds.wavelength_ranges = vec![(6299.0, 6303.0)];

        let out =
            render_segment(&ds, &config(vec![(6300.3038, "O 1".to_string())])).unwrap();
        assert_eq!(out.marks.len(), 1);
        assert_eq!(out.marks[0].species, "O 1");
        // Working-copy augmentation never leaks into the dataset.
        assert!(ds.line_catalog.iter().all(|l| l.species != "O 1"));
    }

    #[test]
    fn unknown_species_get_the_neutral_color() {
        let ds = dataset();
        let out =
            render_segment(&ds, &config(vec![(5002.000, "Xx 1".to_string())])).unwrap();
        assert_eq!(out.marks[0].color, crate::color::tableau(14));
    }
}
