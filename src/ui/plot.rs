use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Line, Plot, PlotPoints, Text};

use crate::data::lines::select_lines;
use crate::render::{
    render_segment, LabelAlign, RenderResult, SegmentPlotConfig, SegmentTarget,
};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Segment plot (central panel)
// ---------------------------------------------------------------------------

/// Render the current segment in the central panel.
pub fn segment_plot(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a spectrum to view segments  (File → Open…)");
            });
            return;
        }
    };

    let marked_lines = match select_lines(
        dataset,
        state.segment,
        &state.marked_species,
        state.min_depth,
    ) {
        Ok(lines) => lines,
        Err(e) => {
            ui.colored_label(Color32::RED, e.to_string());
            return;
        }
    };

    let mut config = SegmentPlotConfig::for_segment(state.segment);
    if let Some((start, end)) = state.custom_window {
        config.target = SegmentTarget::Window {
            start,
            end,
            segment_index: Some(state.segment),
        };
    }
    config.marked_lines = marked_lines;
    config.y_min = state.y_min;
    config.show_model = state.show_model;

    match render_segment(dataset, &config) {
        Ok(result) => {
            if !result.unresolved.is_empty() {
                let misses: Vec<String> = result
                    .unresolved
                    .iter()
                    .map(|(wave, species)| format!("{species} @ {wave:.3}"))
                    .collect();
                ui.colored_label(
                    Color32::YELLOW,
                    format!("Not found in catalog: {}", misses.join(", ")),
                );
            }
            draw_result(ui, &result);
        }
        Err(e) => {
            ui.colored_label(Color32::RED, e.to_string());
        }
    }
}

/// Turn a [`RenderResult`] into egui_plot primitives.
fn draw_result(ui: &mut Ui, result: &RenderResult) {
    let style = &result.style;

    Plot::new("segment_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label("Wavelength")
        .y_axis_label("Residual Intensity")
        .x_axis_formatter(|mark, _range| format!("{:6.1}", mark.value))
        .include_x(result.x_range.0)
        .include_x(result.x_range.1)
        .include_y(result.y_range.0)
        .include_y(result.y_range.1)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let observed: PlotPoints = result
                .display_wavelengths
                .iter()
                .zip(result.observed.iter())
                .map(|(&x, &y)| [x, y])
                .collect();
            plot_ui.line(
                Line::new(observed)
                    .name("Observed")
                    .color(style.observed_color)
                    .width(style.observed_width),
            );

            if result.show_model {
                let model: PlotPoints = result
                    .display_wavelengths
                    .iter()
                    .zip(result.model.iter())
                    .map(|(&x, &y)| [x, y])
                    .collect();
                plot_ui.line(
                    Line::new(model)
                        .name("Model")
                        .color(style.model_color)
                        .width(style.model_width),
                );
            }

            for mark in &result.marks {
                let marker = Line::new(PlotPoints::from(vec![
                    [mark.wavelength, mark.bottom],
                    [mark.wavelength, mark.top],
                ]))
                .color(mark.color)
                .width(style.marker_width);
                plot_ui.line(marker);

                let anchor = match mark.align {
                    LabelAlign::Center => Align2::CENTER_BOTTOM,
                    LabelAlign::Left => Align2::LEFT_BOTTOM,
                };
                let label = Text::new(
                    [mark.wavelength, mark.text_y].into(),
                    RichText::new(mark.label())
                        .size(12.0)
                        .strong()
                        .color(mark.color),
                )
                .anchor(anchor);
                plot_ui.text(label);
            }
        });
}
