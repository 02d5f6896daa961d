use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::element_color;
use crate::data::model::element_symbol;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – segment and line controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Segments & Lines");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No spectrum loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the loop.
    let ranges = dataset.wavelength_ranges.clone();
    let species_options = state.species_options.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Segment selector ----
            ui.strong("Segment");
            let current = state.segment;
            egui::ComboBox::from_id_salt("segment_select")
                .selected_text(segment_label(current, ranges.get(current)))
                .show_ui(ui, |ui: &mut Ui| {
                    for (idx, range) in ranges.iter().enumerate() {
                        if ui
                            .selectable_label(current == idx, segment_label(idx, Some(range)))
                            .clicked()
                        {
                            state.set_segment(idx);
                        }
                    }
                });
            // ---- Custom window override ----
            let mut use_window = state.custom_window.is_some();
            if ui.checkbox(&mut use_window, "Custom window").changed() {
                state.custom_window = if use_window {
                    ranges.get(state.segment).copied()
                } else {
                    None
                };
            }
            if let Some((mut start, mut end)) = state.custom_window {
                ui.horizontal(|ui: &mut Ui| {
                    ui.add(egui::DragValue::new(&mut start).speed(0.1));
                    ui.label("–");
                    ui.add(egui::DragValue::new(&mut end).speed(0.1));
                });
                state.custom_window = Some((start, end));
            }
            ui.separator();

            // ---- Species to mark ----
            ui.strong("Mark lines");
            ui.add(
                egui::Slider::new(&mut state.min_depth, 0.0..=1.0)
                    .text("min depth")
                    .fixed_decimals(2),
            );
            ui.horizontal(|ui: &mut Ui| {
                ui.label("y min");
                ui.add(egui::DragValue::new(&mut state.y_min).speed(0.05));
            });
            for species in &species_options {
                let color = element_color(element_symbol(species));
                let is_marked = state.marked_species.contains(species);
                let mut checked = is_marked;
                if ui
                    .checkbox(&mut checked, RichText::new(species).color(color))
                    .changed()
                {
                    state.toggle_species(species);
                }
            }
            ui.separator();

            // ---- Per-segment line counts ----
            ui.strong("Lines per segment");
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Element");
                let mut element = state.count_element.clone();
                if ui.text_edit_singleline(&mut element).changed() {
                    state.set_count_element(element);
                }
            });
            let counts = state.segment_counts.clone();
            for (idx, count) in counts.iter().enumerate() {
                if *count == 0 {
                    continue;
                }
                // Jump straight to a segment that has lines of interest.
                if ui
                    .small_button(format!("seg {idx}: {count} lines"))
                    .clicked()
                {
                    state.set_segment(idx);
                }
            }
        });
}

fn segment_label(idx: usize, range: Option<&(f64, f64)>) -> String {
    match range {
        Some((start, end)) => format!("{idx}: {start:.1} – {end:.1} Å"),
        None => format!("{idx}"),
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} segments, {} catalog lines",
                ds.segment_count(),
                ds.line_catalog.len()
            ));
        }

        ui.separator();

        if ui
            .selectable_label(state.show_model, "Show Model")
            .clicked()
        {
            state.show_model = !state.show_model;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open spectrum")
        .add_filter("Exported spectrum", &["json"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded spectrum: {} segments, {} axis points, {} catalog lines",
                    dataset.segment_count(),
                    dataset.wavelength_axis.len(),
                    dataset.line_catalog.len()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
