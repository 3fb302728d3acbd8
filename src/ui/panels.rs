use std::path::Path;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use seqclust_explorer::data::{export, filter::PROPERTY_COLUMNS, loader};
use seqclust_explorer::state::{AppState, View};

/// Columns with more distinct values than this (names, articles, links) get
/// no checkbox list.
const MAX_FILTER_VALUES: usize = 40;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let catalog = match &state.catalog {
        Some(cat) => cat,
        None => {
            ui.label("No catalogue loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the loop.
    let columns: Vec<String> = catalog
        .column_names
        .iter()
        .filter(|c| !PROPERTY_COLUMNS.contains(&c.as_str()))
        .cloned()
        .collect();
    let properties: Vec<&str> = PROPERTY_COLUMNS
        .iter()
        .copied()
        .filter(|p| catalog.has_column(p))
        .collect();
    let unique = catalog.unique_values.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Search ----
            ui.strong("Search");
            if ui
                .text_edit_singleline(&mut state.filters.search)
                .changed()
            {
                state.refilter();
            }
            ui.separator();

            // ---- Required properties ----
            if !properties.is_empty() {
                ui.strong("Must support");
                for prop in &properties {
                    let mut checked = state.filters.required_properties.contains(*prop);
                    if ui.checkbox(&mut checked, *prop).changed() {
                        state.toggle_property(prop);
                    }
                }
                ui.separator();
            }

            // ---- Colour-by selector ----
            ui.strong("Color cards by");
            let current_color_col = state.color_column.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("color_by")
                .selected_text(&current_color_col)
                .show_ui(ui, |ui: &mut Ui| {
                    for col in &columns {
                        if ui
                            .selectable_label(current_color_col == *col, col)
                            .clicked()
                        {
                            state.set_color_column(col.clone());
                        }
                    }
                });
            ui.separator();

            // ---- Per-column filter widgets (collapsible) ----
            for col in &columns {
                let Some(all_values) = unique.get(col) else {
                    continue;
                };
                if all_values.len() > MAX_FILTER_VALUES {
                    continue;
                }

                let selected = state.filters.columns.entry(col.clone()).or_default();

                // Show count of selected / total in the header
                let n_selected = selected.len();
                let n_total = all_values.len();
                let header_text = format!("{col}  ({n_selected}/{n_total})");

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        // Select all / none buttons
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(col);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(col);
                            }
                        });

                        // Re-borrow after potential mutation from All/None
                        let selected = state.filters.columns.entry(col.clone()).or_default();

                        for val in all_values {
                            let mut text = RichText::new(val.to_string());
                            if state.color_column.as_deref() == Some(col.as_str()) {
                                if let Some(cm) = &state.color_map {
                                    text = text.color(cm.color_for(val));
                                }
                            }

                            let mut checked = selected.contains(val);
                            if ui.checkbox(&mut checked, text).changed() {
                                if checked {
                                    selected.insert(val.clone());
                                } else {
                                    selected.remove(val);
                                }
                            }
                        }
                    });
            }
        });

    // Recompute visible indices after any checkbox changes.
    state.refilter();
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
            let has_catalog = state.catalog.is_some();
            if ui
                .add_enabled(has_catalog, egui::Button::new("Export methods (CSV)…"))
                .clicked()
            {
                export_csv_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(has_catalog, egui::Button::new("Export Sankey (HTML)…"))
                .clicked()
            {
                export_sankey_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.view, View::Methods, "Methods");
        ui.selectable_value(&mut state.view, View::Sankey, "Sankey");

        ui.separator();

        if let Some(cat) = &state.catalog {
            ui.label(format!(
                "{} methods loaded, {} visible",
                cat.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

/// Load a catalogue into the state, reporting failures in the status line.
pub fn load_catalog(state: &mut AppState, path: &Path) {
    match loader::load_file(path) {
        Ok(catalog) => {
            log::info!(
                "Loaded {} methods with columns {:?}",
                catalog.len(),
                catalog.column_names
            );
            state.set_catalog(catalog);
        }
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open methods catalogue")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        load_catalog(state, &path);
    }
}

fn export_csv_dialog(state: &mut AppState) {
    let Some(catalog) = &state.catalog else {
        return;
    };
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export visible methods")
        .set_file_name("methods.csv")
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };

    if let Err(e) = export::save_csv(&path, catalog, &state.visible_indices) {
        log::error!("CSV export failed: {e:#}");
        state.status_message = Some(format!("Error: {e:#}"));
    }
}

fn export_sankey_dialog(state: &mut AppState) {
    let output = match state.sankey() {
        Some(Ok(output)) => output,
        Some(Err(e)) => {
            log::error!("Sankey diagram unavailable: {e}");
            state.status_message = Some(format!("Error: {e}"));
            return;
        }
        None => return,
    };
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save Sankey diagram")
        .set_file_name("sankey.html")
        .add_filter("HTML", &["html"])
        .save_file()
    else {
        return;
    };

    if let Err(e) = export::save_sankey_html(&path, &output.html) {
        log::error!("Sankey export failed: {e:#}");
        state.status_message = Some(format!("Error: {e:#}"));
    }
}
