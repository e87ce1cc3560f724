use eframe::egui::{self, Color32, RichText, ScrollArea, Sense, Ui};

use crate::color::ColorMap;
use crate::data::writer::{save_csv, CellFormat};
use crate::render::save_png;
use crate::state::AppState;

/// Pixels per cell when exporting from the UI.
const EXPORT_PNG_SCALE: u32 = 8;

const COLORBAR_STEPS: usize = 64;

// ---------------------------------------------------------------------------
// Left side panel – colour controls and readouts
// ---------------------------------------------------------------------------

/// Render the left panel: colour map, limits, colour bar, statistics.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Colour");
    ui.separator();

    if state.matrix.is_none() {
        ui.label("No matrix loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Colour map selector ----
            ui.strong("Colour map");
            egui::ComboBox::from_id_salt("color_map")
                .selected_text(state.color_map.name())
                .show_ui(ui, |ui: &mut Ui| {
                    for cm in ColorMap::ALL {
                        if ui
                            .selectable_label(state.color_map == cm, cm.name())
                            .clicked()
                        {
                            state.set_color_map(cm);
                        }
                    }
                });
            ui.separator();

            // ---- Limits ----
            let mut auto = state.auto_limits;
            if ui.checkbox(&mut auto, "Auto limits").changed() {
                state.set_auto_limits(auto);
            }

            let mut vmin = state.limits.vmin;
            let mut vmax = state.limits.vmax;
            let speed = ((vmax - vmin).abs() / 200.0).max(1e-3);
            let mut changed = false;
            ui.horizontal(|ui: &mut Ui| {
                ui.label("vmax");
                changed |= ui
                    .add(egui::DragValue::new(&mut vmax).speed(speed))
                    .changed();
            });
            ui.horizontal(|ui: &mut Ui| {
                ui.label("vmin");
                changed |= ui
                    .add(egui::DragValue::new(&mut vmin).speed(speed))
                    .changed();
            });
            if changed {
                state.set_limits(vmin, vmax);
            }

            ui.add_space(4.0);
            colorbar(ui, state);
            ui.separator();

            // ---- Statistics ----
            if let Some(m) = &state.matrix {
                ui.strong("Matrix");
                ui.label(format!("shape  {m}"));
                match m.value_range() {
                    Some((lo, hi)) => {
                        ui.label(format!("min  {lo}"));
                        ui.label(format!("max  {hi}"));
                    }
                    None => {
                        ui.label("no finite values");
                    }
                }
                let nans = m.nan_count();
                if nans > 0 {
                    ui.label(format!("NaN cells  {nans}"));
                }
            }
            ui.separator();

            // ---- Hover readout ----
            match state.hovered {
                Some(cell) => ui.monospace(format!(
                    "({}, {}) = {}",
                    cell.row, cell.col, cell.value
                )),
                None => ui.weak("hover a cell"),
            };
        });
}

/// Vertical gradient for the active map, high values on top.
fn colorbar(ui: &mut Ui, state: &AppState) {
    ui.label(RichText::new(format!("{}", state.limits.vmax)).small());

    let (rect, _) = ui.allocate_exact_size(egui::vec2(24.0, 200.0), Sense::hover());
    let painter = ui.painter();
    let step = rect.height() / COLORBAR_STEPS as f32;
    for i in 0..COLORBAR_STEPS {
        let t = 1.0 - (i as f64 + 0.5) / COLORBAR_STEPS as f64;
        let top = rect.top() + i as f32 * step;
        let strip = egui::Rect::from_min_max(
            egui::pos2(rect.left(), top),
            egui::pos2(rect.right(), top + step + 0.5),
        );
        painter.rect_filled(strip, 0.0, state.color_map.sample(t));
    }

    ui.label(RichText::new(format!("{}", state.limits.vmin)).small());
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
            ui.add_enabled_ui(state.matrix.is_some(), |ui: &mut Ui| {
                if ui.button("Save CSV (integers)…").clicked() {
                    save_csv_dialog(state, CellFormat::Integer);
                    ui.close_menu();
                }
                if ui.button("Save CSV (floats)…").clicked() {
                    save_csv_dialog(state, CellFormat::Float);
                    ui.close_menu();
                }
                if ui.button("Export PNG…").clicked() {
                    export_png_dialog(state);
                    ui.close_menu();
                }
            });
        });

        ui.separator();

        if let Some(m) = &state.matrix {
            let name = state
                .source
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "matrix".to_string());
            ui.label(format!("{name}  {m}"));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open matrix")
        .add_filter("Supported files", &["csv", "txt", "tsv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "txt", "tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(matrix) => state.set_matrix(matrix, Some(&path)),
            Err(e) => state.report("load file", Err(e)),
        }
    }
}

pub fn save_csv_dialog(state: &mut AppState, format: CellFormat) {
    let Some(matrix) = &state.matrix else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Save matrix as CSV")
        .set_file_name("combined.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        let result = save_csv(&path, matrix, format);
        state.report("save CSV", result);
    }
}

pub fn export_png_dialog(state: &mut AppState) {
    let Some(matrix) = &state.matrix else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export heatmap")
        .set_file_name("heatmap.png")
        .add_filter("PNG", &["png"])
        .save_file();

    if let Some(path) = file {
        let result = save_png(
            &path,
            matrix,
            state.color_map,
            &state.limits,
            EXPORT_PNG_SCALE,
        );
        state.report("export PNG", result);
    }
}
