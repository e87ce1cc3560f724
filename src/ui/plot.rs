use eframe::egui::{Ui, Vec2};
use egui_plot::{Plot, PlotImage, PlotPoint};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Heatmap plot (central panel)
// ---------------------------------------------------------------------------

/// Render the heatmap in the central panel.
///
/// Plot coordinates: x is the column, y is the negated row, so row 0 sits at
/// the top like `imshow`.  The y-axis labels undo the negation.
pub fn heatmap_plot(ui: &mut Ui, state: &mut AppState) {
    let ctx = ui.ctx().clone();
    let (rows, cols) = match &state.matrix {
        Some(m) => (m.rows(), m.cols()),
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to view a matrix  (File → Open…)");
            });
            return;
        }
    };
    let Some(texture_id) = state.texture(&ctx).map(|t| t.id()) else {
        return;
    };

    let (w, h) = (cols as f64, rows as f64);

    let response = Plot::new("heatmap_plot")
        .data_aspect(1.0)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .x_axis_label("column")
        .y_axis_label("row")
        .y_axis_formatter(|mark, _range| format!("{}", 0.0 - mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.image(PlotImage::new(
                texture_id,
                PlotPoint::new(w / 2.0, -h / 2.0),
                Vec2::new(w as f32, h as f32),
            ));
            plot_ui.pointer_coordinate()
        });

    state.hovered = response
        .inner
        .filter(|_| response.response.hovered())
        .and_then(|p| state.cell_at(-p.y, p.x));
}
