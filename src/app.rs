use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct HeatmapApp {
    pub state: AppState,
}

impl HeatmapApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for HeatmapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: colour controls ----
        egui::SidePanel::left("color_panel")
            .default_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: heatmap ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::heatmap_plot(ui, &mut self.state);
        });
    }
}
