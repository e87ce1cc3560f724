mod app;
mod cli;
mod color;
mod data;
mod render;
mod state;
mod ui;

use anyhow::{anyhow, Result};
use app::HeatmapApp;
use clap::Parser;
use cli::Cli;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let matrix = data::loader::load_file(&cli.input)?;
    println!("{matrix}");

    if let Some(path) = &cli.save {
        data::writer::save_csv(path, &matrix, cli.save_format.into())?;
    }

    let mut state = AppState::default();
    state.set_color_map(cli.cmap.into());
    state.set_matrix(matrix, Some(&cli.input));
    if cli.vmin.is_some() || cli.vmax.is_some() {
        let vmin = cli.vmin.unwrap_or(state.limits.vmin);
        let vmax = cli.vmax.unwrap_or(state.limits.vmax);
        state.set_limits(vmin, vmax);
    }

    if let (Some(path), Some(matrix)) = (&cli.png, &state.matrix) {
        render::save_png(path, matrix, state.color_map, &state.limits, cli.png_scale)?;
    }

    if cli.no_show {
        return Ok(());
    }

    let title = match cli.input.file_name() {
        Some(name) => format!("csv-heatmap – {}", name.to_string_lossy()),
        None => "csv-heatmap".to_string(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_min_inner_size([500.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(HeatmapApp::new(state)))),
    )
    .map_err(|e| anyhow!("running viewer window: {e}"))
}
