use std::path::{Path, PathBuf};

use eframe::egui::{self, TextureHandle, TextureOptions};

use crate::color::{ColorMap, Normalize};
use crate::data::model::Matrix;
use crate::render::render_image;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A cell under the mouse pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoveredCell {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded matrix (None until a file is loaded).
    pub matrix: Option<Matrix>,

    /// Where the matrix came from, for the title bar.
    pub source: Option<PathBuf>,

    /// Active colour map.
    pub color_map: ColorMap,

    /// Colour limits.  When `auto_limits` is set they track the data range.
    pub auto_limits: bool,
    pub limits: Normalize,

    /// Cell under the pointer on the last frame.
    pub hovered: Option<HoveredCell>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    texture: Option<TextureHandle>,
    texture_dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            matrix: None,
            source: None,
            color_map: ColorMap::default(),
            auto_limits: true,
            limits: Normalize::default(),
            hovered: None,
            status_message: None,
            texture: None,
            texture_dirty: true,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded matrix and reset colour limits to its range.
    pub fn set_matrix(&mut self, matrix: Matrix, source: Option<&Path>) {
        self.matrix = Some(matrix);
        self.source = source.map(Path::to_path_buf);
        self.auto_limits = true;
        self.refresh_limits();
        self.hovered = None;
        self.status_message = None;
        self.texture_dirty = true;
    }

    pub fn set_color_map(&mut self, color_map: ColorMap) {
        if self.color_map != color_map {
            self.color_map = color_map;
            self.texture_dirty = true;
        }
    }

    /// Pin the colour limits to explicit values.
    pub fn set_limits(&mut self, vmin: f64, vmax: f64) {
        self.auto_limits = false;
        self.limits = Normalize::new(vmin, vmax);
        self.texture_dirty = true;
    }

    /// Switch between data-driven and manual limits.
    pub fn set_auto_limits(&mut self, auto: bool) {
        self.auto_limits = auto;
        self.refresh_limits();
        self.texture_dirty = true;
    }

    fn refresh_limits(&mut self) {
        if !self.auto_limits {
            return;
        }
        self.limits = match self.matrix.as_ref().and_then(Matrix::value_range) {
            Some((lo, hi)) => Normalize::new(lo, hi),
            None => Normalize::default(),
        };
    }

    /// Record the outcome of a file operation in the status line.
    /// Success clears an earlier error.
    pub fn report(&mut self, action: &str, result: anyhow::Result<()>) {
        match result {
            Ok(()) => self.status_message = None,
            Err(e) => {
                log::error!("Failed to {action}: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Whether the cached texture is out of date.
    pub fn needs_redraw(&self) -> bool {
        self.texture_dirty || self.texture.is_none()
    }

    /// The heatmap texture, rebuilt if data or colours changed since last frame.
    pub fn texture(&mut self, ctx: &egui::Context) -> Option<&TextureHandle> {
        let matrix = self.matrix.as_ref()?;
        if self.needs_redraw() {
            log::debug!(
                "Rebuilding {matrix} texture with {} [{}, {}]",
                self.color_map.name(),
                self.limits.vmin,
                self.limits.vmax
            );
            let image = render_image(matrix, self.color_map, &self.limits);
            if let Some(handle) = self.texture.as_mut() {
                handle.set(image, TextureOptions::NEAREST);
            } else {
                self.texture = Some(ctx.load_texture("heatmap", image, TextureOptions::NEAREST));
            }
            self.texture_dirty = false;
        }
        self.texture.as_ref()
    }

    /// Look up the cell at a matrix position; `None` outside the matrix.
    pub fn cell_at(&self, row: f64, col: f64) -> Option<HoveredCell> {
        let matrix = self.matrix.as_ref()?;
        if row < 0.0 || col < 0.0 {
            return None;
        }
        let (row, col) = (row.floor() as usize, col.floor() as usize);
        matrix
            .get(row, col)
            .map(|value| HoveredCell { row, col, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> AppState {
        let mut state = AppState::default();
        let m = Matrix::from_rows(vec![vec![3.0, 9.0], vec![f64::NAN, -1.0]]).unwrap();
        state.set_matrix(m, Some(Path::new("combine.csv")));
        state
    }

    #[test]
    fn loading_sets_limits_to_data_range() {
        let state = loaded();
        assert_eq!(state.limits, Normalize::new(-1.0, 9.0));
        assert_eq!(state.source.as_deref(), Some(Path::new("combine.csv")));
        assert!(state.needs_redraw());
    }

    #[test]
    fn manual_limits_survive_until_auto_is_restored() {
        let mut state = loaded();
        state.set_limits(0.0, 5.0);
        assert!(!state.auto_limits);
        assert_eq!(state.limits, Normalize::new(0.0, 5.0));

        state.set_auto_limits(true);
        assert_eq!(state.limits, Normalize::new(-1.0, 9.0));
    }

    #[test]
    fn new_matrix_resets_manual_limits() {
        let mut state = loaded();
        state.set_limits(100.0, 200.0);
        state.set_matrix(Matrix::from_rows(vec![vec![1.0, 2.0]]).unwrap(), None);
        assert!(state.auto_limits);
        assert_eq!(state.limits, Normalize::new(1.0, 2.0));
        assert_eq!(state.source, None);
    }

    #[test]
    fn all_nan_matrix_falls_back_to_unit_limits() {
        let mut state = loaded();
        state.set_matrix(Matrix::from_rows(vec![vec![f64::NAN, f64::NAN]]).unwrap(), None);
        assert_eq!(state.limits, Normalize::default());
    }

    #[test]
    fn successful_operation_clears_previous_error() {
        let mut state = loaded();
        state.report("save CSV", Err(anyhow::anyhow!("disk full")));
        assert_eq!(state.status_message.as_deref(), Some("Error: disk full"));

        state.report("export PNG", Ok(()));
        assert_eq!(state.status_message, None);
    }

    #[test]
    fn cell_lookup_floors_and_bounds() {
        let state = loaded();
        assert_eq!(
            state.cell_at(0.7, 1.2),
            Some(HoveredCell {
                row: 0,
                col: 1,
                value: 9.0
            })
        );
        assert_eq!(state.cell_at(-0.1, 0.0), None);
        assert_eq!(state.cell_at(2.0, 0.0), None);
    }

    #[test]
    fn texture_is_built_once_until_colors_change() {
        let ctx = egui::Context::default();
        let mut state = loaded();

        let first = state.texture(&ctx).map(TextureHandle::id);
        assert!(first.is_some());
        assert!(!state.needs_redraw());

        state.set_color_map(ColorMap::Magma);
        assert!(state.needs_redraw());
        let second = state.texture(&ctx).map(TextureHandle::id);
        assert_eq!(first, second);
        assert!(!state.needs_redraw());
    }
}
