use std::path::Path;

use anyhow::{ensure, Context, Result};
use eframe::egui::{Color32, ColorImage};
use image::{imageops, RgbaImage};

use crate::color::{cell_color, ColorMap, Normalize};
use crate::data::model::Matrix;

// ---------------------------------------------------------------------------
// Matrix → image
// ---------------------------------------------------------------------------

/// One pixel per cell, row 0 at the top (matplotlib `imshow` orientation).
pub fn render_image(matrix: &Matrix, cmap: ColorMap, norm: &Normalize) -> ColorImage {
    let (rows, cols) = matrix.shape();
    let mut image = ColorImage::new([cols, rows], Color32::TRANSPARENT);
    for (pixel, &v) in image.pixels.iter_mut().zip(matrix.values()) {
        *pixel = cell_color(cmap, norm, v);
    }
    image
}

/// Write the heatmap as a PNG, each cell scaled to `scale × scale` pixels.
pub fn save_png(
    path: &Path,
    matrix: &Matrix,
    cmap: ColorMap,
    norm: &Normalize,
    scale: u32,
) -> Result<()> {
    ensure!(scale >= 1, "PNG scale must be at least 1, got {scale}");

    let (rows, cols) = matrix.shape();
    let width = u32::try_from(cols).context("matrix too wide for PNG")?;
    let height = u32::try_from(rows).context("matrix too tall for PNG")?;

    let rendered = render_image(matrix, cmap, norm);
    let bytes: Vec<u8> = rendered
        .pixels
        .iter()
        .flat_map(|c| c.to_srgba_unmultiplied())
        .collect();
    let img = RgbaImage::from_raw(width, height, bytes)
        .context("pixel buffer does not match matrix shape")?;

    let img = if scale > 1 {
        imageops::resize(
            &img,
            width * scale,
            height * scale,
            imageops::FilterType::Nearest,
        )
    } else {
        img
    };

    img.save(path)
        .with_context(|| format!("writing PNG {}", path.display()))?;
    log::info!(
        "Exported {matrix} heatmap to {} ({}x{} px)",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(())
}
