use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

// ---------------------------------------------------------------------------
// Colour maps: scalar in [0, 1] → Color32
// ---------------------------------------------------------------------------

// Stops sampled at 1/8 intervals from matplotlib's perceptually uniform maps.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (0x44, 0x01, 0x54),
    (0x48, 0x28, 0x78),
    (0x3e, 0x49, 0x89),
    (0x31, 0x68, 0x8e),
    (0x26, 0x82, 0x8e),
    (0x1f, 0x9e, 0x89),
    (0x35, 0xb7, 0x79),
    (0x6e, 0xce, 0x58),
    (0xfd, 0xe7, 0x25),
];

const MAGMA: [(u8, u8, u8); 9] = [
    (0x00, 0x00, 0x04),
    (0x1c, 0x10, 0x44),
    (0x4f, 0x12, 0x7b),
    (0x81, 0x25, 0x81),
    (0xb5, 0x36, 0x7a),
    (0xe5, 0x50, 0x64),
    (0xfb, 0x87, 0x61),
    (0xfe, 0xc2, 0x87),
    (0xfc, 0xfd, 0xbf),
];

/// Continuous colour maps for heatmap cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMap {
    #[default]
    Viridis,
    Magma,
    Gray,
    /// Hue sweep from blue (low) to red (high) at fixed saturation/lightness.
    Hue,
}

impl ColorMap {
    pub const ALL: [ColorMap; 4] = [
        ColorMap::Viridis,
        ColorMap::Magma,
        ColorMap::Gray,
        ColorMap::Hue,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorMap::Viridis => "viridis",
            ColorMap::Magma => "magma",
            ColorMap::Gray => "gray",
            ColorMap::Hue => "hue",
        }
    }

    /// Colour at position `t`; `t` is clamped to [0, 1].
    pub fn sample(self, t: f64) -> Color32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) as f32 };
        let rgb: Srgb = match self {
            ColorMap::Viridis => interpolate(&VIRIDIS, t),
            ColorMap::Magma => interpolate(&MAGMA, t),
            ColorMap::Gray => Srgb::new(t, t, t),
            ColorMap::Hue => {
                let hue = 240.0 * (1.0 - t);
                let hsl = Hsl::new(hue, 0.75, 0.5);
                hsl.into_color()
            }
        };
        let rgb: Srgb<u8> = rgb.into_format();
        Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
    }
}

fn interpolate(stops: &[(u8, u8, u8)], t: f32) -> Srgb {
    let last = stops.len() - 1;
    let pos = t * last as f32;
    let i = (pos.floor() as usize).min(last - 1);
    let frac = pos - i as f32;

    let to_srgb = |(r, g, b): (u8, u8, u8)| Srgb::new(r, g, b).into_format::<f32>();
    to_srgb(stops[i]).mix(to_srgb(stops[i + 1]), frac)
}

// ---------------------------------------------------------------------------
// Normalisation: cell value → [0, 1]
// ---------------------------------------------------------------------------

/// Linear mapping of `[vmin, vmax]` onto `[0, 1]`, clamped at both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub vmin: f64,
    pub vmax: f64,
}

impl Normalize {
    pub fn new(vmin: f64, vmax: f64) -> Self {
        Normalize { vmin, vmax }
    }

    /// `None` for `NaN` cells (drawn transparent).
    /// A degenerate range maps everything to the bottom of the map.
    pub fn apply(&self, v: f64) -> Option<f64> {
        if v.is_nan() {
            return None;
        }
        let range = self.vmax - self.vmin;
        if range == 0.0 || !range.is_finite() {
            return Some(0.0);
        }
        Some(((v - self.vmin) / range).clamp(0.0, 1.0))
    }
}

impl Default for Normalize {
    fn default() -> Self {
        Normalize::new(0.0, 1.0)
    }
}

/// Colour for one cell, or transparent for `NaN`.
pub fn cell_color(cmap: ColorMap, norm: &Normalize, v: f64) -> Color32 {
    norm.apply(v)
        .map(|t| cmap.sample(t))
        .unwrap_or(Color32::TRANSPARENT)
}
