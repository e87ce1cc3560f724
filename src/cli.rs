use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::color::ColorMap;
use crate::data::writer::CellFormat;

#[derive(Parser, Debug)]
#[command(name = "csv-heatmap")]
#[command(about = "Show a headerless numeric CSV as a heatmap and print its shape")]
#[command(version)]
pub struct Cli {
    /// Matrix file (.csv, .txt, .tsv, .json, .parquet)
    #[arg(default_value = "combine.csv")]
    pub input: PathBuf,

    /// Colour map
    #[arg(long, value_enum, default_value = "viridis")]
    pub cmap: ColorMapArg,

    /// Lower colour limit (defaults to the data minimum)
    #[arg(long, allow_negative_numbers = true)]
    pub vmin: Option<f64>,

    /// Upper colour limit (defaults to the data maximum)
    #[arg(long, allow_negative_numbers = true)]
    pub vmax: Option<f64>,

    /// Write the matrix back out as headerless CSV
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Cell format for --save
    #[arg(long, value_enum, default_value = "integer")]
    pub save_format: CellFormatArg,

    /// Export the heatmap as a PNG
    #[arg(long)]
    pub png: Option<PathBuf>,

    /// Pixels per cell in the PNG
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..))]
    pub png_scale: u32,

    /// Do not open a window
    #[arg(long)]
    pub no_show: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ColorMapArg {
    Viridis,
    Magma,
    Gray,
    Hue,
}

impl From<ColorMapArg> for ColorMap {
    fn from(arg: ColorMapArg) -> Self {
        match arg {
            ColorMapArg::Viridis => ColorMap::Viridis,
            ColorMapArg::Magma => ColorMap::Magma,
            ColorMapArg::Gray => ColorMap::Gray,
            ColorMapArg::Hue => ColorMap::Hue,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CellFormatArg {
    Integer,
    Float,
}

impl From<CellFormatArg> for CellFormat {
    fn from(arg: CellFormatArg) -> Self {
        match arg {
            CellFormatArg::Integer => CellFormat::Integer,
            CellFormatArg::Float => CellFormat::Float,
        }
    }
}
