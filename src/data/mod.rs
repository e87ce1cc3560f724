/// Data layer: the matrix type, loading, and writing back.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Matrix
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Matrix   │  rows × cols, row-major f64
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  Matrix → headerless CSV
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod writer;
