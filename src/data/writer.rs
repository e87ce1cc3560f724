use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::model::Matrix;

/// How cells are rendered when a matrix is written back to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellFormat {
    /// Truncate toward zero, numpy's `fmt="%d"`.
    #[default]
    Integer,
    /// Shortest representation that reads back to the same `f64`.
    Float,
}

impl CellFormat {
    fn format(self, v: f64) -> Result<String> {
        if v.is_nan() {
            return Ok(String::new());
        }
        match self {
            CellFormat::Integer => {
                if v.is_infinite() {
                    bail!("{v} has no integer representation");
                }
                Ok(format!("{}", v.trunc() as i64))
            }
            CellFormat::Float => Ok(format!("{v}")),
        }
    }
}

/// Write `matrix` as a headerless CSV file at `path`.
pub fn save_csv(path: &Path, matrix: &Matrix, format: CellFormat) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, matrix, format)?;
    log::info!("Saved {matrix} matrix to {}", path.display());
    Ok(())
}

/// Headerless rows; `NaN` cells are left empty so they load back as `NaN`.
pub fn write_csv<W: Write>(writer: W, matrix: &Matrix, format: CellFormat) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    for (i, row) in matrix.iter_rows().enumerate() {
        let fields = row
            .iter()
            .enumerate()
            .map(|(j, &v)| {
                format
                    .format(v)
                    .with_context(|| format!("row {i}, column {j}"))
            })
            .collect::<Result<Vec<String>>>()?;
        wtr.write_record(&fields)
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    fn sample() -> Matrix {
        Matrix::from_rows(vec![vec![1.0, 2.9, -3.7], vec![f64::NAN, 0.25, 12.0]]).unwrap()
    }

    fn written(format: CellFormat) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, &sample(), format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn integer_format_truncates() {
        assert_eq!(written(CellFormat::Integer), "1,2,-3\n,0,12\n");
    }

    #[test]
    fn float_format_keeps_values() {
        assert_eq!(written(CellFormat::Float), "1,2.9,-3.7\n,0.25,12\n");
    }

    #[test]
    fn infinite_cells_cannot_be_written_as_integers() {
        let m = Matrix::from_rows(vec![vec![1.0], vec![f64::INFINITY]]).unwrap();
        let err = write_csv(Vec::new(), &m, CellFormat::Integer).unwrap_err();
        assert!(format!("{err:#}").contains("row 1, column 0"));

        let mut buf = Vec::new();
        write_csv(&mut buf, &m, CellFormat::Float).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1\ninf\n");
    }

    #[test]
    fn one_column_nan_survives_a_reload() {
        let m = Matrix::from_rows(vec![vec![1.0], vec![f64::NAN], vec![3.0], vec![f64::NAN]])
            .unwrap();
        let mut buf = Vec::new();
        write_csv(&mut buf, &m, CellFormat::Integer).unwrap();

        let back = read_csv(buf.as_slice(), b',').unwrap();
        assert_eq!(back.shape(), (4, 1));
        assert!(back.get(1, 0).unwrap().is_nan());
        assert_eq!(back.get(2, 0), Some(3.0));
        assert!(back.get(3, 0).unwrap().is_nan());
    }

    #[test]
    fn written_file_loads_with_same_shape() {
        let text = written(CellFormat::Float);
        let back = read_csv(text.as_bytes(), b',').unwrap();
        assert_eq!(back.shape(), sample().shape());
        assert!(back.get(1, 0).unwrap().is_nan());
        assert_eq!(back.get(0, 1), Some(2.9));
    }
}
