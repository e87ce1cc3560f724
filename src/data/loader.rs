use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;
use serde::Deserialize;

use super::model::{Matrix, MatrixError};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a matrix from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – headerless, comma-separated numeric rows
/// * `.tsv`          – headerless, tab-separated numeric rows
/// * `.json`         – `[[1, 2], [3, 4]]` or `{ "data": [[1, 2], [3, 4]] }`
/// * `.parquet`      – every column numeric, one column per matrix column
pub fn load_file(path: &Path) -> Result<Matrix> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let matrix = match ext.as_str() {
        "csv" | "txt" => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            read_csv(file, b',')?
        }
        "tsv" => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            read_csv(file, b'\t')?
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            read_json(&text)?
        }
        "parquet" | "pq" => {
            let file = File::open(path).context("opening parquet file")?;
            read_parquet(file)?
        }
        other => bail!("Unsupported file extension: .{other}"),
    };

    log::info!(
        "Loaded {} as .{ext} with shape {matrix}",
        path.display()
    );
    Ok(matrix)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// No header row; every field is a number.  Empty fields become `NaN`.
/// Row widths are checked by [`Matrix::from_rows`], not by the csv reader,
/// so a ragged file reports which row is off.
pub fn read_csv<R: Read>(mut reader: R, delimiter: u8) -> Result<Matrix> {
    let mut text = String::new();
    reader.read_to_string(&mut text).context("reading CSV")?;
    if let Some(quoted) = quote_blank_lines(&text, delimiter) {
        text = quoted;
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row = record
            .iter()
            .enumerate()
            .map(|(col, field)| parse_cell(field, row_no, col))
            .collect::<Result<Vec<f64>, MatrixError>>()?;
        rows.push(row);
    }

    Ok(Matrix::from_rows(rows)?)
}

/// The csv reader skips blank lines, but in a one-column file a blank line
/// is an empty cell.  Rewrites such lines as `""` so they load as `NaN`.
/// Trailing blank lines are dropped.  `None` when nothing needs rewriting.
fn quote_blank_lines(text: &str, delimiter: u8) -> Option<String> {
    let first = text.lines().find(|l| !l.trim().is_empty())?;
    if first.as_bytes().contains(&delimiter) {
        return None;
    }
    let body = text.trim_end();
    if !body.lines().any(|l| l.trim().is_empty()) {
        return None;
    }
    let lines: Vec<&str> = body
        .lines()
        .map(|l| if l.trim().is_empty() { "\"\"" } else { l })
        .collect();
    Some(lines.join("\n"))
}

fn parse_cell(s: &str, row: usize, col: usize) -> Result<f64, MatrixError> {
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse::<f64>().map_err(|_| MatrixError::NonNumeric {
        row,
        col,
        value: s.to_string(),
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonMatrix {
    Rows(Vec<Vec<Option<f64>>>),
    Wrapped { data: Vec<Vec<Option<f64>>> },
}

/// Nested row arrays, bare or under a `data` key.  `null` becomes `NaN`.
pub fn read_json(text: &str) -> Result<Matrix> {
    let parsed: JsonMatrix = serde_json::from_str(text)
        .context("parsing JSON: expected [[numbers]] or {\"data\": [[numbers]]}")?;

    let rows = match parsed {
        JsonMatrix::Rows(rows) | JsonMatrix::Wrapped { data: rows } => rows,
    };

    let rows = rows
        .into_iter()
        .map(|row| row.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        .collect();

    Ok(Matrix::from_rows(rows)?)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Every column must hold a numeric type; each becomes one matrix column.
/// Record batches are stacked in file order.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
pub fn read_parquet<R: ChunkReader + 'static>(reader: R) -> Result<Matrix> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(reader).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows: Vec<Vec<f64>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut columns: Vec<Float64Array> = Vec::with_capacity(batch.num_columns());
        for (field, col) in schema.fields().iter().zip(batch.columns()) {
            if !field.data_type().is_numeric() {
                bail!(
                    "Parquet column '{}' has type {:?}, expected a numeric type",
                    field.name(),
                    field.data_type()
                );
            }
            let cast = arrow::compute::cast(col, &DataType::Float64)
                .with_context(|| format!("casting column '{}' to Float64", field.name()))?;
            let values = cast
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array after cast")?
                .clone();
            columns.push(values);
        }

        for row in 0..batch.num_rows() {
            rows.push(
                columns
                    .iter()
                    .map(|c| if c.is_null(row) { f64::NAN } else { c.value(row) })
                    .collect(),
            );
        }
    }

    Ok(Matrix::from_rows(rows)?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Int32Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    #[test]
    fn csv_shape_matches_rows_and_columns() {
        let text = "0,1,2,3\n4,5,6,7\n8,9,10,11\n";
        let m = read_csv(text.as_bytes(), b',').unwrap();
        assert_eq!(m.shape(), (3, 4));
        assert_eq!(m.get(2, 3), Some(11.0));
    }

    #[test]
    fn csv_first_line_is_data_not_header() {
        let m = read_csv("7,8\n".as_bytes(), b',').unwrap();
        assert_eq!(m.shape(), (1, 2));
        assert_eq!(m.row(0), &[7.0, 8.0]);
    }

    #[test]
    fn csv_accepts_floats_spaces_and_blank_cells() {
        let text = " 1.5 , -2e3\n, nan\n";
        let m = read_csv(text.as_bytes(), b',').unwrap();
        assert_eq!(m.get(0, 0), Some(1.5));
        assert_eq!(m.get(0, 1), Some(-2000.0));
        assert!(m.get(1, 0).unwrap().is_nan());
        assert!(m.get(1, 1).unwrap().is_nan());
    }

    #[test]
    fn blank_lines_in_one_column_file_are_nan_cells() {
        let m = read_csv("1\n\n3\n".as_bytes(), b',').unwrap();
        assert_eq!(m.shape(), (3, 1));
        assert_eq!(m.get(0, 0), Some(1.0));
        assert!(m.get(1, 0).unwrap().is_nan());
        assert_eq!(m.get(2, 0), Some(3.0));

        let crlf = read_csv("\r\n4\r\n  \r\n5\r\n\r\n".as_bytes(), b',').unwrap();
        assert_eq!(crlf.shape(), (4, 1));
        assert!(crlf.get(0, 0).unwrap().is_nan());
        assert!(crlf.get(2, 0).unwrap().is_nan());
        assert_eq!(crlf.get(3, 0), Some(5.0));
    }

    #[test]
    fn blank_lines_between_wide_rows_are_skipped() {
        let m = read_csv("1,2\n\n3,4\n".as_bytes(), b',').unwrap();
        assert_eq!(m.shape(), (2, 2));
    }

    #[test]
    fn tab_delimiter() {
        let m = read_csv("1\t2\n3\t4\n".as_bytes(), b'\t').unwrap();
        assert_eq!(m.shape(), (2, 2));
    }

    #[test]
    fn csv_reports_ragged_row() {
        let err = read_csv("1,2,3\n4,5\n".as_bytes(), b',').unwrap_err();
        assert_eq!(
            err.downcast_ref::<MatrixError>(),
            Some(&MatrixError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn csv_reports_non_numeric_cell() {
        let err = read_csv("1,2\n3,rain\n".as_bytes(), b',').unwrap_err();
        assert_eq!(
            err.downcast_ref::<MatrixError>(),
            Some(&MatrixError::NonNumeric {
                row: 1,
                col: 1,
                value: "rain".into()
            })
        );
    }

    #[test]
    fn empty_csv_is_an_error() {
        assert!(read_csv("".as_bytes(), b',').is_err());
    }

    #[test]
    fn json_bare_and_wrapped() {
        let bare = read_json("[[1, 2, 3], [4, null, 6]]").unwrap();
        assert_eq!(bare.shape(), (2, 3));
        assert!(bare.get(1, 1).unwrap().is_nan());

        let wrapped = read_json(r#"{"data": [[1], [2]]}"#).unwrap();
        assert_eq!(wrapped.shape(), (2, 1));
    }

    #[test]
    fn json_rejects_non_matrix() {
        assert!(read_json(r#"{"x": 1}"#).is_err());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("matrix.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    fn write_parquet(name: &str, batch: RecordBatch) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("csv-heatmap-{}-{name}", std::process::id()));
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    #[test]
    fn parquet_numeric_columns() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("a", DataType::Int32, true),
            Field::new("b", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int32Array::from(vec![Some(1), None, Some(3)])),
                Arc::new(Float64Array::from(vec![0.5, 1.5, 2.5])),
            ],
        )
        .unwrap();
        let path = write_parquet("numeric.parquet", batch);

        let m = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(m.shape(), (3, 2));
        assert_eq!(m.row(0), &[1.0, 0.5]);
        assert!(m.get(1, 0).unwrap().is_nan());
        assert_eq!(m.get(2, 1), Some(2.5));
    }

    #[test]
    fn parquet_rejects_text_columns() {
        let schema = Arc::new(Schema::new(vec![Field::new("s", DataType::Utf8, false)]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(vec!["a", "b"]))])
                .unwrap();
        let path = write_parquet("text.parquet", batch);

        let result = load_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }
}
