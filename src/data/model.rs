use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// MatrixError – why a table could not become a matrix
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum MatrixError {
    #[error("matrix has no cells")]
    Empty,

    #[error("row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}, column {col}: '{value}' is not a number")]
    NonNumeric {
        row: usize,
        col: usize,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Matrix – the loaded 2-D array
// ---------------------------------------------------------------------------

/// A dense, row-major matrix of `f64` cells.
/// Missing cells are stored as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Matrix {
    /// Build a matrix from row vectors; every row must be as wide as the first.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Err(MatrixError::Empty);
        }

        let n_rows = rows.len();
        let mut values = Vec::with_capacity(n_rows * cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(MatrixError::Ragged {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
            values.extend(row);
        }

        Ok(Matrix {
            rows: n_rows,
            cols,
            values,
        })
    }

    /// `(rows, columns)`, numpy's `shape` order.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.values[row * self.cols + col])
        } else {
            None
        }
    }

    /// One row as a slice.  Panics if `i` is out of range, like slice indexing.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.cols..(i + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// Flat row-major cell values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Minimum and maximum over finite cells; `None` if no cell is finite.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn nan_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rows, self.cols)
    }
}
