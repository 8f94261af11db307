//! A pre-sized, row-major 2-D container.
//!
//! Used for the dense site x pin array and for the rectangularized
//! per-instrument array (`instrument_count x max_sites_on_instrument`), where
//! rows shorter than the widest partition are padded with the fill value.

use std::ops::{Index, IndexMut};

use serde::Serialize;

use crate::error::{LutError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// A `rows x cols` grid with every cell set to `fill`.
    pub fn new(rows: usize, cols: usize, fill: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![fill; rows * cols],
        }
    }

    /// Build from nested rows, which must all have the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let row_count = rows.len();
        let mut data = Vec::with_capacity(row_count * cols);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(LutError::shape(format!("grid row {r}"), cols, row.len()));
            }
            data.extend(row);
        }
        Ok(Self {
            rows: row_count,
            cols,
            data,
        })
    }

    /// Nested rows, padding included.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.iter_rows().map(<[T]>::to_vec).collect()
    }

    /// Row `r` truncated to `lengths[r]`, dropping the padding of a
    /// rectangularized per-instrument grid.
    pub fn ragged(&self, lengths: &[usize]) -> Result<Vec<Vec<T>>> {
        if lengths.len() != self.rows {
            return Err(LutError::shape("ragged row count", self.rows, lengths.len()));
        }
        lengths
            .iter()
            .enumerate()
            .map(|(r, &len)| {
                if len > self.cols {
                    return Err(LutError::IndexOutOfRange {
                        location: format!("row {r}"),
                        axis: "column",
                        index: len,
                        len: self.cols,
                    });
                }
                let start = r * self.cols;
                Ok(self.data[start..start + len].to_vec())
            })
            .collect()
    }
}

impl<T> Grid<T> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.offset(row, col).map(|i| &self.data[i])
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        self.offset(row, col).map(move |i| &mut self.data[i])
    }

    pub fn row(&self, row: usize) -> Option<&[T]> {
        (row < self.rows).then(|| &self.data[row * self.cols..(row + 1) * self.cols])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.rows).map(move |r| &self.data[r * self.cols..(r + 1) * self.cols])
    }

    /// Bounds-check `(row, col)` with a descriptive error.
    pub(crate) fn check(&self, row: usize, col: usize, location: impl FnOnce() -> String) -> Result<()> {
        if row >= self.rows {
            return Err(LutError::IndexOutOfRange {
                location: location(),
                axis: "row",
                index: row,
                len: self.rows,
            });
        }
        if col >= self.cols {
            return Err(LutError::IndexOutOfRange {
                location: location(),
                axis: "column",
                index: col,
                len: self.cols,
            });
        }
        Ok(())
    }

    fn offset(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(row < self.rows && col < self.cols, "grid index ({row}, {col}) out of bounds");
        &self.data[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(row < self.rows && col < self.cols, "grid index ({row}, {col}) out of bounds");
        &mut self.data[row * self.cols + col]
    }
}
