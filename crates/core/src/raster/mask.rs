//! Boolean change masks

use crate::error::{Error, Result};
use ndarray::Array2;

/// A 2-D boolean mask over (row, col) marking changed pixels in one direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeMask {
    data: Array2<bool>,
}

impl ChangeMask {
    /// Create an all-false mask
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), false),
        }
    }

    /// Create a mask from row-major data
    pub fn from_vec(data: Vec<bool>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions { bands: 1, rows, cols });
        }
        let array =
            Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;
        Ok(Self { data: array })
    }

    /// Create a mask from an ndarray
    pub fn from_array(data: Array2<bool>) -> Self {
        Self { data }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<bool> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: bool) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Number of set pixels
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<bool> {
        &self.data
    }
}
