#![forbid(unsafe_code)]

use std::slice::ChunksExact;

/// Error type for matrix construction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// A row needs at least one column to have a sample.
    #[error("width must be at least 1")]
    ZeroWidth,
    /// Data length is not a whole number of rows.
    #[error("data length {len} is not a multiple of width {width}")]
    Ragged {
        /// number of elements supplied
        len: usize,
        /// requested row width
        width: usize,
    },
}

/// Borrowed row-major `[batch_size, width]` matrix of weights.
///
/// Every row is non-empty; `batch_size` may be zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightMatrix<'a, T> {
    data: &'a [T],
    width: usize,
}

impl<'a, T> WeightMatrix<'a, T> {
    /// View `data` as rows of `width` weights.
    pub fn new(data: &'a [T], width: usize) -> Result<Self, ShapeError> {
        if width == 0 {
            return Err(ShapeError::ZeroWidth);
        }
        if data.len() % width != 0 {
            return Err(ShapeError::Ragged {
                len: data.len(),
                width,
            });
        }
        Ok(Self { data, width })
    }

    /// Number of rows.
    pub fn batch_size(&self) -> usize {
        self.data.len() / self.width
    }

    /// Number of columns per row (always >= 1).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows in order.
    pub fn rows(&self) -> ChunksExact<'a, T> {
        self.data.chunks_exact(self.width)
    }

    /// Flat row-major data.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_from_flat_data() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let m = WeightMatrix::new(&data, 3).unwrap();
        assert_eq!(m.batch_size(), 2);
        assert_eq!(m.width(), 3);
        let rows: Vec<&[f64]> = m.rows().collect();
        assert_eq!(rows, vec![&[1.0, 2.0, 3.0][..], &[4.0, 5.0, 6.0][..]]);
    }

    #[test]
    fn empty_batch_is_valid() {
        let data: [i32; 0] = [];
        let m = WeightMatrix::new(&data, 4).unwrap();
        assert_eq!(m.batch_size(), 0);
        assert_eq!(m.rows().count(), 0);
    }

    #[test]
    fn zero_width_rejected() {
        let data: [f32; 0] = [];
        assert_eq!(WeightMatrix::new(&data, 0), Err(ShapeError::ZeroWidth));
    }

    #[test]
    fn ragged_data_rejected() {
        let data = [1i64, 2, 3];
        assert_eq!(
            WeightMatrix::new(&data, 2),
            Err(ShapeError::Ragged { len: 3, width: 2 })
        );
    }
}
