#![forbid(unsafe_code)]

use crate::OperatorError;

/// Sequence offsets per level; carried through the operator untouched.
pub type Lod = Vec<Vec<usize>>;

/// Element kinds the operator has kernels for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 32-bit float
    Float32,
    /// 64-bit float
    Float64,
}

/// Owned row-major buffer of one element kind.
#[derive(Clone, Debug, PartialEq)]
pub enum TensorData {
    /// int32 elements
    Int32(Vec<i32>),
    /// int64 elements
    Int64(Vec<i64>),
    /// float32 elements
    Float32(Vec<f32>),
    /// float64 elements
    Float64(Vec<f64>),
}

impl TensorData {
    /// Element kind of the buffer.
    pub fn dtype(&self) -> DType {
        match self {
            TensorData::Int32(_) => DType::Int32,
            TensorData::Int64(_) => DType::Int64,
            TensorData::Float32(_) => DType::Float32,
            TensorData::Float64(_) => DType::Float64,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            TensorData::Int32(v) => v.len(),
            TensorData::Int64(v) => v.len(),
            TensorData::Float32(v) => v.len(),
            TensorData::Float64(v) => v.len(),
        }
    }

    /// True when the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! impl_from_vec {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$t>> for TensorData {
                fn from(v: Vec<$t>) -> Self {
                    TensorData::$variant(v)
                }
            }
        )*
    };
}

impl_from_vec!(i32 => Int32, i64 => Int64, f32 => Float32, f64 => Float64);

/// Dims, data and sequence offsets.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    dims: Vec<usize>,
    data: TensorData,
    lod: Lod,
}

impl Tensor {
    /// Tensor with no LoD. Fails when the dims do not cover the buffer exactly.
    pub fn new(dims: Vec<usize>, data: impl Into<TensorData>) -> Result<Self, OperatorError> {
        let data = data.into();
        let expected: usize = dims.iter().product();
        if expected != data.len() {
            return Err(OperatorError::DataLength {
                dims,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            dims,
            data,
            lod: Lod::new(),
        })
    }

    /// Attach sequence offsets.
    pub fn with_lod(mut self, lod: Lod) -> Self {
        self.lod = lod;
        self
    }

    /// Shape.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Number of dims.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Buffer.
    pub fn data(&self) -> &TensorData {
        &self.data
    }

    /// Element kind.
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    /// Sequence offsets.
    pub fn lod(&self) -> &Lod {
        &self.lod
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dims_must_match_data() {
        let t = Tensor::new(vec![2, 3], vec![0i32; 6]);
        assert!(t.is_ok());
        assert_eq!(
            Tensor::new(vec![2, 3], vec![0.0f32; 5]),
            Err(OperatorError::DataLength {
                dims: vec![2, 3],
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn dtype_follows_buffer() {
        assert_eq!(TensorData::from(vec![1i64]).dtype(), DType::Int64);
        assert_eq!(TensorData::from(vec![1.0f64]).dtype(), DType::Float64);
        assert!(TensorData::from(Vec::<f32>::new()).is_empty());
    }

    #[test]
    fn lod_is_attached() {
        let t = Tensor::new(vec![3, 1], vec![1.0f64, 2.0, 3.0])
            .map(|t| t.with_lod(vec![vec![0, 1, 3]]));
        assert_eq!(t.map(|t| t.lod().clone()), Ok(vec![vec![0, 1, 3]]));
    }
}
