#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
#![deny(missing_docs, unused_must_use)]

//! Host-side adapter for the `sampling_id` operator.
//!
//! The sampling math lives in the `sampler` crate. This crate binds it to a
//! host execution engine: named `X`/`Out` slots, rank and width checks, output
//! shape inference, sequence-offset (LoD) propagation and element-kind
//! dispatch for int32, int64, float32 and float64 tensors.

use sampler::ShapeError;

/// Typed host tensors.
pub mod tensor;
/// Named input/output slots for one invocation.
pub mod context;
/// Operator documentation stub.
pub mod proto;
/// Shape inference and the kernel.
pub mod op;

pub use context::ExecutionContext;
pub use op::{OutputShape, SamplingIdOp, INPUT_X, OUTPUT_OUT};
pub use proto::{ArgDoc, OpProto, SAMPLING_ID_PROTO};
pub use tensor::{DType, Lod, Tensor, TensorData};

/// Error type for operator invocation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperatorError {
    /// A required input slot is unbound.
    #[error("Input({0}) of SamplingIdOp should not be null")]
    MissingInput(&'static str),
    /// A required output slot was not declared.
    #[error("Output({0}) of SamplingIdOp should not be null")]
    MissingOutput(&'static str),
    /// Input has the wrong number of dimensions.
    #[error("Input({name}) should be a {expected}-D tensor, got {actual}-D")]
    InvalidRank {
        /// slot name
        name: &'static str,
        /// required rank
        expected: usize,
        /// supplied rank
        actual: usize,
    },
    /// Dims do not describe the data buffer.
    #[error("dims {dims:?} need {expected} elements, data has {actual}")]
    DataLength {
        /// declared dims
        dims: Vec<usize>,
        /// product of dims
        expected: usize,
        /// buffer length
        actual: usize,
    },
    /// Matrix view rejected the input.
    #[error(transparent)]
    Shape(#[from] ShapeError),
    /// Another thread panicked while holding the draw source.
    #[error("draw source lock poisoned")]
    DrawSourcePoisoned,
}
