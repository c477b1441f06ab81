#![forbid(unsafe_code)]

use std::sync::Mutex;

use sampler::{
    sample_with_draws, ConfiguredDraws, DrawSource, Element, Sampler, SamplerConfig, ShapeError,
    WeightMatrix,
};
use tracing::debug;

use crate::context::ExecutionContext;
use crate::proto::{OpProto, SAMPLING_ID_PROTO};
use crate::tensor::{Lod, Tensor, TensorData};
use crate::OperatorError;

/// Input slot name.
pub const INPUT_X: &str = "X";
/// Output slot name.
pub const OUTPUT_OUT: &str = "Out";

/// Result of shape inference for `Out`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputShape {
    /// `[batch_size]`
    pub dims: Vec<usize>,
    /// copied from `X`
    pub lod: Lod,
}

/// The `sampling_id` operator bound to a draw source.
///
/// The draw source sits behind a mutex so one instance can serve several
/// host threads. Each `run` holds the lock only while taking its draws; the
/// row scan, parallel or not, happens after the lock is released.
#[derive(Debug)]
pub struct SamplingIdOp<D = ConfiguredDraws> {
    sampler: Mutex<Sampler<D>>,
}

impl SamplingIdOp<ConfiguredDraws> {
    /// Operator with the draw source and cut-over from `cfg`.
    pub fn from_config(cfg: &SamplerConfig) -> Self {
        Self {
            sampler: Mutex::new(Sampler::from_config(cfg)),
        }
    }
}

impl<D: DrawSource> SamplingIdOp<D> {
    /// Operator over an explicit sampler.
    pub fn new(sampler: Sampler<D>) -> Self {
        Self {
            sampler: Mutex::new(sampler),
        }
    }

    /// Static description of the operator.
    pub fn proto() -> &'static OpProto {
        &SAMPLING_ID_PROTO
    }

    /// Check bindings and derive the shape of `Out`.
    ///
    /// `X` must be bound and 2-D with a non-zero width, and `Out` must be
    /// declared. `Out` is `[batch_size]` and shares the LoD of `X`.
    ///
    /// The reported dims are the ones `run` writes. Hosts that copied the
    /// input dims `[batch_size, width]` at graph-build time and let the
    /// kernel resize `Out` afterwards will see rank 1 here instead of
    /// rank 2.
    pub fn infer_shape(ctx: &ExecutionContext) -> Result<OutputShape, OperatorError> {
        let x = ctx
            .input(INPUT_X)
            .ok_or(OperatorError::MissingInput(INPUT_X))?;
        if !ctx.has_output(OUTPUT_OUT) {
            return Err(OperatorError::MissingOutput(OUTPUT_OUT));
        }
        let (batch_size, width) = match *x.dims() {
            [batch_size, width] => (batch_size, width),
            _ => {
                return Err(OperatorError::InvalidRank {
                    name: INPUT_X,
                    expected: 2,
                    actual: x.rank(),
                })
            }
        };
        if width == 0 {
            return Err(ShapeError::ZeroWidth.into());
        }
        debug!(batch_size, width, dtype = ?x.dtype(), "sampling_id shape inferred");
        Ok(OutputShape {
            dims: vec![batch_size],
            lod: x.lod().clone(),
        })
    }

    /// Sample one value per row of `X` into `Out`.
    pub fn run(&self, ctx: &mut ExecutionContext) -> Result<(), OperatorError> {
        let shape = Self::infer_shape(ctx)?;
        let x = ctx
            .input(INPUT_X)
            .ok_or(OperatorError::MissingInput(INPUT_X))?;
        let width = x.dims().get(1).copied().unwrap_or_default();

        let data = match x.data() {
            TensorData::Int32(v) => TensorData::Int32(self.sample_typed(v, width)?),
            TensorData::Int64(v) => TensorData::Int64(self.sample_typed(v, width)?),
            TensorData::Float32(v) => TensorData::Float32(self.sample_typed(v, width)?),
            TensorData::Float64(v) => TensorData::Float64(self.sample_typed(v, width)?),
        };

        let out = Tensor::new(shape.dims, data)?.with_lod(shape.lod);
        if !ctx.set_output(OUTPUT_OUT, out) {
            return Err(OperatorError::MissingOutput(OUTPUT_OUT));
        }
        Ok(())
    }

    fn sample_typed<T: Element>(&self, data: &[T], width: usize) -> Result<Vec<T>, OperatorError> {
        let x = WeightMatrix::new(data, width)?;
        let (thresholds, parallel) = {
            let mut sampler = self
                .sampler
                .lock()
                .map_err(|_| OperatorError::DrawSourcePoisoned)?;
            let batch_size = x.batch_size();
            (sampler.next_draws(batch_size), sampler.is_parallel(batch_size))
        };
        // rayon work must not start while the lock is held
        Ok(sample_with_draws(&x, &thresholds, parallel))
    }
}
