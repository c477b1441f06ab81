#![forbid(unsafe_code)]

use crate::tensor::DType;

/// Documentation for one input or output slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArgDoc {
    /// slot name
    pub name: &'static str,
    /// human-readable description
    pub comment: &'static str,
}

/// Static description of an operator as a host would register it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpProto {
    /// operator type name
    pub op_type: &'static str,
    /// input slots
    pub inputs: &'static [ArgDoc],
    /// output slots
    pub outputs: &'static [ArgDoc],
    /// operator docs
    pub comment: &'static str,
    /// element kinds with a kernel
    pub dtypes: &'static [DType],
    /// whether a gradient op exists
    pub has_gradient: bool,
}

impl OpProto {
    /// Whether a kernel exists for `dtype`.
    pub fn supports(&self, dtype: DType) -> bool {
        self.dtypes.contains(&dtype)
    }
}

/// `sampling_id`: one sampled value per row of a 2-D weight tensor.
pub const SAMPLING_ID_PROTO: OpProto = OpProto {
    op_type: "sampling_id",
    inputs: &[ArgDoc {
        name: "X",
        comment: "The input tensor of softmax. 2-D with shape [batch_size, input_feature_dimensions].",
    }],
    outputs: &[ArgDoc {
        name: "Out",
        comment: "SamplingId data tensor.",
    }],
    comment: "SamplingId Operator.\n\
              A layer for sampling id from multinomial distribution from the input layer. \
              Sampling one id for one sample.",
    dtypes: &[DType::Int32, DType::Int64, DType::Float32, DType::Float64],
    has_gradient: false,
};
