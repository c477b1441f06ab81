#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use crate::tensor::Tensor;

/// Named slots for one operator invocation.
///
/// Inputs are bound tensors. Outputs are declared by name first and filled by
/// the kernel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExecutionContext {
    inputs: BTreeMap<String, Tensor>,
    outputs: BTreeMap<String, Option<Tensor>>,
}

impl ExecutionContext {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `tensor` to input slot `name`.
    pub fn with_input(mut self, name: impl Into<String>, tensor: Tensor) -> Self {
        self.inputs.insert(name.into(), tensor);
        self
    }

    /// Declare output slot `name`.
    pub fn with_output(mut self, name: impl Into<String>) -> Self {
        self.outputs.insert(name.into(), None);
        self
    }

    /// Bound input, if any.
    pub fn input(&self, name: &str) -> Option<&Tensor> {
        self.inputs.get(name)
    }

    /// Whether output slot `name` was declared.
    pub fn has_output(&self, name: &str) -> bool {
        self.outputs.contains_key(name)
    }

    /// Filled output, if any.
    pub fn output(&self, name: &str) -> Option<&Tensor> {
        self.outputs.get(name).and_then(Option::as_ref)
    }

    /// Remove and return a filled output; the slot stays declared.
    pub fn take_output(&mut self, name: &str) -> Option<Tensor> {
        self.outputs.get_mut(name).and_then(Option::take)
    }

    /// Fill a declared slot. Returns `false` if `name` was never declared.
    pub(crate) fn set_output(&mut self, name: &str, tensor: Tensor) -> bool {
        match self.outputs.get_mut(name) {
            Some(slot) => {
                *slot = Some(tensor);
                true
            }
            None => false,
        }
    }
}
