// SPDX-License-Identifier: MIT OR Apache-2.0
//! The invocation contract between a scheduler and a node's compute step.
//!
//! A node's compute step is a pure function from named inputs and resolved
//! parameters to named outputs. [`invoke`] wraps one compute call with the
//! contract's pre- and post-conditions: parameters are resolved from raw
//! widget state, required inputs are enforced, inputs are validated before
//! the call and outputs after it. A compute step therefore never sees an
//! unvalidated value, and a buggy node is caught at its own boundary before
//! anything flows downstream.
//!
//! Nothing here blocks or suspends; scheduling, timeout, and cancellation
//! policy belong to the caller.

use crate::validate::{validate_inputs, validate_outputs, ValidateError};
use crate::{ParameterMap, PortMap};
use tracing::{debug, warn};
use trellis_schema::{DescriptorError, NodeSignature};

/// A node type's computation, as the scheduler sees it.
///
/// `compute` must be callable once per evaluation pass with no state visible
/// across calls; any internal memoization is the node's private concern.
/// Inputs handed to `compute` already satisfy the input schema and need not
/// be re-checked. Absent optional inputs are simply missing from the map.
pub trait Compute: Send + Sync {
    /// The declared contract of this node type, built at registration
    fn signature(&self) -> Result<NodeSignature, DescriptorError>;

    /// Run one evaluation. The returned key set must be a subset of the
    /// declared output names; omitted keys mean "not produced this pass".
    fn compute(&self, inputs: &PortMap, parameters: &ParameterMap)
        -> Result<PortMap, ComputeError>;
}

/// Failure inside a node's own computation, opaque to the core
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("compute failed: {0}")]
pub struct ComputeError(pub String);

/// A node invocation violated the contract
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvokeError {
    /// A required input had no producer this pass
    #[error("missing required input `{0}`")]
    MissingInput(String),

    /// An upstream value does not conform to the input schema
    #[error("input rejected: {0}")]
    Input(ValidateError),

    /// The node produced a value that does not conform to the output schema
    #[error("output rejected: {0}")]
    Output(ValidateError),

    /// The node's computation itself failed
    #[error(transparent)]
    Compute(#[from] ComputeError),
}

/// Resolve every declared parameter from raw widget values.
///
/// A raw value of the wrong kind is recoverable: it is logged and the
/// declared default is used instead, so one bad widget state never takes
/// down an evaluation pass.
pub fn resolve_parameters(signature: &NodeSignature, raw: &ParameterMap) -> ParameterMap {
    signature
        .parameters()
        .map(|(name, widget)| {
            let value = match widget.resolve(raw.get(name)) {
                Ok(value) => value,
                Err(error) => {
                    warn!(parameter = name, %error, "raw parameter rejected, using default");
                    widget.default_value()
                }
            };
            (name.to_string(), value)
        })
        .collect()
}

/// Run one node evaluation under the invocation contract.
///
/// Inputs absent from the map are the explicit "no producer connected"
/// sentinel: fatal for required inputs, silently omitted for optional ones.
/// Only outputs that passed validation are returned for forwarding.
pub fn invoke(
    node: &dyn Compute,
    signature: &NodeSignature,
    inputs: &PortMap,
    raw_parameters: &ParameterMap,
) -> Result<PortMap, InvokeError> {
    let parameters = resolve_parameters(signature, raw_parameters);

    for (name, port) in signature.inputs() {
        if port.required && !inputs.contains_key(name) {
            return Err(InvokeError::MissingInput(name.to_string()));
        }
    }
    validate_inputs(signature, inputs).map_err(InvokeError::Input)?;

    let outputs = node.compute(inputs, &parameters)?;

    validate_outputs(signature, &outputs).map_err(|error| {
        debug!(%error, "node produced a non-conforming output");
        InvokeError::Output(error)
    })?;
    Ok(outputs)
}
