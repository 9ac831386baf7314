// SPDX-License-Identifier: MIT OR Apache-2.0
//! Value validation and node invocation for the Trellis dataflow engine.
//!
//! The behavioral half of the node contract:
//! - Structural validation of runtime values against declared port types,
//!   with wildcard array dimensions and closed structured records
//! - The invocation contract a scheduler uses to run one node evaluation,
//!   with pre-validated inputs and post-validated outputs
//! - A read-only registry of node types, built once at startup
//!
//! Everything here is synchronous and pure; scheduling, evaluation order,
//! and failure propagation policy belong to the host.

pub mod invoke;
pub mod registry;
pub mod validate;

use indexmap::IndexMap;
use trellis_schema::{PortValue, ScalarValue};

/// Named port values passed into and out of one node evaluation. A name
/// absent from the map is the explicit "no value" sentinel.
pub type PortMap = IndexMap<String, PortValue>;

/// Named scalar parameter values, raw (from widgets) or resolved
pub type ParameterMap = IndexMap<String, ScalarValue>;

pub use invoke::{invoke, resolve_parameters, Compute, ComputeError, InvokeError};
pub use registry::{NodeRegistry, RegisteredNode, RegistryError};
pub use validate::{validate, validate_inputs, validate_outputs, ValidateError};
