// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node contract schema for the Trellis dataflow engine.
//!
//! Every node type declares, through a small schema, the shape of the data
//! it consumes and produces. This crate is the declarative half of that
//! contract:
//! - Recursive port types with array shapes and wildcard dimensions
//! - Runtime values mirroring those types
//! - Parameter widgets with default resolution
//! - Node signatures aggregating ports and parameters, checked at build time
//!
//! Validation of runtime values against a schema lives in `trellis_eval`;
//! this crate stays purely declarative.
//!
//! Signatures and types are immutable once built and freely shared across
//! concurrently evaluated node instances.

pub mod param;
pub mod port;
pub mod signature;
pub mod value;

pub use param::{ParameterError, Widget};
pub use port::{DescriptorError, Dimension, PortType, PrimitiveKind, Shape};
pub use signature::{InputPort, NodeSignature, SignatureBuilder};
pub use value::{ArrayValue, PortValue, ScalarValue};
