// SPDX-License-Identifier: MIT OR Apache-2.0
//! Structural validation of runtime values against port types.
//!
//! [`validate`] walks a value depth-first and short-circuits on the first
//! mismatch, in a fixed traversal order: declared field order for structured
//! types, outermost axis first (then row-major elements) for arrays. Error
//! paths are therefore reproducible across runs.
//!
//! Validation is pure and touches no shared state; independent values may be
//! checked concurrently without coordination.

use crate::PortMap;
use ndarray::Dimension as _;
use std::fmt::Write;
use trellis_schema::{
    ArrayValue, Dimension, NodeSignature, PortType, PortValue, PrimitiveKind, ScalarValue,
};

/// A runtime value does not conform to its declared type.
///
/// `path` is the dotted/indexed location of the offending node within the
/// value (`out.d[2].r`); the root is the empty string. The host renders
/// these; the structured fields are the contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidateError {
    /// Value kind differs from the declared type
    #[error("type mismatch at `{path}`: expected {expected}, found {found}")]
    Mismatch {
        /// Location of the offending value
        path: String,
        /// Declared type at that location
        expected: PortType,
        /// Observed type of the value found there
        found: PortType,
    },

    /// Array rank differs from the declared shape length
    #[error("rank mismatch at `{path}`: expected {expected}, found {found}")]
    RankMismatch {
        /// Location of the offending array
        path: String,
        /// Declared number of axes
        expected: usize,
        /// Observed number of axes
        found: usize,
    },

    /// A fixed axis has the wrong extent
    #[error("dimension mismatch at `{path}` axis {axis}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Location of the offending array
        path: String,
        /// Axis index, outermost first
        axis: usize,
        /// Declared extent
        expected: usize,
        /// Observed extent
        found: usize,
    },

    /// A declared structured field is absent from the value
    #[error("missing field at `{path}`: expected {expected}")]
    MissingField {
        /// Location of the absent field
        path: String,
        /// Declared type of the absent field
        expected: PortType,
    },

    /// The value carries a field the declaration does not know
    #[error("unexpected field at `{path}`")]
    UnexpectedField {
        /// Location of the undeclared field
        path: String,
    },
}

/// Check a runtime value against a declared port type
pub fn validate(expected: &PortType, value: &PortValue) -> Result<(), ValidateError> {
    validate_at(expected, value, "")
}

/// Pre-condition check: every supplied input against the node's input
/// schema. Paths start at the port name. Absent inputs are not an error
/// here; required-input enforcement happens at invocation.
pub fn validate_inputs(signature: &NodeSignature, inputs: &PortMap) -> Result<(), ValidateError> {
    for (name, port) in signature.inputs() {
        if let Some(value) = inputs.get(name) {
            validate_at(&port.port_type, value, name)?;
        }
    }
    for name in inputs.keys() {
        if signature.input(name).is_none() {
            return Err(ValidateError::UnexpectedField { path: name.clone() });
        }
    }
    Ok(())
}

/// Post-condition check: everything a node produced against its output
/// schema. The produced key set must be a subset of the declared outputs;
/// declared outputs the node omitted are simply not produced this pass.
pub fn validate_outputs(signature: &NodeSignature, outputs: &PortMap) -> Result<(), ValidateError> {
    for (name, port_type) in signature.outputs() {
        if let Some(value) = outputs.get(name) {
            validate_at(port_type, value, name)?;
        }
    }
    for name in outputs.keys() {
        if signature.output(name).is_none() {
            return Err(ValidateError::UnexpectedField { path: name.clone() });
        }
    }
    Ok(())
}

fn validate_at(expected: &PortType, value: &PortValue, path: &str) -> Result<(), ValidateError> {
    match (expected, value) {
        (PortType::Primitive(kind), PortValue::Scalar(scalar)) => {
            validate_scalar(*kind, scalar, path)
        }
        (PortType::Array(element, shape), PortValue::Array(array)) => {
            validate_array(element, shape, array, path)
        }
        (PortType::Structured(fields), PortValue::Structured(values)) => {
            for (name, field_type) in fields {
                match values.get(name) {
                    Some(field_value) => validate_at(field_type, field_value, &join(path, name))?,
                    None => {
                        return Err(ValidateError::MissingField {
                            path: join(path, name),
                            expected: field_type.clone(),
                        })
                    }
                }
            }
            for name in values.keys() {
                if !fields.contains_key(name) {
                    return Err(ValidateError::UnexpectedField {
                        path: join(path, name),
                    });
                }
            }
            Ok(())
        }
        (expected, value) => Err(ValidateError::Mismatch {
            path: path.to_string(),
            expected: expected.clone(),
            found: value.port_type(),
        }),
    }
}

fn validate_scalar(
    kind: PrimitiveKind,
    scalar: &ScalarValue,
    path: &str,
) -> Result<(), ValidateError> {
    let ok = match (kind, scalar) {
        (PrimitiveKind::Integer, ScalarValue::Integer(_)) => true,
        // Widening tolerated for loosely typed numeric sources: a whole
        // float passes as integer, any integer passes as float.
        (PrimitiveKind::Integer, ScalarValue::Float(v)) => v.fract() == 0.0,
        (PrimitiveKind::Float, ScalarValue::Float(_) | ScalarValue::Integer(_)) => true,
        (PrimitiveKind::Complex, ScalarValue::Complex(_)) => true,
        (PrimitiveKind::Boolean, ScalarValue::Boolean(_)) => true,
        (PrimitiveKind::String, ScalarValue::String(_)) => true,
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(ValidateError::Mismatch {
            path: path.to_string(),
            expected: PortType::Primitive(kind),
            found: PortType::Primitive(scalar.kind()),
        })
    }
}

fn validate_array(
    element: &PortType,
    shape: &[Dimension],
    array: &ArrayValue,
    path: &str,
) -> Result<(), ValidateError> {
    if array.ndim() != shape.len() {
        return Err(ValidateError::RankMismatch {
            path: path.to_string(),
            expected: shape.len(),
            found: array.ndim(),
        });
    }
    for (axis, (dim, extent)) in shape.iter().zip(array.shape()).enumerate() {
        if let Dimension::Fixed(n) = dim {
            if n != extent {
                return Err(ValidateError::DimensionMismatch {
                    path: path.to_string(),
                    axis,
                    expected: *n,
                    found: *extent,
                });
            }
        }
    }
    validate_elements(element, shape, array, path)
}

fn validate_elements(
    element: &PortType,
    shape: &[Dimension],
    array: &ArrayValue,
    path: &str,
) -> Result<(), ValidateError> {
    match (element, array) {
        (PortType::Primitive(PrimitiveKind::Integer), ArrayValue::Integer(_))
        | (
            PortType::Primitive(PrimitiveKind::Float),
            ArrayValue::Float(_) | ArrayValue::Integer(_),
        )
        | (PortType::Primitive(PrimitiveKind::Complex), ArrayValue::Complex(_))
        | (PortType::Primitive(PrimitiveKind::Boolean), ArrayValue::Boolean(_))
        | (PortType::Primitive(PrimitiveKind::String), ArrayValue::String(_)) => Ok(()),
        // Whole floats pass as integers, per leaf
        (PortType::Primitive(PrimitiveKind::Integer), ArrayValue::Float(a)) => {
            match a.indexed_iter().find(|(_, v)| v.fract() != 0.0) {
                None => Ok(()),
                Some((idx, _)) => Err(ValidateError::Mismatch {
                    path: indexed(path, idx.slice()),
                    expected: PortType::Primitive(PrimitiveKind::Integer),
                    found: PortType::Primitive(PrimitiveKind::Float),
                }),
            }
        }
        // Nested arrays carry full values per element
        (_, ArrayValue::Structured(a)) => {
            for (idx, element_value) in a.indexed_iter() {
                validate_at(element, element_value, &indexed(path, idx.slice()))?;
            }
            Ok(())
        }
        _ => Err(ValidateError::Mismatch {
            path: path.to_string(),
            expected: PortType::Array(Box::new(element.clone()), shape.to_vec()),
            found: array.port_type(),
        }),
    }
}

fn join(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}

fn indexed(path: &str, idx: &[usize]) -> String {
    let mut out = path.to_string();
    for i in idx {
        let _ = write!(out, "[{i}]");
    }
    out
}
