// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port type descriptors: the recursive algebra of value types a port can carry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar kind carried by a primitive port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    /// Signed integer
    Integer,
    /// Double-precision float
    Float,
    /// Complex number (f64 real and imaginary parts)
    Complex,
    /// Boolean
    Boolean,
    /// UTF-8 string
    String,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Complex => "Complex",
            Self::Boolean => "Boolean",
            Self::String => "String",
        };
        f.write_str(name)
    }
}

/// One axis of an array shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    /// Exact extent, must be positive
    Fixed(usize),
    /// Any extent, including zero; resolved only once a value exists
    Wildcard,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Wildcard => f.write_str("*"),
        }
    }
}

/// Ordered axis list of an array port, outermost first
pub type Shape = Vec<Dimension>;

/// Declared type of a port
///
/// Recursive and immutable once built. An `Array` with an empty shape is a
/// 0-rank array, which is a distinct type from the bare `Primitive` of the
/// same kind. A `Structured` type with no fields matches only an empty
/// structured value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PortType {
    /// Single scalar
    Primitive(PrimitiveKind),
    /// Homogeneous n-dimensional array of the element type
    Array(Box<PortType>, Shape),
    /// Closed record of named fields; order is declaration order
    Structured(IndexMap<String, PortType>),
}

impl PortType {
    /// Shorthand for an array type
    pub fn array(element: PortType, shape: impl Into<Shape>) -> Self {
        Self::Array(Box::new(element), shape.into())
    }

    /// Build a structured type from `(name, type)` pairs, rejecting duplicate
    /// field names
    pub fn structured<N, I>(fields: I) -> Result<Self, DescriptorError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, PortType)>,
    {
        let mut map = IndexMap::new();
        for (name, port_type) in fields {
            let name = name.into();
            if map.insert(name.clone(), port_type).is_some() {
                return Err(DescriptorError::DuplicateField { field: name });
            }
        }
        Ok(Self::Structured(map))
    }

    /// Verify the type is well formed: no `Fixed(0)` axis anywhere.
    ///
    /// `port` names the port being checked, for diagnostics.
    pub fn check(&self, port: &str) -> Result<(), DescriptorError> {
        match self {
            Self::Primitive(_) => Ok(()),
            Self::Array(element, shape) => {
                if shape.iter().any(|d| matches!(d, Dimension::Fixed(0))) {
                    return Err(DescriptorError::ZeroDimension {
                        port: port.to_string(),
                    });
                }
                element.check(port)
            }
            Self::Structured(fields) => {
                for port_type in fields.values() {
                    port_type.check(port)?;
                }
                Ok(())
            }
        }
    }
}

impl From<PrimitiveKind> for PortType {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => kind.fmt(f),
            Self::Array(element, shape) => {
                write!(f, "Array<{element}, [")?;
                for (i, dim) in shape.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    dim.fmt(f)?;
                }
                f.write_str("]>")
            }
            Self::Structured(fields) => {
                f.write_str("{")?;
                for (i, (name, port_type)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {port_type}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Error raised when a node's declared schema is malformed.
///
/// Detected at registration time and fatal to that node type; the host never
/// retries a bad descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    /// Two inputs declared with the same name
    #[error("duplicate input port `{0}`")]
    DuplicateInput(String),

    /// Two outputs declared with the same name
    #[error("duplicate output port `{0}`")]
    DuplicateOutput(String),

    /// Two parameters declared with the same name
    #[error("duplicate parameter `{0}`")]
    DuplicateParameter(String),

    /// A structured type declared the same field twice
    #[error("duplicate structured field `{field}`")]
    DuplicateField {
        /// Offending field name
        field: String,
    },

    /// An array shape contains a `Fixed(0)` axis
    #[error("port `{port}` declares a fixed dimension of zero")]
    ZeroDimension {
        /// Port whose type carries the bad shape
        port: String,
    },

    /// A parameter widget violates its own invariants
    #[error("invalid widget for parameter `{parameter}`: {reason}")]
    InvalidWidget {
        /// Offending parameter name
        parameter: String,
        /// What was wrong with it
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_rejects_duplicate_fields() {
        let err = PortType::structured([
            ("r", PortType::Primitive(PrimitiveKind::Float)),
            ("r", PortType::Primitive(PrimitiveKind::Float)),
        ])
        .unwrap_err();
        assert_eq!(err, DescriptorError::DuplicateField { field: "r".into() });
    }

    #[test]
    fn check_rejects_zero_fixed_dimension() {
        let ty = PortType::array(
            PortType::Primitive(PrimitiveKind::Float),
            vec![Dimension::Fixed(3), Dimension::Fixed(0)],
        );
        assert_eq!(
            ty.check("image"),
            Err(DescriptorError::ZeroDimension { port: "image".into() })
        );
    }

    #[test]
    fn check_recurses_into_structured_fields() {
        let ty = PortType::structured([(
            "inner",
            PortType::array(
                PortType::Primitive(PrimitiveKind::Integer),
                vec![Dimension::Fixed(0)],
            ),
        )])
        .unwrap();
        assert!(ty.check("outer").is_err());
    }

    #[test]
    fn display_is_compact() {
        let ty = PortType::array(
            PortType::Primitive(PrimitiveKind::Float),
            vec![Dimension::Fixed(3), Dimension::Wildcard],
        );
        assert_eq!(ty.to_string(), "Array<Float, [3, *]>");
    }

    #[test]
    fn ron_round_trip() {
        let ty = PortType::structured([
            ("a", PortType::Primitive(PrimitiveKind::Integer)),
            (
                "b",
                PortType::array(
                    PortType::Primitive(PrimitiveKind::Complex),
                    vec![Dimension::Wildcard],
                ),
            ),
        ])
        .unwrap();
        let text = ron::to_string(&ty).unwrap();
        let loaded: PortType = ron::from_str(&text).unwrap();
        assert_eq!(loaded, ty);
    }
}
