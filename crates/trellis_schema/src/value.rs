// SPDX-License-Identifier: MIT OR Apache-2.0
//! Runtime values flowing through ports.
//!
//! A [`PortValue`] is a dynamically typed tree mirroring the shape of a
//! [`PortType`]: a scalar, an n-dimensional homogeneous array, or a
//! structured mapping. Values are produced fresh per evaluation pass and
//! handed forward through the graph; they are never mutated in place.

use crate::port::{Dimension, PortType, PrimitiveKind};
use indexmap::IndexMap;
use ndarray::{ArrayD, IxDyn};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// A single scalar value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    /// Signed integer
    Integer(i32),
    /// Double-precision float
    Float(f64),
    /// Complex number
    Complex(Complex64),
    /// Boolean
    Boolean(bool),
    /// UTF-8 string
    String(String),
}

impl ScalarValue {
    /// Kind of this scalar
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Integer(_) => PrimitiveKind::Integer,
            Self::Float(_) => PrimitiveKind::Float,
            Self::Complex(_) => PrimitiveKind::Complex,
            Self::Boolean(_) => PrimitiveKind::Boolean,
            Self::String(_) => PrimitiveKind::String,
        }
    }

    /// Numeric view of this scalar, if it is numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(f64::from(*v)),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i32> for ScalarValue {
    fn from(v: i32) -> Self {
        Self::Integer(v)
    }
}
impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}
impl From<bool> for ScalarValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}
impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

/// A homogeneous n-dimensional array.
///
/// Primitive element kinds are stored flat for speed; the `Structured`
/// variant allows nesting when an element is itself an array or record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArrayValue {
    /// Array of integers
    Integer(ArrayD<i32>),
    /// Array of floats
    Float(ArrayD<f64>),
    /// Array of complex numbers
    Complex(ArrayD<Complex64>),
    /// Array of booleans
    Boolean(ArrayD<bool>),
    /// Array of strings
    String(ArrayD<String>),
    /// Array of arbitrary nested values
    Structured(ArrayD<PortValue>),
}

impl ArrayValue {
    /// Number of axes
    pub fn ndim(&self) -> usize {
        match self {
            Self::Integer(a) => a.ndim(),
            Self::Float(a) => a.ndim(),
            Self::Complex(a) => a.ndim(),
            Self::Boolean(a) => a.ndim(),
            Self::String(a) => a.ndim(),
            Self::Structured(a) => a.ndim(),
        }
    }

    /// Extent of each axis, outermost first
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Integer(a) => a.shape(),
            Self::Float(a) => a.shape(),
            Self::Complex(a) => a.shape(),
            Self::Boolean(a) => a.shape(),
            Self::String(a) => a.shape(),
            Self::Structured(a) => a.shape(),
        }
    }

    /// Element kind, when the array holds primitive scalars
    pub fn elem_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Integer(_) => Some(PrimitiveKind::Integer),
            Self::Float(_) => Some(PrimitiveKind::Float),
            Self::Complex(_) => Some(PrimitiveKind::Complex),
            Self::Boolean(_) => Some(PrimitiveKind::Boolean),
            Self::String(_) => Some(PrimitiveKind::String),
            Self::Structured(_) => None,
        }
    }

    /// The observed type of this array, with every axis reported as a fixed
    /// extent
    pub fn port_type(&self) -> PortType {
        PortType::Array(
            Box::new(self.elem_type()),
            self.shape().iter().map(|n| Dimension::Fixed(*n)).collect(),
        )
    }

    /// Observed element type
    fn elem_type(&self) -> PortType {
        match self {
            Self::Structured(a) => a
                .first()
                .map(PortValue::port_type)
                .unwrap_or_else(|| PortType::Structured(IndexMap::new())),
            other => PortType::Primitive(
                other.elem_kind().unwrap_or(PrimitiveKind::Float),
            ),
        }
    }
}

/// A runtime value carried by a port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PortValue {
    /// Single scalar
    Scalar(ScalarValue),
    /// n-dimensional array
    Array(ArrayValue),
    /// Named mapping of nested values
    Structured(IndexMap<String, PortValue>),
}

impl PortValue {
    /// The observed type of this value, with every array axis reported as a
    /// fixed extent. Used for diagnostics.
    pub fn port_type(&self) -> PortType {
        match self {
            Self::Scalar(s) => PortType::Primitive(s.kind()),
            Self::Array(a) => a.port_type(),
            Self::Structured(fields) => PortType::Structured(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.port_type()))
                    .collect(),
            ),
        }
    }
}

impl From<ScalarValue> for PortValue {
    fn from(v: ScalarValue) -> Self {
        Self::Scalar(v)
    }
}
impl From<i32> for PortValue {
    fn from(v: i32) -> Self {
        Self::Scalar(ScalarValue::Integer(v))
    }
}
impl From<f64> for PortValue {
    fn from(v: f64) -> Self {
        Self::Scalar(ScalarValue::Float(v))
    }
}
impl From<bool> for PortValue {
    fn from(v: bool) -> Self {
        Self::Scalar(ScalarValue::Boolean(v))
    }
}
impl From<&str> for PortValue {
    fn from(v: &str) -> Self {
        Self::Scalar(ScalarValue::String(v.to_string()))
    }
}
impl From<ArrayValue> for PortValue {
    fn from(a: ArrayValue) -> Self {
        Self::Array(a)
    }
}
impl From<ArrayD<f64>> for PortValue {
    fn from(a: ArrayD<f64>) -> Self {
        Self::Array(ArrayValue::Float(a))
    }
}
impl From<ArrayD<i32>> for PortValue {
    fn from(a: ArrayD<i32>) -> Self {
        Self::Array(ArrayValue::Integer(a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_kinds() {
        assert_eq!(ScalarValue::from(3).kind(), PrimitiveKind::Integer);
        assert_eq!(ScalarValue::from(3.0).kind(), PrimitiveKind::Float);
        assert_eq!(ScalarValue::from(true).kind(), PrimitiveKind::Boolean);
        assert_eq!(ScalarValue::from("x").kind(), PrimitiveKind::String);
        assert_eq!(
            ScalarValue::Complex(Complex64::new(1.0, 2.0)).kind(),
            PrimitiveKind::Complex
        );
    }

    #[test]
    fn array_type_reflection_reports_fixed_dims() {
        let value = PortValue::from(ArrayD::<f64>::zeros(IxDyn(&[3, 5])));
        assert_eq!(
            value.port_type(),
            PortType::array(
                PortType::Primitive(PrimitiveKind::Float),
                vec![Dimension::Fixed(3), Dimension::Fixed(5)],
            )
        );
    }

    #[test]
    fn structured_type_reflection_keeps_field_order() {
        let value = PortValue::Structured(
            [
                ("r".to_string(), PortValue::from(0.1)),
                ("g".to_string(), PortValue::from(0.2)),
            ]
            .into_iter()
            .collect(),
        );
        let PortType::Structured(fields) = value.port_type() else {
            panic!("expected structured type");
        };
        assert_eq!(
            fields.keys().collect::<Vec<_>>(),
            vec!["r", "g"]
        );
    }

    #[test]
    fn zero_rank_array_is_not_a_scalar() {
        let value = PortValue::from(ArrayD::<f64>::from_elem(IxDyn(&[]), 1.0));
        assert_eq!(
            value.port_type(),
            PortType::array(PortType::Primitive(PrimitiveKind::Float), Vec::<Dimension>::new())
        );
    }
}
