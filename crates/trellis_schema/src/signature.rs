// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node signatures: the declared contract of a node type.
//!
//! A [`NodeSignature`] aggregates named input ports, output ports, and
//! parameters. It is built once when a node type is registered, validated at
//! build time, and shared read-only across every evaluation of that node
//! type.

use crate::param::Widget;
use crate::port::{DescriptorError, PortType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Declared input port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputPort {
    /// Declared value type
    pub port_type: PortType,
    /// Whether evaluation fails fast when no upstream value is present
    pub required: bool,
}

/// The complete declared contract of one node type.
///
/// Inputs and outputs are separate namespaces and may share names. Field
/// order is declaration order throughout, which fixes the validator's
/// traversal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSignature {
    inputs: IndexMap<String, InputPort>,
    outputs: IndexMap<String, PortType>,
    parameters: IndexMap<String, Widget>,
}

impl NodeSignature {
    /// Start building a signature
    pub fn builder() -> SignatureBuilder {
        SignatureBuilder::default()
    }

    /// Look up an input port by name
    pub fn input(&self, name: &str) -> Option<&InputPort> {
        self.inputs.get(name)
    }

    /// Look up an output port type by name
    pub fn output(&self, name: &str) -> Option<&PortType> {
        self.outputs.get(name)
    }

    /// Look up a parameter widget by name
    pub fn parameter(&self, name: &str) -> Option<&Widget> {
        self.parameters.get(name)
    }

    /// Input ports in declaration order
    pub fn inputs(&self) -> impl Iterator<Item = (&str, &InputPort)> {
        self.inputs.iter().map(|(name, port)| (name.as_str(), port))
    }

    /// Output port types in declaration order
    pub fn outputs(&self) -> impl Iterator<Item = (&str, &PortType)> {
        self.outputs.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// Parameter widgets in declaration order
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &Widget)> {
        self.parameters.iter().map(|(name, w)| (name.as_str(), w))
    }
}

/// Fluent builder for [`NodeSignature`].
///
/// Name collisions and malformed port types are reported by [`build`],
/// keeping the chained calls infallible.
///
/// [`build`]: SignatureBuilder::build
#[derive(Debug, Default)]
pub struct SignatureBuilder {
    inputs: IndexMap<String, InputPort>,
    outputs: IndexMap<String, PortType>,
    parameters: IndexMap<String, Widget>,
    error: Option<DescriptorError>,
}

impl SignatureBuilder {
    /// Declare a required input port
    pub fn input(self, name: impl Into<String>, port_type: PortType) -> Self {
        self.add_input(name.into(), port_type, true)
    }

    /// Declare an input port that may be left unconnected
    pub fn optional_input(self, name: impl Into<String>, port_type: PortType) -> Self {
        self.add_input(name.into(), port_type, false)
    }

    fn add_input(mut self, name: String, port_type: PortType, required: bool) -> Self {
        if self
            .inputs
            .insert(name.clone(), InputPort { port_type, required })
            .is_some()
        {
            self.error
                .get_or_insert(DescriptorError::DuplicateInput(name));
        }
        self
    }

    /// Declare an output port
    pub fn output(mut self, name: impl Into<String>, port_type: PortType) -> Self {
        let name = name.into();
        if self.outputs.insert(name.clone(), port_type).is_some() {
            self.error
                .get_or_insert(DescriptorError::DuplicateOutput(name));
        }
        self
    }

    /// Declare a parameter
    pub fn parameter(mut self, name: impl Into<String>, widget: Widget) -> Self {
        let name = name.into();
        if self.parameters.insert(name.clone(), widget).is_some() {
            self.error
                .get_or_insert(DescriptorError::DuplicateParameter(name));
        }
        self
    }

    /// Validate the declaration and produce the immutable signature
    pub fn build(self) -> Result<NodeSignature, DescriptorError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        for (name, port) in &self.inputs {
            port.port_type.check(name)?;
        }
        for (name, port_type) in &self.outputs {
            port_type.check(name)?;
        }
        for (name, widget) in &self.parameters {
            widget.check().map_err(|reason| DescriptorError::InvalidWidget {
                parameter: name.clone(),
                reason,
            })?;
        }
        Ok(NodeSignature {
            inputs: self.inputs,
            outputs: self.outputs,
            parameters: self.parameters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{Dimension, PrimitiveKind};

    fn float() -> PortType {
        PortType::Primitive(PrimitiveKind::Float)
    }

    #[test]
    fn builds_and_preserves_declaration_order() {
        let sig = NodeSignature::builder()
            .input("a", float())
            .optional_input("b", float())
            .output("out", PortType::array(float(), vec![Dimension::Wildcard]))
            .parameter("gain", Widget::NumberField { default: 1.0 })
            .build()
            .unwrap();

        assert!(sig.input("a").unwrap().required);
        assert!(!sig.input("b").unwrap().required);
        assert_eq!(
            sig.inputs().map(|(n, _)| n).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert!(sig.output("out").is_some());
        assert!(sig.parameter("gain").is_some());
    }

    #[test]
    fn inputs_and_outputs_are_separate_namespaces() {
        let sig = NodeSignature::builder()
            .input("value", float())
            .output("value", float())
            .build();
        assert!(sig.is_ok());
    }

    #[test]
    fn duplicate_input_rejected() {
        let err = NodeSignature::builder()
            .input("a", float())
            .input("a", float())
            .build()
            .unwrap_err();
        assert_eq!(err, DescriptorError::DuplicateInput("a".into()));
    }

    #[test]
    fn duplicate_parameter_rejected() {
        let err = NodeSignature::builder()
            .parameter("p", Widget::CheckBox { default: false })
            .parameter("p", Widget::NumberField { default: 0.0 })
            .build()
            .unwrap_err();
        assert_eq!(err, DescriptorError::DuplicateParameter("p".into()));
    }

    #[test]
    fn zero_dimension_rejected_at_build() {
        let err = NodeSignature::builder()
            .output("img", PortType::array(float(), vec![Dimension::Fixed(0)]))
            .build()
            .unwrap_err();
        assert_eq!(err, DescriptorError::ZeroDimension { port: "img".into() });
    }

    #[test]
    fn bad_widget_rejected_at_build() {
        let err = NodeSignature::builder()
            .parameter(
                "gain",
                Widget::Slider {
                    min: 2.0,
                    max: 1.0,
                    default: 1.5,
                },
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, DescriptorError::InvalidWidget { .. }));
    }

    #[test]
    fn ron_round_trip() {
        let sig = NodeSignature::builder()
            .input("in", float())
            .output("out", float())
            .parameter(
                "level",
                Widget::Slider {
                    min: 0.0,
                    max: 10.0,
                    default: 1.0,
                },
            )
            .build()
            .unwrap();
        let text = ron::to_string(&sig).unwrap();
        let loaded: NodeSignature = ron::from_str(&text).unwrap();
        assert_eq!(loaded, sig);
    }
}
