// SPDX-License-Identifier: MIT OR Apache-2.0
//! Registry of available node types.
//!
//! Built once at host startup and read-only afterwards; a registry behind an
//! `Arc` can serve concurrent evaluation workers without synchronization.

use crate::invoke::{invoke, Compute, InvokeError};
use crate::{ParameterMap, PortMap};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::debug;
use trellis_schema::{DescriptorError, NodeSignature};

/// A node type admitted to the registry
pub struct RegisteredNode {
    signature: Arc<NodeSignature>,
    node: Arc<dyn Compute>,
}

impl RegisteredNode {
    /// The node type's validated signature
    pub fn signature(&self) -> &Arc<NodeSignature> {
        &self.signature
    }

    /// The node type's compute step
    pub fn node(&self) -> &Arc<dyn Compute> {
        &self.node
    }
}

/// Registry of node types keyed by type name
#[derive(Default)]
pub struct NodeRegistry {
    types: IndexMap<String, RegisteredNode>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node type under a unique name.
    ///
    /// The signature is built and checked here, once; a malformed schema is
    /// fatal to the node type and never retried.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        node: Arc<dyn Compute>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.types.contains_key(&name) {
            return Err(RegistryError::DuplicateNodeType(name));
        }
        let signature = node.signature().map_err(|source| RegistryError::Descriptor {
            node_type: name.clone(),
            source,
        })?;
        debug!(node_type = %name, "registered node type");
        self.types.insert(
            name,
            RegisteredNode {
                signature: Arc::new(signature),
                node,
            },
        );
        Ok(())
    }

    /// Look up a registered node type
    pub fn get(&self, name: &str) -> Option<&RegisteredNode> {
        self.types.get(name)
    }

    /// Signature of a registered node type
    pub fn signature(&self, name: &str) -> Option<&NodeSignature> {
        self.types.get(name).map(|entry| entry.signature.as_ref())
    }

    /// Registered type names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Number of registered node types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Run one evaluation of a registered node type under the invocation
    /// contract
    pub fn invoke(
        &self,
        name: &str,
        inputs: &PortMap,
        raw_parameters: &ParameterMap,
    ) -> Result<PortMap, RegistryError> {
        let entry = self
            .types
            .get(name)
            .ok_or_else(|| RegistryError::UnknownNodeType(name.to_string()))?;
        invoke(entry.node.as_ref(), &entry.signature, inputs, raw_parameters).map_err(|source| {
            RegistryError::Invoke {
                node_type: name.to_string(),
                source,
            }
        })
    }
}

/// Error raised by registry operations
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No node type registered under this name
    #[error("unknown node type `{0}`")]
    UnknownNodeType(String),

    /// A node type with this name already exists
    #[error("node type `{0}` is already registered")]
    DuplicateNodeType(String),

    /// The node type's declared schema is malformed
    #[error("node type `{node_type}` has a malformed schema: {source}")]
    Descriptor {
        /// Name the registration was attempted under
        node_type: String,
        /// What was wrong with the schema
        source: DescriptorError,
    },

    /// An evaluation of a registered node type failed
    #[error("node type `{node_type}` failed: {source}")]
    Invoke {
        /// Name of the failing node type
        node_type: String,
        /// Contract violation or compute failure
        source: InvokeError,
    },
}
