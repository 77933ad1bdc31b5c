//! FilterNode trait and node metadata.
//!
//! Every image operation in slidefx is a `FilterNode`. Validation runs on
//! the parameter snapshot before any pixels are touched; execution then
//! produces the output image.

use crate::core::context::{ExecutionContext, ValidationContext};
use crate::core::error::{ExecutionError, ValidationError};
use crate::core::port::{ParameterDefinition, PortDefinition};
use serde::{Deserialize, Serialize};

/// Grouping used by `slidefx list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Input,
    Output,
    /// Geometric transforms
    Transform,
    Color,
    Blur,
    /// Kernel-based enhancement and relief
    Effects,
    Edge,
    #[default]
    Custom,
}

impl Category {
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Input => "Input",
            Category::Output => "Output",
            Category::Transform => "Transform",
            Category::Color => "Color",
            Category::Blur => "Blur",
            Category::Effects => "Effects",
            Category::Edge => "Edge",
            Category::Custom => "Custom",
        }
    }
}

/// Static description of a filter: identity, ports and parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Registry key, e.g. `filter_effects`
    pub id: String,
    pub name: String,
    pub category: Category,
    pub description: String,
    /// Crate version the filter shipped with
    pub version: String,
    pub inputs: Vec<PortDefinition>,
    pub outputs: Vec<PortDefinition>,
    /// Declaration order is trackbar order.
    pub parameters: Vec<ParameterDefinition>,
}

impl NodeMetadata {
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> NodeMetadataBuilder {
        NodeMetadataBuilder {
            metadata: NodeMetadata {
                id: id.into(),
                name: name.into(),
                category: Category::default(),
                description: String::new(),
                version: crate::VERSION.to_string(),
                inputs: Vec::new(),
                outputs: Vec::new(),
                parameters: Vec::new(),
            },
        }
    }

    pub fn get_parameter(&self, name: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Parameters presented as trackbars, in declaration order.
    pub fn sliders(&self) -> impl Iterator<Item = &ParameterDefinition> {
        self.parameters.iter().filter(|p| p.is_slider())
    }
}

/// Builder for [`NodeMetadata`].
pub struct NodeMetadataBuilder {
    metadata: NodeMetadata,
}

impl NodeMetadataBuilder {
    pub fn category(mut self, category: Category) -> Self {
        self.metadata.category = category;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = description.into();
        self
    }

    pub fn input(mut self, port: PortDefinition) -> Self {
        self.metadata.inputs.push(port);
        self
    }

    pub fn output(mut self, port: PortDefinition) -> Self {
        self.metadata.outputs.push(port);
        self
    }

    pub fn parameter(mut self, param: ParameterDefinition) -> Self {
        self.metadata.parameters.push(param);
        self
    }

    pub fn build(self) -> NodeMetadata {
        self.metadata
    }
}

/// A filter that can be hosted in a trackbar window.
///
/// The host checks every declared constraint before calling `validate`,
/// which only covers what the declarations cannot express. `execute` must
/// not keep state between calls: every trackbar move is a full recompute.
pub trait FilterNode: Send + Sync {
    fn metadata(&self) -> NodeMetadata;

    fn validate(&self, ctx: &ValidationContext) -> Result<(), ValidationError>;

    /// Read inputs and parameters from `ctx` and set the outputs.
    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError>;

    fn clone_box(&self) -> Box<dyn FilterNode>;
}

impl Clone for Box<dyn FilterNode> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
