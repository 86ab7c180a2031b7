//! Structural tree definitions.
//!
//! A [`NodeDefinition`] is plain data: it can be written in Rust, or read from JSON/YAML with a
//! `type` tag per node. Parsing validates the shape; blackboard names are not checked until
//! the tree runs.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Decorator, DefinitionError, NodeType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeDefinition {
    Root {
        child: Box<NodeDefinition>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        decorators: Vec<Decorator>,
    },
    Sequence {
        children: Vec<NodeDefinition>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        decorators: Vec<Decorator>,
    },
    Selector {
        children: Vec<NodeDefinition>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        decorators: Vec<Decorator>,
    },
    Parallel {
        children: Vec<NodeDefinition>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        decorators: Vec<Decorator>,
    },
    Lotto {
        children: Vec<NodeDefinition>,
        /// Per-child weights; children past the end hold one ticket.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tickets: Vec<u32>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        decorators: Vec<Decorator>,
    },
    Repeat {
        /// Exact count, or the minimum when `maximum` is set. Absent means forever.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        iterations: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        maximum: Option<u32>,
        child: Box<NodeDefinition>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        decorators: Vec<Decorator>,
    },
    Flip {
        child: Box<NodeDefinition>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        decorators: Vec<Decorator>,
    },
    Action {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        decorators: Vec<Decorator>,
    },
    Condition {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        decorators: Vec<Decorator>,
    },
    Wait {
        /// Milliseconds, or the minimum when `maximum` is set.
        duration: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        maximum: Option<u64>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        decorators: Vec<Decorator>,
    },
}

impl NodeDefinition {
    pub fn root(child: NodeDefinition) -> Self {
        NodeDefinition::Root {
            child: Box::new(child),
            decorators: Vec::new(),
        }
    }

    pub fn sequence(children: Vec<NodeDefinition>) -> Self {
        NodeDefinition::Sequence {
            children,
            decorators: Vec::new(),
        }
    }

    pub fn selector(children: Vec<NodeDefinition>) -> Self {
        NodeDefinition::Selector {
            children,
            decorators: Vec::new(),
        }
    }

    pub fn parallel(children: Vec<NodeDefinition>) -> Self {
        NodeDefinition::Parallel {
            children,
            decorators: Vec::new(),
        }
    }

    pub fn lotto(children: Vec<NodeDefinition>, tickets: Vec<u32>) -> Self {
        NodeDefinition::Lotto {
            children,
            tickets,
            decorators: Vec::new(),
        }
    }

    pub fn repeat(iterations: Option<u32>, maximum: Option<u32>, child: NodeDefinition) -> Self {
        NodeDefinition::Repeat {
            iterations,
            maximum,
            child: Box::new(child),
            decorators: Vec::new(),
        }
    }

    pub fn flip(child: NodeDefinition) -> Self {
        NodeDefinition::Flip {
            child: Box::new(child),
            decorators: Vec::new(),
        }
    }

    pub fn action(name: impl Into<String>) -> Self {
        NodeDefinition::Action {
            name: name.into(),
            data: None,
            decorators: Vec::new(),
        }
    }

    pub fn action_with_data(name: impl Into<String>, data: Value) -> Self {
        NodeDefinition::Action {
            name: name.into(),
            data: Some(data),
            decorators: Vec::new(),
        }
    }

    pub fn condition(name: impl Into<String>) -> Self {
        NodeDefinition::Condition {
            name: name.into(),
            decorators: Vec::new(),
        }
    }

    pub fn wait(duration: u64, maximum: Option<u64>) -> Self {
        NodeDefinition::Wait {
            duration,
            maximum,
            decorators: Vec::new(),
        }
    }

    /// Append a decorator. Order matters: only the first entry/step/exit hook fires.
    pub fn with_decorator(mut self, decorator: Decorator) -> Self {
        self.decorators_mut().push(decorator);
        self
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeDefinition::Root { .. } => NodeType::Root,
            NodeDefinition::Sequence { .. } => NodeType::Sequence,
            NodeDefinition::Selector { .. } => NodeType::Selector,
            NodeDefinition::Parallel { .. } => NodeType::Parallel,
            NodeDefinition::Lotto { .. } => NodeType::Lotto,
            NodeDefinition::Repeat { .. } => NodeType::Repeat,
            NodeDefinition::Flip { .. } => NodeType::Flip,
            NodeDefinition::Action { .. } => NodeType::Action,
            NodeDefinition::Condition { .. } => NodeType::Condition,
            NodeDefinition::Wait { .. } => NodeType::Wait,
        }
    }

    pub fn decorators(&self) -> &[Decorator] {
        match self {
            NodeDefinition::Root { decorators, .. }
            | NodeDefinition::Sequence { decorators, .. }
            | NodeDefinition::Selector { decorators, .. }
            | NodeDefinition::Parallel { decorators, .. }
            | NodeDefinition::Lotto { decorators, .. }
            | NodeDefinition::Repeat { decorators, .. }
            | NodeDefinition::Flip { decorators, .. }
            | NodeDefinition::Action { decorators, .. }
            | NodeDefinition::Condition { decorators, .. }
            | NodeDefinition::Wait { decorators, .. } => decorators,
        }
    }

    fn decorators_mut(&mut self) -> &mut Vec<Decorator> {
        match self {
            NodeDefinition::Root { decorators, .. }
            | NodeDefinition::Sequence { decorators, .. }
            | NodeDefinition::Selector { decorators, .. }
            | NodeDefinition::Parallel { decorators, .. }
            | NodeDefinition::Lotto { decorators, .. }
            | NodeDefinition::Repeat { decorators, .. }
            | NodeDefinition::Flip { decorators, .. }
            | NodeDefinition::Action { decorators, .. }
            | NodeDefinition::Condition { decorators, .. }
            | NodeDefinition::Wait { decorators, .. } => decorators,
        }
    }

    pub fn children(&self) -> Vec<&NodeDefinition> {
        match self {
            NodeDefinition::Root { child, .. }
            | NodeDefinition::Repeat { child, .. }
            | NodeDefinition::Flip { child, .. } => vec![child.as_ref()],
            NodeDefinition::Sequence { children, .. }
            | NodeDefinition::Selector { children, .. }
            | NodeDefinition::Parallel { children, .. }
            | NodeDefinition::Lotto { children, .. } => children.iter().collect(),
            NodeDefinition::Action { .. }
            | NodeDefinition::Condition { .. }
            | NodeDefinition::Wait { .. } => Vec::new(),
        }
    }

    /// Check the whole definition. A `root` is only accepted at the top.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        self.validate_node(true)
    }

    fn validate_node(&self, top: bool) -> Result<(), DefinitionError> {
        match self {
            NodeDefinition::Root { .. } if !top => return Err(DefinitionError::NestedRoot),
            NodeDefinition::Sequence { children, .. }
            | NodeDefinition::Selector { children, .. }
            | NodeDefinition::Parallel { children, .. }
                if children.is_empty() =>
            {
                return Err(DefinitionError::NoChildren(self.node_type()));
            }
            NodeDefinition::Lotto {
                children, tickets, ..
            } => {
                if children.is_empty() {
                    return Err(DefinitionError::NoChildren(NodeType::Lotto));
                }
                if tickets.len() > children.len() {
                    return Err(DefinitionError::TooManyTickets {
                        tickets: tickets.len(),
                        children: children.len(),
                    });
                }
            }
            NodeDefinition::Repeat {
                iterations,
                maximum: Some(maximum),
                ..
            } => match iterations {
                None => return Err(DefinitionError::MaximumWithoutIterations),
                Some(minimum) if maximum < minimum => {
                    return Err(DefinitionError::MaximumBelowMinimum {
                        node: NodeType::Repeat,
                        minimum: u64::from(*minimum),
                        maximum: u64::from(*maximum),
                    });
                }
                Some(_) => {}
            },
            NodeDefinition::Wait {
                duration,
                maximum: Some(maximum),
                ..
            } if maximum < duration => {
                return Err(DefinitionError::MaximumBelowMinimum {
                    node: NodeType::Wait,
                    minimum: *duration,
                    maximum: *maximum,
                });
            }
            _ => {}
        }

        self.children()
            .into_iter()
            .try_for_each(|child| child.validate_node(false))
    }

    pub fn from_json_str(json: &str) -> Result<Self, DefinitionError> {
        let definition: Self = serde_json::from_str(json)?;
        definition.validate()?;
        Ok(definition)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, DefinitionError> {
        let definition: Self = serde_yaml::from_str(yaml)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Load a definition from disk. `.json` files are read as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tree definition from {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let definition = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        };
        definition
            .with_context(|| format!("Failed to parse tree definition from {}", path.display()))
    }
}
