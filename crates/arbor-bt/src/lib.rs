//! Behaviour tree runtime built on `arbor-core`.
//!
//! Build a [`BehaviourTree`] once from a [`NodeDefinition`], then call
//! [`BehaviourTree::step`] once per logic frame with the caller-owned blackboard.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod assemble;
pub mod context;
pub mod decorator;
pub mod definition;
pub mod details;
pub mod error;
pub mod guard;
pub mod nodes;
pub mod tree;

pub use assemble::assemble;
pub use context::TickContext;
pub use decorator::{Decorator, Guard, GuardKind};
pub use definition::NodeDefinition;
pub use details::{DecoratorDetails, NodeDetails, RunDetails};
pub use error::{BtError, DefinitionError, FunctionKind};
pub use guard::{GuardEntry, GuardPath};
pub use nodes::lotto::LottoDraw;
pub use nodes::{Node, NodeId, NodeKind, NodeType};
pub use tree::{BehaviourTree, TreeBuilder};
