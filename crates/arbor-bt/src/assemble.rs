//! Turns a [`NodeDefinition`] into a live node graph with guard paths attached.

use crate::nodes::{
    Action, Condition, Flip, Lotto, Parallel, Repeat, Root, Selector, Sequence, Wait,
};
use crate::{DefinitionError, GuardEntry, GuardPath, Node, NodeDefinition, NodeKind};

/// Validate `definition` and build its node graph.
///
/// The result is always a root node; any other top-level definition is wrapped in one. Every
/// node leaves with a guard path listing its guarded ancestors (itself included), root first.
pub fn assemble(definition: &NodeDefinition) -> Result<Node, DefinitionError> {
    definition.validate()?;

    let mut root = match definition {
        NodeDefinition::Root { .. } => build(definition),
        other => Node::new(NodeKind::Root(Root::new(build(other))), Vec::new()),
    };

    let mut ancestors = Vec::new();
    attach_guard_paths(&mut root, &mut ancestors);
    Ok(root)
}

fn build(definition: &NodeDefinition) -> Node {
    let kind = match definition {
        NodeDefinition::Root { child, .. } => NodeKind::Root(Root::new(build(child))),
        NodeDefinition::Sequence { children, .. } => {
            NodeKind::Sequence(Sequence::new(build_all(children)))
        }
        NodeDefinition::Selector { children, .. } => {
            NodeKind::Selector(Selector::new(build_all(children)))
        }
        NodeDefinition::Parallel { children, .. } => {
            NodeKind::Parallel(Parallel::new(build_all(children)))
        }
        NodeDefinition::Lotto {
            children, tickets, ..
        } => NodeKind::Lotto(Lotto::new(build_all(children), tickets.clone())),
        NodeDefinition::Repeat {
            iterations,
            maximum,
            child,
            ..
        } => NodeKind::Repeat(Repeat::new(build(child), *iterations, *maximum)),
        NodeDefinition::Flip { child, .. } => NodeKind::Flip(Flip::new(build(child))),
        NodeDefinition::Action { name, data, .. } => {
            NodeKind::Action(Action::new(name.clone(), data.clone()))
        }
        NodeDefinition::Condition { name, .. } => NodeKind::Condition(Condition::new(name.clone())),
        NodeDefinition::Wait {
            duration, maximum, ..
        } => NodeKind::Wait(Wait::new(*duration, *maximum)),
    };

    Node::new(kind, definition.decorators().to_vec())
}

fn build_all(children: &[NodeDefinition]) -> Vec<Node> {
    children.iter().map(build).collect()
}

/// Depth-first walk carrying the guarded ancestors of the current node.
fn attach_guard_paths(node: &mut Node, ancestors: &mut Vec<GuardEntry>) {
    let guards = node.guards();
    let pushed = !guards.is_empty();
    if pushed {
        ancestors.push(GuardEntry {
            node: node.id(),
            guards,
        });
    }

    node.assign_guard_path(GuardPath::new(ancestors.clone()));
    for child in node.children_mut() {
        attach_guard_paths(child, ancestors);
    }

    if pushed {
        ancestors.pop();
    }
}
