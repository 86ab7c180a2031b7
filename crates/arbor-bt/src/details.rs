use arbor_core::State;
use serde::Serialize;

use crate::{Decorator, Node, NodeId, NodeType};

/// One row of a flattened tree, for debuggers and inspectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDetails {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub caption: String,
    pub state: State,
    /// `None` when the node carries no decorators.
    pub decorators: Option<Vec<DecoratorDetails>>,
    pub parent_id: Option<NodeId>,
    pub run: Option<RunDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoratorDetails {
    #[serde(flatten)]
    pub decorator: Decorator,
    pub is_guard: bool,
}

impl From<&Decorator> for DecoratorDetails {
    fn from(decorator: &Decorator) -> Self {
        Self {
            is_guard: decorator.is_guard(),
            decorator: decorator.clone(),
        }
    }
}

/// Run-scoped fields of the variants that have any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunDetails {
    Action {
        pending: bool,
    },
    Wait {
        #[serde(rename = "startedAt")]
        started_at: Option<u64>,
        duration: Option<u64>,
    },
    Repeat {
        completed: u32,
        target: Option<u32>,
    },
    Lotto {
        winner: Option<usize>,
    },
}

/// Pre-order listing of `root` and all of its descendants.
pub fn flatten(root: &Node) -> Vec<NodeDetails> {
    let mut rows = Vec::new();
    push_rows(root, None, &mut rows);
    rows
}

fn push_rows(node: &Node, parent_id: Option<NodeId>, rows: &mut Vec<NodeDetails>) {
    let decorators = node.decorators();
    rows.push(NodeDetails {
        id: node.id(),
        node_type: node.node_type(),
        caption: node.caption(),
        state: node.state(),
        decorators: (!decorators.is_empty())
            .then(|| decorators.iter().map(DecoratorDetails::from).collect()),
        parent_id,
        run: node.kind().run_details(),
    });
    for child in node.children() {
        push_rows(child, Some(node.id()), rows);
    }
}
