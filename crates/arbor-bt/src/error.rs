use core::fmt;

use arbor_core::State;
use thiserror::Error;

use crate::{NodeId, NodeType};

/// Which kind of blackboard callable a node tried to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Action,
    Condition,
    Guard,
    Entry,
    Step,
    Exit,
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FunctionKind::Action => "action",
            FunctionKind::Condition => "condition",
            FunctionKind::Guard => "guard condition",
            FunctionKind::Entry => "entry hook",
            FunctionKind::Step => "step hook",
            FunctionKind::Exit => "exit hook",
        })
    }
}

/// Errors surfaced to the caller of a tick.
#[derive(Debug, Error)]
pub enum BtError {
    #[error("{kind} '{name}' is not defined on the blackboard")]
    BlackboardFunctionMissing { kind: FunctionKind, name: String },

    #[error("action '{action}' returned an invalid result: {detail}")]
    InvalidActionResult { action: String, detail: String },

    #[error("node {node} was left in unexpected state {state} by its update")]
    InvalidChildState { node: NodeId, state: State },

    #[error("cannot draw a lotto winner when there are no participants or tickets")]
    EmptyLottoDraw,

    /// A guard interrupt reached the tree boundary without meeting the node that raised it.
    #[error("guard interrupt raised by node {origin} was not handled inside the tree")]
    UnhandledGuard { origin: NodeId },

    #[error("invalid tree definition: {0}")]
    Definition(#[from] DefinitionError),
}

impl BtError {
    pub(crate) fn missing(kind: FunctionKind, name: &str) -> Self {
        BtError::BlackboardFunctionMissing {
            kind,
            name: name.to_string(),
        }
    }
}

/// Problems with a structural tree definition, reported before any node exists.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("a root node may only appear at the top of the tree")]
    NestedRoot,

    #[error("{0} node needs at least one child")]
    NoChildren(NodeType),

    #[error("lotto has {tickets} ticket weights for {children} children")]
    TooManyTickets { tickets: usize, children: usize },

    #[error("repeat maximum requires an iteration count")]
    MaximumWithoutIterations,

    #[error("{node} maximum {maximum} is below its minimum {minimum}")]
    MaximumBelowMinimum {
        node: NodeType,
        minimum: u64,
        maximum: u64,
    },

    #[error("failed to parse JSON definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse YAML definition: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Why a node update stopped early.
///
/// `Guard` is control flow, not an error: it unwinds to the node named by `origin`, which
/// aborts its subtree and fails. It never leaves a tick.
#[derive(Debug)]
pub(crate) enum Halt {
    Guard { origin: NodeId },
    Error(BtError),
}

impl From<BtError> for Halt {
    fn from(error: BtError) -> Self {
        Halt::Error(error)
    }
}
