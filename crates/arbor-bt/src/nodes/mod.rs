//! Live tree nodes.
//!
//! Every node shares one orchestration path ([`Node::update`]): guard path, entry hook, step
//! hook, the variant's own transition rule, exit hook. Variants in the submodules only decide
//! how their own state follows from their children (or from the blackboard, for leaves).

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use arbor_core::{ExitStatus, HookArgs, State};
use serde::{Deserialize, Serialize};

use crate::context::TickContext;
use crate::decorator::{call_hook, find_hook};
use crate::error::Halt;
use crate::{BtError, Decorator, FunctionKind, Guard, GuardPath, RunDetails};

pub mod composite;
pub mod leaf;
pub mod lotto;
pub mod repeat;

pub use composite::{Flip, Parallel, Root, Selector, Sequence};
pub use leaf::{Action, Condition, Wait};
pub use lotto::Lotto;
pub use repeat::Repeat;

/// Process-unique node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        NodeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Root,
    Sequence,
    Selector,
    Parallel,
    Lotto,
    Repeat,
    Flip,
    Action,
    Condition,
    Wait,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeType::Root => "root",
            NodeType::Sequence => "sequence",
            NodeType::Selector => "selector",
            NodeType::Parallel => "parallel",
            NodeType::Lotto => "lotto",
            NodeType::Repeat => "repeat",
            NodeType::Flip => "flip",
            NodeType::Action => "action",
            NodeType::Condition => "condition",
            NodeType::Wait => "wait",
        })
    }
}

/// The closed set of node variants.
#[derive(Debug)]
pub enum NodeKind {
    Root(Root),
    Sequence(Sequence),
    Selector(Selector),
    Parallel(Parallel),
    Lotto(Lotto),
    Repeat(Repeat),
    Flip(Flip),
    Action(Action),
    Condition(Condition),
    Wait(Wait),
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Root(_) => NodeType::Root,
            NodeKind::Sequence(_) => NodeType::Sequence,
            NodeKind::Selector(_) => NodeType::Selector,
            NodeKind::Parallel(_) => NodeType::Parallel,
            NodeKind::Lotto(_) => NodeType::Lotto,
            NodeKind::Repeat(_) => NodeType::Repeat,
            NodeKind::Flip(_) => NodeType::Flip,
            NodeKind::Action(_) => NodeType::Action,
            NodeKind::Condition(_) => NodeType::Condition,
            NodeKind::Wait(_) => NodeType::Wait,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            NodeKind::Root(n) => std::slice::from_ref(n.child()),
            NodeKind::Flip(n) => std::slice::from_ref(n.child()),
            NodeKind::Repeat(n) => std::slice::from_ref(n.child()),
            NodeKind::Sequence(n) => n.children(),
            NodeKind::Selector(n) => n.children(),
            NodeKind::Parallel(n) => n.children(),
            NodeKind::Lotto(n) => n.children(),
            NodeKind::Action(_) | NodeKind::Condition(_) | NodeKind::Wait(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Node] {
        match self {
            NodeKind::Root(n) => std::slice::from_mut(n.child_mut()),
            NodeKind::Flip(n) => std::slice::from_mut(n.child_mut()),
            NodeKind::Repeat(n) => std::slice::from_mut(n.child_mut()),
            NodeKind::Sequence(n) => n.children_mut(),
            NodeKind::Selector(n) => n.children_mut(),
            NodeKind::Parallel(n) => n.children_mut(),
            NodeKind::Lotto(n) => n.children_mut(),
            NodeKind::Action(_) | NodeKind::Condition(_) | NodeKind::Wait(_) => &mut [],
        }
    }

    pub fn caption(&self) -> String {
        match self {
            NodeKind::Root(_) => "ROOT".to_string(),
            NodeKind::Sequence(_) => "SEQUENCE".to_string(),
            NodeKind::Selector(_) => "SELECTOR".to_string(),
            NodeKind::Parallel(_) => "PARALLEL".to_string(),
            NodeKind::Flip(_) => "FLIP".to_string(),
            NodeKind::Lotto(n) => n.caption(),
            NodeKind::Repeat(n) => n.caption(),
            NodeKind::Action(n) => n.name().to_string(),
            NodeKind::Condition(n) => n.name().to_string(),
            NodeKind::Wait(n) => n.caption(),
        }
    }

    pub fn run_details(&self) -> Option<RunDetails> {
        match self {
            NodeKind::Action(n) => Some(RunDetails::Action {
                pending: n.is_pending(),
            }),
            NodeKind::Wait(n) => Some(RunDetails::Wait {
                started_at: n.started_at(),
                duration: n.resolved_duration(),
            }),
            NodeKind::Repeat(n) => Some(RunDetails::Repeat {
                completed: n.completed(),
                target: n.target(),
            }),
            NodeKind::Lotto(n) => Some(RunDetails::Lotto { winner: n.winner() }),
            _ => None,
        }
    }

    fn on_update(
        &mut self,
        id: NodeId,
        state: &mut State,
        cx: &mut TickContext<'_>,
    ) -> Result<(), Halt> {
        match self {
            NodeKind::Root(n) => n.on_update(state, cx),
            NodeKind::Sequence(n) => n.on_update(state, cx),
            NodeKind::Selector(n) => n.on_update(state, cx),
            NodeKind::Parallel(n) => n.on_update(state, cx),
            NodeKind::Lotto(n) => n.on_update(id, state, cx),
            NodeKind::Repeat(n) => n.on_update(id, state, cx),
            NodeKind::Flip(n) => n.on_update(state, cx),
            NodeKind::Action(n) => n.on_update(id, state, cx),
            NodeKind::Condition(n) => n.on_update(state, cx),
            NodeKind::Wait(n) => n.on_update(state, cx),
        }
    }

    /// Clear run-scoped fields. Composites reset their children.
    fn reset(&mut self) {
        match self {
            NodeKind::Lotto(n) => n.clear_winner(),
            NodeKind::Repeat(n) => n.clear_run(),
            NodeKind::Action(n) => n.discard_pending(),
            NodeKind::Wait(n) => n.clear_run(),
            _ => {}
        }
        for child in self.children_mut() {
            child.reset();
        }
    }
}

#[derive(Debug)]
pub struct Node {
    id: NodeId,
    state: State,
    decorators: Vec<Decorator>,
    guard_path: Option<GuardPath>,
    kind: NodeKind,
}

impl Node {
    pub fn new(kind: NodeKind, decorators: Vec<Decorator>) -> Self {
        Self {
            id: NodeId::next(),
            state: State::Ready,
            decorators,
            guard_path: None,
            kind,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn decorators(&self) -> &[Decorator] {
        &self.decorators
    }

    pub fn guards(&self) -> Vec<Guard> {
        self.decorators.iter().filter_map(Decorator::guard).collect()
    }

    pub fn guard_path(&self) -> Option<&GuardPath> {
        self.guard_path.as_ref()
    }

    pub fn children(&self) -> &[Node] {
        self.kind.children()
    }

    pub fn is_leaf(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Action(_) | NodeKind::Condition(_) | NodeKind::Wait(_)
        )
    }

    pub fn caption(&self) -> String {
        self.kind.caption()
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Node] {
        self.kind.children_mut()
    }

    /// A node gets its guard path once; later assignments are refused.
    pub(crate) fn assign_guard_path(&mut self, path: GuardPath) -> bool {
        if self.guard_path.is_some() {
            return false;
        }
        self.guard_path = Some(path);
        true
    }

    pub(crate) fn update(&mut self, cx: &mut TickContext<'_>) -> Result<(), Halt> {
        if self.state.is_terminal() {
            return Ok(());
        }

        match self.run(cx) {
            Err(Halt::Guard { origin }) if origin == self.id => {
                tracing::debug!(
                    node = %self.id,
                    node_type = %self.node_type(),
                    "guard unsatisfied, aborting subtree"
                );
                cx.emit("bt.guard.abort", self.id.get(), 0);
                self.abort(cx)?;
                self.state = State::Failed;
                Ok(())
            }
            other => other,
        }
    }

    fn run(&mut self, cx: &mut TickContext<'_>) -> Result<(), Halt> {
        if let Some(path) = self.guard_path.as_ref() {
            path.evaluate(cx.board)?;
        }

        if self.state == State::Ready {
            if let Some(function) = find_hook(&self.decorators, FunctionKind::Entry) {
                call_hook(cx.board, FunctionKind::Entry, function, HookArgs::Entry)?;
            }
        }

        if let Some(function) = find_hook(&self.decorators, FunctionKind::Step) {
            call_hook(cx.board, FunctionKind::Step, function, HookArgs::Step)?;
        }

        let before = self.state;
        self.kind.on_update(self.id, &mut self.state, cx)?;
        if before != self.state {
            tracing::trace!(node = %self.id, from = %before, to = %self.state, "state changed");
        }

        if self.state.is_terminal() {
            if let Some(function) = find_hook(&self.decorators, FunctionKind::Exit) {
                let status = ExitStatus {
                    succeeded: self.state == State::Succeeded,
                    aborted: false,
                };
                call_hook(cx.board, FunctionKind::Exit, function, HookArgs::Exit(status))?;
            }
        }
        Ok(())
    }

    /// Stop a running subtree: abort running children, reset, then fire the exit hook as aborted.
    pub(crate) fn abort(&mut self, cx: &mut TickContext<'_>) -> Result<(), BtError> {
        if self.state != State::Running {
            return Ok(());
        }

        for child in self.kind.children_mut() {
            child.abort(cx)?;
        }
        self.reset();
        cx.emit("bt.node.abort", self.id.get(), 0);

        if let Some(function) = find_hook(&self.decorators, FunctionKind::Exit) {
            let status = ExitStatus {
                succeeded: false,
                aborted: true,
            };
            call_hook(cx.board, FunctionKind::Exit, function, HookArgs::Exit(status))?;
        }
        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        self.state = State::Ready;
        self.kind.reset();
    }
}

/// Update `child` if it still wants updates and report where it ended up.
pub(crate) fn update_child(child: &mut Node, cx: &mut TickContext<'_>) -> Result<State, Halt> {
    if child.state().is_active() {
        child.update(cx)?;
    }
    Ok(child.state())
}

pub(crate) fn unexpected_state(child: &Node) -> Halt {
    Halt::Error(BtError::InvalidChildState {
        node: child.id(),
        state: child.state(),
    })
}
