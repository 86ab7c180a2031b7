use arbor_core::State;

use super::{unexpected_state, update_child, Node};
use crate::context::TickContext;
use crate::error::Halt;

/// Runs children in order until one fails or all succeed.
#[derive(Debug)]
pub struct Sequence {
    children: Vec<Node>,
}

impl Sequence {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    pub(crate) fn on_update(
        &mut self,
        state: &mut State,
        cx: &mut TickContext<'_>,
    ) -> Result<(), Halt> {
        let last = self.children.len().saturating_sub(1);
        for (index, child) in self.children.iter_mut().enumerate() {
            match update_child(child, cx)? {
                State::Succeeded if index == last => {
                    *state = State::Succeeded;
                    return Ok(());
                }
                State::Succeeded => continue,
                State::Failed => {
                    *state = State::Failed;
                    return Ok(());
                }
                State::Running => {
                    *state = State::Running;
                    return Ok(());
                }
                State::Ready => return Err(unexpected_state(child)),
            }
        }
        Ok(())
    }
}

/// Runs children in order until one succeeds or all fail.
#[derive(Debug)]
pub struct Selector {
    children: Vec<Node>,
}

impl Selector {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    pub(crate) fn on_update(
        &mut self,
        state: &mut State,
        cx: &mut TickContext<'_>,
    ) -> Result<(), Halt> {
        let last = self.children.len().saturating_sub(1);
        for (index, child) in self.children.iter_mut().enumerate() {
            match update_child(child, cx)? {
                State::Failed if index == last => {
                    *state = State::Failed;
                    return Ok(());
                }
                State::Failed => continue,
                State::Succeeded => {
                    *state = State::Succeeded;
                    return Ok(());
                }
                State::Running => {
                    *state = State::Running;
                    return Ok(());
                }
                State::Ready => return Err(unexpected_state(child)),
            }
        }
        Ok(())
    }
}

/// Updates every child each tick; fails as soon as one fails, succeeds once all have.
#[derive(Debug)]
pub struct Parallel {
    children: Vec<Node>,
}

impl Parallel {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    pub(crate) fn on_update(
        &mut self,
        state: &mut State,
        cx: &mut TickContext<'_>,
    ) -> Result<(), Halt> {
        let mut succeeded = 0;
        let mut failed = false;

        for child in self.children.iter_mut() {
            match update_child(child, cx)? {
                State::Succeeded => succeeded += 1,
                State::Failed => {
                    failed = true;
                    break;
                }
                State::Running => {}
                State::Ready => return Err(unexpected_state(child)),
            }
        }

        if failed {
            *state = State::Failed;
            for child in self.children.iter_mut() {
                if child.state() == State::Running {
                    child.abort(cx)?;
                }
            }
        } else if succeeded == self.children.len() {
            *state = State::Succeeded;
        } else {
            *state = State::Running;
        }
        Ok(())
    }
}

/// Single child with its terminal state inverted.
#[derive(Debug)]
pub struct Flip {
    child: Box<Node>,
}

impl Flip {
    pub fn new(child: Node) -> Self {
        Self {
            child: Box::new(child),
        }
    }

    pub fn child(&self) -> &Node {
        &self.child
    }

    pub(crate) fn child_mut(&mut self) -> &mut Node {
        &mut self.child
    }

    pub(crate) fn on_update(
        &mut self,
        state: &mut State,
        cx: &mut TickContext<'_>,
    ) -> Result<(), Halt> {
        match update_child(&mut self.child, cx)? {
            State::Ready => Err(unexpected_state(&self.child)),
            child_state => {
                *state = child_state.flipped();
                Ok(())
            }
        }
    }
}

/// Top of every tree: one child, mirrored exactly.
#[derive(Debug)]
pub struct Root {
    child: Box<Node>,
}

impl Root {
    pub fn new(child: Node) -> Self {
        Self {
            child: Box::new(child),
        }
    }

    pub fn child(&self) -> &Node {
        &self.child
    }

    pub(crate) fn child_mut(&mut self) -> &mut Node {
        &mut self.child
    }

    pub(crate) fn on_update(
        &mut self,
        state: &mut State,
        cx: &mut TickContext<'_>,
    ) -> Result<(), Halt> {
        match update_child(&mut self.child, cx)? {
            State::Ready => Err(unexpected_state(&self.child)),
            child_state => {
                *state = child_state;
                Ok(())
            }
        }
    }
}
