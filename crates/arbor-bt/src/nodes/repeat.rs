use arbor_core::{DeterministicRng, State};

use super::{unexpected_state, Node, NodeId};
use crate::context::TickContext;
use crate::error::Halt;

/// Re-runs a single child a fixed, random or unbounded number of times.
///
/// The repeat fails as soon as its child fails. With no iteration count it never succeeds.
#[derive(Debug)]
pub struct Repeat {
    child: Box<Node>,
    iterations: Option<u32>,
    maximum: Option<u32>,
    completed: u32,
    target: Option<u32>,
}

impl Repeat {
    /// `iterations` is the exact count, or the lower bound when `maximum` is set.
    pub fn new(child: Node, iterations: Option<u32>, maximum: Option<u32>) -> Self {
        Self {
            child: Box::new(child),
            iterations,
            maximum,
            completed: 0,
            target: None,
        }
    }

    pub fn child(&self) -> &Node {
        &self.child
    }

    pub(crate) fn child_mut(&mut self) -> &mut Node {
        &mut self.child
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Iteration count resolved for the current run; `None` when unbounded or not yet started.
    pub fn target(&self) -> Option<u32> {
        self.target
    }

    pub fn caption(&self) -> String {
        match (self.iterations, self.maximum) {
            (Some(min), Some(max)) => format!("REPEAT {min}x-{max}x"),
            (Some(count), None) => format!("REPEAT {count}x"),
            (None, _) => "REPEAT".to_string(),
        }
    }

    pub(crate) fn clear_run(&mut self) {
        self.completed = 0;
        self.target = None;
    }

    fn resolve_target(&self, rng: &mut dyn DeterministicRng) -> Option<u32> {
        match (self.iterations, self.maximum) {
            (Some(min), Some(max)) => {
                Some(rng.range_inclusive(u64::from(min), u64::from(max)) as u32)
            }
            (Some(count), None) => Some(count),
            (None, _) => None,
        }
    }

    fn can_iterate(&self) -> bool {
        self.target.map_or(true, |target| self.completed < target)
    }

    pub(crate) fn on_update(
        &mut self,
        id: NodeId,
        state: &mut State,
        cx: &mut TickContext<'_>,
    ) -> Result<(), Halt> {
        if *state == State::Ready {
            self.child.reset();
            self.completed = 0;
            self.target = self.resolve_target(cx.rng);
            tracing::debug!(node = %id, target = ?self.target, "repeat starting");
        }

        if !self.can_iterate() {
            *state = State::Succeeded;
            return Ok(());
        }

        *state = State::Running;
        if self.child.state() == State::Succeeded {
            self.child.reset();
        }

        self.child.update(cx)?;
        match self.child.state() {
            State::Failed => *state = State::Failed,
            State::Succeeded => {
                self.completed += 1;
                cx.emit("bt.repeat.iteration", id.get(), u64::from(self.completed));
                if !self.can_iterate() {
                    *state = State::Succeeded;
                }
            }
            State::Running => {}
            State::Ready => return Err(unexpected_state(&self.child)),
        }
        Ok(())
    }
}
