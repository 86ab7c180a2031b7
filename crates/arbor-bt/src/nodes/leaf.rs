use arbor_core::{ActionReturn, Deferred, Settlement, State};
use serde_json::Value;

use super::NodeId;
use crate::context::TickContext;
use crate::error::Halt;
use crate::{BtError, FunctionKind};

/// Leaf that calls a named blackboard action.
#[derive(Debug)]
pub struct Action {
    name: String,
    data: Option<Value>,
    pending: Option<Deferred>,
}

impl Action {
    pub fn new(name: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            name: name.into(),
            data,
            pending: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Whether a deferred result is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the outstanding deferred result, if any. A later settlement is ignored.
    pub(crate) fn discard_pending(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!(action = %self.name, "discarding pending action result");
        }
    }

    fn invalid(&self, detail: impl Into<String>) -> BtError {
        BtError::InvalidActionResult {
            action: self.name.clone(),
            detail: detail.into(),
        }
    }

    fn settled_state(&self, settlement: Settlement) -> Result<State, BtError> {
        match settlement {
            Ok(state) if state.is_terminal() => Ok(state),
            Ok(state) => Err(self.invalid(format!("deferred result settled to {state}"))),
            Err(reason) => Err(self.invalid(format!("deferred result rejected: {reason}"))),
        }
    }

    pub(crate) fn on_update(
        &mut self,
        id: NodeId,
        state: &mut State,
        cx: &mut TickContext<'_>,
    ) -> Result<(), Halt> {
        if let Some(pending) = self.pending.as_mut() {
            let Some(settlement) = pending.try_settled() else {
                return Ok(());
            };
            self.pending = None;
            let settled = self.settled_state(settlement)?;
            tracing::debug!(node = %id, action = %self.name, state = %settled, "deferred action settled");
            *state = settled;
            return Ok(());
        }

        let returned = cx
            .board
            .call_action(&self.name, self.data.as_ref())
            .ok_or_else(|| BtError::missing(FunctionKind::Action, &self.name))?;

        match returned {
            ActionReturn::Running => *state = State::Running,
            ActionReturn::Finished(finished) if finished.is_terminal() => *state = finished,
            ActionReturn::Finished(other) => {
                return Err(self.invalid(format!("returned {other}")).into());
            }
            ActionReturn::Deferred(deferred) => {
                tracing::debug!(node = %id, action = %self.name, "action deferred its result");
                cx.emit("bt.action.deferred", id.get(), 0);
                self.pending = Some(deferred);
                *state = State::Running;
            }
        }
        Ok(())
    }
}

/// Leaf that succeeds or fails on a named blackboard predicate.
#[derive(Debug)]
pub struct Condition {
    name: String,
}

impl Condition {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn on_update(
        &mut self,
        state: &mut State,
        cx: &mut TickContext<'_>,
    ) -> Result<(), Halt> {
        let holds = cx
            .board
            .check_condition(&self.name)
            .ok_or_else(|| BtError::missing(FunctionKind::Condition, &self.name))?;
        *state = State::from(holds);
        Ok(())
    }
}

/// Leaf that stays running for a fixed or random number of milliseconds, then succeeds.
#[derive(Debug)]
pub struct Wait {
    duration: u64,
    maximum: Option<u64>,
    started_at: Option<u64>,
    resolved: Option<u64>,
}

impl Wait {
    /// With `maximum`, each run waits a uniform duration in `[duration, maximum]`.
    pub fn new(duration: u64, maximum: Option<u64>) -> Self {
        Self {
            duration,
            maximum,
            started_at: None,
            resolved: None,
        }
    }

    pub fn started_at(&self) -> Option<u64> {
        self.started_at
    }

    pub fn resolved_duration(&self) -> Option<u64> {
        self.resolved
    }

    pub fn caption(&self) -> String {
        match self.maximum {
            Some(max) => format!("WAIT {}ms-{}ms", self.duration, max),
            None => format!("WAIT {}ms", self.duration),
        }
    }

    pub(crate) fn clear_run(&mut self) {
        self.started_at = None;
        self.resolved = None;
    }

    pub(crate) fn on_update(
        &mut self,
        state: &mut State,
        cx: &mut TickContext<'_>,
    ) -> Result<(), Halt> {
        let now = cx.clock.now_ms();
        let (started_at, duration) = match (self.started_at, self.resolved) {
            (Some(started_at), Some(duration)) if *state != State::Ready => (started_at, duration),
            _ => {
                let duration = match self.maximum {
                    Some(max) => cx.rng.range_inclusive(self.duration, max),
                    None => self.duration,
                };
                self.started_at = Some(now);
                self.resolved = Some(duration);
                (now, duration)
            }
        };

        *state = if now.saturating_sub(started_at) >= duration {
            State::Succeeded
        } else {
            State::Running
        };
        Ok(())
    }
}
