use arbor_core::{Blackboard, HookArgs};
use serde::{Deserialize, Serialize};

use crate::{BtError, FunctionKind};

/// Something attached to a node: a lifecycle hook or a guard.
///
/// Hooks name a blackboard hook function; guards name a blackboard condition. Names are only
/// resolved when the decorator fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Decorator {
    /// Called on the update that takes the node out of `Ready`.
    Entry { function: String },
    /// Called on every update.
    Step { function: String },
    /// Called when the node finishes or is aborted.
    Exit { function: String },
    /// Guard satisfied while `condition` is false.
    Until { condition: String },
    /// Guard satisfied while `condition` is true.
    While { condition: String },
}

impl Decorator {
    pub fn entry(function: impl Into<String>) -> Self {
        Decorator::Entry {
            function: function.into(),
        }
    }

    pub fn step(function: impl Into<String>) -> Self {
        Decorator::Step {
            function: function.into(),
        }
    }

    pub fn exit(function: impl Into<String>) -> Self {
        Decorator::Exit {
            function: function.into(),
        }
    }

    pub fn until(condition: impl Into<String>) -> Self {
        Decorator::Until {
            condition: condition.into(),
        }
    }

    pub fn while_(condition: impl Into<String>) -> Self {
        Decorator::While {
            condition: condition.into(),
        }
    }

    pub fn is_guard(&self) -> bool {
        matches!(self, Decorator::Until { .. } | Decorator::While { .. })
    }

    pub fn guard(&self) -> Option<Guard> {
        match self {
            Decorator::Until { condition } => Some(Guard::new(GuardKind::Until, condition)),
            Decorator::While { condition } => Some(Guard::new(GuardKind::While, condition)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardKind {
    Until,
    While,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    kind: GuardKind,
    condition: String,
}

impl Guard {
    pub fn new(kind: GuardKind, condition: impl Into<String>) -> Self {
        Self {
            kind,
            condition: condition.into(),
        }
    }

    pub fn kind(&self) -> GuardKind {
        self.kind
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn is_satisfied(&self, board: &mut dyn Blackboard) -> Result<bool, BtError> {
        let holds = board
            .check_condition(&self.condition)
            .ok_or_else(|| BtError::missing(FunctionKind::Guard, &self.condition))?;
        Ok(match self.kind {
            GuardKind::Until => !holds,
            GuardKind::While => holds,
        })
    }
}

/// First hook of the matching lifecycle point; later duplicates are ignored.
pub(crate) fn find_hook(decorators: &[Decorator], kind: FunctionKind) -> Option<&str> {
    decorators.iter().find_map(|decorator| match (decorator, kind) {
        (Decorator::Entry { function }, FunctionKind::Entry)
        | (Decorator::Step { function }, FunctionKind::Step)
        | (Decorator::Exit { function }, FunctionKind::Exit) => Some(function.as_str()),
        _ => None,
    })
}

pub(crate) fn call_hook(
    board: &mut dyn Blackboard,
    kind: FunctionKind,
    function: &str,
    args: HookArgs,
) -> Result<(), BtError> {
    board
        .call_hook(function, args)
        .ok_or_else(|| BtError::missing(kind, function))
}
