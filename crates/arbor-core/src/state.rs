use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The state of a behaviour tree node.
///
/// A node starts `Ready`, may spend any number of ticks `Running` and eventually settles in one
/// of the two terminal states. Only `reset` brings a terminal node back to `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum State {
    #[default]
    Ready,
    Running,
    Succeeded,
    Failed,
}

impl State {
    pub fn is_terminal(self) -> bool {
        matches!(self, State::Succeeded | State::Failed)
    }

    /// `Ready` or `Running`: the node still wants updates.
    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }

    /// Swap the two terminal states, leaving `Ready`/`Running` untouched.
    pub fn flipped(self) -> Self {
        match self {
            State::Succeeded => State::Failed,
            State::Failed => State::Succeeded,
            other => other,
        }
    }

    /// Small stable code for trace events.
    pub fn code(self) -> u64 {
        match self {
            State::Ready => 0,
            State::Running => 1,
            State::Succeeded => 2,
            State::Failed => 3,
        }
    }
}

impl From<bool> for State {
    fn from(succeeded: bool) -> Self {
        if succeeded {
            State::Succeeded
        } else {
            State::Failed
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            State::Ready => "READY",
            State::Running => "RUNNING",
            State::Succeeded => "SUCCEEDED",
            State::Failed => "FAILED",
        })
    }
}
