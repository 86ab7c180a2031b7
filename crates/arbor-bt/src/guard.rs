use arbor_core::Blackboard;

use crate::error::Halt;
use crate::{Guard, NodeId};

/// A guarded ancestor (or the node itself) and the guards it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardEntry {
    pub node: NodeId,
    pub guards: Vec<Guard>,
}

/// Root-first list of every guarded node between the root and a node, inclusive.
///
/// Evaluated at the start of every update of the owning node, so an ancestor whose guard no
/// longer holds is detected even while only a deep descendant is running.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardPath {
    entries: Vec<GuardEntry>,
}

impl GuardPath {
    pub fn new(entries: Vec<GuardEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[GuardEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check every guard, outermost node first. The first failure names the node that owns it.
    pub(crate) fn evaluate(&self, board: &mut dyn Blackboard) -> Result<(), Halt> {
        for entry in &self.entries {
            for guard in &entry.guards {
                if !guard.is_satisfied(board)? {
                    return Err(Halt::Guard { origin: entry.node });
                }
            }
        }
        Ok(())
    }
}
