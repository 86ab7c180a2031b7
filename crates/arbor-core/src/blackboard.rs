use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Deferred, State};

/// What an action callable hands back to its node.
#[derive(Debug)]
pub enum ActionReturn {
    /// Nothing to report yet; the node stays `Running` and calls again next tick.
    Running,
    /// A final state for this run. Anything other than `Succeeded`/`Failed` is rejected by the
    /// node.
    Finished(State),
    /// The outcome settles later; the node polls it instead of calling again.
    Deferred(Deferred),
}

impl From<State> for ActionReturn {
    fn from(state: State) -> Self {
        ActionReturn::Finished(state)
    }
}

impl From<Option<State>> for ActionReturn {
    fn from(state: Option<State>) -> Self {
        state.map_or(ActionReturn::Running, ActionReturn::Finished)
    }
}

impl From<Deferred> for ActionReturn {
    fn from(deferred: Deferred) -> Self {
        ActionReturn::Deferred(deferred)
    }
}

/// Arguments passed to an exit hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExitStatus {
    pub succeeded: bool,
    pub aborted: bool,
}

/// Which lifecycle point a hook is being called for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookArgs {
    Entry,
    Step,
    Exit(ExitStatus),
}

/// The capability surface a tree needs from its caller-owned state.
///
/// Every lookup happens at call time. Returning `None` means "no callable registered under
/// this name"; the tree turns that into an error for the current tick.
pub trait Blackboard {
    fn call_action(&mut self, name: &str, data: Option<&Value>) -> Option<ActionReturn>;

    /// Evaluate a named predicate. Used by condition nodes and by until/while guards.
    fn check_condition(&mut self, name: &str) -> Option<bool>;

    fn call_hook(&mut self, name: &str, args: HookArgs) -> Option<()>;
}

type ActionFn<S> = Box<dyn FnMut(&mut S, Option<&Value>) -> ActionReturn>;
type ConditionFn<S> = Box<dyn FnMut(&S) -> bool>;
type HookFn<S> = Box<dyn FnMut(&mut S, HookArgs)>;

/// A [`Blackboard`] made of named closures over a user state `S`.
///
/// ```
/// use arbor_core::{Blackboard, FnBlackboard, State};
///
/// let mut board = FnBlackboard::new(0u32)
///     .with_action("count", |n, _| {
///         *n += 1;
///         State::Succeeded.into()
///     })
///     .with_condition("counted", |n| *n > 0);
///
/// assert_eq!(board.check_condition("counted"), Some(false));
/// assert!(board.call_action("count", None).is_some());
/// assert_eq!(board.check_condition("counted"), Some(true));
/// assert!(board.call_action("missing", None).is_none());
/// ```
pub struct FnBlackboard<S> {
    state: S,
    actions: BTreeMap<String, ActionFn<S>>,
    conditions: BTreeMap<String, ConditionFn<S>>,
    hooks: BTreeMap<String, HookFn<S>>,
}

impl<S> FnBlackboard<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            actions: BTreeMap::new(),
            conditions: BTreeMap::new(),
            hooks: BTreeMap::new(),
        }
    }

    pub fn with_action(
        mut self,
        name: impl Into<String>,
        action: impl FnMut(&mut S, Option<&Value>) -> ActionReturn + 'static,
    ) -> Self {
        self.actions.insert(name.into(), Box::new(action));
        self
    }

    pub fn with_condition(
        mut self,
        name: impl Into<String>,
        condition: impl FnMut(&S) -> bool + 'static,
    ) -> Self {
        self.conditions.insert(name.into(), Box::new(condition));
        self
    }

    pub fn with_hook(
        mut self,
        name: impl Into<String>,
        hook: impl FnMut(&mut S, HookArgs) + 'static,
    ) -> Self {
        self.hooks.insert(name.into(), Box::new(hook));
        self
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn into_inner(self) -> S {
        self.state
    }
}

impl<S: Default> Default for FnBlackboard<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Blackboard for FnBlackboard<S> {
    fn call_action(&mut self, name: &str, data: Option<&Value>) -> Option<ActionReturn> {
        let action = self.actions.get_mut(name)?;
        Some(action(&mut self.state, data))
    }

    fn check_condition(&mut self, name: &str) -> Option<bool> {
        let condition = self.conditions.get_mut(name)?;
        Some(condition(&self.state))
    }

    fn call_hook(&mut self, name: &str, args: HookArgs) -> Option<()> {
        let hook = self.hooks.get_mut(name)?;
        hook(&mut self.state, args);
        Some(())
    }
}

impl<S: fmt::Debug> fmt::Debug for FnBlackboard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnBlackboard")
            .field("state", &self.state)
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("conditions", &self.conditions.keys().collect::<Vec<_>>())
            .field("hooks", &self.hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}
