#![allow(dead_code)]

use std::collections::BTreeMap;

use arbor_bt::{BehaviourTree, NodeDetails, NodeDefinition};
use arbor_core::{ActionReturn, FnBlackboard, HookArgs, Settle, State};
use serde_json::Value;

/// Blackboard state that remembers every action and hook call.
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<String>,
    pub flags: BTreeMap<String, bool>,
    pub settles: Vec<Settle>,
}

impl Recorder {
    pub fn count(&self, name: &str) -> usize {
        self.calls.iter().filter(|call| *call == name).count()
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn set(&mut self, name: &str, value: bool) {
        self.flags.insert(name.to_string(), value);
    }
}

pub type Board = FnBlackboard<Recorder>;

pub fn board() -> Board {
    FnBlackboard::new(Recorder::default())
}

/// Action returning the scripted results in order, repeating the last one forever.
/// `None` means "still running".
pub fn scripted(
    name: &'static str,
    script: Vec<Option<State>>,
) -> impl FnMut(&mut Recorder, Option<&Value>) -> ActionReturn + 'static {
    let mut calls = 0usize;
    move |recorder, _data| {
        recorder.calls.push(name.to_string());
        let result = script[calls.min(script.len() - 1)];
        calls += 1;
        ActionReturn::from(result)
    }
}

pub fn always(
    name: &'static str,
    state: State,
) -> impl FnMut(&mut Recorder, Option<&Value>) -> ActionReturn + 'static {
    scripted(name, vec![Some(state)])
}

pub fn running(name: &'static str) -> impl FnMut(&mut Recorder, Option<&Value>) -> ActionReturn + 'static {
    scripted(name, vec![None])
}

/// Hook that records `label:entry`, `label:step` or `label:exit(succeeded,aborted)`.
pub fn hook(label: &'static str) -> impl FnMut(&mut Recorder, HookArgs) + 'static {
    move |recorder, args| {
        let call = match args {
            HookArgs::Entry => format!("{label}:entry"),
            HookArgs::Step => format!("{label}:step"),
            HookArgs::Exit(status) => {
                format!("{label}:exit({},{})", status.succeeded, status.aborted)
            }
        };
        recorder.calls.push(call);
    }
}

pub fn flag(name: &'static str) -> impl FnMut(&Recorder) -> bool + 'static {
    move |recorder| recorder.flag(name)
}

pub fn tree(definition: &NodeDefinition) -> BehaviourTree {
    BehaviourTree::builder(definition)
        .with_seed(7)
        .build()
        .expect("tree assembles")
}

pub fn row<'a>(rows: &'a [NodeDetails], caption: &str) -> &'a NodeDetails {
    rows.iter()
        .find(|row| row.caption == caption)
        .unwrap_or_else(|| panic!("no node captioned {caption}"))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
