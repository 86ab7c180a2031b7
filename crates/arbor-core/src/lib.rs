//! Engine-agnostic primitives shared by the arbor behaviour tree runtime.
//!
//! Nothing in here knows about trees: this crate defines node states, the blackboard
//! capability contract, deferred action results and the injectable sources of time and
//! randomness.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod blackboard;
pub mod clock;
pub mod deferred;
pub mod rng;
pub mod state;

pub use blackboard::{ActionReturn, Blackboard, ExitStatus, FnBlackboard, HookArgs};
pub use clock::{Clock, ManualClock, SystemClock};
pub use deferred::{deferred, Deferred, Settle, Settlement};
pub use rng::{DeterministicRng, SplitMix64};
pub use state::State;
