//! Deferred action results.
//!
//! An action may hand back a [`Deferred`] instead of a state. The tree keeps the receiving half
//! and polls it on every tick; whoever does the actual work keeps the [`Settle`] half and
//! resolves it whenever the outcome is known, from any thread. Dropping the [`Deferred`]
//! (abort/reset) discards the result: a later `resolve` reports `false` and changes nothing.

use futures::channel::oneshot;

use crate::State;

/// What a deferred result settled to: a state, or a rejection reason.
pub type Settlement = Result<State, String>;

/// Create a linked settle/deferred pair.
pub fn deferred() -> (Settle, Deferred) {
    let (tx, rx) = oneshot::channel();
    (Settle { tx }, Deferred { rx })
}

/// The producing half of a deferred action result.
#[derive(Debug)]
pub struct Settle {
    tx: oneshot::Sender<Settlement>,
}

impl Settle {
    /// Settle with `state`. Returns `false` if the action was aborted or reset in the meantime.
    pub fn resolve(self, state: State) -> bool {
        self.send(Ok(state))
    }

    pub fn succeed(self) -> bool {
        self.resolve(State::Succeeded)
    }

    pub fn fail(self) -> bool {
        self.resolve(State::Failed)
    }

    pub fn reject(self, reason: impl Into<String>) -> bool {
        self.send(Err(reason.into()))
    }

    /// Whether the tree has already discarded the receiving half.
    pub fn is_discarded(&self) -> bool {
        self.tx.is_canceled()
    }

    fn send(self, settlement: Settlement) -> bool {
        match self.tx.send(settlement) {
            Ok(()) => true,
            Err(late) => {
                tracing::debug!(?late, "dropping late settlement of a discarded action result");
                false
            }
        }
    }
}

/// The polling half of a deferred action result, owned by the action node.
#[derive(Debug)]
pub struct Deferred {
    rx: oneshot::Receiver<Settlement>,
}

impl Deferred {
    /// A deferred result that is already settled; handy for tests and synchronous adapters.
    pub fn settled(settlement: Settlement) -> Self {
        let (settle, deferred) = deferred();
        let _ = settle.send(settlement);
        deferred
    }

    /// Non-blocking poll. `None` while unsettled.
    ///
    /// A settle half dropped without a result reads as a rejection.
    pub fn try_settled(&mut self) -> Option<Settlement> {
        match self.rx.try_recv() {
            Ok(settled) => settled,
            Err(oneshot::Canceled) => {
                Some(Err("settle handle dropped without a result".to_string()))
            }
        }
    }
}
