use arbor_core::{DeterministicRng, State};

use super::{unexpected_state, update_child, Node, NodeId};
use crate::context::TickContext;
use crate::error::Halt;
use crate::BtError;

/// Weighted random pick among participants.
///
/// Each participant holds some number of tickets; the winner is drawn uniformly from the pool of
/// all tickets, so a participant with three tickets is three times as likely to win as one with
/// a single ticket. Participants with zero tickets never win.
#[derive(Debug, Clone)]
pub struct LottoDraw<T> {
    participants: Vec<(T, u32)>,
}

impl<T> LottoDraw<T> {
    pub fn new() -> Self {
        Self {
            participants: Vec::new(),
        }
    }

    pub fn add(&mut self, participant: T, tickets: u32) -> &mut Self {
        self.participants.push((participant, tickets));
        self
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn pool_size(&self) -> u64 {
        self.participants.iter().map(|(_, t)| u64::from(*t)).sum()
    }

    pub fn draw<R>(&self, rng: &mut R) -> Result<&T, BtError>
    where
        R: DeterministicRng + ?Sized,
    {
        let pool = self.pool_size();
        if pool == 0 {
            return Err(BtError::EmptyLottoDraw);
        }

        let mut ticket = rng.next_below(pool);
        for (participant, tickets) in &self.participants {
            let tickets = u64::from(*tickets);
            if ticket < tickets {
                return Ok(participant);
            }
            ticket -= tickets;
        }
        Err(BtError::EmptyLottoDraw)
    }
}

impl<T> Default for LottoDraw<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks one child per run by weighted draw and mirrors it.
#[derive(Debug)]
pub struct Lotto {
    children: Vec<Node>,
    tickets: Vec<u32>,
    winner: Option<usize>,
}

impl Lotto {
    /// `tickets[i]` weights child `i`; children without an entry hold one ticket.
    pub fn new(children: Vec<Node>, tickets: Vec<u32>) -> Self {
        Self {
            children,
            tickets,
            winner: None,
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    pub fn tickets(&self) -> &[u32] {
        &self.tickets
    }

    /// Index of the child drawn for the current run.
    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn caption(&self) -> String {
        if self.tickets.is_empty() {
            return "LOTTO".to_string();
        }
        let tickets: Vec<String> = self.tickets.iter().map(u32::to_string).collect();
        format!("LOTTO [{}]", tickets.join(","))
    }

    pub(crate) fn clear_winner(&mut self) {
        self.winner = None;
    }

    fn draw_winner(&self, rng: &mut dyn DeterministicRng) -> Result<usize, BtError> {
        let mut draw = LottoDraw::new();
        for index in 0..self.children.len() {
            draw.add(index, self.tickets.get(index).copied().unwrap_or(1));
        }
        draw.draw(rng).copied()
    }

    pub(crate) fn on_update(
        &mut self,
        id: NodeId,
        state: &mut State,
        cx: &mut TickContext<'_>,
    ) -> Result<(), Halt> {
        let winner = match self.winner {
            Some(winner) if *state != State::Ready => winner,
            _ => {
                let winner = self.draw_winner(cx.rng)?;
                tracing::debug!(node = %id, winner, "lotto drew a winner");
                cx.emit("bt.lotto.draw", id.get(), winner as u64);
                self.winner = Some(winner);
                winner
            }
        };

        let child = &mut self.children[winner];
        match update_child(child, cx)? {
            State::Ready => Err(unexpected_state(child)),
            child_state => {
                *state = child_state;
                Ok(())
            }
        }
    }
}
