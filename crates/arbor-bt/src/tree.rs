use core::fmt;

use arbor_core::{Blackboard, Clock, DeterministicRng, SplitMix64, State, SystemClock};
use arbor_tools::{TraceLog, TraceSink, Tracer};

use crate::details::{flatten, NodeDetails};
use crate::error::Halt;
use crate::{assemble, BtError, Node, NodeDefinition, TickContext};

/// An assembled tree plus the randomness, time and tracing it ticks with.
///
/// The blackboard is not owned; it is lent to every [`step`](Self::step).
pub struct BehaviourTree {
    root: Node,
    rng: Box<dyn DeterministicRng>,
    clock: Box<dyn Clock>,
    tracer: Tracer,
    ticks: u64,
}

impl BehaviourTree {
    /// Assemble `definition` with an entropy-seeded RNG, the system clock and no tracing.
    pub fn new(definition: &NodeDefinition) -> Result<Self, BtError> {
        Self::builder(definition).build()
    }

    pub fn builder(definition: &NodeDefinition) -> TreeBuilder<'_> {
        TreeBuilder::new(definition)
    }

    /// Tick once. A tree that finished on the previous step starts over from `Ready`.
    pub fn step(&mut self, board: &mut dyn Blackboard) -> Result<State, BtError> {
        if self.root.state().is_terminal() {
            self.root.reset();
        }
        self.update(board)
    }

    /// Tick once without restarting a finished tree; a finished tree stays as it is.
    pub fn update(&mut self, board: &mut dyn Blackboard) -> Result<State, BtError> {
        self.ticks += 1;
        let tick = self.ticks;

        let mut cx = TickContext {
            tick,
            board,
            rng: self.rng.as_mut(),
            clock: self.clock.as_ref(),
            tracer: &mut self.tracer,
        };

        match self.root.update(&mut cx) {
            Ok(()) => {}
            Err(Halt::Guard { origin }) => return Err(BtError::UnhandledGuard { origin }),
            Err(Halt::Error(error)) => return Err(error),
        }

        let state = self.root.state();
        cx.emit("bt.tick", state.code(), 0);
        tracing::trace!(tick, %state, "tree ticked");
        Ok(state)
    }

    /// Return every node to `Ready`, discarding counters, timers and pending results.
    pub fn reset(&mut self) {
        self.root.reset();
    }

    pub fn state(&self) -> State {
        self.root.state()
    }

    pub fn is_running(&self) -> bool {
        self.root.state() == State::Running
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn flattened_nodes(&self) -> Vec<NodeDetails> {
        flatten(&self.root)
    }

    /// Number of `step`/`update` calls so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn trace_log(&self) -> Option<&TraceLog> {
        self.tracer.log()
    }

    pub fn tracer_mut(&mut self) -> &mut Tracer {
        &mut self.tracer
    }
}

impl fmt::Debug for BehaviourTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviourTree")
            .field("root", &self.root)
            .field("tracer", &self.tracer)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

/// Configures how a [`BehaviourTree`] draws random numbers, reads time and records traces.
pub struct TreeBuilder<'a> {
    definition: &'a NodeDefinition,
    rng: Option<Box<dyn DeterministicRng>>,
    clock: Option<Box<dyn Clock>>,
    tracer: Tracer,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(definition: &'a NodeDefinition) -> Self {
        Self {
            definition,
            rng: None,
            clock: None,
            tracer: Tracer::new(),
        }
    }

    /// Seed a [`SplitMix64`] so lotto draws and random bounds replay exactly.
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(SplitMix64::new(seed))
    }

    pub fn with_rng(mut self, rng: impl DeterministicRng + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Keep every trace event in memory; read it back with [`BehaviourTree::trace_log`].
    pub fn with_trace_log(mut self) -> Self {
        self.tracer = self.tracer.with_log();
        self
    }

    pub fn with_trace_sink(mut self, sink: impl TraceSink + 'static) -> Self {
        self.tracer = self.tracer.with_sink(Box::new(sink));
        self
    }

    pub fn build(self) -> Result<BehaviourTree, BtError> {
        let root = assemble(self.definition)?;
        tracing::debug!(
            root = %root.id(),
            nodes = flatten(&root).len(),
            "assembled behaviour tree"
        );
        Ok(BehaviourTree {
            root,
            rng: self
                .rng
                .unwrap_or_else(|| Box::new(SplitMix64::from_entropy())),
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock::new())),
            tracer: self.tracer,
            ticks: 0,
        })
    }
}

impl fmt::Debug for TreeBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("definition", self.definition)
            .field("custom_rng", &self.rng.is_some())
            .field("custom_clock", &self.clock.is_some())
            .field("tracer", &self.tracer)
            .finish()
    }
}
