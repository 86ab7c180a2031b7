use arbor_core::{Blackboard, Clock, DeterministicRng};
use arbor_tools::{TraceEvent, Tracer};

/// Everything a node update may touch during one tick.
pub struct TickContext<'a> {
    pub tick: u64,
    pub board: &'a mut dyn Blackboard,
    pub rng: &'a mut dyn DeterministicRng,
    pub clock: &'a dyn Clock,
    pub tracer: &'a mut Tracer,
}

impl TickContext<'_> {
    pub fn emit(&mut self, tag: &'static str, a: u64, b: u64) {
        if self.tracer.is_enabled() {
            self.tracer
                .emit(TraceEvent::new(self.tick, tag).with_a(a).with_b(b));
        }
    }
}
