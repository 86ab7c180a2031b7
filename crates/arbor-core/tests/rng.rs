use arbor_core::{Clock, DeterministicRng, ManualClock, SplitMix64, State};
use proptest::prelude::*;

#[test]
fn same_seed_same_sequence() {
    let mut a = SplitMix64::new(42);
    let mut b = SplitMix64::new(42);
    for _ in 0..64 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn next_below_covers_every_bucket() {
    let mut rng = SplitMix64::new(7);
    let mut hits = [0u32; 4];
    for _ in 0..4_000 {
        hits[rng.next_below(4) as usize] += 1;
    }
    for count in hits {
        assert!((800..1200).contains(&count), "bucket count {count}");
    }
}

#[test]
fn degenerate_ranges_collapse_to_low() {
    let mut rng = SplitMix64::new(1);
    assert_eq!(rng.range_inclusive(5, 5), 5);
    assert_eq!(rng.range_inclusive(9, 3), 9);
    assert_eq!(rng.next_below(1), 0);
}

#[test]
fn manual_clock_clones_share_time() {
    let clock = ManualClock::new(10);
    let view = clock.clone();
    clock.advance(5);
    assert_eq!(view.now_ms(), 15);
    view.set(100);
    assert_eq!(clock.now_ms(), 100);
}

#[test]
fn state_helpers() {
    assert!(State::Succeeded.is_terminal());
    assert!(State::Running.is_active());
    assert_eq!(State::Succeeded.flipped(), State::Failed);
    assert_eq!(State::Running.flipped(), State::Running);
    assert_eq!(State::from(true), State::Succeeded);
    assert_eq!(State::Failed.to_string(), "FAILED");
}

proptest! {
    #[test]
    fn range_inclusive_stays_in_bounds(seed in any::<u64>(), low in 0u64..1_000, span in 0u64..1_000) {
        let mut rng = SplitMix64::new(seed);
        let high = low + span;
        let x = rng.range_inclusive(low, high);
        prop_assert!(x >= low && x <= high);
    }

    #[test]
    fn next_below_stays_in_bounds(seed in any::<u64>(), bound in 1u64..u64::MAX) {
        let mut rng = SplitMix64::new(seed);
        prop_assert!(rng.next_below(bound) < bound);
    }
}
