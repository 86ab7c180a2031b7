use arbor_core::{deferred, Deferred, State};

#[test]
fn unsettled_result_polls_as_none_until_resolved() {
    let (settle, mut pending) = deferred();
    assert_eq!(pending.try_settled(), None);
    assert_eq!(pending.try_settled(), None);

    assert!(settle.succeed());
    assert_eq!(pending.try_settled(), Some(Ok(State::Succeeded)));
}

#[test]
fn dropping_the_deferred_discards_late_settlements() {
    let (settle, pending) = deferred();
    assert!(!settle.is_discarded());

    drop(pending);
    assert!(settle.is_discarded());
    assert!(!settle.fail());
}

#[test]
fn dropped_settle_half_reads_as_rejection() {
    let (settle, mut pending) = deferred();
    drop(settle);

    let settled = pending.try_settled().expect("settled");
    assert!(settled.is_err());
}

#[test]
fn rejection_carries_its_reason() {
    let (settle, mut pending) = deferred();
    assert!(settle.reject("path blocked"));
    assert_eq!(pending.try_settled(), Some(Err("path blocked".to_string())));
}

#[test]
fn settle_half_can_cross_threads() {
    let (settle, mut pending) = deferred();
    std::thread::spawn(move || settle.resolve(State::Failed))
        .join()
        .expect("resolver thread");
    assert_eq!(pending.try_settled(), Some(Ok(State::Failed)));
}

#[test]
fn pre_settled_constructor() {
    let mut ready = Deferred::settled(Ok(State::Succeeded));
    assert_eq!(ready.try_settled(), Some(Ok(State::Succeeded)));
}
