#![cfg(feature = "serde")]

use arbor_tools::{TraceEvent, TraceLog};

#[test]
fn trace_log_serializes_with_tags_and_payloads() {
    let mut log = TraceLog::default();
    log.push(TraceEvent::new(4, "bt.guard.abort").with_a(17));

    let json = serde_json::to_value(&log).unwrap();
    assert_eq!(json["events"][0]["tag"], "bt.guard.abort");
    assert_eq!(json["events"][0]["a"], 17);

    let back: TraceLog = serde_json::from_value(json).unwrap();
    assert_eq!(back, log);
}
