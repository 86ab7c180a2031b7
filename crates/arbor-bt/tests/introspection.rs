mod common;

use std::sync::{Arc, Mutex};

use arbor_bt::{
    BehaviourTree, Decorator, DecoratorDetails, NodeDefinition as Def, NodeType, RunDetails,
};
use arbor_core::State;
use arbor_tools::{TraceEvent, TraceSink};
use common::{always, board, running, tree};
use serde_json::json;

fn showcase() -> Def {
    Def::sequence(vec![
        Def::condition("ready").with_decorator(Decorator::while_("ok")),
        Def::wait(100, Some(200)),
        Def::repeat(Some(2), Some(5), Def::action("work")),
        Def::lotto(vec![Def::action("a"), Def::action("b")], vec![1, 3]),
        Def::flip(Def::action("c")),
    ])
}

#[test]
fn flattened_nodes_list_the_tree_in_pre_order() {
    let tree = tree(&showcase());
    let rows = tree.flattened_nodes();

    let captions: Vec<_> = rows.iter().map(|row| row.caption.as_str()).collect();
    assert_eq!(
        captions,
        [
            "ROOT",
            "SEQUENCE",
            "ready",
            "WAIT 100ms-200ms",
            "REPEAT 2x-5x",
            "work",
            "LOTTO [1,3]",
            "a",
            "b",
            "FLIP",
            "c",
        ]
    );

    assert_eq!(rows[0].parent_id, None);
    assert_eq!(rows[1].parent_id, Some(rows[0].id));
    assert_eq!(rows[2].parent_id, Some(rows[1].id));
    assert_eq!(rows[5].parent_id, Some(rows[4].id));
    assert_eq!(rows[8].parent_id, Some(rows[6].id));
    assert_eq!(rows[10].parent_id, Some(rows[9].id));

    assert_eq!(rows[4].node_type, NodeType::Repeat);
    assert!(rows.iter().all(|row| row.state == State::Ready));

    assert_eq!(rows[1].decorators, None);
    assert_eq!(
        rows[2].decorators,
        Some(vec![DecoratorDetails {
            decorator: Decorator::while_("ok"),
            is_guard: true,
        }])
    );

    assert_eq!(rows[2].run, None);
    assert_eq!(
        rows[3].run,
        Some(RunDetails::Wait {
            started_at: None,
            duration: None
        })
    );
    assert_eq!(rows[6].run, Some(RunDetails::Lotto { winner: None }));
    assert_eq!(rows[7].run, Some(RunDetails::Action { pending: false }));
}

#[test]
fn node_ids_are_unique_across_trees() {
    let first = tree(&showcase()).flattened_nodes();
    let second = tree(&showcase()).flattened_nodes();

    let mut ids: Vec<_> = first.iter().chain(&second).map(|row| row.id).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

#[test]
fn details_serialize_for_inspectors() {
    let tree = tree(&showcase());
    let rows = tree.flattened_nodes();

    let value = serde_json::to_value(&rows[2]).unwrap();
    assert_eq!(value["type"], "condition");
    assert_eq!(value["caption"], "ready");
    assert_eq!(value["state"], "READY");
    assert_eq!(value["parentId"], json!(rows[1].id.get()));
    assert_eq!(
        value["decorators"],
        json!([{ "type": "while", "condition": "ok", "isGuard": true }])
    );
    assert!(value["run"].is_null());

    let sequence = serde_json::to_value(&rows[1]).unwrap();
    assert!(sequence["decorators"].is_null());

    let wait = serde_json::to_value(&rows[3]).unwrap();
    assert_eq!(
        wait["run"],
        json!({ "kind": "wait", "startedAt": null, "duration": null })
    );
}

#[test]
fn tick_events_carry_the_root_state() {
    let mut board = board()
        .with_action("a", always("a", State::Succeeded))
        .with_action("b", running("b"));
    let definition = Def::sequence(vec![Def::action("a"), Def::action("b")]);
    let mut tree = BehaviourTree::builder(&definition)
        .with_trace_log()
        .build()
        .unwrap();

    tree.step(&mut board).unwrap();
    tree.step(&mut board).unwrap();

    let ticks: Vec<_> = tree
        .trace_log()
        .unwrap()
        .with_tag("bt.tick")
        .map(|event| (event.tick, event.a))
        .collect();
    let running = State::Running.code();
    assert_eq!(ticks, [(1, running), (2, running)]);
}

#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<TraceEvent>>>);

impl TraceSink for SharedSink {
    fn emit(&mut self, event: TraceEvent) {
        self.0.lock().unwrap().push(event);
    }
}

#[test]
fn repeat_iterations_stream_to_a_sink() {
    let sink = SharedSink::default();
    let mut board = board().with_action("work", always("work", State::Succeeded));
    let definition = Def::repeat(Some(3), None, Def::action("work"));
    let mut tree = BehaviourTree::builder(&definition)
        .with_trace_sink(sink.clone())
        .build()
        .unwrap();

    while tree.step(&mut board).unwrap() == State::Running {}
    assert!(tree.trace_log().is_none());

    let events = sink.0.lock().unwrap();
    let iterations: Vec<_> = events
        .iter()
        .filter(|event| event.tag == "bt.repeat.iteration")
        .map(|event| event.b)
        .collect();
    assert_eq!(iterations, [1, 2, 3]);
    assert_eq!(
        events.last().map(|event| (&*event.tag, event.a)),
        Some(("bt.tick", State::Succeeded.code()))
    );
}

#[test]
fn untraced_trees_record_nothing() {
    let mut board = board().with_action("a", always("a", State::Succeeded));
    let mut tree = tree(&Def::action("a"));
    tree.step(&mut board).unwrap();
    assert!(tree.trace_log().is_none());
}
