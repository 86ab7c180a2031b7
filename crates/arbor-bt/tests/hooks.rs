mod common;

use arbor_bt::{BtError, Decorator, FunctionKind, NodeDefinition as Def};
use arbor_core::State;
use common::{board, flag, hook, init_tracing, scripted, tree};

#[test]
fn hooks_fire_in_lifecycle_order() {
    init_tracing();
    let mut board = board()
        .with_action("a", scripted("a", vec![None, Some(State::Succeeded)]))
        .with_hook("h", hook("a"));
    let definition = Def::action("a")
        .with_decorator(Decorator::entry("h"))
        .with_decorator(Decorator::step("h"))
        .with_decorator(Decorator::exit("h"));
    let mut tree = tree(&definition);

    tree.step(&mut board).unwrap();
    assert_eq!(board.state().calls, ["a:entry", "a:step", "a"]);

    tree.step(&mut board).unwrap();
    assert_eq!(
        board.state().calls,
        ["a:entry", "a:step", "a", "a:step", "a", "a:exit(true,false)"]
    );
}

#[test]
fn exit_hook_reports_failure() {
    let mut board = board()
        .with_condition("ready", flag("ready"))
        .with_hook("leave", hook("ready"));
    let mut tree = tree(&Def::condition("ready").with_decorator(Decorator::exit("leave")));

    assert_eq!(tree.step(&mut board).unwrap(), State::Failed);
    assert_eq!(board.state().calls, ["ready:exit(false,false)"]);
}

#[test]
fn only_the_first_hook_of_each_kind_fires() {
    let mut board = board()
        .with_action("a", scripted("a", vec![Some(State::Succeeded)]))
        .with_hook("first", hook("first"))
        .with_hook("second", hook("second"));
    let definition = Def::action("a")
        .with_decorator(Decorator::entry("first"))
        .with_decorator(Decorator::entry("second"));
    let mut tree = tree(&definition);

    tree.step(&mut board).unwrap();
    assert_eq!(board.state().calls, ["first:entry", "a"]);
}

#[test]
fn composite_hooks_wrap_their_children() {
    let mut board = board()
        .with_action("a", scripted("a", vec![Some(State::Succeeded)]))
        .with_hook("seq", hook("seq"));
    let definition = Def::sequence(vec![Def::action("a")])
        .with_decorator(Decorator::entry("seq"))
        .with_decorator(Decorator::exit("seq"));
    let mut tree = tree(&definition);

    assert_eq!(tree.step(&mut board).unwrap(), State::Succeeded);
    assert_eq!(board.state().calls, ["seq:entry", "a", "seq:exit(true,false)"]);
}

#[test]
fn missing_hook_function_is_reported() {
    let mut board = board().with_action("a", scripted("a", vec![None]));
    let mut tree = tree(&Def::action("a").with_decorator(Decorator::step("tick_hook")));

    let error = tree.step(&mut board).unwrap_err();
    assert!(matches!(
        error,
        BtError::BlackboardFunctionMissing { kind: FunctionKind::Step, ref name } if name == "tick_hook"
    ));
    assert_eq!(
        error.to_string(),
        "step hook 'tick_hook' is not defined on the blackboard"
    );
}
