use std::cell::RefCell;
use std::rc::Rc;

use arbor_core::{ActionReturn, Blackboard, ExitStatus, FnBlackboard, HookArgs, State};
use serde_json::json;

#[derive(Debug, Default)]
struct Agent {
    hunger: u32,
    eaten: Vec<String>,
}

#[test]
fn fn_blackboard_dispatches_by_name_and_reports_missing() {
    let mut board = FnBlackboard::new(Agent::default())
        .with_action("eat", |agent, data| {
            let food = data.and_then(|d| d.as_str()).unwrap_or("nothing");
            agent.eaten.push(food.to_string());
            agent.hunger = agent.hunger.saturating_sub(1);
            State::Succeeded.into()
        })
        .with_condition("hungry", |agent| agent.hunger > 0);

    board.state_mut().hunger = 1;
    assert_eq!(board.check_condition("hungry"), Some(true));

    let ret = board.call_action("eat", Some(&json!("apple")));
    assert!(matches!(ret, Some(ActionReturn::Finished(State::Succeeded))));
    assert_eq!(board.check_condition("hungry"), Some(false));
    assert_eq!(board.state().eaten, vec!["apple".to_string()]);

    assert!(board.call_action("sleep", None).is_none());
    assert!(board.check_condition("tired").is_none());
    assert!(board.call_hook("on_enter", HookArgs::Entry).is_none());
}

#[test]
fn hooks_receive_their_lifecycle_arguments() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    let mut board = FnBlackboard::new(()).with_hook("track", move |_, args| {
        log.borrow_mut().push(args);
    });

    let exit = ExitStatus {
        succeeded: false,
        aborted: true,
    };
    assert_eq!(board.call_hook("track", HookArgs::Entry), Some(()));
    assert_eq!(board.call_hook("track", HookArgs::Exit(exit)), Some(()));

    assert_eq!(*seen.borrow(), vec![HookArgs::Entry, HookArgs::Exit(exit)]);
}

#[test]
fn action_return_conversions() {
    assert!(matches!(
        ActionReturn::from(None::<State>),
        ActionReturn::Running
    ));
    assert!(matches!(
        ActionReturn::from(Some(State::Failed)),
        ActionReturn::Finished(State::Failed)
    ));
}
