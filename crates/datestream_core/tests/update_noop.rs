use datestream_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn editing_input_does_not_submit() {
    let (next, effects) = update(AppState::new(), Msg::InputChanged("http://a.test".into()));

    assert_eq!(next.url_input(), "http://a.test");
    assert!(effects.is_empty());
    assert!(!next.is_busy());
}
