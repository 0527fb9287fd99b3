use dashboard_core::{update, DashboardState, Msg, ToastId};

#[test]
fn unknown_toast_timers_are_ignored() {
    let state = DashboardState::new();
    let (next, effects) = update(state.clone(), Msg::ToastHideElapsed { id: ToastId(42) });
    assert_eq!(state, next);
    assert!(effects.is_empty());

    let (next, effects) = update(next, Msg::ToastRemovalElapsed { id: ToastId(42) });
    assert_eq!(state, next);
    assert!(effects.is_empty());
}
