use dashboard_core::{update, DashboardState, Effect, Msg, Timings, ToastId};

fn hide_effect(effects: &[Effect]) -> (ToastId, std::time::Duration) {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::ScheduleToastHide { id, after } => Some((*id, *after)),
            _ => None,
        })
        .expect("hide effect")
}

#[test]
fn error_toast_hides_then_disappears() {
    let timings = Timings::default();
    let state = DashboardState::with_timings(timings);
    let (state, effects) = update(state, Msg::JobsFetched(Err("X".to_string())));

    let (id, visible_for) = hide_effect(&effects);
    assert_eq!(visible_for, timings.toast_visible);
    assert!(state.toasts()[0].visible);

    let (state, effects) = update(state, Msg::ToastHideElapsed { id });
    assert!(!state.toasts()[0].visible);
    assert_eq!(
        effects,
        vec![Effect::ScheduleToastRemoval {
            id,
            after: timings.toast_fade,
        }]
    );

    let (state, effects) = update(state, Msg::ToastRemovalElapsed { id });
    assert!(state.toasts().is_empty());
    assert!(effects.is_empty());
}

#[test]
fn timers_firing_out_of_order_remove_by_id() {
    let state = DashboardState::new();
    let (state, first) = update(state, Msg::JobsFetched(Err("one".to_string())));
    let (state, second) = update(state, Msg::JobsFetched(Err("two".to_string())));
    let (first_id, _) = hide_effect(&first);
    let (second_id, _) = hide_effect(&second);
    assert!(first_id < second_id);

    let (state, _) = update(state, Msg::ToastHideElapsed { id: second_id });
    let (state, _) = update(state, Msg::ToastRemovalElapsed { id: second_id });

    let remaining: Vec<_> = state.toasts().iter().map(|t| t.message.as_str()).collect();
    assert_eq!(remaining, vec!["one"]);
    assert!(state.toasts()[0].visible);
}

#[test]
fn custom_timings_flow_into_effects() {
    let timings = Timings {
        toast_visible: std::time::Duration::from_millis(10),
        ..Timings::default()
    };
    let (_state, effects) = update(
        DashboardState::with_timings(timings),
        Msg::JobsFetched(Err("slow".to_string())),
    );
    assert_eq!(hide_effect(&effects).1, std::time::Duration::from_millis(10));
}
