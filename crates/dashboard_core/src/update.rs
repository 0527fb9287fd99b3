use dashboard_logging::{dashboard_debug, dashboard_info, dashboard_warn};

use crate::{
    ActionOutcome, ActionTarget, DashboardState, DiscoveryDisplay, Effect, JobKey, Msg, ToastKind,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: DashboardState, msg: Msg) -> (DashboardState, Vec<Effect>) {
    let effects = match msg {
        Msg::PollRequested => {
            state.begin_poll();
            vec![Effect::FetchJobs, Effect::CheckHealth]
        }
        Msg::JobsFetched(Ok(jobs)) => {
            let report = state.apply_snapshot(jobs);
            report
                .discovery_requests
                .into_iter()
                .map(|request| Effect::FetchDiscoveryStatus {
                    key: request.key,
                    seq: request.seq,
                })
                .collect()
        }
        Msg::JobsFetched(Err(message)) => {
            // Previous render stays; only the error surfaces.
            vec![state.record_fetch_error(message)]
        }
        Msg::DiscoveryStatusFetched { key, seq, running } => {
            state.apply_discovery_status(&key, seq, running);
            Vec::new()
        }
        Msg::HealthChecked { healthy } => {
            state.set_health(healthy);
            Vec::new()
        }
        Msg::DiscoveryClicked { key } => {
            let Some(discovery) = state.section(&key).map(|section| section.discovery()) else {
                dashboard_warn!("Discovery requested for unknown job {}", key);
                return (state, Vec::new());
            };
            if discovery == DiscoveryDisplay::Running {
                dashboard_debug!("Discovery for {} is already running on the backend", key);
                return (state, Vec::new());
            }
            if !state.begin_action(ActionTarget::Discovery(key.clone())) {
                dashboard_debug!("Discovery for {} is in flight or settling", key);
                return (state, Vec::new());
            }
            dashboard_info!("Starting discovery for {}", key);
            vec![Effect::StartDiscovery { key }]
        }
        Msg::DiscoveryStartFinished { key, outcome } => {
            let target = ActionTarget::Discovery(key.clone());
            match state.settle_action(target, &outcome) {
                Some(reset) => {
                    let mut effects = vec![reset];
                    effects.extend(discovery_feedback(&mut state, &key, outcome));
                    effects
                }
                None => Vec::new(),
            }
        }
        Msg::TriggerClicked { key, project } => {
            let known = state
                .section(&key)
                .is_some_and(|section| section.has_project(&project));
            if !known {
                dashboard_warn!("Trigger requested for unknown project {} in {}", project, key);
                return (state, Vec::new());
            }
            let target = ActionTarget::Renovate {
                job: key.clone(),
                project: project.clone(),
            };
            if !state.begin_action(target) {
                dashboard_debug!("Trigger for {} in {} is in flight or settling", project, key);
                return (state, Vec::new());
            }
            dashboard_info!("Triggering renovate for {} in {}", project, key);
            vec![Effect::TriggerRenovate { key, project }]
        }
        Msg::TriggerFinished {
            key,
            project,
            outcome,
        } => {
            let target = ActionTarget::Renovate {
                job: key.clone(),
                project: project.clone(),
            };
            match state.settle_action(target, &outcome) {
                Some(reset) => {
                    let mut effects = vec![reset];
                    effects.extend(trigger_feedback(&mut state, &key, &project, outcome));
                    effects
                }
                None => Vec::new(),
            }
        }
        Msg::ActionResetElapsed { target, generation } => {
            state.reset_action(&target, generation);
            Vec::new()
        }
        Msg::ToastHideElapsed { id } => state.hide_toast(id).into_iter().collect(),
        Msg::ToastRemovalElapsed { id } => {
            state.remove_toast(id);
            Vec::new()
        }
    };

    (state, effects)
}

fn discovery_feedback(
    state: &mut DashboardState,
    key: &JobKey,
    outcome: ActionOutcome,
) -> Vec<Effect> {
    match outcome {
        ActionOutcome::Accepted => vec![
            state.notify(
                ToastKind::Success,
                "Discovery started",
                Some(format!("Discovery started for {}", key.label())),
            ),
            state.follow_up_poll(),
        ],
        ActionOutcome::Rejected { message } => {
            dashboard_warn!("Discovery for {} rejected: {}", key, message);
            vec![state.notify(
                ToastKind::Error,
                "Discovery failed",
                Some(or_generic(message, "Failed to start discovery")),
            )]
        }
        ActionOutcome::TransportError { message } => {
            dashboard_warn!("Discovery for {} errored: {}", key, message);
            vec![state.notify(
                ToastKind::Error,
                "Discovery error",
                Some(or_generic(message, "Failed to start discovery")),
            )]
        }
    }
}

fn trigger_feedback(
    state: &mut DashboardState,
    key: &JobKey,
    project: &str,
    outcome: ActionOutcome,
) -> Vec<Effect> {
    match outcome {
        ActionOutcome::Accepted => vec![
            state.notify(
                ToastKind::Success,
                "Renovate triggered",
                Some(format!("Renovate scheduled for {project} ({})", key.label())),
            ),
            state.follow_up_poll(),
        ],
        ActionOutcome::Rejected { message } => {
            dashboard_warn!("Trigger for {} in {} rejected: {}", project, key, message);
            vec![state.notify(
                ToastKind::Error,
                "Trigger failed",
                Some(or_generic(message, "Failed to trigger renovate")),
            )]
        }
        ActionOutcome::TransportError { message } => {
            dashboard_warn!("Trigger for {} in {} errored: {}", project, key, message);
            vec![state.notify(
                ToastKind::Error,
                "Trigger error",
                Some(or_generic(message, "Failed to trigger renovate")),
            )]
        }
    }
}

fn or_generic(message: String, generic: &str) -> String {
    if message.trim().is_empty() {
        generic.to_string()
    } else {
        message
    }
}
