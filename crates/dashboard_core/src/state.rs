use std::time::Duration;

use dashboard_logging::{dashboard_warn, set_poll_cycle};

use crate::view_model::{self, DashboardViewModel};
use crate::{
    ActionController, ActionOutcome, ActionPhase, ActionTarget, Effect, Job, JobKey,
    NotificationQueue, ReconcileReport, Reconciler, RenderedSection, Stats, Toast, ToastId,
    ToastKind,
};

/// Fixed delays driving the dashboard's timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub poll_interval: Duration,
    /// Delay before the extra poll that follows a successful action.
    pub follow_up_poll: Duration,
    /// How long an action's result label stays before the control resets.
    pub action_reset: Duration,
    pub toast_visible: Duration,
    pub toast_fade: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            follow_up_poll: Duration::from_millis(500),
            action_reset: Duration::from_millis(2000),
            toast_visible: Duration::from_millis(3000),
            toast_fade: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HealthState {
    #[default]
    Unknown,
    Healthy,
    Unhealthy,
}

/// Everything the dashboard knows between two messages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardState {
    timings: Timings,
    reconciler: Reconciler,
    actions: ActionController,
    notifications: NotificationQueue,
    stats: Stats,
    last_error: Option<String>,
    health: HealthState,
    poll_count: u64,
    dirty: bool,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timings(timings: Timings) -> Self {
        Self {
            timings,
            ..Self::default()
        }
    }

    pub fn view(&self) -> DashboardViewModel {
        view_model::build(self)
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn sections(&self) -> &[RenderedSection] {
        self.reconciler.sections()
    }

    pub fn section(&self, key: &JobKey) -> Option<&RenderedSection> {
        self.reconciler.section(key)
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Inline error from the latest failed fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn health(&self) -> HealthState {
        self.health
    }

    pub fn toasts(&self) -> &[Toast] {
        self.notifications.toasts()
    }

    pub fn action_phase(&self, target: &ActionTarget) -> ActionPhase {
        self.actions.phase(target)
    }

    pub fn poll_count(&self) -> u64 {
        self.poll_count
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn begin_poll(&mut self) {
        self.poll_count += 1;
        set_poll_cycle(self.poll_count);
    }

    pub(crate) fn apply_snapshot(&mut self, jobs: Vec<Job>) -> ReconcileReport {
        let report = self.reconciler.reconcile(jobs);
        // Stats are recomputed from the snapshot on every pass.
        self.stats = report.stats;
        self.last_error = None;
        self.mark_dirty();
        report
    }

    pub(crate) fn record_fetch_error(&mut self, message: String) -> Effect {
        dashboard_warn!("Fetching renovate jobs failed: {}", message);
        self.last_error = Some(message.clone());
        self.notify(ToastKind::Error, "Failed to load renovate jobs", Some(message))
    }

    pub(crate) fn apply_discovery_status(&mut self, key: &JobKey, seq: u64, running: bool) {
        if self.reconciler.apply_discovery_status(key, seq, running) {
            self.mark_dirty();
        }
    }

    pub(crate) fn set_health(&mut self, healthy: bool) {
        let next = if healthy {
            HealthState::Healthy
        } else {
            HealthState::Unhealthy
        };
        if self.health != next {
            self.health = next;
            self.mark_dirty();
        }
    }

    /// Starts the action only from `Idle`; busy and settled slots keep their
    /// controls disabled until the reset timer fires.
    pub(crate) fn begin_action(&mut self, target: ActionTarget) -> bool {
        if self.actions.phase(&target) != ActionPhase::Idle {
            return false;
        }
        let started = self.actions.begin(target);
        if started {
            self.mark_dirty();
        }
        started
    }

    /// Settles the action and returns its reset effect, if it was in flight.
    pub(crate) fn settle_action(
        &mut self,
        target: ActionTarget,
        outcome: &ActionOutcome,
    ) -> Option<Effect> {
        let generation = self.actions.settle(&target, outcome)?;
        self.mark_dirty();
        Some(Effect::ScheduleActionReset {
            target,
            generation,
            after: self.timings.action_reset,
        })
    }

    pub(crate) fn reset_action(&mut self, target: &ActionTarget, generation: u64) {
        if self.actions.reset(target, generation) {
            self.mark_dirty();
        }
    }

    /// Enqueues a toast and returns the effect that will hide it.
    pub(crate) fn notify(
        &mut self,
        kind: ToastKind,
        title: impl Into<String>,
        message: Option<String>,
    ) -> Effect {
        let id = self.notifications.enqueue(kind, title, message);
        self.mark_dirty();
        Effect::ScheduleToastHide {
            id,
            after: self.timings.toast_visible,
        }
    }

    pub(crate) fn hide_toast(&mut self, id: ToastId) -> Option<Effect> {
        if !self.notifications.hide(id) {
            return None;
        }
        self.mark_dirty();
        Some(Effect::ScheduleToastRemoval {
            id,
            after: self.timings.toast_fade,
        })
    }

    pub(crate) fn remove_toast(&mut self, id: ToastId) {
        if self.notifications.remove(id) {
            self.mark_dirty();
        }
    }

    pub(crate) fn follow_up_poll(&self) -> Effect {
        Effect::SchedulePoll {
            after: self.timings.follow_up_poll,
        }
    }
}
