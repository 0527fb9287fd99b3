//! Dashboard core: pure state machine, reconciliation and view-model helpers.
mod actions;
mod effect;
mod msg;
mod notifications;
mod ordering;
mod reconcile;
mod snapshot;
mod state;
mod update;
mod view_model;

pub use actions::{ActionController, ActionOutcome, ActionPhase, ActionTarget, Settlement};
pub use effect::Effect;
pub use msg::Msg;
pub use notifications::{NotificationQueue, Toast, ToastId, ToastKind};
pub use ordering::{compare_jobs, compare_projects, locale_compare, sort_jobs, sort_projects};
pub use reconcile::{
    DiscoveryDisplay, DiscoveryRequest, ReconcileReport, Reconciler, RenderedSection, RowItem,
    SectionUpdate, Stats,
};
pub use snapshot::{Job, JobKey, Project, ProjectStatus};
pub use state::{DashboardState, HealthState, Timings};
pub use update::update;
pub use view_model::{
    discovery_button, trigger_button, ButtonTone, ButtonView, DashboardViewModel, RowView,
    SectionView, EMPTY_CELL,
};
