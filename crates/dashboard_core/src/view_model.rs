use crate::{
    ActionPhase, ActionTarget, DashboardState, DiscoveryDisplay, HealthState, JobKey,
    ProjectStatus, RowItem, Settlement, Stats, Toast,
};

/// Placeholder text for empty cells.
pub const EMPTY_CELL: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardViewModel {
    pub sections: Vec<SectionView>,
    pub stats: Stats,
    pub toasts: Vec<Toast>,
    pub last_error: Option<String>,
    pub health: HealthState,
    pub poll_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub key: JobKey,
    pub caption: String,
    pub discovery_button: ButtonView,
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowView {
    Project {
        name: String,
        status: ProjectStatus,
        status_label: String,
        trigger_button: ButtonView,
    },
    Placeholder {
        name: String,
        namespace: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonTone {
    Neutral,
    /// Long-running work reported by the backend.
    Active,
    Success,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonView {
    pub label: &'static str,
    pub enabled: bool,
    pub tone: ButtonTone,
}

impl ButtonView {
    const fn new(label: &'static str, enabled: bool, tone: ButtonTone) -> Self {
        Self {
            label,
            enabled,
            tone,
        }
    }
}

pub fn discovery_button(phase: ActionPhase, display: DiscoveryDisplay) -> ButtonView {
    match phase {
        ActionPhase::Busy => ButtonView::new("Running...", false, ButtonTone::Neutral),
        ActionPhase::Settled(Settlement::Succeeded) => {
            ButtonView::new("Discovery Started!", false, ButtonTone::Success)
        }
        ActionPhase::Settled(Settlement::Failed) => {
            ButtonView::new("Failed", false, ButtonTone::Danger)
        }
        ActionPhase::Settled(Settlement::Errored) => {
            ButtonView::new("Error", false, ButtonTone::Danger)
        }
        ActionPhase::Idle => match display {
            DiscoveryDisplay::Running => {
                ButtonView::new("Discovery Running...", false, ButtonTone::Active)
            }
            DiscoveryDisplay::Idle | DiscoveryDisplay::Unknown => {
                ButtonView::new("Run Discovery", true, ButtonTone::Neutral)
            }
        },
    }
}

pub fn trigger_button(phase: ActionPhase) -> ButtonView {
    match phase {
        ActionPhase::Idle => ButtonView::new("Trigger", true, ButtonTone::Neutral),
        ActionPhase::Busy => ButtonView::new("Triggering...", false, ButtonTone::Neutral),
        ActionPhase::Settled(Settlement::Succeeded) => {
            ButtonView::new("Triggered!", false, ButtonTone::Success)
        }
        ActionPhase::Settled(Settlement::Failed) => {
            ButtonView::new("Failed", false, ButtonTone::Danger)
        }
        ActionPhase::Settled(Settlement::Errored) => {
            ButtonView::new("Error", false, ButtonTone::Danger)
        }
    }
}

pub(crate) fn build(state: &DashboardState) -> DashboardViewModel {
    let sections = state
        .sections()
        .iter()
        .map(|section| {
            let key = section.key().clone();
            let discovery_phase = state.action_phase(&ActionTarget::Discovery(key.clone()));
            let rows = section
                .rows()
                .iter()
                .map(|row| match row {
                    RowItem::Project { name, status } => {
                        let phase = state.action_phase(&ActionTarget::Renovate {
                            job: key.clone(),
                            project: name.clone(),
                        });
                        RowView::Project {
                            name: name.clone(),
                            status: status.clone(),
                            status_label: non_empty(status.as_str()),
                            trigger_button: trigger_button(phase),
                        }
                    }
                    RowItem::Placeholder { name, namespace } => RowView::Placeholder {
                        name: name.clone(),
                        namespace: namespace.clone(),
                    },
                })
                .collect();
            SectionView {
                caption: section.caption().to_string(),
                discovery_button: discovery_button(discovery_phase, section.discovery()),
                rows,
                key,
            }
        })
        .collect();

    DashboardViewModel {
        sections,
        stats: state.stats(),
        toasts: state.toasts().to_vec(),
        last_error: state.last_error().map(ToOwned::to_owned),
        health: state.health(),
        poll_count: state.poll_count(),
    }
}

fn non_empty(text: &str) -> String {
    if text.trim().is_empty() {
        EMPTY_CELL.to_string()
    } else {
        text.to_string()
    }
}
