use crate::{ActionOutcome, ActionTarget, Job, JobKey, ToastId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Poll loop fired, either on the interval or after a successful action.
    PollRequested,
    /// Result of `GET /api/v1/renovatejobs`; the error is a readable message.
    JobsFetched(Result<Vec<Job>, String>),
    /// Discovery-status answer for one section. Failures arrive as `running: false`.
    DiscoveryStatusFetched { key: JobKey, seq: u64, running: bool },
    /// Backend health check result.
    HealthChecked { healthy: bool },
    /// User asked to start discovery for a job.
    DiscoveryClicked { key: JobKey },
    DiscoveryStartFinished { key: JobKey, outcome: ActionOutcome },
    /// User asked to run renovate for one project of a job.
    TriggerClicked { key: JobKey, project: String },
    TriggerFinished {
        key: JobKey,
        project: String,
        outcome: ActionOutcome,
    },
    /// Result-flash delay elapsed for an action.
    ActionResetElapsed { target: ActionTarget, generation: u64 },
    ToastHideElapsed { id: ToastId },
    ToastRemovalElapsed { id: ToastId },
}
