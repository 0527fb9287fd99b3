use std::time::Duration;

use crate::{ActionTarget, JobKey, ToastId};

/// Work the pure core asks the outside world to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchJobs,
    FetchDiscoveryStatus { key: JobKey, seq: u64 },
    CheckHealth,
    StartDiscovery { key: JobKey },
    TriggerRenovate { key: JobKey, project: String },
    /// One extra poll, independent of the regular interval.
    SchedulePoll { after: Duration },
    ScheduleActionReset {
        target: ActionTarget,
        generation: u64,
        after: Duration,
    },
    ScheduleToastHide { id: ToastId, after: Duration },
    ScheduleToastRemoval { id: ToastId, after: Duration },
}
