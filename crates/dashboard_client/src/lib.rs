//! Dashboard client: backend API access and effect execution.
mod api;
mod engine;
mod types;
mod wire;

pub use api::{ClientSettings, DashboardApi, ReqwestDashboardApi};
pub use engine::{ChannelEventSink, EngineCommand, EngineHandle, EventSink};
pub use types::{
    ActionResponse, ClientError, EngineEvent, FailureKind, FetchError, JobRecord, JobRef,
    ProjectRecord, TimerToken,
};
pub use wire::{decode_jobs, error_message};
