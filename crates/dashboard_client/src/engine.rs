use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use dashboard_logging::{dashboard_debug, dashboard_warn};

use crate::api::{ClientSettings, DashboardApi, ReqwestDashboardApi};
use crate::{ClientError, EngineEvent, JobRef, TimerToken};

/// Work the engine performs on its runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    FetchJobs,
    FetchDiscoveryStatus { job: JobRef, seq: u64 },
    CheckHealth,
    StartDiscovery { job: JobRef },
    TriggerRenovate { job: JobRef, project: String },
    /// Emit `TimerFired { token }` after `delay`.
    Schedule { token: TimerToken, delay: Duration },
}

/// Receives engine events; implementations must not block.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Runs dashboard requests and timers on a background tokio runtime.
///
/// Every command is spawned as its own task, so slow requests never delay
/// each other; completions are reported through the sink in whatever order
/// they resolve.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    shutdown: CancellationToken,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings, sink: Arc<dyn EventSink>) -> Result<Self, ClientError> {
        let api: Arc<dyn DashboardApi> = Arc::new(ReqwestDashboardApi::new(settings)?);
        Self::with_api(api, sink)
    }

    pub fn with_api(
        api: Arc<dyn DashboardApi>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, ClientError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let shutdown = CancellationToken::new();
        let cancel = shutdown.clone();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                if cancel.is_cancelled() {
                    break;
                }
                let api = api.clone();
                let sink = sink.clone();
                let cancel = cancel.clone();
                runtime.spawn(async move {
                    tokio::select! {
                        _ = cancel.cancelled() => {}
                        _ = handle_command(api.as_ref(), command, sink.as_ref()) => {}
                    }
                });
            }
            dashboard_debug!("Engine command loop stopped");
            runtime.shutdown_background();
        });

        Ok(Self { cmd_tx, shutdown })
    }

    pub fn submit(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            dashboard_warn!("Engine is gone; command dropped");
        }
    }

    /// Cancels in-flight work and pending timers.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_command(api: &dyn DashboardApi, command: EngineCommand, sink: &dyn EventSink) {
    match command {
        EngineCommand::FetchJobs => {
            let result = api.fetch_jobs().await;
            if let Err(err) = &result {
                dashboard_warn!("Fetching renovate jobs failed: {}", err);
            }
            sink.emit(EngineEvent::JobsFetched(result));
        }
        EngineCommand::FetchDiscoveryStatus { job, seq } => {
            let running = api.fetch_discovery_status(&job).await;
            sink.emit(EngineEvent::DiscoveryStatus { job, seq, running });
        }
        EngineCommand::CheckHealth => {
            let healthy = api.check_health().await;
            sink.emit(EngineEvent::Health { healthy });
        }
        EngineCommand::StartDiscovery { job } => {
            let response = api.start_discovery(&job).await;
            sink.emit(EngineEvent::DiscoveryStarted { job, response });
        }
        EngineCommand::TriggerRenovate { job, project } => {
            let response = api.trigger_renovate(&job, &project).await;
            sink.emit(EngineEvent::RenovateTriggered {
                job,
                project,
                response,
            });
        }
        EngineCommand::Schedule { token, delay } => {
            tokio::time::sleep(delay).await;
            sink.emit(EngineEvent::TimerFired { token });
        }
    }
}
