use std::collections::HashMap;
use std::sync::mpsc;
use std::time::Duration;

use dashboard_client::{
    ActionResponse, EngineCommand, EngineEvent, EngineHandle, EventSink, JobRecord, JobRef,
    TimerToken,
};
use dashboard_core::{ActionOutcome, Effect, Job, JobKey, Msg, Project, ProjectStatus};
use dashboard_logging::{dashboard_debug, dashboard_warn};

use super::app::AppInput;

/// Forwards engine events into the dispatch loop's inbox.
pub struct InboxSink {
    tx: mpsc::Sender<AppInput>,
}

impl InboxSink {
    pub fn new(tx: mpsc::Sender<AppInput>) -> Self {
        Self { tx }
    }
}

impl EventSink for InboxSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(AppInput::Engine(event));
    }
}

/// Messages waiting on engine timers, keyed by the token handed to the engine.
#[derive(Debug, Default)]
pub struct TimerTable {
    pending: HashMap<TimerToken, Msg>,
    next_token: u64,
}

impl TimerTable {
    pub fn schedule(&mut self, msg: Msg, delay: Duration) -> EngineCommand {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.pending.insert(token, msg);
        EngineCommand::Schedule { token, delay }
    }

    pub fn fire(&mut self, token: TimerToken) -> Option<Msg> {
        self.pending.remove(&token)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

pub struct EffectRunner {
    engine: EngineHandle,
    timers: TimerTable,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            timers: TimerTable::default(),
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            let command = command_for(effect, &mut self.timers);
            dashboard_debug!(
                "Submitting {:?} ({} timers pending)",
                command,
                self.timers.pending()
            );
            self.engine.submit(command);
        }
    }

    /// Converts an engine event into the message the core expects, if any.
    pub fn translate(&mut self, event: EngineEvent) -> Option<Msg> {
        msg_for(event, &mut self.timers)
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}

fn command_for(effect: Effect, timers: &mut TimerTable) -> EngineCommand {
    match effect {
        Effect::FetchJobs => EngineCommand::FetchJobs,
        Effect::FetchDiscoveryStatus { key, seq } => EngineCommand::FetchDiscoveryStatus {
            job: job_ref(key),
            seq,
        },
        Effect::CheckHealth => EngineCommand::CheckHealth,
        Effect::StartDiscovery { key } => EngineCommand::StartDiscovery { job: job_ref(key) },
        Effect::TriggerRenovate { key, project } => EngineCommand::TriggerRenovate {
            job: job_ref(key),
            project,
        },
        Effect::SchedulePoll { after } => timers.schedule(Msg::PollRequested, after),
        Effect::ScheduleActionReset {
            target,
            generation,
            after,
        } => timers.schedule(Msg::ActionResetElapsed { target, generation }, after),
        Effect::ScheduleToastHide { id, after } => {
            timers.schedule(Msg::ToastHideElapsed { id }, after)
        }
        Effect::ScheduleToastRemoval { id, after } => {
            timers.schedule(Msg::ToastRemovalElapsed { id }, after)
        }
    }
}

fn msg_for(event: EngineEvent, timers: &mut TimerTable) -> Option<Msg> {
    let msg = match event {
        EngineEvent::JobsFetched(result) => Msg::JobsFetched(
            result
                .map(|records| records.into_iter().map(job_from_record).collect())
                .map_err(|err| err.to_string()),
        ),
        EngineEvent::DiscoveryStatus { job, seq, running } => Msg::DiscoveryStatusFetched {
            key: job_key(job),
            seq,
            running,
        },
        EngineEvent::Health { healthy } => Msg::HealthChecked { healthy },
        EngineEvent::DiscoveryStarted { job, response } => Msg::DiscoveryStartFinished {
            key: job_key(job),
            outcome: outcome_from(response),
        },
        EngineEvent::RenovateTriggered {
            job,
            project,
            response,
        } => Msg::TriggerFinished {
            key: job_key(job),
            project,
            outcome: outcome_from(response),
        },
        EngineEvent::TimerFired { token } => match timers.fire(token) {
            Some(msg) => msg,
            None => {
                dashboard_warn!("Timer {:?} fired with no pending message", token);
                return None;
            }
        },
    };
    Some(msg)
}

fn job_ref(key: JobKey) -> JobRef {
    JobRef::new(key.name, key.namespace)
}

fn job_key(job: JobRef) -> JobKey {
    JobKey::new(job.name, job.namespace)
}

fn job_from_record(record: JobRecord) -> Job {
    let projects = record
        .projects
        .into_iter()
        .map(|project| Project::new(project.name, ProjectStatus::parse(&project.status)))
        .collect();
    Job::new(record.name, record.namespace, projects)
}

fn outcome_from(response: ActionResponse) -> ActionOutcome {
    match response {
        ActionResponse::Accepted => ActionOutcome::Accepted,
        ActionResponse::Rejected { status, message } => {
            dashboard_debug!("Action rejected with status {}", status);
            ActionOutcome::Rejected { message }
        }
        ActionResponse::Transport { message } => ActionOutcome::TransportError { message },
    }
}

#[cfg(test)]
mod tests {
    use dashboard_client::{FailureKind, FetchError, ProjectRecord};
    use dashboard_core::{ActionTarget, ToastId};

    use super::*;

    #[test]
    fn timer_effects_round_trip_through_tokens() {
        let mut timers = TimerTable::default();
        let target = ActionTarget::Discovery(JobKey::new("renovate", "ops"));
        let command = command_for(
            Effect::ScheduleActionReset {
                target: target.clone(),
                generation: 4,
                after: Duration::from_millis(2000),
            },
            &mut timers,
        );
        let EngineCommand::Schedule { token, delay } = command else {
            panic!("expected a schedule command, got {command:?}");
        };
        assert_eq!(delay, Duration::from_millis(2000));
        assert_eq!(timers.pending(), 1);

        assert_eq!(
            msg_for(EngineEvent::TimerFired { token }, &mut timers),
            Some(Msg::ActionResetElapsed {
                target,
                generation: 4,
            })
        );
        assert_eq!(timers.pending(), 0);
        assert_eq!(msg_for(EngineEvent::TimerFired { token }, &mut timers), None);
    }

    #[test]
    fn each_schedule_gets_its_own_token() {
        let mut timers = TimerTable::default();
        let first = command_for(
            Effect::ScheduleToastHide {
                id: ToastId(1),
                after: Duration::from_millis(3000),
            },
            &mut timers,
        );
        let second = command_for(
            Effect::SchedulePoll {
                after: Duration::from_millis(500),
            },
            &mut timers,
        );
        assert_ne!(first, second);
        assert_eq!(timers.pending(), 2);
    }

    #[test]
    fn request_effects_map_to_engine_commands() {
        let mut timers = TimerTable::default();
        assert_eq!(
            command_for(
                Effect::TriggerRenovate {
                    key: JobKey::new("renovate", "ops"),
                    project: "group/api".to_string(),
                },
                &mut timers,
            ),
            EngineCommand::TriggerRenovate {
                job: JobRef::new("renovate", "ops"),
                project: "group/api".to_string(),
            }
        );
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn fetched_records_become_jobs_with_parsed_status() {
        let mut timers = TimerTable::default();
        let event = EngineEvent::JobsFetched(Ok(vec![JobRecord {
            name: "renovate".to_string(),
            namespace: "ops".to_string(),
            projects: vec![ProjectRecord {
                name: "group/api".to_string(),
                status: "Running".to_string(),
            }],
        }]));
        assert_eq!(
            msg_for(event, &mut timers),
            Some(Msg::JobsFetched(Ok(vec![Job::new(
                "renovate",
                "ops",
                vec![Project::new("group/api", ProjectStatus::Running)],
            )])))
        );
    }

    #[test]
    fn fetch_errors_become_readable_messages() {
        let mut timers = TimerTable::default();
        let event = EngineEvent::JobsFetched(Err(FetchError {
            kind: FailureKind::HttpStatus(502),
            message: "bad gateway".to_string(),
        }));
        assert_eq!(
            msg_for(event, &mut timers),
            Some(Msg::JobsFetched(Err("http status 502: bad gateway".to_string())))
        );
    }

    #[test]
    fn action_responses_map_to_outcomes() {
        assert_eq!(
            outcome_from(ActionResponse::Rejected {
                status: 400,
                message: "Missing parameters".to_string(),
            }),
            ActionOutcome::Rejected {
                message: "Missing parameters".to_string(),
            }
        );
        assert_eq!(
            outcome_from(ActionResponse::Transport {
                message: "connection refused".to_string(),
            }),
            ActionOutcome::TransportError {
                message: "connection refused".to_string(),
            }
        );
        assert_eq!(
            outcome_from(ActionResponse::Accepted),
            ActionOutcome::Accepted
        );
    }
}
