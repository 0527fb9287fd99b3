use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chrono::Local;
use dashboard_client::{ClientError, EngineEvent, EngineHandle, JobRef, ReqwestDashboardApi};
use dashboard_core::{update, DashboardState, Msg};
use dashboard_logging::{dashboard_error, dashboard_info};

use super::commands::{self, Command, CommandError, USAGE};
use super::config::{ConfigError, DashboardConfig};
use super::effects::{EffectRunner, InboxSink};
use super::logging;
use super::render::{self, Frame};

/// Everything the dispatch thread reacts to, funnelled through one channel.
pub enum AppInput {
    Engine(EngineEvent),
    Msg(Msg),
    Command(Command),
    /// Text to show under the dashboard (parse errors).
    Notice(String),
    Quit,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

pub fn run_app() -> Result<(), AppError> {
    let config = DashboardConfig::from_env()?;
    logging::initialize(config.log_destination);
    dashboard_info!(
        "Starting dashboard against {} (poll every {:?})",
        config.base_url,
        config.poll_interval
    );

    let (input_tx, input_rx) = mpsc::channel::<AppInput>();
    let api = ReqwestDashboardApi::new(config.client_settings())?;
    let engine = EngineHandle::with_api(
        Arc::new(api.clone()),
        Arc::new(InboxSink::new(input_tx.clone())),
    )?;

    let state = DashboardState::with_timings(config.timings());
    spawn_poll_loop(input_tx.clone(), state.timings().poll_interval);
    spawn_command_reader(input_tx);

    let app = App {
        state,
        runner: EffectRunner::new(engine),
        api,
        notice: None,
        ansi: io::stdout().is_terminal(),
    };
    app.run(input_rx);
    Ok(())
}

/// Sends a poll request immediately, then on every interval.
fn spawn_poll_loop(tx: mpsc::Sender<AppInput>, interval: Duration) {
    thread::spawn(move || {
        while tx.send(AppInput::Msg(Msg::PollRequested)).is_ok() {
            thread::sleep(interval);
        }
    });
}

fn spawn_command_reader(tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let input = match commands::parse(&line) {
                Ok(Command::Quit) => AppInput::Quit,
                Ok(command) => AppInput::Command(command),
                Err(CommandError::Empty) => continue,
                Err(err) => AppInput::Notice(err.to_string()),
            };
            if tx.send(input).is_err() {
                break;
            }
        }
    });
}

struct App {
    state: DashboardState,
    runner: EffectRunner,
    /// Only used to build links; requests go through the engine.
    api: ReqwestDashboardApi,
    notice: Option<String>,
    ansi: bool,
}

impl App {
    fn run(mut self, inbox: mpsc::Receiver<AppInput>) {
        self.render();
        while let Ok(input) = inbox.recv() {
            match input {
                AppInput::Engine(event) => {
                    if let Some(msg) = self.runner.translate(event) {
                        self.dispatch(msg);
                    }
                }
                AppInput::Msg(msg) => self.dispatch(msg),
                AppInput::Command(command) => self.handle_command(command),
                AppInput::Notice(text) => self.show_notice(text),
                AppInput::Quit => break,
            }
        }
        dashboard_info!("Dashboard shutting down");
        self.runner.shutdown();
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);
        if was_dirty {
            self.render();
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Refresh => self.dispatch(Msg::PollRequested),
            Command::Discover { key } => self.dispatch(Msg::DiscoveryClicked { key }),
            Command::Trigger { key, project } => {
                self.dispatch(Msg::TriggerClicked { key, project })
            }
            Command::Logs { key, project } => {
                let job = JobRef::new(key.name, key.namespace);
                let text = match self.api.logs_url(&job, &project) {
                    Ok(url) => url.to_string(),
                    Err(err) => format!("cannot build logs link: {err}"),
                };
                self.show_notice(text);
            }
            Command::Help => self.show_notice(USAGE.to_string()),
            Command::Quit => {}
        }
    }

    fn show_notice(&mut self, text: String) {
        self.notice = Some(text);
        self.render();
    }

    fn render(&self) {
        let view = self.state.view();
        let frame = Frame {
            updated_at: Local::now().naive_local(),
            notice: self.notice.as_deref(),
            ansi: self.ansi,
        };
        let text = render::render(&view, &frame);
        let mut stdout = io::stdout().lock();
        if let Err(err) = stdout
            .write_all(text.as_bytes())
            .and_then(|()| stdout.flush())
        {
            dashboard_error!("Failed to write dashboard to stdout: {}", err);
        }
    }
}
