use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use chrono::Utc;
use quickprint_core::{parse_callback_url, update, AppState, Msg, SessionConfig};
use quickprint_engine::{inspect_file, CallbackListener, HistoryStore, SystemLauncher};
use quickprint_logging::{qp_debug, qp_info, qp_warn};

use super::commands::{parse_line, SessionCommand, HELP};
use super::config::AppConfig;
use super::effects::EffectRunner;
use super::render::{self, Renderer};

/// Everything the session loop reacts to.
#[derive(Debug)]
pub enum SessionEvent {
    Msg(Msg),
    Line(String),
    InputClosed,
}

enum Flow {
    Continue,
    Quit,
}

pub fn run_session(config: &AppConfig) -> anyhow::Result<()> {
    let (event_tx, event_rx) = mpsc::channel::<SessionEvent>();

    let callback_tx = event_tx.clone();
    let listener = CallbackListener::bind(
        &config.callback_addr,
        &config.callback_path,
        move |params| {
            let _ = callback_tx.send(SessionEvent::Msg(Msg::CallbackReceived {
                params,
                at: Utc::now(),
            }));
        },
    );
    let callback_base = match &listener {
        Ok(listener) => config.callback_base_for(listener.local_addr()),
        Err(err) => {
            qp_warn!("Callback listener unavailable: {}", err);
            println!("Callback listener unavailable ({err}); record results with 'callback <url>'.");
            config.configured_callback_base()
        }
    };

    let history = HistoryStore::new(&config.data_dir);
    let runner = EffectRunner::new(
        config.encode_settings(),
        history.clone(),
        Arc::new(SystemLauncher),
        event_tx.clone(),
    )
    .context("failed to start the encoding engine")?;
    spawn_stdin_reader(event_tx)?;

    let mut session = Session::on_stdout(config.session_config(callback_base), runner);
    session.dispatch(Msg::RestoreHistory(history.load()))?;
    session.write_line("Type 'help' for commands.")?;

    while let Ok(event) = event_rx.recv() {
        if let Flow::Quit = session.handle(event)? {
            break;
        }
    }
    session.runner.shutdown();
    qp_info!("Session finished");
    Ok(())
}

fn spawn_stdin_reader(events: mpsc::Sender<SessionEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("quickprint-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if events.send(SessionEvent::Line(line)).is_err() {
                    return;
                }
            }
            let _ = events.send(SessionEvent::InputClosed);
        })?;
    Ok(())
}

/// Session writing to stdout. Other threads log to stdout too, so the
/// handle is locked per write, never held.
impl Session<io::Stdout> {
    fn on_stdout(config: SessionConfig, runner: EffectRunner) -> Self {
        Self::new(config, runner, io::stdout())
    }
}

struct Session<W: Write> {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer,
    out: W,
}

impl<W: Write> Session<W> {
    fn new(config: SessionConfig, runner: EffectRunner, out: W) -> Self {
        Self {
            state: AppState::with_config(config),
            runner,
            renderer: Renderer::default(),
            out,
        }
    }

    fn handle(&mut self, event: SessionEvent) -> anyhow::Result<Flow> {
        match event {
            SessionEvent::Msg(msg) => self.dispatch(msg)?,
            SessionEvent::Line(line) => match parse_line(&line) {
                Ok(command) => return self.run_command(command),
                Err(err) => self.write_line(&err.to_string())?,
            },
            SessionEvent::InputClosed => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn run_command(&mut self, command: SessionCommand) -> anyhow::Result<Flow> {
        qp_debug!("Command {:?}", command);
        match command {
            SessionCommand::Select(path) => match inspect_file(&path) {
                Ok(file) => self.dispatch(Msg::FileSelected(file))?,
                Err(err) => self.write_line(&format!("[error] {err}"))?,
            },
            SessionCommand::Print => self.dispatch(Msg::PrintClicked { at: Utc::now() })?,
            SessionCommand::Retry(txid) => self.dispatch(Msg::RetryClicked {
                txid,
                at: Utc::now(),
            })?,
            SessionCommand::Clear => self.dispatch(Msg::ClearClicked)?,
            SessionCommand::Set(change) => {
                let settings = change.apply(self.state.settings());
                self.dispatch(Msg::SettingsChanged(settings))?;
            }
            SessionCommand::Status => {
                for line in render::status_lines(&self.state.view()) {
                    self.write_line(&line)?;
                }
            }
            SessionCommand::History => {
                for line in render::history_lines(&self.state.view().history) {
                    self.write_line(&line)?;
                }
            }
            SessionCommand::ClearHistory => self.dispatch(Msg::ClearHistoryClicked)?,
            SessionCommand::Callback(url) => match parse_callback_url(&url) {
                Ok(params) => self.dispatch(Msg::CallbackReceived {
                    params,
                    at: Utc::now(),
                })?,
                Err(err) => self.write_line(&format!("[error] Invalid callback URL: {err}"))?,
            },
            SessionCommand::Help => self.write_line(HELP)?,
            SessionCommand::Quit => return Ok(Flow::Quit),
            SessionCommand::Empty => {}
        }
        Ok(Flow::Continue)
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let notices = self.runner.enqueue(effects);
        let view = state.view();
        let was_dirty = state.consume_dirty();
        self.state = state;

        for notice in &notices {
            self.write_line(&render::notice_line(notice))?;
        }
        if was_dirty {
            for line in self.renderer.render(&view) {
                self.write_line(&line)?;
            }
        }
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }
}
