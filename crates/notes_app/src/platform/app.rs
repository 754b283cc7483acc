use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use notes_core::{update, AppState, Msg};
use notes_engine::{ensure_dir, EngineHandle, EngineSettings};
use notes_logging::{notes_info, notes_warn};

use super::config::{self, AppConfig};
use super::effects::{event_to_msg, now_ms, EffectRunner};
use super::persistence::Persistence;
use super::ui;
use super::ui::commands::{parse_command, Command};

enum AppEvent {
    Line(String),
    Engine(Msg),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let loaded = config::load_config(&config::config_path());
    let config = loaded.config;
    notes_logging::initialize(
        config.log_destination,
        notes_logging::parse_level(&config.log_level),
        &config.log_file,
    );
    if let Some(warning) = loaded.warning {
        notes_warn!("{}", warning);
    }
    notes_info!("Using config {:?}", loaded.path);

    ensure_dir(&config.data_dir)
        .with_context(|| format!("data directory {} is unusable", config.data_dir.display()))?;
    let engine = Arc::new(
        EngineHandle::new(EngineSettings {
            agent_timeout: config.agent_timeout(),
        })
        .context("failed to start the agent engine")?,
    );

    let runner = EffectRunner::new(
        engine.clone(),
        Persistence::open(&config.data_dir),
        config.export_dir.clone(),
    );
    let mut app = App::new(runner);
    let mut stdout = io::stdout();
    print_lines(&mut stdout, &app.start(&config))?;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    spawn_stdin_reader(event_tx.clone());
    spawn_engine_forwarder(engine, event_tx);

    while let Ok(event) = event_rx.recv() {
        let outcome = match event {
            AppEvent::Line(line) => app.handle_line(&line),
            AppEvent::Engine(msg) => app.handle_msg(msg),
            AppEvent::InputClosed => break,
        };
        print_lines(&mut stdout, &outcome.lines)?;
        if outcome.quit {
            break;
        }
    }
    notes_info!("Shutting down");
    Ok(())
}

fn print_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

fn spawn_stdin_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(AppEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(AppEvent::InputClosed);
    });
}

fn spawn_engine_forwarder(engine: Arc<EngineHandle>, tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        let Some(event) = engine.recv_timeout(Duration::from_millis(100)) else {
            continue;
        };
        if tx.send(AppEvent::Engine(event_to_msg(event, now_ms()))).is_err() {
            break;
        }
    });
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub lines: Vec<String>,
    pub quit: bool,
}

/// Owns the state; every change goes through `update`.
pub struct App {
    state: AppState,
    runner: EffectRunner,
}

impl App {
    pub fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    /// Restores saved state, applies configured defaults and renders once.
    pub fn start(&mut self, config: &AppConfig) -> Vec<String> {
        let snapshot = self.runner.persistence().load_snapshot();
        let has_saved_tags = snapshot.as_ref().is_some_and(|s| s.tags.is_some());
        let (teams, agents) = self.runner.persistence().load_recents();

        let mut lines = Vec::new();
        if let Some(snapshot) = snapshot {
            lines.extend(self.dispatch(Msg::RestoreSnapshot {
                snapshot,
                now: now_ms(),
            }));
        }
        lines.extend(self.dispatch(Msg::RestoreRecents { teams, agents }));
        let tags = if has_saved_tags {
            Vec::new()
        } else {
            config.default_tags.clone()
        };
        lines.extend(self.dispatch(Msg::SeedDefaults {
            tags,
            topics: config.demo_topics.clone(),
        }));
        lines.extend(self.render_if_dirty());
        lines
    }

    pub fn handle_line(&mut self, line: &str) -> Outcome {
        let mut outcome = Outcome::default();
        match parse_command(line, now_ms()) {
            Ok(None) => {}
            Ok(Some(Command::Dispatch(msgs))) => {
                for msg in msgs {
                    outcome.lines.extend(self.dispatch(msg));
                }
                outcome.lines.extend(self.render_if_dirty());
            }
            Ok(Some(Command::Show)) => {
                self.state.consume_dirty();
                outcome.lines = ui::render::render(&self.state.view());
            }
            Ok(Some(Command::Help)) => {
                outcome.lines = ui::commands::HELP.lines().map(str::to_string).collect();
            }
            Ok(Some(Command::Quit)) => outcome.quit = true,
            Err(message) => outcome.lines.push(format!("error: {message}")),
        }
        outcome
    }

    pub fn handle_msg(&mut self, msg: Msg) -> Outcome {
        let mut lines = self.dispatch(msg);
        lines.extend(self.render_if_dirty());
        Outcome { lines, quit: false }
    }

    fn dispatch(&mut self, msg: Msg) -> Vec<String> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects, &self.state)
    }

    fn render_if_dirty(&mut self) -> Vec<String> {
        if self.state.consume_dirty() {
            ui::render::render(&self.state.view())
        } else {
            Vec::new()
        }
    }
}
