use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use datestream_client::ClientHandle;
use datestream_core::{update, AppState, Effect, Msg, StatusPhase};
use datestream_logging::{ds_debug, ds_info};

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::effects::EffectRunner;
use crate::logging;
use crate::render::TerminalRenderer;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How a run ended, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed,
}

impl Outcome {
    fn from_status(phase: StatusPhase) -> Self {
        match phase {
            StatusPhase::Done => Outcome::Completed,
            _ => Outcome::Failed,
        }
    }

    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Completed => ExitCode::SUCCESS,
            Outcome::Failed => ExitCode::FAILURE,
        }
    }
}

pub fn run(cli: Cli) -> Result<Outcome> {
    let mut config = AppConfig::load(&cli.config)?;
    config.apply_overrides(&cli);
    logging::initialize(config.log_destination, config.log_level.filter());

    let raw_input = read_input(cli.command.input().map(|p| p.as_path()))?;
    let mut app = MessageLoop::new(io::stdout().lock());

    let mut msgs = vec![Msg::InputChanged(raw_input)];
    match &cli.command {
        Command::Extract { .. } => msgs.push(Msg::ExtractSubmitted),
        Command::Search { query, .. } => {
            msgs.push(Msg::QueryChanged(query.clone()));
            msgs.push(Msg::SearchSubmitted);
        }
    }
    let mut effects = Vec::new();
    for msg in msgs {
        effects.extend(app.dispatch(msg)?);
    }

    // Rejected input never reaches the network.
    if effects.is_empty() {
        return Ok(app.outcome());
    }

    let settings = config.client_settings()?;
    let client = ClientHandle::connect(settings).context("connecting to the datestream server")?;
    let runner = EffectRunner::new(client);
    runner.enqueue(effects);

    while app.is_busy() {
        if let Some(msg) = runner.next_msg(POLL_INTERVAL) {
            runner.enqueue(app.dispatch(msg)?);
        }
    }

    runner.shutdown();
    ds_info!("finished: {:?}", app.outcome());
    Ok(app.outcome())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("reading urls from stdin")?;
            Ok(text)
        }
    }
}

/// Owns the reducer state and redraws whenever an update marks it dirty.
struct MessageLoop<W: Write> {
    state: AppState,
    renderer: TerminalRenderer<W>,
}

impl<W: Write> MessageLoop<W> {
    fn new(out: W) -> Self {
        Self {
            state: AppState::new(),
            renderer: TerminalRenderer::new(out),
        }
    }

    fn dispatch(&mut self, msg: Msg) -> Result<Vec<Effect>> {
        ds_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;
        if was_dirty {
            self.renderer.render(&view).context("writing output")?;
        }
        Ok(effects)
    }

    fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    fn outcome(&self) -> Outcome {
        Outcome::from_status(self.state.view().status.phase)
    }
}
