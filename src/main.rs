//! jira-branch - pick an assigned Jira ticket and check out a branch for it
//!
//! A Ratatui-based TUI driven by a pure reducer. Keyboard input, a timer and
//! background effect completions all funnel into one event channel.

mod app;
mod branch;
mod config;
mod effects;
mod error;
mod event;
mod filter;
mod git;
mod logging;
mod secrets;
mod state;
mod time_fmt;
mod tracker;
mod ui;

use anyhow::{Context, Result};
use config::AppConfig;
use crossterm::{
    event::{self as term, Event as TermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use effects::{Dispatcher, Services};
use event::Event;
use git::GitCli;
use ratatui::{backend::CrosstermBackend, Terminal};
use secrets::KeyringStore;
use state::CredentialPrefill;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracker::JiraClient;

const TICK_INTERVAL: Duration = Duration::from_millis(100);
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()
        .context("failed to load configuration")?
        .with_env();
    let _log_guard = logging::init(&config)?;

    let services = Services {
        tracker: Arc::new(JiraClient::new(&config)?),
        secrets: Arc::new(KeyringStore::default()),
        git: Arc::new(GitCli::default()),
    };
    let (tx, rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(services, tx.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    spawn_input_reader(tx.clone());
    spawn_ticker(tx);

    let result = run_app(&mut terminal, config.prefill(), &dispatcher, rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(branch_name) = result? {
        println!("Checked out branch {branch_name}");
    }
    Ok(())
}

/// Blocking crossterm reader on its own thread
fn spawn_input_reader(events: UnboundedSender<Event>) {
    std::thread::spawn(move || loop {
        match term::poll(INPUT_POLL_INTERVAL) {
            Ok(false) => {
                if events.is_closed() {
                    break;
                }
                continue;
            }
            Ok(true) => {}
            Err(e) => {
                tracing::warn!(error = %e, "terminal poll failed");
                break;
            }
        }
        let event = match term::read() {
            Ok(TermEvent::Key(key)) => Event::Key(key),
            Ok(TermEvent::Resize(width, height)) => Event::Resize { width, height },
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "terminal read failed");
                break;
            }
        };
        if events.send(event).is_err() {
            break;
        }
    });
}

fn spawn_ticker(events: UnboundedSender<Event>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        loop {
            interval.tick().await;
            if events.send(Event::Tick).is_err() {
                break;
            }
        }
    });
}

/// Drive the reducer until it asks to quit. Returns the checked-out branch.
async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    prefill: CredentialPrefill,
    dispatcher: &Dispatcher,
    mut events: UnboundedReceiver<Event>,
) -> Result<Option<String>> {
    let (state, effect) = app::init(prefill);
    if let Some(effect) = effect {
        dispatcher.dispatch(effect);
    }

    let size = terminal.size()?;
    let (mut state, _) = app::reduce(
        state,
        Event::Resize {
            width: size.width,
            height: size.height,
        },
    );
    terminal.draw(|frame| ui::draw(frame, &state))?;

    while let Some(event) = events.recv().await {
        let (next, effect) = app::reduce(state, event);
        state = next;

        if let Some(effect) = effect {
            dispatcher.dispatch(effect);
        }

        if state.quit {
            return Ok(state.checked_out_branch);
        }

        terminal.draw(|frame| ui::draw(frame, &state))?;
    }

    Ok(None)
}
