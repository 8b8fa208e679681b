//! pricewatch - a terminal dashboard for stock and crypto prices.

mod api;
mod app;
mod cli;
mod config;
mod event;
mod logging;
mod models;
mod profiles;
mod scheduler;
mod terminal;
mod ui;
mod watchlist;

use anyhow::{Context, Result};
use api::{QuoteClient, QuoteSource};
use app::App;
use cli::Args;
use config::{Config, Theme};
use crossterm::event::{Event, EventStream, KeyEventKind};
use event::AppEvent;
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use scheduler::{FetchDispatcher, RefreshScheduler};
use std::io::Stdout;
use std::sync::Arc;
use terminal::TerminalGuard;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if args.sample_config {
        print!("{}", config::sample_config());
        println!("# Default location: {:?}", Config::default_config_path());
        return Ok(());
    }

    // Resolve the watch-list before touching anything else
    let symbols = match &args.profile {
        Some(path) => match config::load_symbols_file(path) {
            Ok(symbols) => symbols,
            Err(e) => {
                eprintln!("Error loading profile from file: {e}");
                std::process::exit(1);
            }
        },
        None => config::default_symbols(),
    };

    let log_dir = args
        .log_dir
        .clone()
        .unwrap_or_else(logging::default_log_dir);
    logging::init_logging(&log_dir, args.log_level())?;
    info!(version = env!("CARGO_PKG_VERSION"), "pricewatch starting");
    debug!(?args, "parsed arguments");

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(),
    };
    apply_overrides(&mut config, &args);

    let api_key = config::load_api_key(&config.general.api_key_file).unwrap_or_default();
    let client = QuoteClient::new(&config.providers, api_key, config.timeout())?;
    if !client.has_api_key() {
        info!("equity quotes disabled: no API key");
    }

    let mut app = App::new(symbols);
    let theme = config.theme();

    let result = run_interactive(&mut app, client, &config, &theme).await;
    match &result {
        Ok(()) => info!("quit"),
        Err(e) => error!("exiting on error: {e:#}"),
    }
    result
}

/// Command-line flags win over the config file.
fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(delay) = args.delay {
        config.general.refresh_interval = delay;
    }
    if let Some(timeout) = args.timeout {
        config.general.timeout = timeout;
    }
    if let Some(ref key_file) = args.key_file {
        config.general.api_key_file = key_file.clone();
    }
}

/// Set up the fetch pipeline and the terminal, then run until quit.
async fn run_interactive<S: QuoteSource>(
    app: &mut App,
    source: S,
    config: &Config,
    theme: &Theme,
) -> Result<()> {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let dispatcher = FetchDispatcher::new(Arc::new(source), events_tx);
    let mut scheduler = RefreshScheduler::new(config.refresh_interval(), config.repaint_interval());
    info!(
        symbols = app.watchlist.len(),
        refresh = ?scheduler.data_interval(),
        "starting session"
    );

    // Initial fetch
    dispatcher.dispatch(app.initial_fetches());

    let mut guard = TerminalGuard::new()?;
    run_app(
        &mut guard.terminal,
        app,
        &mut scheduler,
        &dispatcher,
        events_rx,
        theme,
    )
    .await
}

/// Main application loop. One event at a time; redraw before the next.
async fn run_app<S: QuoteSource>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    scheduler: &mut RefreshScheduler,
    dispatcher: &FetchDispatcher<S>,
    mut events: UnboundedReceiver<AppEvent>,
    theme: &Theme,
) -> Result<()> {
    let mut input = EventStream::new();

    while !app.should_quit() {
        terminal.draw(|f| ui::render(f, app, theme))?;

        let event = tokio::select! {
            tick = scheduler.next_tick() => AppEvent::Tick(tick),
            Some(event) = events.recv() => event,
            terminal_event = input.next() => match terminal_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                // Resizes and the rest only need a redraw
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e).context("Failed to read terminal input"),
                None => break,
            },
        };

        let fired = event.tick();
        let fetches = app.handle_event(event);
        dispatcher.dispatch(fetches);

        if let Some(tick) = fired {
            scheduler.rearm(tick);
        }
    }

    Ok(())
}
