//! Events consumed by the application state machine.

use crate::models::{Quote, Symbol};
use crossterm::event::KeyEvent;

/// A firing of one of the two refresh timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Slow timer: poll every selected symbol.
    Data,
    /// Fast timer: redraw so the elapsed-time indicator stays live.
    Repaint,
}

/// Everything the event loop feeds into [`crate::app::App::handle_event`].
#[derive(Debug, Clone)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick(Tick),
    /// Result of one background fetch.
    QuoteFetched { symbol: Symbol, quote: Quote },
}

impl AppEvent {
    pub fn tick(&self) -> Option<Tick> {
        match self {
            AppEvent::Tick(tick) => Some(*tick),
            _ => None,
        }
    }
}
