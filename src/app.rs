//! Application state and the interaction state machine.
//!
//! `App` is owned by the event loop and changed only through
//! [`App::handle_event`], one event at a time.

use crate::event::{AppEvent, Tick};
use crate::models::{Quote, Symbol};
use crate::profiles::ProfileId;
use crate::watchlist::Watchlist;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;
use tracing::{debug, info};

/// Longest symbol the input box accepts.
pub const INPUT_CHAR_LIMIT: usize = 50;

/// Which screen has the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Browsing,
    Input,
    ProfilePicker,
}

/// Session state: the single unit of truth behind every frame.
#[derive(Debug)]
pub struct App {
    pub watchlist: Watchlist,
    pub active_profile: ProfileId,
    pub mode: Mode,
    /// Highlighted row in the profile picker
    pub profile_cursor: usize,
    /// Text typed in input mode
    pub input: String,
    /// When the last fetch result was applied
    pub last_update: Option<Instant>,
    running: bool,
}

impl App {
    /// Start a session with every initial symbol selected.
    pub fn new(initial: Vec<Symbol>) -> Self {
        Self {
            watchlist: Watchlist::new(initial),
            active_profile: ProfileId::Custom,
            mode: Mode::Browsing,
            profile_cursor: 0,
            input: String::new(),
            last_update: None,
            running: true,
        }
    }

    /// Symbols to fetch right after startup.
    pub fn initial_fetches(&self) -> Vec<Symbol> {
        self.watchlist.selected_symbols()
    }

    /// Apply one event. Returns the symbols that must be fetched now.
    pub fn handle_event(&mut self, event: AppEvent) -> Vec<Symbol> {
        match event {
            AppEvent::Tick(Tick::Data) => self.watchlist.selected_symbols(),
            AppEvent::Tick(Tick::Repaint) => Vec::new(),
            AppEvent::QuoteFetched { symbol, quote } => {
                self.apply_quote(symbol, quote);
                Vec::new()
            }
            AppEvent::Key(key) => self.handle_key(key),
        }
    }

    fn apply_quote(&mut self, symbol: Symbol, quote: Quote) {
        if self.watchlist.record_quote(symbol.clone(), quote) {
            self.last_update = Some(Instant::now());
        } else {
            debug!(%symbol, "dropping quote for symbol no longer on the list");
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Symbol> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return Vec::new();
        }

        match self.mode {
            Mode::Browsing => self.handle_browsing_key(key.code),
            Mode::Input => self.handle_input_key(key.code),
            Mode::ProfilePicker => self.handle_picker_key(key.code),
        }
    }

    fn handle_browsing_key(&mut self, code: KeyCode) -> Vec<Symbol> {
        match code {
            KeyCode::Char('q') => self.quit(),

            // Navigation
            KeyCode::Up | KeyCode::Char('k') => self.watchlist.cursor_up(),
            KeyCode::Down | KeyCode::Char('j') => self.watchlist.cursor_down(),
            KeyCode::Home | KeyCode::Char('g') => self.watchlist.cursor_top(),
            KeyCode::End | KeyCode::Char('G') => self.watchlist.cursor_bottom(),

            // Selection
            KeyCode::Enter | KeyCode::Char(' ') => return self.toggle_at_cursor(),
            KeyCode::Char('d') => self.delete_at_cursor(),
            KeyCode::Char('r') => return self.watchlist.selected_symbols(),

            // Mode switches
            KeyCode::Char('a') => {
                self.input.clear();
                self.mode = Mode::Input;
            }
            KeyCode::Char('p') => self.mode = Mode::ProfilePicker,

            _ => {}
        }
        Vec::new()
    }

    fn handle_input_key(&mut self, code: KeyCode) -> Vec<Symbol> {
        match code {
            KeyCode::Enter => {
                self.mode = Mode::Browsing;
                let raw = std::mem::take(&mut self.input);
                if let Some(symbol) = Symbol::new(&raw) {
                    return self.add_symbol(symbol);
                }
            }
            KeyCode::Esc => {
                self.input.clear();
                self.mode = Mode::Browsing;
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if !c.is_control() => {
                if self.input.chars().count() < INPUT_CHAR_LIMIT {
                    self.input.push(c);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_picker_key(&mut self, code: KeyCode) -> Vec<Symbol> {
        match code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Up | KeyCode::Char('k') => {
                self.profile_cursor = self.profile_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.profile_cursor + 1 < ProfileId::ALL.len() {
                    self.profile_cursor += 1;
                }
            }
            KeyCode::Enter => {
                self.mode = Mode::Browsing;
                if let Some(profile) = ProfileId::from_index(self.profile_cursor) {
                    return self.activate_profile(profile);
                }
            }
            KeyCode::Esc | KeyCode::Char('p') => self.mode = Mode::Browsing,
            _ => {}
        }
        Vec::new()
    }

    /// Flip selection of the symbol under the cursor. A newly selected
    /// symbol is fetched straight away.
    pub fn toggle_at_cursor(&mut self) -> Vec<Symbol> {
        let Some(symbol) = self.watchlist.symbol_at_cursor().cloned() else {
            return Vec::new();
        };
        self.active_profile = ProfileId::Custom;
        if self.watchlist.toggle_select(&symbol) {
            vec![symbol]
        } else {
            Vec::new()
        }
    }

    /// Append (or re-select) a symbol and fetch it immediately.
    pub fn add_symbol(&mut self, symbol: Symbol) -> Vec<Symbol> {
        info!(%symbol, "adding symbol");
        self.watchlist.add(symbol.clone());
        self.active_profile = ProfileId::Custom;
        vec![symbol]
    }

    pub fn delete_at_cursor(&mut self) {
        if let Some(symbol) = self.watchlist.delete_at_cursor() {
            info!(%symbol, "removed symbol");
            self.active_profile = ProfileId::Custom;
        }
    }

    /// Switch to a profile. `Custom` keeps the current list untouched.
    pub fn activate_profile(&mut self, profile: ProfileId) -> Vec<Symbol> {
        info!(profile = profile.name(), "activating profile");
        self.active_profile = profile;
        if profile.is_custom() {
            return Vec::new();
        }
        self.watchlist.replace(profile.symbols());
        self.watchlist.selected_symbols()
    }

    /// Rows of the price panel: selected symbols in order with their quote.
    pub fn visible_quotes(&self) -> impl Iterator<Item = (&Symbol, Option<&Quote>)> {
        self.watchlist
            .symbols()
            .iter()
            .filter(|s| self.watchlist.is_selected(s))
            .map(|s| (s, self.watchlist.quote(s)))
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn should_quit(&self) -> bool {
        !self.running
    }

    /// Seconds since the last applied quote, if any arrived yet.
    pub fn seconds_since_update(&self) -> Option<u64> {
        self.last_update.map(|t| t.elapsed().as_secs())
    }

    /// Get time since last update as human readable string.
    pub fn time_since_update(&self) -> String {
        match self.seconds_since_update() {
            Some(secs) => format!(
                "{} ago",
                humantime::format_duration(std::time::Duration::from_secs(secs))
            ),
            None => "never".to_string(),
        }
    }
}
