//! Watch-list store: ordered symbols, the selected subset and the quote cache.

use crate::models::{Quote, Symbol};
use std::collections::{HashMap, HashSet};

/// Ordered list of tracked symbols with selection state and last quotes.
///
/// Every selected symbol is also in `symbols`; every cached quote belongs
/// to a symbol in `symbols`.
#[derive(Debug, Clone, Default)]
pub struct Watchlist {
    symbols: Vec<Symbol>,
    selected: HashSet<Symbol>,
    quotes: HashMap<Symbol, Quote>,
    cursor: usize,
}

impl Watchlist {
    /// Build a list with every symbol selected. Duplicates keep their first position.
    pub fn new(initial: impl IntoIterator<Item = Symbol>) -> Self {
        let mut list = Self::default();
        list.replace(initial);
        list
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn is_selected(&self, symbol: &Symbol) -> bool {
        self.selected.contains(symbol)
    }

    /// Selected symbols in display order.
    pub fn selected_symbols(&self) -> Vec<Symbol> {
        self.symbols
            .iter()
            .filter(|s| self.selected.contains(*s))
            .cloned()
            .collect()
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn quote(&self, symbol: &Symbol) -> Option<&Quote> {
        self.quotes.get(symbol)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn symbol_at_cursor(&self) -> Option<&Symbol> {
        self.symbols.get(self.cursor)
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.symbols.len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_top(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_bottom(&mut self) {
        self.cursor = self.symbols.len().saturating_sub(1);
    }

    /// Flip the selection of `symbol`. Returns whether it is selected now.
    ///
    /// Symbols that are not on the list are left alone and report `false`.
    pub fn toggle_select(&mut self, symbol: &Symbol) -> bool {
        if !self.contains(symbol) {
            return false;
        }
        if self.selected.remove(symbol) {
            false
        } else {
            self.selected.insert(symbol.clone());
            true
        }
    }

    /// Append `symbol` unless already present, and select it either way.
    pub fn add(&mut self, symbol: Symbol) {
        if !self.contains(&symbol) {
            self.symbols.push(symbol.clone());
        }
        self.selected.insert(symbol);
    }

    /// Remove the symbol under the cursor from the list, the selection and
    /// the cache. Returns the removed symbol.
    pub fn delete_at_cursor(&mut self) -> Option<Symbol> {
        if self.cursor >= self.symbols.len() {
            return None;
        }
        let removed = self.symbols.remove(self.cursor);
        self.selected.remove(&removed);
        self.quotes.remove(&removed);
        if self.cursor >= self.symbols.len() && self.cursor > 0 {
            self.cursor -= 1;
        }
        Some(removed)
    }

    /// Replace the whole list, selecting everything and resetting the cursor.
    pub fn replace(&mut self, symbols: impl IntoIterator<Item = Symbol>) {
        let mut seen = HashSet::new();
        self.symbols = symbols
            .into_iter()
            .filter(|s| seen.insert(s.clone()))
            .collect();
        self.selected = seen;
        self.quotes.retain(|symbol, _| self.selected.contains(symbol));
        self.cursor = 0;
    }

    /// Store a fetched quote. Results for symbols that have left the list
    /// are dropped and reported as `false`.
    pub fn record_quote(&mut self, symbol: Symbol, quote: Quote) -> bool {
        if !self.contains(&symbol) {
            return false;
        }
        self.quotes.insert(symbol, quote);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Symbol {
        Symbol::new(s).unwrap()
    }

    fn list(names: &[&str]) -> Watchlist {
        Watchlist::new(names.iter().map(|n| sym(n)))
    }

    fn assert_invariants(list: &Watchlist) {
        for s in list.selected_symbols() {
            assert!(list.contains(&s));
        }
        for s in list.quotes.keys() {
            assert!(list.contains(s));
        }
        if list.is_empty() {
            assert_eq!(list.cursor(), 0);
        } else {
            assert!(list.cursor() < list.len());
        }
    }

    #[test]
    fn test_new_selects_everything_and_dedups() {
        let list = list(&["AAPL", "BTCUSDT", "AAPL", "MSFT"]);
        assert_eq!(list.symbols(), &[sym("AAPL"), sym("BTCUSDT"), sym("MSFT")]);
        assert_eq!(list.selected_symbols().len(), 3);
        assert_invariants(&list);
    }

    #[test]
    fn test_toggle_twice_restores_selection() {
        let mut list = list(&["AAPL", "MSFT"]);
        let before = list.selected_symbols();

        assert!(!list.toggle_select(&sym("AAPL")));
        assert_eq!(list.selected_symbols(), vec![sym("MSFT")]);
        assert!(list.toggle_select(&sym("AAPL")));

        assert_eq!(list.selected_symbols(), before);
        assert_eq!(list.symbols(), &[sym("AAPL"), sym("MSFT")]);
    }

    #[test]
    fn test_toggle_unknown_symbol_is_ignored() {
        let mut list = list(&["AAPL"]);
        assert!(!list.toggle_select(&sym("TSLA")));
        assert!(!list.is_selected(&sym("TSLA")));
        assert_invariants(&list);
    }

    #[test]
    fn test_add_appends_once_and_selects() {
        let mut list = list(&["AAPL"]);
        list.toggle_select(&sym("AAPL"));

        list.add(sym("BTCUSDT"));
        list.add(sym("AAPL"));

        assert_eq!(list.symbols(), &[sym("AAPL"), sym("BTCUSDT")]);
        assert!(list.is_selected(&sym("AAPL")));
        assert!(list.is_selected(&sym("BTCUSDT")));
    }

    #[test]
    fn test_delete_at_every_position() {
        let names = ["AAPL", "MSFT", "GOOGL", "BTCUSDT"];
        for position in 0..names.len() {
            let mut list = list(&names);
            for name in names {
                list.record_quote(sym(name), Quote::new(1.0, 0.5));
            }
            for _ in 0..position {
                list.cursor_down();
            }

            let removed = list.delete_at_cursor().unwrap();

            assert_eq!(removed, sym(names[position]));
            assert_eq!(list.len(), names.len() - 1);
            assert!(!list.contains(&removed));
            assert!(!list.is_selected(&removed));
            assert!(list.quote(&removed).is_none());
            assert_eq!(list.quotes.len(), names.len() - 1);
            assert_invariants(&list);
        }
    }

    #[test]
    fn test_delete_last_row_moves_cursor_back() {
        let mut list = list(&["AAPL", "MSFT"]);
        list.cursor_bottom();
        list.delete_at_cursor();
        assert_eq!(list.cursor(), 0);

        list.delete_at_cursor();
        assert!(list.is_empty());
        assert_eq!(list.cursor(), 0);
        assert!(list.delete_at_cursor().is_none());
    }

    #[test]
    fn test_replace_resets_state() {
        let mut list = list(&["AAPL", "MSFT"]);
        list.record_quote(sym("AAPL"), Quote::new(190.0, 1.0));
        list.record_quote(sym("MSFT"), Quote::new(410.0, -0.5));
        list.cursor_down();

        list.replace(vec![sym("BTCUSDT"), sym("AAPL")]);

        assert_eq!(list.symbols(), &[sym("BTCUSDT"), sym("AAPL")]);
        assert_eq!(list.selected_symbols(), vec![sym("BTCUSDT"), sym("AAPL")]);
        assert_eq!(list.cursor(), 0);
        assert!(list.quote(&sym("AAPL")).is_some());
        assert!(list.quote(&sym("MSFT")).is_none());

        // A fetch for MSFT issued before the switch lands afterwards
        assert!(!list.record_quote(sym("MSFT"), Quote::new(411.0, -0.4)));
        assert!(list.quote(&sym("MSFT")).is_none());
        assert!(!list.contains(&sym("MSFT")));
        assert_invariants(&list);
    }

    #[test]
    fn test_record_quote_for_absent_symbol_is_dropped() {
        let mut list = list(&["AAPL"]);
        assert!(!list.record_quote(sym("TSLA"), Quote::new(250.0, 2.0)));
        assert!(list.quote(&sym("TSLA")).is_none());
        assert!(list.record_quote(sym("AAPL"), Quote::new(190.0, 1.0)));
    }

    #[test]
    fn test_cursor_bounds() {
        let mut list = list(&["AAPL", "MSFT", "GOOGL"]);
        list.cursor_up();
        assert_eq!(list.cursor(), 0);
        for _ in 0..10 {
            list.cursor_down();
        }
        assert_eq!(list.cursor(), 2);
        list.cursor_top();
        assert_eq!(list.symbol_at_cursor(), Some(&sym("AAPL")));
    }
}
