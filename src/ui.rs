//! Terminal user interface with ratatui.
//!
//! Rendering is a pure function of [`App`]; nothing here mutates state.

use crate::app::{App, Mode};
use crate::config::Theme;
use crate::models::{AssetClass, Quote, Symbol};
use crate::profiles::ProfileId;
use chrono::Local;
use num_format::{Locale, ToFormattedString};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
};

/// Render the screen for the current mode.
pub fn render(frame: &mut Frame, app: &App, theme: &Theme) {
    match app.mode {
        Mode::Browsing => render_dashboard(frame, app, theme),
        Mode::Input => render_input(frame, app, theme),
        Mode::ProfilePicker => render_profile_menu(frame, app, theme),
    }
}

fn outer_block(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent))
}

fn title_style(theme: &Theme) -> Style {
    Style::default().fg(theme.title).add_modifier(Modifier::BOLD)
}

fn key_hint(theme: &Theme, pairs: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(pairs.len() * 2);
    for (i, (key, action)) in pairs.iter().enumerate() {
        let sep = if i == 0 { "" } else { " | " };
        spans.push(Span::styled(
            format!("{sep}{key}"),
            Style::default().fg(theme.highlight),
        ));
        spans.push(Span::styled(
            format!(": {action}"),
            Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
        ));
    }
    Line::from(spans)
}

/// Prices on top, the editable watch-list below.
fn render_dashboard(frame: &mut Frame, app: &App, theme: &Theme) {
    let block = outer_block(theme);
    let inner = block.inner(frame.area());
    frame.render_widget(block, frame.area());

    let price_rows = app.visible_quotes().count().max(1) as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),              // Title
            Constraint::Length(price_rows + 1), // Prices
            Constraint::Length(2),              // Updated
            Constraint::Min(3),                 // Watch-list
            Constraint::Length(1),              // Footer
        ])
        .split(inner);

    render_header(frame, app, chunks[0], theme);
    render_prices(frame, app, chunks[1], theme);
    render_updated(frame, app, chunks[2], theme);
    render_watchlist(frame, app, chunks[3], theme);

    let footer = key_hint(
        theme,
        &[
            ("space/enter", "toggle"),
            ("a", "add"),
            ("d", "delete"),
            ("r", "refresh"),
            ("p", "profiles"),
            ("q", "quit"),
        ],
    );
    frame.render_widget(Paragraph::new(footer), chunks[4]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let header = Line::from(vec![
        Span::styled(" PRICE MONITOR ", title_style(theme)),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", app.active_profile.name()),
            Style::default().fg(theme.gain).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", Local::now().format("%H:%M:%S")),
            Style::default().fg(theme.muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn render_prices(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let mut lines: Vec<Line> = app
        .visible_quotes()
        .map(|(symbol, quote)| price_line(symbol, quote, theme))
        .collect();

    if !app.watchlist.has_selection() {
        lines.push(Line::styled(
            "No symbols selected (press space to select)",
            Style::default().fg(theme.muted),
        ));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn price_line(symbol: &Symbol, quote: Option<&Quote>, theme: &Theme) -> Line<'static> {
    let label = Span::styled(
        format!("{:<10}", symbol.as_str()),
        Style::default().fg(class_color(symbol.asset_class(), theme)),
    );

    match quote.filter(|q| q.is_available()) {
        Some(quote) => {
            let change_color = if quote.change_percent > 0.0 {
                theme.gain
            } else if quote.change_percent < 0.0 {
                theme.loss
            } else {
                theme.muted
            };
            Line::from(vec![
                label,
                Span::raw(format!(" {:>14}  ", format_price(quote.price))),
                Span::styled(
                    format_change(quote.change_percent),
                    Style::default()
                        .fg(change_color)
                        .add_modifier(Modifier::BOLD),
                ),
            ])
        }
        None => Line::from(vec![
            label,
            Span::styled(" Loading...", Style::default().fg(theme.muted)),
        ]),
    }
}

fn render_updated(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let updated = Paragraph::new(Line::styled(
        format!("Updated: {}", app.time_since_update()),
        Style::default().fg(theme.muted),
    ))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(theme.muted)),
    );
    frame.render_widget(updated, area);
}

fn render_watchlist(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let cursor = app.watchlist.cursor();
    let items: Vec<ListItem> = app
        .watchlist
        .symbols()
        .iter()
        .enumerate()
        .map(|(i, symbol)| {
            let pointer = if i == cursor {
                Span::styled(
                    "> ",
                    Style::default().fg(theme.cursor).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw("  ")
            };

            let selected = app.watchlist.is_selected(symbol);
            let (checkbox, symbol_style) = if selected {
                let style = Style::default()
                    .fg(theme.highlight)
                    .add_modifier(Modifier::BOLD);
                (Span::styled("[*] ", style), style)
            } else {
                (Span::raw("[ ] "), Style::default())
            };

            let class = symbol.asset_class();
            ListItem::new(Line::from(vec![
                pointer,
                checkbox,
                Span::styled(format!("{:<10} ", symbol.as_str()), symbol_style),
                Span::styled(
                    format!("[{}]", class.label()),
                    Style::default().fg(class_color(class, theme)),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(Line::styled("Select monitors:", title_style(theme)))
            .borders(Borders::NONE),
    );

    let mut state = ListState::default();
    if !app.watchlist.is_empty() {
        state.select(Some(cursor));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_input(frame: &mut Frame, app: &App, theme: &Theme) {
    let area = centered_rect(70, 40, frame.area());

    let input_line = if app.input.is_empty() {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(theme.cursor)),
            Span::styled(
                "Enter symbol (AAPL for stock, BTCUSDT for crypto)...",
                Style::default().fg(theme.muted),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(theme.cursor)),
            Span::raw(app.input.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])
    };

    let text = vec![
        Line::styled(" Add New Symbol ", title_style(theme)),
        Line::from(""),
        input_line,
        Line::from(""),
        Line::styled(
            "Stock: AAPL | Crypto: BTCUSDT",
            Style::default().fg(theme.muted),
        ),
        key_hint(theme, &[("enter", "save"), ("esc", "cancel")]),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(text).block(outer_block(theme)), area);
}

fn render_profile_menu(frame: &mut Frame, app: &App, theme: &Theme) {
    let area = centered_rect(60, 60, frame.area());

    let mut text = vec![
        Line::styled(" SELECT PROFILE ", title_style(theme)),
        Line::from(""),
    ];

    for (i, profile) in ProfileId::ALL.iter().enumerate() {
        let pointer = if i == app.profile_cursor {
            Span::styled(
                "> ",
                Style::default().fg(theme.cursor).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::raw("  ")
        };
        let mut spans = vec![pointer, Span::raw(profile.name())];
        if *profile == app.active_profile {
            spans.push(Span::styled(
                " ✓",
                Style::default()
                    .fg(theme.highlight)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        text.push(Line::from(spans));
    }

    text.push(Line::from(""));
    text.push(key_hint(
        theme,
        &[
            ("↑/↓", "navigate"),
            ("enter", "select"),
            ("esc", "cancel"),
            ("q", "quit"),
        ],
    ));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(text).block(outer_block(theme)), area);
}

fn class_color(class: AssetClass, theme: &Theme) -> ratatui::style::Color {
    match class {
        AssetClass::Crypto => theme.crypto,
        AssetClass::Equity => theme.equity,
    }
}

/// Create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Format price with thousands separators. Sub-dollar prices get more
/// decimals.
pub fn format_price(price: f64) -> String {
    if price >= 1.0 {
        let cents = (price * 100.0).round() as u64;
        format!(
            "${}.{:02}",
            (cents / 100).to_formatted_string(&Locale::en),
            cents % 100
        )
    } else {
        format!("${:.6}", price)
    }
}

/// Signed percentage, with a bare `0.00%` for no change.
pub fn format_change(change_percent: f64) -> String {
    if change_percent == 0.0 {
        "0.00%".to_string()
    } else {
        format!("{:+.2}%", change_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::AppEvent;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};

    fn sym(s: &str) -> Symbol {
        Symbol::new(s).unwrap()
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal
            .draw(|f| render(f, app, &Theme::default()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(61234.5), "$61,234.50");
        assert_eq!(format_price(189.844), "$189.84");
        assert_eq!(format_price(0.081234), "$0.081234");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(-2.31), "-2.31%");
        assert_eq!(format_change(0.64), "+0.64%");
        assert_eq!(format_change(0.0), "0.00%");
    }

    #[test]
    fn test_dashboard_shows_quotes_and_loading() {
        let mut app = App::new(vec![sym("BTCUSDT"), sym("AAPL")]);
        app.handle_event(AppEvent::QuoteFetched {
            symbol: sym("BTCUSDT"),
            quote: Quote::new(61234.5, -2.31),
        });

        let screen = draw(&app);

        assert!(screen.contains("[Custom]"));
        assert!(screen.contains("$61,234.50"));
        assert!(screen.contains("-2.31%"));
        assert!(screen.contains("Loading..."));
        assert!(screen.contains("[CRYPTO]"));
        assert!(screen.contains("[STOCK]"));
    }

    #[test]
    fn test_dashboard_without_selection() {
        let mut app = App::new(vec![sym("AAPL")]);
        press(&mut app, KeyCode::Char(' '));

        let screen = draw(&app);

        assert!(screen.contains("No symbols selected"));
        assert!(screen.contains("Updated: never"));
    }

    #[test]
    fn test_deleted_symbol_is_not_rendered() {
        let mut app = App::new(vec![sym("TSLA"), sym("AAPL")]);
        press(&mut app, KeyCode::Char('d'));
        app.handle_event(AppEvent::QuoteFetched {
            symbol: sym("TSLA"),
            quote: Quote::new(250.0, 3.0),
        });

        let screen = draw(&app);

        assert!(!screen.contains("TSLA"));
        assert!(screen.contains("AAPL"));
    }

    #[test]
    fn test_input_and_picker_screens() {
        let mut app = App::new(vec![sym("AAPL")]);
        press(&mut app, KeyCode::Char('a'));
        assert!(draw(&app).contains("Add New Symbol"));

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('p'));
        let screen = draw(&app);
        assert!(screen.contains("SELECT PROFILE"));
        assert!(screen.contains("Top 10 Crypto"));
        assert!(screen.contains("All Markets"));
    }
}
