// src/app/input.rs
use crossterm::event::{KeyCode, KeyModifiers};

use crate::app::state::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Apply one key press to the app.
pub fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Char('1') => app.select_tab(0),
        KeyCode::Char('2') => app.select_tab(1),
        KeyCode::Char('3') => app.select_tab(2),
        KeyCode::Char('4') => app.select_tab(3),
        KeyCode::Left => app.prev_filter(),
        KeyCode::Right => app.next_filter(),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Tab => app.next_view(),
        KeyCode::Up => app.scroll_by(-1),
        KeyCode::Down => app.scroll_by(1),
        // calendar cursor
        KeyCode::Char('h') if app.selected_tab == 0 => app.move_cursor(-1),
        KeyCode::Char('l') if app.selected_tab == 0 => app.move_cursor(1),
        KeyCode::Char('k') if app.selected_tab == 0 => app.move_cursor(-7),
        KeyCode::Char('j') if app.selected_tab == 0 => app.move_cursor(7),
        _ => {}
    }
    Action::Continue
}

/// One-line key help for the status bar.
pub fn key_help(tab: usize) -> &'static str {
    match tab {
        0 => "1-4 tabs  ←/→ filter  h/j/k/l day  r reload  q quit",
        2 | 3 => "1-4 tabs  ←/→ filter  Tab next  ↑/↓ scroll  r reload  q quit",
        _ => "1-4 tabs  ←/→ filter  r reload  q quit",
    }
}
