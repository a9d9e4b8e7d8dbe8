//! Keyboard event handling.

use crate::app::{App, AppState, InputMode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle a key event. Returns true if the app should quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    // Ctrl+C quits from anywhere
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.close_modal();
        app.state = AppState::Quit;
        return true;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Search => handle_search_key(app, key),
        InputMode::Modal => handle_modal_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) -> bool {
    // Ctrl+P to search
    if key.code == KeyCode::Char('p') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.start_search();
        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::Quit;
            true
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_down();
            false
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up();
            false
        }
        KeyCode::Char('n') => {
            app.open_new_car();
            false
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            app.open_selected_car();
            false
        }
        KeyCode::Char('r') => {
            app.reload();
            false
        }
        KeyCode::Char('/') => {
            app.start_search();
            false
        }
        _ => false,
    }
}

fn handle_modal_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.close_modal(),
        KeyCode::Enter => app.submit_modal(),
        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_prev(),
        KeyCode::Right => app.modal_cycle(true),
        KeyCode::Left => app.modal_cycle(false),
        KeyCode::Backspace => app.modal_backspace(),
        KeyCode::Char(c) => app.modal_input_char(c),
        _ => {}
    }
    false
}

fn handle_search_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.exit_search();
            false
        }
        KeyCode::Enter => {
            app.select_search_result();
            false
        }
        KeyCode::Up => {
            if app.search_selected_index > 0 {
                app.search_selected_index -= 1;
            }
            false
        }
        KeyCode::Down => {
            if app.search_selected_index + 1 < app.search_results.len() {
                app.search_selected_index += 1;
            }
            false
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            app.perform_search();
            false
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            app.perform_search();
            false
        }
        _ => false,
    }
}
