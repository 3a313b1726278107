use crate::app::input::screens::switch_screen;
use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

pub fn handle_lookup_input(app: &mut App, key: KeyCode) {
    if app.lookup_editing {
        match key {
            KeyCode::Esc => {
                app.lookup_editing = false;
                app.lookup_input.clear();
            }
            KeyCode::Enter => app.submit_lookup_input(),
            KeyCode::Backspace => {
                app.lookup_input.pop();
            }
            KeyCode::Char(ch) => app.lookup_input.push(ch),
            _ => {}
        }
        return;
    }

    match key {
        KeyCode::Char('i' | '/') => {
            app.lookup.stop_scanning();
            app.lookup_editing = true;
        }
        KeyCode::Char('s') => app.lookup.start_scanning(),
        KeyCode::Char('x') => app.lookup.stop_scanning(),
        KeyCode::Char('l') => switch_screen(app, AppScreen::Facilities),
        KeyCode::Char('m') => app.lookup.show_map(),
        KeyCode::Char('h') => app.lookup.reset_to_scanner(),
        KeyCode::Esc | KeyCode::Backspace => {
            app.lookup.back();
            if app.lookup.view() == &wash_registry::LookupView::List {
                app.screen = AppScreen::Facilities;
            }
        }
        _ => {}
    }
}
