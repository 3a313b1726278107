use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    let typing = app.lookup_editing || app.search_active;
    if key == KeyCode::F(1) || (key == KeyCode::Char('?') && !typing) {
        app.show_help = !app.show_help;
        return true;
    }

    if app.show_help {
        if key == KeyCode::Esc {
            app.show_help = false;
        }
        return true;
    }

    false
}
