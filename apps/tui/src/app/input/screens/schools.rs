use crate::app::input::helpers::step_selection;
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_schools_input(app: &mut App, key: KeyCode) {
    let total_rows = app.dataset.schools.len();

    match key {
        KeyCode::Enter => {
            if total_rows > 0 {
                app.expansion.toggle(app.selected_school_index);
            }
        }
        KeyCode::Esc => app.expansion.collapse(),
        KeyCode::Up => {
            app.selected_school_index = step_selection(app.selected_school_index, -1, total_rows);
        }
        KeyCode::Down => {
            app.selected_school_index = step_selection(app.selected_school_index, 1, total_rows);
        }
        KeyCode::PageUp => {
            app.selected_school_index = step_selection(app.selected_school_index, -5, total_rows);
        }
        KeyCode::PageDown => {
            app.selected_school_index = step_selection(app.selected_school_index, 5, total_rows);
        }
        KeyCode::Home => app.selected_school_index = 0,
        KeyCode::End => app.selected_school_index = total_rows.saturating_sub(1),
        _ => {}
    }
}
