use crate::app::input::helpers::step_selection;
use crate::app::input::screens::switch_screen;
use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

pub fn handle_facilities_input(app: &mut App, key: KeyCode) {
    if app.search_active {
        match key {
            KeyCode::Esc => app.clear_search(),
            KeyCode::Enter => app.search_active = false,
            KeyCode::Backspace => {
                app.search_query.pop();
                app.update_facility_search();
            }
            KeyCode::Char(ch) => {
                app.search_query.push(ch);
                app.update_facility_search();
            }
            _ => {}
        }
        return;
    }

    let total_rows = app.filtered_facility_indices.len();
    match key {
        KeyCode::Char('/') => app.search_active = true,
        KeyCode::Enter => app.open_selected_facility(),
        KeyCode::Esc => {
            if app.search_query.is_empty() {
                switch_screen(app, AppScreen::Lookup);
            } else {
                app.clear_search();
            }
        }
        KeyCode::Up => {
            app.selected_facility_index =
                step_selection(app.selected_facility_index, -1, total_rows);
        }
        KeyCode::Down => {
            app.selected_facility_index = step_selection(app.selected_facility_index, 1, total_rows);
        }
        KeyCode::PageUp => {
            app.selected_facility_index =
                step_selection(app.selected_facility_index, -5, total_rows);
        }
        KeyCode::PageDown => {
            app.selected_facility_index = step_selection(app.selected_facility_index, 5, total_rows);
        }
        KeyCode::Home => app.selected_facility_index = 0,
        KeyCode::End => app.selected_facility_index = total_rows.saturating_sub(1),
        _ => {}
    }
}
