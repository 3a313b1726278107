use crate::app::state::App;
use crossterm::event::KeyCode;
use wash_registry::SortKey;

pub fn handle_overview_input(app: &mut App, key: KeyCode) {
    let total = app.visible_districts().len();

    match key {
        KeyCode::Left => app.pager.prev(),
        KeyCode::Right => app.pager.next(total),
        KeyCode::Home => app.pager.reset(),
        KeyCode::End => {
            let last = app.pager.total_pages(total);
            app.pager.go_to(last, total);
        }
        KeyCode::Char(digit @ '1'..='4') => {
            let index = digit as usize - '1' as usize;
            if let Some(sort_key) = SortKey::from_index(index) {
                app.sort_by(sort_key);
            }
        }
        _ => {}
    }
}
