use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;
use wash_registry::{DocumentKind, FilterField, LookupView};

use crate::app::input::helpers::{wrap_decrement, wrap_increment};

mod facilities;
mod help;
mod lookup;
mod overview;
mod schools;

pub async fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    // Text entry owns the keyboard until it is confirmed or cancelled.
    if app.lookup_editing {
        lookup::handle_lookup_input(app, key);
        return;
    }
    if app.search_active {
        facilities::handle_facilities_input(app, key);
        return;
    }

    if handle_global_input(app, key).await {
        return;
    }

    match app.screen {
        AppScreen::Schools => schools::handle_schools_input(app, key),
        AppScreen::Overview => overview::handle_overview_input(app, key),
        AppScreen::Map => {}
        AppScreen::Lookup => lookup::handle_lookup_input(app, key),
        AppScreen::Facilities => facilities::handle_facilities_input(app, key),
    }
}

async fn handle_global_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Tab => {
            let next = wrap_increment(app.screen.index(), AppScreen::ALL.len());
            switch_screen(app, AppScreen::from_index(next).unwrap_or(AppScreen::Schools));
        }
        KeyCode::BackTab => {
            let prev = wrap_decrement(app.screen.index(), AppScreen::ALL.len());
            switch_screen(app, AppScreen::from_index(prev).unwrap_or(AppScreen::Schools));
        }
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('f') => {
            app.filter_field_index = wrap_increment(app.filter_field_index, FilterField::ALL.len());
        }
        KeyCode::Char('F') => {
            app.filter_field_index = wrap_decrement(app.filter_field_index, FilterField::ALL.len());
        }
        KeyCode::Char('.') => app.cycle_filter_value(true),
        KeyCode::Char(',') => app.cycle_filter_value(false),
        KeyCode::Char('a') => app.apply_filters().await,
        _ => return false,
    }
    true
}

pub fn switch_screen(app: &mut App, screen: AppScreen) {
    match screen {
        AppScreen::Facilities => app.lookup.show_list(),
        AppScreen::Lookup if app.lookup.view() == &LookupView::List => {
            app.lookup.reset_to_scanner();
        }
        AppScreen::Overview if app.dataset.needs_facility_reload() && !app.is_loading() => {
            app.start_load(&[DocumentKind::Facilities]);
        }
        _ => {}
    }
    app.screen = screen;
}
