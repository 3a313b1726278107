// Rendering for the dashboard. Everything here reads `App` and draws; no state changes.

pub mod screens;
pub mod widgets;

use crate::app::state::AppScreen;
use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::Frame;
use widgets::bars::{render_filter_bar, render_shortcuts, render_status, render_tabs};

pub fn ui(app: &App, f: &mut Frame<'_>) {
    let layout = build_layout(f.area());

    render_tabs(app, f, layout[0]);
    render_filter_bar(app, f, layout[1]);

    match app.screen {
        AppScreen::Schools => screens::schools::render_schools(app, f, layout[2]),
        AppScreen::Overview => screens::overview::render_overview(app, f, layout[2]),
        AppScreen::Map => screens::map::render_map(app, f, layout[2]),
        AppScreen::Lookup => screens::lookup::render_lookup(app, f, layout[2]),
        AppScreen::Facilities => screens::facilities::render_facilities(app, f, layout[2]),
    }

    render_status(app, f, layout[3]);
    render_shortcuts(app, f, layout[4]);

    if app.show_help {
        let area = f.area();
        screens::help::render_help_popup(f, area);
    }
}

fn build_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Length(3), // Filters
            Constraint::Min(8),    // Screen content
            Constraint::Length(3), // Status
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(area.inner(Margin::new(1, 0)))
        .to_vec()
}
