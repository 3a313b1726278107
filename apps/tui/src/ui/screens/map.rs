use crate::app::App;
use crate::ui::widgets::map::{legend_line, render_choropleth};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use wash_registry::filters::is_all;
use wash_registry::FilterState;

pub fn render_map(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    render_choropleth(
        &app.dataset.boundaries,
        highlighted_county(&app.filters),
        f,
        chunks[0],
    );

    f.render_widget(
        Paragraph::new(legend_line()).alignment(Alignment::Center),
        chunks[1],
    );
}

/// The county to pick out on the map, or `None` when every county is selected.
fn highlighted_county(filters: &FilterState) -> Option<&str> {
    let county = filters.county.as_str();
    (!is_all(county)).then_some(county)
}
