use crate::app::App;
use crate::ui::widgets::tables::{
    functionality_color, header_style, jmp_color, scroll_offset, selected_style,
};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub fn render_facilities(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    render_search_bar(app, f, chunks[0]);
    render_facility_table(app, f, chunks[1]);
}

fn render_search_bar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let (line, border) = if app.search_active {
        (
            TextLine::from(vec![
                Span::raw(app.search_query.as_str()),
                Span::styled("█", Style::default().fg(Color::Yellow)),
            ]),
            Color::Yellow,
        )
    } else if app.search_query.is_empty() {
        (
            TextLine::from(Span::styled(
                "Press / to search by DPI ID or name",
                Style::default().fg(Color::Gray),
            )),
            Color::DarkGray,
        )
    } else {
        (TextLine::from(app.search_query.as_str()), Color::DarkGray)
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(paragraph, area);
}

fn render_facility_table(app: &App, f: &mut Frame<'_>, area: Rect) {
    let facilities = &app.dataset.facilities;
    let matches = &app.filtered_facility_indices;

    if matches.is_empty() {
        let message = if facilities.is_empty() {
            "No facilities loaded. Press r to reload."
        } else {
            "No facilities match your search."
        };
        let paragraph = Paragraph::new(message)
            .block(
                Block::default()
                    .title("Facilities")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("DPI ID"),
        Cell::from("Name"),
        Cell::from("Type"),
        Cell::from("Location"),
        Cell::from("Status"),
        Cell::from("JMP"),
    ])
    .style(header_style());

    let max_visible_rows = area.height.saturating_sub(3) as usize;
    let offset = scroll_offset(matches.len(), max_visible_rows, app.selected_facility_index);

    let rows = matches
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .filter_map(|(position, index)| facilities.get(*index).map(|facility| (position, facility)))
        .map(|(position, facility)| {
            let selected = position == app.selected_facility_index;
            let status_style = if selected {
                selected_style()
            } else {
                Style::default().fg(functionality_color(&facility.functionality))
            };
            let jmp_style = if selected {
                selected_style()
            } else {
                Style::default().fg(jmp_color(&facility.jmp_status))
            };

            Row::new(vec![
                Cell::from(facility.id.clone()),
                Cell::from(facility.name.clone()),
                Cell::from(facility.facility_type.label().to_string()),
                Cell::from(facility.location.clone()),
                Cell::from(facility.functionality.label().to_string()).style(status_style),
                Cell::from(facility.jmp_status.label().to_string()).style(jmp_style),
            ])
            .style(if selected {
                selected_style()
            } else {
                Style::default()
            })
        });

    let widths = [
        Constraint::Length(14),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Min(14),
        Constraint::Length(16),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(
                    "Facilities ({} of {})",
                    app.selected_facility_index + 1,
                    matches.len()
                ))
                .borders(Borders::ALL),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}
