use crate::app::App;
use crate::ui::widgets::charts::render_summary_cards;
use crate::ui::widgets::tables::{
    functionality_color, header_style, jmp_color, scroll_offset, selected_style,
};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;
use wash_registry::format::{storage_label, toilets_label, water_access_label};
use wash_registry::School;

pub fn render_schools(app: &App, f: &mut Frame<'_>, area: Rect) {
    let expanded = app
        .expansion
        .open_row()
        .and_then(|row| app.dataset.schools.get(row));

    let constraints = if expanded.is_some() {
        vec![
            Constraint::Length(3),
            Constraint::Percentage(50),
            Constraint::Min(6),
        ]
    } else {
        vec![Constraint::Length(3), Constraint::Min(5)]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_summary_cards(app, f, chunks[0]);
    render_school_table(app, f, chunks[1]);

    if let Some(school) = expanded {
        render_school_detail(app, school, f, chunks[2]);
    }
}

fn render_school_table(app: &App, f: &mut Frame<'_>, area: Rect) {
    let schools = &app.dataset.schools;
    if schools.is_empty() {
        let block = Block::default()
            .title("Schools")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        let message = if app.is_loading() {
            "Loading schools..."
        } else {
            "No schools found."
        };
        let paragraph = Paragraph::new(message)
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from(""),
        Cell::from("School"),
        Cell::from("Type"),
        Cell::from("Province"),
        Cell::from("Water Access"),
        Cell::from("Toilets"),
        Cell::from("Handwashing"),
        Cell::from("Storage"),
        Cell::from("Updated"),
    ])
    .style(header_style());

    let total_rows = schools.len();
    let max_visible_rows = area.height.saturating_sub(3) as usize;
    let offset = scroll_offset(total_rows, max_visible_rows, app.selected_school_index);

    let rows = schools
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(index, school)| {
            let style = if index == app.selected_school_index {
                selected_style()
            } else {
                Style::default()
            };
            let marker = if app.expansion.is_open(index) { "▾" } else { "▸" };
            let data = &school.wash_data;

            Row::new(vec![
                Cell::from(marker),
                Cell::from(school.name.clone()),
                Cell::from(school.school_type.label().to_string()),
                Cell::from(school.province.clone()),
                Cell::from(water_access_label(data)),
                Cell::from(toilets_label(data)),
                Cell::from(data.handwashing_stations.to_string()),
                Cell::from(storage_label(data)),
                Cell::from(school.last_updated.clone()),
            ])
            .style(style)
        });

    let widths = [
        Constraint::Length(1),
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(16),
        Constraint::Length(8),
        Constraint::Length(11),
        Constraint::Length(12),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(
                    "Schools ({} of {})",
                    app.selected_school_index + 1,
                    total_rows
                ))
                .borders(Borders::ALL),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

/// Linked water points for the expanded school.
fn render_school_detail(app: &App, school: &School, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!(" {} - Water Facilities ", school.name))
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let facilities = app.dataset.facilities_for(school);
    if facilities.is_empty() {
        let paragraph = Paragraph::new("No facilities recorded for this school")
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    let lines: Vec<TextLine<'_>> = facilities
        .iter()
        .map(|facility| {
            TextLine::from(vec![
                Span::styled(
                    format!("{:<14}", facility.id),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(format!("{:<28}", facility.name)),
                Span::styled(
                    format!("{:<16}", facility.facility_type.label()),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    format!("{:<12}", facility.functionality.label()),
                    Style::default().fg(functionality_color(&facility.functionality)),
                ),
                Span::styled(
                    facility.jmp_status.label().to_string(),
                    Style::default().fg(jmp_color(&facility.jmp_status)),
                ),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(Text::from(lines)).block(block);
    f.render_widget(paragraph, area);
}
