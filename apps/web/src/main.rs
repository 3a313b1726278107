use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use ratzilla::event::KeyCode;
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line as TextLine, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap},
    Frame, Terminal,
};
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen_futures::spawn_local;
use wash_registry::format::{coordinates_label, toilets_label, water_access_label};
use wash_registry::{BoundarySchema, DocumentKind, Endpoints, FilterField, LookupView};

mod fetch;
mod state;
mod storage;

use state::{WebState, WebTab};

fn main() -> io::Result<()> {
    let state = Rc::new(RefCell::new(WebState::new()));

    // Documents are served next to the page.
    let endpoints = Endpoints::new("");
    for kind in DocumentKind::ALL {
        spawn_local(fetch::load_document(
            kind,
            endpoints.clone(),
            BoundarySchema::default(),
            state.clone(),
        ));
    }

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let state = state.clone();
        move |event| handle_key(&mut state.borrow_mut(), event.code)
    });

    terminal.draw_web(move |f| {
        let area = f.area();
        let block = Block::default()
            .title("WASH Registry Liberia")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(area).inner(Margin::new(1, 1));
        f.render_widget(block, area);

        render_dashboard(&state.borrow(), f, inner);
    });

    Ok(())
}

fn handle_key(state: &mut WebState, code: KeyCode) {
    match code {
        KeyCode::Left => state.tab = state.tab.step(false),
        KeyCode::Right => state.tab = state.tab.step(true),
        _ if state.tab == WebTab::Lookup => handle_lookup_key(state, code),
        KeyCode::Up => state.move_school(false),
        KeyCode::Down => state.move_school(true),
        KeyCode::Enter if state.tab == WebTab::Schools => {
            state.expansion.toggle(state.selected_school);
        }
        KeyCode::Esc => state.expansion.collapse(),
        KeyCode::Char('1') => state.tab = WebTab::Schools,
        KeyCode::Char('2') => state.tab = WebTab::Assets,
        KeyCode::Char('3') => state.tab = WebTab::Lookup,
        KeyCode::Char('f') => state.next_filter_field(),
        KeyCode::Char('.') => state.cycle_filter_value(true),
        KeyCode::Char(',') => state.cycle_filter_value(false),
        KeyCode::Char('a') => state.apply_filters(),
        _ => {}
    }
}

// The lookup tab owns the keyboard so IDs can be typed.
fn handle_lookup_key(state: &mut WebState, code: KeyCode) {
    match code {
        KeyCode::Char(ch) => state.lookup_input.push(ch),
        KeyCode::Backspace => {
            state.lookup_input.pop();
        }
        KeyCode::Enter => state.submit_lookup(),
        KeyCode::Up => state.lookup.start_scanning(),
        KeyCode::Esc => {
            state.lookup_input.clear();
            state.lookup.reset_to_scanner();
        }
        _ => {}
    }
}

fn render_dashboard(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(state, f, layout[0]);
    render_filters(state, f, layout[1]);

    let titles = WebTab::ALL
        .iter()
        .map(|tab| TextLine::from(tab.label()))
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .select(state.tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(0, 0, 238))
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));
    f.render_widget(tabs, layout[2]);

    match state.tab {
        WebTab::Schools => render_schools(state, f, layout[3]),
        WebTab::Assets => render_assets(state, f, layout[3]),
        WebTab::Lookup => render_lookup(state, f, layout[3]),
    }

    let hint = match state.tab {
        WebTab::Lookup => "←/→ tabs  type an ID + Enter  ↑ camera  Esc reset",
        _ => "←/→ or 1-3 tabs  ↑/↓ rows  Enter expand  f/,/. filters  a apply",
    };
    let footer = Paragraph::new(Span::styled(hint, Style::default().fg(Color::Gray)))
        .alignment(Alignment::Center);
    f.render_widget(footer, layout[4]);
}

fn render_header(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let summary = &state.summary;
    let mut spans = vec![
        Span::styled(
            format!("Schools: {}  ", summary.total_schools),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("With water: {}  ", summary.schools_with_water_label()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Functional: {}  ", summary.functional_assets),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!("Needs repair: {}", summary.assets_needing_repair),
            Style::default().fg(Color::Red),
        ),
    ];
    if !state.failed.is_empty() {
        spans.push(Span::styled(
            format!("  Failed: {}", state.failed.join(", ")),
            Style::default().fg(Color::Yellow),
        ));
    }

    let block = Block::default()
        .title("Overview")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let paragraph = Paragraph::new(Text::from(TextLine::from(spans)))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_filters(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let selected = state.filter_field();
    let spans = FilterField::ALL
        .iter()
        .flat_map(|field| {
            let style = if *field == selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let value_style = if state.pending_filters.get(*field) == state.filters.get(*field) {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::Yellow)
            };
            [
                Span::styled(format!("{}: ", field.label()), style),
                Span::styled(
                    format!("{}  ", state.pending_filters.get(*field)),
                    value_style,
                ),
            ]
        })
        .collect::<Vec<_>>();
    f.render_widget(Paragraph::new(TextLine::from(spans)), area);
}

fn render_schools(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let schools = &state.dataset.schools;
    if schools.is_empty() {
        let paragraph = Paragraph::new("Loading schools...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    }

    let expanded = state
        .expansion
        .open_row()
        .and_then(|row| schools.get(row));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(if expanded.is_some() {
            [Constraint::Percentage(60), Constraint::Percentage(40)]
        } else {
            [Constraint::Percentage(100), Constraint::Length(0)]
        })
        .split(area);

    let header = Row::new(vec![
        Cell::from("School"),
        Cell::from("Type"),
        Cell::from("Province"),
        Cell::from("Water Access"),
        Cell::from("Toilets"),
    ])
    .style(
        Style::default()
            .fg(Color::Rgb(0, 0, 238))
            .bg(Color::Rgb(200, 200, 200))
            .add_modifier(Modifier::BOLD),
    );

    let visible = usize::from(chunks[0].height.saturating_sub(1));
    let offset = state.selected_school.saturating_sub(visible.saturating_sub(1));
    let rows = schools
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(index, school)| {
            let style = if index == state.selected_school {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Row::new(vec![
                Cell::from(school.name.clone()),
                Cell::from(school.school_type.label().to_string()),
                Cell::from(school.province.clone()),
                Cell::from(water_access_label(&school.wash_data)),
                Cell::from(toilets_label(&school.wash_data)),
            ])
            .style(style)
        });

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(16),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .column_spacing(1);
    f.render_widget(table, chunks[0]);

    if let Some(school) = expanded {
        let facilities = state.dataset.facilities_for(school);
        let lines: Vec<TextLine<'_>> = if facilities.is_empty() {
            vec![TextLine::from("No facilities recorded for this school")]
        } else {
            facilities
                .iter()
                .map(|facility| {
                    let color = if facility.functionality.is_functional() {
                        Color::Green
                    } else {
                        Color::Red
                    };
                    TextLine::from(vec![
                        Span::styled(format!("{}  ", facility.id), Style::default().fg(Color::Yellow)),
                        Span::raw(format!("{}  ", facility.name)),
                        Span::styled(
                            facility.functionality.label().to_string(),
                            Style::default().fg(color),
                        ),
                    ])
                })
                .collect()
        };
        let block = Block::default()
            .title(format!("{} - Water Facilities", school.name))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        f.render_widget(Paragraph::new(Text::from(lines)).block(block), chunks[1]);
    }
}

fn render_assets(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!("Asset Distribution ({} assets)", state.distribution.total))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    if state.distribution.categories.is_empty() {
        let paragraph = Paragraph::new("No assets match the current filters")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let colors = [Color::Cyan, Color::Green, Color::Yellow, Color::Magenta, Color::Rgb(0, 0, 238)];
    let bars: Vec<Bar<'_>> = state
        .distribution
        .categories
        .iter()
        .enumerate()
        .map(|(index, share)| {
            Bar::default()
                .value(share.count as u64)
                .label(TextLine::from(share.label.as_str()))
                .text_value(format!("{} ({})", share.count, share.percent_label()))
                .style(Style::default().fg(colors[index % colors.len()]))
                .value_style(Style::default().fg(Color::White))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .max(state.distribution.max_count().max(1) as u64)
        .bar_gap(1)
        .bar_width(1);
    f.render_widget(chart, area);
}

fn render_lookup(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    let input = Paragraph::new(TextLine::from(vec![
        Span::raw(state.lookup_input.as_str()),
        Span::styled("█", Style::default().fg(Color::Yellow)),
    ]))
    .block(
        Block::default()
            .title("Enter DPI ID")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(input, chunks[0]);

    let facilities = &state.dataset.facilities;
    let lines: Vec<TextLine<'_>> = match state.lookup.view() {
        LookupView::Detail(index) => match facilities.get(*index) {
            Some(facility) => {
                let mut lines = vec![
                    TextLine::from(Span::styled(
                        facility.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    TextLine::from(format!("DPI ID: {}", facility.id)),
                    TextLine::from(format!("Type: {}", facility.facility_type.label())),
                    TextLine::from(format!("Location: {}", facility.location)),
                    TextLine::from(format!("Status: {}", facility.functionality.label())),
                    TextLine::from(format!("JMP: {}", facility.jmp_status.label())),
                    TextLine::from(format!("Last Service: {}", facility.last_service)),
                ];
                if let Some(coordinates) = &facility.coordinates {
                    lines.push(TextLine::from(format!(
                        "Coordinates: {}",
                        coordinates_label(coordinates)
                    )));
                }
                lines.extend(
                    facility
                        .technical_rows()
                        .into_iter()
                        .map(|row| TextLine::from(format!("{}: {}", row.label, row.value))),
                );
                lines
            }
            None => vec![TextLine::from("Facility no longer loaded")],
        },
        LookupView::Error(error) => vec![TextLine::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        ))],
        _ => vec![TextLine::from(Span::styled(
            format!("{} facilities available", facilities.len()),
            Style::default().fg(Color::Gray),
        ))],
    };

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title("Facility")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, chunks[1]);
}
