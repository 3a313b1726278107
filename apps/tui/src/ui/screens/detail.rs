use crate::ui::widgets::tables::{functionality_color, jmp_color};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use wash_registry::format::coordinates_label;
use wash_registry::records::RowKind;
use wash_registry::{Facility, IndicatorSources};

fn field<'a>(label: &'a str, value: impl Into<String>) -> TextLine<'a> {
    TextLine::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
        Span::raw(value.into()),
    ])
}

fn badge(label: &str, color: Color) -> Span<'static> {
    Span::styled(
        format!(" {label} "),
        Style::default()
            .bg(color)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )
}

fn section(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

pub fn render_facility_detail(
    facility: &Facility,
    indicators: &IndicatorSources,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(9), Constraint::Length(6)])
        .split(columns[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(7)])
        .split(columns[1]);

    render_basic_info(facility, f, left[0]);
    render_personnel(facility, indicators, f, left[1]);
    render_technical(facility, f, right[0]);
    render_water_quality(facility, f, right[1]);
}

fn render_basic_info(facility: &Facility, f: &mut Frame<'_>, area: Rect) {
    let mut lines = vec![
        TextLine::from(Span::styled(
            facility.name.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(vec![
            badge(
                facility.functionality.label(),
                functionality_color(&facility.functionality),
            ),
            Span::raw(" "),
            badge(facility.jmp_status.label(), jmp_color(&facility.jmp_status)),
        ]),
        TextLine::from(""),
        field("DPI ID", facility.id.clone()),
        field("Type", facility.facility_type.label()),
        field("Location", facility.location.clone()),
    ];
    if let Some(county) = &facility.county {
        lines.push(field("County", county.clone()));
    }
    lines.push(field(
        "Coordinates",
        facility
            .coordinates
            .as_ref()
            .map_or_else(|| "Not recorded".to_string(), coordinates_label),
    ));
    lines.push(field("Last Service", facility.last_service.clone()));
    lines.push(field("Next Service", facility.next_service.clone()));
    lines.push(field("QR Code", facility.barcode_path()));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(section(" Facility "))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_personnel(
    facility: &Facility,
    indicators: &IndicatorSources,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let unknown = || "Not recorded".to_string();
    let mut sources: Vec<&str> = indicators.sources_for_type(&facility.facility_type).collect();
    sources.sort_unstable();
    sources.dedup();

    let lines = vec![
        field("Contractor", facility.contractor.clone().unwrap_or_else(unknown)),
        field("Technician", facility.technician.clone().unwrap_or_else(unknown)),
        field("Supplier", facility.supplier.clone().unwrap_or_else(unknown)),
        field(
            "Data Sources",
            if sources.is_empty() {
                unknown()
            } else {
                sources.join(", ")
            },
        ),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(section(" Personnel "))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_technical(facility: &Facility, f: &mut Frame<'_>, area: Rect) {
    let rows = facility.technical_rows();
    let lines: Vec<TextLine<'_>> = if rows.is_empty() {
        vec![TextLine::from(Span::styled(
            "No technical details for this facility type",
            Style::default().fg(Color::Gray),
        ))]
    } else {
        rows.into_iter()
            .map(|row| {
                let value = match row.kind {
                    RowKind::Plain => Span::raw(row.value),
                    RowKind::Badge(true) => badge(&row.value, Color::Green),
                    RowKind::Badge(false) => badge(&row.value, Color::Red),
                    RowKind::Warning => Span::styled(
                        format!("⚠ {}", row.value),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                };
                TextLine::from(vec![
                    Span::styled(format!("{}: ", row.label), Style::default().fg(Color::Gray)),
                    value,
                ])
            })
            .collect()
    };

    let paragraph = Paragraph::new(Text::from(lines))
        .block(section(" Technical Details "))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_water_quality(facility: &Facility, f: &mut Frame<'_>, area: Rect) {
    let lines = match &facility.water_quality {
        Some(quality) => {
            let unknown = || "N/A".to_string();
            vec![
                TextLine::from(vec![
                    Span::styled("Status: ", Style::default().fg(Color::Gray)),
                    badge(
                        quality.safety_label(),
                        if quality.safe { Color::Green } else { Color::Red },
                    ),
                ]),
                field("pH", quality.ph.as_ref().map_or_else(unknown, ToString::to_string)),
                field(
                    "Turbidity",
                    quality
                        .turbidity
                        .as_ref()
                        .map_or_else(unknown, ToString::to_string),
                ),
                field("Last Test", quality.last_test.clone().unwrap_or_else(unknown)),
            ]
        }
        None => vec![TextLine::from(Span::styled(
            "No water quality data",
            Style::default().fg(Color::Gray),
        ))],
    };

    let paragraph = Paragraph::new(Text::from(lines)).block(section(" Water Quality "));
    f.render_widget(paragraph, area);
}
