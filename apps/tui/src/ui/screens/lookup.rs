use crate::app::App;
use crate::ui::screens::detail::render_facility_detail;
use crate::ui::widgets::map::render_facility_points;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, WhichUse, BRAILLE_SIX};
use wash_registry::{FacingMode, LookupError, LookupView};

pub fn render_lookup(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(3)])
        .split(area);

    match app.lookup.view() {
        LookupView::ScannerIdle | LookupView::List => render_scanner_idle(app, f, chunks[0]),
        LookupView::Scanning(mode) => render_scanning(app, *mode, f, chunks[0]),
        LookupView::Detail(index) => match app.dataset.facilities.get(*index) {
            Some(facility) => {
                render_facility_detail(facility, &app.dataset.indicators, f, chunks[0]);
            }
            None => render_scanner_idle(app, f, chunks[0]),
        },
        LookupView::Error(error) => render_error(error, f, chunks[0]),
        LookupView::Map => render_facility_points(
            &app.dataset.boundaries,
            &app.dataset.facilities,
            f,
            chunks[0],
        ),
    }

    render_manual_input(app, f, chunks[1]);
}

fn scanner_block() -> Block<'static> {
    Block::default()
        .title(" Scan Asset QR Code ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

fn render_scanner_idle(app: &App, f: &mut Frame<'_>, area: Rect) {
    let feed = app.lookup.camera().feed().map_or_else(
        || "No scan feed configured (start with --scan-feed)".to_string(),
        |path| format!("Scan feed: {}", path.display()),
    );

    let text = Text::from(vec![
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Scan a facility QR code or enter its DPI ID",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(Span::styled(feed, Style::default().fg(Color::Gray))),
        TextLine::from(format!(
            "{} facilities available for lookup",
            app.dataset.facilities.len()
        )),
    ]);

    let paragraph = Paragraph::new(text)
        .block(scanner_block())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_scanning(app: &App, mode: FacingMode, f: &mut Frame<'_>, area: Rect) {
    let block = scanner_block();
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let label = format!("Waiting for a code from the {}...", mode.label());
    let throbber = Throbber::default()
        .label(label.as_str())
        .style(Style::default().fg(Color::Cyan))
        .throbber_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .throbber_set(BRAILLE_SIX)
        .use_type(WhichUse::Spin);
    let mut state = app.throbber.clone();
    f.render_stateful_widget(throbber, rows[1], &mut state);

    f.render_widget(
        Paragraph::new(Span::styled(
            "Press x to stop scanning",
            Style::default().fg(Color::Gray),
        )),
        rows[2],
    );
}

fn render_error(error: &LookupError, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Lookup Failed ")
        .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let text = Text::from(vec![
        TextLine::from(""),
        TextLine::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Press i to try another ID or s to scan again",
            Style::default().fg(Color::Gray),
        )),
    ]);

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_manual_input(app: &App, f: &mut Frame<'_>, area: Rect) {
    let (content, border) = if app.lookup_editing {
        (
            TextLine::from(vec![
                Span::raw(app.lookup_input.as_str()),
                Span::styled("█", Style::default().fg(Color::Yellow)),
            ]),
            Color::Yellow,
        )
    } else {
        (
            TextLine::from(Span::styled(
                "Press i to enter a DPI ID (e.g. LR-MO-001)",
                Style::default().fg(Color::Gray),
            )),
            Color::DarkGray,
        )
    };

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .title(" Manual Entry ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(paragraph, area);
}
