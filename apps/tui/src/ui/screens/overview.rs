use crate::app::App;
use crate::ui::widgets::charts::render_asset_distribution;
use crate::ui::widgets::map::band_color;
use crate::ui::widgets::tables::header_style;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;
use wash_registry::{FunctionalityBand, SortKey, SortState};

const PAGE_LINKS: usize = 5;

pub fn render_overview(app: &App, f: &mut Frame<'_>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_district_table(app, f, columns[0]);
    render_asset_distribution(app, f, columns[1]);
}

fn header_label(sort: SortState, key: SortKey, position: usize) -> String {
    if sort.key == key {
        format!("{} {} [{position}]", key.label(), sort.direction.arrow())
    } else {
        format!("{} [{position}]", key.label())
    }
}

fn render_district_table(app: &App, f: &mut Frame<'_>, area: Rect) {
    let rows = app.visible_districts();
    let total = rows.len();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(2)])
        .split(area);

    let block = Block::default()
        .title(" Districts ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if rows.is_empty() {
        let paragraph = Paragraph::new("No districts to show")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, chunks[0]);
        return;
    }

    let header = Row::new(
        SortKey::ALL
            .iter()
            .enumerate()
            .map(|(index, key)| Cell::from(header_label(app.sort, *key, index + 1)))
            .collect::<Vec<_>>(),
    )
    .style(header_style());

    let table_rows = rows[app.pager.slice(total)].iter().map(|row| {
        let band = FunctionalityBand::from_score(row.functionality);
        Row::new(vec![
            Cell::from(row.district.clone()),
            Cell::from(row.county.clone()),
            Cell::from(row.assets.to_string()),
            Cell::from(Span::styled(
                format!("{}%", row.functionality),
                Style::default()
                    .fg(band_color(band))
                    .add_modifier(Modifier::BOLD),
            )),
        ])
    });

    let widths = [
        Constraint::Min(16),
        Constraint::Min(14),
        Constraint::Length(12),
        Constraint::Length(20),
    ];
    let table = Table::new(table_rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, chunks[0]);

    render_pagination(app, total, f, chunks[1]);
}

fn render_pagination(app: &App, total: usize, f: &mut Frame<'_>, area: Rect) {
    let (start, end) = app.pager.showing(total);
    let mut spans = vec![Span::styled(
        format!("Showing {start} to {end} of {total} entries   "),
        Style::default().fg(Color::Gray),
    )];

    for page in app.pager.page_window(total, PAGE_LINKS) {
        let style = if page == app.pager.page() {
            Style::default()
                .bg(Color::Rgb(0, 0, 238))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        spans.push(Span::styled(format!(" {page} "), style));
    }
    spans.push(Span::styled(
        format!("  of {}", app.pager.total_pages(total)),
        Style::default().fg(Color::Gray),
    ));

    f.render_widget(Paragraph::new(TextLine::from(spans)), area);
}
