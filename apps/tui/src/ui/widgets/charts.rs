use crate::app::App;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};
use ratatui::Frame;

const CATEGORY_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Blue,
    Color::LightRed,
];

fn summary_card(f: &mut Frame<'_>, area: Rect, title: &str, value: String, color: Color) {
    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(Color::Gray))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let paragraph = Paragraph::new(Text::from(TextLine::from(Span::styled(
        value,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))))
    .block(block)
    .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

/// Four quick-stat cards: schools, schools with water, functional and broken assets.
pub fn render_summary_cards(app: &App, f: &mut Frame<'_>, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let summary = &app.summary;
    summary_card(
        f,
        cards[0],
        " Total Schools ",
        summary.total_schools.to_string(),
        Color::Cyan,
    );
    summary_card(
        f,
        cards[1],
        " Schools with Water ",
        summary.schools_with_water_label(),
        Color::Blue,
    );
    summary_card(
        f,
        cards[2],
        " Functional Assets ",
        summary.functional_assets.to_string(),
        Color::Green,
    );
    summary_card(
        f,
        cards[3],
        " Needs Repair ",
        summary.assets_needing_repair.to_string(),
        Color::Red,
    );
}

pub fn render_asset_distribution(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!(" Asset Distribution ({} assets) ", app.distribution.total))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if app.distribution.categories.is_empty() {
        let paragraph = Paragraph::new("No assets match the current filters")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let bars: Vec<Bar<'_>> = app
        .distribution
        .categories
        .iter()
        .enumerate()
        .map(|(index, share)| {
            Bar::default()
                .value(share.count as u64)
                .label(TextLine::from(share.label.as_str()))
                .text_value(format!("{} ({})", share.count, share.percent_label()))
                .style(Style::default().fg(CATEGORY_COLORS[index % CATEGORY_COLORS.len()]))
                .value_style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .max(app.distribution.max_count().max(1) as u64)
        .bar_gap(1)
        .bar_width(1);

    f.render_widget(chart, area);
}
