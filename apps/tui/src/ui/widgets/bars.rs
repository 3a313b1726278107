use crate::app::state::AppScreen;
use crate::app::App;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, WhichUse, BRAILLE_SIX};
use wash_registry::FilterField;

pub fn render_tabs(app: &App, f: &mut Frame<'_>, area: Rect) {
    let titles = AppScreen::ALL
        .iter()
        .map(|screen| TextLine::from(screen.label()))
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title("== WASH Registry Liberia ==")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .select(app.screen.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Rgb(0, 0, 238))
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));

    f.render_widget(tabs, area);
}

/// One segment per filter. Pending edits are shown in yellow until applied.
pub fn render_filter_bar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let mut spans = Vec::new();
    for (index, field) in FilterField::ALL.iter().enumerate() {
        let pending = app.pending_filters.get(*field);
        let applied = app.filters.get(*field);
        let selected = index == app.filter_field_index;

        let label_style = if selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        let value_style = if pending == applied {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Yellow)
        };

        spans.push(Span::styled(format!("{}: ", field.label()), label_style));
        spans.push(Span::styled(pending.to_string(), value_style));
        spans.push(Span::raw("   "));
    }

    let paragraph = Paragraph::new(TextLine::from(spans)).block(
        Block::default()
            .title(" Filters (f: field  ,/.: value  a: apply) ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(paragraph, area);
}

pub fn render_status(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    if app.is_loading() {
        let inner = status_block.inner(area);
        f.render_widget(status_block, area);

        let throbber = Throbber::default()
            .label(app.status_message.as_str())
            .style(Style::default().fg(Color::Cyan))
            .throbber_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .throbber_set(BRAILLE_SIX)
            .use_type(WhichUse::Spin);
        let mut state = app.throbber.clone();
        f.render_stateful_widget(throbber, inner, &mut state);
        return;
    }

    let status_text = if app.status_message.is_empty() {
        Text::from(Span::styled(
            app.last_loaded
                .as_ref()
                .map_or_else(String::new, |at| format!("Last loaded at {at}")),
            Style::default().fg(Color::Gray),
        ))
    } else {
        let style = if app.status_message.starts_with("Error") {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };

        Text::from(Span::styled(app.status_message.as_str(), style))
    };

    let status_paragraph = Paragraph::new(status_text)
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

fn key(label: &str) -> Span<'_> {
    Span::styled(
        label,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

pub fn render_shortcuts(app: &App, f: &mut Frame<'_>, area: Rect) {
    let mut spans = vec![key("Tab"), Span::raw(": Screens   ")];
    let screen_keys: &[(&str, &str)] = match app.screen {
        AppScreen::Schools => &[("↑/↓", "Navigate"), ("Enter", "Expand"), ("Esc", "Collapse")],
        AppScreen::Overview => &[("←/→", "Page"), ("1-4", "Sort")],
        AppScreen::Map => &[],
        AppScreen::Lookup => &[("s", "Scan"), ("i", "Enter ID"), ("l", "List"), ("m", "Map")],
        AppScreen::Facilities => &[("/", "Search"), ("Enter", "Open"), ("Esc", "Back")],
    };
    for (shortcut, action) in screen_keys {
        spans.push(key(shortcut));
        spans.push(Span::raw(format!(": {action}   ")));
    }
    spans.extend([
        key("r"),
        Span::raw(": Refresh   "),
        key("?"),
        Span::raw(": Help   "),
        key("q"),
        Span::raw(": Quit"),
    ]);

    let paragraph = Paragraph::new(TextLine::from(spans)).alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}
