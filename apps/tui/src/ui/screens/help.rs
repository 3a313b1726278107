use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(80, 80, area);
    f.render_widget(ClearWidget, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let help_paragraph = Paragraph::new(Text::from(build_help_lines()))
        .block(help_block)
        .wrap(Wrap { trim: true });
    f.render_widget(help_paragraph, popup_area);

    let hint = Paragraph::new(TextLine::from(Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Center);

    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}

fn heading(text: &'static str) -> TextLine<'static> {
    TextLine::from(Span::styled(
        text,
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn shortcut(keys: &'static str, action: &'static str) -> TextLine<'static> {
    TextLine::from(vec![
        Span::styled(
            format!("  {keys}"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" - {action}")),
    ])
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    vec![
        TextLine::from(Span::styled(
            "WASH Registry Liberia",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(
            "Water, sanitation and hygiene status for schools and water points across Liberia.",
        ),
        TextLine::from(""),
        heading("Global:"),
        shortcut("Tab / Shift+Tab", "Next / previous screen"),
        shortcut("f / F", "Select next / previous filter"),
        shortcut(". / ,", "Cycle the selected filter value"),
        shortcut("a", "Apply filters"),
        shortcut("r", "Reload data"),
        shortcut("? / F1", "Toggle this help"),
        shortcut("q", "Quit"),
        TextLine::from(""),
        heading("Schools:"),
        shortcut("↑/↓  PgUp/PgDn  Home/End", "Navigate"),
        shortcut("Enter", "Show or hide the school's water facilities"),
        shortcut("Esc", "Collapse"),
        TextLine::from(""),
        heading("Overview:"),
        shortcut("←/→  Home/End", "Change page"),
        shortcut("1-4", "Sort by district, county, assets or functionality"),
        TextLine::from(""),
        heading("Lookup:"),
        shortcut("s / x", "Start / stop scanning"),
        shortcut("i", "Type a DPI ID, Enter to look it up"),
        shortcut("l / m / h", "Facility list / map / scanner"),
        shortcut("Esc", "Back"),
        TextLine::from(""),
        heading("Facilities:"),
        shortcut("/", "Search by ID or name"),
        shortcut("Enter", "Open facility details"),
    ]
}
