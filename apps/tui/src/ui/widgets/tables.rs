use ratatui::style::{Color, Modifier, Style};
use wash_registry::{Functionality, JmpStatus};

pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows {
        return 0;
    }

    if selected_index >= max_visible_rows {
        return selected_index.saturating_sub(max_visible_rows) + 1;
    }

    0
}

pub fn header_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(Color::Rgb(0, 0, 238))
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub const fn functionality_color(functionality: &Functionality) -> Color {
    if functionality.is_functional() {
        Color::Green
    } else {
        Color::Red
    }
}

pub const fn jmp_color(status: &JmpStatus) -> Color {
    match status {
        JmpStatus::BasicService => Color::Green,
        JmpStatus::LimitedService => Color::Yellow,
        JmpStatus::NoService => Color::Red,
        JmpStatus::Other(_) => Color::Gray,
    }
}

#[cfg(test)]
mod tests {
    use super::scroll_offset;

    #[test]
    fn offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(3, 10, 2), 0);
        assert_eq!(scroll_offset(20, 5, 3), 0);
        assert_eq!(scroll_offset(20, 5, 7), 3);
    }
}
