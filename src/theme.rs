use ratatui::style::{Color, Modifier, Style};

// Centralized theme colors. Components ask for styles here rather than
// hard-coding colors so the popup, the menu bar and the drop-downs stay in
// sync.

// Menu surfaces (context menu and menu-bar drop-downs)
pub fn menu_bg() -> Color {
    Color::DarkGray
}
pub fn menu_fg() -> Color {
    Color::White
}
pub fn menu_selected_bg() -> Color {
    Color::Gray
}
pub fn menu_selected_fg() -> Color {
    Color::Black
}
pub fn menu_disabled_fg() -> Color {
    Color::Gray
}

// Menu bar / status bar rows
pub fn panel_bg() -> Color {
    Color::DarkGray
}
pub fn panel_fg() -> Color {
    Color::White
}
pub fn panel_hotkey_fg() -> Color {
    Color::Yellow
}

// Text input
pub fn input_bg() -> Color {
    Color::Blue
}
pub fn input_fg() -> Color {
    Color::White
}
pub fn input_selection_bg() -> Color {
    Color::Cyan
}

// Window frames
pub fn frame_border() -> Color {
    Color::Gray
}

pub fn menu_style() -> Style {
    Style::default().bg(menu_bg()).fg(menu_fg())
}

pub fn menu_selected_style() -> Style {
    Style::default()
        .bg(menu_selected_bg())
        .fg(menu_selected_fg())
        .add_modifier(Modifier::BOLD)
}

pub fn panel_style() -> Style {
    Style::default().bg(panel_bg()).fg(panel_fg())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_style_differs_from_plain_menu() {
        assert_ne!(menu_style(), menu_selected_style());
        assert_eq!(menu_style().bg, Some(menu_bg()));
    }
}
