use ratatui::style::Color;

// Centralized chrome colors. Kept as small helpers so call sites never
// hard-code a palette.

// Tab labels
pub fn tab_fg() -> Color {
    Color::Gray
}
pub fn tab_bg() -> Color {
    Color::Reset
}
pub fn selected_tab_fg() -> Color {
    Color::White
}
pub fn selected_tab_bg() -> Color {
    Color::DarkGray
}
/// Selected label fill while the container owns keyboard focus.
pub fn focused_tab_bg() -> Color {
    Color::Blue
}

// Outlines
pub fn border() -> Color {
    Color::DarkGray
}
pub fn focus_ring() -> Color {
    Color::Cyan
}
pub fn ghost() -> Color {
    Color::DarkGray
}

// Overflow affordance and popup
pub fn more_fg() -> Color {
    Color::Yellow
}
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

// Toolbars and label actions
pub fn toolbar_fg() -> Color {
    Color::Gray
}
pub fn toolbar_bg() -> Color {
    Color::Reset
}
pub fn label_action_fg() -> Color {
    Color::Red
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_fill_differs_when_focused() {
        assert_ne!(selected_tab_bg(), focused_tab_bg());
        assert_ne!(menu_bg(), menu_selected_bg());
    }
}
