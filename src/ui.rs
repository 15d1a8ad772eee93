//! UiFrame: a thin wrapper around `ratatui::Frame` that clamps drawing to the
//! visible area and centralizes clipping logic.
//!
//! Tab chrome is computed from layout rectangles that may drift past the
//! terminal edge on tiny sizes. Writing out-of-bounds into the `Buffer` panics,
//! so every draw goes through `UiFrame` (widgets) or the glyph helpers below
//! (single cells), both of which clip to a bounds rectangle.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{StatefulWidget, Widget};

/// Wrapper around `ratatui::Frame` that clamps drawing to the visible area.
///
/// Components render through this type so they can keep calling familiar
/// `render_widget` / `render_stateful_widget` helpers while automatically
/// clipping any rectangles that drift outside the buffer.
pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer.
    ///
    /// Used for offscreen rendering (paint-block snapshots, benchmarks, tests).
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    pub fn render_stateful_widget<W>(&mut self, widget: W, area: Rect, state: &mut W::State)
    where
        W: StatefulWidget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer, state);
        }
    }

    pub fn buffer(&self) -> &Buffer {
        self.buffer
    }

    /// Copy the cells of `src` inside `src_area` onto this frame.
    pub fn blit_from(&mut self, src: &Buffer, src_area: Rect) {
        let overlap = src_area.intersection(self.area);
        if overlap.width == 0 || overlap.height == 0 {
            return;
        }
        for y in overlap.y..overlap.y.saturating_add(overlap.height) {
            for x in overlap.x..overlap.x.saturating_add(overlap.width) {
                if let (Some(src_cell), Some(dst_cell)) =
                    (src.cell((x, y)), self.buffer.cell_mut((x, y)))
                {
                    *dst_cell = src_cell.clone();
                }
            }
        }
    }
}

/// Write a single glyph at (x, y) when it lies inside `bounds`.
pub(crate) fn set_glyph(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    glyph: &str,
    style: Style,
) {
    if !crate::layout::rect_contains(bounds, x, y) {
        return;
    }
    if let Some(cell) = buffer.cell_mut((x, y)) {
        cell.set_symbol(glyph);
        cell.set_style(style);
    }
}

/// Patch only the style of the cell at (x, y), keeping its symbol.
pub(crate) fn patch_style(buffer: &mut Buffer, bounds: Rect, x: u16, y: u16, style: Style) {
    if !crate::layout::rect_contains(bounds, x, y) {
        return;
    }
    if let Some(cell) = buffer.cell_mut((x, y)) {
        cell.set_style(cell.style().patch(style));
    }
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    if available == 0 {
        return;
    }
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

/// Clip `value` to `width` columns, ending in an ellipsis when cut.
pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return value.chars().take(width).collect();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;
    use ratatui::widgets::Paragraph;

    fn symbols(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, y)).map_or(" ", |c| c.symbol()))
            .collect()
    }

    #[test]
    fn long_labels_end_in_ellipsis() {
        assert_eq!(truncate_to_width("Tab", 5), "Tab");
        assert_eq!(truncate_to_width("Settings", 4), "Set…");
        assert_eq!(truncate_to_width("Settings", 1), "S");
        assert_eq!(truncate_to_width("Settings", 0), "");
    }

    #[test]
    fn glyphs_outside_bounds_are_dropped() {
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        let bounds = Rect::new(1, 0, 2, 1);
        set_glyph(&mut buf, bounds, 0, 0, "╭", Style::default());
        set_glyph(&mut buf, bounds, 1, 0, "╮", Style::default());
        set_glyph(&mut buf, bounds, 1, 1, "│", Style::default());
        assert_eq!(symbols(&buf, 0), " ╮  ");
        assert_eq!(symbols(&buf, 1), "    ");
    }

    #[test]
    fn patch_style_keeps_the_glyph() {
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        set_glyph(&mut buf, area, 0, 0, "»", Style::default().fg(Color::Red));
        patch_style(&mut buf, area, 0, 0, Style::default().bg(Color::Blue));
        let cell = buf.cell((0, 0)).unwrap();
        assert_eq!(cell.symbol(), "»");
        assert_eq!(cell.fg, Color::Red);
        assert_eq!(cell.bg, Color::Blue);
    }

    #[test]
    fn strings_are_cut_at_the_bounds_edge() {
        let area = Rect::new(0, 0, 8, 1);
        let mut buf = Buffer::empty(area);
        safe_set_string(&mut buf, Rect::new(2, 0, 4, 1), 3, 0, "Run Stop", Style::default());
        assert_eq!(symbols(&buf, 0), "   Ru…  ");
        safe_set_string(&mut buf, Rect::new(2, 0, 4, 1), 7, 0, "x", Style::default());
        assert_eq!(buf.cell((7, 0)).unwrap().symbol(), " ");
    }

    #[test]
    fn widgets_are_clipped_to_the_frame() {
        let full = Rect::new(0, 0, 6, 2);
        let mut buf = Buffer::empty(full);
        let mut frame = UiFrame::from_parts(Rect::new(0, 0, 3, 1), &mut buf);
        frame.render_widget(Paragraph::new("abcdef\nghijkl"), full);
        assert_eq!(symbols(&buf, 0), "abc   ");
        assert_eq!(symbols(&buf, 1), "      ");
    }

    #[test]
    fn snapshot_blit_only_touches_the_overlap() {
        let mut snapshot = Buffer::empty(Rect::new(0, 0, 4, 1));
        snapshot.set_string(0, 0, "tabs", Style::default());
        let area = Rect::new(0, 0, 6, 1);
        let mut buf = Buffer::empty(area);
        buf.set_string(0, 0, "......", Style::default());
        let mut frame = UiFrame::from_parts(Rect::new(1, 0, 5, 1), &mut buf);
        frame.blit_from(&snapshot, snapshot.area);
        assert_eq!(symbols(&buf, 0), ".abs..");
    }
}
