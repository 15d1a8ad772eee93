//! Box-drawing chrome for the tab strip and content frame.
//!
//! Decorators paint straight into the frame buffer from a [`LayoutResult`].
//! Corner rules: labels are rounded, a corner touching the selected label is
//! squared off, and the selected label opens into the content frame so the
//! two read as one surface.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;

use crate::constants::{LABEL_PADDING, MORE_GLYPH};
use crate::layout::{LayoutResult, TabPlacement, rect_contains};
use crate::tabs::TabId;
use crate::tabs::actions::ActionGroup;
use crate::tabs::presentation::TabsPosition;
use crate::theme;
use crate::ui::{UiFrame, patch_style, set_glyph};

/// What the decorator needs to know about one label.
#[derive(Debug, Clone)]
pub struct LabelView<'a> {
    pub id: TabId,
    pub text: &'a Line<'static>,
    pub icon: Option<&'a str>,
    pub actions: Option<String>,
    pub actions_visible: bool,
    /// Attraction blink is in its highlighted phase.
    pub attention: bool,
}

#[derive(Debug, Clone)]
pub struct ChromeScene<'a> {
    pub layout: &'a LayoutResult,
    pub labels: &'a [LabelView<'a>],
    /// Focus colours apply: focus painting is on and the container (or one of
    /// its popups) holds focus.
    pub paint_focused: bool,
    pub paint_focus: bool,
    pub active_fill: Option<Color>,
    pub draw_border_if_tabs_hidden: bool,
}

impl ChromeScene<'_> {
    fn label(&self, id: TabId) -> Option<&LabelView<'_>> {
        self.labels.iter().find(|l| l.id == id)
    }
}

pub trait TabDecorator: std::fmt::Debug {
    fn render_tabs(&self, frame: &mut UiFrame<'_>, scene: &ChromeScene<'_>);
}

/// One glyph per label action: the first character of its id.
pub fn action_glyphs(group: &ActionGroup) -> String {
    group
        .actions
        .iter()
        .filter_map(|action| action.chars().next())
        .collect()
}

/// Columns a label wants: outline, padding, icon, text and label actions.
pub fn label_width(text: &Line<'_>, icon: Option<&str>, actions: Option<&str>) -> u16 {
    let icon = icon.map_or(0, |i| i.chars().count() + 1);
    let actions = actions.map_or(0, |a| a.chars().count() + 1);
    let width = 2 + 2 * LABEL_PADDING as usize + icon + text.width() + actions;
    width.min(u16::MAX as usize) as u16
}

/// Row holding the label text.
fn text_row(rect: Rect, position: TabsPosition) -> u16 {
    match position {
        TabsPosition::Bottom if rect.height < 3 => rect.y,
        _ => rect.y.saturating_add(1),
    }
}

/// Cells inside the outline and padding where the label content goes.
pub fn label_content_rect(rect: Rect, position: TabsPosition) -> Rect {
    let pad = LABEL_PADDING;
    let y = text_row(rect, position);
    let (x, width) = match position {
        TabsPosition::Top | TabsPosition::Bottom => (
            rect.x.saturating_add(1 + pad),
            rect.width.saturating_sub(2 + 2 * pad),
        ),
        TabsPosition::Left => (
            rect.x.saturating_add(1 + pad),
            rect.width.saturating_sub(1 + 2 * pad),
        ),
        TabsPosition::Right => (
            rect.x.saturating_add(pad),
            rect.width.saturating_sub(1 + 2 * pad),
        ),
    };
    Rect {
        x,
        y,
        width,
        height: 1,
    }
}

/// Cells of the label actions, right-aligned in the content area.
pub fn label_actions_rect(rect: Rect, position: TabsPosition, count: u16) -> Option<Rect> {
    let content = label_content_rect(rect, position);
    if count == 0 || content.width < count {
        return None;
    }
    Some(Rect {
        x: content.x + content.width - count,
        width: count,
        ..content
    })
}

/// Index of the label action under (column, row), if any.
pub fn label_action_at(
    rect: Rect,
    position: TabsPosition,
    count: u16,
    column: u16,
    row: u16,
) -> Option<usize> {
    let actions = label_actions_rect(rect, position, count)?;
    rect_contains(actions, column, row).then(|| usize::from(column - actions.x))
}

fn flip_vertical(glyph: &'static str) -> &'static str {
    match glyph {
        "╭" => "╰",
        "╮" => "╯",
        "╰" => "╭",
        "╯" => "╮",
        "┌" => "└",
        "┐" => "┘",
        "└" => "┌",
        "┘" => "┐",
        "┴" => "┬",
        "┬" => "┴",
        other => other,
    }
}

fn flip_horizontal(glyph: &'static str) -> &'static str {
    match glyph {
        "╭" => "╮",
        "╮" => "╭",
        "╰" => "╯",
        "╯" => "╰",
        "┌" => "┐",
        "┐" => "┌",
        "└" => "┘",
        "┘" => "└",
        "├" => "┤",
        "┤" => "├",
        other => other,
    }
}

/// Decorator drawing rounded labels with single-line box glyphs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoundedDecorator;

struct Painter<'b> {
    buffer: &'b mut ratatui::buffer::Buffer,
    bounds: Rect,
    position: TabsPosition,
}

impl Painter<'_> {
    /// Place a glyph written for a top strip (or left strip when vertical),
    /// mirrored for the actual position.
    fn put(&mut self, x: u16, y: u16, glyph: &'static str, style: Style) {
        let glyph = match self.position {
            TabsPosition::Bottom => flip_vertical(glyph),
            TabsPosition::Right => flip_horizontal(glyph),
            _ => glyph,
        };
        set_glyph(self.buffer, self.bounds, x, y, glyph, style);
    }

    fn fill(&mut self, rect: Rect, style: Style) {
        for y in rect.y..rect.y.saturating_add(rect.height) {
            for x in rect.x..rect.x.saturating_add(rect.width) {
                set_glyph(self.buffer, self.bounds, x, y, " ", style);
            }
        }
    }

    fn line(&mut self, x: u16, y: u16, line: &Line<'_>, max_width: u16) -> u16 {
        if max_width == 0 || !rect_contains(self.bounds, x, y) {
            return x;
        }
        let room = self.bounds.x + self.bounds.width - x;
        let (end, _) = self.buffer.set_line(x, y, line, max_width.min(room));
        end
    }
}

impl RoundedDecorator {
    fn border_style(scene: &ChromeScene<'_>) -> Style {
        let color = if scene.paint_focused {
            theme::focus_ring()
        } else {
            theme::border()
        };
        Style::default().fg(color)
    }

    fn selected_style(scene: &ChromeScene<'_>) -> Style {
        let bg = scene.active_fill.unwrap_or(if scene.paint_focused {
            theme::focused_tab_bg()
        } else if scene.paint_focus {
            theme::selected_tab_bg()
        } else {
            theme::tab_bg()
        });
        Style::default()
            .fg(theme::selected_tab_fg())
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    }

    fn tab_style() -> Style {
        Style::default().fg(theme::tab_fg()).bg(theme::tab_bg())
    }

    /// Outline of the content frame, honouring per-edge thickness.
    fn paint_frame(painter: &mut Painter<'_>, scene: &ChromeScene<'_>) {
        let layout = scene.layout;
        let f = layout.frame;
        if f.width == 0 || f.height == 0 {
            return;
        }
        let style = Self::border_style(scene);
        let b = layout.border;
        let left = f.x;
        let right = f.x + f.width - 1;
        let top = f.y;
        let bottom = f.y + f.height - 1;
        let draw_top = b.top > 0 && (!layout.tabs_hidden || scene.draw_border_if_tabs_hidden);
        let draw_bottom = b.bottom > 0;
        let draw_left = b.left > 0;
        let draw_right = b.right > 0;

        // Glyphs are written unmirrored here: the frame is symmetric.
        let mut put = |x: u16, y: u16, glyph: &'static str| {
            set_glyph(painter.buffer, painter.bounds, x, y, glyph, style);
        };
        if draw_top {
            for x in left..=right {
                put(x, top, "─");
            }
        }
        if draw_bottom {
            for x in left..=right {
                put(x, bottom, "─");
            }
        }
        if draw_left {
            for y in top..=bottom {
                put(left, y, "│");
            }
        }
        if draw_right {
            for y in top..=bottom {
                put(right, y, "│");
            }
        }
        if draw_top && draw_left {
            put(left, top, "┌");
        }
        if draw_top && draw_right {
            put(right, top, "┐");
        }
        if draw_bottom && draw_left {
            put(left, bottom, "└");
        }
        if draw_bottom && draw_right {
            put(right, bottom, "┘");
        }
    }

    /// Frame line the labels stand on, as a fixed coordinate: the row for
    /// horizontal strips, the column for vertical ones.
    fn junction(layout: &LayoutResult) -> u16 {
        let f = layout.frame;
        match layout.position {
            TabsPosition::Top => f.y,
            TabsPosition::Bottom => (f.y + f.height).saturating_sub(1),
            TabsPosition::Left => f.x,
            TabsPosition::Right => (f.x + f.width).saturating_sub(1),
        }
    }

    fn junction_drawn(layout: &LayoutResult) -> bool {
        let b = layout.border;
        let thickness = match layout.position {
            TabsPosition::Top => b.top,
            TabsPosition::Bottom => b.bottom,
            TabsPosition::Left => b.left,
            TabsPosition::Right => b.right,
        };
        thickness > 0 && layout.frame.width > 0 && layout.frame.height > 0
    }

    fn paint_label_content(
        painter: &mut Painter<'_>,
        scene: &ChromeScene<'_>,
        placement: &TabPlacement,
        style: Style,
    ) {
        let position = scene.layout.position;
        let content = label_content_rect(placement.rect, position);
        let Some(label) = scene.label(placement.id) else {
            return;
        };
        let mut x = content.x;
        let end = content.x + content.width;
        let action_count = label.actions.as_ref().map_or(0, |a| a.chars().count() as u16);
        let text_end = end.saturating_sub(if action_count > 0 { action_count + 1 } else { 0 });
        if let Some(icon) = label.icon {
            let icon_line = Line::styled(format!("{icon} "), style);
            x = painter.line(x, content.y, &icon_line, text_end.saturating_sub(x));
        }
        let text = label.text.clone().patch_style(style);
        painter.line(x, content.y, &text, text_end.saturating_sub(x));
        if let (Some(actions), true) = (&label.actions, label.actions_visible)
            && let Some(rect) = label_actions_rect(placement.rect, position, action_count)
        {
            let line = Line::styled(actions.clone(), style.fg(theme::label_action_fg()));
            painter.line(rect.x, rect.y, &line, rect.width);
        }
    }

    fn paint_horizontal_tab(
        painter: &mut Painter<'_>,
        scene: &ChromeScene<'_>,
        placement: &TabPlacement,
        selected: bool,
    ) {
        let layout = scene.layout;
        let r = placement.rect;
        if r.width < 2 || r.height < 2 {
            return;
        }
        let bottom = layout.position == TabsPosition::Bottom;
        let border = if selected {
            Self::border_style(scene)
        } else {
            Style::default().fg(theme::border())
        };
        let left = r.x;
        let right = r.x + r.width - 1;
        let closed = r.height >= 3;
        // Rows counted from the outer edge of the strip.
        let edge = if bottom { r.y + r.height - 1 } else { r.y };
        let text = text_row(r, layout.position);
        let closing = closed.then(|| if bottom { r.y } else { r.y + 2 });

        let previous_selected =
            placement.previous.is_some() && placement.previous == layout.selected;
        let next_selected = placement.next.is_some() && placement.next == layout.selected;
        let top_left = if !selected && previous_selected { "┌" } else { "╭" };
        let top_right = if !selected && next_selected { "┐" } else { "╮" };

        painter.put(left, edge, top_left, border);
        for x in left + 1..right {
            painter.put(x, edge, "─", border);
        }
        painter.put(right, edge, top_right, border);
        painter.put(left, text, "│", border);
        painter.put(right, text, "│", border);
        let mut fill = if selected {
            Self::selected_style(scene)
        } else {
            Self::tab_style()
        };
        if scene.label(placement.id).is_some_and(|l| l.attention) {
            fill = fill.add_modifier(Modifier::REVERSED);
        }
        painter.fill(
            Rect {
                x: left + 1,
                y: text,
                width: r.width - 2,
                height: 1,
            },
            fill,
        );
        Self::paint_label_content(painter, scene, placement, fill);

        if let Some(row) = closing {
            painter.put(left, row, "└", border);
            for x in left + 1..right {
                painter.put(x, row, "─", border);
            }
            painter.put(right, row, "┘", border);
            return;
        }

        if !Self::junction_drawn(layout) {
            return;
        }
        let junction = Self::junction(layout);
        let frame_left = layout.frame.x;
        let frame_right = layout.frame.x + layout.frame.width - 1;
        if selected {
            let open_left = if left == frame_left { "│" } else { "┘" };
            let open_right = if placement.curve_space && right < frame_right {
                "└"
            } else {
                "│"
            };
            painter.put(left, junction, open_left, border);
            for x in left + 1..right {
                painter.put(x, junction, " ", fill);
            }
            painter.put(right, junction, open_right, border);
        } else {
            let frame_style = Self::border_style(scene);
            for x in [left, right] {
                let glyph = if x == frame_left && layout.border.left > 0 {
                    "├"
                } else if x == frame_right && layout.border.right > 0 {
                    "┤"
                } else {
                    "┴"
                };
                painter.put(x, junction, glyph, frame_style);
            }
        }
    }

    fn paint_vertical_tab(
        painter: &mut Painter<'_>,
        scene: &ChromeScene<'_>,
        placement: &TabPlacement,
        selected: bool,
    ) {
        let layout = scene.layout;
        let r = placement.rect;
        if r.width < 2 || r.height < 3 {
            return;
        }
        let right_side = layout.position == TabsPosition::Right;
        let border = if selected {
            Self::border_style(scene)
        } else {
            Style::default().fg(theme::border())
        };
        // Columns counted from the outer edge; mirrored for right strips.
        let outer = if right_side { r.x + r.width - 1 } else { r.x };
        let step = |n: u16| if right_side { outer - n } else { outer + n };
        let top = r.y;
        let text = r.y + 1;
        let bottom = r.y + 2;

        let previous_selected =
            placement.previous.is_some() && placement.previous == layout.selected;
        let next_selected = placement.next.is_some() && placement.next == layout.selected;
        let top_corner = if !selected && previous_selected { "┌" } else { "╭" };
        let bottom_corner = if !selected && next_selected { "└" } else { "╰" };

        painter.put(outer, top, top_corner, border);
        painter.put(outer, text, "│", border);
        painter.put(outer, bottom, bottom_corner, border);
        for n in 1..r.width {
            painter.put(step(n), top, "─", border);
            painter.put(step(n), bottom, "─", border);
        }
        let mut fill = if selected {
            Self::selected_style(scene)
        } else {
            Self::tab_style()
        };
        if scene.label(placement.id).is_some_and(|l| l.attention) {
            fill = fill.add_modifier(Modifier::REVERSED);
        }
        for n in 1..r.width {
            painter.put(step(n), text, " ", fill);
        }
        Self::paint_label_content(painter, scene, placement, fill);

        if !Self::junction_drawn(layout) {
            return;
        }
        let junction = Self::junction(layout);
        let frame_top = layout.frame.y;
        let frame_bottom = layout.frame.y + layout.frame.height - 1;
        if selected {
            let open_top = if top == frame_top { "─" } else { "┘" };
            let open_bottom = if placement.curve_space && bottom < frame_bottom {
                "┐"
            } else {
                "─"
            };
            painter.put(junction, top, open_top, border);
            painter.put(junction, text, " ", fill);
            painter.put(junction, bottom, open_bottom, border);
        } else {
            let frame_style = Self::border_style(scene);
            for y in [top, bottom] {
                let glyph = if y == frame_top && layout.border.top > 0 {
                    "┬"
                } else if y == frame_bottom && layout.border.bottom > 0 {
                    "┴"
                } else {
                    "┤"
                };
                painter.put(junction, y, glyph, frame_style);
            }
        }
    }

    fn paint_tab(
        painter: &mut Painter<'_>,
        scene: &ChromeScene<'_>,
        placement: &TabPlacement,
        selected: bool,
    ) {
        if scene.layout.position.is_horizontal() {
            Self::paint_horizontal_tab(painter, scene, placement, selected);
        } else {
            Self::paint_vertical_tab(painter, scene, placement, selected);
        }
    }

    fn paint_ghosts(painter: &mut Painter<'_>, layout: &LayoutResult) {
        let style = Style::default().fg(theme::ghost());
        for (slot, leading) in [(layout.first_ghost, true), (layout.last_ghost, false)] {
            let r = slot.rect;
            if !slot.visible || r.width == 0 || r.height == 0 {
                continue;
            }
            if layout.position.is_horizontal() {
                let bottom = layout.position == TabsPosition::Bottom;
                let edge = if bottom { r.y + r.height - 1 } else { r.y };
                let text = text_row(r, layout.position);
                let (corner_x, dash_x) = if leading {
                    (r.x, r.x + 1)
                } else {
                    (r.x + r.width - 1, r.x)
                };
                painter.put(corner_x, edge, if leading { "╭" } else { "╮" }, style);
                painter.put(dash_x, edge, "┈", style);
                painter.put(corner_x, text, "┊", style);
            } else {
                let outer = if layout.position == TabsPosition::Right {
                    r.x + r.width - 1
                } else {
                    r.x
                };
                painter.put(outer, r.y, if leading { "╭" } else { "╰" }, style);
                for x in r.x..r.x + r.width {
                    if x != outer {
                        set_glyph(painter.buffer, painter.bounds, x, r.y, "┈", style);
                    }
                }
            }
        }
    }

    fn paint_more(painter: &mut Painter<'_>, layout: &LayoutResult) {
        let Some(r) = layout.more else {
            return;
        };
        let style = Style::default()
            .fg(theme::more_fg())
            .add_modifier(Modifier::BOLD);
        let (x, y) = if layout.position.is_horizontal() {
            (r.x + r.width / 2, text_row(r, layout.position))
        } else {
            (r.x + r.width / 2, r.y)
        };
        set_glyph(painter.buffer, painter.bounds, x, y, MORE_GLYPH, style);
    }
}

impl TabDecorator for RoundedDecorator {
    fn render_tabs(&self, frame: &mut UiFrame<'_>, scene: &ChromeScene<'_>) {
        let layout = scene.layout;
        let bounds = frame.area().intersection(layout.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        let mut painter = Painter {
            buffer: frame.buffer_mut(),
            bounds,
            position: layout.position,
        };
        Self::paint_frame(&mut painter, scene);
        if layout.tabs_hidden {
            return;
        }

        for placement in &layout.placements {
            if Some(placement.id) != layout.selected {
                Self::paint_tab(&mut painter, scene, placement, false);
            }
        }
        // The selected label goes last so its opening wins over neighbours.
        if let Some(placement) = layout
            .selected
            .and_then(|id| layout.placements.iter().find(|p| p.id == id))
        {
            Self::paint_tab(&mut painter, scene, placement, true);
        }

        Self::paint_ghosts(&mut painter, layout);
        Self::paint_more(&mut painter, layout);

        if scene.paint_focused
            && let Some(selected) = layout.selected.and_then(|id| layout.rect_for(id))
        {
            let content = label_content_rect(selected, layout.position);
            for x in content.x..content.x.saturating_add(content.width) {
                patch_style(
                    painter.buffer,
                    bounds,
                    x,
                    content.y,
                    Style::default().add_modifier(Modifier::BOLD),
                );
            }
        }
    }
}
