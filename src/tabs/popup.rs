//! Overflow popup listing every visible tab.

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

use super::entry::TabId;
use crate::layout::rect_contains;
use crate::theme;
use crate::ui::UiFrame;

const CHECK_MARK: &str = "✓ ";
const NO_MARK: &str = "  ";

/// What the popup wants the container to do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupOutcome {
    /// Event consumed, popup stays open.
    Handled,
    Close,
    Choose(TabId),
    /// Not for the popup.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct MorePopup {
    items: Vec<(TabId, String)>,
    checked: Option<TabId>,
    highlighted: usize,
    offset: usize,
    anchor: Rect,
    last_area: Option<Rect>,
}

impl MorePopup {
    /// `items` in display order; `checked` is the current selection.
    pub fn new(items: Vec<(TabId, String)>, checked: Option<TabId>, anchor: Rect) -> Self {
        let highlighted = checked
            .and_then(|id| items.iter().position(|(item, _)| *item == id))
            .unwrap_or(0);
        Self {
            items,
            checked,
            highlighted,
            offset: 0,
            anchor,
            last_area: None,
        }
    }

    pub fn items(&self) -> &[(TabId, String)] {
        &self.items
    }

    pub fn highlighted(&self) -> Option<TabId> {
        self.items.get(self.highlighted).map(|(id, _)| *id)
    }

    fn bump(&mut self, delta: isize) {
        if self.items.is_empty() {
            self.highlighted = 0;
            return;
        }
        if delta.is_negative() {
            self.highlighted = self.highlighted.saturating_sub(delta.unsigned_abs());
        } else {
            self.highlighted = (self.highlighted + delta as usize).min(self.items.len() - 1);
        }
    }

    fn keep_highlight_in_view(&mut self, view: usize) {
        if view == 0 || self.items.is_empty() {
            self.offset = 0;
            return;
        }
        if self.highlighted < self.offset {
            self.offset = self.highlighted;
        } else if self.highlighted >= self.offset + view {
            self.offset = self.highlighted + 1 - view;
        }
    }

    /// Popup rectangle: below (or above) the anchor, right-aligned to it and
    /// clamped to `bounds`.
    pub fn area(&self, bounds: Rect) -> Rect {
        let longest = self
            .items
            .iter()
            .map(|(_, text)| text.chars().count())
            .max()
            .unwrap_or(0);
        let width = ((longest + CHECK_MARK.chars().count() + 2) as u16).min(bounds.width);
        let height = ((self.items.len() + 2) as u16).min(bounds.height);
        let right = self.anchor.x.saturating_add(self.anchor.width);
        let x = right.saturating_sub(width).max(bounds.x);
        let below = self.anchor.y.saturating_add(self.anchor.height);
        let bounds_bottom = bounds.y.saturating_add(bounds.height);
        let y = if below.saturating_add(height) <= bounds_bottom {
            below
        } else {
            bounds_bottom.saturating_sub(height).max(bounds.y)
        };
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>, bounds: Rect) {
        let area = self.area(bounds);
        self.last_area = Some(area);
        let block = Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(theme::menu_bg()).fg(theme::menu_fg()));
        let inner = block.inner(area);
        frame.render_widget(Clear, area);
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }
        let view = inner.height as usize;
        self.keep_highlight_in_view(view);
        let items = self
            .items
            .iter()
            .skip(self.offset)
            .take(view)
            .map(|(id, text)| {
                let mark = if Some(*id) == self.checked {
                    CHECK_MARK
                } else {
                    NO_MARK
                };
                ListItem::new(format!("{mark}{text}"))
            })
            .collect::<Vec<_>>();
        let mut state = ListState::default();
        if !self.items.is_empty() && self.highlighted >= self.offset {
            state.select(Some(self.highlighted - self.offset));
        }
        let list = List::new(items).highlight_style(
            Style::default()
                .bg(theme::menu_selected_bg())
                .fg(theme::menu_selected_fg())
                .add_modifier(Modifier::BOLD),
        );
        frame.render_stateful_widget(list, inner, &mut state);
    }

    pub fn handle_event(&mut self, event: &Event) -> PopupOutcome {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Up => {
                    self.bump(-1);
                    PopupOutcome::Handled
                }
                KeyCode::Down => {
                    self.bump(1);
                    PopupOutcome::Handled
                }
                KeyCode::Home => {
                    self.highlighted = 0;
                    PopupOutcome::Handled
                }
                KeyCode::End => {
                    self.highlighted = self.items.len().saturating_sub(1);
                    PopupOutcome::Handled
                }
                KeyCode::Enter => self
                    .highlighted()
                    .map_or(PopupOutcome::Close, PopupOutcome::Choose),
                KeyCode::Esc => PopupOutcome::Close,
                _ => PopupOutcome::Handled,
            },
            Event::Mouse(mouse) => {
                let Some(area) = self.last_area else {
                    return PopupOutcome::Ignored;
                };
                let inside = rect_contains(area, mouse.column, mouse.row);
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) if !inside => PopupOutcome::Close,
                    MouseEventKind::Down(MouseButton::Left) => {
                        let row = mouse.row.saturating_sub(area.y + 1) as usize;
                        let index = self.offset + row;
                        match self.items.get(index) {
                            Some((id, _)) if mouse.row > area.y => PopupOutcome::Choose(*id),
                            _ => PopupOutcome::Handled,
                        }
                    }
                    MouseEventKind::ScrollUp if inside => {
                        self.bump(-1);
                        PopupOutcome::Handled
                    }
                    MouseEventKind::ScrollDown if inside => {
                        self.bump(1);
                        PopupOutcome::Handled
                    }
                    _ => PopupOutcome::Ignored,
                }
            }
            _ => PopupOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::TabEntry;
    use crossterm::event::{KeyEvent, KeyModifiers, MouseEvent};
    use ratatui::buffer::Buffer;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn popup() -> (MorePopup, Vec<TabId>) {
        let ids: Vec<TabId> = (0..3).map(|_| TabEntry::new("x").id()).collect();
        let items = ids
            .iter()
            .zip(["alpha", "beta", "gamma"])
            .map(|(id, t)| (*id, t.to_string()))
            .collect();
        (MorePopup::new(items, Some(ids[1]), Rect::new(17, 0, 3, 2)), ids)
    }

    #[test]
    fn highlight_starts_on_checked_item() {
        let (mut p, ids) = popup();
        assert_eq!(p.highlighted(), Some(ids[1]));
        assert_eq!(p.handle_event(&key(KeyCode::Down)), PopupOutcome::Handled);
        assert_eq!(p.handle_event(&key(KeyCode::Down)), PopupOutcome::Handled);
        assert_eq!(p.handle_event(&key(KeyCode::Enter)), PopupOutcome::Choose(ids[2]));
        assert_eq!(p.handle_event(&key(KeyCode::Esc)), PopupOutcome::Close);
    }

    #[test]
    fn area_hangs_below_anchor_and_stays_inside() {
        let (p, _) = popup();
        let area = p.area(Rect::new(0, 0, 20, 10));
        assert_eq!(area, Rect::new(11, 2, 9, 5));
        let cramped = p.area(Rect::new(0, 0, 20, 6));
        assert_eq!(cramped.y, 1);
    }

    #[test]
    fn renders_check_mark_and_handles_clicks() {
        let (mut p, ids) = popup();
        let bounds = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(bounds);
        let mut frame = UiFrame::from_parts(bounds, &mut buf);
        p.render(&mut frame, bounds);
        assert_eq!(buf.cell((12, 4)).map(|c| c.symbol()), Some("✓"));

        let click = |column, row| {
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            })
        };
        assert_eq!(p.handle_event(&click(13, 3)), PopupOutcome::Choose(ids[0]));
        assert_eq!(p.handle_event(&click(0, 0)), PopupOutcome::Close);
    }
}
