//! Contract with the host action/menu service.
//!
//! The container never interprets actions. It asks the service for toolbar
//! components and popup menus and only positions what comes back.

use ratatui::layout::{Rect, Size};
use ratatui::style::Style;

use crate::components::{Component, ComponentContext};
use crate::theme;
use crate::ui::{UiFrame, safe_set_string};

/// Navigation action ids appended to popup groups on request.
pub const ACTION_NEXT_TAB: &str = "NextTab";
pub const ACTION_PREVIOUS_TAB: &str = "PreviousTab";

/// Placement used when an entry does not name one.
pub const PLACE_UNKNOWN: &str = "unknown";

/// Descriptor of a group of host actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionGroup {
    pub id: String,
    pub actions: Vec<String>,
}

impl ActionGroup {
    pub fn new<T: Into<String>>(id: T, actions: Vec<String>) -> Self {
        Self {
            id: id.into(),
            actions,
        }
    }

    /// The next/previous tab navigation group.
    pub fn navigation() -> Self {
        Self::new(
            "TabNavigation",
            vec![ACTION_NEXT_TAB.to_string(), ACTION_PREVIOUS_TAB.to_string()],
        )
    }

    /// This group followed by `other`'s actions.
    pub fn merged(&self, other: &ActionGroup) -> Self {
        let mut actions = self.actions.clone();
        actions.extend(other.actions.iter().cloned());
        Self::new(self.id.clone(), actions)
    }
}

/// A renderable toolbar produced by the action service.
pub trait ToolbarView: Component {
    fn preferred_size(&self) -> Size;
}

pub trait ActionService {
    /// Build a toolbar for `group`. `horizontal` is false when side toolbars
    /// run vertically along the content.
    fn create_toolbar(
        &mut self,
        group: &ActionGroup,
        place: &str,
        horizontal: bool,
    ) -> Box<dyn ToolbarView>;

    /// Show a popup menu for `group` anchored at `anchor` (column, row).
    fn show_popup_menu(&mut self, group: &ActionGroup, place: &str, anchor: (u16, u16));
}

/// Toolbar that renders each action as a bracketed button.
#[derive(Debug, Clone)]
pub struct TextToolbar {
    actions: Vec<String>,
    horizontal: bool,
}

impl TextToolbar {
    pub fn new(group: &ActionGroup, horizontal: bool) -> Self {
        Self {
            actions: group.actions.clone(),
            horizontal,
        }
    }

    fn button(action: &str) -> String {
        format!("[{action}]")
    }
}

impl Component for TextToolbar {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        let style = Style::default().fg(theme::toolbar_fg()).bg(theme::toolbar_bg());
        let mut x = area.x;
        let mut y = area.y;
        for action in &self.actions {
            let label = Self::button(action);
            safe_set_string(buffer, bounds, x, y, &label, style);
            if self.horizontal {
                x = x.saturating_add(label.chars().count() as u16 + 1);
            } else {
                y = y.saturating_add(1);
            }
        }
    }
}

impl ToolbarView for TextToolbar {
    fn preferred_size(&self) -> Size {
        let widths = self.actions.iter().map(|a| Self::button(a).chars().count() as u16);
        if self.horizontal {
            let total: u16 = widths.map(|w| w + 1).sum();
            Size::new(total.saturating_sub(1), 1)
        } else {
            Size::new(widths.max().unwrap_or(0), self.actions.len() as u16)
        }
    }
}

/// Action service that builds [`TextToolbar`]s and remembers the last popup
/// request so the host can render it.
#[derive(Debug, Default, Clone)]
pub struct TextActionService {
    last_popup: Option<(ActionGroup, String, (u16, u16))>,
}

impl TextActionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_popup(&mut self) -> Option<(ActionGroup, String, (u16, u16))> {
        self.last_popup.take()
    }
}

impl ActionService for TextActionService {
    fn create_toolbar(
        &mut self,
        group: &ActionGroup,
        _place: &str,
        horizontal: bool,
    ) -> Box<dyn ToolbarView> {
        Box::new(TextToolbar::new(group, horizontal))
    }

    fn show_popup_menu(&mut self, group: &ActionGroup, place: &str, anchor: (u16, u16)) {
        self.last_popup = Some((group.clone(), place.to_string(), anchor));
    }
}
