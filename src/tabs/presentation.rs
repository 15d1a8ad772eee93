//! Presentation settings of a tab container.
//!
//! Everything here is plain data. `TabContainer` exposes chaining setters
//! that update these values and schedule the relayout or repaint they need.

use std::time::Duration;

use ratatui::layout::Rect;
use ratatui::style::Color;

use super::actions::ActionGroup;
use crate::constants::DEFAULT_BORDER;

/// Edge of the container the tab strip is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabsPosition {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl TabsPosition {
    pub fn is_horizontal(self) -> bool {
        matches!(self, TabsPosition::Top | TabsPosition::Bottom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// One row of labels with an overflow popup.
    #[default]
    SingleRow,
    /// Labels wrap into several balanced rows.
    Table,
}

/// Per-edge sizes in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Insets {
    pub top: u16,
    pub left: u16,
    pub bottom: u16,
    pub right: u16,
}

impl Insets {
    pub const fn new(top: u16, left: u16, bottom: u16, right: u16) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub const fn uniform(size: u16) -> Self {
        Self::new(size, size, size, size)
    }

    /// Border insets where `None` means the default thickness.
    pub fn border(
        top: Option<u16>,
        left: Option<u16>,
        right: Option<u16>,
        bottom: Option<u16>,
    ) -> Self {
        let size = |value: Option<u16>| value.unwrap_or(DEFAULT_BORDER);
        Self::new(size(top), size(left), size(bottom), size(right))
    }

    /// `rect` shrunk by these insets, saturating at an empty rectangle.
    pub fn shrink(&self, rect: Rect) -> Rect {
        let width = rect.width.saturating_sub(self.left.saturating_add(self.right));
        let height = rect.height.saturating_sub(self.top.saturating_add(self.bottom));
        Rect {
            x: rect.x.saturating_add(self.left.min(rect.width)),
            y: rect.y.saturating_add(self.top.min(rect.height)),
            width,
            height,
        }
    }

    pub fn add(&self, other: Insets) -> Insets {
        Insets::new(
            self.top.saturating_add(other.top),
            self.left.saturating_add(other.left),
            self.bottom.saturating_add(other.bottom),
            self.right.saturating_add(other.right),
        )
    }
}

/// How long the pointer must rest over a label before its label actions
/// appear when auto-hide is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeadzoneLength {
    None,
    Short,
    #[default]
    Default,
    Long,
}

impl DeadzoneLength {
    pub fn duration(self) -> Duration {
        match self {
            DeadzoneLength::None => Duration::ZERO,
            DeadzoneLength::Short => Duration::from_millis(150),
            DeadzoneLength::Default => Duration::from_millis(300),
            DeadzoneLength::Long => Duration::from_millis(750),
        }
    }
}

/// Context menu shown on right click over a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupGroup {
    pub group: ActionGroup,
    pub place: String,
    /// Append the next/previous tab actions to the menu.
    pub add_navigation_group: bool,
}

impl PopupGroup {
    pub fn new<T: Into<String>>(group: ActionGroup, place: T, add_navigation_group: bool) -> Self {
        Self {
            group,
            place: place.into(),
            add_navigation_group,
        }
    }

    /// The group actually shown, navigation actions included when enabled.
    pub fn effective_group(&self) -> ActionGroup {
        if self.add_navigation_group {
            self.group.merged(&ActionGroup::navigation())
        } else {
            self.group.clone()
        }
    }
}

#[derive(Debug, Clone)]
pub struct TabsPresentation {
    pub layout_mode: LayoutMode,
    pub position: TabsPosition,
    /// Side toolbars run down the left of the content instead of above it.
    pub side_component_vertical: bool,
    pub border: Insets,
    pub inner_insets: Insets,
    pub stealth_tab_mode: bool,
    pub paint_focus: bool,
    pub ghosts_always_visible: bool,
    pub hide_tabs: bool,
    pub draw_border_if_tabs_hidden: bool,
    pub request_focus_on_last_focused: bool,
    pub tab_label_actions_auto_hide: bool,
    pub tab_actions_deadzone: DeadzoneLength,
    pub active_tab_fill_in: Option<Color>,
    pub popup_group: Option<PopupGroup>,
}

impl Default for TabsPresentation {
    fn default() -> Self {
        Self {
            layout_mode: LayoutMode::SingleRow,
            position: TabsPosition::Top,
            side_component_vertical: false,
            border: Insets::uniform(DEFAULT_BORDER),
            inner_insets: Insets::default(),
            stealth_tab_mode: false,
            paint_focus: true,
            ghosts_always_visible: false,
            hide_tabs: false,
            draw_border_if_tabs_hidden: true,
            request_focus_on_last_focused: false,
            tab_label_actions_auto_hide: false,
            tab_actions_deadzone: DeadzoneLength::Default,
            active_tab_fill_in: None,
            popup_group: None,
        }
    }
}

impl TabsPresentation {
    /// Table layout only applies to horizontal strips.
    pub fn effective_layout_mode(&self) -> LayoutMode {
        if self.position.is_horizontal() {
            self.layout_mode
        } else {
            LayoutMode::SingleRow
        }
    }

    /// Stealth mode only takes effect for a single tab with vertical side
    /// toolbars.
    pub fn is_stealth_effective(&self, tab_count: usize) -> bool {
        self.stealth_tab_mode && tab_count == 1 && self.side_component_vertical
    }
}
