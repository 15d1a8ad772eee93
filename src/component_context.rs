//! Shared component rendering context
//!
//! `ComponentContext` carries UI metadata that components may need during
//! rendering and event handling, so the component trait remains stable and
//! components do not rely on ad-hoc boolean parameters.

/// Context passed to `Component` trait methods describing UI state.
///
/// - `focused`: whether the tab container currently owns keyboard focus.
/// - `selected`: whether the component belongs to the selected tab.
#[derive(Debug, Clone, Copy)]
pub struct ComponentContext {
    focused: bool,
    selected: bool,
}

impl ComponentContext {
    pub const fn new(focused: bool) -> Self {
        Self {
            focused,
            selected: false,
        }
    }

    pub const fn focused(&self) -> bool {
        self.focused
    }

    pub const fn selected(&self) -> bool {
        self.selected
    }

    pub const fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl Default for ComponentContext {
    fn default() -> Self {
        Self::new(false)
    }
}
