use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use ratatui::text::Line;

use super::actions::ActionGroup;

static NEXT_TAB_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a tab entry.
///
/// Minted when the entry is constructed, so clones of an entry compare equal
/// and re-adding one to a container is recognised as the same tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TabId(u64);

impl TabId {
    fn next() -> Self {
        Self(NEXT_TAB_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle of a caller-owned content component.
///
/// The container never renders content itself; it only tracks which
/// components are parented by it and tells the host when that changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(pub u64);

/// Property-change notification recorded by [`TabEntry`] setters.
///
/// The container drains these after every `update_tab` call and dispatches
/// each one to a targeted update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabChange {
    Text,
    Icon,
    Tooltip,
    Hidden,
    Attraction(bool),
    ActionGroup,
    TabActions,
}

/// One tab: content handle, label presentation and notification state.
#[derive(Clone)]
pub struct TabEntry {
    id: TabId,
    component: Option<ComponentId>,
    preferred_focus: Option<ComponentId>,
    text: Line<'static>,
    icon: Option<String>,
    tooltip: Option<String>,
    group: Option<ActionGroup>,
    place: Option<String>,
    tab_label_actions: Option<ActionGroup>,
    hidden: bool,
    attraction: bool,
    blink_count: u32,
    last_focus_owner: Option<ComponentId>,
    object: Option<Rc<dyn Any>>,
    changes: Vec<TabChange>,
}

impl TabEntry {
    pub fn new<T: Into<Line<'static>>>(text: T) -> Self {
        Self {
            id: TabId::next(),
            component: None,
            preferred_focus: None,
            text: text.into(),
            icon: None,
            tooltip: None,
            group: None,
            place: None,
            tab_label_actions: None,
            hidden: false,
            attraction: false,
            blink_count: 0,
            last_focus_owner: None,
            object: None,
            changes: Vec::new(),
        }
    }

    pub fn with_component(mut self, component: ComponentId) -> Self {
        self.component = Some(component);
        self
    }

    /// Component that should receive focus when the tab is selected, if it
    /// differs from the content component itself.
    pub fn with_preferred_focus(mut self, component: ComponentId) -> Self {
        self.preferred_focus = Some(component);
        self
    }

    pub fn with_icon<T: Into<String>>(mut self, icon: T) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_tooltip<T: Into<String>>(mut self, tooltip: T) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_group(mut self, group: ActionGroup, place: Option<String>) -> Self {
        self.group = Some(group);
        self.place = place;
        self
    }

    pub fn with_tab_label_actions(mut self, actions: ActionGroup) -> Self {
        self.tab_label_actions = Some(actions);
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_object<T: Any>(mut self, object: T) -> Self {
        self.object = Some(Rc::new(object));
        self
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn component(&self) -> Option<ComponentId> {
        self.component
    }

    pub fn preferred_focus(&self) -> Option<ComponentId> {
        self.preferred_focus.or(self.component)
    }

    pub fn text(&self) -> &Line<'static> {
        &self.text
    }

    /// The label text without styling.
    pub fn plain_text(&self) -> String {
        self.text
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn group(&self) -> Option<&ActionGroup> {
        self.group.as_ref()
    }

    pub fn place(&self) -> Option<&str> {
        self.place.as_deref()
    }

    pub fn tab_label_actions(&self) -> Option<&ActionGroup> {
        self.tab_label_actions.as_ref()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_attracting(&self) -> bool {
        self.attraction
    }

    pub fn blink_count(&self) -> u32 {
        self.blink_count
    }

    pub fn last_focus_owner(&self) -> Option<ComponentId> {
        self.last_focus_owner
    }

    /// Downcast the associated object, if one of type `T` is attached.
    pub fn object<T: Any>(&self) -> Option<&T> {
        self.object.as_ref().and_then(|obj| obj.downcast_ref::<T>())
    }

    pub fn set_text<T: Into<Line<'static>>>(&mut self, text: T) {
        let text = text.into();
        if self.text != text {
            self.text = text;
            self.changes.push(TabChange::Text);
        }
    }

    pub fn set_icon(&mut self, icon: Option<String>) {
        if self.icon != icon {
            self.icon = icon;
            self.changes.push(TabChange::Icon);
        }
    }

    pub fn set_tooltip(&mut self, tooltip: Option<String>) {
        if self.tooltip != tooltip {
            self.tooltip = tooltip;
            self.changes.push(TabChange::Tooltip);
        }
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        if self.hidden != hidden {
            self.hidden = hidden;
            self.changes.push(TabChange::Hidden);
        }
    }

    pub fn set_group(&mut self, group: Option<ActionGroup>, place: Option<String>) {
        self.group = group;
        self.place = place;
        self.changes.push(TabChange::ActionGroup);
    }

    pub fn set_tab_label_actions(&mut self, actions: Option<ActionGroup>) {
        if self.tab_label_actions != actions {
            self.tab_label_actions = actions;
            self.changes.push(TabChange::TabActions);
        }
    }

    /// Start the blinking notification on this tab.
    pub fn fire_attraction(&mut self) {
        if !self.attraction {
            self.attraction = true;
            self.changes.push(TabChange::Attraction(true));
        }
    }

    pub fn stop_attraction(&mut self) {
        if self.attraction {
            self.attraction = false;
            self.changes.push(TabChange::Attraction(false));
        }
    }

    pub(crate) fn set_blink_count(&mut self, count: u32) {
        self.blink_count = count;
    }

    pub(crate) fn set_last_focus_owner(&mut self, owner: Option<ComponentId>) {
        self.last_focus_owner = owner;
    }

    pub(crate) fn take_changes(&mut self) -> Vec<TabChange> {
        std::mem::take(&mut self.changes)
    }
}

impl PartialEq for TabEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TabEntry {}

impl fmt::Debug for TabEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabEntry")
            .field("id", &self.id)
            .field("text", &self.plain_text())
            .field("component", &self.component)
            .field("hidden", &self.hidden)
            .field("attraction", &self.attraction)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::text::Span;

    #[test]
    fn ids_are_unique_and_survive_clone() {
        let a = TabEntry::new("a");
        let b = TabEntry::new("b");
        assert_ne!(a.id(), b.id());
        let a2 = a.clone();
        assert_eq!(a, a2);
    }

    #[test]
    fn setters_only_record_real_changes() {
        let mut e = TabEntry::new("one");
        e.set_text("one");
        assert!(e.take_changes().is_empty());
        e.set_text("two");
        e.set_hidden(true);
        e.set_hidden(true);
        assert_eq!(e.take_changes(), vec![TabChange::Text, TabChange::Hidden]);
        assert!(e.take_changes().is_empty());
    }

    #[test]
    fn attraction_toggles_once() {
        let mut e = TabEntry::new("x");
        e.fire_attraction();
        e.fire_attraction();
        e.stop_attraction();
        assert_eq!(
            e.take_changes(),
            vec![TabChange::Attraction(true), TabChange::Attraction(false)]
        );
    }

    #[test]
    fn plain_text_joins_spans() {
        let e = TabEntry::new(Line::from(vec![Span::raw("ma"), Span::raw("in.rs")]));
        assert_eq!(e.plain_text(), "main.rs");
    }

    #[test]
    fn object_downcasts_by_type() {
        let e = TabEntry::new("x").with_object(42u32);
        assert_eq!(e.object::<u32>(), Some(&42));
        assert_eq!(e.object::<String>(), None);
    }

    #[test]
    fn preferred_focus_defaults_to_component() {
        let e = TabEntry::new("x").with_component(ComponentId(7));
        assert_eq!(e.preferred_focus(), Some(ComponentId(7)));
        let e = e.with_preferred_focus(ComponentId(8));
        assert_eq!(e.preferred_focus(), Some(ComponentId(8)));
    }
}
