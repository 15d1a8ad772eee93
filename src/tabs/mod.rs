//! The tab container.
//!
//! `TabContainer` owns the entries, keeps the visible/hidden partition,
//! runs a layout pass whenever geometry may have changed and paints the
//! chrome from the last [`LayoutResult`]. Selection and component parenting
//! go through [`SelectionController`], which holds back detachment of
//! components until the host focus manager settles.
//!
//! Content is never rendered here. Hosts learn which components are parented
//! from [`TabsEvent`]s and paint the selected one into [`TabContainer::content_area`].

pub mod actions;
pub mod animator;
pub mod callback;
pub mod entry;
pub mod focus;
pub mod popup;
pub mod presentation;
pub mod selection;

pub use actions::{ActionGroup, ActionService, TextActionService, TextToolbar, ToolbarView};
pub use animator::AttractionAnimator;
pub use callback::{Callback, CallbackState};
pub use entry::{ComponentId, TabChange, TabEntry, TabId};
pub use focus::{FocusManager, ImmediateFocus};
pub use popup::{MorePopup, PopupOutcome};
pub use presentation::{
    DeadzoneLength, Insets, LayoutMode, PopupGroup, TabsPosition, TabsPresentation,
};
pub use selection::SelectionController;

use std::any::Any;
use std::cell::OnceCell;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::chrome::{
    ChromeScene, LabelView, RoundedDecorator, TabDecorator, action_glyphs, label_action_at,
    label_width,
};
use crate::components::{Component, ComponentContext};
use crate::error::TabsError;
use crate::keybindings::{KeyBindings, TabAction};
use crate::layout::{LabelMetrics, LayoutInput, LayoutResult, ToolbarSlot, compute_layout};
use crate::ui::UiFrame;
use actions::PLACE_UNKNOWN;

/// Selection notifications, delivered synchronously in registration order.
pub trait TabsListener {
    /// Called before the selected component is swapped.
    fn before_selection_changed(&mut self, _old: Option<TabId>, _new: Option<TabId>) {}

    /// Called after the swap.
    fn selection_changed(&mut self, _old: Option<TabId>, _new: Option<TabId>) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Notifications for the host, drained with [`TabContainer::take_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabsEvent {
    /// The component became parented by the container.
    Attached(ComponentId),
    /// The component was detached right away.
    Detached(ComponentId),
    /// Components detached together once focus settled.
    DeferredSweep(Vec<ComponentId>),
    /// A label action was clicked.
    LabelAction { tab: TabId, action: String },
}

pub struct TabContainer {
    entries: BTreeMap<TabId, TabEntry>,
    visible: Vec<TabId>,
    hidden: BTreeSet<TabId>,
    all_tabs: OnceCell<Vec<TabId>>,
    label_widths: BTreeMap<TabId, u16>,
    toolbars: BTreeMap<TabId, Box<dyn ToolbarView>>,
    selection: SelectionController,
    animator: AttractionAnimator,
    attractions: BTreeSet<TabId>,
    listeners: Vec<(ListenerId, Box<dyn TabsListener>)>,
    next_listener: u64,
    events: Vec<TabsEvent>,
    presentation: TabsPresentation,
    showing: bool,
    focused: bool,
    disposed: bool,
    repaint: bool,
    last_area: Option<Rect>,
    last_layout: Option<LayoutResult>,
    more_popup: Option<MorePopup>,
    popup_target: Option<TabId>,
    hover: Option<(TabId, Instant)>,
    paint_blocked: bool,
    snapshot: Option<Buffer>,
    action_service: Option<Box<dyn ActionService>>,
    decorator: Box<dyn TabDecorator>,
    keybindings: KeyBindings,
}

impl Default for TabContainer {
    fn default() -> Self {
        Self::new(Box::new(ImmediateFocus::new()))
    }
}

impl TabContainer {
    pub fn new(focus: Box<dyn FocusManager>) -> Self {
        Self {
            entries: BTreeMap::new(),
            visible: Vec::new(),
            hidden: BTreeSet::new(),
            all_tabs: OnceCell::new(),
            label_widths: BTreeMap::new(),
            toolbars: BTreeMap::new(),
            selection: SelectionController::new(focus),
            animator: AttractionAnimator::default(),
            attractions: BTreeSet::new(),
            listeners: Vec::new(),
            next_listener: 1,
            events: Vec::new(),
            presentation: TabsPresentation::default(),
            showing: false,
            focused: false,
            disposed: false,
            repaint: true,
            last_area: None,
            last_layout: None,
            more_popup: None,
            popup_target: None,
            hover: None,
            paint_blocked: false,
            snapshot: None,
            action_service: None,
            decorator: Box::new(RoundedDecorator),
            keybindings: KeyBindings::navigation(),
        }
    }

    pub fn with_decorator(mut self, decorator: Box<dyn TabDecorator>) -> Self {
        self.decorator = decorator;
        self
    }

    pub fn with_action_service(mut self, service: Box<dyn ActionService>) -> Self {
        self.set_action_service(Some(service));
        self
    }

    pub fn with_keybindings(mut self, keybindings: KeyBindings) -> Self {
        self.keybindings = keybindings;
        self
    }

    // ---------------------------------------------------------------------
    // Collection

    pub fn add_tab(&mut self, entry: TabEntry) -> TabId {
        self.insert_tab(entry, None)
    }

    /// Insert `entry` at `index` in the visible sequence. `None` or an index
    /// past the end appends. Adding a known entry returns its id unchanged.
    pub fn insert_tab(&mut self, mut entry: TabEntry, index: Option<usize>) -> TabId {
        let id = entry.id();
        if self.disposed || self.entries.contains_key(&id) {
            return id;
        }
        entry.take_changes();

        if let Some(component) = entry.component() {
            self.selection.unqueue(component);
        }
        let hidden = entry.is_hidden();
        let attracting = entry.is_attracting();
        self.label_widths.insert(id, Self::measure(&entry));
        self.entries.insert(id, entry);
        if hidden {
            self.hidden.insert(id);
        } else {
            match index {
                Some(index) if index < self.visible.len() => self.visible.insert(index, id),
                _ => self.visible.push(id),
            }
        }
        self.all_tabs.take();
        self.update_side_component(id);
        if attracting {
            self.update_attraction(id, true);
        }
        tracing::debug!(tab = %id, ?index, hidden, "tab added");

        self.update_all();
        self.pump();
        id
    }

    pub fn remove_tab(&mut self, id: TabId) -> Callback {
        match self.remove_tab_with_successor(id, None) {
            Ok(callback) => callback,
            Err(_) => Callback::rejected(),
        }
    }

    /// Remove `id`, handing the selection to `successor` when given. The
    /// successor must be visible.
    pub fn remove_tab_with_successor(
        &mut self,
        id: TabId,
        successor: Option<TabId>,
    ) -> Result<Callback, TabsError> {
        if self.disposed || !self.entries.contains_key(&id) {
            return Ok(Callback::done());
        }
        let to_select = match successor {
            Some(forced) if !self.visible.contains(&forced) || forced == id => {
                tracing::warn!(tab = %id, successor = %forced, "successor is not visible");
                return Err(TabsError::SuccessorNotVisible(forced));
            }
            Some(forced) => Some(forced),
            None => self.selection.successor_on_remove_of(id, &self.visible),
        };
        tracing::debug!(tab = %id, successor = ?to_select, "removing tab");

        let result = match to_select {
            Some(next) => {
                self.process_remove(id, false);
                let select = self.select(next, true);
                self.selection.sweep_after(select)
            }
            None => {
                self.process_remove(id, true);
                self.selection.remove_deferred()
            }
        };
        if self.visible.is_empty() {
            self.selection.remove_deferred_now();
        }
        self.relayout();
        self.pump();
        Ok(result)
    }

    pub fn remove_all_tabs(&mut self) {
        for id in self.tabs().to_vec() {
            self.remove_tab(id);
        }
    }

    fn process_remove(&mut self, id: TabId, forced_now: bool) {
        self.toolbars.remove(&id);
        let Some(entry) = self.entries.remove(&id) else {
            return;
        };
        if let Some(component) = entry.component() {
            if forced_now || !self.showing {
                if self.selection.detach_now(component) {
                    self.events.push(TabsEvent::Detached(component));
                }
            } else {
                self.selection.queue_for_remove(component);
            }
        }
        self.visible.retain(|v| *v != id);
        self.hidden.remove(&id);
        self.label_widths.remove(&id);
        if self.attractions.remove(&id) && self.attractions.is_empty() {
            self.animator.suspend();
        }
        self.all_tabs.take();
        if self.popup_target == Some(id) {
            self.popup_target = None;
        }
        if self.hover.is_some_and(|(hovered, _)| hovered == id) {
            self.hover = None;
        }
        self.more_popup = None;

        // With a successor pending, the removed selection stays in place so
        // the successor's selection change reports it as the old value.
        if forced_now || self.selection.raw() != Some(id) {
            self.selection.normalize(&self.visible);
        }
        self.update_container();
        self.selection.remove_deferred();
    }

    /// Reorder the visible sequence.
    pub fn sort_tabs<F>(&mut self, mut compare: F)
    where
        F: FnMut(&TabEntry, &TabEntry) -> Ordering,
    {
        if self.disposed {
            return;
        }
        let entries = &self.entries;
        self.visible
            .sort_by(|a, b| match (entries.get(a), entries.get(b)) {
                (Some(a), Some(b)) => compare(a, b),
                _ => Ordering::Equal,
            });
        self.all_tabs.take();
        self.relayout();
    }

    /// Visible tabs in display order followed by hidden ones.
    pub fn tabs(&self) -> &[TabId] {
        self.all_tabs.get_or_init(|| {
            self.visible
                .iter()
                .chain(self.hidden.iter())
                .copied()
                .collect()
        })
    }

    pub fn visible_tabs(&self) -> &[TabId] {
        &self.visible
    }

    pub fn hidden_tabs(&self) -> impl Iterator<Item = TabId> + '_ {
        self.hidden.iter().copied()
    }

    pub fn tab_count(&self) -> usize {
        self.tabs().len()
    }

    pub fn tab_at(&self, index: usize) -> Option<TabId> {
        self.tabs().get(index).copied()
    }

    pub fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs().iter().position(|t| *t == id)
    }

    pub fn entry(&self, id: TabId) -> Option<&TabEntry> {
        self.entries.get(&id)
    }

    pub fn is_hidden(&self, id: TabId) -> bool {
        self.hidden.contains(&id)
    }

    /// Apply `update` to an entry and dispatch the changes it recorded.
    pub fn update_tab<F>(&mut self, id: TabId, update: F) -> Result<(), TabsError>
    where
        F: FnOnce(&mut TabEntry),
    {
        if self.disposed {
            return Ok(());
        }
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(TabsError::UnknownTab(id))?;
        update(entry);
        let changes = entry.take_changes();
        for change in changes {
            match change {
                TabChange::Text | TabChange::Icon | TabChange::TabActions => {
                    self.update_label(id)
                }
                TabChange::Tooltip => self.repaint = true,
                TabChange::Hidden => self.update_hiding(id),
                TabChange::Attraction(start) => self.update_attraction(id, start),
                TabChange::ActionGroup => {
                    self.update_side_component(id);
                    self.relayout();
                }
            }
        }
        self.pump();
        Ok(())
    }

    fn measure(entry: &TabEntry) -> u16 {
        let actions = entry.tab_label_actions().map(action_glyphs);
        label_width(entry.text(), entry.icon(), actions.as_deref())
    }

    /// Re-measure one label; only a changed width costs a layout pass.
    fn update_label(&mut self, id: TabId) {
        let Some(width) = self.entries.get(&id).map(Self::measure) else {
            return;
        };
        if self.label_widths.insert(id, width) == Some(width) {
            self.repaint = true;
        } else {
            self.relayout();
        }
    }

    fn update_hiding(&mut self, id: TabId) {
        let Some(hidden) = self.entries.get(&id).map(TabEntry::is_hidden) else {
            return;
        };
        if hidden && self.visible.contains(&id) {
            let was_selected = self.selected() == Some(id);
            let successor = self.selection.successor_on_remove_of(id, &self.visible);
            self.visible.retain(|v| *v != id);
            self.hidden.insert(id);
            self.all_tabs.take();
            if was_selected {
                self.notify_before(Some(id), successor);
                self.selection.set_raw(successor);
                self.update_all();
                self.notify_after(Some(id), successor);
            } else {
                self.update_all();
            }
        } else if !hidden && self.hidden.remove(&id) {
            self.visible.push(id);
            self.all_tabs.take();
            self.update_all();
        } else {
            return;
        }
        tracing::debug!(tab = %id, hidden, "tab visibility changed");
    }

    fn update_attraction(&mut self, id: TabId, start: bool) {
        if start {
            self.attractions.insert(id);
            if !self.animator.is_running() {
                self.animator.resume(Instant::now());
            }
        } else {
            self.attractions.remove(&id);
            if let Some(entry) = self.entries.get_mut(&id) {
                entry.set_blink_count(0);
            }
            if self.attractions.is_empty() {
                self.animator.suspend();
            }
        }
        self.repaint = true;
    }

    fn update_side_component(&mut self, id: TabId) {
        self.toolbars.remove(&id);
        let horizontal = !self.presentation.side_component_vertical;
        let (Some(service), Some(entry)) = (self.action_service.as_mut(), self.entries.get(&id))
        else {
            return;
        };
        if let Some(group) = entry.group() {
            let place = entry.place().unwrap_or(PLACE_UNKNOWN);
            let toolbar = service.create_toolbar(group, place, horizontal);
            self.toolbars.insert(id, toolbar);
        }
    }

    fn rebuild_toolbars(&mut self) {
        let ids: Vec<TabId> = self.entries.keys().copied().collect();
        for id in ids {
            self.update_side_component(id);
        }
        self.relayout();
    }

    // ---------------------------------------------------------------------
    // Selection

    /// The selected tab: the stored selection while it is visible, else the
    /// first visible tab.
    pub fn selected(&self) -> Option<TabId> {
        self.selection.resolve(&self.visible)
    }

    pub fn select(&mut self, id: TabId, request_focus: bool) -> Callback {
        if self.disposed {
            return Callback::rejected();
        }
        if !self.visible.contains(&id) {
            tracing::warn!(tab = %id, "cannot select a tab that is not visible");
            return Callback::rejected();
        }

        let old = self.selection.raw();
        if old == Some(id) {
            if !request_focus {
                return Callback::done();
            }
            let callback = match self.to_focus() {
                Some(target) => self.selection.focus_mut().request_focus(target),
                None => Callback::done(),
            };
            self.pump();
            return callback;
        }

        if self.presentation.request_focus_on_last_focused
            && let Some(previous) = old
            && self.is_child_focused_now()
        {
            let owner = self.selection.focus().focus_owner();
            if let Some(entry) = self.entries.get_mut(&previous) {
                entry.set_last_focus_owner(owner);
            }
        }

        self.selection.set_raw(Some(id));
        self.notify_before(old, Some(id));
        self.update_container();
        self.relayout();
        self.notify_after(old, Some(id));
        tracing::debug!(old = ?old, new = %id, request_focus, "selection changed");

        let result = match self.to_focus().filter(|_| request_focus) {
            Some(target) => self.selection.request_focus_then_sweep(target),
            None => self.selection.remove_deferred(),
        };
        self.pump();
        result
    }

    pub fn can_select_next(&self) -> bool {
        self.selected_index()
            .is_some_and(|index| index + 1 < self.visible.len())
    }

    pub fn can_select_previous(&self) -> bool {
        self.selected_index().is_some_and(|index| index > 0)
    }

    /// Select the visible tab after the selection. `None` when there is none.
    pub fn select_next(&mut self) -> Option<Callback> {
        let index = self.selected_index()?;
        let next = *self.visible.get(index + 1)?;
        Some(self.select(next, true))
    }

    pub fn select_previous(&mut self) -> Option<Callback> {
        let index = self.selected_index()?.checked_sub(1)?;
        let previous = self.visible[index];
        Some(self.select(previous, true))
    }

    fn selected_index(&self) -> Option<usize> {
        let selected = self.selected()?;
        self.visible.iter().position(|v| *v == selected)
    }

    fn selected_entry(&self) -> Option<&TabEntry> {
        self.selected().and_then(|id| self.entries.get(&id))
    }

    /// Focus owner lives inside the selected tab's content.
    fn is_child_focused_now(&self) -> bool {
        let focus = self.selection.focus();
        let Some(owner) = focus.focus_owner() else {
            return false;
        };
        self.selected_entry()
            .and_then(TabEntry::component)
            .is_some_and(|component| focus.is_descendant(owner, component))
    }

    fn to_focus(&self) -> Option<ComponentId> {
        let entry = self.selected_entry()?;
        if self.presentation.request_focus_on_last_focused
            && let Some(last) = entry.last_focus_owner()
            && !self.is_child_focused_now()
        {
            return Some(last);
        }
        let preferred = entry.preferred_focus()?;
        Some(
            self.selection
                .focus()
                .focus_target_for(preferred)
                .unwrap_or(preferred),
        )
    }

    fn notify_before(&mut self, old: Option<TabId>, new: Option<TabId>) {
        if old == new {
            return;
        }
        for (_, listener) in &mut self.listeners {
            listener.before_selection_changed(old, new);
        }
    }

    fn notify_after(&mut self, old: Option<TabId>, new: Option<TabId>) {
        if old == new {
            return;
        }
        for (_, listener) in &mut self.listeners {
            listener.selection_changed(old, new);
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn TabsListener>) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    /// Normalize the selection, reconcile parenting and relayout.
    fn update_all(&mut self) {
        self.selection.normalize(&self.visible);
        self.update_container();
        self.selection.remove_deferred();
        self.relayout();
    }

    /// Parent the selected tab's component and let go of every other one,
    /// deferring detachment while the container is showing.
    fn update_container(&mut self) {
        let selected = self.selection.raw().filter(|id| self.visible.contains(id));
        for id in self.visible.iter().chain(self.hidden.iter()) {
            let Some(component) = self.entries.get(id).and_then(TabEntry::component) else {
                continue;
            };
            if Some(*id) == selected {
                if self.selection.attach(component) {
                    self.events.push(TabsEvent::Attached(component));
                }
            } else if self.selection.is_attached(component) {
                if self.showing {
                    self.selection.queue_for_remove(component);
                } else if self.selection.detach_now(component) {
                    self.events.push(TabsEvent::Detached(component));
                }
            }
        }
    }

    pub fn is_attached(&self, component: ComponentId) -> bool {
        self.selection.is_attached(component)
    }

    /// Components waiting for focus to settle before detachment.
    pub fn pending_removal(&self) -> Vec<ComponentId> {
        self.selection.deferred().collect()
    }

    /// Drive pending focus continuations and collect finished sweeps.
    pub fn pump(&mut self) {
        self.selection.pump(self.disposed);
        for sweep in self.selection.take_sweeps() {
            self.events.push(TabsEvent::DeferredSweep(sweep));
        }
    }

    pub fn take_events(&mut self) -> Vec<TabsEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the attraction blink and pump. Returns true when a repaint is
    /// due.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.animator.tick(now) {
            for id in &self.attractions {
                if let Some(entry) = self.entries.get_mut(id) {
                    let count = entry.blink_count().wrapping_add(1);
                    entry.set_blink_count(count);
                }
            }
            self.repaint = true;
        }
        if self.presentation.tab_label_actions_auto_hide
            && let Some((_, since)) = self.hover
            && now.duration_since(since) >= self.presentation.tab_actions_deadzone.duration()
        {
            self.repaint = true;
        }
        self.pump();
        self.repaint
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    pub fn attracting_tabs(&self) -> impl Iterator<Item = TabId> + '_ {
        self.attractions.iter().copied()
    }

    /// Tear down. Later calls are no-ops and in-flight focus requests reject.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        tracing::debug!(tabs = self.entries.len(), "disposing tab container");
        self.disposed = true;
        self.entries.clear();
        self.visible.clear();
        self.hidden.clear();
        self.all_tabs.take();
        self.label_widths.clear();
        self.toolbars.clear();
        self.attractions.clear();
        self.animator.suspend();
        self.listeners.clear();
        self.selection.clear();
        self.last_layout = None;
        self.more_popup = None;
        self.popup_target = None;
        self.hover = None;
        self.snapshot = None;
        self.pump();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // ---------------------------------------------------------------------
    // Lookup

    /// Tab under the cell: a label first, else the content region.
    pub fn find_at(&self, column: u16, row: u16) -> Option<TabId> {
        if let Some(id) = self.find_tab_label_by(column, row) {
            return Some(id);
        }
        let layout = self.last_layout.as_ref()?;
        let in_content = crate::layout::rect_contains(layout.frame, column, row)
            || layout
                .toolbar
                .is_some_and(|r| crate::layout::rect_contains(r, column, row));
        if in_content { self.selected() } else { None }
    }

    /// Tab whose label covers the cell.
    pub fn find_tab_label_by(&self, column: u16, row: u16) -> Option<TabId> {
        self.last_layout.as_ref()?.tab_at(column, row)
    }

    /// Tooltip of the label under the cell.
    pub fn tooltip_at(&self, column: u16, row: u16) -> Option<&str> {
        let id = self.find_tab_label_by(column, row)?;
        self.entries.get(&id).and_then(TabEntry::tooltip)
    }

    pub fn find_by_component(&self, component: ComponentId) -> Option<TabId> {
        self.tabs()
            .iter()
            .copied()
            .find(|id| self.entries.get(id).and_then(TabEntry::component) == Some(component))
    }

    pub fn find_by_text(&self, text: &str) -> Option<TabId> {
        self.tabs()
            .iter()
            .copied()
            .find(|id| self.entries.get(id).is_some_and(|e| e.plain_text() == text))
    }

    pub fn find_by_object<T: Any + PartialEq>(&self, object: &T) -> Option<TabId> {
        self.tabs().iter().copied().find(|id| {
            self.entries
                .get(id)
                .and_then(|e| e.object::<T>())
                .is_some_and(|o| o == object)
        })
    }

    /// Tab a context action applies to: the popup target while a context
    /// menu is open, else the selection.
    pub fn target_info(&self) -> Option<TabId> {
        self.popup_target.or_else(|| self.selected())
    }

    pub fn popup_closed(&mut self) {
        self.popup_target = None;
    }

    // ---------------------------------------------------------------------
    // Layout and painting

    pub fn layout(&self) -> Option<&LayoutResult> {
        self.last_layout.as_ref()
    }

    pub fn content_area(&self) -> Option<Rect> {
        self.last_layout.as_ref().map(|l| l.content)
    }

    pub fn toolbar_area(&self) -> Option<Rect> {
        self.last_layout.as_ref().and_then(|l| l.toolbar)
    }

    pub fn do_layout(&mut self, area: Rect) -> &LayoutResult {
        self.last_area = Some(area);
        let layout = self.compute(area);
        self.last_layout.insert(layout)
    }

    fn relayout(&mut self) {
        if let Some(area) = self.last_area {
            self.last_layout = Some(self.compute(area));
        }
        self.repaint = true;
    }

    fn compute(&self, area: Rect) -> LayoutResult {
        let labels: Vec<LabelMetrics> = self
            .visible
            .iter()
            .map(|id| LabelMetrics {
                id: *id,
                width: self.label_widths.get(id).copied().unwrap_or(0),
            })
            .collect();
        let selected = self.selected();
        let toolbar = selected
            .and_then(|id| self.toolbars.get(&id))
            .map(|toolbar| ToolbarSlot {
                size: toolbar.preferred_size(),
                vertical: self.presentation.side_component_vertical,
            });
        let presentation = &self.presentation;
        let input = LayoutInput {
            area,
            labels: &labels,
            selected,
            position: presentation.position,
            ghosts_visible: presentation.ghosts_always_visible,
            hide_tabs: presentation.hide_tabs,
            stealth: presentation.is_stealth_effective(self.tab_count()),
            border: presentation.border,
            inner: presentation.inner_insets,
            toolbar,
        };
        compute_layout(presentation.effective_layout_mode(), &input)
    }

    pub fn needs_repaint(&self) -> bool {
        self.repaint
    }

    /// Label actions show unless auto-hide is on, in which case only the
    /// hovered label shows them once the pointer rested past the dead zone.
    pub fn label_actions_visible(&self, id: TabId, now: Instant) -> bool {
        if !self.presentation.tab_label_actions_auto_hide {
            return true;
        }
        self.hover.is_some_and(|(hovered, since)| {
            hovered == id
                && now.saturating_duration_since(since)
                    >= self.presentation.tab_actions_deadzone.duration()
        })
    }

    fn paint_focused(&self) -> bool {
        self.presentation.paint_focus && (self.focused || self.more_popup.is_some())
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        if self.disposed {
            return;
        }
        if self.paint_blocked {
            if let Some(snapshot) = &self.snapshot {
                frame.blit_from(snapshot, area);
            }
            return;
        }
        self.paint(frame, area);
        self.repaint = false;
    }

    fn paint(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        if self.last_area != Some(area) || self.last_layout.is_none() {
            self.do_layout(area);
        }
        let Some(layout) = self.last_layout.as_ref() else {
            return;
        };
        let now = Instant::now();
        let views: Vec<LabelView<'_>> = layout
            .placements
            .iter()
            .filter_map(|p| self.entries.get(&p.id))
            .map(|entry| LabelView {
                id: entry.id(),
                text: entry.text(),
                icon: entry.icon(),
                actions: entry.tab_label_actions().map(action_glyphs),
                actions_visible: self.label_actions_visible(entry.id(), now),
                attention: self.attractions.contains(&entry.id()) && entry.blink_count() % 2 == 1,
            })
            .collect();
        let scene = ChromeScene {
            layout,
            labels: &views,
            paint_focused: self.paint_focused(),
            paint_focus: self.presentation.paint_focus,
            active_fill: self.presentation.active_tab_fill_in,
            draw_border_if_tabs_hidden: self.presentation.draw_border_if_tabs_hidden,
        };
        self.decorator.render_tabs(frame, &scene);

        let toolbar_area = layout.toolbar;
        let selected = layout.selected;
        let ctx = ComponentContext::new(self.focused).with_selected(true);
        if let (Some(rect), Some(id)) = (toolbar_area, selected)
            && let Some(toolbar) = self.toolbars.get_mut(&id)
        {
            toolbar.render(frame, rect, &ctx);
        }
        if let Some(popup) = self.more_popup.as_mut() {
            popup.render(frame, area);
        }
    }

    /// While blocked, rendering repeats the snapshot taken when blocking
    /// started, or leaves the area untouched without one.
    pub fn set_paint_blocked(&mut self, blocked: bool, take_snapshot: bool) {
        if blocked == self.paint_blocked {
            return;
        }
        if blocked && take_snapshot && let Some(area) = self.last_area {
            let mut buffer = Buffer::empty(area);
            let mut frame = UiFrame::from_parts(area, &mut buffer);
            self.paint(&mut frame, area);
            self.snapshot = Some(buffer);
        }
        self.paint_blocked = blocked;
        if !blocked {
            self.snapshot = None;
            self.repaint = true;
        }
    }

    pub fn is_paint_blocked(&self) -> bool {
        self.paint_blocked
    }

    // ---------------------------------------------------------------------
    // Input

    pub fn handle_event(&mut self, event: &Event) -> bool {
        if self.disposed {
            return false;
        }
        match event {
            Event::FocusGained => {
                self.set_focused(true);
                return false;
            }
            Event::FocusLost => {
                self.set_focused(false);
                return false;
            }
            _ => {}
        }

        if let Some(popup) = self.more_popup.as_mut() {
            match popup.handle_event(event) {
                PopupOutcome::Handled => {
                    self.repaint = true;
                    return true;
                }
                PopupOutcome::Close => {
                    self.more_popup = None;
                    self.repaint = true;
                    return true;
                }
                PopupOutcome::Choose(id) => {
                    self.more_popup = None;
                    self.select(id, true);
                    return true;
                }
                PopupOutcome::Ignored => {}
            }
        }

        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                match self.keybindings.action_for_key(key) {
                    Some(TabAction::SelectNext) => self.select_next().is_some(),
                    Some(TabAction::SelectPrevious) => self.select_previous().is_some(),
                    Some(TabAction::ShowMore) => self.show_more_popup(),
                    _ => false,
                }
            }
            Event::Mouse(mouse) => {
                let (column, row) = (mouse.column, mouse.row);
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => self.click(column, row),
                    MouseEventKind::Down(MouseButton::Right) => self.context_click(column, row),
                    MouseEventKind::Moved => {
                        self.hover_at(column, row, Instant::now());
                        false
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    fn click(&mut self, column: u16, row: u16) -> bool {
        let Some(layout) = self.last_layout.as_ref() else {
            return false;
        };
        if layout.is_more_at(column, row) {
            return self.show_more_popup();
        }
        let Some(placement) = layout
            .placements
            .iter()
            .find(|p| crate::layout::rect_contains(p.rect, column, row))
        else {
            return false;
        };
        let (id, rect, position) = (placement.id, placement.rect, layout.position);

        if let Some(group) = self.entries.get(&id).and_then(TabEntry::tab_label_actions)
            && self.label_actions_visible(id, Instant::now())
        {
            let count = action_glyphs(group).chars().count() as u16;
            if let Some(index) = label_action_at(rect, position, count, column, row)
                && let Some(action) = group.actions.get(index)
            {
                tracing::debug!(tab = %id, action = %action, "label action clicked");
                self.events.push(TabsEvent::LabelAction {
                    tab: id,
                    action: action.clone(),
                });
                return true;
            }
        }
        self.select(id, true);
        true
    }

    fn context_click(&mut self, column: u16, row: u16) -> bool {
        let Some(id) = self.find_tab_label_by(column, row) else {
            return false;
        };
        self.popup_target = Some(id);
        if let (Some(service), Some(popup)) = (
            self.action_service.as_mut(),
            self.presentation.popup_group.as_ref(),
        ) {
            service.show_popup_menu(&popup.effective_group(), &popup.place, (column, row));
        }
        true
    }

    fn hover_at(&mut self, column: u16, row: u16, now: Instant) {
        let hovered = self.find_tab_label_by(column, row);
        match (hovered, self.hover) {
            (Some(id), Some((current, _))) if id == current => {}
            (Some(id), _) => {
                self.hover = Some((id, now));
                self.repaint = true;
            }
            (None, Some(_)) => {
                self.hover = None;
                self.repaint = true;
            }
            (None, None) => {}
        }
    }

    /// Open the popup listing every visible tab, or close it when open.
    pub fn show_more_popup(&mut self) -> bool {
        if self.more_popup.take().is_some() {
            self.repaint = true;
            return true;
        }
        let Some(layout) = self.last_layout.as_ref() else {
            return false;
        };
        if self.visible.is_empty() {
            return false;
        }
        let anchor = layout.more.unwrap_or(layout.strip);
        let items = self
            .visible
            .iter()
            .filter_map(|id| self.entries.get(id).map(|e| (*id, e.plain_text())))
            .collect();
        self.more_popup = Some(MorePopup::new(items, self.selected(), anchor));
        self.repaint = true;
        true
    }

    pub fn more_popup(&self) -> Option<&MorePopup> {
        self.more_popup.as_ref()
    }

    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.repaint = true;
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether the container sits in a displayed window. Detachment is only
    /// deferred while showing.
    pub fn set_showing(&mut self, showing: bool) {
        self.showing = showing;
    }

    pub fn is_showing(&self) -> bool {
        self.showing
    }

    // ---------------------------------------------------------------------
    // Presentation

    pub fn presentation(&self) -> &TabsPresentation {
        &self.presentation
    }

    pub fn set_action_service(&mut self, service: Option<Box<dyn ActionService>>) -> &mut Self {
        self.action_service = service;
        self.rebuild_toolbars();
        self
    }

    pub fn set_single_row(&mut self, single_row: bool) -> &mut Self {
        self.presentation.layout_mode = if single_row {
            LayoutMode::SingleRow
        } else {
            LayoutMode::Table
        };
        self.relayout();
        self
    }

    pub fn is_single_row(&self) -> bool {
        self.presentation.effective_layout_mode() == LayoutMode::SingleRow
    }

    pub fn set_tabs_position(&mut self, position: TabsPosition) -> &mut Self {
        self.presentation.position = position;
        self.relayout();
        self
    }

    pub fn set_side_component_vertical(&mut self, vertical: bool) -> &mut Self {
        if self.presentation.side_component_vertical != vertical {
            self.presentation.side_component_vertical = vertical;
            self.rebuild_toolbars();
        }
        self
    }

    pub fn set_border(&mut self, border: Insets) -> &mut Self {
        self.presentation.border = border;
        self.relayout();
        self
    }

    pub fn set_inner_insets(&mut self, inner: Insets) -> &mut Self {
        self.presentation.inner_insets = inner;
        self.relayout();
        self
    }

    pub fn set_stealth_tab_mode(&mut self, stealth: bool) -> &mut Self {
        self.presentation.stealth_tab_mode = stealth;
        self.relayout();
        self
    }

    pub fn is_stealth_mode_effective(&self) -> bool {
        self.presentation.is_stealth_effective(self.tab_count())
    }

    pub fn set_paint_focus(&mut self, paint_focus: bool) -> &mut Self {
        self.presentation.paint_focus = paint_focus;
        self.repaint = true;
        self
    }

    pub fn set_ghosts_always_visible(&mut self, visible: bool) -> &mut Self {
        self.presentation.ghosts_always_visible = visible;
        self.relayout();
        self
    }

    pub fn set_hide_tabs(&mut self, hide: bool) -> &mut Self {
        if self.presentation.hide_tabs != hide {
            self.presentation.hide_tabs = hide;
            self.relayout();
        }
        self
    }

    pub fn set_draw_border_if_tabs_hidden(&mut self, draw: bool) -> &mut Self {
        self.presentation.draw_border_if_tabs_hidden = draw;
        self.repaint = true;
        self
    }

    pub fn set_request_focus_on_last_focused(&mut self, enabled: bool) -> &mut Self {
        self.presentation.request_focus_on_last_focused = enabled;
        self
    }

    pub fn set_tab_label_actions_auto_hide(&mut self, auto_hide: bool) -> &mut Self {
        self.presentation.tab_label_actions_auto_hide = auto_hide;
        self.repaint = true;
        self
    }

    pub fn set_tab_actions_mouse_deadzone(&mut self, deadzone: DeadzoneLength) -> &mut Self {
        self.presentation.tab_actions_deadzone = deadzone;
        self
    }

    pub fn set_active_tab_fill_in(&mut self, color: Option<Color>) -> &mut Self {
        self.presentation.active_tab_fill_in = color;
        self.repaint = true;
        self
    }

    pub fn set_popup_group<T: Into<String>>(
        &mut self,
        group: ActionGroup,
        place: T,
        add_navigation_group: bool,
    ) -> &mut Self {
        self.presentation.popup_group = Some(PopupGroup::new(group, place, add_navigation_group));
        self
    }
}
