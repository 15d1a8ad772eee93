//! Selection state and the deferred-detachment protocol.
//!
//! A component must not be detached while focus may still be travelling
//! away from it. Detachment requests are therefore parked in a deferred set
//! and swept once the host focus manager reports settlement. Every request
//! bumps a counter; when several are in flight only the newest one sweeps,
//! the others just resolve their handles.

use std::collections::BTreeSet;

use super::callback::Callback;
use super::entry::{ComponentId, TabId};
use super::focus::FocusManager;

enum Continuation {
    /// Sweep the deferred set once focus settles, if still the newest request.
    RemoveDeferred { request: u64, done: Callback },
    /// Waits for a focus request, then schedules a sweep into `result`.
    AfterFocus { focus: Callback, result: Callback },
    /// Waits for a selection change, then schedules a sweep into `result`.
    AfterSelect { select: Callback, result: Callback },
}

pub struct SelectionController {
    selected: Option<TabId>,
    focus: Box<dyn FocusManager>,
    attached: BTreeSet<ComponentId>,
    deferred: BTreeSet<ComponentId>,
    remove_request: u64,
    pending: Vec<Continuation>,
    sweeps: Vec<Vec<ComponentId>>,
}

impl SelectionController {
    pub fn new(focus: Box<dyn FocusManager>) -> Self {
        Self {
            selected: None,
            focus,
            attached: BTreeSet::new(),
            deferred: BTreeSet::new(),
            remove_request: 0,
            pending: Vec::new(),
            sweeps: Vec::new(),
        }
    }

    /// The stored selection, which may be stale until resolved.
    pub fn raw(&self) -> Option<TabId> {
        self.selected
    }

    pub fn set_raw(&mut self, selected: Option<TabId>) {
        self.selected = selected;
    }

    /// The effective selection: the stored one while it is visible, else the
    /// first visible entry.
    pub fn resolve(&self, visible: &[TabId]) -> Option<TabId> {
        match self.selected {
            Some(id) if visible.contains(&id) => Some(id),
            _ => visible.first().copied(),
        }
    }

    /// Drop a stored selection that fell out of the visible sequence.
    pub fn normalize(&mut self, visible: &[TabId]) {
        self.selected = self.resolve(visible);
    }

    /// Selection to fall back to when `id` leaves the visible sequence:
    /// the predecessor, else the successor. Only applies to the selected tab.
    pub fn successor_on_remove_of(&self, id: TabId, visible: &[TabId]) -> Option<TabId> {
        if self.resolve(visible) != Some(id) || visible.len() == 1 {
            return None;
        }
        let index = visible.iter().position(|v| *v == id)?;
        if index > 0 {
            return Some(visible[index - 1]);
        }
        visible.get(index + 1).copied()
    }

    pub fn focus(&self) -> &dyn FocusManager {
        self.focus.as_ref()
    }

    pub fn focus_mut(&mut self) -> &mut dyn FocusManager {
        self.focus.as_mut()
    }

    pub fn is_attached(&self, component: ComponentId) -> bool {
        self.attached.contains(&component)
    }

    pub fn attached(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.attached.iter().copied()
    }

    pub fn deferred(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.deferred.iter().copied()
    }

    /// Parent `component`, cancelling any pending deferred detachment.
    /// Returns true when it was not attached before.
    pub fn attach(&mut self, component: ComponentId) -> bool {
        self.deferred.remove(&component);
        self.attached.insert(component)
    }

    /// Detach right away. Returns true when it was attached.
    pub fn detach_now(&mut self, component: ComponentId) -> bool {
        self.deferred.remove(&component);
        self.attached.remove(&component)
    }

    pub fn queue_for_remove(&mut self, component: ComponentId) {
        self.deferred.insert(component);
    }

    /// Cancel a pending detachment without touching parenting.
    pub fn unqueue(&mut self, component: ComponentId) -> bool {
        self.deferred.remove(&component)
    }

    /// Issue a new deferred-removal request.
    pub fn remove_deferred(&mut self) -> Callback {
        self.remove_request += 1;
        let done = Callback::new();
        self.pending.push(Continuation::RemoveDeferred {
            request: self.remove_request,
            done: done.clone(),
        });
        done
    }

    /// Detach every queued component still parented here, in one sweep.
    pub fn remove_deferred_now(&mut self) {
        let queued = std::mem::take(&mut self.deferred);
        let swept: Vec<ComponentId> = queued
            .into_iter()
            .filter(|c| self.attached.remove(c))
            .collect();
        if !swept.is_empty() {
            tracing::debug!(components = ?swept, "deferred detachment sweep");
            self.sweeps.push(swept);
        }
    }

    /// Request focus for `target`; the returned handle completes after focus
    /// was processed and the follow-up deferred removal ran.
    pub fn request_focus_then_sweep(&mut self, target: ComponentId) -> Callback {
        let focus = self.focus.request_focus(target);
        let result = Callback::new();
        self.pending.push(Continuation::AfterFocus {
            focus,
            result: result.clone(),
        });
        result
    }

    /// Chain a deferred removal after `select` resolves.
    pub fn sweep_after(&mut self, select: Callback) -> Callback {
        let result = Callback::new();
        self.pending.push(Continuation::AfterSelect {
            select,
            result: result.clone(),
        });
        result
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Run every continuation whose precondition holds, until none progress.
    pub fn pump(&mut self, disposed: bool) {
        loop {
            let mut progressed = false;
            for continuation in std::mem::take(&mut self.pending) {
                match continuation {
                    Continuation::RemoveDeferred { request, done } => {
                        if !self.focus.is_settled() {
                            self.pending
                                .push(Continuation::RemoveDeferred { request, done });
                            continue;
                        }
                        if request == self.remove_request {
                            self.remove_deferred_now();
                        }
                        done.set_done();
                        progressed = true;
                    }
                    Continuation::AfterFocus { focus, result } => {
                        if !focus.is_processed() {
                            self.pending.push(Continuation::AfterFocus { focus, result });
                            continue;
                        }
                        if disposed || focus.is_rejected() {
                            tracing::debug!(disposed, "focus transfer did not complete");
                            result.set_rejected();
                        } else {
                            self.remove_deferred().forward_to(&result);
                        }
                        progressed = true;
                    }
                    Continuation::AfterSelect { select, result } => {
                        if !select.is_processed() {
                            self.pending
                                .push(Continuation::AfterSelect { select, result });
                            continue;
                        }
                        self.remove_deferred().forward_to(&result);
                        progressed = true;
                    }
                }
            }
            if !progressed {
                break;
            }
        }
    }

    pub fn take_sweeps(&mut self) -> Vec<Vec<ComponentId>> {
        std::mem::take(&mut self.sweeps)
    }

    /// Forget all state. Pending handles still resolve on later pumps.
    pub fn clear(&mut self) {
        self.selected = None;
        self.attached.clear();
        self.deferred.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::TabEntry;
    use crate::tabs::focus::ImmediateFocus;
    use std::cell::Cell;
    use std::rc::Rc;

    struct GatedFocus {
        settled: Rc<Cell<bool>>,
    }

    impl FocusManager for GatedFocus {
        fn request_focus(&mut self, _target: ComponentId) -> Callback {
            Callback::done()
        }
        fn is_settled(&self) -> bool {
            self.settled.get()
        }
        fn focus_owner(&self) -> Option<ComponentId> {
            None
        }
    }

    fn ids(n: usize) -> Vec<TabId> {
        (0..n).map(|i| TabEntry::new(format!("t{i}")).id()).collect()
    }

    #[test]
    fn resolve_falls_back_to_first_visible() {
        let visible = ids(3);
        let mut sel = SelectionController::new(Box::new(ImmediateFocus::new()));
        assert_eq!(sel.resolve(&visible), Some(visible[0]));
        sel.set_raw(Some(visible[2]));
        assert_eq!(sel.resolve(&visible), Some(visible[2]));
        assert_eq!(sel.resolve(&visible[..2]), Some(visible[0]));
        assert_eq!(sel.resolve(&[]), None);
    }

    #[test]
    fn successor_prefers_predecessor() {
        let v = ids(3);
        let mut sel = SelectionController::new(Box::new(ImmediateFocus::new()));
        sel.set_raw(Some(v[1]));
        assert_eq!(sel.successor_on_remove_of(v[1], &v), Some(v[0]));
        sel.set_raw(Some(v[0]));
        assert_eq!(sel.successor_on_remove_of(v[0], &v), Some(v[1]));
        // not selected
        assert_eq!(sel.successor_on_remove_of(v[2], &v), None);
        // sole entry
        assert_eq!(sel.successor_on_remove_of(v[0], &v[..1]), None);
    }

    #[test]
    fn attach_cancels_pending_removal() {
        let mut sel = SelectionController::new(Box::new(ImmediateFocus::new()));
        let c = ComponentId(1);
        assert!(sel.attach(c));
        sel.queue_for_remove(c);
        assert!(!sel.attach(c));
        sel.remove_deferred_now();
        assert!(sel.is_attached(c));
        assert!(sel.take_sweeps().is_empty());
    }

    #[test]
    fn only_newest_request_sweeps() {
        let settled = Rc::new(Cell::new(false));
        let mut sel = SelectionController::new(Box::new(GatedFocus {
            settled: settled.clone(),
        }));
        sel.attach(ComponentId(1));
        sel.attach(ComponentId(2));
        sel.queue_for_remove(ComponentId(1));
        let first = sel.remove_deferred();
        sel.queue_for_remove(ComponentId(2));
        let second = sel.remove_deferred();

        sel.pump(false);
        assert!(!first.is_processed());
        assert!(sel.take_sweeps().is_empty());

        settled.set(true);
        sel.pump(false);
        assert!(first.is_done());
        assert!(second.is_done());
        assert_eq!(
            sel.take_sweeps(),
            vec![vec![ComponentId(1), ComponentId(2)]]
        );
        assert!(!sel.has_pending());
    }

    #[test]
    fn rejected_focus_rejects_result_without_sweep() {
        let mut sel = SelectionController::new(Box::new(ImmediateFocus::new()));
        sel.attach(ComponentId(1));
        sel.queue_for_remove(ComponentId(1));
        let select = Callback::rejected();
        let result = Callback::new();
        sel.pending.push(Continuation::AfterFocus {
            focus: select,
            result: result.clone(),
        });
        sel.pump(false);
        assert!(result.is_rejected());
        assert!(sel.is_attached(ComponentId(1)));
    }

    #[test]
    fn disposal_rejects_in_flight_focus() {
        let mut sel = SelectionController::new(Box::new(ImmediateFocus::new()));
        let result = sel.request_focus_then_sweep(ComponentId(4));
        sel.pump(true);
        assert!(result.is_rejected());
    }

    #[test]
    fn sweep_after_select_waits_for_selection() {
        let mut sel = SelectionController::new(Box::new(ImmediateFocus::new()));
        let select = Callback::new();
        let result = sel.sweep_after(select.clone());
        sel.pump(false);
        assert!(!result.is_processed());
        select.set_done();
        sel.pump(false);
        assert!(result.is_done());
    }
}
