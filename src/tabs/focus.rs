use super::callback::Callback;
use super::entry::ComponentId;

/// Host focus manager contract.
///
/// Focus transfer may be queued or animated by the host, so requests return a
/// [`Callback`] and settlement is observed by polling [`is_settled`]. The
/// container polls from [`crate::tabs::TabContainer::pump`], which hosts call
/// on every event-loop tick.
///
/// [`is_settled`]: FocusManager::is_settled
pub trait FocusManager {
    /// Ask the host to move keyboard focus to `target`.
    fn request_focus(&mut self, target: ComponentId) -> Callback;

    /// True when no focus transfer is in flight.
    fn is_settled(&self) -> bool;

    /// Component currently owning keyboard focus, if the host knows it.
    fn focus_owner(&self) -> Option<ComponentId>;

    /// Policy override for the component that should take focus in place of
    /// `component` (for example a remembered child).
    fn focus_target_for(&self, _component: ComponentId) -> Option<ComponentId> {
        None
    }

    /// Whether `component` lives inside `ancestor`. Hosts without a
    /// component hierarchy only know identity.
    fn is_descendant(&self, component: ComponentId, ancestor: ComponentId) -> bool {
        component == ancestor
    }
}

/// Focus manager for hosts that transfer focus synchronously.
#[derive(Debug, Default, Clone)]
pub struct ImmediateFocus {
    owner: Option<ComponentId>,
}

impl ImmediateFocus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FocusManager for ImmediateFocus {
    fn request_focus(&mut self, target: ComponentId) -> Callback {
        self.owner = Some(target);
        Callback::done()
    }

    fn is_settled(&self) -> bool {
        true
    }

    fn focus_owner(&self) -> Option<ComponentId> {
        self.owner
    }
}
