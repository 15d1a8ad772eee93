use thiserror::Error;

use crate::tabs::TabId;

/// Contract violations reported by [`crate::tabs::TabContainer`].
///
/// These indicate a caller logic error. Lookups that simply miss return
/// `None` instead, and asynchronous failures surface through a rejected
/// [`crate::tabs::Callback`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TabsError {
    #[error("tab {0} is not visible and cannot take over the selection")]
    SuccessorNotVisible(TabId),
    #[error("tab {0} does not belong to this container")]
    UnknownTab(TabId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::TabEntry;

    #[test]
    fn messages_name_the_tab() {
        let id = TabEntry::new("x").id();
        let msg = TabsError::SuccessorNotVisible(id).to_string();
        assert!(msg.contains(&id.to_string()));
        assert!(msg.contains("not visible"));
    }
}
