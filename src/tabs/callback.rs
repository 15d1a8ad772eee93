//! Completion handles for operations that finish after focus settles.
//!
//! Everything runs on the UI thread, so a handle is a shared cell rather
//! than a future. Producers resolve it once; consumers either poll it or
//! forward its outcome into another handle.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallbackState {
    #[default]
    Pending,
    Done,
    Rejected,
}

#[derive(Default)]
struct Inner {
    state: CallbackState,
    followers: Vec<Callback>,
}

/// Shared, single-resolution completion handle.
#[derive(Clone, Default)]
pub struct Callback {
    inner: Rc<RefCell<Inner>>,
}

impl Callback {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that is already resolved successfully.
    pub fn done() -> Self {
        let cb = Self::new();
        cb.set_done();
        cb
    }

    pub fn rejected() -> Self {
        let cb = Self::new();
        cb.set_rejected();
        cb
    }

    pub fn state(&self) -> CallbackState {
        self.inner.borrow().state
    }

    pub fn is_done(&self) -> bool {
        self.state() == CallbackState::Done
    }

    pub fn is_rejected(&self) -> bool {
        self.state() == CallbackState::Rejected
    }

    /// True once the handle resolved either way.
    pub fn is_processed(&self) -> bool {
        self.state() != CallbackState::Pending
    }

    pub fn set_done(&self) {
        self.resolve(CallbackState::Done);
    }

    pub fn set_rejected(&self) {
        self.resolve(CallbackState::Rejected);
    }

    /// Resolve `other` with this handle's outcome, now or when it arrives.
    pub fn forward_to(&self, other: &Callback) {
        let state = {
            let mut inner = self.inner.borrow_mut();
            if inner.state == CallbackState::Pending {
                inner.followers.push(other.clone());
                return;
            }
            inner.state
        };
        other.resolve(state);
    }

    fn resolve(&self, state: CallbackState) {
        let followers = {
            let mut inner = self.inner.borrow_mut();
            if inner.state != CallbackState::Pending {
                return;
            }
            inner.state = state;
            std::mem::take(&mut inner.followers)
        };
        for follower in followers {
            follower.resolve(state);
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback").field(&self.state()).finish()
    }
}
