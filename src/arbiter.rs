//! Exclusive input ownership.
//!
//! At most one element holds the token at a time. The arbiter never hides
//! anything itself: `acquire` reports the displaced owner and the caller is
//! expected to hide it before the new owner becomes visible.

use crate::components::MenuId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    MenuBar,
    ContextMenu(MenuId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArbiterState {
    Idle,
    MenuBarOpen,
    ContextMenuOpen(MenuId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquire {
    /// The requester already held the token.
    AlreadyOwned,
    /// Token granted. `displaced` is whoever held it before.
    Granted { displaced: Option<Owner> },
}

#[derive(Debug, Default, Clone)]
pub struct InputArbiter {
    owner: Option<Owner>,
    transfers: u64,
}

impl InputArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self) -> Option<Owner> {
        self.owner
    }

    pub fn state(&self) -> ArbiterState {
        match self.owner {
            None => ArbiterState::Idle,
            Some(Owner::MenuBar) => ArbiterState::MenuBarOpen,
            Some(Owner::ContextMenu(id)) => ArbiterState::ContextMenuOpen(id),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.owner.is_none()
    }

    pub fn is_owned_by(&self, owner: Owner) -> bool {
        self.owner == Some(owner)
    }

    /// Number of times the token moved directly from one owner to another.
    pub fn transfers(&self) -> u64 {
        self.transfers
    }

    pub fn acquire(&mut self, owner: Owner) -> Acquire {
        if self.owner == Some(owner) {
            return Acquire::AlreadyOwned;
        }
        let displaced = self.owner.replace(owner);
        if displaced.is_some() {
            self.transfers = self.transfers.saturating_add(1);
        }
        tracing::debug!(?owner, ?displaced, "input ownership granted");
        Acquire::Granted { displaced }
    }

    /// Release the token if `owner` holds it. Returns whether anything changed.
    pub fn release(&mut self, owner: Owner) -> bool {
        if self.owner != Some(owner) {
            return false;
        }
        self.owner = None;
        tracing::debug!(?owner, "input ownership released");
        true
    }

    pub fn reset(&mut self) -> Option<Owner> {
        let previous = self.owner.take();
        if previous.is_some() {
            tracing::debug!(?previous, "input ownership reset");
        }
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_from_idle_has_no_displaced_owner() {
        let mut arbiter = InputArbiter::new();
        assert_eq!(arbiter.state(), ArbiterState::Idle);
        let got = arbiter.acquire(Owner::ContextMenu(MenuId(1)));
        assert_eq!(got, Acquire::Granted { displaced: None });
        assert_eq!(arbiter.state(), ArbiterState::ContextMenuOpen(MenuId(1)));
        assert_eq!(arbiter.transfers(), 0);
    }

    #[test]
    fn acquire_is_idempotent() {
        let mut arbiter = InputArbiter::new();
        arbiter.acquire(Owner::MenuBar);
        assert_eq!(arbiter.acquire(Owner::MenuBar), Acquire::AlreadyOwned);
        assert_eq!(arbiter.state(), ArbiterState::MenuBarOpen);
    }

    #[test]
    fn transfer_reports_previous_owner() {
        let mut arbiter = InputArbiter::new();
        arbiter.acquire(Owner::ContextMenu(MenuId(3)));
        let got = arbiter.acquire(Owner::MenuBar);
        assert_eq!(
            got,
            Acquire::Granted {
                displaced: Some(Owner::ContextMenu(MenuId(3)))
            }
        );
        assert_eq!(arbiter.transfers(), 1);
    }

    #[test]
    fn only_holder_can_release() {
        let mut arbiter = InputArbiter::new();
        arbiter.acquire(Owner::MenuBar);
        assert!(!arbiter.release(Owner::ContextMenu(MenuId(0))));
        assert!(arbiter.is_owned_by(Owner::MenuBar));
        assert!(arbiter.release(Owner::MenuBar));
        assert!(arbiter.is_idle());
        assert!(!arbiter.release(Owner::MenuBar));
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut arbiter = InputArbiter::new();
        assert_eq!(arbiter.reset(), None);
        arbiter.acquire(Owner::ContextMenu(MenuId(2)));
        assert_eq!(arbiter.reset(), Some(Owner::ContextMenu(MenuId(2))));
        assert_eq!(arbiter.state(), ArbiterState::Idle);
    }
}
