// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: presentation states, binding flags, identities, and errors.

use core::sync::atomic::{AtomicUsize, Ordering};

/// Presentation state emitted by a view-model.
///
/// The set is closed; raw values outside it are rejected with
/// [`BinderError::UnknownState`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum PresentationState {
    /// Make the view visible, creating it on first use.
    Show = 0,
    /// Hide the view without tearing it down.
    Hide = 1,
    /// Tear the view down.
    Destroy = 2,
}

impl TryFrom<u8> for PresentationState {
    type Error = BinderError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Show),
            1 => Ok(Self::Hide),
            2 => Ok(Self::Destroy),
            other => Err(BinderError::UnknownState(other)),
        }
    }
}

impl From<PresentationState> for u8 {
    fn from(state: PresentationState) -> Self {
        state as Self
    }
}

/// Contract violations surfaced by the binder.
///
/// Absence (a missing view, a hide before any show) is not an error.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum BinderError {
    /// A raw presentation state outside [`PresentationState`].
    #[error("unknown presentation state `{0}`")]
    UnknownState(u8),
}

/// Identity of a view-model, allocated with its [`Presentation`](crate::presentation::Presentation).
///
/// Ids are process-unique and never reused, so a binding cannot alias a
/// view-model created after another was dropped. Allocation uses a
/// pointer-sized atomic counter, so the target must support atomic
/// read-modify-write on `usize`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ViewModelId(u64);

impl ViewModelId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed) as u64)
    }

    /// Raw id value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Handle returned by [`Presentation::subscribe`](crate::presentation::Presentation::subscribe).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

bitflags::bitflags! {
    /// State of one view-model to view binding.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct BindingFlags: u8 {
        /// A view is mapped (loaded by the locator or supplied by a rebind).
        const LOADED    = 0b0000_0001;
        /// The view's last instruction was `show`.
        const VISIBLE   = 0b0000_0010;
        /// The view was torn down; the next show loads a fresh one.
        const DESTROYED = 0b0000_0100;
        /// The view replaced an earlier one without being wired to the view-model.
        const REBOUND   = 0b0000_1000;
    }
}
