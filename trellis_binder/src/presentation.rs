// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation signal: the channel a view-model uses to announce its state.
//!
//! ## Delivery
//!
//! - Emission is synchronous: every listener has run when [`Presentation::emit`] returns.
//! - Listeners run in subscription order.
//! - A listener may subscribe, unsubscribe, or emit again. A nested emission is
//!   queued and delivered to every listener after the current one completes,
//!   so states always arrive in the order they were emitted.
//! - Changes to the listener list take effect from the next delivered state.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use trellis_binder::presentation::Presentation;
//! use trellis_binder::types::PresentationState;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let p = Presentation::new();
//! let sink = Rc::clone(&seen);
//! p.subscribe(move |s| sink.borrow_mut().push(s));
//! p.show();
//! p.hide();
//! assert_eq!(*seen.borrow(), vec![PresentationState::Show, PresentationState::Hide]);
//! assert_eq!(p.current(), Some(PresentationState::Hide));
//! ```

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::types::{BinderError, PresentationState, SubscriptionId, ViewModelId};

type Listener = Rc<dyn Fn(PresentationState)>;

/// State-change channel owned by a view-model.
///
/// Each `Presentation` also carries the [`ViewModelId`] that binders use as
/// the view-model's identity.
pub struct Presentation {
    id: ViewModelId,
    current: Cell<Option<PresentationState>>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_subscription: Cell<u64>,
    pending: RefCell<VecDeque<PresentationState>>,
    delivering: Cell<bool>,
}

impl core::fmt::Debug for Presentation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Presentation")
            .field("id", &self.id)
            .field("current", &self.current.get())
            .field("listeners", &self.listeners.borrow().len())
            .field("pending", &self.pending.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new()
    }
}

impl Presentation {
    /// Create a channel with a fresh identity and no listeners.
    pub fn new() -> Self {
        Self {
            id: ViewModelId::next(),
            current: Cell::new(None),
            listeners: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
            pending: RefCell::new(VecDeque::new()),
            delivering: Cell::new(false),
        }
    }

    /// Identity of the owning view-model.
    pub fn id(&self) -> ViewModelId {
        self.id
    }

    /// The last delivered state, or `None` before the first emission.
    pub fn current(&self) -> Option<PresentationState> {
        self.current.get()
    }

    /// Register `listener`; it receives every later emission.
    pub fn subscribe<F: Fn(PresentationState) + 'static>(&self, listener: F) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    /// Number of subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver `state` to every listener.
    ///
    /// Called from inside a listener, `state` is queued behind the state being
    /// delivered and sent once every listener has seen that one.
    pub fn emit(&self, state: PresentationState) {
        self.pending.borrow_mut().push_back(state);
        if self.delivering.replace(true) {
            return;
        }
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(state) = next else { break };
            self.current.set(Some(state));
            // Snapshot so listeners can touch the list while being called.
            let listeners: Vec<Listener> = self
                .listeners
                .borrow()
                .iter()
                .map(|(_, l)| Rc::clone(l))
                .collect();
            for listener in listeners {
                listener(state);
            }
        }
        self.delivering.set(false);
    }

    /// Decode and emit a raw state value.
    ///
    /// Values outside [`PresentationState`] are a contract violation: nothing
    /// is emitted and [`BinderError::UnknownState`] is returned.
    pub fn emit_raw(&self, raw: u8) -> Result<(), BinderError> {
        let state = PresentationState::try_from(raw)?;
        self.emit(state);
        Ok(())
    }

    /// Emit [`PresentationState::Show`].
    pub fn show(&self) {
        self.emit(PresentationState::Show);
    }

    /// Emit [`PresentationState::Hide`].
    pub fn hide(&self) {
        self.emit(PresentationState::Hide);
    }

    /// Emit [`PresentationState::Destroy`].
    pub fn destroy(&self) {
        self.emit(PresentationState::Destroy);
    }
}
