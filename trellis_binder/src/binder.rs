// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle binder: turn presentation states into view actions.
//!
//! ## Overview
//!
//! The binder keeps one view per view-model and drives it from the
//! view-model's [`Presentation`] signal:
//!
//! - `Show` loads the view through the [`ViewLocator`] on first use, then shows it.
//! - `Hide` hides the mapped view.
//! - `Destroy` tears the mapped view down. The mapping stays, flagged
//!   [`BindingFlags::DESTROYED`], and a later `Show` loads a fresh view.
//!
//! `Hide` or `Destroy` without a live view is misuse, not failure: the binder
//! logs a warning and does nothing.
//!
//! ## Re-entrancy
//!
//! A view callback may emit on its view-model's presentation, or call
//! [`LifecycleBinder::dispatch`], while the binder is applying a state. The
//! nested state is queued and applied once the current one is done, in the
//! order it was requested. Other binder methods (`rebind`, `with_view`,
//! `forget`) must not be called from view callbacks.
//! [`ViewLocator::load`] runs without the map borrowed and may query the binder.

use alloc::collections::{BTreeMap, VecDeque};
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};

use crate::presentation::Presentation;
use crate::types::{BindingFlags, PresentationState, SubscriptionId, ViewModelId};

/// A data holder that drives a view through its presentation signal.
pub trait ViewModel: 'static {
    /// Path handed to [`ViewLocator::load`] when the view is first shown.
    fn view_path(&self) -> &str;

    /// The view-model's presentation channel; also its identity.
    fn presentation(&self) -> &Presentation;
}

/// A view driven by a [`LifecycleBinder`].
pub trait View<VM: ?Sized> {
    /// Make the view visible.
    fn show(&mut self);

    /// Hide the view, keeping its resources.
    fn hide(&mut self);

    /// Tear down the underlying view resource.
    fn destroy(&mut self);

    /// Wire the view to its view-model.
    fn set_view_model(&mut self, view_model: &Rc<VM>);
}

/// Produces views for view-models. How views are loaded is up to the implementor.
pub trait ViewLocator {
    /// View-model type this locator serves.
    type ViewModel: ViewModel;
    /// View type produced.
    type View: View<Self::ViewModel>;

    /// Create the view found at `path` for `owner`.
    ///
    /// The returned view must be ready to receive `show`.
    fn load(&mut self, path: &str, owner: &Rc<Self::ViewModel>) -> Self::View;
}

struct Slot<V> {
    view: V,
    flags: BindingFlags,
}

struct Inner<L: ViewLocator> {
    locator: RefCell<L>,
    slots: RefCell<BTreeMap<ViewModelId, Slot<L::View>>>,
    pending: RefCell<VecDeque<(Rc<L::ViewModel>, PresentationState)>>,
    dispatching: Cell<bool>,
}

/// Maps view-models to lazily created views and applies their presentation states.
///
/// The binder is a cheap handle: clones share the same map and locator, which
/// lets one instance be registered as a service (see [`Self::SERVICE_NAME`])
/// and retrieved elsewhere.
pub struct LifecycleBinder<L: ViewLocator> {
    inner: Rc<Inner<L>>,
}

impl<L: ViewLocator> Clone for LifecycleBinder<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<L: ViewLocator> core::fmt::Debug for LifecycleBinder<L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let flags: alloc::vec::Vec<(ViewModelId, BindingFlags)> = self
            .inner
            .slots
            .borrow()
            .iter()
            .map(|(id, slot)| (*id, slot.flags))
            .collect();
        f.debug_struct("LifecycleBinder")
            .field("bindings", &flags)
            .finish_non_exhaustive()
    }
}

impl<L: ViewLocator + 'static> LifecycleBinder<L> {
    /// Well-known service name for registering a binder in a context.
    pub const SERVICE_NAME: &'static str = "SERVICE_VM_FACTORY";

    /// Create a binder that loads views through `locator`.
    pub fn new(locator: L) -> Self {
        Self {
            inner: Rc::new(Inner {
                locator: RefCell::new(locator),
                slots: RefCell::new(BTreeMap::new()),
                pending: RefCell::new(VecDeque::new()),
                dispatching: Cell::new(false),
            }),
        }
    }

    /// Replace the locator used for subsequent loads. Existing views are kept.
    pub fn set_view_locator(&self, locator: L) {
        *self.inner.locator.borrow_mut() = locator;
    }

    /// Subscribe to `view_model`'s presentation signal.
    ///
    /// The subscription holds weak references only: it goes quiet once either
    /// the binder or the view-model is dropped.
    pub fn bind(&self, view_model: &Rc<L::ViewModel>) -> SubscriptionId {
        let inner: Weak<Inner<L>> = Rc::downgrade(&self.inner);
        let owner: Weak<L::ViewModel> = Rc::downgrade(view_model);
        view_model.presentation().subscribe(move |state| {
            if let (Some(inner), Some(vm)) = (inner.upgrade(), owner.upgrade()) {
                Self { inner }.dispatch(&vm, state);
            }
        })
    }

    /// Stop listening to `view_model`. Its mapping, if any, is kept.
    pub fn unbind(&self, view_model: &Rc<L::ViewModel>, subscription: SubscriptionId) -> bool {
        view_model.presentation().unsubscribe(subscription)
    }

    /// Apply `state` to `view_model`'s view.
    ///
    /// This is what a [`bind`](Self::bind) subscription runs for each emission.
    /// A call made while another state is being applied is queued behind it.
    pub fn dispatch(&self, view_model: &Rc<L::ViewModel>, state: PresentationState) {
        self.inner
            .pending
            .borrow_mut()
            .push_back((Rc::clone(view_model), state));
        if self.inner.dispatching.replace(true) {
            return;
        }
        loop {
            let next = self.inner.pending.borrow_mut().pop_front();
            let Some((vm, state)) = next else { break };
            match state {
                PresentationState::Show => self.show(&vm),
                PresentationState::Hide => self.hide(&vm),
                PresentationState::Destroy => self.destroy(&vm),
            }
        }
        self.inner.dispatching.set(false);
    }

    fn show(&self, vm: &Rc<L::ViewModel>) {
        let id = vm.presentation().id();
        let needs_view = self
            .inner
            .slots
            .borrow()
            .get(&id)
            .is_none_or(|slot| slot.flags.contains(BindingFlags::DESTROYED));
        if needs_view {
            let view = self.inner.locator.borrow_mut().load(vm.view_path(), vm);
            log::debug!("loaded view `{}`", vm.view_path());
            self.inner.slots.borrow_mut().insert(
                id,
                Slot {
                    view,
                    flags: BindingFlags::LOADED,
                },
            );
        }
        if let Some(slot) = self.inner.slots.borrow_mut().get_mut(&id) {
            slot.view.show();
            slot.flags.insert(BindingFlags::VISIBLE);
        }
    }

    fn hide(&self, vm: &Rc<L::ViewModel>) {
        let mut slots = self.inner.slots.borrow_mut();
        match slots.get_mut(&vm.presentation().id()) {
            Some(slot) if !slot.flags.contains(BindingFlags::DESTROYED) => {
                slot.view.hide();
                slot.flags.remove(BindingFlags::VISIBLE);
            }
            Some(_) => log::warn!("hide: `{}` view was already destroyed", vm.view_path()),
            None => log::warn!("hide: `{}` view was never shown", vm.view_path()),
        }
    }

    fn destroy(&self, vm: &Rc<L::ViewModel>) {
        let mut slots = self.inner.slots.borrow_mut();
        match slots.get_mut(&vm.presentation().id()) {
            Some(slot) if !slot.flags.contains(BindingFlags::DESTROYED) => {
                slot.view.destroy();
                slot.flags.remove(BindingFlags::VISIBLE);
                slot.flags.insert(BindingFlags::DESTROYED);
                log::debug!("destroyed view `{}`", vm.view_path());
            }
            Some(_) => log::warn!("destroy: `{}` view was already destroyed", vm.view_path()),
            None => log::warn!("destroy: `{}` view was never shown", vm.view_path()),
        }
    }

    /// Map `view_model` to `view`, returning the view it replaces.
    ///
    /// - With an existing mapping, the view is swapped in place and is **not**
    ///   told about its view-model; the binding is flagged [`BindingFlags::REBOUND`].
    /// - Without one, the mapping is created and the view is wired through
    ///   [`View::set_view_model`].
    pub fn rebind(&self, view_model: &Rc<L::ViewModel>, view: L::View) -> Option<L::View> {
        let id = view_model.presentation().id();
        if let Some(slot) = self.inner.slots.borrow_mut().get_mut(&id) {
            slot.flags = BindingFlags::LOADED | BindingFlags::REBOUND;
            return Some(core::mem::replace(&mut slot.view, view));
        }
        let mut view = view;
        view.set_view_model(view_model);
        self.inner.slots.borrow_mut().insert(
            id,
            Slot {
                view,
                flags: BindingFlags::LOADED,
            },
        );
        None
    }

    /// The live view for `view_model`, if one is mapped and not destroyed.
    pub fn get_view(&self, view_model: &Rc<L::ViewModel>) -> Option<L::View>
    where
        L::View: Clone,
    {
        self.with_view(view_model, |view| view.clone())
    }

    /// Run `f` on the live view for `view_model`, if any.
    pub fn with_view<R>(
        &self,
        view_model: &Rc<L::ViewModel>,
        f: impl FnOnce(&mut L::View) -> R,
    ) -> Option<R> {
        let mut slots = self.inner.slots.borrow_mut();
        let slot = slots.get_mut(&view_model.presentation().id())?;
        if slot.flags.contains(BindingFlags::DESTROYED) {
            return None;
        }
        Some(f(&mut slot.view))
    }

    /// Binding state for `view_model`, or `None` if it was never mapped.
    pub fn binding_flags(&self, view_model: &Rc<L::ViewModel>) -> Option<BindingFlags> {
        self.inner
            .slots
            .borrow()
            .get(&view_model.presentation().id())
            .map(|slot| slot.flags)
    }

    /// Drop the mapping for `view_model`, returning its view.
    ///
    /// The view is returned as is; callers decide whether to destroy it.
    pub fn forget(&self, view_model: &Rc<L::ViewModel>) -> Option<L::View> {
        self.inner
            .slots
            .borrow_mut()
            .remove(&view_model.presentation().id())
            .map(|slot| slot.view)
    }

    /// Number of mapped view-models, destroyed ones included.
    pub fn len(&self) -> usize {
        self.inner.slots.borrow().len()
    }

    /// Returns `true` if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.inner.slots.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::Cell;

    type Journal = Rc<RefCell<Vec<String>>>;

    struct Panel {
        path: &'static str,
        presentation: Presentation,
    }

    impl Panel {
        fn new(path: &'static str) -> Rc<Self> {
            Rc::new(Self {
                path,
                presentation: Presentation::new(),
            })
        }
    }

    impl ViewModel for Panel {
        fn view_path(&self) -> &str {
            self.path
        }
        fn presentation(&self) -> &Presentation {
            &self.presentation
        }
    }

    #[derive(Clone)]
    struct PanelView {
        serial: u32,
        journal: Journal,
    }

    impl PanelView {
        fn note(&self, what: &str) {
            self.journal
                .borrow_mut()
                .push(format!("{what} #{}", self.serial));
        }
    }

    impl View<Panel> for PanelView {
        fn show(&mut self) {
            self.note("show");
        }
        fn hide(&mut self) {
            self.note("hide");
        }
        fn destroy(&mut self) {
            self.note("destroy");
        }
        fn set_view_model(&mut self, view_model: &Rc<Panel>) {
            let what = format!("wire {}", view_model.view_path());
            self.note(&what);
        }
    }

    struct Locator {
        journal: Journal,
        serial: Rc<Cell<u32>>,
        tag: &'static str,
    }

    impl ViewLocator for Locator {
        type ViewModel = Panel;
        type View = PanelView;

        fn load(&mut self, path: &str, owner: &Rc<Panel>) -> PanelView {
            assert_eq!(path, owner.view_path(), "locator receives the owner's path");
            self.serial.set(self.serial.get() + 1);
            self.journal
                .borrow_mut()
                .push(format!("{} {path}", self.tag));
            PanelView {
                serial: self.serial.get(),
                journal: Rc::clone(&self.journal),
            }
        }
    }

    fn setup() -> (LifecycleBinder<Locator>, Journal) {
        let journal: Journal = Rc::default();
        let binder = LifecycleBinder::new(Locator {
            journal: Rc::clone(&journal),
            serial: Rc::default(),
            tag: "load",
        });
        (binder, journal)
    }

    fn entries(journal: &Journal) -> Vec<String> {
        journal.borrow().clone()
    }

    #[test]
    fn show_then_hide_reuses_the_loaded_view() {
        let (binder, journal) = setup();
        let vm = Panel::new("panel/settings");
        binder.bind(&vm);
        vm.presentation().show();
        vm.presentation().hide();
        assert_eq!(
            entries(&journal),
            vec!["load panel/settings", "show #1", "hide #1"]
        );
        let flags = binder.binding_flags(&vm).unwrap();
        assert!(flags.contains(BindingFlags::LOADED));
        assert!(!flags.contains(BindingFlags::VISIBLE));
    }

    #[test]
    fn repeated_show_loads_once() {
        let (binder, journal) = setup();
        let vm = Panel::new("hud");
        binder.bind(&vm);
        vm.presentation().show();
        vm.presentation().show();
        assert_eq!(entries(&journal), vec!["load hud", "show #1", "show #1"]);
        assert_eq!(binder.len(), 1);
        assert_eq!(binder.get_view(&vm).map(|v| v.serial), Some(1));
    }

    #[test]
    fn hide_or_destroy_before_show_is_a_no_op() {
        let (binder, journal) = setup();
        let vm = Panel::new("inventory");
        binder.bind(&vm);
        vm.presentation().hide();
        vm.presentation().destroy();
        assert!(entries(&journal).is_empty());
        assert!(binder.is_empty(), "misuse must not create a mapping");
        assert!(binder.get_view(&vm).is_none());
        assert!(binder.binding_flags(&vm).is_none());
    }

    #[test]
    fn destroy_tears_down_and_next_show_reloads() {
        let (binder, journal) = setup();
        let vm = Panel::new("dialog");
        binder.bind(&vm);
        vm.presentation().show();
        vm.presentation().destroy();
        assert!(binder.get_view(&vm).is_none());
        assert_eq!(
            binder.binding_flags(&vm),
            Some(BindingFlags::LOADED | BindingFlags::DESTROYED)
        );

        // Further teardown requests on a dead view are ignored.
        vm.presentation().hide();
        vm.presentation().destroy();

        vm.presentation().show();
        assert_eq!(
            entries(&journal),
            vec![
                "load dialog",
                "show #1",
                "destroy #1",
                "load dialog",
                "show #2"
            ]
        );
        assert_eq!(binder.len(), 1);
        assert_eq!(binder.get_view(&vm).map(|v| v.serial), Some(2));
    }

    #[test]
    fn rebind_wires_only_first_time_views() {
        let (binder, journal) = setup();
        let vm = Panel::new("shop");
        let first = PanelView {
            serial: 10,
            journal: Rc::clone(&journal),
        };
        assert!(binder.rebind(&vm, first).is_none());
        assert_eq!(entries(&journal), vec!["wire shop #10"]);

        let second = PanelView {
            serial: 11,
            journal: Rc::clone(&journal),
        };
        let replaced = binder.rebind(&vm, second).map(|v| v.serial);
        assert_eq!(replaced, Some(10));
        assert_eq!(entries(&journal).len(), 1, "swap must not re-wire");
        assert!(
            binder
                .binding_flags(&vm)
                .unwrap()
                .contains(BindingFlags::REBOUND)
        );

        binder.bind(&vm);
        vm.presentation().show();
        assert_eq!(entries(&journal).last().map(String::as_str), Some("show #11"));
    }

    #[test]
    fn bindings_are_per_view_model() {
        let (binder, journal) = setup();
        let a = Panel::new("a");
        let b = Panel::new("b");
        binder.bind(&a);
        binder.bind(&b);
        a.presentation().show();
        b.presentation().show();
        a.presentation().hide();
        assert_eq!(
            entries(&journal),
            vec!["load a", "show #1", "load b", "show #2", "hide #1"]
        );
        assert_eq!(binder.len(), 2);
    }

    #[test]
    fn raw_unknown_state_is_rejected_without_side_effects() {
        let (binder, journal) = setup();
        let vm = Panel::new("menu");
        binder.bind(&vm);
        assert!(vm.presentation().emit_raw(42).is_err());
        assert!(entries(&journal).is_empty());
        assert!(vm.presentation().emit_raw(0).is_ok());
        assert_eq!(entries(&journal), vec!["load menu", "show #1"]);
    }

    #[test]
    fn unbind_and_drop_silence_dispatch() {
        let (binder, journal) = setup();
        let vm = Panel::new("toast");
        let sub = binder.bind(&vm);
        assert!(binder.unbind(&vm, sub));
        vm.presentation().show();
        assert!(entries(&journal).is_empty());

        binder.bind(&vm);
        drop(binder);
        vm.presentation().show();
        assert!(entries(&journal).is_empty(), "dropped binder must not dispatch");
    }

    #[test]
    fn replaced_locator_serves_later_loads() {
        let (binder, journal) = setup();
        let a = Panel::new("a");
        let b = Panel::new("b");
        binder.dispatch(&a, PresentationState::Show);
        binder.set_view_locator(Locator {
            journal: Rc::clone(&journal),
            serial: Rc::new(Cell::new(100)),
            tag: "fetch",
        });
        binder.dispatch(&a, PresentationState::Show);
        binder.dispatch(&b, PresentationState::Show);
        assert_eq!(
            entries(&journal),
            vec!["load a", "show #1", "show #1", "fetch b", "show #101"]
        );
    }

    struct Toast {
        presentation: Presentation,
    }

    impl ViewModel for Toast {
        fn view_path(&self) -> &str {
            "toast"
        }
        fn presentation(&self) -> &Presentation {
            &self.presentation
        }
    }

    /// Closes itself as soon as it is shown.
    struct ToastView {
        owner: Weak<Toast>,
        journal: Journal,
    }

    impl View<Toast> for ToastView {
        fn show(&mut self) {
            self.journal.borrow_mut().push("show".to_string());
            if let Some(owner) = self.owner.upgrade() {
                owner.presentation().hide();
            }
        }
        fn hide(&mut self) {
            self.journal.borrow_mut().push("hide".to_string());
            if let Some(owner) = self.owner.upgrade() {
                owner.presentation().destroy();
            }
        }
        fn destroy(&mut self) {
            self.journal.borrow_mut().push("destroy".to_string());
        }
        fn set_view_model(&mut self, _: &Rc<Toast>) {}
    }

    struct ToastLocator(Journal);

    impl ViewLocator for ToastLocator {
        type ViewModel = Toast;
        type View = ToastView;

        fn load(&mut self, _: &str, owner: &Rc<Toast>) -> ToastView {
            ToastView {
                owner: Rc::downgrade(owner),
                journal: Rc::clone(&self.0),
            }
        }
    }

    #[test]
    fn view_may_emit_on_its_own_view_model() {
        let journal: Journal = Rc::default();
        let binder = LifecycleBinder::new(ToastLocator(Rc::clone(&journal)));
        let vm = Rc::new(Toast {
            presentation: Presentation::new(),
        });
        binder.bind(&vm);

        vm.presentation().show();
        assert_eq!(entries(&journal), vec!["show", "hide", "destroy"]);
        assert_eq!(
            vm.presentation().current(),
            Some(PresentationState::Destroy)
        );
        assert_eq!(
            binder.binding_flags(&vm),
            Some(BindingFlags::LOADED | BindingFlags::DESTROYED)
        );

        // Applying a state directly queues the view's own emissions the same way.
        journal.borrow_mut().clear();
        binder.dispatch(&vm, PresentationState::Show);
        assert_eq!(entries(&journal), vec!["show", "hide", "destroy"]);
        assert!(binder.with_view(&vm, |_| ()).is_none());
    }

    #[test]
    fn forget_returns_view_and_clears_mapping() {
        let (binder, _journal) = setup();
        let vm = Panel::new("x");
        binder.dispatch(&vm, PresentationState::Show);
        let view = binder.forget(&vm).unwrap();
        assert_eq!(view.serial, 1);
        assert!(binder.is_empty());
        assert_eq!(binder.with_view(&vm, |v| v.serial.to_string()), None);
    }
}
