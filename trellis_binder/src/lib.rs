// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_binder --heading-base-level=0

//! Trellis Binder: view-model driven view lifecycles.
//!
//! ## Overview
//!
//! A view-model announces how it wants to be presented through a
//! [`Presentation`](crate::presentation::Presentation) signal emitting
//! [`PresentationState`](crate::types::PresentationState) values: `Show`, `Hide`, or `Destroy`.
//! A [`LifecycleBinder`](crate::binder::LifecycleBinder) listens to that signal and
//! turns each state into an imperative call on a view it creates lazily through a
//! [`ViewLocator`](crate::binder::ViewLocator).
//!
//! - At most one live view exists per view-model; repeated `Show` reuses it.
//! - `Hide` and `Destroy` before any `Show` are logged as warnings and ignored.
//! - Raw state values outside the enumeration are rejected with
//!   [`BinderError::UnknownState`](crate::types::BinderError::UnknownState).
//!
//! ## Layering
//!
//! The binder knows nothing about rendering or asset loading. Views and
//! locators are supplied by the toolkit; the binder only sequences their calls.
//! It is usually registered in a scope's service registry under
//! [`LifecycleBinder::SERVICE_NAME`](crate::binder::LifecycleBinder::SERVICE_NAME).
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use trellis_binder::binder::{LifecycleBinder, View, ViewLocator, ViewModel};
//! use trellis_binder::presentation::Presentation;
//!
//! struct Settings { presentation: Presentation }
//! impl ViewModel for Settings {
//!     fn view_path(&self) -> &str { "panel/settings" }
//!     fn presentation(&self) -> &Presentation { &self.presentation }
//! }
//!
//! #[derive(Clone, Default)]
//! struct Panel { visible: bool }
//! impl View<Settings> for Panel {
//!     fn show(&mut self) { self.visible = true; }
//!     fn hide(&mut self) { self.visible = false; }
//!     fn destroy(&mut self) {}
//!     fn set_view_model(&mut self, _: &Rc<Settings>) {}
//! }
//!
//! struct Loader;
//! impl ViewLocator for Loader {
//!     type ViewModel = Settings;
//!     type View = Panel;
//!     fn load(&mut self, _path: &str, _owner: &Rc<Settings>) -> Panel { Panel::default() }
//! }
//!
//! let binder = LifecycleBinder::new(Loader);
//! let vm = Rc::new(Settings { presentation: Presentation::new() });
//! binder.bind(&vm);
//!
//! vm.presentation().show();
//! assert!(binder.get_view(&vm).unwrap().visible);
//! vm.presentation().hide();
//! assert!(!binder.get_view(&vm).unwrap().visible);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod binder;
pub mod presentation;
pub mod types;

pub use binder::{LifecycleBinder, View, ViewLocator, ViewModel};
pub use presentation::Presentation;
pub use types::{BinderError, BindingFlags, PresentationState, SubscriptionId, ViewModelId};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;
    use trellis_context::Context;

    struct Vm(Presentation);

    impl ViewModel for Vm {
        fn view_path(&self) -> &str {
            "root/menu"
        }
        fn presentation(&self) -> &Presentation {
            &self.0
        }
    }

    #[derive(Clone)]
    struct Counter(Rc<Cell<u32>>);

    impl View<Vm> for Counter {
        fn show(&mut self) {
            self.0.set(self.0.get() + 1);
        }
        fn hide(&mut self) {}
        fn destroy(&mut self) {}
        fn set_view_model(&mut self, _: &Rc<Vm>) {}
    }

    struct Locator(Rc<Cell<u32>>);

    impl ViewLocator for Locator {
        type ViewModel = Vm;
        type View = Counter;
        fn load(&mut self, _: &str, _: &Rc<Vm>) -> Counter {
            Counter(Rc::clone(&self.0))
        }
    }

    #[test]
    fn binder_is_resolvable_from_a_child_scope() {
        let shows = Rc::new(Cell::new(0));
        let root = Rc::new(Context::new());
        root.register_named(
            LifecycleBinder::<Locator>::SERVICE_NAME,
            LifecycleBinder::new(Locator(Rc::clone(&shows))),
        );

        let scope = root.child();
        let binder = scope
            .get_service_named::<LifecycleBinder<Locator>>(LifecycleBinder::<Locator>::SERVICE_NAME)
            .unwrap();
        let vm = Rc::new(Vm(Presentation::new()));
        binder.bind(&vm);
        vm.presentation().show();
        assert_eq!(shows.get(), 1);

        // Clones share state: the registered instance sees the same mapping.
        let again = root
            .get_service_named::<LifecycleBinder<Locator>>(LifecycleBinder::<Locator>::SERVICE_NAME)
            .unwrap();
        assert!(again.get_view(&vm).is_some());
    }
}
