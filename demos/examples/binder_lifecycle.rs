// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View-model lifecycle.
//!
//! A settings view-model is shown twice, hidden, destroyed, and shown again.
//! The locator is asked for a view only on the first show and after the
//! destroy; hide before any show is ignored with a warning.
//!
//! Run:
//! - `cargo run -p trellis_demos --example binder_lifecycle`

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trellis_binder::{LifecycleBinder, Presentation, View, ViewLocator, ViewModel};
use trellis_context::Context;

struct SettingsVm {
    presentation: Presentation,
    volume: Cell<u8>,
}

impl ViewModel for SettingsVm {
    fn view_path(&self) -> &str {
        "panel/settings"
    }
    fn presentation(&self) -> &Presentation {
        &self.presentation
    }
}

#[derive(Clone)]
struct Window {
    handle: u32,
    trace: Rc<RefCell<Vec<String>>>,
}

impl View<SettingsVm> for Window {
    fn show(&mut self) {
        self.trace.borrow_mut().push(format!("window {} shown", self.handle));
    }
    fn hide(&mut self) {
        self.trace.borrow_mut().push(format!("window {} hidden", self.handle));
    }
    fn destroy(&mut self) {
        self.trace.borrow_mut().push(format!("window {} destroyed", self.handle));
    }
    fn set_view_model(&mut self, vm: &Rc<SettingsVm>) {
        self.trace
            .borrow_mut()
            .push(format!("window {} wired (volume {})", self.handle, vm.volume.get()));
    }
}

struct Prefabs {
    next: u32,
    trace: Rc<RefCell<Vec<String>>>,
}

impl ViewLocator for Prefabs {
    type ViewModel = SettingsVm;
    type View = Window;

    fn load(&mut self, path: &str, owner: &Rc<SettingsVm>) -> Window {
        self.next += 1;
        self.trace.borrow_mut().push(format!("load {path}"));
        let mut window = Window {
            handle: self.next,
            trace: Rc::clone(&self.trace),
        };
        window.set_view_model(owner);
        window
    }
}

fn main() {
    let trace = Rc::new(RefCell::new(Vec::new()));
    let scope = Context::new();
    scope.register_named(
        LifecycleBinder::<Prefabs>::SERVICE_NAME,
        LifecycleBinder::new(Prefabs {
            next: 0,
            trace: Rc::clone(&trace),
        }),
    );

    let binder = scope
        .get_service_named::<LifecycleBinder<Prefabs>>(LifecycleBinder::<Prefabs>::SERVICE_NAME)
        .expect("binder registered above");

    let vm = Rc::new(SettingsVm {
        presentation: Presentation::new(),
        volume: Cell::new(7),
    });
    binder.bind(&vm);

    vm.presentation().hide();
    vm.presentation().show();
    vm.presentation().show();
    vm.presentation().hide();
    vm.presentation().destroy();
    vm.presentation().show();

    println!("== Trace ==");
    for line in trace.borrow().iter() {
        println!("  {line}");
    }
    println!("== Binding ==\n  {:?}", binder.binding_flags(&vm));

    assert_eq!(
        trace.borrow().iter().filter(|l| l.starts_with("load")).count(),
        2
    );
    assert_eq!(binder.get_view(&vm).map(|w| w.handle), Some(2));
}
