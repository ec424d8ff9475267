// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context scopes.
//!
//! A root scope provides a logger and a locale; a screen scope overrides the
//! logger for itself; releasing the screen scope disposes only its own registry.
//!
//! Run:
//! - `cargo run -p trellis_demos --example context_scopes`

use std::rc::Rc;

use trellis_context::{Context, ServiceContainer, ServiceRegistry};

#[derive(Clone, Debug, PartialEq)]
struct Logger(&'static str);

fn main() {
    let root = Rc::new(Context::new());
    root.register(Logger("app"));
    root.set("locale", String::from("en-GB"));

    let screen = root.child();
    println!("== Screen scope (inherits) ==");
    println!("  logger={:?}", screen.get_service::<Logger>());
    println!("  locale={:?}", screen.get::<String>("locale", true));
    println!(
        "  locale set locally? {}",
        screen.contains("locale", false)
    );

    screen.register(Logger("screen"));
    screen.set("locale", String::from("fr-FR"));
    println!("== Screen scope (overrides) ==");
    println!("  screen logger={:?}", screen.get_service::<Logger>());
    println!("  root logger={:?}", root.get_service::<Logger>());
    println!("  screen locale={}", screen.get::<String>("locale", true));
    println!("  root locale={}", root.get::<String>("locale", true));

    screen.release();
    println!("== Screen scope released ==");
    println!("  screen logger={:?}", screen.get_service::<Logger>());

    // A scope over a shared registry leaves it alive on release.
    let shared = Rc::new(ServiceContainer::new());
    let borrowed = Context::with_registry(shared.clone(), Some(Rc::clone(&root)));
    borrowed.register_named("tick", 60_u32);
    borrowed.release();
    println!("== Borrowed registry after release ==");
    println!(
        "  disposed={} tick={:?}",
        shared.is_disposed(),
        shared.resolve("tick").and_then(|v| v.downcast_ref::<u32>().copied())
    );

    assert_eq!(root.get_service::<Logger>(), Some(Logger("app")));
    assert_eq!(screen.get_service::<Logger>(), Some(Logger("app")));
    assert!(!shared.is_disposed());
}
