// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_context --heading-base-level=0

//! Trellis Context: scoped attribute storage and cascading service resolution.
//!
//! ## Overview
//!
//! A [`Context`] is a scope in a chain of scopes. Each scope carries:
//!
//! - a flat attribute map from string keys to arbitrary values,
//! - a [`ServiceRegistry`] of named instances and factories,
//! - an optional parent.
//!
//! Reads cascade from the scope towards the root and stop at the first hit.
//! Writes stay local. A child scope can therefore override a service or an
//! attribute without mutating its parent or leaking into its siblings.
//!
//! ## Absence
//!
//! Lookups never fail. A missing attribute reads as `T::default()` through
//! [`Context::get`] (or `None` through [`Context::try_get`]), and a missing
//! service resolves to `None`.
//!
//! ## Ownership
//!
//! A context that creates its own registry disposes it on [`Context::release`]
//! (or on drop). A context given a registry through [`Context::with_registry`]
//! only borrows it. Releasing is idempotent and never touches the parent.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use trellis_context::Context;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Logger(&'static str);
//!
//! let root = Rc::new(Context::new());
//! root.register(Logger("L1"));
//! root.set("locale", String::from("en"));
//!
//! let child = root.child();
//! assert_eq!(child.get_service::<Logger>(), Some(Logger("L1")));
//! assert_eq!(child.get::<String>("locale", true), "en");
//!
//! child.register(Logger("L2"));
//! assert_eq!(child.get_service::<Logger>(), Some(Logger("L2")));
//! assert_eq!(root.get_service::<Logger>(), Some(Logger("L1")));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod context;
pub mod registry;

pub use context::{Ancestors, Context, RegistryOwnership};
pub use registry::{Binding, ServiceContainer, ServiceRegistry, ServiceRegistryExt, service_key};
