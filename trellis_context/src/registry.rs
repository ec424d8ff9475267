// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Service registry: a flat, name-keyed store of shared instances and factories.
//!
//! ## Overview
//!
//! A [`ServiceRegistry`] owns no hierarchy; [`Context`](crate::Context) layers
//! cascading resolution on top of it. The registry contract is object safe and
//! takes `&self` everywhere so one registry can be shared by several contexts.
//!
//! ## Keys
//!
//! Every binding is keyed by a name. Type-directed operations use the type's
//! canonical name, [`service_key`], so registering "by type" and resolving "by
//! name" with that key reach the same binding.
//!
//! ## Factories
//!
//! A [`Binding::Factory`] is invoked on every resolve. Register an
//! [`Binding::Instance`] when every caller should observe the same value.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::Any;
use core::cell::{Cell, RefCell};

/// Canonical registry name of `T`, used when a service is registered or
/// resolved by type.
pub fn service_key<T: ?Sized>() -> &'static str {
    core::any::type_name::<T>()
}

/// A registered service: either one shared instance or a factory.
#[derive(Clone)]
pub enum Binding {
    /// A value shared by every resolve.
    Instance(Rc<dyn Any>),
    /// A zero-argument constructor invoked on every resolve.
    Factory(Rc<dyn Fn() -> Rc<dyn Any>>),
}

impl Binding {
    /// Bind a single shared value.
    pub fn instance<T: Any>(value: T) -> Self {
        Self::Instance(Rc::new(value))
    }

    /// Bind a factory producing a fresh `T` per resolve.
    pub fn factory<T: Any, F: Fn() -> T + 'static>(factory: F) -> Self {
        Self::Factory(Rc::new(move || -> Rc<dyn Any> { Rc::new(factory()) }))
    }

    /// Produce the bound value, invoking the factory if there is one.
    pub fn get(&self) -> Rc<dyn Any> {
        match self {
            Self::Instance(value) => Rc::clone(value),
            Self::Factory(factory) => factory(),
        }
    }
}

impl core::fmt::Debug for Binding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Instance(_) => f.write_str("Instance(..)"),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// A flat registrar of named service bindings.
///
/// Implementations handle their own mutation discipline; contexts never
/// arbitrate between writers.
pub trait ServiceRegistry {
    /// Bind `name`, replacing any previous binding under the same name.
    fn register(&self, name: &str, binding: Binding);

    /// Resolve `name`, or `None` if nothing is bound.
    fn resolve(&self, name: &str) -> Option<Rc<dyn Any>>;

    /// Remove the binding for `name`. Returns whether one existed.
    fn unregister(&self, name: &str) -> bool;

    /// Drop every binding and release held resources. Must be idempotent.
    fn dispose(&self);
}

/// Typed helpers over any [`ServiceRegistry`].
pub trait ServiceRegistryExt: ServiceRegistry {
    /// Resolve `name` and clone the value out if it is a `T`.
    ///
    /// A binding of another type resolves to `None`.
    fn resolve_as<T: Any + Clone>(&self, name: &str) -> Option<T> {
        self.resolve(name)?.downcast_ref::<T>().cloned()
    }

    /// Resolve the binding registered under `T`'s [`service_key`].
    fn resolve_type<T: Any + Clone>(&self) -> Option<T> {
        self.resolve_as::<T>(service_key::<T>())
    }

    /// Bind `value` under `T`'s [`service_key`].
    fn register_type<T: Any>(&self, value: T) {
        self.register(service_key::<T>(), Binding::instance(value));
    }

    /// Remove the binding under `T`'s [`service_key`].
    fn unregister_type<T: Any>(&self) -> bool {
        self.unregister(service_key::<T>())
    }
}

impl<R: ServiceRegistry + ?Sized> ServiceRegistryExt for R {}

/// Default [`ServiceRegistry`]: an ordered map behind a `RefCell`.
///
/// Once [disposed](ServiceRegistry::dispose) the container stays empty and
/// ignores further registrations.
#[derive(Default)]
pub struct ServiceContainer {
    bindings: RefCell<BTreeMap<String, Binding>>,
    disposed: Cell<bool>,
}

impl core::fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("names", &self.names())
            .field("disposed", &self.disposed.get())
            .finish()
    }
}

impl ServiceContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.bindings.borrow().len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.borrow().is_empty()
    }

    /// Returns `true` if `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    /// Bound names in ascending order.
    pub fn names(&self) -> Vec<String> {
        self.bindings.borrow().keys().cloned().collect()
    }

    /// Returns `true` once [`ServiceRegistry::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

impl ServiceRegistry for ServiceContainer {
    fn register(&self, name: &str, binding: Binding) {
        if self.disposed.get() {
            log::warn!("service `{name}` registered into a disposed container; ignored");
            return;
        }
        self.bindings.borrow_mut().insert(name.to_string(), binding);
    }

    fn resolve(&self, name: &str) -> Option<Rc<dyn Any>> {
        // Release the borrow before running a factory; it may resolve from us.
        let binding = self.bindings.borrow().get(name).cloned()?;
        Some(binding.get())
    }

    fn unregister(&self, name: &str) -> bool {
        self.bindings.borrow_mut().remove(name).is_some()
    }

    fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        let bindings = core::mem::take(&mut *self.bindings.borrow_mut());
        log::debug!("disposing service container ({} bindings)", bindings.len());
        drop(bindings);
    }
}
