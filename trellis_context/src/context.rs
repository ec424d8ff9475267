// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scoped contexts: attributes and services with cascading reads.
//!
//! ## Overview
//!
//! A [`Context`] holds a flat attribute map, a [`ServiceRegistry`], and an
//! optional parent. Reads walk from the context towards the root and stop at
//! the first hit. Writes only ever touch the local scope, so a child can shadow
//! a parent's attribute or service for its own lifetime without affecting its
//! siblings.
//!
//! ## Registry ownership
//!
//! A context built without a registry creates a [`ServiceContainer`] and owns
//! it; [`Context::release`] disposes it. A context built with
//! [`Context::with_registry`] borrows the registry and never disposes it.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use core::any::Any;
use core::cell::{Cell, RefCell};

use crate::registry::{
    Binding, ServiceContainer, ServiceRegistry, ServiceRegistryExt, service_key,
};

/// Whether a [`Context`] created its registry or was handed one.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RegistryOwnership {
    /// Created by the context; disposed on release.
    Owned,
    /// Supplied by the caller; left untouched on release.
    Borrowed,
}

/// A scoped, chainable container of attributes and service bindings.
///
/// Absence is never an error: missing attributes read as the type's default
/// value and missing services as `None`. Pair [`Context::get`] with
/// [`Context::contains`] when "absent" and "present but empty" must differ.
pub struct Context {
    attributes: RefCell<BTreeMap<String, Rc<dyn Any>>>,
    parent: Option<Rc<Context>>,
    registry: Rc<dyn ServiceRegistry>,
    ownership: RegistryOwnership,
    released: Cell<bool>,
}

impl core::fmt::Debug for Context {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let keys: alloc::vec::Vec<String> = self.attributes.borrow().keys().cloned().collect();
        f.debug_struct("Context")
            .field("attributes", &keys)
            .field("depth", &self.depth())
            .field("ownership", &self.ownership)
            .field("released", &self.released.get())
            .finish_non_exhaustive()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a root context owning a fresh [`ServiceContainer`].
    pub fn new() -> Self {
        Self::build(None, None)
    }

    /// Create a context under `parent`, owning a fresh [`ServiceContainer`].
    pub fn with_parent(parent: Rc<Self>) -> Self {
        Self::build(None, Some(parent))
    }

    /// Create a context over an externally owned registry.
    ///
    /// [`Context::release`] will not dispose `registry`.
    pub fn with_registry(registry: Rc<dyn ServiceRegistry>, parent: Option<Rc<Self>>) -> Self {
        Self::build(Some(registry), parent)
    }

    /// Create a child scope of this context.
    pub fn child(self: &Rc<Self>) -> Self {
        Self::with_parent(Rc::clone(self))
    }

    fn build(registry: Option<Rc<dyn ServiceRegistry>>, parent: Option<Rc<Self>>) -> Self {
        let (registry, ownership) = match registry {
            Some(r) => (r, RegistryOwnership::Borrowed),
            None => (
                Rc::new(ServiceContainer::new()) as Rc<dyn ServiceRegistry>,
                RegistryOwnership::Owned,
            ),
        };
        Self {
            attributes: RefCell::new(BTreeMap::new()),
            parent,
            registry,
            ownership,
            released: Cell::new(false),
        }
    }

    /// The parent context, if any.
    pub fn parent(&self) -> Option<&Rc<Self>> {
        self.parent.as_ref()
    }

    /// This context followed by each ancestor up to the root.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Number of ancestors; a root has depth `0`.
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    /// The registry backing this scope.
    pub fn registry(&self) -> &Rc<dyn ServiceRegistry> {
        &self.registry
    }

    /// How this context holds its registry.
    pub fn ownership(&self) -> RegistryOwnership {
        self.ownership
    }

    /// Returns `true` if [`Context::release`] will dispose the registry.
    pub fn owns_registry(&self) -> bool {
        self.ownership == RegistryOwnership::Owned
    }

    fn scopes(&self, cascade: bool) -> impl Iterator<Item = &Self> {
        self.ancestors().take(if cascade { usize::MAX } else { 1 })
    }

    // Attributes

    /// Returns `true` if `key` is set locally or, with `cascade`, in an ancestor.
    pub fn contains(&self, key: &str, cascade: bool) -> bool {
        self.scopes(cascade)
            .any(|ctx| ctx.attributes.borrow().contains_key(key))
    }

    /// Read `key`, or `T::default()` if it is absent or holds another type.
    ///
    /// The nearest scope that sets `key` decides the result; a value of the
    /// wrong type there does not fall through to further ancestors.
    pub fn get<T: Any + Clone + Default>(&self, key: &str, cascade: bool) -> T {
        self.try_get(key, cascade).unwrap_or_default()
    }

    /// Read `key` as a `T`, or `None`.
    pub fn try_get<T: Any + Clone>(&self, key: &str, cascade: bool) -> Option<T> {
        self.get_any(key, cascade)?.downcast_ref::<T>().cloned()
    }

    /// Read the untyped value stored under `key`.
    pub fn get_any(&self, key: &str, cascade: bool) -> Option<Rc<dyn Any>> {
        let hit = self
            .scopes(cascade)
            .find_map(|ctx| ctx.attributes.borrow().get(key).cloned());
        if hit.is_none() {
            log::trace!("attribute `{key}` not found (cascade: {cascade})");
        }
        hit
    }

    /// Set `key` locally, replacing any local value. Ancestors are untouched.
    pub fn set<T: Any>(&self, key: &str, value: T) {
        self.attributes
            .borrow_mut()
            .insert(key.to_string(), Rc::new(value));
    }

    /// Remove the local value of `key`, returning it or `T::default()`.
    ///
    /// Never cascades: an ancestor's binding cannot be removed from a child.
    pub fn remove<T: Any + Clone + Default>(&self, key: &str) -> T {
        self.remove_any(key)
            .and_then(|v| v.downcast_ref::<T>().cloned())
            .unwrap_or_default()
    }

    /// Remove and return the untyped local value of `key`.
    pub fn remove_any(&self, key: &str) -> Option<Rc<dyn Any>> {
        self.attributes.borrow_mut().remove(key)
    }

    // Services

    /// Resolve the service registered under `T`'s type key, cascading upward.
    pub fn get_service<T: Any + Clone>(&self) -> Option<T> {
        self.get_service_named(service_key::<T>())
    }

    /// Resolve the service named `name` as a `T`, cascading upward.
    pub fn get_service_named<T: Any + Clone>(&self, name: &str) -> Option<T> {
        self.ancestors()
            .find_map(|ctx| ctx.registry.resolve_as::<T>(name))
    }

    /// Resolve the untyped service named `name`, cascading upward.
    pub fn get_service_any(&self, name: &str) -> Option<Rc<dyn Any>> {
        self.ancestors().find_map(|ctx| ctx.registry.resolve(name))
    }

    /// Register `instance` in the local registry under `T`'s type key.
    pub fn register<T: Any>(&self, instance: T) {
        self.register_named(service_key::<T>(), instance);
    }

    /// Register `instance` in the local registry under `name`.
    pub fn register_named<T: Any>(&self, name: &str, instance: T) {
        self.registry.register(name, Binding::instance(instance));
    }

    /// Register a factory in the local registry under `T`'s type key.
    pub fn register_factory<T: Any, F: Fn() -> T + 'static>(&self, factory: F) {
        self.register_factory_named(service_key::<T>(), factory);
    }

    /// Register a factory in the local registry under `name`.
    pub fn register_factory_named<T: Any, F: Fn() -> T + 'static>(&self, name: &str, factory: F) {
        self.registry.register(name, Binding::factory(factory));
    }

    /// Remove the local binding under `T`'s type key.
    pub fn unregister<T: Any>(&self) -> bool {
        self.registry.unregister_type::<T>()
    }

    /// Remove the local binding named `name`.
    pub fn unregister_named(&self, name: &str) -> bool {
        self.registry.unregister(name)
    }

    // Lifecycle

    /// Release this scope, disposing the registry if this context owns it.
    ///
    /// Safe to call repeatedly. The parent is never touched.
    pub fn release(&self) {
        if self.released.replace(true) {
            return;
        }
        if self.owns_registry() {
            log::debug!("releasing context at depth {}", self.depth());
            self.registry.dispose();
        }
    }

    /// Returns `true` once [`Context::release`] has run.
    pub fn is_released(&self) -> bool {
        self.released.get()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.release();
    }
}

/// Iterator over a context and its ancestors, nearest first.
///
/// Returned by [`Context::ancestors`].
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    next: Option<&'a Context>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Context;

    fn next(&mut self) -> Option<&'a Context> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}
