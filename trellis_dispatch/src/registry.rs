// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter table and first-match dispatch.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::Any;

type Matcher = Box<dyn Fn(&dyn Any) -> bool>;
// Hands the value back on a failed build so the scan can continue.
type Builder<A> = Box<dyn Fn(Rc<dyn Any>) -> Result<A, Rc<dyn Any>>>;

struct Entry<A> {
    label: &'static str,
    matches: Matcher,
    build: Builder<A>,
}

/// Result of [`TypeDispatchRegistry::adapt`].
pub enum Dispatched<A> {
    /// An adapter matched and produced this value.
    Adapted(A),
    /// No adapter matched; the original value, unchanged.
    Passthrough(Rc<dyn Any>),
}

impl<A> Dispatched<A> {
    /// Returns `true` if an adapter matched.
    pub fn is_adapted(&self) -> bool {
        matches!(self, Self::Adapted(_))
    }

    /// The adapted value, if any.
    pub fn adapted(self) -> Option<A> {
        match self {
            Self::Adapted(a) => Some(a),
            Self::Passthrough(_) => None,
        }
    }

    /// The original value if nothing matched.
    pub fn passthrough(self) -> Option<Rc<dyn Any>> {
        match self {
            Self::Adapted(_) => None,
            Self::Passthrough(v) => Some(v),
        }
    }
}

impl<A: core::fmt::Debug> core::fmt::Debug for Dispatched<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Adapted(a) => f.debug_tuple("Adapted").field(a).finish(),
            Self::Passthrough(_) => f.write_str("Passthrough(..)"),
        }
    }
}

/// Ordered table of adapters keyed by a type or capability check.
///
/// ## Matching
///
/// - [`register_adapter`](Self::register_adapter) matches one concrete type exactly.
/// - [`register_matching`](Self::register_matching) matches whatever its predicate
///   accepts, which covers families of types sharing an adapter.
///
/// Bindings are scanned in registration order and the first match wins.
pub struct TypeDispatchRegistry<A> {
    entries: Vec<Entry<A>>,
}

impl<A> Default for TypeDispatchRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> core::fmt::Debug for TypeDispatchRegistry<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeDispatchRegistry")
            .field("labels", &self.labels().collect::<Vec<_>>())
            .finish()
    }
}

impl<A> TypeDispatchRegistry<A> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an adapter for values whose concrete type is exactly `T`.
    ///
    /// The binding is labelled with `T`'s type name.
    pub fn register_adapter<T, F>(&mut self, ctor: F) -> &mut Self
    where
        T: Any,
        F: Fn(Rc<T>) -> A + 'static,
    {
        self.entries.push(Entry {
            label: core::any::type_name::<T>(),
            matches: Box::new(|v: &dyn Any| v.is::<T>()),
            build: Box::new(move |v: Rc<dyn Any>| v.downcast::<T>().map(&ctor)),
        });
        self
    }

    /// Append an adapter for every value accepted by `matches`.
    pub fn register_matching<M, F>(&mut self, label: &'static str, matches: M, ctor: F) -> &mut Self
    where
        M: Fn(&dyn Any) -> bool + 'static,
        F: Fn(Rc<dyn Any>) -> A + 'static,
    {
        self.entries.push(Entry {
            label,
            matches: Box::new(matches),
            build: Box::new(move |v| Ok(ctor(v))),
        });
        self
    }

    /// Adapt `value` with the first matching binding, or pass it through.
    pub fn adapt(&self, value: Rc<dyn Any>) -> Dispatched<A> {
        let mut value = value;
        for entry in &self.entries {
            if !(entry.matches)(&*value) {
                continue;
            }
            match (entry.build)(value) {
                Ok(adapted) => {
                    log::trace!("adapted value with `{}`", entry.label);
                    return Dispatched::Adapted(adapted);
                }
                Err(original) => value = original,
            }
        }
        log::trace!("no adapter for value; passing through");
        Dispatched::Passthrough(value)
    }

    /// Label of the binding [`adapt`](Self::adapt) would use, without building.
    pub fn matching_label(&self, value: &dyn Any) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|e| (e.matches)(value))
            .map(|e| e.label)
    }

    /// Binding labels in scan order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.label)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no bindings are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
