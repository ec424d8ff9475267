// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_dispatch --heading-base-level=0

//! Trellis Dispatch: adapt concrete values to a uniform capability type.
//!
//! ## Overview
//!
//! Presentation code often wraps a small, fixed set of widget types in adapters
//! that expose one interface (text, value, click, ...). A
//! [`TypeDispatchRegistry`] keeps that mapping in an explicit table of
//! constructor functions instead of reflective instantiation.
//!
//! - Bindings are scanned in registration order; the first match wins.
//! - Unmatched values are returned unchanged as [`Dispatched::Passthrough`],
//!   so callers never special-case "no adapter available".
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use trellis_dispatch::TypeDispatchRegistry;
//!
//! struct Label(&'static str);
//! struct Slider(f32);
//!
//! #[derive(Debug, PartialEq)]
//! enum Bound { Text(&'static str), Value(f32) }
//!
//! let mut table = TypeDispatchRegistry::new();
//! table
//!     .register_adapter(|l: Rc<Label>| Bound::Text(l.0))
//!     .register_adapter(|s: Rc<Slider>| Bound::Value(s.0));
//!
//! assert_eq!(table.adapt(Rc::new(Slider(0.5))).adapted(), Some(Bound::Value(0.5)));
//! assert!(!table.adapt(Rc::new(42_u8)).is_adapted());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod registry;

pub use registry::{Dispatched, TypeDispatchRegistry};
