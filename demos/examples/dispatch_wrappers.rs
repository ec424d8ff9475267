// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget wrappers by type dispatch.
//!
//! Concrete widgets are adapted to one `Bindable` interface through a table of
//! constructors. Any view type shares a single adapter; unknown widgets pass
//! through untouched.
//!
//! Run:
//! - `cargo run -p trellis_demos --example dispatch_wrappers`

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use trellis_dispatch::{Dispatched, TypeDispatchRegistry};

struct Text(RefCell<String>);
struct Toggle(RefCell<bool>);
struct Slider(RefCell<f32>);
struct SettingsView;
struct ShopView;
struct Particles;

trait Bindable {
    fn describe(&self) -> String;
    fn assign(&self, value: &str);
}

struct TextWrapper(Rc<Text>);
impl Bindable for TextWrapper {
    fn describe(&self) -> String {
        format!("text {:?}", self.0.0.borrow())
    }
    fn assign(&self, value: &str) {
        *self.0.0.borrow_mut() = value.to_owned();
    }
}

struct ToggleWrapper(Rc<Toggle>);
impl Bindable for ToggleWrapper {
    fn describe(&self) -> String {
        format!("toggle {}", self.0.0.borrow())
    }
    fn assign(&self, value: &str) {
        *self.0.0.borrow_mut() = value == "on";
    }
}

struct SliderWrapper(Rc<Slider>);
impl Bindable for SliderWrapper {
    fn describe(&self) -> String {
        format!("slider {}", self.0.0.borrow())
    }
    fn assign(&self, value: &str) {
        if let Ok(v) = value.parse() {
            *self.0.0.borrow_mut() = v;
        }
    }
}

struct ViewWrapper(&'static str);
impl Bindable for ViewWrapper {
    fn describe(&self) -> String {
        format!("nested view {}", self.0)
    }
    fn assign(&self, _: &str) {}
}

fn widget<T: Any>(w: T) -> Rc<dyn Any> {
    Rc::new(w)
}

fn is_view(v: &dyn Any) -> bool {
    v.is::<SettingsView>() || v.is::<ShopView>()
}

fn main() {
    let mut table: TypeDispatchRegistry<Box<dyn Bindable>> = TypeDispatchRegistry::new();
    table
        .register_adapter(|t: Rc<Text>| Box::new(TextWrapper(t)) as Box<dyn Bindable>)
        .register_adapter(|t: Rc<Toggle>| Box::new(ToggleWrapper(t)) as Box<dyn Bindable>)
        .register_adapter(|s: Rc<Slider>| Box::new(SliderWrapper(s)) as Box<dyn Bindable>)
        .register_matching("view", is_view, |v| {
            let name = if v.is::<SettingsView>() { "settings" } else { "shop" };
            Box::new(ViewWrapper(name)) as Box<dyn Bindable>
        });
    println!("== Table ==\n  {table:?}");

    let widgets: Vec<(Rc<dyn Any>, &str)> = vec![
        (widget(Text(RefCell::new(String::from("Volume")))), "Master volume"),
        (widget(Toggle(RefCell::new(false))), "on"),
        (widget(Slider(RefCell::new(0.0))), "0.75"),
        (widget(SettingsView), ""),
        (widget(ShopView), ""),
        (widget(Particles), ""),
    ];

    println!("== Adapt ==");
    let mut adapted = 0;
    for (widget, value) in widgets {
        match table.adapt(widget) {
            Dispatched::Adapted(bindable) => {
                bindable.assign(value);
                println!("  {}", bindable.describe());
                adapted += 1;
            }
            Dispatched::Passthrough(_) => println!("  (no wrapper; kept as is)"),
        }
    }
    assert_eq!(adapted, 5);
}
