// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::any::Any;
use std::rc::Rc;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use trellis_dispatch::TypeDispatchRegistry;

struct Kind<const N: usize>;

macro_rules! register_kinds {
    ($table:ident, $($n:literal),*) => {
        $( $table.register_adapter(|_: Rc<Kind<$n>>| $n); )*
    };
}

fn table() -> TypeDispatchRegistry<usize> {
    let mut t = TypeDispatchRegistry::new();
    register_kinds!(t, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15);
    t
}

fn bench_adapt(c: &mut Criterion) {
    let t = table();
    let mut group = c.benchmark_group("adapt");
    group.throughput(Throughput::Elements(1));
    let first: Rc<dyn Any> = Rc::new(Kind::<0>);
    let last: Rc<dyn Any> = Rc::new(Kind::<15>);
    let unmatched: Rc<dyn Any> = Rc::new(0_u8);
    group.bench_function("first_binding", |b| {
        b.iter(|| black_box(t.adapt(Rc::clone(&first)).is_adapted()));
    });
    group.bench_function("last_binding", |b| {
        b.iter(|| black_box(t.adapt(Rc::clone(&last)).is_adapted()));
    });
    group.bench_function("passthrough", |b| {
        b.iter(|| black_box(t.adapt(Rc::clone(&unmatched)).is_adapted()));
    });
    group.finish();
}

criterion_group!(benches, bench_adapt);
criterion_main!(benches);
