// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use trellis_context::Context;

#[derive(Clone)]
struct Clock(u64);

/// Build a chain of `depth` child scopes under a root holding the bindings.
fn chain(depth: usize) -> Rc<Context> {
    let root = Rc::new(Context::new());
    root.set("theme", String::from("dark"));
    root.register(Clock(7));
    let mut leaf = root;
    for _ in 0..depth {
        leaf = Rc::new(leaf.child());
    }
    leaf
}

fn bench_attribute_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("attribute_cascade");
    for &depth in &[0_usize, 4, 16, 64] {
        let leaf = chain(depth);
        group.bench_function(format!("get_depth{depth}"), |b| {
            b.iter(|| black_box(leaf.get::<String>(black_box("theme"), true)));
        });
        group.bench_function(format!("miss_depth{depth}"), |b| {
            b.iter(|| black_box(leaf.contains(black_box("absent"), true)));
        });
    }
    group.finish();
}

fn bench_service_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("service_cascade");
    for &depth in &[0_usize, 4, 16, 64] {
        let leaf = chain(depth);
        group.bench_function(format!("resolve_depth{depth}"), |b| {
            b.iter(|| black_box(leaf.get_service::<Clock>().map(|c| c.0)));
        });
    }
    group.bench_function("child_scope_create_release", |b| {
        let root = chain(0);
        b.iter_batched(
            || Rc::clone(&root),
            |root| {
                let scope = root.child();
                scope.register(Clock(1));
                scope.release();
                black_box(scope.is_released());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_attribute_cascade, bench_service_cascade);
criterion_main!(benches);
