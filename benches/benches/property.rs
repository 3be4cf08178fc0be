// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `trellis_property` value resolution and writes.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use trellis_property::{
    DependencyObject, DependencyObjectExt, KindId, Property, PropertyFlags,
    PropertyMetadataBuilder, PropertyRegistry, PropertyStore,
};

#[derive(Clone)]
struct Elem {
    key: u32,
    kind: KindId,
    parent: Option<u32>,
    store: PropertyStore<u32>,
}

impl DependencyObject<u32> for Elem {
    fn property_store(&self) -> &PropertyStore<u32> {
        &self.store
    }

    fn property_store_mut(&mut self) -> &mut PropertyStore<u32> {
        &mut self.store
    }

    fn key(&self) -> u32 {
        self.key
    }

    fn kind(&self) -> KindId {
        self.kind
    }

    fn parent_key(&self) -> Option<u32> {
        self.parent
    }
}

struct Fixture {
    registry: PropertyRegistry,
    width: Property<f64>,
    font_size: Property<f64>,
    /// A parent chain: `chain[i]` is the parent of `chain[i + 1]`.
    chain: Vec<Elem>,
}

fn fixture(depth: u32) -> Fixture {
    let mut registry = PropertyRegistry::new();
    let element = registry
        .register_kind("Element", None)
        .expect("first kind");
    let panel = registry
        .register_kind("Panel", Some(element))
        .expect("known base");
    let width = registry
        .register(
            "Width",
            element,
            PropertyMetadataBuilder::new(f64::NAN)
                .flags(PropertyFlags::AFFECTS_MEASURE)
                .build(),
            None,
        )
        .expect("unique name");
    let font_size = registry
        .register(
            "FontSize",
            element,
            PropertyMetadataBuilder::new(12.0_f64)
                .flags(PropertyFlags::AFFECTS_MEASURE)
                .inherits(true)
                .build(),
            None,
        )
        .expect("unique name");

    let mut chain: Vec<Elem> = (0..depth)
        .map(|key| Elem {
            key,
            kind: if key % 2 == 0 { panel } else { element },
            parent: key.checked_sub(1),
            store: PropertyStore::new(key),
        })
        .collect();
    chain[0].store.set_local(font_size, 20.0);
    for elem in &mut chain {
        elem.store.set_local(width, f64::from(elem.key));
    }
    Fixture {
        registry,
        width,
        font_size,
        chain,
    }
}

fn bench_property(c: &mut Criterion) {
    let mut group = c.benchmark_group("trellis_property");

    for &depth in &[1_u32, 8, 64] {
        let f = fixture(depth);
        let lookup = |key: u32| {
            f.chain
                .get(key as usize)
                .map(|e| (e.property_store(), e.parent_key()))
        };
        let leaf = &f.chain[(depth - 1) as usize];

        group.bench_with_input(BenchmarkId::new("get_local", depth), &depth, |b, _| {
            b.iter(|| black_box(leaf.get_value(f.width, &f.registry, &lookup)));
        });

        group.bench_with_input(BenchmarkId::new("get_inherited", depth), &depth, |b, _| {
            b.iter(|| black_box(leaf.get_value(f.font_size, &f.registry, &lookup)));
        });
    }

    let f = fixture(1);
    group.bench_function("set_value_changed", |b| {
        b.iter_batched(
            || f.chain[0].clone(),
            |mut elem| {
                let change = elem.set_value(f.width, 10.0, 0.0, &f.registry);
                black_box(change.ok());
                black_box(elem);
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("set_value_unchanged", |b| {
        let mut elem = f.chain[0].clone();
        b.iter(|| black_box(elem.set_value(f.width, 0.0, 0.0, &f.registry).ok()));
    });

    group.finish();
}

criterion_group!(benches, bench_property);
criterion_main!(benches);
