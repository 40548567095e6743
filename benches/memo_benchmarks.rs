//! Benchmarks for the memoization engine and caching facade.
//!
//! Compares cold (miss) and warm (hit) paths, and the facade against the
//! bare registry, across the main cacheable operation shapes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use introcache::prelude::*;

/// Registry with `types` generic-free types, each carrying a handful of
/// members, plus one open generic definition.
fn build_registry(types: u32) -> (MetadataRegistry, Vec<TypeHandle>, TypeHandle, TypeHandle) {
    let registry = MetadataRegistry::new();
    let assembly = registry.add_assembly("bench");
    let module = registry.add_module(assembly, "bench.main").unwrap();

    let mut handles = Vec::new();
    for i in 0..types {
        let ty = registry.add_type(module, &format!("Type{i}")).unwrap();
        for j in 0..8 {
            registry
                .add_field(ty, &format!("field{j}"), j % 2 == 0, false)
                .unwrap();
            registry
                .add_method(ty, &format!("method{j}"), true, j % 2 == 0)
                .unwrap();
        }
        handles.push(ty);
    }

    let list = registry.add_type(module, "List").unwrap();
    registry.add_generic_parameter(list, "T").unwrap();
    let int32 = registry.add_type(module, "Int32").unwrap();

    (registry, handles, list, int32)
}

fn bench_members_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("members_of");

    for &types in &[16u32, 128] {
        let (registry, handles, _, _) = build_registry(types);
        group.bench_with_input(BenchmarkId::new("uncached", types), &types, |b, _| {
            b.iter(|| {
                for &ty in &handles {
                    black_box(registry.members_of(ty, MemberFilter::DEFAULT).unwrap());
                }
            })
        });

        let (registry, handles, _, _) = build_registry(types);
        let facade = CachingProvider::new(registry);
        // Warm every key once so the measured loop is all hits.
        for &ty in &handles {
            facade.members_of(ty, MemberFilter::DEFAULT).unwrap();
        }
        group.bench_with_input(BenchmarkId::new("cached_warm", types), &types, |b, _| {
            b.iter(|| {
                for &ty in &handles {
                    black_box(facade.members_of(ty, MemberFilter::DEFAULT).unwrap());
                }
            })
        });
    }

    group.finish();
}

fn bench_cold_population(c: &mut Criterion) {
    c.bench_function("members_of/cached_cold", |b| {
        b.iter_with_setup(
            || {
                let (registry, handles, _, _) = build_registry(64);
                (CachingProvider::new(registry), handles)
            },
            |(facade, handles)| {
                for &ty in &handles {
                    black_box(facade.members_of(ty, MemberFilter::DEFAULT).unwrap());
                }
            },
        )
    });
}

fn bench_generic_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("make_generic_type");

    let (registry, _, list, int32) = build_registry(4);
    group.bench_function("uncached", |b| {
        b.iter(|| black_box(registry.make_generic_type(list, &[int32]).unwrap()))
    });

    let (registry, _, list, int32) = build_registry(4);
    let facade = CachingProvider::new(registry);
    facade.make_generic_type(list, &[int32]).unwrap();
    group.bench_function("cached_warm", |b| {
        b.iter(|| black_box(facade.make_generic_type(list, &[int32]).unwrap()))
    });

    group.finish();
}

fn bench_clear(c: &mut Criterion) {
    c.bench_function("clear/64_types_warm", |b| {
        b.iter_with_setup(
            || {
                let (registry, handles, _, _) = build_registry(64);
                let facade = CachingProvider::new(registry);
                for &ty in &handles {
                    facade.members_of(ty, MemberFilter::DEFAULT).unwrap();
                    facade.fields_of(ty, MemberFilter::DEFAULT).unwrap();
                }
                facade
            },
            |facade| facade.clear(),
        )
    });
}

criterion_group!(
    benches,
    bench_members_queries,
    bench_cold_population,
    bench_generic_construction,
    bench_clear
);
criterion_main!(benches);
