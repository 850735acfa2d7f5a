//! Version resolution latency benchmarks.
//!
//! Measures exact hits, lenient fallbacks and strict misses against the
//! built-in trtllm table, plus a full dispatch through a static loader.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::Value;

use collector_dispatch::builtin::builtin_manifest;
use collector_dispatch::collectors::{CallArgs, CollectorUnit, StaticLoader, UnitId};
use collector_dispatch::{FallbackPolicy, GenerationTag, LatestTag, NamespaceRegistry, VersionResolver};

fn trtllm_resolver(policy: FallbackPolicy) -> VersionResolver {
    let manifest = builtin_manifest("trtllm").unwrap().unwrap();
    VersionResolver::new(manifest.build_table().unwrap(), policy)
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    group.throughput(Throughput::Elements(1));

    let lenient = trtllm_resolver(FallbackPolicy::Lenient(LatestTag::Last));
    let strict = trtllm_resolver(FallbackPolicy::Strict);

    for (name, version) in [("first_generation", "0.9.0"), ("last_generation", "1.3.0")] {
        group.bench_function(BenchmarkId::new("exact", name), |b| {
            b.iter(|| lenient.resolve(black_box("moe"), black_box(version)))
        });
    }

    group.bench_function("lenient_fallback", |b| {
        b.iter(|| lenient.resolve(black_box("moe"), black_box("9.9.9")))
    });

    group.bench_function("strict_miss", |b| {
        b.iter(|| strict.resolve(black_box("moe"), black_box("9.9.9")))
    });

    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

    let unit = CollectorUnit::builder(UnitId::new("trtllm", "moe", GenerationTag::from("v3")))
        .function("run_moe_torch", |args| Ok(args.keyword("num_tokens").cloned().unwrap_or(Value::Null)))
        .build();
    let manifest = builtin_manifest("trtllm").unwrap().unwrap();
    let mut registry = NamespaceRegistry::new();
    registry
        .register_manifest(&manifest, Arc::new(StaticLoader::new().with_unit(unit)))
        .unwrap();
    let args = CallArgs::new().kwarg("num_tokens", 128);

    c.bench_function("dispatch/static_loader", |b| {
        b.iter(|| {
            runtime
                .block_on(registry.dispatch("trtllm", "moe", "1.3.0", "run_moe_torch", black_box(&args)))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_resolve, bench_dispatch);
criterion_main!(benches);
