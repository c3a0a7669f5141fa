// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Bench code readability over pedantic
#![allow(clippy::cast_possible_truncation)] // Bench parameters
#![allow(clippy::semicolon_if_nothing_returned)] // Benchmark code formatting

use binobj::{model, to_bytes, CodecConfig, Node, Range, TypeRegistry};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Complete tree with `fanout` children per node, `levels` deep.
fn build_tree(levels: usize, fanout: usize) -> Node {
    fn build(level: usize, levels: usize, fanout: usize, start: u32) -> Node {
        let mut node = Node::new(format!("n{}_{}", level, start), Range::new(start, 64));
        if level + 1 < levels {
            for i in 0..fanout {
                node.push_child(build(level + 1, levels, fanout, start + i as u32));
            }
        }
        node
    }
    build(0, levels, fanout, 0)
}

// ============================================================================
// Node Benchmarks
// ============================================================================

/// Benchmark: Node body encode for growing trees
fn bench_node_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("node_encode");
    for levels in [2usize, 4, 6] {
        let tree = build_tree(levels, 4);
        let size = to_bytes(&tree).map(|b| b.len()).unwrap_or(0);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(levels), &tree, |b, tree| {
            b.iter(|| to_bytes(black_box(tree)).unwrap())
        });
    }
    group.finish();
}

/// Benchmark: top-level Node decode through the registry
fn bench_node_decode(c: &mut Criterion) {
    let registry = TypeRegistry::new();
    model::register_model(&registry).unwrap();

    let mut group = c.benchmark_group("node_decode");
    for levels in [2usize, 4, 6] {
        let bytes = registry.to_bytes(&build_tree(levels, 4)).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(levels), &bytes, |b, bytes| {
            b.iter(|| {
                registry
                    .from_bytes_as::<Node>(black_box(bytes), CodecConfig::default())
                    .unwrap()
            })
        });
    }
    group.finish();
}

/// Benchmark: registry lookup hit
fn bench_registry_lookup(c: &mut Criterion) {
    use binobj::BinaryClass;

    let registry = TypeRegistry::new();
    model::register_model(&registry).unwrap();
    c.bench_function("registry_lookup", |b| {
        b.iter(|| registry.lookup(black_box(&Node::ID)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_node_encode,
    bench_node_decode,
    bench_registry_lookup
);
criterion_main!(benches);
