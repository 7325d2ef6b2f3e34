//! Benchmarks for the reactive core hot paths
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;

use liveproc::{
    BufferId, BufferProvider, EnableLink, ParamGraph, ParamId, ParamSpec, ParamValue,
    ResourceScope, SharedProvider,
};

struct NullProvider;

impl BufferProvider for NullProvider {
    fn release(&self, _buffer: BufferId) {}
}

/// One master toggle gating `width` dependent numbers.
fn fan_out_graph(width: usize) -> (ParamGraph, ParamId) {
    let mut graph = ParamGraph::new();
    let master = graph.add_param(ParamSpec::toggle("master").initial(ParamValue::Toggle(true)));
    for i in 0..width {
        let dep = graph.add_param(
            ParamSpec::number(format!("dep-{i}"))
                .range(0.0, 1.0)
                .initial(ParamValue::Number(0.5)),
        );
        graph
            .add_link(
                EnableLink::new(master, dep, |v| v.as_toggle() == Some(true))
                    .with_default(ParamValue::Number(0.0)),
            )
            .unwrap();
    }
    (graph, master)
}

fn bench_propagation_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagation_fan_out");

    for width in [4usize, 32, 256].iter() {
        group.throughput(Throughput::Elements(*width as u64));
        group.bench_with_input(
            BenchmarkId::new("toggle_master", width),
            width,
            |b, &width| {
                let (mut graph, master) = fan_out_graph(width);
                let mut on = false;
                b.iter(|| {
                    // Every flip re-evaluates all outgoing links.
                    graph.set_value(master, ParamValue::Toggle(on)).unwrap();
                    on = !on;
                    black_box(graph.param_count())
                });
            },
        );
    }

    group.finish();
}

fn bench_unchanged_write_dedup(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_dedup");

    let mut graph = ParamGraph::new();
    let strength = graph.add_param(
        ParamSpec::number("strength")
            .range(0.0, 1.0)
            .initial(ParamValue::Number(0.5)),
    );

    group.bench_function("set_value_unchanged", |b| {
        b.iter(|| {
            // Same value every time: the write must be swallowed without
            // touching links or subscribers.
            graph
                .set_value(strength, black_box(ParamValue::Number(0.5)))
                .unwrap();
        });
    });

    group.finish();
}

fn bench_snapshot_capture(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_capture");

    for size in [8usize, 64, 512].iter() {
        let (graph, _) = fan_out_graph(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("snapshot", size), &graph, |b, graph| {
            b.iter(|| black_box(graph.snapshot()));
        });
    }

    group.finish();
}

fn bench_scope_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("scope_churn");

    let provider: SharedProvider = Arc::new(NullProvider);
    for count in [4u64, 16, 64].iter() {
        group.throughput(Throughput::Elements(*count));
        group.bench_with_input(
            BenchmarkId::new("track_release", count),
            count,
            |b, &count| {
                b.iter(|| {
                    let mut scope = ResourceScope::new(provider.clone());
                    for i in 0..count {
                        scope.track(BufferId(i + 1));
                    }
                    black_box(scope.owned_count())
                    // Dropping the scope releases everything in reverse.
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_propagation_fan_out,
    bench_unchanged_write_dedup,
    bench_snapshot_capture,
    bench_scope_churn,
);

criterion_main!(benches);
