//! Benchmark for transformation operations
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use graft::attr::{AttrValue, TensorShape};
use graft::graph::{Graph, NodeRef, PLACEHOLDER_OP};
use graft::proto::DataType;
use graft::transform::{self, ReplacementMap};
use graft::tree::Tree;

/// Straight chain: one placeholder followed by `len` unary nodes.
fn make_chain(len: usize) -> (Graph, NodeRef, NodeRef) {
    let mut graph = Graph::new();
    let input = graph.add_node("input", PLACEHOLDER_OP).unwrap();
    graph
        .add_attr(input, "dtype", AttrValue::DType(DataType::Float))
        .unwrap();
    graph
        .add_attr(input, "shape", AttrValue::Shape(TensorShape::from_dims(&[64])))
        .unwrap();
    graph.infer_outputs(input).unwrap();

    let mut prev = input;
    for i in 0..len {
        let node = graph.add_node(&format!("op_{}", i), "Square").unwrap();
        graph.set_inputs(node, &[prev.output(0)]).unwrap();
        graph.infer_outputs(node).unwrap();
        prev = node;
    }
    (graph, input, prev)
}

fn copy_benchmark(c: &mut Criterion) {
    let (src, _, _) = make_chain(100);

    c.bench_function("copy_chain_100", |b| {
        b.iter(|| {
            let mut dst = Graph::new();
            let map = transform::copy(black_box(&src), &mut dst, "imported", "").unwrap();
            black_box(map)
        })
    });
}

fn replace_benchmark(c: &mut Criterion) {
    c.bench_function("graph_replace_chain_100", |b| {
        b.iter_with_setup(
            || {
                let (mut graph, input, last) = make_chain(100);
                let fresh = graph.add_node("fresh", PLACEHOLDER_OP).unwrap();
                graph
                    .add_attr(fresh, "dtype", AttrValue::DType(DataType::Float))
                    .unwrap();
                graph.infer_outputs(fresh).unwrap();
                (graph, input, fresh, last)
            },
            |(mut graph, input, fresh, last)| {
                let replacements: ReplacementMap =
                    [(input.output(0), fresh.output(0))].into_iter().collect();
                let targets = Tree::from_leaves([last.output(0)]);
                let result =
                    transform::graph_replace(&mut graph, &targets, &replacements).unwrap();
                black_box(result)
            },
        )
    });
}

criterion_group!(benches, copy_benchmark, replace_benchmark);
criterion_main!(benches);
