//! Example: subgraph copy and tensor substitution
//!
//! Builds a small graph, copies part of it into a second graph, then uses
//! `graph_replace` to recompute an output against a different input.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example copy_subgraph
//! ```

use graft::attr::{AttrValue, TensorShape};
use graft::graph::{Graph, NodeRef, PLACEHOLDER_OP};
use graft::prelude::*;
use graft::proto::DataType;
use graft::transform;
use graft::tree::Tree;

fn add_placeholder(graph: &mut Graph, name: &str, dims: &[i64]) -> GraphResult<NodeRef> {
    let node = graph.add_node(name, PLACEHOLDER_OP)?;
    graph.add_attr(node, "dtype", AttrValue::DType(DataType::Float))?;
    graph.add_attr(node, "shape", AttrValue::Shape(TensorShape::from_dims(dims)))?;
    graph.infer_outputs(node)?;
    Ok(node)
}

fn add_unary(graph: &mut Graph, name: &str, op: &str, input: NodeRef) -> GraphResult<NodeRef> {
    let node = graph.add_node(name, op)?;
    graph.set_inputs(node, &[input.output(0)])?;
    graph.infer_outputs(node)?;
    Ok(node)
}

fn main() -> GraphResult<()> {
    // x -> square -> loss, with an auditing node ordered before loss
    let mut model = Graph::new();
    let x = add_placeholder(&mut model, "x", &[32])?;
    let square = add_unary(&mut model, "layer/square", "Square", x)?;
    let loss = add_unary(&mut model, "layer/loss", "Neg", square)?;
    let audit = model.add_node("audit", "NoOp")?;
    model.add_control_input(loss, audit)?;

    // Copy the layer into a fresh graph. The input x is outside the
    // selection, so it becomes a placeholder in the copy.
    let mut imported = Graph::new();
    let map = transform::copy_subgraph(&model, &[square, loss, audit], &mut imported, "imported", "")?;

    println!("Destination graph has {} nodes:", imported.node_count());
    for node in imported.nodes() {
        let n = imported.node(node)?;
        println!("  {} ({})", n.name(), n.op_type());
    }

    let loss2 = map.transformed_node(loss)?;
    println!(
        "control inputs of {}: {}",
        imported.node(loss2)?.name(),
        imported.node(loss2)?.control_inputs().len()
    );

    // Back in the original graph: recompute the loss as if x had been x2.
    let x2 = add_placeholder(&mut model, "x2", &[32])?;
    let replacements: ReplacementMap = [(x.output(0), x2.output(0))].into_iter().collect();
    let targets = Tree::from_leaves([loss.output(0)]);
    let result = transform::graph_replace(&mut model, &targets, &replacements)?;

    let new_loss = result.flatten()?[0];
    println!(
        "recomputed {} as {}",
        model.tensor_name(loss.output(0))?,
        model.tensor_name(*new_loss)?
    );

    Ok(())
}
