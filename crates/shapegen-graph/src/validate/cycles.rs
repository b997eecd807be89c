//! Flattening cycle detection.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::index::ModelIndex;
use crate::model_ref::ModelRef;

/// Flatten edges of every model, restricted to targets present in the index.
fn flatten_edges(index: &ModelIndex) -> FxHashMap<&ModelRef, Vec<&ModelRef>> {
    index
        .iter()
        .map(|(key, model)| {
            let targets = model
                .properties
                .iter()
                .filter_map(|property| property.flatten_target())
                .filter_map(|target| index.get_key_value(target).map(|(k, _)| k))
                .collect();
            (key, targets)
        })
        .collect()
}

struct Frame<'a> {
    node: &'a ModelRef,
    next: usize,
}

/// Find every flattening cycle.
///
/// Depth-first over the flatten graph with an explicit stack, so chain length
/// is bounded by heap rather than by the thread's stack. A back-edge into the
/// current path yields that part of the path, closed with the revisited node
/// (`A -> B -> A`).
pub fn find_cycles(index: &ModelIndex) -> Vec<Vec<ModelRef>> {
    let edges = flatten_edges(index);
    let mut cycles = Vec::new();
    let mut visited: FxHashSet<&ModelRef> = FxHashSet::default();
    let mut on_path: FxHashSet<&ModelRef> = FxHashSet::default();

    for (root, _) in index.iter() {
        if visited.contains(root) {
            continue;
        }
        visited.insert(root);
        on_path.insert(root);
        let mut stack = vec![Frame { node: root, next: 0 }];

        while let Some(frame) = stack.last_mut() {
            let neighbors = edges.get(frame.node).map(Vec::as_slice).unwrap_or_default();
            let Some(&neighbor) = neighbors.get(frame.next) else {
                on_path.remove(frame.node);
                stack.pop();
                continue;
            };
            frame.next += 1;

            if !visited.contains(neighbor) {
                visited.insert(neighbor);
                on_path.insert(neighbor);
                stack.push(Frame {
                    node: neighbor,
                    next: 0,
                });
            } else if on_path.contains(neighbor) {
                let start = stack
                    .iter()
                    .position(|f| f.node == neighbor)
                    .unwrap_or_default();
                let mut path: Vec<ModelRef> =
                    stack[start..].iter().map(|f| f.node.clone()).collect();
                path.push(neighbor.clone());
                cycles.push(path);
            }
        }
    }
    cycles
}
