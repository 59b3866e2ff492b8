//! Connected components over a [`Graph`], skipping deleted nodes.
//!
//! Traversal uses an explicit stack so component walks stay safe on
//! large, path-like graphs.

use crate::graph::Graph;

/// Nodes of the component containing `start`, in discovery order.
/// Empty if `start` has been deleted.
pub fn component(graph: &Graph, start: usize) -> Vec<usize> {
    let mut visited = vec![false; graph.num_nodes()];
    let mut members = Vec::new();
    if !graph.is_deleted(start) {
        collect_component(graph, start, &mut visited, &mut members);
    }
    members
}

/// Size of the component containing `start`; 0 for a deleted node.
pub fn component_size(graph: &Graph, start: usize) -> usize {
    component(graph, start).len()
}

/// Every component of the surviving graph. Each unvisited live node seeds
/// one scan, so components come out ordered by their smallest node.
pub fn connected_components(graph: &Graph) -> Vec<Vec<usize>> {
    let n = graph.num_nodes();
    let mut visited = vec![false; n];
    let mut components = Vec::new();

    for node in 0..n {
        if visited[node] || graph.is_deleted(node) {
            continue;
        }
        let mut members = Vec::new();
        collect_component(graph, node, &mut visited, &mut members);
        components.push(members);
    }
    components
}

fn collect_component(graph: &Graph, start: usize, visited: &mut [bool], members: &mut Vec<usize>) {
    let mut stack = vec![start];
    visited[start] = true;

    while let Some(u) = stack.pop() {
        members.push(u);
        for &v in graph.neighbors(u) {
            if !visited[v] {
                visited[v] = true;
                stack.push(v);
            }
        }
    }
}
