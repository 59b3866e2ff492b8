/// An undirected graph over the fixed node universe `0..num_nodes`.
///
/// Nodes are never renumbered. Deleting a node leaves a tombstone in its
/// slot, so attack simulations can run on a copy without remapping ids.
/// Cloning produces an independent deep copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    num_nodes: usize,
    // `None` marks a deleted node.
    adjacency: Vec<Option<Vec<usize>>>,
}

impl Graph {
    pub fn new(num_nodes: usize) -> Self {
        Graph {
            num_nodes,
            adjacency: vec![Some(Vec::new()); num_nodes],
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adjacency[u]
            .as_ref()
            .map_or(false, |neighbors| neighbors.contains(&v))
    }

    /// Adds the edge `(u, v)` unless it exists, is a loop, or touches a
    /// deleted node. Returns whether the graph changed.
    pub fn add_edge(&mut self, u: usize, v: usize) -> bool {
        if u == v || self.is_deleted(u) || self.is_deleted(v) || self.has_edge(u, v) {
            return false;
        }
        if let Some(neighbors) = self.adjacency[u].as_mut() {
            neighbors.push(v);
        }
        if let Some(neighbors) = self.adjacency[v].as_mut() {
            neighbors.push(u);
        }
        true
    }

    /// Removes the edge `(u, v)` if present. Returns whether the graph changed.
    pub fn remove_edge(&mut self, u: usize, v: usize) -> bool {
        let removed_u = Self::detach(&mut self.adjacency[u], v);
        let removed_v = Self::detach(&mut self.adjacency[v], u);
        removed_u || removed_v
    }

    fn detach(slot: &mut Option<Vec<usize>>, node: usize) -> bool {
        match slot {
            Some(neighbors) => match neighbors.iter().position(|&x| x == node) {
                Some(pos) => {
                    neighbors.remove(pos);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Neighbors of `u` in insertion order; empty for a deleted node.
    pub fn neighbors(&self, u: usize) -> &[usize] {
        self.adjacency[u].as_deref().unwrap_or(&[])
    }

    pub fn is_deleted(&self, u: usize) -> bool {
        self.adjacency[u].is_none()
    }

    /// Tombstones `u` and detaches it from every neighbor.
    pub fn delete_node(&mut self, u: usize) {
        if let Some(neighbors) = self.adjacency[u].take() {
            for v in neighbors {
                Self::detach(&mut self.adjacency[v], u);
            }
        }
    }

    pub fn delete_nodes(&mut self, nodes: &[usize]) {
        for &u in nodes {
            self.delete_node(u);
        }
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().flatten().map(Vec::len).sum::<usize>() / 2
    }

    pub fn get_edge_list(&self) -> Vec<(usize, usize)> {
        let mut edges = Vec::new();
        for (u, neighbors) in self.adjacency.iter().enumerate() {
            for &v in neighbors.iter().flatten() {
                if u < v {
                    edges.push((u, v));
                }
            }
        }
        edges
    }
}
