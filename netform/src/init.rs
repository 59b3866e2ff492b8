use rand::Rng;

use crate::error::{NetformError, Result};
use crate::graph::Graph;
use crate::operations::Deviation;
use crate::profile::{Strategy, StrategyProfile};

/// Random starting profile: every player immunizes with probability
/// `immunization_probability`, then `num_edges` distinct edges are drawn
/// uniformly and each is bought by a fair coin flip between its endpoints.
///
/// Requires `num_nodes > 0`, `0 < num_edges < n (n - 1) / 2` and a
/// probability in `[0, 1]`. Nothing is drawn before the checks pass.
pub fn initialize<R: Rng>(
    num_nodes: usize,
    num_edges: usize,
    immunization_probability: f64,
    rng: &mut R,
) -> Result<StrategyProfile> {
    if num_nodes == 0 {
        return Err(NetformError::InvalidNodeCount(num_nodes));
    }
    let max = num_nodes * (num_nodes - 1) / 2;
    if num_edges == 0 || num_edges >= max {
        return Err(NetformError::InvalidEdgeCount { edges: num_edges, max });
    }
    if !(0.0..=1.0).contains(&immunization_probability) {
        return Err(NetformError::InvalidProbability(immunization_probability));
    }

    let mut strategies = vec![Strategy::default(); num_nodes];
    let mut graph = Graph::new(num_nodes);

    for strategy in &mut strategies {
        strategy.set_immunized(rng.gen_bool(immunization_probability));
    }

    let mut placed = 0;
    while placed < num_edges {
        let u = rng.gen_range(0..num_nodes);
        let v = rng.gen_range(0..num_nodes);
        if u == v || graph.has_edge(u, v) {
            continue;
        }
        let (buyer, target) = if rng.gen_bool(0.5) { (u, v) } else { (v, u) };
        Deviation::Buy { target }.apply(buyer, &mut strategies[buyer], &mut graph);
        placed += 1;
    }

    tracing::debug!(
        nodes = num_nodes,
        edges = num_edges,
        immunized = strategies.iter().filter(|s| s.immunized()).count(),
        "initialized random profile"
    );

    StrategyProfile::from_strategies(strategies)
}
