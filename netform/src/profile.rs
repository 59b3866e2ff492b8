use std::collections::HashSet;

use crate::adversary::Adversary;
use crate::error::{NetformError, Result};
use crate::graph::Graph;
use crate::utility::{Costs, Evaluator};

/// One player's choice: the nodes it buys edges to, and whether it immunizes.
///
/// `bought` keeps purchase order. Equality ignores that order.
#[derive(Clone, Debug, Default)]
pub struct Strategy {
    bought: Vec<usize>,
    immunized: bool,
}

impl Strategy {
    pub fn new(bought: Vec<usize>, immunized: bool) -> Self {
        Strategy { bought, immunized }
    }

    pub fn bought(&self) -> &[usize] {
        &self.bought
    }

    pub fn immunized(&self) -> bool {
        self.immunized
    }

    pub fn set_immunized(&mut self, immunized: bool) {
        self.immunized = immunized;
    }

    pub fn toggle_immunization(&mut self) {
        self.immunized = !self.immunized;
    }

    pub fn buys(&self, target: usize) -> bool {
        self.bought.contains(&target)
    }

    pub fn edge_count(&self) -> usize {
        self.bought.len()
    }

    pub(crate) fn push_target(&mut self, target: usize) {
        self.bought.push(target);
    }

    pub(crate) fn remove_target(&mut self, target: usize) {
        self.bought.retain(|&x| x != target);
    }
}

impl PartialEq for Strategy {
    fn eq(&self, other: &Self) -> bool {
        if self.immunized != other.immunized || self.bought.len() != other.bought.len() {
            return false;
        }
        let mut a = self.bought.clone();
        let mut b = other.bought.clone();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }
}

impl Eq for Strategy {}

/// The strategies of all players together with the graph they induce.
///
/// A player's strategy and the graph are only ever replaced together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrategyProfile {
    strategies: Vec<Strategy>,
    graph: Graph,
}

impl StrategyProfile {
    /// `n` players with no edges and nobody immunized.
    pub fn empty(num_players: usize) -> Self {
        StrategyProfile {
            strategies: vec![Strategy::default(); num_players],
            graph: Graph::new(num_players),
        }
    }

    /// Builds the graph induced by `strategies`, rejecting loops,
    /// out-of-range targets and edges bought more than once.
    pub fn from_strategies(strategies: Vec<Strategy>) -> Result<Self> {
        let n = strategies.len();
        if n == 0 {
            return Err(NetformError::InvalidNodeCount(0));
        }

        let mut graph = Graph::new(n);
        for (player, strategy) in strategies.iter().enumerate() {
            let mut seen = HashSet::new();
            for &target in strategy.bought() {
                if target >= n {
                    return Err(NetformError::NodeOutOfRange { node: target, num_nodes: n });
                }
                if target == player {
                    return Err(NetformError::InvalidStrategy {
                        player,
                        reason: "buys an edge to itself".to_string(),
                    });
                }
                if !seen.insert(target) || !graph.add_edge(player, target) {
                    return Err(NetformError::InvalidStrategy {
                        player,
                        reason: format!("edge ({player}, {target}) is bought more than once"),
                    });
                }
            }
        }

        Ok(StrategyProfile { strategies, graph })
    }

    pub fn num_players(&self) -> usize {
        self.strategies.len()
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn strategy(&self, player: usize) -> &Strategy {
        &self.strategies[player]
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn immunized_count(&self) -> usize {
        self.strategies.iter().filter(|s| s.immunized()).count()
    }

    /// Utility of every player under the current profile.
    pub fn utilities(&self, costs: Costs, adversary: Adversary) -> Vec<f64> {
        let evaluator = Evaluator::new(&self.strategies, costs, adversary);
        (0..self.num_players())
            .map(|i| evaluator.utility(i, &self.strategies[i], &self.graph))
            .collect()
    }

    pub(crate) fn check_player(&self, player: usize) -> Result<()> {
        if player >= self.num_players() {
            return Err(NetformError::NodeOutOfRange { node: player, num_nodes: self.num_players() });
        }
        Ok(())
    }

    /// Replaces one player's strategy and the graph in one step.
    pub(crate) fn replace(&mut self, player: usize, strategy: Strategy, graph: Graph) {
        self.strategies[player] = strategy;
        self.graph = graph;
    }
}
