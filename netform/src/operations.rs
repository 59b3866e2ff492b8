use crate::graph::Graph;
use crate::profile::Strategy;

/// An edge move one player can make on its own strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deviation {
    /// Leave the purchased edges alone.
    Keep,
    /// Stop paying for the edge to `target`.
    Drop { target: usize },
    /// Buy a new edge to `target`.
    Buy { target: usize },
    /// Drop the edge to `dropped` and buy one to `bought` in the same move.
    Swap { dropped: usize, bought: usize },
}

impl Deviation {
    /// Applies the move for `player`, keeping `strategy` and `graph` in step.
    pub fn apply(&self, player: usize, strategy: &mut Strategy, graph: &mut Graph) {
        match *self {
            Deviation::Keep => {}
            Deviation::Drop { target } => self.apply_drop(player, strategy, graph, target),
            Deviation::Buy { target } => self.apply_buy(player, strategy, graph, target),
            Deviation::Swap { dropped, bought } => self.apply_swap(player, strategy, graph, dropped, bought),
        }
    }

    fn apply_buy(&self, player: usize, strategy: &mut Strategy, graph: &mut Graph, target: usize) {
        if graph.add_edge(player, target) {
            strategy.push_target(target);
        }
    }

    fn apply_drop(&self, player: usize, strategy: &mut Strategy, graph: &mut Graph, target: usize) {
        // Only edges the player paid for can be dropped.
        if !strategy.buys(target) {
            return;
        }
        strategy.remove_target(target);
        graph.remove_edge(player, target);
    }

    fn apply_swap(&self, player: usize, strategy: &mut Strategy, graph: &mut Graph, dropped: usize, bought: usize) {
        if !strategy.buys(dropped) || bought == player || graph.has_edge(player, bought) {
            return;
        }
        self.apply_drop(player, strategy, graph, dropped);
        self.apply_buy(player, strategy, graph, bought);
    }
}

/// A deviation, optionally paired with flipping the immunization flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub deviation: Deviation,
    pub toggle_immunization: bool,
}

impl Candidate {
    pub const BASELINE: Candidate = Candidate { deviation: Deviation::Keep, toggle_immunization: false };

    /// Builds the candidate on private copies of `strategy` and `graph`.
    pub fn materialize(&self, player: usize, strategy: &Strategy, graph: &Graph) -> (Strategy, Graph) {
        let mut strategy = strategy.clone();
        let mut graph = graph.clone();
        self.deviation.apply(player, &mut strategy, &mut graph);
        if self.toggle_immunization {
            strategy.toggle_immunization();
        }
        (strategy, graph)
    }
}

/// All swapstable deviations of `player`, in search order: the baseline,
/// its immunization toggle, then drops, buys and swaps, each followed by
/// the same move with immunization toggled.
pub fn enumerate_candidates(player: usize, strategy: &Strategy, graph: &Graph) -> Vec<Candidate> {
    let non_neighbors: Vec<usize> = (0..graph.num_nodes())
        .filter(|&j| j != player && !graph.has_edge(player, j))
        .collect();

    let mut moves = Vec::with_capacity(1 + strategy.edge_count() * (1 + non_neighbors.len()) + non_neighbors.len());
    moves.push(Deviation::Keep);
    moves.extend(strategy.bought().iter().map(|&target| Deviation::Drop { target }));
    moves.extend(non_neighbors.iter().map(|&target| Deviation::Buy { target }));
    for &dropped in strategy.bought() {
        moves.extend(non_neighbors.iter().map(|&bought| Deviation::Swap { dropped, bought }));
    }

    moves
        .into_iter()
        .flat_map(|deviation| {
            [
                Candidate { deviation, toggle_immunization: false },
                Candidate { deviation, toggle_immunization: true },
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::StrategyProfile;

    fn sample() -> StrategyProfile {
        // 0 buys 1, 2 buys 0; node 3 is isolated.
        StrategyProfile::from_strategies(vec![
            Strategy::new(vec![1], false),
            Strategy::new(vec![], false),
            Strategy::new(vec![0], false),
            Strategy::new(vec![], false),
        ])
        .unwrap()
    }

    #[test]
    fn swap_moves_the_edge() {
        let profile = sample();
        let swap = Candidate { deviation: Deviation::Swap { dropped: 1, bought: 3 }, toggle_immunization: true };
        let (strategy, graph) = swap.materialize(0, profile.strategy(0), profile.graph());

        assert_eq!(strategy.bought(), &[3]);
        assert!(strategy.immunized());
        assert!(!graph.has_edge(0, 1));
        assert!(graph.has_edge(0, 3));
        assert!(graph.has_edge(0, 2), "edges bought by others stay");
        assert!(profile.graph().has_edge(0, 1), "profile graph untouched");
    }

    #[test]
    fn cannot_drop_edge_bought_by_other_endpoint() {
        let profile = sample();
        let mut strategy = profile.strategy(0).clone();
        let mut graph = profile.graph().clone();
        Deviation::Drop { target: 2 }.apply(0, &mut strategy, &mut graph);
        assert!(graph.has_edge(0, 2));
        assert_eq!(strategy.bought(), &[1]);
    }

    #[test]
    fn candidates_follow_search_order() {
        let profile = sample();
        let candidates = enumerate_candidates(0, profile.strategy(0), profile.graph());
        let moves: Vec<Deviation> = candidates.iter().step_by(2).map(|c| c.deviation).collect();

        assert_eq!(
            moves,
            vec![
                Deviation::Keep,
                Deviation::Drop { target: 1 },
                Deviation::Buy { target: 3 },
                Deviation::Swap { dropped: 1, bought: 3 },
            ]
        );
        assert_eq!(candidates[0], Candidate::BASELINE);
        assert!(candidates[1].toggle_immunization);
        assert_eq!(candidates.len(), 8);
    }
}
