use crate::adversary::{expected_component_size, Adversary, ImmunizationView};
use crate::error::{NetformError, Result};
use crate::graph::Graph;
use crate::profile::Strategy;

/// Price of one purchased edge and of immunization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Costs {
    pub edge: f64,
    pub immunization: f64,
}

impl Costs {
    pub fn new(edge: f64, immunization: f64) -> Self {
        Costs { edge, immunization }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("edge cost", self.edge), ("immunization cost", self.immunization)] {
            if !value.is_finite() || value < 0.0 {
                return Err(NetformError::NegativeCost { name, value });
            }
        }
        Ok(())
    }

    /// What `strategy` pays: one edge price per purchase, plus immunization.
    pub fn of(&self, strategy: &Strategy) -> f64 {
        let immunization = if strategy.immunized() { self.immunization } else { 0.0 };
        strategy.edge_count() as f64 * self.edge + immunization
    }
}

/// Scores hypothetical strategies of one player against the fixed
/// strategies of everyone else.
#[derive(Clone, Copy, Debug)]
pub struct Evaluator<'a> {
    strategies: &'a [Strategy],
    costs: Costs,
    adversary: Adversary,
}

impl<'a> Evaluator<'a> {
    pub fn new(strategies: &'a [Strategy], costs: Costs, adversary: Adversary) -> Self {
        Evaluator { strategies, costs, adversary }
    }

    /// Expected post-attack component size of `player` minus what it pays,
    /// when it plays `strategy` and `graph` is the induced graph.
    pub fn utility(&self, player: usize, strategy: &Strategy, graph: &Graph) -> f64 {
        let view = ImmunizationView::new(self.strategies, player, strategy.immunized());
        let expected = expected_component_size(player, graph, &view, self.adversary);
        expected - self.costs.of(strategy)
    }
}
