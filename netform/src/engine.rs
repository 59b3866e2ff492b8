use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::adversary::Adversary;
use crate::error::{NetformError, Result};
use crate::graph::Graph;
use crate::operations::{enumerate_candidates, Candidate};
use crate::profile::{Strategy, StrategyProfile};
use crate::utility::{Costs, Evaluator};

/// Parameters of one dynamics run.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicsConfig {
    pub costs: Costs,
    pub adversary: Adversary,
    /// Stop after this many sweeps. `None` sweeps until equilibrium,
    /// which may never happen.
    pub max_sweeps: Option<usize>,
    /// Checked between sweeps.
    pub time_budget: Option<Duration>,
    /// Score one player's candidate deviations on the rayon pool.
    pub parallel: bool,
}

impl DynamicsConfig {
    pub fn new(costs: Costs, adversary: Adversary) -> Self {
        DynamicsConfig {
            costs,
            adversary,
            max_sweeps: None,
            time_budget: None,
            parallel: false,
        }
    }

    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = Some(max_sweeps);
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.costs.validate()?;
        if self.max_sweeps == Some(0) {
            return Err(NetformError::InvalidSweepLimit);
        }
        Ok(())
    }
}

/// A player's best deviation and the graph it induces.
#[derive(Clone, Debug)]
pub struct BestResponse {
    pub strategy: Strategy,
    pub graph: Graph,
    pub utility: f64,
    pub candidate: Candidate,
}

impl BestResponse {
    /// True when no deviation strictly beats the current strategy.
    pub fn is_stable(&self) -> bool {
        self.candidate == Candidate::BASELINE
    }
}

/// Exhaustive swapstable best response of `player` with everyone else fixed.
///
/// Candidates are scored in search order; a later one wins only with a
/// strictly higher utility, so ties keep the earliest, starting with the
/// current strategy.
pub fn best_response(profile: &StrategyProfile, player: usize, config: &DynamicsConfig) -> Result<BestResponse> {
    profile.check_player(player)?;
    config.validate()?;
    Ok(search_best_response(profile, player, config))
}

// Callers have already checked `player` and `config`.
fn search_best_response(profile: &StrategyProfile, player: usize, config: &DynamicsConfig) -> BestResponse {
    let current = profile.strategy(player);
    let graph = profile.graph();
    let evaluator = Evaluator::new(profile.strategies(), config.costs, config.adversary);
    let candidates = enumerate_candidates(player, current, graph);

    let score = |candidate: &Candidate| {
        let (strategy, graph) = candidate.materialize(player, current, graph);
        evaluator.utility(player, &strategy, &graph)
    };

    let (best_idx, utility) = if config.parallel {
        candidates
            .par_iter()
            .enumerate()
            .map(|(idx, candidate)| (idx, score(candidate)))
            .reduce_with(prefer)
            .unwrap_or((0, f64::NEG_INFINITY))
    } else {
        candidates
            .iter()
            .enumerate()
            .map(|(idx, candidate)| (idx, score(candidate)))
            .reduce(prefer)
            .unwrap_or((0, f64::NEG_INFINITY))
    };

    let candidate = candidates[best_idx];
    let (strategy, graph) = candidate.materialize(player, current, graph);
    BestResponse { strategy, graph, utility, candidate }
}

// Higher utility wins, the earlier candidate on ties.
fn prefer(a: (usize, f64), b: (usize, f64)) -> (usize, f64) {
    if b.1 > a.1 || (b.1 == a.1 && b.0 < a.0) {
        b
    } else {
        a
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DynamicsOutcome {
    /// A full sweep changed nothing: swapstable equilibrium.
    Equilibrium,
    /// `max_sweeps` sweeps ran without reaching equilibrium.
    SweepLimit,
    /// The time budget ran out between sweeps.
    TimeBudget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DynamicsReport {
    pub outcome: DynamicsOutcome,
    pub sweeps: usize,
    /// Total number of strategy replacements across all sweeps.
    pub changes: usize,
}

/// Sequential best-response dynamics over a borrowed profile.
///
/// Players update in index order and each one sees the updates already
/// made in the same sweep.
pub struct EquilibriumSearch<'p> {
    profile: &'p mut StrategyProfile,
    config: DynamicsConfig,
    sweeps: usize,
    changes: usize,
}

impl<'p> EquilibriumSearch<'p> {
    pub fn new(profile: &'p mut StrategyProfile, config: DynamicsConfig) -> Result<Self> {
        config.validate()?;
        Ok(EquilibriumSearch { profile, config, sweeps: 0, changes: 0 })
    }

    pub fn profile(&self) -> &StrategyProfile {
        &*self.profile
    }

    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// One pass over all players. Returns how many changed strategy.
    pub fn sweep(&mut self) -> Result<usize> {
        let mut changed = 0;
        for player in 0..self.profile.num_players() {
            let response = search_best_response(&*self.profile, player, &self.config);
            if response.strategy != *self.profile.strategy(player) {
                tracing::trace!(player, utility = response.utility, "adopting best response");
                self.profile.replace(player, response.strategy, response.graph);
                changed += 1;
            }
        }

        self.sweeps += 1;
        self.changes += changed;
        tracing::debug!(sweep = self.sweeps, changed, "sweep finished");
        Ok(changed)
    }

    /// Sweeps until a sweep changes nothing or a configured bound is hit.
    pub fn run(&mut self) -> Result<DynamicsReport> {
        let start = Instant::now();
        tracing::info!(
            players = self.profile.num_players(),
            edge_cost = self.config.costs.edge,
            immunization_cost = self.config.costs.immunization,
            adversary = %self.config.adversary,
            "starting best-response dynamics"
        );

        let outcome = loop {
            if self.sweep()? == 0 {
                break DynamicsOutcome::Equilibrium;
            }
            if self.config.max_sweeps.map_or(false, |max| self.sweeps >= max) {
                break DynamicsOutcome::SweepLimit;
            }
            if self.config.time_budget.map_or(false, |budget| start.elapsed() >= budget) {
                break DynamicsOutcome::TimeBudget;
            }
        };

        let report = DynamicsReport { outcome, sweeps: self.sweeps, changes: self.changes };
        match outcome {
            DynamicsOutcome::Equilibrium => tracing::info!(
                sweeps = report.sweeps,
                changes = report.changes,
                edges = self.profile.edge_count(),
                immunized = self.profile.immunized_count(),
                "reached swapstable equilibrium"
            ),
            _ => tracing::warn!(
                sweeps = report.sweeps,
                changes = report.changes,
                ?outcome,
                "stopped before equilibrium"
            ),
        }
        Ok(report)
    }
}

/// Runs the dynamics on `profile` in place.
pub fn run_dynamics(profile: &mut StrategyProfile, config: &DynamicsConfig) -> Result<DynamicsReport> {
    EquilibriumSearch::new(profile, config.clone())?.run()
}
