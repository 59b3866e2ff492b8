//! The adversary and the vulnerable regions it targets.
//!
//! Removing every immunized node splits the graph into vulnerable regions.
//! The adversary only ever attacks regions of maximum size, picking
//! uniformly among them; an attacked region is destroyed entirely.

use std::fmt;
use std::str::FromStr;

use crate::components::{component_size, connected_components};
use crate::graph::Graph;
use crate::profile::Strategy;

/// Node set of one connected component left after immunized nodes are removed.
pub type VulnerableRegion = Vec<usize>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Adversary {
    /// Destroys one maximum-size vulnerable region.
    SingleAttack,
    /// Destroys up to two vulnerable regions.
    DoubleAttack,
}

impl Adversary {
    pub fn attacks(&self) -> u8 {
        match self {
            Adversary::SingleAttack => 1,
            Adversary::DoubleAttack => 2,
        }
    }
}

impl fmt::Display for Adversary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Adversary::SingleAttack => write!(f, "single"),
            Adversary::DoubleAttack => write!(f, "double"),
        }
    }
}

impl FromStr for Adversary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "single" => Ok(Adversary::SingleAttack),
            "2" | "double" => Ok(Adversary::DoubleAttack),
            other => Err(format!("unknown adversary '{other}', expected 1, 2, single or double")),
        }
    }
}

/// Immunization status of every node when one player deviates and
/// everybody else keeps their profile strategy.
#[derive(Clone, Copy, Debug)]
pub struct ImmunizationView<'a> {
    strategies: &'a [Strategy],
    player: usize,
    immunized: bool,
}

impl<'a> ImmunizationView<'a> {
    pub fn new(strategies: &'a [Strategy], player: usize, immunized: bool) -> Self {
        ImmunizationView { strategies, player, immunized }
    }

    pub fn is_immunized(&self, node: usize) -> bool {
        if node == self.player {
            self.immunized
        } else {
            self.strategies[node].immunized()
        }
    }
}

/// Components of `graph` once every immunized node is removed.
pub fn vulnerable_regions(graph: &Graph, view: &ImmunizationView<'_>) -> Vec<VulnerableRegion> {
    let mut survivors = graph.clone();
    for node in 0..graph.num_nodes() {
        if view.is_immunized(node) {
            survivors.delete_node(node);
        }
    }
    connected_components(&survivors)
}

/// Keeps only the regions of strictly maximal size, ties included.
pub fn max_size_regions(regions: Vec<VulnerableRegion>) -> Vec<VulnerableRegion> {
    let max = regions.iter().map(Vec::len).max().unwrap_or(0);
    regions.into_iter().filter(|r| r.len() == max).collect()
}

/// The regions the adversary may attack: vulnerable regions of maximum size.
pub fn targeted_regions(graph: &Graph, view: &ImmunizationView<'_>) -> Vec<VulnerableRegion> {
    max_size_regions(vulnerable_regions(graph, view))
}

/// Expected size of `player`'s component after the adversary strikes.
pub fn expected_component_size(
    player: usize,
    graph: &Graph,
    view: &ImmunizationView<'_>,
    adversary: Adversary,
) -> f64 {
    let targets = targeted_regions(graph, view);
    if targets.is_empty() {
        // nothing to attack
        return component_size(graph, player) as f64;
    }

    match adversary {
        Adversary::SingleAttack => expected_size_single_attack(player, graph, &targets),
        Adversary::DoubleAttack if targets.len() == 1 => {
            expected_size_unique_target(player, graph, view, &targets[0])
        }
        Adversary::DoubleAttack => expected_size_pair_attack(player, graph, &targets),
    }
}

/// One region out of `targets`, each with probability `1 / |targets|`.
pub fn expected_size_single_attack(player: usize, graph: &Graph, targets: &[VulnerableRegion]) -> f64 {
    let prob = 1.0 / targets.len() as f64;
    targets
        .iter()
        .map(|target| {
            let mut attacked = graph.clone();
            attacked.delete_nodes(target);
            prob * component_size(&attacked, player) as f64
        })
        .sum()
}

/// Double attack with a unique largest region: it always falls, then the
/// adversary strikes once more among the largest regions left over.
fn expected_size_unique_target(
    player: usize,
    graph: &Graph,
    view: &ImmunizationView<'_>,
    target: &VulnerableRegion,
) -> f64 {
    let mut attacked = graph.clone();
    attacked.delete_nodes(target);

    let next = targeted_regions(&attacked, view);
    if next.is_empty() {
        component_size(&attacked, player) as f64
    } else {
        expected_size_single_attack(player, &attacked, &next)
    }
}

/// Double attack over an unordered pair of distinct largest regions,
/// each pair with probability `2 / (k (k - 1))`.
fn expected_size_pair_attack(player: usize, graph: &Graph, targets: &[VulnerableRegion]) -> f64 {
    let k = targets.len() as f64;
    let prob = 2.0 / (k * (k - 1.0));

    let mut expected = 0.0;
    for (idx, first) in targets.iter().enumerate() {
        let mut without_first = graph.clone();
        without_first.delete_nodes(first);

        for second in &targets[idx + 1..] {
            let mut attacked = without_first.clone();
            attacked.delete_nodes(second);
            expected += prob * component_size(&attacked, player) as f64;
        }
    }
    expected
}
