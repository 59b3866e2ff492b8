use netform::{
    best_response, initialize, load_profile, run_dynamics, save_profile, Adversary, Costs, DynamicsConfig,
    DynamicsOutcome, EquilibriumSearch, ImmunizationView, Strategy, StrategyProfile,
};
use netform::adversary::vulnerable_regions;
use rand::rngs::StdRng;
use rand::SeedableRng;

// Two players, 0 buys the edge to 1, nobody immunized.
fn setup_pair() -> StrategyProfile {
    StrategyProfile::from_strategies(vec![
        Strategy::new(vec![1], false),
        Strategy::new(vec![], false),
    ])
    .unwrap()
}

fn setup_random(seed: u64) -> StrategyProfile {
    let mut rng = StdRng::seed_from_u64(seed);
    initialize(8, 10, 0.4, &mut rng).unwrap()
}

fn sorted_edges(profile: &StrategyProfile) -> Vec<(usize, usize)> {
    let mut edges = profile.graph().get_edge_list();
    edges.sort_unstable();
    edges
}

#[test]
fn test_pair_without_costs_is_wiped_out() {
    let profile = setup_pair();
    let view = ImmunizationView::new(profile.strategies(), 0, false);
    let regions = vulnerable_regions(profile.graph(), &view);
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].len(), 2);

    let utilities = profile.utilities(Costs::new(0.0, 0.0), Adversary::SingleAttack);
    assert_eq!(utilities, vec![0.0, 0.0]);
}

#[test]
fn test_expensive_edge_is_dropped() {
    let profile = setup_pair();
    let config = DynamicsConfig::new(Costs::new(10.0, 0.0), Adversary::SingleAttack);
    let response = best_response(&profile, 0, &config).unwrap();

    assert!(response.strategy.bought().is_empty(), "edge should be dropped");
    assert!(!response.graph.has_edge(0, 1));
    assert!(profile.graph().has_edge(0, 1), "profile must stay untouched");
}

#[test]
fn test_immunized_middle_of_path() {
    let profile = StrategyProfile::from_strategies(vec![
        Strategy::new(vec![1], false),
        Strategy::new(vec![2], true),
        Strategy::new(vec![], false),
    ])
    .unwrap();
    let view = ImmunizationView::new(profile.strategies(), 0, false);
    let mut regions = vulnerable_regions(profile.graph(), &view);
    regions.sort();
    assert_eq!(regions, vec![vec![0], vec![2]]);

    // {0} falls half the time; otherwise 0 stays attached to 1.
    let utilities = profile.utilities(Costs::new(0.0, 0.0), Adversary::SingleAttack);
    assert!((utilities[0] - 1.0).abs() < 1e-12);
    assert!((utilities[2] - 1.0).abs() < 1e-12);
}

#[test]
fn test_fully_immunized_profile_has_no_targets() {
    let profile = StrategyProfile::from_strategies(vec![
        Strategy::new(vec![1], true),
        Strategy::new(vec![2], true),
        Strategy::new(vec![], true),
        Strategy::new(vec![], true),
    ])
    .unwrap();

    for player in 0..4 {
        let view = ImmunizationView::new(profile.strategies(), player, true);
        assert!(vulnerable_regions(profile.graph(), &view).is_empty());
    }
    let utilities = profile.utilities(Costs::new(1.0, 0.5), Adversary::DoubleAttack);
    assert_eq!(utilities, vec![3.0 - 1.5, 3.0 - 1.5, 3.0 - 0.5, 1.0 - 0.5]);
}

#[test]
fn test_best_response_never_worse() {
    for adversary in [Adversary::SingleAttack, Adversary::DoubleAttack] {
        let profile = setup_random(11);
        let costs = Costs::new(0.7, 1.3);
        let config = DynamicsConfig::new(costs, adversary);
        let current = profile.utilities(costs, adversary);

        for player in 0..profile.num_players() {
            let response = best_response(&profile, player, &config).unwrap();
            assert!(response.utility >= current[player], "player {player} got worse");
            if response.is_stable() {
                assert_eq!(&response.strategy, profile.strategy(player));
            }
        }
    }
}

#[test]
fn test_parallel_search_matches_sequential() {
    let profile = setup_random(5);
    let sequential = DynamicsConfig::new(Costs::new(0.5, 2.0), Adversary::DoubleAttack);
    let parallel = sequential.clone().with_parallel(true);

    for player in 0..profile.num_players() {
        let a = best_response(&profile, player, &sequential).unwrap();
        let b = best_response(&profile, player, &parallel).unwrap();
        assert_eq!(a.candidate, b.candidate);
        assert_eq!(a.strategy, b.strategy);
        assert_eq!(a.graph, b.graph);
    }
}

#[test]
fn test_expensive_world_reaches_equilibrium_and_stays() {
    // Edges and immunization cost more than any component is worth.
    let mut profile = setup_random(3);
    let config = DynamicsConfig::new(Costs::new(10.0, 10.0), Adversary::SingleAttack).with_max_sweeps(100);

    let report = run_dynamics(&mut profile, &config).unwrap();
    assert_eq!(report.outcome, DynamicsOutcome::Equilibrium);
    assert_eq!(profile.edge_count(), 0);
    assert_eq!(profile.immunized_count(), 0);

    let again = run_dynamics(&mut profile, &config).unwrap();
    assert_eq!(again.outcome, DynamicsOutcome::Equilibrium);
    assert_eq!(again.sweeps, 1);
    assert_eq!(again.changes, 0);
}

#[test]
fn test_bounded_dynamics_keep_profile_consistent() {
    for adversary in [Adversary::SingleAttack, Adversary::DoubleAttack] {
        let mut profile = setup_random(21);
        let config = DynamicsConfig::new(Costs::new(0.4, 0.9), adversary).with_max_sweeps(3);
        run_dynamics(&mut profile, &config).unwrap();

        let rebuilt = StrategyProfile::from_strategies(profile.strategies().to_vec()).unwrap();
        assert_eq!(sorted_edges(&rebuilt), sorted_edges(&profile));
    }
}

#[test]
fn test_snapshot_restore_between_runs() {
    let initial = setup_random(8);
    let config = DynamicsConfig::new(Costs::new(10.0, 10.0), Adversary::SingleAttack).with_max_sweeps(100);

    let mut first = initial.clone();
    run_dynamics(&mut first, &config).unwrap();
    let mut second = initial.clone();
    run_dynamics(&mut second, &config).unwrap();

    assert_eq!(first, second);
    assert_ne!(first, initial);
}

#[test]
fn test_save_and_load_profile() {
    let profile = setup_random(99);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.csv");

    save_profile(&profile, &path).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("8\n"), "header should hold the player count");
    assert!(content.lines().skip(1).all(|l| l.ends_with(",-1")));

    let loaded = load_profile(&path).unwrap();
    assert_eq!(loaded, profile);
}

#[test]
fn test_manual_sweeps() {
    let mut profile = setup_pair();
    let config = DynamicsConfig::new(Costs::new(10.0, 0.0), Adversary::SingleAttack);
    let mut search = EquilibriumSearch::new(&mut profile, config).unwrap();

    // Player 0 drops its edge and immunizes, then 1 immunizes too.
    assert_eq!(search.sweep().unwrap(), 2);
    assert_eq!(search.sweep().unwrap(), 0);
    assert_eq!(search.sweeps(), 2);
    assert_eq!(search.profile().edge_count(), 0);
    assert_eq!(search.profile().immunized_count(), 2);
}
