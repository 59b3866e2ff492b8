//! Operator front end for the network formation dynamics.
//!
//! Draws one random starting profile, writes it out, then for every
//! `--costs CE,CI` pair restores that profile, runs the dynamics and
//! writes the final profile.
//!
//! ```text
//! netform --nodes 20 --edges 30 --immunization-probability 0.2 \
//!     --adversary 2 --costs 1,2 --costs 3,0.5 --seed 7
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use netform::export::{final_file_name, initial_file_name};
use netform::{initialize, run_dynamics, save_profile, Adversary, Costs, DynamicsConfig, StrategyProfile};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

// -----------------------------------------------------------------------------
//  Arguments
// -----------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "netform")]
#[command(about = "Swapstable best-response dynamics with attacks and immunization")]
struct Cli {
    /// Number of players (nodes)
    #[arg(short, long)]
    nodes: usize,

    /// Number of edges in the initial graph, below n(n-1)/2
    #[arg(short, long)]
    edges: usize,

    /// Probability that a player starts immunized
    #[arg(short = 'p', long)]
    immunization_probability: f64,

    /// Adversary: 1 (single attack) or 2 (double attack)
    #[arg(short, long, default_value = "1")]
    adversary: Adversary,

    /// Edge and immunization cost pair, may be repeated
    #[arg(short, long = "costs", value_name = "CE,CI", value_parser = parse_costs, required = true)]
    costs: Vec<Costs>,

    /// Seed for the initial profile; drawn at random when absent
    #[arg(long)]
    seed: Option<u64>,

    /// Give up after this many sweeps
    #[arg(long)]
    max_sweeps: Option<usize>,

    /// Give up once a run has used this many seconds
    #[arg(long)]
    time_budget_secs: Option<u64>,

    /// Score candidate deviations in parallel
    #[arg(long)]
    parallel: bool,

    /// Directory for the CSV files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

fn parse_costs(s: &str) -> Result<Costs, String> {
    let (ce, ci) = s
        .split_once(',')
        .ok_or_else(|| format!("expected CE,CI, got '{s}'"))?;
    let ce: f64 = ce.trim().parse().map_err(|_| format!("bad edge cost '{ce}'"))?;
    let ci: f64 = ci.trim().parse().map_err(|_| format!("bad immunization cost '{ci}'"))?;
    let costs = Costs::new(ce, ci);
    costs.validate().map_err(|e| e.to_string())?;
    Ok(costs)
}

// -----------------------------------------------------------------------------
//  Main
// -----------------------------------------------------------------------------

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("netform=info,netform_cli=info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "simulation failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> netform::Result<()> {
    let seed = cli.seed.unwrap_or_else(rand::random);
    tracing::info!(
        nodes = cli.nodes,
        edges = cli.edges,
        p = cli.immunization_probability,
        seed,
        "drawing initial profile"
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let initial = initialize(cli.nodes, cli.edges, cli.immunization_probability, &mut rng)?;
    std::fs::create_dir_all(&cli.output_dir)?;
    let path = cli
        .output_dir
        .join(initial_file_name(cli.nodes, cli.edges, cli.immunization_probability));
    save_profile(&initial, &path)?;
    tracing::info!(path = %path.display(), "initial profile written");

    for &costs in &cli.costs {
        let mut config = DynamicsConfig::new(costs, cli.adversary).with_parallel(cli.parallel);
        config.max_sweeps = cli.max_sweeps;
        config.time_budget = cli.time_budget_secs.map(Duration::from_secs);

        let mut profile: StrategyProfile = initial.clone();
        let report = run_dynamics(&mut profile, &config)?;

        let path = cli.output_dir.join(final_file_name(
            cli.nodes,
            cli.edges,
            cli.immunization_probability,
            costs,
            cli.adversary,
        ));
        save_profile(&profile, &path)?;
        tracing::info!(
            edge_cost = costs.edge,
            immunization_cost = costs.immunization,
            outcome = ?report.outcome,
            sweeps = report.sweeps,
            path = %path.display(),
            "final profile written"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_cost_pairs() {
        assert_eq!(parse_costs("1.5, 2").unwrap(), Costs::new(1.5, 2.0));
        assert!(parse_costs("1.5").is_err());
        assert!(parse_costs("-1,2").is_err());
    }

    #[test]
    fn parses_repeated_costs() {
        let cli = Cli::try_parse_from([
            "netform", "-n", "5", "-e", "4", "-p", "0.5", "-a", "2", "-c", "1,1", "-c", "2,0",
        ])
        .unwrap();
        assert_eq!(cli.adversary, Adversary::DoubleAttack);
        assert_eq!(cli.costs, vec![Costs::new(1.0, 1.0), Costs::new(2.0, 0.0)]);
    }
}
