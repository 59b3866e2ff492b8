//! Network formation with attacks and immunization.
//!
//! Players buy edges and decide whether to immunize, knowing that an
//! adversary will destroy a maximum-size vulnerable region (or two). A
//! player's utility is the expected size of its component after the
//! attack minus what it paid. [`run_dynamics`] sweeps the players in
//! order, replacing each strategy with a swapstable best response, until
//! nobody wants to move.

pub mod adversary;
pub mod components;
pub mod engine;
pub mod error;
pub mod export;
pub mod graph;
pub mod init;
pub mod operations;
pub mod profile;
pub mod utility;

pub use adversary::{Adversary, ImmunizationView, VulnerableRegion};
pub use engine::{
    best_response, run_dynamics, BestResponse, DynamicsConfig, DynamicsOutcome, DynamicsReport,
    EquilibriumSearch,
};
pub use error::{NetformError, Result};
pub use export::{export_profile, load_profile, read_profile, save_profile, write_profile, ProfileRecord};
pub use graph::Graph;
pub use init::initialize;
pub use operations::{Candidate, Deviation};
pub use profile::{Strategy, StrategyProfile};
pub use utility::{Costs, Evaluator};
