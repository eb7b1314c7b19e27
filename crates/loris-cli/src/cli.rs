//! CLI argument definitions: top-level `Cli` struct and `Commands` enum.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loris")]
#[command(about = "CEGAR pattern-collection generator for finite-domain planning tasks")]
#[command(version)]
pub(crate) struct Cli {
    /// Progress reporting: silent | normal | verbose
    #[arg(long, global = true, default_value = "normal")]
    pub(crate) verbosity: String,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Generate a pattern collection for a task file
    Generate {
        /// Path to the JSON task file
        file: PathBuf,

        /// RNG seed; identical seeds reproduce identical runs
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Maximum number of refinements (default: unlimited)
        #[arg(long)]
        max_refinements: Option<u64>,

        /// Maximum number of abstract states per PDB (not applied to the
        /// initial goal patterns)
        #[arg(long, default_value_t = 1_000_000)]
        max_pdb_size: u64,

        /// Limit for the summed size of all PDBs (default: unlimited)
        #[arg(long)]
        max_collection_size: Option<u64>,

        /// Extract wildcard plans instead of one operator per step
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        wildcard_plans: bool,

        /// Ignore goal violations and consequently generate a single pattern
        #[arg(long, default_value_t = false)]
        ignore_goal_violations: bool,

        /// Number of randomly drawn non-goal variables to blacklist up
        /// front; "all" blacklists every non-goal variable
        #[arg(long, default_value = "0")]
        global_blacklist_size: String,

        /// Initial collection: given-goal | random-goal | all-goals
        #[arg(long, default_value = "all-goals")]
        initial: String,

        /// Goal variable seeding the collection when --initial given-goal
        #[arg(long)]
        given_goal: Option<usize>,

        /// Wall-clock budget in seconds (default: unlimited)
        #[arg(long)]
        max_time: Option<f64>,

        /// Print the report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Check that a task file is well-formed
    Validate {
        /// Path to the JSON task file
        file: PathBuf,
    },
}
