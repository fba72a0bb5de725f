//! Shared default values for the demeflow configuration.
//! These values are used by the `init` command (via clap) and by the
//! overrides accepted by the other subcommands.

pub const CONFIG_FILE: &str = "demeflow.json";
pub const FORMAT: &str = "pretty";

// Habitat
pub const TOPOLOGY: &str = "triangular";
pub const ROWS: usize = 8;
pub const COLS: usize = 8;
pub const DEMES: usize = 10;

// Migration surface
pub const SURFACE: &str = "uniform";
pub const MIGRATION_RATE: f64 = 0.1;
pub const BARRIER_M_MIN: f64 = 0.01;
pub const BARRIER_M_MAX: f64 = 1.0;

// Simulation
pub const CHROM_LENGTH: f64 = 1.0;
pub const MUTATION_RATE: f64 = 1e-3;
pub const EFFECTIVE_SIZE: f64 = 1.0;
pub const SAMPLES_PER_DEME: usize = 10;
pub const NUM_REGIONS: usize = 10_000;

