use crate::defaults;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Output configuration path
    #[arg(short, long, default_value = defaults::CONFIG_FILE)]
    pub output: PathBuf,

    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,

    /// Habitat topology (triangular, square, line, circle)
    #[arg(short = 'T', long, default_value = defaults::TOPOLOGY)]
    pub topology: String,

    /// Lattice rows (triangular and square topologies)
    #[arg(long, default_value_t = defaults::ROWS)]
    pub rows: usize,

    /// Lattice columns (triangular and square topologies)
    #[arg(long, default_value_t = defaults::COLS)]
    pub cols: usize,

    /// Number of demes (line and circle topologies)
    #[arg(short = 'd', long, default_value_t = defaults::DEMES)]
    pub demes: usize,

    /// Migration surface (uniform, asymmetric, barrier)
    #[arg(short = 's', long, default_value = defaults::SURFACE)]
    pub surface: String,

    /// Migration rate for the uniform and asymmetric surfaces
    #[arg(short = 'm', long, default_value_t = defaults::MIGRATION_RATE)]
    pub rate: f64,

    /// Lowest rate of the barrier surface
    #[arg(long, default_value_t = defaults::BARRIER_M_MIN)]
    pub m_min: f64,

    /// Highest rate of the barrier surface
    #[arg(long, default_value_t = defaults::BARRIER_M_MAX)]
    pub m_max: f64,

    /// Haploid samples per deme
    #[arg(short = 'n', long, default_value_t = defaults::SAMPLES_PER_DEME)]
    pub samples_per_deme: usize,

    /// Number of independent regions to simulate
    #[arg(long, default_value_t = defaults::NUM_REGIONS)]
    pub num_regions: usize,

    /// Per-site mutation rate
    #[arg(long, default_value_t = defaults::MUTATION_RATE)]
    pub mutation_rate: f64,

    /// Length of each simulated region
    #[arg(long, default_value_t = defaults::CHROM_LENGTH)]
    pub chrom_length: f64,

    /// Effective size of each deme
    #[arg(long, default_value_t = defaults::EFFECTIVE_SIZE)]
    pub effective_size: f64,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Analysis options shared by `init`, `distances` and `compare`.
#[derive(Args, Debug, Default)]
pub struct AnalysisArgs {
    /// Rare-variant threshold in [0, 0.5]
    #[arg(short = 'e', long)]
    pub epsilon: Option<f64>,

    /// Linear solver for coalescence times (cg, bicgstab, direct)
    #[arg(long)]
    pub solver: Option<String>,

    /// Relative residual tolerance of the iterative solver
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Iteration cap of the iterative solver
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Use the Laplacian as is for resistance distance
    #[arg(long)]
    pub no_symmetrize: bool,

    /// Skip the rare-variant filter
    #[arg(long)]
    pub no_filter: bool,
}

/// Output options shared by every reporting command.
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Output format (pretty, json)
    #[arg(short, long, default_value = defaults::FORMAT)]
    pub format: String,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
