mod args;
mod commands;
mod config;
pub mod defaults;
mod printing;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use args::{AnalysisArgs, InitArgs, OutputArgs};
use commands::{compare, distances, init, inspect, sfs};

/// demeflow: gene flow on deme graphs
///
/// Builds habitats of demes connected by migration, computes theoretical
/// distances between demes and compares them with genetic distance
/// observed in genotype data.
#[derive(Parser, Debug)]
#[command(name = "demeflow")]
#[command(author, version, about = "Compares migration-based distances with genetic distance", long_about = None)]
struct Cli {
    /// Number of threads to use for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a new habitat configuration.
    ///
    /// Writes topology, migration surface, simulation and analysis
    /// parameters to a JSON file used by the other commands.
    Init(Box<InitArgs>),

    /// Show a summary of the configured habitat.
    Inspect {
        /// Configuration path
        #[arg(short, long, default_value = defaults::CONFIG_FILE)]
        config: PathBuf,

        /// Also print the graph Laplacian
        #[arg(long)]
        laplacian: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Compute deme-level distance matrices.
    ///
    /// Geographic, resistance, random-walk and coalescent distances.
    Distances {
        /// Configuration path
        #[arg(short, long, default_value = defaults::CONFIG_FILE)]
        config: PathBuf,

        /// Distances to report (geographic, resistance, random_walk, coalescent); all if omitted
        #[arg(short = 'k', long = "kind")]
        kinds: Vec<String>,

        #[command(flatten)]
        analysis: AnalysisArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Correlate every predictor with the genetic distance of a genotype matrix.
    Compare {
        /// Configuration path
        #[arg(short, long, default_value = defaults::CONFIG_FILE)]
        config: PathBuf,

        /// Genotype matrix (JSON, or 0/1 text with one sample per line)
        #[arg(short, long)]
        genotypes: PathBuf,

        /// Include every (predicted, genetic) pair in JSON output
        #[arg(long)]
        pairs: bool,

        #[command(flatten)]
        analysis: AnalysisArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Site frequency spectrum of a genotype matrix.
    Sfs {
        /// Genotype matrix (JSON, or 0/1 text with one sample per line)
        #[arg(short, long)]
        genotypes: PathBuf,

        /// Drop rare variants below this frequency first
        #[arg(short, long)]
        epsilon: Option<f64>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match cli.command {
        Commands::Init(args) => {
            init::init_config(&args)?;
        }
        Commands::Inspect {
            config,
            laplacian,
            output,
        } => {
            inspect::inspect_habitat(&config, laplacian, &output)?;
        }
        Commands::Distances {
            config,
            kinds,
            analysis,
            output,
        } => {
            distances::compute_distances(&config, &kinds, &analysis, &output)?;
        }
        Commands::Compare {
            config,
            genotypes,
            pairs,
            analysis,
            output,
        } => {
            compare::compare_predictors(&config, &genotypes, pairs, &analysis, &output)?;
        }
        Commands::Sfs {
            genotypes,
            epsilon,
            output,
        } => {
            sfs::compute_sfs(&genotypes, epsilon, &output)?;
        }
    }

    Ok(())
}
