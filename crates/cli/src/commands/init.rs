use anyhow::{Context, Result};
use demeflow_sim::habitat::{HabitatConfig, SurfaceConfig, Topology};
use demeflow_sim::simulation::SimulationParameters;

use crate::args::InitArgs;
use crate::commands::apply_analysis_args;
use crate::config::{AnalysisConfig, Configuration};
use crate::printing::print_configuration;

pub fn init_config(args: &InitArgs) -> Result<()> {
    let output = &args.output;
    if output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite it",
            output.display()
        );
    }

    println!("🌍 demeflow - gene flow on deme graphs");
    println!("======================================\n");

    let config = build_config(args)?;
    config.validate()?;
    let habitat = config
        .habitat
        .build()
        .context("Failed to build the configured habitat")?;

    println!("Configuration:");
    print_configuration(&config);

    let summary = habitat.summary()?;
    println!(
        "✓ Habitat has {} demes and {} directed edges",
        summary.demes, summary.edges
    );
    if !summary.connected {
        log::warn!("The habitat is disconnected; distance commands will fail");
    }

    config.save(output)?;
    println!("✓ Configuration written to {}", output.display());
    Ok(())
}

pub fn build_config(args: &InitArgs) -> Result<Configuration> {
    let topology = parse_topology(&args.topology, args.rows, args.cols, args.demes)?;
    let surface = parse_surface(&args.surface, args.rate, args.m_min, args.m_max)?;
    let simulation = SimulationParameters {
        chrom_length: args.chrom_length,
        mutation_rate: args.mutation_rate,
        effective_size: args.effective_size,
        samples_per_deme: args.samples_per_deme,
        num_regions: args.num_regions,
    };
    let analysis = apply_analysis_args(AnalysisConfig::default(), &args.analysis)?;

    Ok(Configuration {
        habitat: HabitatConfig::new(topology, surface),
        simulation,
        analysis,
    })
}

pub fn parse_topology(name: &str, rows: usize, cols: usize, demes: usize) -> Result<Topology> {
    match name {
        "triangular" | "triangular-lattice" => Ok(Topology::TriangularLattice { rows, cols }),
        "square" | "square-lattice" => Ok(Topology::SquareLattice { rows, cols }),
        "line" => Ok(Topology::Line { demes }),
        "circle" | "ring" => Ok(Topology::Circle { demes }),
        _ => anyhow::bail!("Unknown topology '{name}'. Use: triangular, square, line or circle"),
    }
}

pub fn parse_surface(name: &str, rate: f64, m_min: f64, m_max: f64) -> Result<SurfaceConfig> {
    match name {
        "uniform" => Ok(SurfaceConfig::Uniform { rate }),
        "asymmetric" | "asymmetric-uniform" => Ok(SurfaceConfig::AsymmetricUniform { rate }),
        "barrier" | "quadratic-barrier" => Ok(SurfaceConfig::QuadraticBarrier { m_min, m_max }),
        _ => anyhow::bail!("Unknown surface '{name}'. Use: uniform, asymmetric or barrier"),
    }
}
