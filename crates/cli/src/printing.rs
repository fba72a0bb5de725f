use crate::config::Configuration;
use demeflow_sim::habitat::HabitatSummary;
use demeflow_sim::simulation::SimulationParameters;
use nalgebra::DMatrix;

/// Rows of a matrix as nested vectors, for JSON output.
pub fn matrix_rows(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    m.row_iter().map(|row| row.iter().copied().collect()).collect()
}

/// Fixed-width rendering of a matrix under a title.
pub fn format_matrix(title: &str, m: &DMatrix<f64>) -> String {
    let mut out = format!("\n{title} ({}x{})\n", m.nrows(), m.ncols());
    for row in m.row_iter() {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:>10.4}")).collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

pub fn print_configuration(config: &Configuration) {
    let sim = &config.simulation;
    let analysis = &config.analysis;

    println!("\n🌍 Habitat");
    println!("  • Topology: {} [--topology]", config.habitat.topology);
    println!("  • Demes: {}", config.habitat.topology.demes());
    println!("  • Migration Surface: {} [--surface]", config.habitat.surface);

    println!("\n🧬 Simulation Parameters");
    println!(
        "  • Samples per Deme: {} [-n, --samples-per-deme]",
        sim.samples_per_deme
    );
    println!("  • Regions: {} [--num-regions]", sim.num_regions);
    println!("  • Mutation Rate: {:.2e} [--mutation-rate]", sim.mutation_rate);
    println!("  • Region Length: {} [--chrom-length]", sim.chrom_length);
    println!("  • Effective Size: {} [--effective-size]", sim.effective_size);

    println!("\n📐 Analysis");
    if analysis.filter {
        println!("  • Rare-variant Threshold: {} [-e, --epsilon]", analysis.epsilon);
    } else {
        println!("  • Rare-variant Filter: Disabled [--no-filter]");
    }
    println!(
        "  • Solver: {} (tolerance {:.1e}) [--solver, --tolerance]",
        analysis.distances.solver.method, analysis.distances.solver.tolerance
    );
    println!(
        "  • Symmetrize Laplacian: {} [--no-symmetrize]",
        analysis.distances.symmetrize
    );
    println!();
}

pub fn format_summary(summary: &HabitatSummary) -> String {
    format!(
        "\n📊 Habitat Summary\n\
         ==================\n\
         Topology: {}\n\
         Demes: {}\n\
         Directed edges: {} ({} with positive rate)\n\
         Rates: {:.4} to {:.4}\n\
         Symmetric: {}\n\
         Connected: {}\n",
        summary.topology,
        summary.demes,
        summary.edges,
        summary.nonzero_edges,
        summary.min_rate,
        summary.max_rate,
        if summary.symmetric { "yes" } else { "no" },
        if summary.connected { "yes" } else { "no" },
    )
}

/// Simulation parameters as stored in the configuration. They drive
/// `GenotypeSimulator` backends; `compare` only checks genotype files
/// against the expected sample count.
pub fn format_simulation(params: &SimulationParameters, demes: usize) -> String {
    format!(
        "\n🧬 Simulation Parameters (for simulator backends)\n\
         Samples per deme: {} ({} expected in genotype files)\n\
         Regions: {}   Mutation rate: {:.2e}   Region length: {}   Effective size: {}\n",
        params.samples_per_deme,
        params.total_samples(demes),
        params.num_regions,
        params.mutation_rate,
        params.chrom_length,
        params.effective_size,
    )
}
