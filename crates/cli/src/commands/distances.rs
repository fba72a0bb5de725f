use anyhow::{Context, Result};
use demeflow_sim::distance::DemeDistances;
use serde_json::json;
use std::path::Path;

use crate::args::{AnalysisArgs, OutputArgs};
use crate::commands::apply_analysis_args;
use crate::config::Configuration;
use crate::printing::{format_matrix, matrix_rows};
use crate::utils::emit;

/// Names accepted by `--kind`.
pub const KINDS: [&str; 4] = ["geographic", "resistance", "random_walk", "coalescent"];

pub fn compute_distances(
    config_path: &Path,
    kinds: &[String],
    analysis: &AnalysisArgs,
    output: &OutputArgs,
) -> Result<()> {
    for kind in kinds {
        if !KINDS.contains(&kind.as_str()) {
            anyhow::bail!("Unknown distance '{kind}'. Use: {}", KINDS.join(", "));
        }
    }
    let config = Configuration::load(config_path)?;
    let options = apply_analysis_args(config.analysis, analysis)?;
    let habitat = config
        .habitat
        .build()
        .context("Failed to build the configured habitat")?;

    log::info!(
        "Computing deme distances for {} ({} demes)",
        config.habitat.topology,
        habitat.demes()
    );
    let distances = DemeDistances::compute(&habitat, &options.distances)
        .context("Failed to compute deme distances")?;

    let selected: Vec<(&str, &nalgebra::DMatrix<f64>)> = [
        ("geographic", &distances.geographic),
        ("resistance", &distances.resistance),
        ("random_walk", &distances.random_walk),
        ("coalescent", &distances.coalescent),
    ]
    .into_iter()
    .filter(|(name, _)| kinds.is_empty() || kinds.iter().any(|k| k == name))
    .collect();

    let content = match output.format.as_str() {
        "json" => {
            let mut value = json!({ "demes": distances.demes() });
            for (name, m) in &selected {
                value[*name] = json!(matrix_rows(m));
            }
            serde_json::to_string_pretty(&value)?
        }
        "pretty" => selected
            .iter()
            .map(|(name, m)| format_matrix(name, m))
            .collect::<String>(),
        other => anyhow::bail!("Unknown format '{other}'. Use: pretty, json"),
    };
    emit(&content, output.output.as_deref())
}
