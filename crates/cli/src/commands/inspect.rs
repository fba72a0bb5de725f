use anyhow::{Context, Result};
use serde_json::json;

use crate::args::OutputArgs;
use crate::config::Configuration;
use crate::printing::{format_matrix, format_simulation, format_summary, matrix_rows};
use crate::utils::emit;
use std::path::Path;

pub fn inspect_habitat(config_path: &Path, laplacian: bool, output: &OutputArgs) -> Result<()> {
    let config = Configuration::load(config_path)?;
    let habitat = config
        .habitat
        .build()
        .context("Failed to build the configured habitat")?;
    let summary = habitat.summary()?;

    let content = match output.format.as_str() {
        "json" => {
            let mut value = json!({
                "summary": summary,
                "simulation": config.simulation,
                "expected_samples": config.simulation.total_samples(summary.demes),
            });
            if laplacian {
                value["laplacian"] = json!(matrix_rows(habitat.laplacian()?));
            }
            serde_json::to_string_pretty(&value)?
        }
        "pretty" => {
            let mut text = format_summary(&summary);
            text.push_str(&format!("Surface: {}\n", config.habitat.surface));
            text.push_str(&format_simulation(&config.simulation, summary.demes));
            if laplacian {
                text.push_str(&format_matrix("Laplacian", habitat.laplacian()?));
            }
            text
        }
        other => anyhow::bail!("Unknown format '{other}'. Use: pretty, json"),
    };
    emit(&content, output.output.as_deref())
}
