use anyhow::{Context, Result};
use demeflow_analysis::{ComparisonReport, DistanceComparison};
use serde_json::json;
use std::path::Path;

use crate::args::{AnalysisArgs, OutputArgs};
use crate::commands::apply_analysis_args;
use crate::config::Configuration;
use crate::utils::{emit, read_genotypes};

pub fn compare_predictors(
    config_path: &Path,
    genotypes_path: &Path,
    include_pairs: bool,
    analysis: &AnalysisArgs,
    output: &OutputArgs,
) -> Result<()> {
    let config = Configuration::load(config_path)?;
    let options = apply_analysis_args(config.analysis, analysis)?;
    let habitat = config
        .habitat
        .build()
        .context("Failed to build the configured habitat")?;
    let genotypes = read_genotypes(genotypes_path)?;
    let expected = config.simulation.total_samples(habitat.demes());
    if genotypes.n_samples() != expected {
        log::warn!(
            "{} has {} samples; the configuration expects {expected} ({} per deme)",
            genotypes_path.display(),
            genotypes.n_samples(),
            config.simulation.samples_per_deme
        );
    }

    let comparison = DistanceComparison::new(&habitat, options)?;
    let report = comparison.run(&genotypes)?;

    let content = match output.format.as_str() {
        "json" => serde_json::to_string_pretty(&report_json(&report, include_pairs))?,
        "pretty" => format_report(&report),
        other => anyhow::bail!("Unknown format '{other}'. Use: pretty, json"),
    };
    emit(&content, output.output.as_deref())
}

fn report_json(report: &ComparisonReport, include_pairs: bool) -> serde_json::Value {
    let predictors: Vec<serde_json::Value> = report
        .comparisons
        .iter()
        .map(|c| {
            let mut value = json!({
                "predictor": c.predictor,
                "correlation": c.correlation,
                "slope": c.fit.map(|f| f.slope),
                "intercept": c.fit.map(|f| f.intercept),
            });
            if include_pairs {
                value["pairs"] = json!(c.pairs);
            }
            value
        })
        .collect();

    json!({
        "demes": report.demes,
        "samples_per_deme": report.samples_per_deme,
        "n_samples": report.n_samples,
        "sites_before_filter": report.sites_before_filter,
        "sites_after_filter": report.sites_after_filter,
        "epsilon": report.epsilon,
        "best": report.best().map(|c| c.predictor),
        "predictors": predictors,
    })
}

fn format_report(report: &ComparisonReport) -> String {
    let mut out = String::new();
    out.push_str("\n🧬 Genetic Distance vs Predictors\n");
    out.push_str("=================================\n");
    out.push_str(&format!(
        "Demes: {}   Samples: {} ({} per deme)\n",
        report.demes, report.n_samples, report.samples_per_deme
    ));
    out.push_str(&format!(
        "Sites: {} of {} kept (epsilon = {})\n\n",
        report.sites_after_filter, report.sites_before_filter, report.epsilon
    ));
    out.push_str(&format!(
        "{:<28} {:>10} {:>12} {:>12}\n",
        "Predictor", "r", "slope", "intercept"
    ));
    out.push_str(&format!("{}\n", "-".repeat(65)));
    for c in &report.comparisons {
        let r = c.correlation.map_or("n/a".to_string(), |r| format!("{r:.4}"));
        let (slope, intercept) = c.fit.map_or(("n/a".to_string(), "n/a".to_string()), |f| {
            (format!("{:.4e}", f.slope), format!("{:.4e}", f.intercept))
        });
        out.push_str(&format!(
            "{:<28} {:>10} {:>12} {:>12}\n",
            c.predictor.label(),
            r,
            slope,
            intercept
        ));
    }
    if let Some(best) = report.best() {
        out.push_str(&format!("\n✓ Best predictor: {}\n", best.predictor.label()));
    }
    out
}
