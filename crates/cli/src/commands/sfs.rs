use anyhow::Result;
use demeflow_analysis::{filter_rare_variants, site_frequency_spectrum};
use serde_json::json;
use std::path::Path;

use crate::args::OutputArgs;
use crate::utils::{emit, read_genotypes};

pub fn compute_sfs(genotypes_path: &Path, epsilon: Option<f64>, output: &OutputArgs) -> Result<()> {
    let mut genotypes = read_genotypes(genotypes_path)?;
    if let Some(eps) = epsilon {
        genotypes = filter_rare_variants(&genotypes, eps)?;
    }
    let sfs = site_frequency_spectrum(&genotypes);
    let normalized = sfs.normalized().ok();

    let content = match output.format.as_str() {
        "json" => serde_json::to_string_pretty(&json!({
            "n_samples": sfs.n_samples,
            "segregating_sites": sfs.segregating_sites(),
            "frequencies": sfs.frequencies,
            "counts": sfs.counts,
            "expected": sfs.expected,
            "normalized": normalized,
        }))?,
        "pretty" => {
            let mut out = format!(
                "\n📊 Site Frequency Spectrum\n\
                 ==========================\n\
                 Samples: {}   Segregating sites: {}\n\n\
                 {:>4} {:>10} {:>10} {:>12}\n",
                sfs.n_samples,
                sfs.segregating_sites(),
                "k",
                "count",
                "expected",
                "normalized"
            );
            for (i, count) in sfs.counts.iter().enumerate() {
                let norm = normalized
                    .as_ref()
                    .map_or("n/a".to_string(), |v| format!("{:.4}", v[i]));
                out.push_str(&format!(
                    "{:>4} {:>10} {:>10.4} {:>12}\n",
                    i + 1,
                    count,
                    sfs.expected[i],
                    norm
                ));
            }
            out
        }
        other => anyhow::bail!("Unknown format '{other}'. Use: pretty, json"),
    };
    emit(&content, output.output.as_deref())
}
