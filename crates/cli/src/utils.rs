use anyhow::{Context, Result};
use demeflow_sim::GenotypeMatrix;
use std::path::Path;

/// Read a genotype matrix: JSON when the extension is `.json`, otherwise
/// whitespace or comma separated 0/1 text with one sample per line.
pub fn read_genotypes(path: &Path) -> Result<GenotypeMatrix> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read genotypes {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let genotypes = if is_json {
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid genotype JSON in {}", path.display()))?
    } else {
        GenotypeMatrix::parse_text(&text)
            .with_context(|| format!("Invalid genotype text in {}", path.display()))?
    };
    log::info!(
        "Loaded {} samples x {} sites from {}",
        genotypes.n_samples(),
        genotypes.n_sites(),
        path.display()
    );
    Ok(genotypes)
}

/// Write `content` to `output`, or print it when no path is given.
pub fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}
