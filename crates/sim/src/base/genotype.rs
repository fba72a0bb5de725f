use crate::errors::GenotypeError;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Haploid genotype matrix with one row per sample and one column per
/// segregating site.
///
/// Entries are 0 (ancestral) or 1 (derived). Storage is row-major so a
/// sample's genotype is a contiguous slice. Rows are ordered deme-major:
/// all samples of deme 0 first, then deme 1, and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGenotypes")]
pub struct GenotypeMatrix {
    n_samples: usize,
    n_sites: usize,
    data: Vec<u8>,
}

/// Unchecked serialized form, validated through [`GenotypeMatrix::new`].
#[derive(Deserialize)]
struct RawGenotypes {
    n_samples: usize,
    n_sites: usize,
    data: Vec<u8>,
}

impl TryFrom<RawGenotypes> for GenotypeMatrix {
    type Error = GenotypeError;

    fn try_from(raw: RawGenotypes) -> Result<Self, Self::Error> {
        Self::new(raw.n_samples, raw.n_sites, raw.data)
    }
}

impl GenotypeMatrix {
    /// Create a genotype matrix from row-major data.
    pub fn new(n_samples: usize, n_sites: usize, data: Vec<u8>) -> Result<Self, GenotypeError> {
        if data.len() != n_samples * n_sites {
            return Err(GenotypeError::Shape(format!(
                "expected {} entries for {n_samples}x{n_sites}, got {}",
                n_samples * n_sites,
                data.len()
            )));
        }
        if let Some(pos) = data.iter().position(|&v| v > 1) {
            return Err(GenotypeError::InvalidAllele {
                row: pos / n_sites,
                col: pos % n_sites,
                value: data[pos],
            });
        }
        Ok(Self {
            n_samples,
            n_sites,
            data,
        })
    }

    /// Create a genotype matrix from per-sample rows.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, GenotypeError> {
        let n_sites = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * n_sites);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_sites {
                return Err(GenotypeError::Shape(format!(
                    "row {i} has {} sites, expected {n_sites}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Self::new(rows.len(), n_sites, data)
    }

    /// Parse a whitespace-separated text matrix, one sample per line.
    ///
    /// Blank lines and lines starting with `#` are skipped. Lines made of
    /// bare `0`/`1` characters without separators are also accepted.
    pub fn parse_text(text: &str) -> Result<Self, GenotypeError> {
        let mut rows = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = if line.contains(char::is_whitespace) || line.contains(',') {
                line.split(|c: char| c.is_whitespace() || c == ',')
                    .filter(|t| !t.is_empty())
                    .collect()
            } else {
                line.split("").filter(|t| !t.is_empty()).collect()
            };
            let row = tokens
                .iter()
                .map(|t| match *t {
                    "0" => Ok(0u8),
                    "1" => Ok(1u8),
                    other => Err(GenotypeError::Parse {
                        line: lineno + 1,
                        message: format!("unexpected token '{other}'"),
                    }),
                })
                .collect::<Result<Vec<u8>, _>>()?;
            rows.push(row);
        }
        Self::from_rows(&rows)
    }

    /// Render as whitespace-separated text, one sample per line.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.data.len() * 2);
        for i in 0..self.n_samples {
            let row: Vec<&str> = self
                .row(i)
                .iter()
                .map(|&v| if v == 1 { "1" } else { "0" })
                .collect();
            out.push_str(&row.join(" "));
            out.push('\n');
        }
        out
    }

    /// Number of haploid samples (rows).
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Number of segregating sites (columns).
    pub fn n_sites(&self) -> usize {
        self.n_sites
    }

    /// `(n_samples, n_sites)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_samples, self.n_sites)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Genotype of sample `i` at site `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> u8 {
        self.data[i * self.n_sites + j]
    }

    /// All sites of sample `i`.
    #[inline]
    pub fn row(&self, i: usize) -> &[u8] {
        let start = i * self.n_sites;
        &self.data[start..start + self.n_sites]
    }

    /// Number of derived alleles at each site.
    pub fn derived_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_sites];
        for i in 0..self.n_samples {
            for (c, &v) in counts.iter_mut().zip(self.row(i)) {
                *c += v as usize;
            }
        }
        counts
    }

    /// Derived allele frequency at each site.
    pub fn derived_allele_frequencies(&self) -> Vec<f64> {
        if self.n_samples == 0 {
            return vec![0.0; self.n_sites];
        }
        let n = self.n_samples as f64;
        self.derived_counts()
            .into_iter()
            .map(|c| c as f64 / n)
            .collect()
    }

    /// Copy of the matrix restricted to the given columns, in the given order.
    pub fn select_columns(&self, columns: &[usize]) -> Self {
        let mut data = Vec::with_capacity(self.n_samples * columns.len());
        for i in 0..self.n_samples {
            let row = self.row(i);
            data.extend(columns.iter().map(|&j| row[j]));
        }
        Self {
            n_samples: self.n_samples,
            n_sites: columns.len(),
            data,
        }
    }

    /// Convert to a floating-point matrix of 0.0 and 1.0 entries.
    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.n_samples, self.n_sites, |i, j| self.get(i, j) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> GenotypeMatrix {
        GenotypeMatrix::from_rows(&[
            vec![0, 1, 1],
            vec![1, 1, 0],
            vec![0, 0, 1],
            vec![1, 1, 1],
        ])
        .unwrap()
    }

    #[test]
    fn test_from_rows_shape() {
        let y = example();
        assert_eq!(y.shape(), (4, 3));
        assert_eq!(y.get(1, 0), 1);
        assert_eq!(y.row(3), &[1, 1, 1]);
    }

    #[test]
    fn test_invalid_allele_rejected() {
        let err = GenotypeMatrix::new(2, 2, vec![0, 1, 2, 0]).unwrap_err();
        assert_eq!(
            err,
            GenotypeError::InvalidAllele {
                row: 1,
                col: 0,
                value: 2
            }
        );
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = GenotypeMatrix::from_rows(&[vec![0, 1], vec![1]]).unwrap_err();
        assert!(matches!(err, GenotypeError::Shape(_)));
    }

    #[test]
    fn test_derived_frequencies() {
        let y = example();
        assert_eq!(y.derived_counts(), vec![2, 3, 3]);
        assert_eq!(y.derived_allele_frequencies(), vec![0.5, 0.75, 0.75]);
    }

    #[test]
    fn test_to_dmatrix() {
        let m = example().to_dmatrix();
        assert_eq!(m.shape(), (4, 3));
        assert_eq!(m[(1, 0)], 1.0);
        assert_eq!(m[(2, 1)], 0.0);
    }

    #[test]
    fn test_select_columns() {
        let y = example().select_columns(&[2, 0]);
        assert_eq!(y.shape(), (4, 2));
        assert_eq!(y.row(1), &[0, 1]);
    }

    #[test]
    fn test_parse_text_formats() {
        let spaced = GenotypeMatrix::parse_text("# header\n0 1 1\n1 1 0\n\n").unwrap();
        let packed = GenotypeMatrix::parse_text("011\n110\n").unwrap();
        assert_eq!(spaced, packed);
        assert_eq!(GenotypeMatrix::parse_text(&spaced.to_text()).unwrap(), spaced);
    }

    #[test]
    fn test_parse_text_reports_line() {
        let err = GenotypeMatrix::parse_text("0 1\n0 x\n").unwrap_err();
        assert_eq!(
            err,
            GenotypeError::Parse {
                line: 2,
                message: "unexpected token 'x'".to_string()
            }
        );
    }

    #[test]
    fn test_json_is_validated() {
        let y = example();
        let json = serde_json::to_string(&y).unwrap();
        assert_eq!(serde_json::from_str::<GenotypeMatrix>(&json).unwrap(), y);

        let bad = r#"{"n_samples": 1, "n_sites": 2, "data": [0, 2]}"#;
        assert!(serde_json::from_str::<GenotypeMatrix>(bad).is_err());
        let short = r#"{"n_samples": 2, "n_sites": 2, "data": [0, 1]}"#;
        assert!(serde_json::from_str::<GenotypeMatrix>(short).is_err());
    }
}
