use crate::base::GenotypeMatrix;
use crate::errors::CacheError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Key-value store for genotype matrices.
pub trait GenotypeCache {
    fn get(&self, key: &str) -> Result<Option<GenotypeMatrix>, CacheError>;
    fn put(&mut self, key: &str, genotypes: &GenotypeMatrix) -> Result<(), CacheError>;
}

/// Hex digits of the key digest appended to every file name.
const DIGEST_CHARS: usize = 16;

/// Map a key to a file-safe stem: ASCII alphanumerics, `-`, `_` and `.`
/// are kept, anything else becomes `_`, and a digest of the raw key is
/// appended so keys that clean to the same text stay apart.
pub fn sanitize_key(key: &str) -> Result<String, CacheError> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey(key.to_string()));
    }
    let cleaned: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let digest = hex::encode(Sha256::digest(key.as_bytes()));
    Ok(format!("{cleaned}-{}", &digest[..DIGEST_CHARS]))
}

/// On-disk form of a cache entry. The raw key is stored alongside the
/// genotypes and checked on load.
#[derive(Serialize)]
struct EntryRef<'a> {
    key: &'a str,
    genotypes: &'a GenotypeMatrix,
}

#[derive(Deserialize)]
struct Entry {
    key: String,
    genotypes: GenotypeMatrix,
}

/// Cache held in memory for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: HashMap<String, GenotypeMatrix>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GenotypeCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<GenotypeMatrix>, CacheError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, genotypes: &GenotypeMatrix) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), genotypes.clone());
        Ok(())
    }
}

/// One `<key>-<digest>.json` file per entry in a directory.
///
/// Writes go to a temporary file that is renamed into place, so readers
/// never see a partially written entry.
#[derive(Debug, Clone)]
pub struct JsonFileCache {
    dir: PathBuf,
}

impl JsonFileCache {
    /// Open (and create if needed) a cache directory.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file that holds `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, CacheError> {
        Ok(self.dir.join(format!("{}.json", sanitize_key(key)?)))
    }
}

impl GenotypeCache for JsonFileCache {
    fn get(&self, key: &str) -> Result<Option<GenotypeMatrix>, CacheError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            debug!("Cache miss: {}", path.display());
            return Ok(None);
        }
        let reader = BufReader::new(File::open(&path)?);
        let Entry {
            key: stored,
            genotypes,
        } = serde_json::from_reader(reader)?;
        if stored != key {
            return Err(CacheError::KeyMismatch {
                expected: key.to_string(),
                found: stored,
            });
        }
        debug!(
            "Cache hit: {} ({} x {})",
            path.display(),
            genotypes.n_samples(),
            genotypes.n_sites()
        );
        Ok(Some(genotypes))
    }

    fn put(&mut self, key: &str, genotypes: &GenotypeMatrix) -> Result<(), CacheError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer(&mut writer, &EntryRef { key, genotypes })?;
            writer.flush()?;
        }
        fs::rename(&tmp, &path)?;
        info!("Cached genotypes at {}", path.display());
        Ok(())
    }
}
