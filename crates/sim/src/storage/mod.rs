//! Storage for simulated genotypes.
//!
//! Simulations are expensive, so their output is keyed by a caller-chosen
//! string and kept in a [`GenotypeCache`]. The in-memory store serves tests
//! and single runs; the JSON directory store persists across runs.

mod cache;

pub use cache::{sanitize_key, GenotypeCache, JsonFileCache, MemoryCache};
