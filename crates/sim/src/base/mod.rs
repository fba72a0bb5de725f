//! Base data types shared by the simulator contract and the analyses.

mod genotype;

pub use genotype::GenotypeMatrix;
pub use crate::errors::GenotypeError;
