//! # Simulation Crate
//!
//! The `sim` crate holds the model side of demeflow: habitats of demes
//! connected by directed migration edges, the graph Laplacian built from
//! their migration rates, and the distances between demes that the
//! Laplacian predicts (resistance, random-walk, geographic and expected
//! coalescence time). It also defines the contract for external genotype
//! simulators and a small cache abstraction for their output.

pub mod base;
pub mod distance;
pub mod errors;
pub mod habitat;
pub mod prelude;
pub mod simulation;
pub mod solver;
pub mod storage;

pub use base::GenotypeMatrix;
pub use habitat::Habitat;
