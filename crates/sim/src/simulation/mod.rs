//! Contract for external genotype simulators.
//!
//! The coalescent simulator itself lives outside this crate. This module
//! fixes what it is given ([`SimulationParameters`] and a migration matrix),
//! what it must return (a deme-major [`GenotypeMatrix`](crate::GenotypeMatrix)
//! with `samples_per_deme * d` rows), and how results are reused through a
//! [`GenotypeCache`](crate::storage::GenotypeCache).

mod parameters;
mod simulator;

pub use parameters::SimulationParameters;
pub use simulator::{simulate_checked, CachedSimulator, GenotypeSimulator};
