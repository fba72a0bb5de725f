//! Distances between demes predicted from the habitat.
//!
//! - `covariance`: pseudo-inverse of a symmetric matrix and the
//!   covariance-to-distance transform behind resistance and random-walk
//!   distance.
//! - `geographic`: standardized Euclidean distance between coordinates.
//! - `coalescent`: the pair-indexed linear system for expected
//!   coalescence times.
//! - `deme`: all four predictors computed together for a habitat.

mod coalescent;
mod covariance;
mod deme;
mod geographic;

pub use coalescent::{coalescent_expected_distance, coalescent_system, PairIndex};
pub use covariance::{
    covariance_to_distance, pseudo_inverse_symmetric, random_walk_distance, resistance_distance,
    symmetric_part,
};
pub use deme::{DemeDistances, DistanceOptions};
pub use geographic::{geographic_distance, standardized_euclidean};
