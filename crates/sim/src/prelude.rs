//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use demeflow_sim::prelude::*;
//!
//! let habitat = build_line(4)
//!     .unwrap()
//!     .with_surface(&UniformMigration::new(0.5))
//!     .unwrap();
//! let r = resistance_distance(habitat.laplacian().unwrap()).unwrap();
//! assert!((r[(0, 3)] - 6.0).abs() < 1e-9);
//! ```

pub use crate::base::GenotypeMatrix;
pub use crate::distance::{
    coalescent_expected_distance, geographic_distance, random_walk_distance, resistance_distance,
    DemeDistances, DistanceOptions,
};
pub use crate::errors::{self, HabitatError};
pub use crate::habitat::{
    build_circle, build_line, build_square_lattice, build_triangular_lattice, Habitat,
    HabitatConfig, MigrationSurface, SurfaceConfig, Topology, UniformMigration,
};
pub use crate::simulation::{CachedSimulator, GenotypeSimulator, SimulationParameters};
pub use crate::solver::{SolverMethod, SolverOptions};
pub use crate::storage::{GenotypeCache, JsonFileCache, MemoryCache};
