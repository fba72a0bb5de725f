//! Habitats: demes on a directed graph with migration rates.
//!
//! A [`Habitat`] is built by one of the topology factories
//! ([`build_triangular_lattice`], [`build_square_lattice`], [`build_line`],
//! [`build_circle`]) and then given migration rates by applying a
//! [`MigrationSurface`]. The Laplacian `L = D - M` is derived lazily from
//! the resulting migration matrix.

mod graph;
mod surface;
mod topology;

pub use graph::{laplacian_from_migration, Deme, Edge, Habitat, HabitatSummary, NodeKey};
pub use surface::{
    AsymmetricUniformMigration, MigrationSurface, QuadraticBarrier, SurfaceConfig,
    UniformMigration,
};
pub use topology::{
    build_circle, build_line, build_square_lattice, build_triangular_lattice, HabitatConfig,
    Topology,
};
