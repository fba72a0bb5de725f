//! Topology factories.
//!
//! Each factory lays out demes, numbers them densely in a fixed order and
//! connects neighbours with a pair of directed edges. The resulting
//! habitat has no migration rates until a surface is applied.

use super::{Deme, Habitat, NodeKey, SurfaceConfig};
use crate::errors::HabitatError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Shape of the deme graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Topology {
    TriangularLattice { rows: usize, cols: usize },
    SquareLattice { rows: usize, cols: usize },
    Line { demes: usize },
    Circle { demes: usize },
}

impl Topology {
    /// Build the (rate-less) habitat for this topology.
    pub fn build(&self) -> Result<Habitat, HabitatError> {
        match *self {
            Self::TriangularLattice { rows, cols } => build_triangular_lattice(rows, cols),
            Self::SquareLattice { rows, cols } => build_square_lattice(rows, cols),
            Self::Line { demes } => build_line(demes),
            Self::Circle { demes } => build_circle(demes),
        }
    }

    /// Number of demes the topology produces.
    pub fn demes(&self) -> usize {
        match *self {
            Self::TriangularLattice { rows, cols } | Self::SquareLattice { rows, cols } => {
                rows * cols
            }
            Self::Line { demes } | Self::Circle { demes } => demes,
        }
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TriangularLattice { rows, cols } => write!(f, "triangular lattice {rows}x{cols}"),
            Self::SquareLattice { rows, cols } => write!(f, "square lattice {rows}x{cols}"),
            Self::Line { demes } => write!(f, "line of {demes} demes"),
            Self::Circle { demes } => write!(f, "circle of {demes} demes"),
        }
    }
}

/// A topology plus the surface that assigns its migration rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HabitatConfig {
    pub topology: Topology,
    #[serde(default)]
    pub surface: SurfaceConfig,
}

impl HabitatConfig {
    pub fn new(topology: Topology, surface: SurfaceConfig) -> Self {
        Self { topology, surface }
    }

    /// Build the habitat and apply the surface.
    pub fn build(&self) -> Result<Habitat, HabitatError> {
        self.topology.build()?.with_surface(&self.surface)
    }
}

fn require_positive(name: &str, value: usize) -> Result<(), HabitatError> {
    if value == 0 {
        return Err(HabitatError::Shape(format!("{name} must be at least 1")));
    }
    Ok(())
}

/// Triangular lattice with `rows x cols` demes.
///
/// Odd rows are shifted right by half a unit and rows are `sqrt(3)/2`
/// apart, so every interior deme has six equidistant neighbours. Dense
/// order is row-major.
pub fn build_triangular_lattice(rows: usize, cols: usize) -> Result<Habitat, HabitatError> {
    require_positive("rows", rows)?;
    require_positive("cols", cols)?;

    let key = |row: usize, col: usize| NodeKey::Lattice { row, col };
    let h = 3f64.sqrt() / 2.0;

    let mut demes = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            demes.push(Deme {
                key: key(row, col),
                position: [col as f64 + 0.5 * (row % 2) as f64, h * row as f64],
            });
        }
    }

    let mut adjacency = Vec::new();
    for row in 0..rows {
        for col in 0..cols.saturating_sub(1) {
            adjacency.push((key(row, col), key(row, col + 1)));
        }
    }
    for row in 0..rows.saturating_sub(1) {
        for col in 0..cols {
            adjacency.push((key(row, col), key(row + 1, col)));
        }
        for col in 0..cols.saturating_sub(1) {
            if row % 2 == 1 {
                adjacency.push((key(row, col), key(row + 1, col + 1)));
            } else {
                adjacency.push((key(row, col + 1), key(row + 1, col)));
            }
        }
    }

    Habitat::from_parts(Topology::TriangularLattice { rows, cols }, demes, &adjacency)
}

/// Four-neighbour grid with `rows x cols` demes; deme `(i, j)` sits at
/// `(i, j)`. Dense order is row-major.
pub fn build_square_lattice(rows: usize, cols: usize) -> Result<Habitat, HabitatError> {
    require_positive("rows", rows)?;
    require_positive("cols", cols)?;

    let key = |row: usize, col: usize| NodeKey::Lattice { row, col };
    let mut demes = Vec::with_capacity(rows * cols);
    let mut adjacency = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            demes.push(Deme {
                key: key(row, col),
                position: [row as f64, col as f64],
            });
            if row + 1 < rows {
                adjacency.push((key(row, col), key(row + 1, col)));
            }
            if col + 1 < cols {
                adjacency.push((key(row, col), key(row, col + 1)));
            }
        }
    }

    Habitat::from_parts(Topology::SquareLattice { rows, cols }, demes, &adjacency)
}

/// Path of `demes` demes at `(k, 0)`.
pub fn build_line(demes: usize) -> Result<Habitat, HabitatError> {
    require_positive("demes", demes)?;

    let nodes = (0..demes)
        .map(|k| Deme {
            key: NodeKey::Linear(k),
            position: [k as f64, 0.0],
        })
        .collect();
    let adjacency: Vec<_> = (1..demes)
        .map(|k| (NodeKey::Linear(k - 1), NodeKey::Linear(k)))
        .collect();

    Habitat::from_parts(Topology::Line { demes }, nodes, &adjacency)
}

/// Cycle of `demes` demes evenly spaced on the unit circle.
pub fn build_circle(demes: usize) -> Result<Habitat, HabitatError> {
    require_positive("demes", demes)?;

    let nodes = (0..demes)
        .map(|k| {
            let position = if demes == 1 {
                [0.0, 0.0]
            } else {
                let theta = 2.0 * PI * k as f64 / demes as f64;
                [theta.cos(), theta.sin()]
            };
            Deme {
                key: NodeKey::Linear(k),
                position,
            }
        })
        .collect();
    let adjacency: Vec<_> = match demes {
        1 => Vec::new(),
        2 => vec![(NodeKey::Linear(0), NodeKey::Linear(1))],
        _ => (0..demes)
            .map(|k| (NodeKey::Linear(k), NodeKey::Linear((k + 1) % demes)))
            .collect(),
    };

    Habitat::from_parts(Topology::Circle { demes }, nodes, &adjacency)
}
