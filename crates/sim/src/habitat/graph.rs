use crate::distance::geographic_distance;
use crate::errors::HabitatError;
use crate::habitat::{MigrationSurface, Topology};
use log::{debug, warn};
use nalgebra::DMatrix;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;
use petgraph::visit::{Bfs, EdgeRef, Reversed};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::collections::HashMap;

/// Topology-native identifier of a deme.
///
/// Lattices identify demes by `(row, col)`; lines and circles by their
/// position along the graph. The habitat maps every key to a dense index
/// in `[0, d)` once, at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKey {
    Lattice { row: usize, col: usize },
    Linear(usize),
}

/// Node payload of the habitat graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deme {
    pub key: NodeKey,
    pub position: [f64; 2],
}

/// A directed edge between dense deme indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
}

/// Demes arranged on a directed graph with migration rates on the edges.
///
/// Migration convention: `M[i][j]` is the rate at which a lineage in deme
/// `i` moves to deme `j` looking backwards in time, which is the layout
/// structured-coalescent simulators take as their migration matrix input.
///
/// The migration matrix is absent until a surface is applied (or a matrix
/// is set explicitly). The Laplacian is computed on first use and cached
/// until the migration matrix changes.
#[derive(Debug, Clone)]
pub struct Habitat {
    topology: Topology,
    graph: DiGraph<Deme, f64>,
    index: HashMap<NodeKey, usize>,
    positions: DMatrix<f64>,
    migration: Option<DMatrix<f64>>,
    laplacian: OnceCell<DMatrix<f64>>,
}

/// Short description of a habitat's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitatSummary {
    pub topology: Topology,
    pub demes: usize,
    pub edges: usize,
    pub nonzero_edges: usize,
    pub connected: bool,
    pub symmetric: bool,
    pub min_rate: f64,
    pub max_rate: f64,
}

impl Habitat {
    /// Assemble a habitat from demes in dense order and their undirected
    /// adjacencies. Every adjacency becomes a pair of directed edges with
    /// zero rate.
    pub(crate) fn from_parts(
        topology: Topology,
        demes: Vec<Deme>,
        adjacency: &[(NodeKey, NodeKey)],
    ) -> Result<Self, HabitatError> {
        if demes.is_empty() {
            return Err(HabitatError::Shape(
                "a habitat needs at least one deme".to_string(),
            ));
        }

        let mut index = HashMap::with_capacity(demes.len());
        let mut graph = DiGraph::with_capacity(demes.len(), adjacency.len() * 2);
        for (i, deme) in demes.iter().enumerate() {
            if index.insert(deme.key, i).is_some() {
                return Err(HabitatError::Configuration(format!(
                    "duplicate deme {:?}",
                    deme.key
                )));
            }
            graph.add_node(*deme);
        }

        let lookup = |key: &NodeKey| {
            index.get(key).copied().ok_or_else(|| {
                HabitatError::Configuration(format!("edge references unknown deme {key:?}"))
            })
        };
        for (a, b) in adjacency {
            let (ia, ib) = (lookup(a)?, lookup(b)?);
            if ia == ib {
                continue;
            }
            graph.add_edge(NodeIndex::new(ia), NodeIndex::new(ib), 0.0);
            graph.add_edge(NodeIndex::new(ib), NodeIndex::new(ia), 0.0);
        }

        let positions = DMatrix::from_fn(demes.len(), 2, |i, k| demes[i].position[k]);

        Ok(Self {
            topology,
            graph,
            index,
            positions,
            migration: None,
            laplacian: OnceCell::new(),
        })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Number of demes `d`.
    pub fn demes(&self) -> usize {
        self.graph.node_count()
    }

    /// Deme payload at dense index `i`.
    pub fn deme(&self, i: usize) -> Option<&Deme> {
        self.graph.node_weight(NodeIndex::new(i))
    }

    /// Dense index of a topology-native key.
    pub fn dense_index(&self, key: &NodeKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// `d x 2` matrix of deme coordinates, rows in dense order.
    pub fn positions(&self) -> &DMatrix<f64> {
        &self.positions
    }

    /// All directed edges in graph order.
    pub fn edges(&self) -> Vec<Edge> {
        self.graph
            .edge_references()
            .map(|e| Edge {
                source: e.source().index(),
                target: e.target().index(),
            })
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Migration rate on the edge `source -> target`, if the edge exists.
    pub fn edge_rate(&self, source: usize, target: usize) -> Option<f64> {
        self.graph
            .find_edge(NodeIndex::new(source), NodeIndex::new(target))
            .map(|e| self.graph[e])
    }

    /// Assign migration rates to every edge using `surface`.
    pub fn apply_surface<S: MigrationSurface + ?Sized>(
        &mut self,
        surface: &S,
    ) -> Result<(), HabitatError> {
        let edges = self.edges();
        let rates = surface.rates(&edges, &self.positions)?;
        if rates.len() != edges.len() {
            return Err(HabitatError::Configuration(format!(
                "migration surface returned {} rates for {} edges",
                rates.len(),
                edges.len()
            )));
        }
        if let Some((edge, rate)) = edges
            .iter()
            .zip(&rates)
            .find(|(_, r)| !r.is_finite() || **r < 0.0)
        {
            return Err(HabitatError::Configuration(format!(
                "rate {rate} on edge {} -> {} must be finite and non-negative",
                edge.source, edge.target
            )));
        }

        for (e, rate) in self.graph.edge_indices().zip(rates) {
            self.graph[e] = rate;
        }
        self.migration = Some(self.migration_from_graph());
        self.laplacian = OnceCell::new();
        debug!(
            "Applied migration surface to {} edges of {} demes",
            edges.len(),
            self.demes()
        );
        Ok(())
    }

    /// Builder-style [`Habitat::apply_surface`].
    pub fn with_surface<S: MigrationSurface + ?Sized>(
        mut self,
        surface: &S,
    ) -> Result<Self, HabitatError> {
        self.apply_surface(surface)?;
        Ok(self)
    }

    /// Replace the migration matrix directly.
    ///
    /// The matrix is authoritative: edge rates are synchronised from it and
    /// entries between non-adjacent demes are kept (with a warning).
    pub fn set_migration_matrix(&mut self, m: DMatrix<f64>) -> Result<(), HabitatError> {
        let d = self.demes();
        if m.shape() != (d, d) {
            return Err(HabitatError::Shape(format!(
                "migration matrix is {}x{}, habitat has {d} demes",
                m.nrows(),
                m.ncols()
            )));
        }
        if let Some(bad) = m.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(HabitatError::Configuration(format!(
                "migration rate {bad} must be finite and non-negative"
            )));
        }

        let mut on_edges = 0usize;
        for e in self.graph.edge_indices().collect::<Vec<_>>() {
            if let Some((s, t)) = self.graph.edge_endpoints(e) {
                let rate = m[(s.index(), t.index())];
                self.graph[e] = rate;
                if rate > 0.0 {
                    on_edges += 1;
                }
            }
        }
        let total = (0..d)
            .flat_map(|i| (0..d).map(move |j| (i, j)))
            .filter(|&(i, j)| i != j && m[(i, j)] > 0.0)
            .count();
        if total > on_edges {
            warn!(
                "{} non-zero migration rates connect demes that are not adjacent in the habitat graph",
                total - on_edges
            );
        }

        self.migration = Some(m);
        self.laplacian = OnceCell::new();
        Ok(())
    }

    /// The migration matrix, or a configuration error when no surface has
    /// been applied.
    pub fn migration_matrix(&self) -> Result<&DMatrix<f64>, HabitatError> {
        self.migration.as_ref().ok_or_else(|| {
            HabitatError::Configuration(
                "migration surface is not set for this habitat".to_string(),
            )
        })
    }

    /// Compute `L = D - M` from the current migration matrix.
    pub fn build_laplacian(&self) -> Result<DMatrix<f64>, HabitatError> {
        let m = self.migration_matrix()?;
        let d = self.demes();
        if m.shape() != (d, d) {
            return Err(HabitatError::Shape(format!(
                "migration matrix is {}x{}, habitat has {d} demes",
                m.nrows(),
                m.ncols()
            )));
        }
        laplacian_from_migration(m)
    }

    /// Cached Laplacian, computed on first access.
    pub fn laplacian(&self) -> Result<&DMatrix<f64>, HabitatError> {
        if let Some(l) = self.laplacian.get() {
            return Ok(l);
        }
        let l = self.build_laplacian()?;
        Ok(self.laplacian.get_or_init(|| l))
    }

    /// Standardized Euclidean distance between deme positions, halved.
    pub fn geographic_distance(&self) -> DMatrix<f64> {
        geographic_distance(&self.positions)
    }

    /// Whether every deme is reachable from every other through edges with
    /// a positive rate, ignoring direction.
    pub fn is_connected(&self) -> Result<bool, HabitatError> {
        let m = self.migration_matrix()?;
        let d = self.demes();
        let mut components = UnionFind::<usize>::new(d);
        for i in 0..d {
            for j in 0..d {
                if i != j && m[(i, j)] > 0.0 {
                    components.union(i, j);
                }
            }
        }
        let root = components.find(0);
        Ok((1..d).all(|i| components.find(i) == root))
    }

    /// Whether some deme can be reached, following positive rates in their
    /// direction, from every deme.
    ///
    /// A weakly connected habitat can still split lineages into separate
    /// absorbing regions. Two lineages started in different regions never
    /// share a deme, so their coalescence time is unbounded.
    pub fn lineages_can_meet(&self) -> Result<bool, HabitatError> {
        let m = self.migration_matrix()?;
        let d = self.demes();
        if d == 0 {
            return Ok(true);
        }
        let mut flow = DiGraph::<(), ()>::with_capacity(d, self.graph.edge_count());
        for _ in 0..d {
            flow.add_node(());
        }
        for i in 0..d {
            for j in 0..d {
                if i != j && m[(i, j)] > 0.0 {
                    flow.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
                }
            }
        }

        // Components come out in reverse topological order, so the first is a sink.
        let sccs = tarjan_scc(&flow);
        let Some(&sink) = sccs.first().and_then(|c| c.first()) else {
            return Ok(true);
        };
        let reversed = Reversed(&flow);
        let mut bfs = Bfs::new(reversed, sink);
        let mut reached = 0;
        while bfs.next(reversed).is_some() {
            reached += 1;
        }
        if reached < d {
            debug!("Only {reached} of {d} demes drain into deme {}", sink.index());
        }
        Ok(reached == d)
    }

    pub fn summary(&self) -> Result<HabitatSummary, HabitatError> {
        let m = self.migration_matrix()?;
        let rates: Vec<f64> = self.graph.edge_weights().copied().collect();
        let (min_rate, max_rate) = if rates.is_empty() {
            (0.0, 0.0)
        } else {
            rates.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
                (lo.min(r), hi.max(r))
            })
        };
        Ok(HabitatSummary {
            topology: self.topology,
            demes: self.demes(),
            edges: self.edge_count(),
            nonzero_edges: rates.iter().filter(|&&r| r > 0.0).count(),
            connected: self.is_connected()?,
            symmetric: m == &m.transpose(),
            min_rate,
            max_rate,
        })
    }

    fn migration_from_graph(&self) -> DMatrix<f64> {
        let d = self.demes();
        let mut m = DMatrix::zeros(d, d);
        for e in self.graph.edge_references() {
            m[(e.source().index(), e.target().index())] += *e.weight();
        }
        m
    }
}

/// Graph Laplacian `L = D - M` with `D` the diagonal of off-diagonal row
/// sums of `M`. The diagonal of `M` is ignored, so every row of `L` sums
/// to zero.
pub fn laplacian_from_migration(m: &DMatrix<f64>) -> Result<DMatrix<f64>, HabitatError> {
    if !m.is_square() {
        return Err(HabitatError::Shape(format!(
            "migration matrix must be square, got {}x{}",
            m.nrows(),
            m.ncols()
        )));
    }
    let d = m.nrows();
    let mut l = m.map(|v| -v);
    for i in 0..d {
        l[(i, i)] = (0..d).filter(|&j| j != i).map(|j| m[(i, j)]).sum();
    }
    Ok(l)
}
