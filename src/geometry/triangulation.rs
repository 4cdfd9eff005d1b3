// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Near-triangulations: the common graph structure behind wheels,
//! configurations and rules.
//!
//! A near-triangulation is a planar graph in which every bounded face is a
//! triangle. Locally that means: for any edge, the vertices completing a
//! triangle with it (its *diagonal vertices*) number at most two. The
//! structure is immutable after construction except for per-vertex degree
//! ranges, which the enumerator refines as it branches.
//!
//! # Edge identities
//!
//! Both orientations of every undirected edge appear in the edge list,
//! enumerated with the tail ascending and then the head ascending. Edge ids
//! index into that list and are the currency of the subgraph matcher: a match
//! starts from a host edge id pinned to a pattern edge id.

use crate::geometry::Degree;
use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;

/// Index of a vertex within one near-triangulation.
pub type VertexId = usize;

/// Index into the directed edge list of one near-triangulation.
pub type EdgeId = usize;

/// A directed edge as a `(tail, head)` pair.
pub type Edge = (VertexId, VertexId);

/// A near-triangulation with optional degree ranges on its vertices.
#[derive(Debug, Clone)]
pub struct NearTriangulation {
    vertex_count: usize,
    degrees: Vec<Option<Degree>>,
    edges: Vec<Edge>,
    edge_ids: HashMap<Edge, EdgeId>,
    diagonals: HashMap<Edge, Vec<VertexId>>,
}

impl NearTriangulation {
    /// Build from a per-vertex neighbor set.
    ///
    /// The adjacency must be symmetric. Diagonal vertices are indexed here,
    /// once; an edge with more than two diagonals violates the
    /// near-triangulation invariant and aborts.
    pub fn new(
        vertex_count: usize,
        adjacency: &[BTreeSet<VertexId>],
        degrees: Vec<Option<Degree>>,
    ) -> Self {
        assert_eq!(adjacency.len(), vertex_count);
        assert_eq!(degrees.len(), vertex_count);

        let mut edges = Vec::new();
        for (v, neighbors) in adjacency.iter().enumerate() {
            for &u in neighbors {
                edges.push((v, u));
            }
        }

        let mut edge_ids = HashMap::with_capacity(edges.len());
        for (id, &edge) in edges.iter().enumerate() {
            edge_ids.insert(edge, id);
        }

        let mut diagonals = HashMap::with_capacity(edges.len());
        for &(v, u) in &edges {
            let shared: Vec<VertexId> = adjacency[v]
                .iter()
                .copied()
                .filter(|w| adjacency[u].contains(w))
                .collect();
            assert!(
                shared.len() <= 2,
                "edge ({v}, {u}) lies in {} triangles",
                shared.len()
            );
            diagonals.insert((v, u), shared);
        }

        Self {
            vertex_count,
            degrees,
            edges,
            edge_ids,
            diagonals,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn degrees(&self) -> &[Option<Degree>] {
        &self.degrees
    }

    pub fn degree(&self, v: VertexId) -> Option<Degree> {
        self.degrees[v]
    }

    /// Set or clear the degree range of one vertex.
    pub fn set_degree(&mut self, v: VertexId, degree: Option<Degree>) {
        self.degrees[v] = degree;
    }

    /// The directed edge list, tail ascending then head ascending.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up the id of the directed edge `(tail, head)`.
    pub fn edge_id(&self, tail: VertexId, head: VertexId) -> Option<EdgeId> {
        self.edge_ids.get(&(tail, head)).copied()
    }

    /// The vertices forming a triangle with `edge`, in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `edge` is not an edge of this triangulation.
    pub fn diagonals(&self, edge: Edge) -> &[VertexId] {
        self.diagonals
            .get(&edge)
            .unwrap_or_else(|| panic!("({}, {}) is not an edge", edge.0, edge.1))
    }

    /// Rebuild the per-vertex neighbor sets from the edge list.
    pub fn adjacency(&self) -> Vec<BTreeSet<VertexId>> {
        let mut adjacency = vec![BTreeSet::new(); self.vertex_count];
        for &(v, u) in &self.edges {
            adjacency[v].insert(u);
            adjacency[u].insert(v);
        }
        adjacency
    }

    /// Human-readable per-vertex listing: `vertex degree neighbors…`, one
    /// line per vertex, `?` for an unset degree.
    pub fn dump(&self) -> String {
        let adjacency = self.adjacency();
        let mut buf = String::new();
        for v in 0..self.vertex_count {
            let deg = match self.degrees[v] {
                Some(d) => d.to_string(),
                None => "?".to_string(),
            };
            let neighbors: Vec<String> = adjacency[v].iter().map(|u| u.to_string()).collect();
            let _ = writeln!(buf, "{} {} {}", v, deg, neighbors.join(", "));
        }
        buf
    }
}
