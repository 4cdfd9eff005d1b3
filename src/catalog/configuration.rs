// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Reducible configurations and the `.conf` file format.
//!
//! A configuration is a near-triangulation with a ring of boundary vertices.
//! Whether the ring survives into the matchable pattern depends on the
//! interior's connectivity:
//!
//! - **with a cut vertex**: ring vertices `0..r` are kept but excluded from
//!   degree checks during matching;
//! - **without**: the ring is elided. A former ring-adjacent interior vertex
//!   that had exactly three edges into the ring keeps reducibility with its
//!   degree lowered by one, so its degree relaxes to `[deg-1, deg]`.
//!
//! File format: line 1 is a free comment; line 2 is `V R`; the remaining
//! tokens list each interior vertex as `v deg adj…` (1-based). Ring edges
//! `i`–`i+1 mod R` are implicit.

use crate::error::{Error, Result};
use crate::geometry::{Degree, EdgeId, NearTriangulation, VertexId, MIN_DEGREE};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::trace;

#[derive(Debug, Clone)]
pub struct Configuration {
    triangulation: NearTriangulation,
    ring_size: usize,
    inside_edge_id: EdgeId,
    has_cut_vertex: bool,
    path: PathBuf,
}

impl Configuration {
    /// Wrap an already-transformed near-triangulation.
    ///
    /// Locates the inside edge: the first edge with both endpoints off the
    /// ring in the cut-vertex form, edge 0 otherwise (the ring is gone, so
    /// every edge qualifies).
    pub fn new(
        ring_size: usize,
        has_cut_vertex: bool,
        path: PathBuf,
        triangulation: NearTriangulation,
    ) -> Self {
        let mut inside_edge_id = 0;
        if has_cut_vertex {
            for &(u, v) in triangulation.edges() {
                if u >= ring_size && v >= ring_size {
                    break;
                }
                inside_edge_id += 1;
            }
        }
        // A ringless configuration may be a single vertex with no edges; its
        // containment test runs on degrees alone and never uses the pin.
        assert!(
            triangulation.edges().is_empty() || inside_edge_id < triangulation.edges().len(),
            "configuration has no interior edge"
        );
        Self {
            triangulation,
            ring_size,
            inside_edge_id,
            has_cut_vertex,
            path,
        }
    }

    /// Read and transform a `.conf` file.
    pub fn read_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse the `.conf` format from `text`; `path` is carried for messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let malformed = |message: String| Error::Malformed {
            kind: "configuration",
            path: path.to_path_buf(),
            message,
        };

        let mut lines = text.lines();
        lines
            .next()
            .ok_or_else(|| malformed("empty file".to_string()))?;
        let body = lines.collect::<Vec<_>>().join("\n");
        let mut tokens = body.split_whitespace();
        let mut next_number = |what: &str| -> Result<usize> {
            tokens
                .next()
                .ok_or_else(|| malformed(format!("missing {what}")))?
                .parse::<usize>()
                .map_err(|_| malformed(format!("bad {what}")))
        };

        let vertex_count = next_number("vertex count")?;
        let ring_size = next_number("ring size")?;
        if ring_size == 0 || ring_size >= vertex_count {
            return Err(malformed(format!(
                "ring size {ring_size} out of range for {vertex_count} vertices"
            )));
        }

        let mut adjacency = vec![BTreeSet::new(); vertex_count];
        let mut degrees: Vec<Option<Degree>> = vec![None; vertex_count];
        for vi in 0..ring_size {
            let vip = (vi + 1) % ring_size;
            adjacency[vi].insert(vip);
            adjacency[vip].insert(vi);
        }
        for vi in ring_size..vertex_count {
            let v = next_number("vertex number")? - 1;
            if v != vi {
                return Err(malformed(format!(
                    "expected vertex {} but found {}",
                    vi + 1,
                    v + 1
                )));
            }
            let deg = next_number("vertex degree")?;
            degrees[v] = Some(Degree::exact(deg));
            for _ in 0..deg {
                let u = next_number("neighbor")? - 1;
                if u >= vertex_count {
                    return Err(malformed(format!("neighbor {} out of range", u + 1)));
                }
                adjacency[v].insert(u);
                adjacency[u].insert(v);
            }
        }

        if has_interior_cut_vertex(ring_size, &adjacency) {
            trace!(path = %path.display(), "configuration keeps its ring (cut vertex)");
            return Ok(Self::new(
                ring_size,
                true,
                path.to_path_buf(),
                NearTriangulation::new(vertex_count, &adjacency, degrees),
            ));
        }
        trace!(path = %path.display(), "configuration drops its ring");

        // Elide the ring. A vertex with exactly three edges out to the ring
        // keeps reducibility at one degree less, so its degree relaxes.
        let interior_count = vertex_count - ring_size;
        let mut interior = vec![BTreeSet::new(); interior_count];
        for v in ring_size..vertex_count {
            let mut ring_incident = false;
            for &u in &adjacency[v] {
                if u < ring_size {
                    ring_incident = true;
                    continue;
                }
                interior[v - ring_size].insert(u - ring_size);
            }
            let interior_adjacency = interior[v - ring_size].len();
            let deg = degrees[v].expect("interior degrees are read").upper();
            if ring_incident && deg == interior_adjacency + 3 {
                degrees[v] = Some(Degree::new(std::cmp::max(deg - 1, MIN_DEGREE), deg));
            }
        }
        degrees.drain(..ring_size);

        Ok(Self::new(
            ring_size,
            false,
            path.to_path_buf(),
            NearTriangulation::new(interior_count, &interior, degrees),
        ))
    }

    pub fn triangulation(&self) -> &NearTriangulation {
        &self.triangulation
    }

    pub fn ring_size(&self) -> usize {
        self.ring_size
    }

    pub fn has_cut_vertex(&self) -> bool {
        self.has_cut_vertex
    }

    /// An edge with both endpoints off the ring, usable as the matching pin.
    pub fn inside_edge_id(&self) -> EdgeId {
        self.inside_edge_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Articulation-point search over the interior (ring vertices skipped),
/// rooted at the first interior vertex.
fn has_interior_cut_vertex(ring_size: usize, adjacency: &[BTreeSet<VertexId>]) -> bool {
    struct Dfs<'a> {
        ring_size: usize,
        adjacency: &'a [BTreeSet<VertexId>],
        order: Vec<Option<usize>>,
        low: Vec<usize>,
        next_order: usize,
        found: bool,
    }

    impl Dfs<'_> {
        fn visit(&mut self, v: VertexId, parent: Option<VertexId>) {
            let num = self.next_order;
            self.next_order += 1;
            self.order[v] = Some(num);
            self.low[v] = num;
            let mut children = 0;
            for &u in &self.adjacency[v].clone() {
                if Some(u) == parent || u < self.ring_size {
                    continue;
                }
                if let Some(seen) = self.order[u] {
                    self.low[v] = self.low[v].min(seen);
                    continue;
                }
                children += 1;
                self.visit(u, Some(v));
                self.low[v] = self.low[v].min(self.low[u]);
                if parent.is_some() && num <= self.low[u] {
                    self.found = true;
                }
            }
            if parent.is_none() && children >= 2 {
                self.found = true;
            }
        }
    }

    let mut dfs = Dfs {
        ring_size,
        adjacency,
        order: vec![None; adjacency.len()],
        low: vec![0; adjacency.len()],
        next_order: 0,
        found: false,
    };
    dfs.visit(ring_size, None);
    dfs.found
}
