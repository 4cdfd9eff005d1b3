// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Oriented three-valued subgraph containment on near-triangulations.
//!
//! The matcher pins one directed pattern edge onto one directed host edge and
//! extends the correspondence deterministically along triangle diagonals: once
//! an edge pair is aligned, the vertices completing triangles on either side
//! of it must correspond too, which aligns further edge pairs. Degree ranges
//! are checked as vertices are paired.
//!
//! # Verdicts
//!
//! A [`MatchResult`] carries a [`Containment`] verdict:
//! - `Yes`: every non-ignored pattern vertex is embedded and its degree range
//!   covers the host vertex's degree.
//! - `Possible`: the embedding could still work out — the only obstacles are
//!   host vertices with no degree yet, or pattern vertices hanging off the
//!   edge of the host. Reported only when `detect_possible` is on; otherwise
//!   those cases are `No`.
//! - `No`: some paired degree is incompatible.
//!
//! The pinned edge admits up to two extensions (a mirror pair when both sides
//! of it carry two diagonals), so the result list has length 0, 1 or 2.
//!
//! # Mutable state
//!
//! All accumulators (`occupied`, `located`, the visited-edge set) live in a
//! transient [`MatchContext`] owned by a single call; nothing is shared or
//! retained across invocations.

pub mod conf_filter;
pub mod isomorphism;

pub use conf_filter::{contains_any_configuration, contains_configuration};
pub use isomorphism::{is_isomorphic, make_unique, make_unique_with_charge, unique_modulo_edge};

use crate::geometry::{Edge, EdgeId, NearTriangulation, VertexId};
use std::collections::{BTreeSet, HashSet};
use tracing::trace;

/// Three-valued containment verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    Yes,
    Possible,
    No,
}

/// One way of laying the pattern over the host.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub containment: Containment,
    /// For each host vertex, the pattern vertex lying on it, if any.
    /// Ignored pattern vertices never appear here. Empty for `No`.
    pub occupied: Vec<Option<VertexId>>,
}

/// Pin `pattern_edge` onto `host_edge` (respecting direction) and extend.
///
/// `ignored` lists pattern vertices exempt from the degree check and from the
/// embedding requirement (a configuration's ring). Returns the 0–2 extension
/// outcomes.
pub fn contain_subgraph(
    host: &NearTriangulation,
    pattern: &NearTriangulation,
    host_edge: EdgeId,
    pattern_edge: EdgeId,
    ignored: &BTreeSet<VertexId>,
    detect_possible: bool,
) -> Vec<MatchResult> {
    let context = MatchContext {
        host,
        pattern,
        ignored,
        detect_possible,
        occupied: vec![None; host.vertex_count()],
        located: vec![None; pattern.vertex_count()],
        results: Vec::new(),
    };
    context.run(host.edges()[host_edge], pattern.edges()[pattern_edge])
}

/// Count the `Yes` outcomes of [`contain_subgraph`] with `detect_possible`
/// off. Zero means the pattern does not embed with that edge alignment.
pub fn count_embeddings(
    host: &NearTriangulation,
    pattern: &NearTriangulation,
    host_edge: EdgeId,
    pattern_edge: EdgeId,
    ignored: &BTreeSet<VertexId>,
) -> usize {
    contain_subgraph(host, pattern, host_edge, pattern_edge, ignored, false)
        .iter()
        .filter(|r| r.containment == Containment::Yes)
        .count()
}

/// Accumulators of one matching attempt.
struct MatchContext<'a> {
    host: &'a NearTriangulation,
    pattern: &'a NearTriangulation,
    ignored: &'a BTreeSet<VertexId>,
    detect_possible: bool,
    /// host vertex -> pattern vertex lying on it
    occupied: Vec<Option<VertexId>>,
    /// pattern vertex -> host vertex it lies on
    located: Vec<Option<VertexId>>,
    results: Vec<MatchResult>,
}

impl MatchContext<'_> {
    /// Is the degree range of pattern vertex `pv` compatible with host vertex
    /// `hv`? Ignored pattern vertices and pattern vertices without a range
    /// always pass. A host vertex without a degree passes only when
    /// `detect_possible` (the range may still be satisfied later).
    fn degrees_compatible(&self, pv: VertexId, hv: VertexId, detect_possible: bool) -> bool {
        if self.ignored.contains(&pv) {
            return true;
        }
        let Some(pattern_degree) = self.pattern.degree(pv) else {
            return true;
        };
        let Some(host_degree) = self.host.degree(hv) else {
            return detect_possible;
        };
        pattern_degree.includes(host_degree)
    }

    fn bind(&mut self, pv: VertexId, hv: VertexId) {
        self.occupied[hv] = Some(pv);
        self.located[pv] = Some(hv);
    }

    /// Having aligned `host_edge` with `pattern_edge`, pair off their
    /// diagonal vertices and recursively align the edges that pairing
    /// creates. Returns false as soon as any degree check fails (propagation
    /// still continues where the short-circuit allows, mirroring the
    /// accumulate-then-report structure of the verdict).
    fn extend(
        &mut self,
        host_edge: Edge,
        pattern_edge: Edge,
        visited: &mut HashSet<Edge>,
    ) -> bool {
        if !visited.insert(host_edge) {
            return true;
        }
        trace!(?host_edge, ?pattern_edge, "aligning edge pair");
        let host = self.host;
        let pattern = self.pattern;
        let host_diagonals = host.diagonals(host_edge);
        let pattern_diagonals = pattern.diagonals(pattern_edge);

        let mut degrees_match = true;
        let mut fresh_pairings = 0;
        for &pv in pattern_diagonals {
            let mut pairings_for_pv = 0;
            for &hv in host_diagonals {
                let both_free = self.located[pv].is_none() && self.occupied[hv].is_none();
                let already_paired =
                    self.located[pv] == Some(hv) && self.occupied[hv] == Some(pv);
                if !both_free && !already_paired {
                    continue;
                }
                if both_free {
                    fresh_pairings += 1;
                }
                pairings_for_pv += 1;
                if !self.degrees_compatible(pv, hv, self.detect_possible) {
                    degrees_match = false;
                    continue;
                }
                self.bind(pv, hv);
                degrees_match = degrees_match
                    && self.extend((host_edge.0, hv), (pattern_edge.0, pv), visited);
                degrees_match = degrees_match
                    && self.extend((host_edge.1, hv), (pattern_edge.1, pv), visited);
            }
            // With the edge pair aligned, at most one diagonal pairing can be
            // consistent: a minimal counterexample has no 4-cut, so an edge
            // has at most two diagonals of which one is already spoken for.
            assert!(pairings_for_pv <= 1, "ambiguous diagonal pairing");
        }
        assert!(fresh_pairings <= 1, "ambiguous diagonal pairing");
        degrees_match
    }

    /// Record the outcome of one completed extension attempt.
    fn push_result(&mut self, degrees_matched: bool) {
        if !degrees_matched {
            self.results.push(MatchResult {
                containment: Containment::No,
                occupied: Vec::new(),
            });
            return;
        }
        let mut undecided = false;
        for pv in 0..self.pattern.vertex_count() {
            if self.ignored.contains(&pv) {
                continue;
            }
            match self.located[pv] {
                // the pattern sticks out past the host boundary
                None => {
                    undecided = true;
                    break;
                }
                Some(hv) => {
                    if !self.degrees_compatible(pv, hv, false) {
                        undecided = true;
                        break;
                    }
                }
            }
        }
        let result = if undecided {
            if self.detect_possible {
                MatchResult {
                    containment: Containment::Possible,
                    occupied: self.occupancy(),
                }
            } else {
                MatchResult {
                    containment: Containment::No,
                    occupied: Vec::new(),
                }
            }
        } else {
            MatchResult {
                containment: Containment::Yes,
                occupied: self.occupancy(),
            }
        };
        self.results.push(result);
    }

    /// The host-indexed occupancy map with ignored pattern vertices masked.
    fn occupancy(&self) -> Vec<Option<VertexId>> {
        self.occupied
            .iter()
            .map(|&pv| pv.filter(|p| !self.ignored.contains(p)))
            .collect()
    }

    fn run(mut self, host_edge: Edge, pattern_edge: Edge) -> Vec<MatchResult> {
        trace!(?host_edge, ?pattern_edge, "pinning edges");
        if !self.degrees_compatible(pattern_edge.0, host_edge.0, self.detect_possible)
            || !self.degrees_compatible(pattern_edge.1, host_edge.1, self.detect_possible)
        {
            return Vec::new();
        }
        self.bind(pattern_edge.0, host_edge.0);
        self.bind(pattern_edge.1, host_edge.1);

        let host_diagonals = self.host.diagonals(host_edge).to_vec();
        let pattern_diagonals = self.pattern.diagonals(pattern_edge).to_vec();
        let pinned = (self.occupied.clone(), self.located.clone());

        match (pattern_diagonals.len(), host_diagonals.len()) {
            // One pattern diagonal against two host diagonals: it may sit on
            // either, and each choice fixes two more edge pairs.
            (1, 2) => {
                let pv = pattern_diagonals[0];
                for &hv in &host_diagonals {
                    self.occupied.clone_from(&pinned.0);
                    self.located.clone_from(&pinned.1);
                    if !self.degrees_compatible(pv, hv, self.detect_possible) {
                        continue;
                    }
                    self.bind(pv, hv);
                    let mut visited = HashSet::new();
                    let mut ok = true;
                    ok = ok && self.extend((host_edge.0, hv), (pattern_edge.0, pv), &mut visited);
                    ok = ok && self.extend((host_edge.1, hv), (pattern_edge.1, pv), &mut visited);
                    self.push_result(ok);
                }
            }
            // Mirror image of the previous case.
            (2, 1) => {
                let hv = host_diagonals[0];
                for &pv in &pattern_diagonals {
                    self.occupied.clone_from(&pinned.0);
                    self.located.clone_from(&pinned.1);
                    if !self.degrees_compatible(pv, hv, self.detect_possible) {
                        continue;
                    }
                    self.bind(pv, hv);
                    let mut visited = HashSet::new();
                    let mut ok = true;
                    ok = ok && self.extend((host_edge.0, hv), (pattern_edge.0, pv), &mut visited);
                    ok = ok && self.extend((host_edge.1, hv), (pattern_edge.1, pv), &mut visited);
                    self.push_result(ok);
                }
            }
            // Two against two: pairing one diagonal fixes the other, so the
            // two orientations of the pattern across the pinned edge give at
            // most two results.
            (2, 2) => {
                for i in 0..2 {
                    self.occupied.clone_from(&pinned.0);
                    self.located.clone_from(&pinned.1);
                    let (pv0, pv1) = (pattern_diagonals[i], pattern_diagonals[1 - i]);
                    let (hv0, hv1) = (host_diagonals[0], host_diagonals[1]);
                    if !self.degrees_compatible(pv0, hv0, self.detect_possible)
                        || !self.degrees_compatible(pv1, hv1, self.detect_possible)
                    {
                        continue;
                    }
                    self.bind(pv0, hv0);
                    self.bind(pv1, hv1);
                    let mut visited = HashSet::new();
                    let mut ok = true;
                    ok = ok && self.extend((host_edge.0, hv0), (pattern_edge.0, pv0), &mut visited);
                    ok = ok && self.extend((host_edge.1, hv0), (pattern_edge.1, pv0), &mut visited);
                    ok = ok && self.extend((host_edge.0, hv1), (pattern_edge.0, pv1), &mut visited);
                    ok = ok && self.extend((host_edge.1, hv1), (pattern_edge.1, pv1), &mut visited);
                    self.push_result(ok);
                }
            }
            // (0, _), (1, 0), (1, 1), (2, 0): the alignment is forced and a
            // single propagation from the pinned edge decides it.
            _ => {
                let mut visited = HashSet::new();
                let ok = self.extend(host_edge, pattern_edge, &mut visited);
                self.push_result(ok);
            }
        }
        self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Degree;

    fn wheel_triangulation(d: usize, rim: Option<Degree>) -> NearTriangulation {
        let mut adjacency = vec![BTreeSet::new(); d + 1];
        let mut degrees = vec![rim; d + 1];
        degrees[0] = Some(Degree::exact(d));
        for v in 1..=d {
            let u = if v == d { 1 } else { v + 1 };
            adjacency[v].insert(u);
            adjacency[u].insert(v);
            adjacency[0].insert(v);
            adjacency[v].insert(0);
        }
        NearTriangulation::new(d + 1, &adjacency, degrees)
    }

    /// A bare edge pattern between two degree ranges.
    fn edge_pattern(from: Degree, to: Degree) -> NearTriangulation {
        let mut adjacency = vec![BTreeSet::new(); 2];
        adjacency[0].insert(1);
        adjacency[1].insert(0);
        NearTriangulation::new(2, &adjacency, vec![Some(from), Some(to)])
    }

    #[test]
    fn test_result_list_is_at_most_two() {
        let host = wheel_triangulation(6, Some(Degree::exact(6)));
        for host_edge in 0..host.edges().len() {
            let results =
                contain_subgraph(&host, &host, host_edge, 0, &BTreeSet::new(), false);
            assert!(results.len() <= 2);
        }
    }

    #[test]
    fn test_self_match_on_wheel() {
        // A wheel laid over itself along (0, 1); the mirror pairing also
        // embeds, so both extensions are Yes.
        let host = wheel_triangulation(6, Some(Degree::exact(6)));
        let edge = host.edge_id(0, 1).unwrap();
        let results = contain_subgraph(&host, &host, edge, edge, &BTreeSet::new(), false);
        assert!(!results.is_empty());
        assert!(results
            .iter()
            .all(|r| r.containment == Containment::Yes));
    }

    #[test]
    fn test_pattern_degree_range_covers_host() {
        // Pattern rim degrees unset cover any host rim degree.
        let host = wheel_triangulation(6, Some(Degree::exact(5)));
        let pattern = wheel_triangulation(6, None);
        let edge = host.edge_id(0, 1).unwrap();
        let results =
            contain_subgraph(&host, &pattern, edge, edge, &BTreeSet::new(), false);
        assert!(results
            .iter()
            .any(|r| r.containment == Containment::Yes));
    }

    #[test]
    fn test_failed_pin_returns_empty_list() {
        let host = wheel_triangulation(6, Some(Degree::exact(6)));
        let pattern = edge_pattern(Degree::exact(5), Degree::exact(5));
        // host edge (0, 1) starts at the degree-6 hub; pattern wants 5
        let edge = host.edge_id(0, 1).unwrap();
        let results = contain_subgraph(
            &host,
            &pattern,
            edge,
            pattern.edge_id(0, 1).unwrap(),
            &BTreeSet::new(),
            true,
        );
        assert!(results.is_empty());
    }

    #[test]
    fn test_unset_host_degree_is_possible_or_no() {
        let host = wheel_triangulation(6, None);
        let pattern = edge_pattern(Degree::exact(6), Degree::exact(5));
        // rim-to-rim host edge (1, 2), both host degrees unset
        let host_edge = host.edge_id(1, 2).unwrap();
        let pattern_edge = pattern.edge_id(0, 1).unwrap();

        let detecting =
            contain_subgraph(&host, &pattern, host_edge, pattern_edge, &BTreeSet::new(), true);
        assert!(!detecting.is_empty());
        assert!(detecting
            .iter()
            .all(|r| r.containment == Containment::Possible));

        let strict =
            contain_subgraph(&host, &pattern, host_edge, pattern_edge, &BTreeSet::new(), false);
        assert!(strict.is_empty());
    }

    #[test]
    fn test_ignored_vertices_are_masked_from_occupancy() {
        let host = wheel_triangulation(5, Some(Degree::exact(5)));
        let pattern = wheel_triangulation(5, Some(Degree::exact(5)));
        let ignored: BTreeSet<VertexId> = [2, 3].into_iter().collect();
        let edge = host.edge_id(0, 1).unwrap();
        let results = contain_subgraph(&host, &pattern, edge, edge, &ignored, false);
        for result in &results {
            if result.containment == Containment::Yes {
                assert!(result
                    .occupied
                    .iter()
                    .flatten()
                    .all(|pv| !ignored.contains(pv)));
            }
        }
    }

    #[test]
    fn test_degree_mismatch_deep_in_propagation_is_no() {
        // Pin survives, both diagonal pairings survive, but propagation one
        // step further hits rim vertices of degree 7 against pattern 5s.
        let mut host = wheel_triangulation(5, Some(Degree::exact(5)));
        host.set_degree(3, Some(Degree::exact(7)));
        host.set_degree(4, Some(Degree::exact(7)));
        let pattern = wheel_triangulation(5, Some(Degree::exact(5)));
        let edge = host.edge_id(0, 1).unwrap();
        let results = contain_subgraph(&host, &pattern, edge, edge, &BTreeSet::new(), true);
        assert!(!results.is_empty());
        assert!(results
            .iter()
            .all(|r| r.containment == Containment::No));
    }
}
