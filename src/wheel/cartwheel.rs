// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Cartwheels: the hub with its first, second and third neighborhoods.
//!
//! A cartwheel starts from a wheel and instantiates further rings lazily:
//! second neighbors appear only around rim vertices with fixed degrees, and
//! third neighbors only once [`CartWheel::extend_third_neighbor`] runs. A
//! vertex with an open degree range (`8+`) or no degree at all defers the
//! part of the neighborhood that would hang off it.

use crate::catalog::Rule;
use crate::charge::{amount_charge_to_send, initial_charge};
use crate::geometry::{Degree, NearTriangulation, VertexId};
use crate::wheel::{Wheel, WheelGraph};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CartWheel {
    triangulation: NearTriangulation,
    neighbor_count: usize,
    /// For each fixed-degree rim vertex `v`, the clockwise second-neighbor
    /// arc between `v`'s rim predecessor-side and successor-side corners;
    /// length `deg(v) - 3`.
    hub_neighbor_neighbors: Vec<Vec<VertexId>>,
    /// For each fixed-degree second neighbor `u` (after the third extension),
    /// the clockwise arc of `u`'s neighbors that are third neighbors of the
    /// hub.
    third_neighbors: Vec<Vec<VertexId>>,
}

/// Only a set, single-valued degree pins a vertex's neighborhood down.
fn is_fixed(degree: Option<Degree>) -> bool {
    matches!(degree, Some(d) if d.is_fixed())
}

/// A set but open-ended range defers its span of the boundary.
fn is_open_range(degree: Option<Degree>) -> bool {
    matches!(degree, Some(d) if !d.is_fixed())
}

impl CartWheel {
    /// Build the second neighborhood of a wheel.
    ///
    /// For each consecutive rim pair with at least one fixed degree, one
    /// shared second neighbor closes their triangle fan; each fixed-degree
    /// rim vertex `v` then gets `deg(v) - 5` further second neighbors
    /// between its two corners.
    pub fn from_wheel(wheel: &Wheel) -> Self {
        let hub = 0;
        let hub_degree = wheel.hub_degree();
        let mut adjacency: Vec<BTreeSet<VertexId>> = vec![BTreeSet::new(); hub_degree + 1];
        let mut degrees = wheel.triangulation().degrees().to_vec();
        let mut hub_neighbor_neighbors: Vec<Vec<VertexId>> = vec![Vec::new(); hub_degree + 1];

        let mut shared_corner = vec![0; hub_degree + 1];
        for v in 1..=hub_degree {
            let u = if v == hub_degree { 1 } else { v + 1 };
            add_edge(&mut adjacency, v, u);
            add_edge(&mut adjacency, hub, v);
            if !is_fixed(degrees[v]) && !is_fixed(degrees[u]) {
                // neither endpoint pins the triangle fan past the rim
                continue;
            }
            let w = new_vertex(&mut adjacency, &mut degrees);
            add_edge(&mut adjacency, v, w);
            add_edge(&mut adjacency, u, w);
            shared_corner[v] = w;
        }

        for v in 1..=hub_degree {
            let Some(deg) = degrees[v] else { continue };
            if !deg.is_fixed() {
                continue;
            }
            let predecessor = if v == 1 { hub_degree } else { v - 1 };
            let mut first = shared_corner[predecessor];
            let last = shared_corner[v];
            hub_neighbor_neighbors[v].push(first);
            assert!(deg.lower() >= 5);
            for _ in 0..deg.lower() - 5 {
                let w = new_vertex(&mut adjacency, &mut degrees);
                add_edge(&mut adjacency, v, w);
                add_edge(&mut adjacency, first, w);
                first = w;
                hub_neighbor_neighbors[v].push(w);
            }
            hub_neighbor_neighbors[v].push(last);
            add_edge(&mut adjacency, first, last);
        }

        let vertex_count = adjacency.len();
        let triangulation = NearTriangulation::new(vertex_count, &adjacency, degrees);
        Self {
            neighbor_count: hub_degree,
            hub_neighbor_neighbors,
            third_neighbors: vec![Vec::new(); vertex_count],
            triangulation,
        }
    }

    pub fn hub_neighbor_neighbors(&self) -> &[Vec<VertexId>] {
        &self.hub_neighbor_neighbors
    }

    pub fn third_neighbors(&self) -> &[Vec<VertexId>] {
        &self.third_neighbors
    }

    /// Grow the third neighborhood.
    ///
    /// Walks the current boundary circuit (rim vertices with non-fixed
    /// degrees stand in for their missing second-neighbor arcs) and creates
    /// one ring vertex between each consecutive circuit pair, reusing ring
    /// vertices where a boundary vertex's degree is already exhausted; then
    /// pads every fixed-degree circuit vertex up to its degree. Spans whose
    /// two ends both have open-ended ranges stay deferred.
    pub fn extend_third_neighbor(&mut self) {
        let vertex_count = self.triangulation.vertex_count();
        let mut adjacency: Vec<BTreeSet<VertexId>> = vec![BTreeSet::new(); vertex_count];
        let mut degrees = self.triangulation.degrees().to_vec();
        let mut third_neighbors: Vec<Vec<VertexId>> = vec![Vec::new(); vertex_count];

        // densify: every triangle recorded in the diagonal index becomes
        // explicit adjacency
        for &edge in self.triangulation.edges() {
            for &v in self.triangulation.diagonals(edge) {
                add_edge(&mut adjacency, v, edge.0);
                add_edge(&mut adjacency, v, edge.1);
                add_edge(&mut adjacency, edge.0, edge.1);
            }
        }

        let hub_degree = self.neighbor_count;
        let mut circuit: Vec<VertexId> = Vec::new();
        for v in 1..=hub_degree {
            if !is_fixed(degrees[v]) {
                circuit.push(v);
            } else {
                let arc = &self.hub_neighbor_neighbors[v];
                assert!(!arc.is_empty(), "rim degree was fixed after the second ring was built");
                circuit.extend_from_slice(&arc[..arc.len() - 1]);
                let successor = if v == hub_degree { 1 } else { v + 1 };
                if !is_fixed(degrees[successor]) {
                    circuit.push(*arc.last().expect("fixed rim vertex has an arc"));
                }
            }
        }

        let len = circuit.len();
        let mut ring_vertex: Vec<Option<VertexId>> = vec![None; vertex_count];
        let opening_degree = degrees[circuit[0]];
        for cidx in 0..len {
            let v = circuit[cidx];
            let u = circuit[(cidx + 1) % len];
            let degv = degrees[v];
            let degu = degrees[u];
            // closing corner: the wrap-around vertex needs exactly the two
            // edges to the opening ring vertex, which is also v's ring vertex
            if cidx + 2 == len
                && is_fixed(degu)
                && adjacency[u].len() == degu.expect("fixed").lower() - 1
                && is_fixed(opening_degree)
                && adjacency[circuit[0]].len() == opening_degree.expect("fixed").lower()
            {
                let w = ring_vertex[circuit[0]].expect("opening pair built its ring vertex");
                ring_vertex[v] = Some(w);
                add_edge(&mut adjacency, v, w);
                add_edge(&mut adjacency, u, w);
                continue;
            }
            // v's degree is exhausted: its ring vertex is the previous one
            if is_fixed(degv) && adjacency[v].len() == degv.expect("fixed").lower() {
                assert!(cidx > 0, "the opening circuit vertex has room for its ring");
                let w = ring_vertex[circuit[cidx - 1]].expect("previous pair built its ring vertex");
                ring_vertex[v] = Some(w);
                add_edge(&mut adjacency, u, w);
                continue;
            }
            // the wrap-around vertex is exhausted: close onto the opening
            if is_fixed(degu) && adjacency[u].len() == degu.expect("fixed").lower() {
                assert!(cidx == len - 1, "only the closing pair can reuse the opening");
                let w = ring_vertex[circuit[0]].expect("opening pair built its ring vertex");
                ring_vertex[v] = Some(w);
                add_edge(&mut adjacency, v, w);
                continue;
            }
            if is_open_range(degv) && is_open_range(degu) {
                // open-ended span, third ring deferred
                continue;
            }
            let w = new_vertex3(&mut adjacency, &mut degrees, &mut third_neighbors);
            ring_vertex[v] = Some(w);
            add_edge(&mut adjacency, u, w);
            add_edge(&mut adjacency, v, w);
        }

        // pad every fixed circuit vertex up to its degree
        for cidx in 0..len {
            let v = circuit[cidx];
            let Some(degv) = degrees[v] else { continue };
            if !degv.is_fixed() {
                continue;
            }
            let u = if cidx == 0 {
                circuit[len - 1]
            } else {
                circuit[cidx - 1]
            };
            let mut first = ring_vertex[u].expect("ring vertex before a fixed circuit vertex");
            let last = ring_vertex[v].expect("ring vertex after a fixed circuit vertex");
            third_neighbors[v].push(first);
            if first == last {
                continue;
            }
            assert!(adjacency[v].len() <= degv.lower());
            let missing = degv.lower() - adjacency[v].len();
            for _ in 0..missing {
                let w = new_vertex3(&mut adjacency, &mut degrees, &mut third_neighbors);
                add_edge(&mut adjacency, first, w);
                add_edge(&mut adjacency, v, w);
                third_neighbors[v].push(w);
                first = w;
            }
            third_neighbors[v].push(last);
            add_edge(&mut adjacency, first, last);
        }

        self.triangulation = NearTriangulation::new(adjacency.len(), &adjacency, degrees);
        self.third_neighbors = third_neighbors;
    }

    /// Settle the discharging account of the hub against `rules`.
    ///
    /// Returns whether the final charge is strictly positive, and the mask
    /// of vertices any firing rule touches. Every flow must be tight by now:
    /// loose bounds mean the cartwheel was not fully decided.
    pub fn is_overcharged(&self, rules: &[Rule]) -> (bool, Vec<bool>) {
        let hub = 0;
        let hub_degree = self.neighbor_count;
        let nt = &self.triangulation;
        let mut receive = 0;
        let mut send = 0;
        let mut related = vec![false; nt.vertex_count()];
        let mut rim_account: Vec<(String, i32)> = vec![(String::new(), 0); hub_degree];
        for neighbor in 1..=hub_degree {
            for rule in rules {
                let incoming = amount_charge_to_send(nt, neighbor, hub, rule);
                let outgoing = amount_charge_to_send(nt, hub, neighbor, rule);
                assert!(
                    incoming.lower == incoming.upper && outgoing.lower == outgoing.upper,
                    "charge bounds are tight on a fully decided cartwheel"
                );
                receive += incoming.lower;
                send += outgoing.lower;
                for v in 0..nt.vertex_count() {
                    related[v] = related[v] || incoming.related[v] || outgoing.related[v];
                }
                rim_account[neighbor - 1].1 += incoming.lower;
            }
            rim_account[neighbor - 1].0 = nt
                .degree(neighbor)
                .expect("rim degrees are decided")
                .to_string();
        }
        let initial = initial_charge(hub_degree);
        let charge = initial + receive - send;
        debug!(?rim_account, "charges received per neighbor");
        debug!(
            initial,
            receive, send, charge, "cartwheel charge account"
        );
        (charge > 0, related)
    }

    /// Serialize as `V E deg0 … deg_{V-1} u0 v0 u1 v1 …`, masking the degree
    /// of every vertex `show_degree` rejects with `?`.
    pub fn to_line_masked(&self, show_degree: &[bool]) -> String {
        let nt = &self.triangulation;
        let mut parts = vec![
            nt.vertex_count().to_string(),
            nt.edges().len().to_string(),
        ];
        for v in 0..nt.vertex_count() {
            parts.push(match nt.degree(v) {
                Some(deg) if show_degree[v] => deg.to_string(),
                _ => "?".to_string(),
            });
        }
        for &(u, v) in nt.edges() {
            parts.push(u.to_string());
            parts.push(v.to_string());
        }
        parts.join(" ")
    }
}

impl WheelGraph for CartWheel {
    fn triangulation(&self) -> &NearTriangulation {
        &self.triangulation
    }

    fn set_degree(&mut self, v: VertexId, degree: Option<Degree>) {
        self.triangulation.set_degree(v, degree);
    }

    fn hub_degree(&self) -> usize {
        self.neighbor_count
    }

    fn to_line(&self) -> String {
        self.to_line_masked(&vec![true; self.triangulation.vertex_count()])
    }
}

fn add_edge(adjacency: &mut [BTreeSet<VertexId>], v: VertexId, u: VertexId) {
    adjacency[v].insert(u);
    adjacency[u].insert(v);
}

fn new_vertex(
    adjacency: &mut Vec<BTreeSet<VertexId>>,
    degrees: &mut Vec<Option<Degree>>,
) -> VertexId {
    let v = adjacency.len();
    adjacency.push(BTreeSet::new());
    degrees.push(None);
    v
}

fn new_vertex3(
    adjacency: &mut Vec<BTreeSet<VertexId>>,
    degrees: &mut Vec<Option<Degree>>,
    third_neighbors: &mut Vec<Vec<VertexId>>,
) -> VertexId {
    let v = new_vertex(adjacency, degrees);
    third_neighbors.push(Vec::new());
    v
}
