// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Does a reducible configuration from the catalog embed in a wheel?
//!
//! A hit means the candidate neighborhood cannot belong to a minimal
//! counterexample, so the enumerator drops it.

use crate::catalog::Configuration;
use crate::geometry::{NearTriangulation, VertexId};
use crate::matcher::count_embeddings;
use crate::wheel::WheelGraph;
use std::collections::BTreeSet;
use tracing::trace;

/// Does `conf` embed anywhere in `host`?
///
/// Ring vertices of a cut-vertex configuration are exempt from the check;
/// the pattern's inside edge is tried against every directed host edge.
pub fn contains_configuration(host: &NearTriangulation, conf: &Configuration) -> bool {
    // A single-vertex configuration has no edge to pin; it embeds wherever
    // some host vertex's decided degree falls inside its range.
    if conf.triangulation().edges().is_empty() {
        let range = conf
            .triangulation()
            .degree(0)
            .expect("a single-vertex configuration carries a degree");
        return host
            .degrees()
            .iter()
            .flatten()
            .any(|&deg| range.includes(deg));
    }
    let ring_vertices: BTreeSet<VertexId> = if conf.has_cut_vertex() {
        (0..conf.ring_size()).collect()
    } else {
        BTreeSet::new()
    };
    let pattern_edge = conf.inside_edge_id();
    for host_edge in 0..host.edges().len() {
        if count_embeddings(
            host,
            conf.triangulation(),
            host_edge,
            pattern_edge,
            &ring_vertices,
        ) > 0
        {
            return true;
        }
    }
    false
}

/// Does any configuration of the catalog embed in the wheel?
pub fn contains_any_configuration<W: WheelGraph>(
    wheel: &W,
    confs: &[Configuration],
) -> bool {
    trace!(wheel = %wheel.to_line(), "checking configuration containment");
    for (index, conf) in confs.iter().enumerate() {
        trace!(conf = index, "trying configuration");
        if contains_configuration(wheel.triangulation(), conf) {
            return true;
        }
    }
    false
}
