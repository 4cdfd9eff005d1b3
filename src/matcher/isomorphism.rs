// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Isomorphism modulo rotation, and de-duplication sweeps built on it.
//!
//! Two wheel-like graphs are isomorphic when some edge of one can be pinned
//! to edge 0 of the other with a `Yes` containment in both directions. The
//! uniquing sweeps are quadratic in the list length; for the list sizes the
//! enumerator produces this costs far less than the matching itself.

use crate::geometry::{EdgeId, NearTriangulation};
use crate::matcher::count_embeddings;
use crate::wheel::WheelGraph;
use std::collections::BTreeSet;

/// Do `a` and `b` carry the same near-triangulation up to rotation?
///
/// Tries every edge of `b` against edge 0 of `a`; a shared alignment that
/// embeds both ways is an isomorphism.
pub fn is_isomorphic(a: &NearTriangulation, b: &NearTriangulation) -> bool {
    let none = BTreeSet::new();
    for edge_id in 0..b.edges().len() {
        if count_embeddings(a, b, 0, edge_id, &none) > 0
            && count_embeddings(b, a, edge_id, 0, &none) > 0
        {
            return true;
        }
    }
    false
}

/// Keep the first representative of each isomorphism class.
pub fn make_unique<W: WheelGraph>(wheels: Vec<W>) -> Vec<W> {
    let mut unique_wheels: Vec<W> = Vec::new();
    'sweep: for wheel in wheels {
        for known in &unique_wheels {
            if is_isomorphic(wheel.triangulation(), known.triangulation()) {
                continue 'sweep;
            }
        }
        unique_wheels.push(wheel);
    }
    unique_wheels
}

/// Like [`make_unique`], but each wheel carries an associated charge amount;
/// merging two duplicates keeps the larger amount (the conservative choice
/// for the enumerator's bound).
pub fn make_unique_with_charge<W: WheelGraph>(
    wheels: Vec<W>,
    charges: Vec<i32>,
) -> (Vec<W>, Vec<i32>) {
    let mut unique_wheels: Vec<W> = Vec::new();
    let mut unique_charges: Vec<i32> = Vec::new();
    'sweep: for (wheel, charge) in wheels.into_iter().zip(charges) {
        for (known, known_charge) in unique_wheels.iter().zip(unique_charges.iter_mut()) {
            if is_isomorphic(wheel.triangulation(), known.triangulation()) {
                *known_charge = (*known_charge).max(charge);
                continue 'sweep;
            }
        }
        unique_wheels.push(wheel);
        unique_charges.push(charge);
    }
    (unique_wheels, unique_charges)
}

/// De-duplicate with a distinguished edge held in place: two wheels count as
/// the same when each embeds in the other with `edge_id` aligned to itself.
/// Used where a send edge must keep its identity across the sweep.
pub fn unique_modulo_edge<W: WheelGraph>(wheels: Vec<W>, edge_id: EdgeId) -> Vec<W> {
    let none = BTreeSet::new();
    let mut unique_wheels: Vec<W> = Vec::new();
    'sweep: for wheel in wheels {
        for known in &unique_wheels {
            if count_embeddings(
                wheel.triangulation(),
                known.triangulation(),
                edge_id,
                edge_id,
                &none,
            ) > 0
                && count_embeddings(
                    known.triangulation(),
                    wheel.triangulation(),
                    edge_id,
                    edge_id,
                    &none,
                ) > 0
            {
                continue 'sweep;
            }
        }
        unique_wheels.push(wheel);
    }
    unique_wheels
}
