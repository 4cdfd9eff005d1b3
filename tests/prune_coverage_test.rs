// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Cross-coverage of the enumerator's pruning: every overcharged cartwheel
//! reachable without the charge bound is still found with it. The
//! committed-amount prune discards branches whose case a sibling with a
//! larger committed amount owns, so the witness sets must agree modulo
//! isomorphism.

mod common;

use common::edge_rule;
use discharge_search::matcher::{is_isomorphic, make_unique};
use discharge_search::search::{close_open_degrees, decide_degree_by_send_cases};
use discharge_search::wheel::{CartWheel, Wheel, WheelGraph};

fn overcharged_witnesses(charge_bound: bool) -> Vec<CartWheel> {
    let rules = [edge_rule("5", "5", 2)];
    let wheel = Wheel::from_hub_degree(5);
    let base = CartWheel::from_wheel(&wheel);
    // threshold is minus the initial charge of a degree-5 hub
    let mut refined = decide_degree_by_send_cases(&base, &rules, &[], 8, -10, charge_bound);
    for cartwheel in refined.iter_mut() {
        close_open_degrees(cartwheel, 8);
    }
    let unique = make_unique(refined);
    unique
        .into_iter()
        .filter(|cw| cw.is_overcharged(&rules).0)
        .collect()
}

#[test]
fn charge_bound_preserves_all_witnesses() {
    let with_bound = overcharged_witnesses(true);
    let without_bound = overcharged_witnesses(false);

    assert!(!without_bound.is_empty());
    for witness in &without_bound {
        assert!(
            with_bound
                .iter()
                .any(|other| is_isomorphic(witness.triangulation(), other.triangulation())),
            "witness lost by pruning: {}",
            witness.to_line()
        );
    }
    for witness in &with_bound {
        assert!(
            without_bound
                .iter()
                .any(|other| is_isomorphic(witness.triangulation(), other.triangulation())),
            "witness invented by pruning: {}",
            witness.to_line()
        );
    }
}
