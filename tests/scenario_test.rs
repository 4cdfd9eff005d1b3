// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! End-to-end scenarios exercising one subsystem each, small enough to
//! trace by hand.

mod common;

use common::{edge_rule, single_five_conf, uniform_wheel};
use discharge_search::charge::amount_charge_to_send;
use discharge_search::geometry::{divide_degree, Degree, MAX_DEGREE};
use discharge_search::matcher::{contain_subgraph, contains_any_configuration, Containment};
use discharge_search::search::decide_degree_by_send_cases;
use discharge_search::wheel::{CartWheel, Wheel, WheelGraph};
use std::collections::BTreeSet;

#[test]
fn degree_string_roundtrip() {
    let degree: Degree = "7+".parse().unwrap();
    assert_eq!(degree, Degree::new(7, MAX_DEGREE));
    assert_eq!(degree.to_string(), "7+");
}

#[test]
fn divide_degree_at_cap_eight() {
    assert_eq!(
        divide_degree(Degree::new(5, MAX_DEGREE), 8),
        vec![
            Degree::exact(5),
            Degree::exact(6),
            Degree::exact(7),
            Degree::new(8, MAX_DEGREE),
        ]
    );
}

#[test]
fn all_five_wheel_contains_the_single_five_conf() {
    let wheel = uniform_wheel(5, 5);
    let confs = [single_five_conf()];
    assert!(contains_any_configuration(&wheel, &confs));

    // a hub of degree 6 with rim degrees 6 contains no degree-5 vertex
    let other = uniform_wheel(6, 6);
    assert!(!contains_any_configuration(&other, &confs));
}

#[test]
fn all_five_cartwheel_extends_to_sixteen_vertices() {
    let mut cartwheel = CartWheel::from_wheel(&uniform_wheel(5, 5));
    assert_eq!(cartwheel.triangulation().vertex_count(), 11);
    cartwheel.extend_third_neighbor();
    assert_eq!(cartwheel.triangulation().vertex_count(), 16);
}

#[test]
fn wheel_matches_itself_on_a_hub_edge() {
    let wheel = uniform_wheel(6, 6);
    let nt = wheel.triangulation();
    let edge = nt.edge_id(0, 1).unwrap();
    let results = contain_subgraph(nt, nt, edge, edge, &BTreeSet::new(), false);
    assert!(results.iter().any(|r| r.containment == Containment::Yes));

    // with rim degree 5 the pattern wheel's rim still matches when its
    // degrees are left open
    let host = uniform_wheel(6, 5);
    let mut pattern = Wheel::from_hub_degree(6);
    for v in 1..=6 {
        pattern.set_degree(v, Some(Degree::new(5, MAX_DEGREE)));
    }
    let results = contain_subgraph(
        host.triangulation(),
        pattern.triangulation(),
        edge,
        edge,
        &BTreeSet::new(),
        false,
    );
    assert!(results.iter().any(|r| r.containment == Containment::Yes));
}

#[test]
fn tight_flow_between_five_plus_endpoints() {
    let wheel = uniform_wheel(7, 5);
    let rule = edge_rule("5+", "5+", 2);
    let flow = amount_charge_to_send(wheel.triangulation(), 0, 1, &rule);
    assert_eq!(flow.lower, 2);
    assert_eq!(flow.upper, 2);
    let touched: Vec<usize> = flow
        .related
        .iter()
        .enumerate()
        .filter_map(|(v, &r)| r.then_some(v))
        .collect();
    assert_eq!(touched, vec![0, 1]);
}

#[test]
fn empty_rules_enumerate_one_cartwheel() {
    let wheel = Wheel::from_hub_degree(5);
    let out = decide_degree_by_send_cases(&wheel, &[], &[], 8, -10, true);
    assert_eq!(out.len(), 1);
}
