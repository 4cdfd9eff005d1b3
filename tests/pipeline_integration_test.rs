// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Whole-pipeline runs over scratch catalog directories: generate wheels,
//! evaluate one, enumerate send cases.

mod common;

use common::scratch_dir;
use discharge_search::catalog::{load_configurations, load_rules, Rule};
use discharge_search::geometry::Degree;
use discharge_search::search::{
    enumerate_send_cases, evaluate_wheel, generate_wheels, SendCaseOptions,
};
use discharge_search::wheel::{Wheel, WheelGraph};
use std::fs;
use std::path::Path;

const FIVE_SENDS_TWO: &str = "\
5 sends 2 to 5
2 1 2 2
1 5 2
2 5 1
";

#[test]
fn generate_writes_rotation_unique_wheels() {
    let root = scratch_dir("generate");
    let conf_dir = root.join("conf");
    let case_dir = root.join("send");
    let out_dir = root.join("wheel");
    fs::create_dir_all(&conf_dir).unwrap();
    fs::create_dir_all(&case_dir).unwrap();
    fs::write(case_dir.join("five.rule"), FIVE_SENDS_TWO).unwrap();

    // degrees {5, 6+}: 8 binary necklaces of length 5; hub degree 5 starts
    // at +10 so none is screened out
    let written = generate_wheels(5, &conf_dir, &case_dir, 6, &out_dir).unwrap();
    assert_eq!(written, 8);

    let first = out_dir.join("5_0.wheel");
    let wheel = Wheel::read_file(&first).unwrap();
    assert_eq!(wheel.to_line(), "5 5 5 5 5 5");

    let count = fs::read_dir(&out_dir)
        .unwrap()
        .filter(|e| e.as_ref().unwrap().path().extension().is_some_and(|x| x == "wheel"))
        .count();
    assert_eq!(count, 8);
}

#[test]
fn evaluate_finds_the_undischarged_witness() {
    // one rule moving 2 between adjacent degree-5 vertices: on the all-5
    // wheel the hub receives 10 and sends 10, keeping its initial +10, so
    // the single refined cartwheel is overcharged
    let root = scratch_dir("evaluate");
    let conf_dir = root.join("conf");
    let rule_dir = root.join("rule");
    let case_dir = root.join("send");
    for dir in [&conf_dir, &rule_dir, &case_dir] {
        fs::create_dir_all(dir).unwrap();
    }
    fs::write(rule_dir.join("five.rule"), FIVE_SENDS_TWO).unwrap();
    fs::write(case_dir.join("five.rule"), FIVE_SENDS_TWO).unwrap();
    let wheel_path = root.join("5_0.wheel");
    fs::write(&wheel_path, "5 5 5 5 5 5\n").unwrap();

    let witnesses = evaluate_wheel(&wheel_path, &rule_dir, &case_dir, &conf_dir, 8).unwrap();
    assert_eq!(witnesses, 1);
}

#[test]
fn missing_catalog_directory_is_an_error() {
    let root = scratch_dir("missing");
    assert!(load_rules(&root.join("nowhere")).is_err());
    assert!(load_configurations(&root.join("nowhere")).is_err());
}

#[test]
fn send_cases_emits_a_rule_file_that_reads_back() {
    let root = scratch_dir("send-cases");
    let conf_dir = root.join("conf");
    let out_dir = root.join("out");
    fs::create_dir_all(&conf_dir).unwrap();
    fs::create_dir_all(&out_dir).unwrap();

    let rule = Rule::parse(FIVE_SENDS_TWO, Path::new("five.rule")).unwrap();
    let options = SendCaseOptions {
        send_degree: Degree::exact(5),
        receive_degree: Degree::exact(5),
        max_degree: 6,
        bidirectional: false,
        out_dir: Some(out_dir.clone()),
    };
    let count = enumerate_send_cases(&options, &[], &[rule]).unwrap();
    assert_eq!(count, 1);

    // the emitted case is the bare send edge between two degree-5 vertices
    let emitted = Rule::read_file(&out_dir.join("from5to5_00000.rule")).unwrap();
    assert_eq!(emitted.amount(), 2);
    assert_eq!(emitted.triangulation().vertex_count(), 2);
    assert_eq!(emitted.triangulation().degree(0), Some(Degree::exact(5)));
    assert_eq!(emitted.triangulation().degree(1), Some(Degree::exact(5)));
}
