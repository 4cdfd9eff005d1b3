// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use discharge_search::catalog::{Configuration, Rule};
use discharge_search::geometry::Degree;
use discharge_search::wheel::{Wheel, WheelGraph};
use std::path::{Path, PathBuf};

/// A wheel with every rim degree fixed at `rim`.
pub fn uniform_wheel(hub_degree: usize, rim: usize) -> Wheel {
    let mut wheel = Wheel::from_hub_degree(hub_degree);
    for v in 1..=hub_degree {
        wheel.set_degree(v, Some(Degree::exact(rim)));
    }
    wheel
}

/// A bare-edge rule: `from_spec` sends `amount` to `to_spec`.
pub fn edge_rule(from_spec: &str, to_spec: &str, amount: i32) -> Rule {
    let text = format!("edge rule\n2 1 2 {amount}\n1 {from_spec} 2\n2 {to_spec} 1\n");
    Rule::parse(&text, Path::new("edge.rule")).unwrap()
}

/// The configuration that is a single interior vertex of degree 5.
pub fn single_five_conf() -> Configuration {
    Configuration::parse(
        "single vertex of degree 5\n6 5\n6 5 1 2 3 4 5\n",
        Path::new("single5.conf"),
    )
    .unwrap()
}

/// A scratch directory unique to this test, wiped at creation.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "discharge-search-test-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
