// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The two verification pipelines.
//!
//! **Generate** enumerates, for one hub degree, the rotation-canonical
//! configuration-free wheels whose hub could possibly end up overcharged,
//! and writes them out as `.wheel` files for later evaluation.
//!
//! **Evaluate** takes one wheel, refines it into cartwheels along the
//! send-case catalog, and settles each cartwheel's account against the rule
//! catalog. Every overcharged cartwheel is a witness that the discharging
//! argument fails on this wheel; none means the wheel is verified.

use crate::catalog::{load_configurations, load_rules, Configuration, Rule};
use crate::charge::{amount_charge_to_send, initial_charge};
use crate::error::{Error, Result};
use crate::geometry::Degree;
use crate::matcher::{contains_any_configuration, make_unique};
use crate::search::{candidate_degrees, close_open_degrees, decide_degree_by_send_cases};
use crate::wheel::{CartWheel, Wheel, WheelGraph};
use std::path::Path;
use tracing::{debug, info};

/// An overcharged cartwheel together with its rule-related vertex mask.
#[derive(Debug, Clone)]
pub struct Witness {
    pub cartwheel: CartWheel,
    pub related: Vec<bool>,
}

/// Refine `wheel` into fully decided cartwheels and return the overcharged
/// ones.
///
/// Branching runs twice: once within the second neighborhood, then again
/// after the third neighborhood is built; undecided degrees collapse to
/// `max_degree+` between the passes. Witness lines are logged with the
/// degrees of rule-unrelated vertices masked.
pub fn search_overcharged_cartwheels(
    wheel: &Wheel,
    rules: &[Rule],
    send_cases: &[Rule],
    confs: &[Configuration],
    max_degree: usize,
) -> Vec<Witness> {
    let base = CartWheel::from_wheel(wheel);
    let threshold = -initial_charge(base.hub_degree());

    let within_second =
        decide_degree_by_send_cases(&base, send_cases, confs, max_degree, threshold, true);
    info!("extending third neighbors...");
    let extended: Vec<CartWheel> = within_second
        .into_iter()
        .map(|mut cartwheel| {
            close_open_degrees(&mut cartwheel, max_degree);
            cartwheel.extend_third_neighbor();
            cartwheel
        })
        .collect();

    let mut candidates = Vec::new();
    for cartwheel in &extended {
        candidates.extend(decide_degree_by_send_cases(
            cartwheel, send_cases, confs, max_degree, threshold, true,
        ));
    }
    for cartwheel in candidates.iter_mut() {
        close_open_degrees(cartwheel, max_degree);
    }
    let candidates = make_unique(candidates);
    info!("number of cartwheels to check: {}", candidates.len());

    let mut witnesses = Vec::new();
    for (index, cartwheel) in candidates.iter().enumerate() {
        debug!("checking cartwheel [{}/{}]", index, candidates.len());
        let (overcharged, related) = cartwheel.is_overcharged(rules);
        if overcharged {
            info!(
                "overcharged cartwheel (for machine): {}",
                cartwheel.to_line_masked(&related)
            );
            witnesses.push(Witness {
                cartwheel: cartwheel.clone(),
                related,
            });
        }
    }
    info!(
        "the ratio of overcharged cartwheels: {}/{}",
        witnesses.len(),
        candidates.len()
    );
    witnesses
}

/// The `evaluate` pipeline: load the catalogs, run
/// [`search_overcharged_cartwheels`], return the number of witnesses.
pub fn evaluate_wheel(
    wheel_path: &Path,
    rules_dir: &Path,
    send_cases_dir: &Path,
    confs_dir: &Path,
    max_degree: usize,
) -> Result<usize> {
    debug!("reading {}", wheel_path.display());
    let wheel = Wheel::read_file(wheel_path)?;
    let rules = load_rules(rules_dir)?;
    let send_cases = load_rules(send_cases_dir)?;
    let confs = load_configurations(confs_dir)?;
    info!("start evaluating {}", wheel_path.display());
    let witnesses =
        search_overcharged_cartwheels(&wheel, &rules, &send_cases, &confs, max_degree);
    Ok(witnesses.len())
}

/// Enumerate the configuration-free wheels of one hub degree that could
/// possibly be overcharged, canonical up to rotation.
pub fn search_candidate_wheels(
    hub_degree: usize,
    possible_degrees: &[Degree],
    confs: &[Configuration],
    send_cases: &[Rule],
) -> Vec<Wheel> {
    let mut scan = WheelScan {
        hub_degree,
        possible_degrees,
        confs,
        send_cases,
        indices: vec![0; hub_degree],
        wheel: Wheel::from_hub_degree(hub_degree),
        found: Vec::new(),
    };
    for first in 0..possible_degrees.len() {
        scan.indices[0] = first;
        scan.assign(1, first);
    }
    scan.found
}

/// Transient state of one [`search_candidate_wheels`] run.
struct WheelScan<'a> {
    hub_degree: usize,
    possible_degrees: &'a [Degree],
    confs: &'a [Configuration],
    send_cases: &'a [Rule],
    /// Chosen degree index per rim vertex; the first vertex's index lower
    /// bounds the rest, which makes the rotation filter cheap.
    indices: Vec<usize>,
    wheel: Wheel,
    found: Vec<Wheel>,
}

impl WheelScan<'_> {
    fn assign(&mut self, v: usize, lowest: usize) {
        if v == self.hub_degree {
            self.try_emit();
            return;
        }
        for i in lowest..self.possible_degrees.len() {
            self.indices[v] = i;
            self.assign(v + 1, lowest);
        }
    }

    fn try_emit(&mut self) {
        if !self.is_rotation_minimal() {
            return;
        }
        for i in 0..self.hub_degree {
            self.wheel
                .set_degree(i + 1, Some(self.possible_degrees[self.indices[i]]));
        }
        if contains_any_configuration(&self.wheel, self.confs) {
            return;
        }
        // hub charge upper bound: the most any send case could deliver per
        // rim edge; a hub that cannot get past zero is not worth evaluating
        let mut receive = 0;
        for neighbor in 1..=self.hub_degree {
            let mut best = 0;
            for case in self.send_cases {
                let flow = amount_charge_to_send(self.wheel.triangulation(), neighbor, 0, case);
                best = best.max(if flow.upper > 0 { case.amount() } else { 0 });
            }
            receive += best;
        }
        if initial_charge(self.hub_degree) + receive <= 0 {
            return;
        }
        self.found.push(self.wheel.clone());
    }

    /// Keep only the lexicographically smallest rotation of the rim.
    fn is_rotation_minimal(&self) -> bool {
        let mut rotated = self.indices.clone();
        for _ in 0..self.indices.len() {
            rotated.rotate_left(1);
            if rotated < self.indices {
                return false;
            }
        }
        true
    }
}

/// The `generate` pipeline: write `<degree>_<n>.wheel` files for every
/// candidate wheel; returns how many.
pub fn generate_wheels(
    hub_degree: usize,
    confs_dir: &Path,
    send_cases_dir: &Path,
    max_degree: usize,
    out_dir: &Path,
) -> Result<usize> {
    let possible_degrees = candidate_degrees(max_degree);
    let confs = load_configurations(confs_dir)?;
    let send_cases = load_rules(send_cases_dir)?;

    info!("calculating wheels which do not contain a configuration...");
    let wheels = search_candidate_wheels(hub_degree, &possible_degrees, &confs, &send_cases);

    info!("writing wheel files into {}", out_dir.display());
    if !out_dir.exists() {
        std::fs::create_dir(out_dir).map_err(|source| Error::Write {
            path: out_dir.to_path_buf(),
            source,
        })?;
        info!("made {} directory", out_dir.display());
    }
    for (count, wheel) in wheels.iter().enumerate() {
        wheel.write_file(&out_dir.join(format!("{hub_degree}_{count}.wheel")))?;
    }
    Ok(wheels.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_rotation_canonical_wheels() {
        // degrees {5, 6} on a hub of degree 5, no catalogs: binary necklaces
        // of length 5 up to rotation: 8 of them
        let degrees = [Degree::exact(5), Degree::exact(6)];
        let wheels = search_candidate_wheels(5, &degrees, &[], &[]);
        assert_eq!(wheels.len(), 8);
        // the all-5 rim comes first and the all-6 rim is present
        assert_eq!(wheels[0].to_line(), "5 5 5 5 5 5");
        assert!(wheels.iter().any(|w| w.to_line() == "5 6 6 6 6 6"));
    }

    #[test]
    fn test_hopeless_hub_is_screened_out() {
        // hub degree 7 starts at -10; with no send cases nothing can ever
        // push it positive, so no wheel survives
        let degrees = [Degree::exact(5)];
        let wheels = search_candidate_wheels(7, &degrees, &[], &[]);
        assert!(wheels.is_empty());
    }

    #[test]
    fn test_hub_five_survives_screening_without_cases() {
        // hub degree 5 starts at +10: already overcharged with no rules
        let degrees = [Degree::exact(6)];
        let wheels = search_candidate_wheels(5, &degrees, &[], &[]);
        assert_eq!(wheels.len(), 1);
    }

    #[test]
    fn test_screening_uses_send_case_upper_bound() {
        // hub degree 6 starts at 0 and needs at least one incoming case
        let degrees = [Degree::exact(5)];
        let case = Rule::parse(
            "five sends one\n2 1 2 1\n1 5 2\n2 5+ 1\n",
            Path::new("case.rule"),
        )
        .unwrap();
        let without = search_candidate_wheels(6, &degrees, &[], &[]);
        assert!(without.is_empty());
        let with = search_candidate_wheels(6, &degrees, &[], std::slice::from_ref(&case));
        assert_eq!(with.len(), 1);
    }
}
