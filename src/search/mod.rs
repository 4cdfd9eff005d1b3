// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The enumeration layer: branching degree refinement, the
//! generate/evaluate pipelines, and the send-case enumerator.

pub mod enumerate;
pub mod overcharge;
pub mod send_cases;
pub mod statistics;

pub use enumerate::{decide_degree_by_send_cases, search_no_conf_graphs};
pub use overcharge::{evaluate_wheel, generate_wheels, search_overcharged_cartwheels, Witness};
pub use send_cases::{enumerate_send_cases, SendCaseOptions};
pub use statistics::{Counter, Statistics};

use crate::geometry::{Degree, MAX_DEGREE, MIN_DEGREE};
use crate::wheel::WheelGraph;

/// The degree candidates `5, 6, …, max_degree-1, max_degree+`.
pub fn candidate_degrees(max_degree: usize) -> Vec<Degree> {
    let mut degrees: Vec<Degree> = (MIN_DEGREE..max_degree).map(Degree::exact).collect();
    degrees.push(Degree::new(max_degree, MAX_DEGREE));
    degrees
}

/// Give every still-undecided vertex the open tail `max_degree+`.
pub fn close_open_degrees<W: WheelGraph>(wheel: &mut W, max_degree: usize) {
    for v in 0..wheel.triangulation().vertex_count() {
        if wheel.triangulation().degree(v).is_none() {
            wheel.set_degree(v, Some(Degree::new(max_degree, MAX_DEGREE)));
        }
    }
}
