// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Mechanical verification of discharging arguments on planar
//! near-triangulations.
//!
//! Given a catalog of reducible configurations, a set of discharging rules
//! (edge-oriented near-triangulation fragments carrying a signed amount) and
//! a hub degree, the crate enumerates every cartwheel around such a hub that
//! contains no reducible configuration yet would end up with strictly
//! positive charge after all rules fire. Each such cartwheel is a witness
//! that the discharging argument fails; an empty enumeration verifies it.
//!
//! # Architecture
//!
//! Three layers, bottom up:
//!
//! ## Graphs
//!
//! - [`geometry`]: degree ranges ([`geometry::Degree`]) and the shared
//!   near-triangulation structure with its per-edge diagonal index
//!   ([`geometry::NearTriangulation`]).
//! - [`wheel`]: the hub-centered builders — [`wheel::Wheel`] (hub plus rim)
//!   and [`wheel::CartWheel`] (second and third neighborhoods, built
//!   lazily).
//! - [`catalog`]: the immutable inputs, [`catalog::Configuration`] and
//!   [`catalog::Rule`], with their file formats.
//!
//! ## Matching
//!
//! - [`matcher`]: the oriented three-valued subgraph containment test that
//!   pins a pattern edge onto a host edge and extends along triangle
//!   diagonals; isomorphism and de-duplication are built on top of it, as is
//!   the configuration filter.
//! - [`charge`]: per-rule, per-edge charge flow bounds.
//!
//! ## Enumeration
//!
//! - [`search`]: the branching enumerator refining degrees along rule
//!   applications, the generate/evaluate pipelines, and the send-case
//!   enumerator.
//!
//! # Execution model
//!
//! Strictly synchronous, single-threaded CPU-bound recursion. Cartwheel
//! alternatives are cloned by value and independently owned; the matcher's
//! memoization lives and dies within one invocation. Invariant violations
//! abort; parse and I/O failures surface as [`error::Error`] and terminate
//! at the CLI boundary.

pub mod catalog;
pub mod charge;
pub mod error;
pub mod geometry;
pub mod matcher;
pub mod search;
pub mod wheel;

// Re-export commonly used types
pub use catalog::{Configuration, Rule};
pub use error::Error;
pub use geometry::{Degree, NearTriangulation};
pub use matcher::{Containment, MatchResult};
pub use wheel::{CartWheel, Wheel, WheelGraph};
