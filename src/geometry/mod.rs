// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Graph-side primitives: degree ranges and near-triangulations.

pub mod degree;
pub mod triangulation;

pub use degree::{divide_degree, Degree, MAX_DEGREE, MIN_DEGREE};
pub use triangulation::{Edge, EdgeId, NearTriangulation, VertexId};
