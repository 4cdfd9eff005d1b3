// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Hub neighborhoods: the wheel (hub plus rim) and the cartwheel (hub plus
//! first, second and third neighborhoods).
//!
//! Vertex numbering is shared by both: the hub is vertex 0 with a fixed
//! degree `d`, the rim is the cycle `1..=d` around it. A cartwheel appends
//! second and third neighbors behind those.

pub mod cartwheel;

pub use cartwheel::CartWheel;

use crate::error::{Error, Result};
use crate::geometry::{Degree, NearTriangulation, VertexId};
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

/// Common surface of [`Wheel`] and [`CartWheel`]: the enumerator, the
/// uniquing sweeps and the configuration filter are generic over it.
pub trait WheelGraph: Clone {
    fn triangulation(&self) -> &NearTriangulation;

    /// Set or clear one vertex's degree range.
    fn set_degree(&mut self, v: VertexId, degree: Option<Degree>);

    /// The hub's fixed degree (equivalently, the rim length).
    fn hub_degree(&self) -> usize;

    /// One-line serialized form, also the de-duplication key.
    fn to_line(&self) -> String;
}

/// A hub of fixed degree `d` and its rim cycle; rim degrees may be unset.
#[derive(Debug, Clone)]
pub struct Wheel {
    triangulation: NearTriangulation,
}

impl Wheel {
    /// The wheel with the given hub degree and no rim degree decided.
    pub fn from_hub_degree(hub_degree: usize) -> Self {
        let hub = 0;
        let mut adjacency = vec![BTreeSet::new(); hub_degree + 1];
        let mut degrees: Vec<Option<Degree>> = vec![None; hub_degree + 1];
        degrees[hub] = Some(Degree::exact(hub_degree));
        for v in 1..=hub_degree {
            let u = if v == hub_degree { 1 } else { v + 1 };
            adjacency[v].insert(u);
            adjacency[u].insert(v);
            adjacency[hub].insert(v);
            adjacency[v].insert(hub);
        }
        Self {
            triangulation: NearTriangulation::new(hub_degree + 1, &adjacency, degrees),
        }
    }

    /// Parse the `.wheel` line format: `d deg1 … deg_d`, `?` for unset.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let malformed = |message: String| Error::Malformed {
            kind: "wheel",
            path: path.to_path_buf(),
            message,
        };
        let mut tokens = text.split_whitespace();
        let hub_degree: usize = tokens
            .next()
            .ok_or_else(|| malformed("empty file".to_string()))?
            .parse()
            .map_err(|_| malformed("bad hub degree".to_string()))?;
        let mut wheel = Self::from_hub_degree(hub_degree);
        for v in 1..=hub_degree {
            let spec = tokens
                .next()
                .ok_or_else(|| malformed(format!("missing degree of neighbor {v}")))?;
            if spec != "?" {
                wheel.set_degree(v, Some(Degree::from_str(spec)?));
            }
        }
        Ok(wheel)
    }

    /// Read a `.wheel` file.
    pub fn read_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Write the `.wheel` line format.
    pub fn write_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, format!("{}\n", self.to_line())).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl WheelGraph for Wheel {
    fn triangulation(&self) -> &NearTriangulation {
        &self.triangulation
    }

    fn set_degree(&mut self, v: VertexId, degree: Option<Degree>) {
        self.triangulation.set_degree(v, degree);
    }

    fn hub_degree(&self) -> usize {
        let hub_degree = self.triangulation.degree(0).expect("hub degree is set");
        assert!(hub_degree.is_fixed(), "hub degree is fixed");
        hub_degree.lower()
    }

    fn to_line(&self) -> String {
        let hub_degree = self.hub_degree();
        let mut parts = vec![hub_degree.to_string()];
        for v in 1..=hub_degree {
            parts.push(match self.triangulation.degree(v) {
                Some(deg) => deg.to_string(),
                None => "?".to_string(),
            });
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hub_degree_shape() {
        let wheel = Wheel::from_hub_degree(6);
        let nt = wheel.triangulation();
        assert_eq!(nt.vertex_count(), 7);
        assert_eq!(wheel.hub_degree(), 6);
        assert_eq!(nt.degree(0), Some(Degree::exact(6)));
        for v in 1..=6 {
            assert_eq!(nt.degree(v), None);
            assert!(nt.edge_id(0, v).is_some());
        }
        assert!(nt.edge_id(6, 1).is_some());
    }

    #[test]
    fn test_wheel_line_roundtrip() {
        let mut wheel = Wheel::from_hub_degree(5);
        wheel.set_degree(1, Some(Degree::exact(5)));
        wheel.set_degree(2, Some("6+".parse().unwrap()));
        wheel.set_degree(4, Some("7-".parse().unwrap()));
        let line = wheel.to_line();
        assert_eq!(line, "5 5 6+ ? 7- ?");
        let reread = Wheel::parse(&line, Path::new("w.wheel")).unwrap();
        assert_eq!(reread.to_line(), line);
    }

    #[test]
    fn test_parse_rejects_short_line() {
        assert!(Wheel::parse("5 5 5 5", Path::new("short.wheel")).is_err());
    }
}
