// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Discharging rules and the `.rule` file format.
//!
//! A rule is a near-triangulation fragment with one distinguished directed
//! edge (the *send edge*) and a signed amount: wherever the fragment embeds
//! in a host with the send edge aligned to a host edge `(x, y)`, `amount`
//! units of charge flow from the vertex on `x` to the vertex on `y`.
//!
//! File format: line 1 is a free comment; line 2 is `V from to amount`
//! (1-based); each following line is `v deg-spec u…` where `deg-spec` is
//! `k`, `k+` or `k-` and the `u` are v's neighbors.

use crate::error::{Error, Result};
use crate::geometry::{Degree, EdgeId, NearTriangulation, VertexId};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Rule {
    triangulation: NearTriangulation,
    send_edge_id: EdgeId,
    amount: i32,
}

impl Rule {
    /// Wrap a near-triangulation with its send edge `(from, to)`.
    ///
    /// # Panics
    ///
    /// Panics if `(from, to)` is not an edge of the triangulation.
    pub fn new(from: VertexId, to: VertexId, amount: i32, triangulation: NearTriangulation) -> Self {
        let send_edge_id = triangulation
            .edge_id(from, to)
            .expect("send vertices are adjacent");
        Self {
            triangulation,
            send_edge_id,
            amount,
        }
    }

    /// Read a `.rule` file.
    pub fn read_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse the `.rule` format from `text`; `path` is carried for messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let malformed = |message: String| Error::Malformed {
            kind: "rule",
            path: path.to_path_buf(),
            message,
        };

        let mut lines = text.lines();
        lines
            .next()
            .ok_or_else(|| malformed("empty file".to_string()))?;
        let header = lines
            .next()
            .ok_or_else(|| malformed("missing header line".to_string()))?;
        let fields: Vec<&str> = header.split_whitespace().collect();
        let [vertex_count, from, to, amount] = fields.as_slice() else {
            return Err(malformed("header is not `V from to amount`".to_string()));
        };
        let vertex_count: usize = vertex_count
            .parse()
            .map_err(|_| malformed("bad vertex count".to_string()))?;
        let from: usize = from
            .parse()
            .map_err(|_| malformed("bad send vertex".to_string()))?;
        let to: usize = to
            .parse()
            .map_err(|_| malformed("bad receive vertex".to_string()))?;
        let amount: i32 = amount
            .parse()
            .map_err(|_| malformed("bad amount".to_string()))?;
        if from == 0 || from > vertex_count || to == 0 || to > vertex_count {
            return Err(malformed("send edge endpoints out of range".to_string()));
        }
        let (from, to) = (from - 1, to - 1);

        let mut adjacency = vec![BTreeSet::new(); vertex_count];
        let mut degrees: Vec<Option<Degree>> = vec![None; vertex_count];
        let mut expected = 0;
        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut tokens = line.split_whitespace();
            let v: usize = tokens
                .next()
                .expect("non-empty line has a first token")
                .parse()
                .map_err(|_| malformed("bad vertex number".to_string()))?;
            if v != expected + 1 {
                return Err(malformed(format!(
                    "expected vertex {} but found {v}",
                    expected + 1
                )));
            }
            let v = v - 1;
            let spec = tokens
                .next()
                .ok_or_else(|| malformed(format!("vertex {} has no degree", v + 1)))?;
            degrees[v] = Some(spec.parse::<Degree>()?);
            for token in tokens {
                let u: usize = token
                    .parse()
                    .map_err(|_| malformed("bad neighbor".to_string()))?;
                if u == 0 || u > vertex_count {
                    return Err(malformed(format!("neighbor {u} out of range")));
                }
                adjacency[v].insert(u - 1);
                adjacency[u - 1].insert(v);
            }
            expected += 1;
        }
        if expected != vertex_count {
            return Err(malformed(format!(
                "expected {vertex_count} vertices but found {expected}"
            )));
        }
        if !adjacency[from].contains(&to) {
            return Err(malformed("send vertices are not adjacent".to_string()));
        }

        Ok(Self::new(
            from,
            to,
            amount,
            NearTriangulation::new(vertex_count, &adjacency, degrees),
        ))
    }

    pub fn triangulation(&self) -> &NearTriangulation {
        &self.triangulation
    }

    pub fn send_edge_id(&self) -> EdgeId {
        self.send_edge_id
    }

    pub fn amount(&self) -> i32 {
        self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{MAX_DEGREE, MIN_DEGREE};

    /// A single triangle: a degree-5 vertex sends 2 to a 6+ vertex across an
    /// edge completed by a 5- vertex.
    const TRIANGLE: &str = "\
5 sends 2 to 6+
3 1 2 2
1 5 2 3
2 6+ 1 3
3 8- 1 2
";

    #[test]
    fn test_parse_triangle_rule() {
        let rule = Rule::parse(TRIANGLE, Path::new("triangle.rule")).unwrap();
        assert_eq!(rule.amount(), 2);
        let nt = rule.triangulation();
        assert_eq!(nt.vertex_count(), 3);
        assert_eq!(nt.degree(0), Some(Degree::exact(5)));
        assert_eq!(nt.degree(1), Some(Degree::new(6, MAX_DEGREE)));
        assert_eq!(nt.degree(2), Some(Degree::new(MIN_DEGREE, 8)));
        assert_eq!(nt.edges()[rule.send_edge_id()], (0, 1));
    }

    #[test]
    fn test_send_vertices_must_be_adjacent() {
        let text = "\
broken
3 1 3 1
1 5 2
2 5 1 3
3 5 2
";
        assert!(Rule::parse(text, Path::new("broken.rule")).is_err());
    }

    #[test]
    fn test_bad_degree_spec_is_rejected() {
        let text = "\
broken
2 1 2 1
1 x 2
2 5 1
";
        assert!(Rule::parse(text, Path::new("bad.rule")).is_err());
    }

    #[test]
    fn test_vertex_count_mismatch_is_rejected() {
        let text = "\
broken
3 1 2 1
1 5 2
2 5 1
";
        assert!(Rule::parse(text, Path::new("count.rule")).is_err());
    }
}
