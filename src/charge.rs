// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Charge accounting: how much a rule moves along one wheel edge.
//!
//! The discharging argument starts every vertex of degree `d` at charge
//! `10 * (6 - d)` and moves integer amounts along edges wherever a rule's
//! fragment embeds. On a partially decided wheel an embedding may be merely
//! `Possible`, so the amount a rule sends is reported as a lower and an upper
//! bound; the two coincide once every relevant degree is decided.

use crate::catalog::Rule;
use crate::geometry::{NearTriangulation, VertexId};
use crate::matcher::{contain_subgraph, Containment, MatchResult};
use std::collections::BTreeSet;

/// Initial charge of a hub of the given degree.
pub fn initial_charge(degree: usize) -> i32 {
    10 * (6 - degree as i32)
}

/// Bounds on the charge one rule sends along one edge, and the host vertices
/// an embedding of the rule touches.
#[derive(Debug, Clone)]
pub struct ChargeFlow {
    pub lower: i32,
    pub upper: i32,
    /// `related[v]` is true when some non-`No` embedding occupies `v`.
    pub related: Vec<bool>,
}

/// How much charge does `rule` send from `from` to `to` in `wheel`?
///
/// `lower` counts only `Yes` embeddings, `upper` also the `Possible` ones,
/// both scaled by the rule's amount. When the two embeddings are mirror
/// images occupying the same host vertices, one is dropped: the flow is the
/// same flow, not twice it.
///
/// # Panics
///
/// Panics if `(from, to)` is not an edge of the wheel.
pub fn amount_charge_to_send(
    wheel: &NearTriangulation,
    from: VertexId,
    to: VertexId,
    rule: &Rule,
) -> ChargeFlow {
    let edge_id = wheel
        .edge_id(from, to)
        .expect("charge flows along an existing edge");
    let mut results = contain_subgraph(
        wheel,
        rule.triangulation(),
        edge_id,
        rule.send_edge_id(),
        &BTreeSet::new(),
        true,
    );
    assert!(results.len() <= 2);
    if is_symmetric_pair(&results) {
        results.pop();
    }

    let mut yes = 0;
    let mut non_no = 0;
    let mut related = vec![false; wheel.vertex_count()];
    for result in &results {
        match result.containment {
            Containment::Yes => {
                yes += 1;
                non_no += 1;
            }
            Containment::Possible => non_no += 1,
            Containment::No => continue,
        }
        for (v, occupant) in result.occupied.iter().enumerate() {
            related[v] = related[v] || occupant.is_some();
        }
    }
    ChargeFlow {
        lower: yes * rule.amount(),
        upper: non_no * rule.amount(),
        related,
    }
}

/// Are the two results the same embedding in mirror image? True when both
/// are non-`No` and occupy exactly the same host vertices. The verdicts then
/// necessarily agree, which the assert pins down.
fn is_symmetric_pair(results: &[MatchResult]) -> bool {
    let [first, second] = results else {
        return false;
    };
    if first.containment == Containment::No || second.containment == Containment::No {
        return false;
    }
    let same_occupancy = first
        .occupied
        .iter()
        .zip(&second.occupied)
        .all(|(a, b)| a.is_some() == b.is_some());
    if same_occupancy {
        assert_eq!(
            first.containment, second.containment,
            "mirror embeddings over the same vertices must agree"
        );
    }
    same_occupancy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Degree;
    use crate::wheel::{Wheel, WheelGraph};
    use std::path::Path;

    fn uniform_wheel(hub_degree: usize, rim: usize) -> Wheel {
        let mut wheel = Wheel::from_hub_degree(hub_degree);
        for v in 1..=hub_degree {
            wheel.set_degree(v, Some(Degree::exact(rim)));
        }
        wheel
    }

    /// `amount` flows across a bare edge from a 5+ vertex to a 5+ vertex.
    fn edge_rule(amount: i32) -> Rule {
        let text = format!(
            "edge rule\n2 1 2 {amount}\n1 5+ 2\n2 5+ 1\n"
        );
        Rule::parse(&text, Path::new("edge.rule")).unwrap()
    }

    #[test]
    fn test_tight_flow_on_decided_wheel() {
        let wheel = uniform_wheel(7, 5);
        let rule = edge_rule(2);
        let flow = amount_charge_to_send(wheel.triangulation(), 0, 1, &rule);
        assert_eq!(flow.lower, 2);
        assert_eq!(flow.upper, 2);
        // only the two endpoints are involved
        let related: Vec<usize> = flow
            .related
            .iter()
            .enumerate()
            .filter_map(|(v, &r)| r.then_some(v))
            .collect();
        assert_eq!(related, vec![0, 1]);
    }

    #[test]
    fn test_undecided_wheel_gives_loose_bounds() {
        let mut wheel = Wheel::from_hub_degree(7);
        wheel.set_degree(1, Some(Degree::exact(5)));
        // rim degrees 2..=7 stay unset
        let text = "needs a decided third vertex\n3 1 2 1\n1 5+ 2 3\n2 5+ 1 3\n3 5 1 2\n";
        let rule = Rule::parse(text, Path::new("tri.rule")).unwrap();
        let flow = amount_charge_to_send(wheel.triangulation(), 0, 1, &rule);
        assert_eq!(flow.lower, 0);
        assert!(flow.upper > 0);
    }

    #[test]
    fn test_mirror_embeddings_on_distinct_vertices_both_count() {
        // A triangle rule pinned on a hub edge embeds once per side of the
        // edge; the two embeddings occupy different rim vertices, so the
        // flow doubles.
        let wheel = uniform_wheel(5, 5);
        let text = "triangle\n3 1 2 1\n1 5 2 3\n2 5 1 3\n3 5 1 2\n";
        let rule = Rule::parse(text, Path::new("tri.rule")).unwrap();
        let flow = amount_charge_to_send(wheel.triangulation(), 0, 1, &rule);
        assert_eq!(flow.lower, 2 * rule.amount());
        assert_eq!(flow.upper, 2 * rule.amount());
    }

    #[test]
    fn test_symmetric_possible_pair_collapses() {
        // A diamond rule (both diagonals of the send edge present) pinned on
        // a rim edge: the single host diagonal can play either pattern
        // diagonal, the other stays unembedded. Both attempts are Possible
        // over the same host vertices, so only one survives.
        let wheel = uniform_wheel(5, 5);
        let text = "diamond\n4 1 2 1\n1 5 2 3 4\n2 5 1 3 4\n3 5 1 2\n4 5 1 2\n";
        let rule = Rule::parse(text, Path::new("diamond.rule")).unwrap();
        let flow = amount_charge_to_send(wheel.triangulation(), 1, 2, &rule);
        assert_eq!(flow.lower, 0);
        assert_eq!(flow.upper, rule.amount());
    }

    #[test]
    fn test_symmetric_yes_pair_collapses() {
        // A whole wheel used as the rule, pinned on a hub edge of an
        // identical wheel: both mirror embeddings cover every vertex, and
        // their verdicts coincide (the assertion inside the collapse), so
        // the flow counts once.
        let wheel = uniform_wheel(5, 5);
        let text = "\
whole wheel
6 1 2 3
1 5 2 3 4 5 6
2 5 1 3 6
3 5 1 2 4
4 5 1 3 5
5 5 1 4 6
6 5 1 2 5
";
        let rule = Rule::parse(text, Path::new("wheel.rule")).unwrap();
        let flow = amount_charge_to_send(wheel.triangulation(), 0, 1, &rule);
        assert_eq!(flow.lower, rule.amount());
        assert_eq!(flow.upper, rule.amount());
    }
}
