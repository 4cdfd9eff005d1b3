// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The send-case enumerator: under which local degree situations does a
//! vertex of one degree send charge to a neighbor of another?
//!
//! Starting from a hub of the sender's degree with the receiver pinned at
//! rim position 1, the enumerator closes the cartwheel under rule-driven
//! degree refinement, computes the total charge crossing the pinned edge,
//! restricts each charged case to the vertices the rules actually touch,
//! and de-duplicates modulo the pinned edge. Each surviving case is logged
//! and, when an output directory is given, written back out as a `.rule`
//! file of its own.

use crate::catalog::{Configuration, Rule};
use crate::charge::amount_charge_to_send;
use crate::error::{Error, Result};
use crate::geometry::{divide_degree, Degree, EdgeId, NearTriangulation, VertexId};
use crate::matcher::{contain_subgraph, contains_any_configuration, count_embeddings, unique_modulo_edge, Containment};
use crate::search::{candidate_degrees, close_open_degrees, search_no_conf_graphs};
use crate::wheel::{CartWheel, Wheel, WheelGraph};
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use tracing::{info, trace};

pub struct SendCaseOptions {
    /// Degree of the sending vertex; must be fixed (it becomes a hub).
    pub send_degree: Degree,
    /// Degree range of the receiving vertex.
    pub receive_degree: Degree,
    pub max_degree: usize,
    /// Also require charge to flow back from receiver to sender, and log
    /// the mutual cases instead of writing rule files.
    pub bidirectional: bool,
    /// Where to write the per-case `.rule` files, if anywhere.
    pub out_dir: Option<PathBuf>,
}

/// Run the enumerator; returns the number of emitted cases.
pub fn enumerate_send_cases(
    options: &SendCaseOptions,
    confs: &[Configuration],
    rules: &[Rule],
) -> Result<usize> {
    assert!(options.send_degree.is_fixed(), "the sender's degree is fixed");
    let possible_degrees = candidate_degrees(options.max_degree);
    let (send_vertex, receive_vertex) = (0, 1);

    let mut wheel = Wheel::from_hub_degree(options.send_degree.lower());
    wheel.set_degree(receive_vertex, Some(options.receive_degree));
    info!("calculating wheels which do not contain a configuration...");
    let wheels = search_no_conf_graphs(&wheel, 2, &possible_degrees, confs);

    info!("taking unique wheels only");
    let pinned_edge = wheel
        .triangulation()
        .edge_id(send_vertex, receive_vertex)
        .expect("hub-to-rim edge exists");
    let unique_wheels = unique_modulo_edge(wheels, pinned_edge);

    info!("deciding degrees...");
    let mut cartwheels = Vec::new();
    for w in &unique_wheels {
        cartwheels.extend(refine_by_rules(
            CartWheel::from_wheel(w),
            confs,
            rules,
            send_vertex,
            receive_vertex,
            options,
        ));
    }

    info!("extending third neighbors...");
    for cartwheel in cartwheels.iter_mut() {
        close_open_degrees(cartwheel, options.max_degree);
        cartwheel.extend_third_neighbor();
    }

    info!("deciding degrees of third neighbors...");
    let mut refined = Vec::new();
    for cartwheel in &cartwheels {
        refined.extend(refine_by_rules(
            cartwheel.clone(),
            confs,
            rules,
            send_vertex,
            receive_vertex,
            options,
        ));
    }

    let mut known_cases: Vec<NearTriangulation> = Vec::new();
    let mut known_edges: Vec<EdgeId> = Vec::new();
    let mut count = 0;
    for cartwheel in &refined {
        let (send_charge, receive_charge, related) =
            charge_between(cartwheel, send_vertex, receive_vertex, rules, options.bidirectional);
        if send_charge == 0 && receive_charge == 0 {
            continue;
        }
        let case = restrict_to_related(cartwheel, send_vertex, receive_vertex, &related);
        let case_edge = case
            .edge_id(send_vertex, receive_vertex)
            .expect("send edge survives the restriction");
        let duplicate = known_cases.iter().zip(&known_edges).any(|(known, &known_edge)| {
            count_embeddings(known, &case, known_edge, case_edge, &BTreeSet::new()) > 0
                && count_embeddings(&case, known, case_edge, known_edge, &BTreeSet::new()) > 0
        });
        if duplicate {
            continue;
        }
        emit_case(&case, options, send_charge, receive_charge, &mut count)?;
        known_cases.push(case);
        known_edges.push(case_edge);
    }
    info!(
        "There are {} cases where degree {} sends charge to degree {}",
        count, options.send_degree, options.receive_degree
    );
    Ok(count)
}

/// Close `seed` under rule-driven refinement of the pinned edge.
///
/// Worklist closure: every visited cartwheel is collected (the seed
/// included); each step branches on the `Possible` rule applications that
/// pin at least one new degree, de-duplicates modulo the pinned edge, and
/// drops configuration-containing candidates.
fn refine_by_rules(
    seed: CartWheel,
    confs: &[Configuration],
    rules: &[Rule],
    send_vertex: VertexId,
    receive_vertex: VertexId,
    options: &SendCaseOptions,
) -> Vec<CartWheel> {
    let mut edge_ids = vec![seed
        .triangulation()
        .edge_id(send_vertex, receive_vertex)
        .expect("send edge exists")];
    if options.bidirectional {
        edge_ids.push(
            seed.triangulation()
                .edge_id(receive_vertex, send_vertex)
                .expect("receive edge exists"),
        );
    }

    let mut collected = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut pending = vec![seed];
    while let Some(cartwheel) = pending.pop() {
        if !seen.insert(cartwheel.to_line()) {
            continue;
        }
        let next = expand_possible(&cartwheel, rules, &edge_ids, options.max_degree);
        trace!(candidates = next.len(), "rule refinements");
        let next = unique_modulo_edge(next, edge_ids[0]);
        let next: Vec<CartWheel> = next
            .into_iter()
            .filter(|w| !contains_any_configuration(w, confs))
            .collect();
        trace!(surviving = next.len(), "after configuration filter");
        collected.push(cartwheel);
        pending.extend(next);
    }
    collected
}

/// One refinement step: every `Possible` application of a rule along the
/// pinned edges that decides at least one degree. A `Possible` that decides
/// nothing would need vertices this pass does not create, and a `Yes` needs
/// nothing at all.
fn expand_possible(
    cartwheel: &CartWheel,
    rules: &[Rule],
    edge_ids: &[EdgeId],
    max_degree: usize,
) -> Vec<CartWheel> {
    let wheel_degrees = cartwheel.triangulation().degrees();
    let mut next = Vec::new();
    for rule in rules {
        for &edge_id in edge_ids {
            let results = contain_subgraph(
                cartwheel.triangulation(),
                rule.triangulation(),
                edge_id,
                rule.send_edge_id(),
                &BTreeSet::new(),
                true,
            );
            let rule_degrees = rule.triangulation().degrees();
            for result in &results {
                if result.containment != Containment::Possible {
                    continue;
                }
                let mut decided_any = false;
                let mut alternatives = vec![cartwheel.clone()];
                for v in 0..cartwheel.triangulation().vertex_count() {
                    let Some(pattern_vertex) = result.occupied[v] else {
                        continue;
                    };
                    if wheel_degrees[v].is_some() {
                        continue;
                    }
                    decided_any = true;
                    let pieces = divide_degree(
                        rule_degrees[pattern_vertex].expect("rule degrees are always set"),
                        max_degree,
                    );
                    for alternative in alternatives.iter_mut() {
                        alternative.set_degree(v, Some(pieces[0]));
                    }
                    let base = alternatives.len();
                    for &piece in &pieces[1..] {
                        for i in 0..base {
                            let mut alternative = alternatives[i].clone();
                            alternative.set_degree(v, Some(piece));
                            alternatives.push(alternative);
                        }
                    }
                }
                if !decided_any {
                    continue;
                }
                next.append(&mut alternatives);
            }
        }
    }
    next
}

/// Total charge the rules move across the pinned edge (and back, when
/// bidirectional), with the union of the touched-vertex masks.
fn charge_between(
    cartwheel: &CartWheel,
    send_vertex: VertexId,
    receive_vertex: VertexId,
    rules: &[Rule],
    bidirectional: bool,
) -> (i32, i32, Vec<bool>) {
    let nt = cartwheel.triangulation();
    let mut send_charge = 0;
    let mut receive_charge = 0;
    let mut related = vec![false; nt.vertex_count()];
    for rule in rules {
        let outgoing = amount_charge_to_send(nt, send_vertex, receive_vertex, rule);
        send_charge += outgoing.lower;
        for v in 0..related.len() {
            related[v] = related[v] || outgoing.related[v];
        }
        if bidirectional {
            let incoming = amount_charge_to_send(nt, receive_vertex, send_vertex, rule);
            receive_charge += incoming.lower;
            for v in 0..related.len() {
                related[v] = related[v] || incoming.related[v];
            }
        }
    }
    (send_charge, receive_charge, related)
}

/// Drop every vertex no rule touches; the send and receive vertices keep
/// ids 0 and 1.
fn restrict_to_related(
    cartwheel: &CartWheel,
    send_vertex: VertexId,
    receive_vertex: VertexId,
    related: &[bool],
) -> NearTriangulation {
    let nt = cartwheel.triangulation();
    let mut new_id = vec![None; nt.vertex_count()];
    let mut degrees = Vec::new();
    let mut vertex_count = 0;
    for v in 0..nt.vertex_count() {
        if related[v] {
            new_id[v] = Some(vertex_count);
            degrees.push(nt.degree(v));
            vertex_count += 1;
        }
    }
    assert!(
        new_id[send_vertex] == Some(0) && new_id[receive_vertex] == Some(1),
        "send and receive vertices keep their ids"
    );

    let mut adjacency = vec![BTreeSet::new(); vertex_count];
    for &(u, v) in nt.edges() {
        if let (Some(nu), Some(nv)) = (new_id[u], new_id[v]) {
            adjacency[nu].insert(nv);
            adjacency[nv].insert(nu);
        }
    }
    NearTriangulation::new(vertex_count, &adjacency, degrees)
}

/// Log one case and, for the one-directional run, number it and write its
/// `.rule` file.
fn emit_case(
    case: &NearTriangulation,
    options: &SendCaseOptions,
    send_charge: i32,
    receive_charge: i32,
    count: &mut usize,
) -> Result<()> {
    if options.bidirectional {
        if send_charge > 0 && receive_charge > 0 {
            info!("send charge: {send_charge}, receive charge: {receive_charge}");
            info!("rule (for machine):\n{}", case.dump());
        }
        return Ok(());
    }
    if send_charge <= 0 {
        return Ok(());
    }
    info!("charge: {send_charge}");
    info!("rule (for machine):\n{}", case.dump());
    if let Some(dir) = &options.out_dir {
        let adjacency = case.adjacency();
        let mut text = format!(
            "from {} to {} amount {}\n",
            options.send_degree, options.receive_degree, send_charge
        );
        text += &format!("{} 1 2 {}\n", case.vertex_count(), send_charge);
        for v in 0..case.vertex_count() {
            let degree = case.degree(v).expect("restricted vertices carry degrees");
            text += &format!("{} {}", v + 1, degree);
            for &u in &adjacency[v] {
                text += &format!(" {}", u + 1);
            }
            text += "\n";
        }
        let path = dir.join(format!(
            "from{}to{}_{:05}.rule",
            options.send_degree, options.receive_degree, count
        ));
        std::fs::write(&path, text).map_err(|source| Error::Write { path, source })?;
    }
    *count += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_restriction_keeps_send_edge_and_degrees() {
        let mut wheel = Wheel::from_hub_degree(5);
        for v in 1..=5 {
            wheel.set_degree(v, Some(Degree::exact(5)));
        }
        let cartwheel = CartWheel::from_wheel(&wheel);
        let mut related = vec![false; cartwheel.triangulation().vertex_count()];
        related[0] = true;
        related[1] = true;
        related[2] = true;
        let case = restrict_to_related(&cartwheel, 0, 1, &related);
        assert_eq!(case.vertex_count(), 3);
        assert!(case.edge_id(0, 1).is_some());
        assert_eq!(case.degree(0), Some(Degree::exact(5)));
    }

    #[test]
    fn test_charge_between_sums_rules() {
        let mut wheel = Wheel::from_hub_degree(5);
        for v in 1..=5 {
            wheel.set_degree(v, Some(Degree::exact(5)));
        }
        let cartwheel = CartWheel::from_wheel(&wheel);
        let rule_a = Rule::parse(
            "a\n2 1 2 1\n1 5 2\n2 5 1\n",
            Path::new("a.rule"),
        )
        .unwrap();
        let rule_b = Rule::parse(
            "b\n2 1 2 2\n1 5+ 2\n2 5+ 1\n",
            Path::new("b.rule"),
        )
        .unwrap();
        let (send, receive, related) =
            charge_between(&cartwheel, 0, 1, &[rule_a, rule_b], true);
        // both rules fire hub-to-rim and back
        assert_eq!(send, 3);
        assert_eq!(receive, 3);
        assert!(related[0] && related[1]);
    }
}
