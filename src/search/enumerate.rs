// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The branching enumerator: degree refinement driven by rule applications.
//!
//! [`decide_degree_by_send_cases`] walks the `2d` directed edges incident to
//! the hub. At each edge it branches the partial cartwheel on every way a
//! rule could fire there (splitting undecided degrees per
//! [`divide_degree`]), merges isomorphic alternatives keeping the largest
//! committed amount, prunes what cannot reach the charge threshold or
//! already contains a reducible configuration, and recurses. Completeness
//! comes from branching over *all* alternative rule applications, soundness
//! from merging duplicates conservatively.
//!
//! [`search_no_conf_graphs`] is the simpler companion: exhaustive degree
//! assignment filtered by configuration containment.

use crate::catalog::{Configuration, Rule};
use crate::charge::amount_charge_to_send;
use crate::geometry::{divide_degree, Degree, EdgeId};
use crate::matcher::{
    contain_subgraph, contains_any_configuration, make_unique_with_charge, Containment,
};
use crate::search::statistics::{Counter, Statistics};
use crate::wheel::WheelGraph;
use std::collections::BTreeSet;
use tracing::trace;

/// Assign every vertex from `from_vertex` on a degree from
/// `candidate_degrees`, keeping exactly the fully assigned wheels that
/// contain no configuration from `confs`. Containment is checked at every
/// fifth vertex on the way down and again at each leaf.
pub fn search_no_conf_graphs<W: WheelGraph>(
    wheel: &W,
    from_vertex: usize,
    candidate_degrees: &[Degree],
    confs: &[Configuration],
) -> Vec<W> {
    if contains_any_configuration(wheel, confs) {
        return Vec::new();
    }
    let vertex_count = wheel.triangulation().vertex_count();
    let mut work = wheel.clone();
    let mut found = Vec::new();
    assign_degrees(
        &mut work,
        from_vertex,
        vertex_count,
        candidate_degrees,
        confs,
        &mut found,
    );
    found
}

fn assign_degrees<W: WheelGraph>(
    wheel: &mut W,
    v: usize,
    vertex_count: usize,
    candidate_degrees: &[Degree],
    confs: &[Configuration],
    found: &mut Vec<W>,
) {
    if v % 5 == 0 && contains_any_configuration(wheel, confs) {
        return;
    }
    if v == vertex_count {
        if !contains_any_configuration(wheel, confs) {
            found.push(wheel.clone());
        }
        return;
    }
    for &degree in candidate_degrees {
        wheel.set_degree(v, Some(degree));
        assign_degrees(wheel, v + 1, vertex_count, candidate_degrees, confs, found);
    }
    wheel.set_degree(v, None);
}

/// Enumerate the refinements of `wheel` in which every hub-incident edge's
/// charge contribution is fixed, no configuration embeds, and (with
/// `charge_bound`) the hub's final charge can still exceed `threshold`.
pub fn decide_degree_by_send_cases<W: WheelGraph>(
    wheel: &W,
    rules: &[Rule],
    confs: &[Configuration],
    max_degree: usize,
    threshold: i32,
    charge_bound: bool,
) -> Vec<W> {
    let hub = 0;
    let hub_degree = wheel.hub_degree();
    let nt = wheel.triangulation();

    // the edges whose flows touch the hub's account: all rim-to-hub, then
    // all hub-to-rim
    let mut edge_ids = Vec::with_capacity(2 * hub_degree);
    for v in 1..=hub_degree {
        edge_ids.push(nt.edge_id(v, hub).expect("rim-to-hub edge exists"));
    }
    for v in 1..=hub_degree {
        edge_ids.push(nt.edge_id(hub, v).expect("hub-to-rim edge exists"));
    }

    let mut search = SendCaseSearch {
        rules,
        confs,
        max_degree,
        threshold,
        charge_bound,
        hub_degree,
        edge_ids,
        committed: Vec::with_capacity(hub_degree),
        emitted: Vec::new(),
        stats: Statistics::new(),
    };
    search.descend(wheel.clone(), 0);
    search.stats.report();
    search.emitted
}

/// Transient state of one [`decide_degree_by_send_cases`] run.
struct SendCaseSearch<'a, W> {
    rules: &'a [Rule],
    confs: &'a [Configuration],
    max_degree: usize,
    threshold: i32,
    charge_bound: bool,
    hub_degree: usize,
    edge_ids: Vec<EdgeId>,
    /// Amounts already fixed for the rim-to-hub edges behind the cursor.
    committed: Vec<i32>,
    emitted: Vec<W>,
    stats: Statistics,
}

impl<W: WheelGraph> SendCaseSearch<'_, W> {
    fn descend(&mut self, wheel: W, step: usize) {
        if step == self.edge_ids.len() {
            self.stats.increment(Counter::Emitted);
            self.emitted.push(wheel);
            return;
        }
        trace!(wheel = %wheel.to_line(), step, committed = ?self.committed, "refining edge");

        let (branched, amounts) = self.branch_on_edge(&wheel, step);
        let before = branched.len();
        let (merged, amounts) = make_unique_with_charge(branched, amounts);
        self.stats
            .add(Counter::MergedIsomorphic, (before - merged.len()) as u64);
        let (kept, amounts) = self.prune(merged, amounts, step);
        trace!(candidates = kept.len(), step, "surviving candidates");

        for (candidate, amount) in kept.into_iter().zip(amounts) {
            if step < self.hub_degree {
                self.committed.push(amount);
            }
            self.descend(candidate, step + 1);
            if step < self.hub_degree {
                self.committed.pop();
            }
        }
    }

    /// All ways some rule could fire along the step's edge, each with the
    /// rule's amount. The unbranched wheel stays as the amount-0 candidate:
    /// no rule is obliged to fire.
    fn branch_on_edge(&mut self, wheel: &W, step: usize) -> (Vec<W>, Vec<i32>) {
        let edge_id = self.edge_ids[step];
        let wheel_degrees = wheel.triangulation().degrees();
        let mut next_wheels = vec![wheel.clone()];
        let mut next_amounts = vec![0];
        for rule in self.rules {
            let results = contain_subgraph(
                wheel.triangulation(),
                rule.triangulation(),
                edge_id,
                rule.send_edge_id(),
                &BTreeSet::new(),
                true,
            );
            let rule_degrees = rule.triangulation().degrees();
            for result in &results {
                if result.containment == Containment::No {
                    continue;
                }
                // pin the rule's degree constraints onto every occupied
                // wheel vertex still undecided, one candidate per
                // combination of split pieces
                let mut alternatives = vec![wheel.clone()];
                for v in 0..wheel.triangulation().vertex_count() {
                    let Some(pattern_vertex) = result.occupied[v] else {
                        continue;
                    };
                    if wheel_degrees[v].is_some() {
                        continue;
                    }
                    let pieces = divide_degree(
                        rule_degrees[pattern_vertex].expect("rule degrees are always set"),
                        self.max_degree,
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
                self.stats.add(Counter::Branched, alternatives.len() as u64);
                next_amounts.extend(std::iter::repeat(rule.amount()).take(alternatives.len()));
                next_wheels.append(&mut alternatives);
            }
        }
        (next_wheels, next_amounts)
    }

    fn prune(&mut self, wheels: Vec<W>, amounts: Vec<i32>, step: usize) -> (Vec<W>, Vec<i32>) {
        let mut kept_wheels = Vec::new();
        let mut kept_amounts = Vec::new();
        'candidates: for (wheel, amount) in wheels.into_iter().zip(amounts) {
            if self.charge_bound {
                let nt = wheel.triangulation();
                let edges = nt.edges();
                let mut receive_upper = 0;
                let mut send_lower = 0;
                for (ei, &edge_id) in self.edge_ids.iter().enumerate() {
                    let (from, to) = edges[edge_id];
                    // the best any single rule can do on this edge; a rule
                    // applying twice still counts once, the doubled case is
                    // some other rule's and the max covers it
                    let mut best_forced = 0;
                    let mut best_possible = 0;
                    for rule in self.rules {
                        let flow = amount_charge_to_send(nt, from, to, rule);
                        best_forced = best_forced.max(if flow.lower > 0 { rule.amount() } else { 0 });
                        best_possible =
                            best_possible.max(if flow.upper > 0 { rule.amount() } else { 0 });
                    }
                    if ei < self.hub_degree {
                        let committed = if ei == step {
                            amount
                        } else if ei < step {
                            self.committed[ei]
                        } else {
                            receive_upper += best_possible;
                            continue;
                        };
                        if best_forced > committed {
                            // a rule must send more than this branch commits;
                            // the sibling branch with the larger amount owns
                            // that case
                            self.stats.increment(Counter::PrunedByCommittedAmount);
                            continue 'candidates;
                        }
                        receive_upper += committed;
                    } else {
                        send_lower += best_forced;
                    }
                }
                if receive_upper - send_lower <= self.threshold {
                    self.stats.increment(Counter::PrunedByChargeBound);
                    continue;
                }
            }
            if contains_any_configuration(&wheel, self.confs) {
                self.stats.increment(Counter::PrunedByConfiguration);
                continue;
            }
            kept_wheels.push(wheel);
            kept_amounts.push(amount);
        }
        (kept_wheels, kept_amounts)
    }
}
