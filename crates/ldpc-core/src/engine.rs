//! Synchronous (flooding) sum-product decoding with a recorded history.
//!
//! Every round updates all check-to-variable messages from the previous
//! round's variable-to-check messages, aggregates beliefs, takes a hard
//! decision, evaluates the syndrome, and prepares the variable-to-check
//! messages for the next round. All arithmetic stays in the LLR domain:
//!
//! ```text
//! check:     L(c->v) = ln((1 + t) / (1 - t)),  t = prod_{v' in N(c)\v} tanh(L(v'->c) / 2)
//! belief:    B(v)    = L(v) + sum_{c in N(v)} L(c->v)
//! variable:  L(v->c) = L(v) + sum_{c' in N(v)\c} L(c'->v)
//! ```
//!
//! Round 0 feeds the channel LLR of each variable to every incident check.
//! There is no convergence test: the engine always runs the requested number
//! of rounds. Saturated products yield ±infinity, which propagates per
//! IEEE-754 and still gives a well-defined hard decision.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ldpc_core::channel::ChannelModel;
//! use ldpc_core::engine::SumProductEngine;
//! use ldpc_core::graph::ParityCheckGraph;
//!
//! let engine = SumProductEngine::new(Arc::new(ParityCheckGraph::reference()));
//! let channel = ChannelModel::from_llrs(&[-0.5, 2.5, -4.0, 5.0, -3.5, 2.5]).unwrap();
//!
//! let history = engine.decode(&channel, 8).unwrap();
//! assert_eq!(history.round_count(), 8);
//! assert!(history.final_round().is_valid_codeword());
//! assert_eq!(history.final_round().codeword(), &[0, 0, 1, 0, 1, 1]);
//! ```

use std::sync::Arc;

use crate::channel::ChannelModel;
use crate::error::{LdpcError, LdpcResult};
use crate::graph::ParityCheckGraph;
use crate::grid::EdgeGrid;
use crate::history::{IterationHistory, RoundSnapshot};

/// Sum-product decoder bound to one parity-check graph.
#[derive(Debug, Clone)]
pub struct SumProductEngine {
    graph: Arc<ParityCheckGraph>,
}

impl SumProductEngine {
    /// Create an engine for `graph`.
    pub fn new(graph: Arc<ParityCheckGraph>) -> Self {
        Self { graph }
    }

    /// The graph messages are passed over.
    pub fn graph(&self) -> &Arc<ParityCheckGraph> {
        &self.graph
    }

    /// Run `n_rounds` rounds from the priors in `channel`.
    ///
    /// The result depends only on the graph, the priors and `n_rounds`; calling
    /// this twice with the same inputs gives identical histories. Fails before
    /// computing anything if `n_rounds` is zero or `channel` does not have one
    /// prior per variable.
    pub fn decode(&self, channel: &ChannelModel, n_rounds: usize) -> LdpcResult<IterationHistory> {
        let graph = &*self.graph;
        if n_rounds == 0 {
            return Err(LdpcError::ZeroRounds);
        }
        if channel.len() != graph.n_variables() {
            return Err(LdpcError::ChannelLengthMismatch {
                expected: graph.n_variables(),
                actual: channel.len(),
            });
        }

        let _span = tracing::debug_span!(
            "decode",
            n_checks = graph.n_checks(),
            n_variables = graph.n_variables(),
            n_rounds
        )
        .entered();

        let llrs = channel.llrs();
        let mut rounds = Vec::with_capacity(n_rounds);
        let mut consumed = seed_variable_messages(graph, &llrs);

        for round in 0..n_rounds {
            let check_messages = check_node_update(graph, &consumed);
            let beliefs = aggregate_beliefs(graph, &llrs, &check_messages);
            let codeword = hard_decide(&beliefs);
            let syndrome = graph.syndrome(&codeword);

            let prepared = if round + 1 < n_rounds {
                Some(variable_node_update(graph, &llrs, &check_messages))
            } else {
                None
            };

            let snapshot =
                RoundSnapshot::new(round, check_messages, consumed, beliefs, codeword, syndrome);
            tracing::trace!(
                round,
                syndrome_weight = snapshot.syndrome_weight(),
                "round complete"
            );
            rounds.push(snapshot);

            match prepared {
                Some(next) => consumed = next,
                None => break,
            }
        }

        let history = IterationHistory::new(Arc::clone(&self.graph), rounds);
        tracing::debug!(
            first_valid_round = ?history.first_valid_round(),
            final_valid = history.final_round().is_valid_codeword(),
            "decode finished"
        );
        Ok(history)
    }
}

/// Decode on `graph` without keeping an engine around.
pub fn decode(
    graph: &Arc<ParityCheckGraph>,
    channel: &ChannelModel,
    n_rounds: usize,
) -> LdpcResult<IterationHistory> {
    SumProductEngine::new(Arc::clone(graph)).decode(channel, n_rounds)
}

/// Round-0 input: each variable's channel LLR on every incident edge.
pub(crate) fn seed_variable_messages(graph: &ParityCheckGraph, llrs: &[f64]) -> EdgeGrid<f64> {
    let mut messages = EdgeGrid::new(graph.n_checks(), graph.n_variables(), 0.0);
    for (c, v) in graph.edges() {
        messages[(c, v)] = llrs[v];
    }
    messages
}

/// Check-node combining rule with extrinsic exclusion.
///
/// Reads only `incoming`; the output is a fresh grid.
pub(crate) fn check_node_update(graph: &ParityCheckGraph, incoming: &EdgeGrid<f64>) -> EdgeGrid<f64> {
    let mut out = EdgeGrid::new(graph.n_checks(), graph.n_variables(), 0.0);
    for c in 0..graph.n_checks() {
        let vars = graph.variables_of(c);
        let tanh_vals: Vec<f64> = vars.iter().map(|&v| (incoming[(c, v)] * 0.5).tanh()).collect();

        for (i, &v) in vars.iter().enumerate() {
            // Product over the other edges only; dividing out tanh_vals[i] breaks on zeros.
            let t: f64 = tanh_vals
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &tv)| tv)
                .product();
            out[(c, v)] = ((1.0 + t) / (1.0 - t)).ln();
        }
    }
    out
}

/// Posterior LLR of every variable.
pub(crate) fn aggregate_beliefs(
    graph: &ParityCheckGraph,
    llrs: &[f64],
    check_messages: &EdgeGrid<f64>,
) -> Vec<f64> {
    (0..graph.n_variables())
        .map(|v| {
            llrs[v]
                + graph
                    .checks_of(v)
                    .iter()
                    .map(|&c| check_messages[(c, v)])
                    .sum::<f64>()
        })
        .collect()
}

/// Variable-node combining rule with extrinsic exclusion.
pub(crate) fn variable_node_update(
    graph: &ParityCheckGraph,
    llrs: &[f64],
    check_messages: &EdgeGrid<f64>,
) -> EdgeGrid<f64> {
    let mut out = EdgeGrid::new(graph.n_checks(), graph.n_variables(), 0.0);
    for (c, v) in graph.edges() {
        // Summed without the target check; total minus own term is NaN once messages saturate.
        let extrinsic: f64 = graph
            .checks_of(v)
            .iter()
            .filter(|&&other| other != c)
            .map(|&other| check_messages[(other, v)])
            .sum();
        out[(c, v)] = llrs[v] + extrinsic;
    }
    out
}

/// Hard decision: 1 where the belief is negative, 0 otherwise.
pub fn hard_decide(beliefs: &[f64]) -> Vec<u8> {
    beliefs.iter().map(|&b| if b < 0.0 { 1 } else { 0 }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{probability_to_llr, REFERENCE_LLRS};

    fn reference_engine() -> SumProductEngine {
        SumProductEngine::new(Arc::new(ParityCheckGraph::reference()))
    }

    fn reference_channel() -> ChannelModel {
        ChannelModel::from_llrs(&REFERENCE_LLRS).unwrap()
    }

    fn assert_close(actual: f64, expected: f64, what: &str) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "{what}: expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_reference_converges() {
        let history = reference_engine().decode(&reference_channel(), 8).unwrap();
        assert_eq!(history.round_count(), 8);
        let last = history.final_round();
        assert!(last.is_valid_codeword());
        assert_eq!(last.codeword(), &[0, 0, 1, 0, 1, 1]);
        assert_eq!(last.syndrome(), &[0, 0, 0, 0]);
        assert_eq!(history.first_valid_round(), Some(2));
    }

    #[test]
    fn test_reference_round_zero_values() {
        let history = reference_engine().decode(&reference_channel(), 8).unwrap();
        let r0 = history.at(0).unwrap();

        assert_close(r0.check_messages()[(0, 0)], 2.4217, "E(0->0)");
        assert_close(r0.check_messages()[(0, 1)], -0.4930, "E(0->1)");
        assert_close(r0.check_messages()[(0, 3)], -0.4217, "E(0->3)");
        assert_close(r0.check_messages()[(3, 5)], -3.6869, "E(3->5)");

        let expected = [-0.2676, 5.0334, -3.7676, 2.2783, -6.2217, -0.7173];
        for (v, (&got, &want)) in r0.beliefs().iter().zip(expected.iter()).enumerate() {
            assert_close(got, want, &format!("belief[{v}]"));
        }
        assert_eq!(r0.codeword(), &[1, 0, 1, 0, 1, 1]);
        assert_eq!(r0.syndrome(), &[1, 0, 1, 0]);
        assert!(!r0.is_valid_codeword());
    }

    #[test]
    fn test_round_zero_seeded_from_channel() {
        let channel = reference_channel();
        let history = reference_engine().decode(&channel, 3).unwrap();
        let r0 = history.at(0).unwrap();
        for (c, v) in history.graph().edges() {
            assert_eq!(r0.variable_messages()[(c, v)], channel.llr_of(v).unwrap());
        }
    }

    #[test]
    fn test_determinism() {
        let engine = reference_engine();
        let channel = reference_channel();
        let a = engine.decode(&channel, 8).unwrap();
        let b = engine.decode(&channel, 8).unwrap();
        for (ra, rb) in a.iter().zip(b.iter()) {
            assert_eq!(ra, rb);
        }
    }

    #[test]
    fn test_syndrome_matches_codeword_every_round() {
        let history = reference_engine().decode(&reference_channel(), 8).unwrap();
        let graph = history.graph();
        for snapshot in &history {
            for c in 0..graph.n_checks() {
                let parity = graph
                    .variables_of(c)
                    .iter()
                    .fold(0u8, |acc, &v| acc ^ snapshot.codeword()[v]);
                assert_eq!(snapshot.syndrome()[c], parity, "round {} check {c}", snapshot.round());
            }
        }
    }

    #[test]
    fn test_rounds_chain_through_prepared_messages() {
        let channel = reference_channel();
        let llrs = channel.llrs();
        let history = reference_engine().decode(&channel, 5).unwrap();
        let graph = history.graph().clone();

        for r in 1..history.round_count() {
            let prev = history.at(r - 1).unwrap();
            let cur = history.at(r).unwrap();
            let expected_input = variable_node_update(&graph, &llrs, prev.check_messages());
            let expected_checks = check_node_update(&graph, cur.variable_messages());
            for (c, v) in graph.edges() {
                assert_eq!(cur.variable_messages()[(c, v)], expected_input[(c, v)]);
                assert_eq!(cur.check_messages()[(c, v)], expected_checks[(c, v)]);
            }
        }
    }

    #[test]
    fn test_check_update_excludes_own_edge() {
        let graph = ParityCheckGraph::reference();
        let seed = seed_variable_messages(&graph, &REFERENCE_LLRS);
        let base = check_node_update(&graph, &seed);

        let mut perturbed = seed.clone();
        perturbed[(0, 1)] = -17.0;
        let out = check_node_update(&graph, &perturbed);

        assert_eq!(out[(0, 1)], base[(0, 1)]);
        assert_ne!(out[(0, 0)], base[(0, 0)]);
        assert_ne!(out[(0, 3)], base[(0, 3)]);
        // Other checks never see edge (0, 1).
        for (c, v) in graph.edges().filter(|&(c, _)| c != 0) {
            assert_eq!(out[(c, v)], base[(c, v)]);
        }
    }

    #[test]
    fn test_variable_update_excludes_own_edge() {
        let graph = ParityCheckGraph::reference();
        let seed = seed_variable_messages(&graph, &REFERENCE_LLRS);
        let checks = check_node_update(&graph, &seed);
        let base = variable_node_update(&graph, &REFERENCE_LLRS, &checks);

        let mut perturbed = checks.clone();
        perturbed[(2, 4)] = 123.0;
        let out = variable_node_update(&graph, &REFERENCE_LLRS, &perturbed);

        assert_eq!(out[(2, 4)], base[(2, 4)]);
        assert_ne!(out[(1, 4)], base[(1, 4)]);
    }

    #[test]
    fn test_variable_update_formula() {
        let graph = ParityCheckGraph::reference();
        let seed = seed_variable_messages(&graph, &REFERENCE_LLRS);
        let checks = check_node_update(&graph, &seed);
        let out = variable_node_update(&graph, &REFERENCE_LLRS, &checks);
        // Variable 4 sits on checks 1 and 2.
        assert_eq!(out[(1, 4)], REFERENCE_LLRS[4] + checks[(2, 4)]);
        assert_eq!(out[(2, 4)], REFERENCE_LLRS[4] + checks[(1, 4)]);
    }

    #[test]
    fn test_single_round() {
        let history = reference_engine().decode(&reference_channel(), 1).unwrap();
        assert_eq!(history.round_count(), 1);
        assert_eq!(history.final_round().round(), 0);
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let err = reference_engine().decode(&reference_channel(), 0).unwrap_err();
        assert_eq!(err, LdpcError::ZeroRounds);
    }

    #[test]
    fn test_channel_mismatch_rejected() {
        let err = reference_engine().decode(&ChannelModel::uniform(5), 8).unwrap_err();
        assert_eq!(
            err,
            LdpcError::ChannelLengthMismatch {
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn test_uniform_priors_stay_neutral() {
        let history = reference_engine().decode(&ChannelModel::uniform(6), 4).unwrap();
        for snapshot in &history {
            assert!(snapshot.beliefs().iter().all(|&b| b == 0.0));
            assert_eq!(snapshot.codeword(), &[0; 6]);
            assert!(snapshot.is_valid_codeword());
        }
    }

    #[test]
    fn test_hamming_single_error_corrected() {
        #[rustfmt::skip]
        let h = ParityCheckGraph::from_dense(3, 7, &[
            1, 0, 0, 1, 1, 0, 1,
            0, 1, 0, 1, 0, 1, 1,
            0, 0, 1, 0, 1, 1, 1,
        ])
        .unwrap();
        let codeword = [1u8, 0, 0, 1, 1, 0, 1];
        assert!(h.is_codeword(&codeword));

        let mut llrs: Vec<f64> = codeword.iter().map(|&b| if b == 0 { 4.0 } else { -4.0 }).collect();
        llrs[2] = -1.0; // weak and wrong
        let channel = ChannelModel::from_llrs(&llrs).unwrap();

        let history = decode(&Arc::new(h), &channel, 8).unwrap();
        assert_eq!(history.final_round().codeword(), &codeword);
    }

    #[test]
    fn test_saturated_messages_propagate_infinity() {
        let graph = Arc::new(ParityCheckGraph::from_rows(&[vec![1, 1], vec![1, 1]]).unwrap());
        let p = 1.0 - f64::EPSILON;
        assert!(probability_to_llr(p) > 36.0);

        let history = decode(&graph, &ChannelModel::from_priors(vec![p, p]).unwrap(), 4).unwrap();
        for snapshot in &history {
            assert!(snapshot.beliefs().iter().all(|b| !b.is_nan()));
        }
        let last = history.final_round();
        assert!(last.beliefs().iter().all(|&b| b == f64::INFINITY));
        assert_eq!(last.codeword(), &[0, 0]);
        assert!(last.is_valid_codeword());
    }

    #[test]
    fn test_negative_infinity_decides_one() {
        let graph = Arc::new(ParityCheckGraph::from_rows(&[vec![1, 1], vec![1, 1]]).unwrap());
        let p = f64::EPSILON;
        let history = decode(&graph, &ChannelModel::from_priors(vec![p, p]).unwrap(), 4).unwrap();

        let last = history.final_round();
        assert!(last.beliefs().iter().all(|&b| b == f64::NEG_INFINITY));
        assert_eq!(last.codeword(), &[1, 1]);
        assert_eq!(last.syndrome(), &[0, 0]);
    }

    #[test]
    fn test_hard_decide() {
        let bits = hard_decide(&[1.0, -2.0, 0.0, -0.0, f64::INFINITY, f64::NEG_INFINITY]);
        assert_eq!(bits, vec![0, 1, 0, 0, 0, 1]);
    }
}
