//! Round-by-round record of a decode run.
//!
//! A [`RoundSnapshot`] freezes every message and derived value of one round.
//! [`IterationHistory`] holds the snapshots of a whole run in round order and
//! gives O(1) access to any of them. Both are read-only once the engine hands
//! them out; a new run builds a new history.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{LdpcError, LdpcResult};
use crate::graph::ParityCheckGraph;
use crate::grid::EdgeGrid;

/// Everything computed in one round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSnapshot {
    round: usize,
    check_messages: EdgeGrid<f64>,
    variable_messages: EdgeGrid<f64>,
    beliefs: Vec<f64>,
    codeword: Vec<u8>,
    syndrome: Vec<u8>,
}

impl RoundSnapshot {
    pub(crate) fn new(
        round: usize,
        check_messages: EdgeGrid<f64>,
        variable_messages: EdgeGrid<f64>,
        beliefs: Vec<f64>,
        codeword: Vec<u8>,
        syndrome: Vec<u8>,
    ) -> Self {
        Self {
            round,
            check_messages,
            variable_messages,
            beliefs,
            codeword,
            syndrome,
        }
    }

    /// Zero-based round index.
    pub fn round(&self) -> usize {
        self.round
    }

    /// Check-to-variable messages produced this round.
    pub fn check_messages(&self) -> &EdgeGrid<f64> {
        &self.check_messages
    }

    /// Variable-to-check messages this round's check update consumed.
    ///
    /// Round 0 holds the channel LLRs broadcast along every edge; later
    /// rounds hold the extrinsic sums prepared at the end of the round before.
    pub fn variable_messages(&self) -> &EdgeGrid<f64> {
        &self.variable_messages
    }

    /// Posterior LLR per variable.
    pub fn beliefs(&self) -> &[f64] {
        &self.beliefs
    }

    /// Hard decision per variable (1 where the belief is negative).
    pub fn codeword(&self) -> &[u8] {
        &self.codeword
    }

    /// Parity of each check over the hard decision.
    pub fn syndrome(&self) -> &[u8] {
        &self.syndrome
    }

    /// Number of unsatisfied checks.
    pub fn syndrome_weight(&self) -> usize {
        self.syndrome.iter().filter(|&&s| s != 0).count()
    }

    /// True when every check is satisfied.
    pub fn is_valid_codeword(&self) -> bool {
        self.syndrome.iter().all(|&s| s == 0)
    }
}

/// Fixed-length, index-addressable sequence of round snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct IterationHistory {
    #[serde(skip)]
    graph: Arc<ParityCheckGraph>,
    rounds: Vec<RoundSnapshot>,
}

impl IterationHistory {
    /// Assemble a history from snapshots in round order.
    ///
    /// Callers guarantee at least one snapshot and that `rounds[i].round() == i`.
    pub(crate) fn new(graph: Arc<ParityCheckGraph>, rounds: Vec<RoundSnapshot>) -> Self {
        debug_assert!(!rounds.is_empty(), "history needs at least one round");
        debug_assert!(rounds.iter().enumerate().all(|(i, r)| r.round == i));
        Self { graph, rounds }
    }

    /// The graph this history was decoded on.
    pub fn graph(&self) -> &Arc<ParityCheckGraph> {
        &self.graph
    }

    /// Number of rounds recorded.
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    /// Snapshot of round `index`.
    pub fn at(&self, index: usize) -> LdpcResult<&RoundSnapshot> {
        self.rounds.get(index).ok_or_else(|| {
            tracing::warn!(index, len = self.rounds.len(), "round index out of range");
            LdpcError::RoundOutOfRange {
                index,
                len: self.rounds.len(),
            }
        })
    }

    /// Snapshot of the last round.
    pub fn final_round(&self) -> &RoundSnapshot {
        &self.rounds[self.rounds.len() - 1]
    }

    /// Whether round `index` decided a valid codeword.
    pub fn is_valid_codeword(&self, index: usize) -> LdpcResult<bool> {
        self.at(index).map(RoundSnapshot::is_valid_codeword)
    }

    /// Earliest round whose syndrome is all zero, if any.
    pub fn first_valid_round(&self) -> Option<usize> {
        self.rounds.iter().position(RoundSnapshot::is_valid_codeword)
    }

    /// Iterate over the snapshots in round order.
    pub fn iter(&self) -> std::slice::Iter<'_, RoundSnapshot> {
        self.rounds.iter()
    }

    /// Check-to-variable message on edge `(check, variable)` in round `round`.
    pub fn check_message(&self, round: usize, check: usize, variable: usize) -> LdpcResult<f64> {
        let snapshot = self.at(round)?;
        self.require_edge(check, variable)?;
        Ok(snapshot.check_messages[(check, variable)])
    }

    /// Variable-to-check message on edge `(check, variable)` consumed in round `round`.
    pub fn variable_message(&self, round: usize, check: usize, variable: usize) -> LdpcResult<f64> {
        let snapshot = self.at(round)?;
        self.require_edge(check, variable)?;
        Ok(snapshot.variable_messages[(check, variable)])
    }

    fn require_edge(&self, check: usize, variable: usize) -> LdpcResult<()> {
        if check >= self.graph.n_checks() {
            return Err(LdpcError::CheckOutOfRange {
                index: check,
                len: self.graph.n_checks(),
            });
        }
        if variable >= self.graph.n_variables() {
            return Err(LdpcError::VariableOutOfRange {
                index: variable,
                len: self.graph.n_variables(),
            });
        }
        if !self.graph.connected(check, variable) {
            return Err(LdpcError::NotAnEdge { check, variable });
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a IterationHistory {
    type Item = &'a RoundSnapshot;
    type IntoIter = std::slice::Iter<'a, RoundSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.rounds.iter()
    }
}
