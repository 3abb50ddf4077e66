//! Bipartite factor graph of a binary parity-check matrix.
//!
//! Rows of **H** are check nodes, columns are variable nodes (code bits), and
//! every 1-entry is an edge. The graph is validated once at construction and
//! never mutated afterwards; decoders share it behind an `Arc`.
//!
//! # Example
//!
//! ```rust
//! use ldpc_core::graph::ParityCheckGraph;
//!
//! let h = ParityCheckGraph::from_rows(&[
//!     vec![1, 1, 0, 1, 0, 0],
//!     vec![0, 1, 1, 0, 1, 0],
//!     vec![1, 0, 0, 0, 1, 1],
//!     vec![0, 0, 1, 1, 0, 1],
//! ])
//! .unwrap();
//!
//! assert_eq!(h.n_checks(), 4);
//! assert_eq!(h.n_variables(), 6);
//! assert!(h.connected(0, 3));
//! assert_eq!(h.checks_of(4), &[1, 2]);
//! ```

use serde::Serialize;

use crate::error::{LdpcError, LdpcResult};

/// The 4-check, 6-variable code used throughout the examples.
#[rustfmt::skip]
pub const REFERENCE_MATRIX: [[u8; 6]; 4] = [
    [1, 1, 0, 1, 0, 0],
    [0, 1, 1, 0, 1, 0],
    [1, 0, 0, 0, 1, 1],
    [0, 0, 1, 1, 0, 1],
];

/// Immutable parity-check graph with adjacency in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParityCheckGraph {
    n_checks: usize,
    n_variables: usize,
    /// Row-major membership, `n_checks * n_variables` entries.
    #[serde(skip)]
    dense: Vec<bool>,
    /// For each check node, the sorted variable indices it covers.
    check_to_var: Vec<Vec<usize>>,
    /// For each variable node, the sorted check indices it participates in.
    var_to_check: Vec<Vec<usize>>,
}

impl ParityCheckGraph {
    /// Build from a list of matrix rows.
    ///
    /// Every row must have the same length, entries must be 0 or 1, and every
    /// check and variable needs at least one incident edge.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> LdpcResult<Self> {
        let n_checks = rows.len();
        let n_variables = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if n_checks == 0 || n_variables == 0 {
            return Err(LdpcError::EmptyMatrix);
        }

        let mut data = Vec::with_capacity(n_checks * n_variables);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != n_variables {
                return Err(LdpcError::RaggedMatrix {
                    row,
                    expected: n_variables,
                    actual: values.len(),
                });
            }
            data.extend_from_slice(values);
        }

        Self::from_dense(n_checks, n_variables, &data)
    }

    /// Build from a dense row-major matrix of `rows * cols` entries.
    pub fn from_dense(rows: usize, cols: usize, data: &[u8]) -> LdpcResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(LdpcError::EmptyMatrix);
        }
        if data.len() != rows * cols {
            // Report the first row that cannot be filled completely.
            let row = data.len() / cols;
            return Err(LdpcError::RaggedMatrix {
                row,
                expected: cols,
                actual: data.len().saturating_sub(row * cols).min(cols),
            });
        }

        let mut dense = vec![false; rows * cols];
        let mut check_to_var = vec![Vec::new(); rows];
        let mut var_to_check = vec![Vec::new(); cols];

        for r in 0..rows {
            for c in 0..cols {
                match data[r * cols + c] {
                    0 => {}
                    1 => {
                        dense[r * cols + c] = true;
                        check_to_var[r].push(c);
                        var_to_check[c].push(r);
                    }
                    value => {
                        return Err(LdpcError::InvalidEntry { row: r, col: c, value });
                    }
                }
            }
        }

        if let Some(c) = check_to_var.iter().position(|vars| vars.is_empty()) {
            return Err(LdpcError::IsolatedCheck(c));
        }
        if let Some(v) = var_to_check.iter().position(|checks| checks.is_empty()) {
            return Err(LdpcError::IsolatedVariable(v));
        }

        Ok(Self {
            n_checks: rows,
            n_variables: cols,
            dense,
            check_to_var,
            var_to_check,
        })
    }

    /// The 4×6 reference code.
    pub fn reference() -> Self {
        Self::from_rows(&REFERENCE_MATRIX).expect("reference matrix is well-formed")
    }

    /// Number of check nodes (rows).
    #[inline]
    pub fn n_checks(&self) -> usize {
        self.n_checks
    }

    /// Number of variable nodes (columns / codeword bits).
    #[inline]
    pub fn n_variables(&self) -> usize {
        self.n_variables
    }

    /// True iff **H**\[check\]\[variable\] is 1. Out-of-range indices are
    /// never connected.
    #[inline]
    pub fn connected(&self, check: usize, variable: usize) -> bool {
        check < self.n_checks
            && variable < self.n_variables
            && self.dense[check * self.n_variables + variable]
    }

    /// Checks that variable `v` participates in, ascending.
    ///
    /// # Panics
    ///
    /// Panics if `v >= n_variables()`.
    #[inline]
    pub fn checks_of(&self, v: usize) -> &[usize] {
        &self.var_to_check[v]
    }

    /// Variables covered by check `c`, ascending.
    ///
    /// # Panics
    ///
    /// Panics if `c >= n_checks()`.
    #[inline]
    pub fn variables_of(&self, c: usize) -> &[usize] {
        &self.check_to_var[c]
    }

    /// Total number of edges (1-entries) in **H**.
    pub fn num_edges(&self) -> usize {
        self.check_to_var.iter().map(Vec::len).sum()
    }

    /// All `(check, variable)` edges in row-major order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.check_to_var
            .iter()
            .enumerate()
            .flat_map(|(c, vars)| vars.iter().map(move |&v| (c, v)))
    }

    /// Compute the syndrome **s** = **H** · **x** (mod 2).
    ///
    /// # Panics
    ///
    /// Panics if `bits.len() != n_variables()`.
    pub fn syndrome(&self, bits: &[u8]) -> Vec<u8> {
        assert_eq!(bits.len(), self.n_variables, "bit vector length must match variable count");
        self.check_to_var
            .iter()
            .map(|vars| vars.iter().fold(0u8, |acc, &v| acc ^ (bits[v] & 1)))
            .collect()
    }

    /// Returns `true` if **H** · **x** = **0** (mod 2).
    pub fn is_codeword(&self, bits: &[u8]) -> bool {
        self.syndrome(bits).iter().all(|&s| s == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_dimensions() {
        let h = ParityCheckGraph::reference();
        assert_eq!(h.n_checks(), 4);
        assert_eq!(h.n_variables(), 6);
        assert_eq!(h.num_edges(), 12); // 3 ones per row x 4 rows
    }

    #[test]
    fn test_adjacency_consistency() {
        let h = ParityCheckGraph::reference();
        for c in 0..h.n_checks() {
            for &v in h.variables_of(c) {
                assert!(h.checks_of(v).contains(&c), "var {v} should list check {c}");
                assert!(h.connected(c, v));
            }
        }
        for (c, row) in REFERENCE_MATRIX.iter().enumerate() {
            for (v, &bit) in row.iter().enumerate() {
                assert_eq!(h.connected(c, v), bit == 1, "entry ({c}, {v})");
            }
        }
    }

    #[test]
    fn test_neighbour_lists() {
        let h = ParityCheckGraph::reference();
        assert_eq!(h.variables_of(0), &[0, 1, 3]);
        assert_eq!(h.variables_of(3), &[2, 3, 5]);
        assert_eq!(h.checks_of(0), &[0, 2]);
        assert_eq!(h.checks_of(5), &[2, 3]);
    }

    #[test]
    fn test_connected_out_of_range() {
        let h = ParityCheckGraph::reference();
        assert!(!h.connected(4, 0));
        assert!(!h.connected(0, 6));
    }

    #[test]
    fn test_edges_row_major() {
        let h = ParityCheckGraph::reference();
        let edges: Vec<_> = h.edges().collect();
        assert_eq!(edges.len(), 12);
        assert_eq!(&edges[..3], &[(0, 0), (0, 1), (0, 3)]);
        assert_eq!(edges[11], (3, 5));
    }

    #[test]
    fn test_empty_rejected() {
        let rows: Vec<Vec<u8>> = Vec::new();
        assert_eq!(ParityCheckGraph::from_rows(&rows), Err(LdpcError::EmptyMatrix));
        assert_eq!(
            ParityCheckGraph::from_rows(&[Vec::<u8>::new()]),
            Err(LdpcError::EmptyMatrix)
        );
    }

    #[test]
    fn test_ragged_rejected() {
        let err = ParityCheckGraph::from_rows(&[vec![1, 1, 0], vec![0, 1]]).unwrap_err();
        assert_eq!(
            err,
            LdpcError::RaggedMatrix {
                row: 1,
                expected: 3,
                actual: 2
            }
        );
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_dense_length_mismatch() {
        let err = ParityCheckGraph::from_dense(2, 3, &[1, 1, 1, 1]).unwrap_err();
        assert_eq!(
            err,
            LdpcError::RaggedMatrix {
                row: 1,
                expected: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn test_invalid_entry_rejected() {
        let err = ParityCheckGraph::from_rows(&[vec![1, 2], vec![1, 1]]).unwrap_err();
        assert_eq!(err, LdpcError::InvalidEntry { row: 0, col: 1, value: 2 });
    }

    #[test]
    fn test_isolated_nodes_rejected() {
        assert_eq!(
            ParityCheckGraph::from_rows(&[vec![1, 1, 0], vec![1, 1, 0]]),
            Err(LdpcError::IsolatedVariable(2))
        );
        assert_eq!(
            ParityCheckGraph::from_rows(&[vec![1, 1], vec![0, 0]]),
            Err(LdpcError::IsolatedCheck(1))
        );
    }

    #[test]
    fn test_syndrome() {
        let h = ParityCheckGraph::reference();
        assert_eq!(h.syndrome(&[0, 0, 1, 0, 1, 1]), vec![0, 0, 0, 0]);
        assert!(h.is_codeword(&[0, 0, 1, 0, 1, 1]));
        assert_eq!(h.syndrome(&[1, 0, 1, 0, 1, 1]), vec![1, 0, 1, 0]);
        assert!(!h.is_codeword(&[1, 0, 1, 0, 1, 1]));
    }
}
