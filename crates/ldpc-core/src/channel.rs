//! Channel priors and their log-likelihood ratios.
//!
//! Each variable carries a prior probability `p` in the open interval (0, 1).
//! The decoder works on `L = ln(p / (1 - p))`; a negative belief decides the
//! bit as 1. Priors are only ever changed through [`ChannelModel::nudge`],
//! which moves them along a 0.01 grid inside `[0.01, 0.99]`.
//!
//! # Example
//!
//! ```rust
//! use ldpc_core::channel::{ChannelModel, NudgeDirection};
//!
//! let mut channel = ChannelModel::from_priors(vec![0.567, 0.5]).unwrap();
//! let p = channel.nudge(0, NudgeDirection::Increase).unwrap();
//! assert_eq!(p, 0.57);
//! assert!(channel.llr_of(1).unwrap().abs() < 1e-12);
//! ```

use serde::Serialize;

use crate::error::{LdpcError, LdpcResult};

/// Grid spacing for nudged priors.
pub const PRIOR_STEP: f64 = 0.01;
/// Smallest prior reachable by nudging.
pub const PRIOR_MIN: f64 = 0.01;
/// Largest prior reachable by nudging.
pub const PRIOR_MAX: f64 = 0.99;

/// Channel LLRs of the reference example, one per variable of
/// [`REFERENCE_MATRIX`](crate::graph::REFERENCE_MATRIX).
pub const REFERENCE_LLRS: [f64; 6] = [-0.5, 2.5, -4.0, 5.0, -3.5, 2.5];

const STEPS_PER_UNIT: i64 = 100;
const MIN_STEPS: i64 = 1;
const MAX_STEPS: i64 = 99;
/// Tolerance when snapping; keeps 0.57 (stored as 0.56999…) on step 57.
const SNAP_TOLERANCE: f64 = 1e-9;

/// Convert an LLR to a probability: `e^L / (1 + e^L)`.
pub fn llr_to_probability(llr: f64) -> f64 {
    // Logistic form that stays finite for large |L|.
    if llr >= 0.0 {
        1.0 / (1.0 + (-llr).exp())
    } else {
        let e = llr.exp();
        e / (1.0 + e)
    }
}

/// Convert a probability to an LLR: `ln(p / (1 - p))`.
pub fn probability_to_llr(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

/// Direction of a single prior adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    /// Raise the prior by one grid step.
    Increase,
    /// Lower the prior by one grid step.
    Decrease,
}

/// Per-variable channel priors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelModel {
    priors: Vec<f64>,
}

impl ChannelModel {
    /// Create from explicit priors, each strictly inside (0, 1).
    pub fn from_priors(priors: Vec<f64>) -> LdpcResult<Self> {
        if let Some((variable, &value)) = priors
            .iter()
            .enumerate()
            .find(|(_, &p)| !(p > 0.0 && p < 1.0))
        {
            return Err(LdpcError::InvalidPrior { variable, value });
        }
        Ok(Self { priors })
    }

    /// Create from channel LLRs, converting each with [`llr_to_probability`].
    ///
    /// LLRs so large that the prior rounds to 0 or 1 are rejected.
    pub fn from_llrs(llrs: &[f64]) -> LdpcResult<Self> {
        Self::from_priors(llrs.iter().map(|&l| llr_to_probability(l)).collect())
    }

    /// All variables at prior 0.5 (LLR 0).
    pub fn uniform(n_variables: usize) -> Self {
        Self {
            priors: vec![0.5; n_variables],
        }
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.priors.len()
    }

    /// Returns `true` if the model holds no variables.
    pub fn is_empty(&self) -> bool {
        self.priors.is_empty()
    }

    /// All priors, indexed by variable.
    pub fn priors(&self) -> &[f64] {
        &self.priors
    }

    /// Prior probability of variable `v`.
    pub fn prior(&self, v: usize) -> LdpcResult<f64> {
        self.priors
            .get(v)
            .copied()
            .ok_or(LdpcError::VariableOutOfRange {
                index: v,
                len: self.priors.len(),
            })
    }

    /// LLR of variable `v`: `ln(prior / (1 - prior))`.
    pub fn llr_of(&self, v: usize) -> LdpcResult<f64> {
        self.prior(v).map(probability_to_llr)
    }

    /// LLRs of every variable, recomputed from the current priors.
    pub fn llrs(&self) -> Vec<f64> {
        self.priors.iter().map(|&p| probability_to_llr(p)).collect()
    }

    /// Move the prior of variable `v` one grid step and return the new value.
    ///
    /// The prior is first snapped down to the 0.01 grid, then stepped, then
    /// clamped to `[0.01, 0.99]`. Any decode result computed from the old
    /// priors is stale afterwards.
    pub fn nudge(&mut self, v: usize, direction: NudgeDirection) -> LdpcResult<f64> {
        let len = self.priors.len();
        let prior = self
            .priors
            .get_mut(v)
            .ok_or(LdpcError::VariableOutOfRange { index: v, len })?;

        let snapped = (*prior * STEPS_PER_UNIT as f64 + SNAP_TOLERANCE).floor() as i64;
        let stepped = match direction {
            NudgeDirection::Increase => snapped + 1,
            NudgeDirection::Decrease => snapped - 1,
        };
        *prior = stepped.clamp(MIN_STEPS, MAX_STEPS) as f64 / STEPS_PER_UNIT as f64;

        tracing::debug!(variable = v, ?direction, prior = *prior, "nudged prior");
        Ok(*prior)
    }
}
