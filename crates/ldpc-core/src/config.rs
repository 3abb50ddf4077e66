//! Decoder configuration
//!
//! Describes the code, the starting channel and the round count. The default
//! is the 4×6 reference code with its published channel LLRs and 8 rounds.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::channel::{llr_to_probability, ChannelModel, REFERENCE_LLRS};
use crate::error::{LdpcError, LdpcResult};
use crate::graph::{ParityCheckGraph, REFERENCE_MATRIX};
use crate::logging::LogConfig;
use crate::session::{DecoderSession, DEFAULT_ROUNDS};

/// Prior given to variables with no configured LLR.
const NEUTRAL_PRIOR: f64 = 0.5;

/// Configuration for a decoding session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Parity-check matrix rows (0/1 entries)
    pub matrix: Vec<Vec<u8>>,
    /// Channel LLR per variable; missing trailing variables start at prior 0.5
    pub initial_llrs: Vec<f64>,
    /// Rounds per decode
    pub rounds: usize,
    /// Logging setup for binaries
    pub log: LogConfig,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            matrix: REFERENCE_MATRIX.iter().map(|row| row.to_vec()).collect(),
            initial_llrs: REFERENCE_LLRS.to_vec(),
            rounds: DEFAULT_ROUNDS,
            log: LogConfig::default(),
        }
    }
}

impl DecoderConfig {
    /// Parse from a JSON document. Omitted fields take their defaults.
    pub fn from_json_str(json: &str) -> LdpcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> LdpcResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_string(&self) -> LdpcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate and build the parity-check graph.
    pub fn build_graph(&self) -> LdpcResult<ParityCheckGraph> {
        ParityCheckGraph::from_rows(&self.matrix)
    }

    /// Build the starting channel for `graph`.
    pub fn build_channel(&self, graph: &ParityCheckGraph) -> LdpcResult<ChannelModel> {
        let n = graph.n_variables();
        if self.initial_llrs.len() > n {
            return Err(LdpcError::Config(format!(
                "{} initial LLRs given for {} variables",
                self.initial_llrs.len(),
                n
            )));
        }
        let priors = (0..n)
            .map(|v| {
                self.initial_llrs
                    .get(v)
                    .map_or(NEUTRAL_PRIOR, |&l| llr_to_probability(l))
            })
            .collect();
        ChannelModel::from_priors(priors)
    }

    /// Build graph and channel, then run the first decode.
    pub fn build_session(&self) -> LdpcResult<DecoderSession> {
        let graph = self.build_graph()?;
        let channel = self.build_channel(&graph)?;
        DecoderSession::new(Arc::new(graph), channel, self.rounds)
    }
}
