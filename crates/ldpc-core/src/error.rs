//! Decoder error types

use thiserror::Error;

/// Result type for decoder operations
pub type LdpcResult<T> = Result<T, LdpcError>;

/// Errors that can occur while building or querying a decoder
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LdpcError {
    /// Parity-check matrix has no rows or no columns
    #[error("Parity-check matrix must have at least one check and one variable")]
    EmptyMatrix,

    /// A row has a different length than the first row
    #[error("Parity-check row {row} has {actual} entries, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Matrix entry outside {0, 1}
    #[error("Parity-check entry ({row}, {col}) is {value}, expected 0 or 1")]
    InvalidEntry { row: usize, col: usize, value: u8 },

    /// Variable node not covered by any check
    #[error("Variable {0} participates in no parity check")]
    IsolatedVariable(usize),

    /// Check node covering no variable
    #[error("Check {0} covers no variable")]
    IsolatedCheck(usize),

    /// Channel model sized for a different code
    #[error("Channel has {actual} priors, graph has {expected} variables")]
    ChannelLengthMismatch { expected: usize, actual: usize },

    /// Prior probability not strictly inside (0, 1)
    #[error("Prior for variable {variable} is {value}, must lie strictly inside (0, 1)")]
    InvalidPrior { variable: usize, value: f64 },

    /// Decode requested with no rounds
    #[error("Decode requires at least one round")]
    ZeroRounds,

    /// Variable index out of range
    #[error("Variable index {index} out of range (0..{len})")]
    VariableOutOfRange { index: usize, len: usize },

    /// Check index out of range
    #[error("Check index {index} out of range (0..{len})")]
    CheckOutOfRange { index: usize, len: usize },

    /// Round index out of range
    #[error("Round index {index} out of range (0..{len})")]
    RoundOutOfRange { index: usize, len: usize },

    /// Message lookup on a pair with no edge between them
    #[error("Check {check} and variable {variable} are not connected")]
    NotAnEdge { check: usize, variable: usize },

    /// Configuration parsing or loading failed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LdpcError {
    /// Check if this error comes from a malformed code or configuration.
    ///
    /// These are fatal at startup; nothing has been decoded yet.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            LdpcError::EmptyMatrix
                | LdpcError::RaggedMatrix { .. }
                | LdpcError::InvalidEntry { .. }
                | LdpcError::IsolatedVariable(_)
                | LdpcError::IsolatedCheck(_)
                | LdpcError::ChannelLengthMismatch { .. }
                | LdpcError::InvalidPrior { .. }
                | LdpcError::ZeroRounds
                | LdpcError::Config(_)
        )
    }

    /// Check if this is a caller indexing mistake
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            LdpcError::VariableOutOfRange { .. }
                | LdpcError::CheckOutOfRange { .. }
                | LdpcError::RoundOutOfRange { .. }
                | LdpcError::NotAnEdge { .. }
        )
    }
}

impl From<serde_json::Error> for LdpcError {
    fn from(err: serde_json::Error) -> Self {
        LdpcError::Config(err.to_string())
    }
}

impl From<std::io::Error> for LdpcError {
    fn from(err: std::io::Error) -> Self {
        LdpcError::Config(err.to_string())
    }
}
