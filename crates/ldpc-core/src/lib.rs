//! # LDPC Sum-Product Decoder Core
//!
//! This crate decodes binary messages protected by a Low-Density
//! Parity-Check (LDPC) code with synchronous sum-product belief propagation,
//! and keeps every round's messages so a run can be inspected afterwards.
//!
//! ## Overview
//!
//! - **Graph**: the parity-check matrix as a bipartite check/variable graph
//! - **Channel**: per-bit priors and their log-likelihood ratios
//! - **Engine**: flooding message passing for a fixed number of rounds
//! - **History**: one immutable snapshot per round, random access by index
//! - **Session**: cursor, viewed round and prior nudging for interactive front ends
//!
//! ## Signal Flow
//!
//! ```text
//! priors → LLRs → round 0 seed → [check update → beliefs → codeword/syndrome → variable update] × N
//!                                              ↓
//!                                     IterationHistory[0..N]
//! ```
//!
//! ## Example
//!
//! ```rust
//! use ldpc_core::prelude::*;
//!
//! let mut session = DecoderSession::reference().unwrap();
//! assert!(session.history().final_round().is_valid_codeword());
//!
//! // Lower the first bit's prior and look at round 3 of the new run
//! session.apply(SessionCommand::DecreasePrior).unwrap();
//! for _ in 0..3 {
//!     session.apply(SessionCommand::NextRound).unwrap();
//! }
//! let snapshot = session.viewed_snapshot();
//! println!("round {} codeword {:?}", snapshot.round(), snapshot.codeword());
//! ```

pub mod channel;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod grid;
pub mod history;
pub mod logging;
pub mod session;

// Re-export main types
pub use channel::{ChannelModel, NudgeDirection};
pub use config::DecoderConfig;
pub use engine::{decode, SumProductEngine};
pub use error::{LdpcError, LdpcResult};
pub use graph::ParityCheckGraph;
pub use grid::EdgeGrid;
pub use history::{IterationHistory, RoundSnapshot};
pub use session::{DecoderSession, SessionCommand, SessionStatus};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::channel::{ChannelModel, NudgeDirection};
    pub use crate::engine::SumProductEngine;
    pub use crate::error::{LdpcError, LdpcResult};
    pub use crate::graph::ParityCheckGraph;
    pub use crate::history::{IterationHistory, RoundSnapshot};
    pub use crate::session::{DecoderSession, SessionCommand, SessionStatus};
}
