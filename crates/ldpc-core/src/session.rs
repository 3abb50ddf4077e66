//! Interactive decoding session state.
//!
//! A [`DecoderSession`] owns everything a viewer needs: the channel priors,
//! the current [`IterationHistory`], the selected variable and the round on
//! display. Input layers translate key presses into [`SessionCommand`]s and
//! hand them to [`DecoderSession::apply`]; changing a prior re-runs the whole
//! decode from scratch.
//!
//! # Example
//!
//! ```rust
//! use ldpc_core::session::{DecoderSession, SessionCommand, SessionStatus};
//!
//! let mut session = DecoderSession::reference().unwrap();
//! session.apply(SessionCommand::NextRound).unwrap();
//! assert_eq!(session.viewed_round(), 1);
//!
//! session.apply(SessionCommand::SelectPrevious).unwrap(); // wraps to the last bit
//! assert_eq!(session.cursor(), 5);
//!
//! assert_eq!(session.apply(SessionCommand::Quit).unwrap(), SessionStatus::Quit);
//! ```

use std::sync::Arc;

use crate::channel::{ChannelModel, NudgeDirection, REFERENCE_LLRS};
use crate::engine::SumProductEngine;
use crate::error::LdpcResult;
use crate::graph::ParityCheckGraph;
use crate::history::{IterationHistory, RoundSnapshot};

/// Rounds decoded per run unless configured otherwise.
pub const DEFAULT_ROUNDS: usize = 8;

/// Commands the input layer can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Move the cursor one variable left, wrapping to the last.
    SelectPrevious,
    /// Move the cursor one variable right, wrapping to the first.
    SelectNext,
    /// Show the previous round (stays at round 0).
    PreviousRound,
    /// Show the next round (stays at the final round).
    NextRound,
    /// Nudge the selected prior up and re-decode.
    IncreasePrior,
    /// Nudge the selected prior down and re-decode.
    DecreasePrior,
    /// End the session.
    Quit,
}

/// Whether the input loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Continue,
    Quit,
}

/// Channel, history and view state of one user session.
#[derive(Debug, Clone)]
pub struct DecoderSession {
    engine: SumProductEngine,
    channel: ChannelModel,
    history: IterationHistory,
    n_rounds: usize,
    cursor: usize,
    viewed_round: usize,
}

impl DecoderSession {
    /// Start a session and run the first decode.
    pub fn new(
        graph: Arc<ParityCheckGraph>,
        channel: ChannelModel,
        n_rounds: usize,
    ) -> LdpcResult<Self> {
        let engine = SumProductEngine::new(graph);
        let history = engine.decode(&channel, n_rounds)?;
        tracing::info!(
            n_checks = engine.graph().n_checks(),
            n_variables = engine.graph().n_variables(),
            n_rounds,
            "session started"
        );
        Ok(Self {
            engine,
            channel,
            history,
            n_rounds,
            cursor: 0,
            viewed_round: 0,
        })
    }

    /// Session over the reference code and channel with the default round count.
    pub fn reference() -> LdpcResult<Self> {
        Self::new(
            Arc::new(ParityCheckGraph::reference()),
            ChannelModel::from_llrs(&REFERENCE_LLRS)?,
            DEFAULT_ROUNDS,
        )
    }

    /// Apply one command.
    ///
    /// Only prior changes can fail, and only if the session state was built
    /// inconsistently; on failure the previous priors and history are kept.
    pub fn apply(&mut self, command: SessionCommand) -> LdpcResult<SessionStatus> {
        tracing::debug!(?command, cursor = self.cursor, round = self.viewed_round, "command");
        let n_variables = self.channel.len();
        match command {
            SessionCommand::SelectPrevious => {
                self.cursor = if self.cursor == 0 { n_variables - 1 } else { self.cursor - 1 };
            }
            SessionCommand::SelectNext => {
                self.cursor = if self.cursor + 1 >= n_variables { 0 } else { self.cursor + 1 };
            }
            SessionCommand::PreviousRound => {
                self.viewed_round = self.viewed_round.saturating_sub(1);
            }
            SessionCommand::NextRound => {
                self.viewed_round = (self.viewed_round + 1).min(self.n_rounds - 1);
            }
            SessionCommand::IncreasePrior => self.nudge(NudgeDirection::Increase)?,
            SessionCommand::DecreasePrior => self.nudge(NudgeDirection::Decrease)?,
            SessionCommand::Quit => return Ok(SessionStatus::Quit),
        }
        Ok(SessionStatus::Continue)
    }

    fn nudge(&mut self, direction: NudgeDirection) -> LdpcResult<()> {
        let mut channel = self.channel.clone();
        channel.nudge(self.cursor, direction)?;
        let history = self.engine.decode(&channel, self.n_rounds)?;
        self.channel = channel;
        self.history = history;
        Ok(())
    }

    /// The parity-check graph.
    pub fn graph(&self) -> &Arc<ParityCheckGraph> {
        self.engine.graph()
    }

    /// Current channel priors.
    pub fn channel(&self) -> &ChannelModel {
        &self.channel
    }

    /// History of the latest decode.
    pub fn history(&self) -> &IterationHistory {
        &self.history
    }

    /// Rounds per decode.
    pub fn n_rounds(&self) -> usize {
        self.n_rounds
    }

    /// Selected variable.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Round on display.
    pub fn viewed_round(&self) -> usize {
        self.viewed_round
    }

    /// Snapshot of the round on display.
    pub fn viewed_snapshot(&self) -> &RoundSnapshot {
        // viewed_round is clamped to 0..n_rounds and every history has n_rounds rounds.
        self.history
            .at(self.viewed_round)
            .unwrap_or_else(|_| self.history.final_round())
    }
}
