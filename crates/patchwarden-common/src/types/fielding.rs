//! Fielding history and live poll feedback

use serde::{Deserialize, Serialize};

use super::challenge_set::{ChallengeSetId, Round};
use super::variant::VariantId;

/// Outcome of functional probing of a fielded variant during a round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollFeedback {
    /// Fraction of probes that passed every check (0.0 - 1.0)
    pub success: f64,
    /// Probes that timed out
    pub timeout: u32,
    /// Probes that failed to connect
    pub connect: u32,
    /// Probes that failed a functional check
    pub function: u32,
    /// Live CPU-time ratio against the baseline
    pub time_overhead: f64,
    /// Live memory ratio against the baseline
    pub memory_overhead: f64,
}

impl PollFeedback {
    /// Feedback with the given success ratio and no overhead or failure counts
    pub fn with_success(success: f64) -> Self {
        Self {
            success,
            timeout: 0,
            connect: 0,
            function: 0,
            time_overhead: 0.0,
            memory_overhead: 0.0,
        }
    }

    pub fn overheads(mut self, time_overhead: f64, memory_overhead: f64) -> Self {
        self.time_overhead = time_overhead;
        self.memory_overhead = memory_overhead;
        self
    }

    /// Larger of the two live overhead ratios
    #[inline]
    pub fn peak_overhead(&self) -> f64 {
        self.time_overhead.max(self.memory_overhead)
    }
}

/// Record that a set of variants was fielded for a challenge set in a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldingEvent {
    pub cs: ChallengeSetId,
    pub variants: Vec<VariantId>,
    pub team: String,
    pub round: Round,
    /// Arrives one or more rounds after fielding
    pub feedback: Option<PollFeedback>,
}

impl FieldingEvent {
    pub fn new(
        cs: ChallengeSetId,
        variants: Vec<VariantId>,
        team: impl Into<String>,
        round: Round,
    ) -> Self {
        Self {
            cs,
            variants,
            team: team.into(),
            round,
            feedback: None,
        }
    }

    pub fn with_feedback(mut self, feedback: PollFeedback) -> Self {
        self.feedback = Some(feedback);
        self
    }

    /// Whether the given variant was part of this fielding
    pub fn fielded(&self, variant: VariantId) -> bool {
        self.variants.contains(&variant)
    }
}
