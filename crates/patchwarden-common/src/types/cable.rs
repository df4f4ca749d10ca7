//! SubmissionCable - append-only ledger of fielding decisions
//!
//! Every evaluator decision and every rotation produces one cable. Cables for
//! a challenge set are totally ordered by id; the external transport picks up
//! unprocessed cables and marks them once sent.

use serde::{Deserialize, Serialize};

use super::challenge_set::{ChallengeSetId, Round};
use super::variant::VariantId;

/// Store-assigned, globally ascending cable identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CableId(pub u64);

impl std::fmt::Display for CableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cable#{}", self.0)
    }
}

/// Why a cable was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CableOrigin {
    /// Evaluator chose a patch candidate
    Decision,
    /// Evaluator reverted to the baseline
    Revert,
    /// Rotation scheduler fielded a variant to gather evidence
    Rotation,
}

/// A cable before the store assigns identity and timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CableDraft {
    pub cs: ChallengeSetId,
    /// Round the cable was written for
    pub round: Round,
    pub variants: Vec<VariantId>,
    pub origin: CableOrigin,
}

impl CableDraft {
    pub fn new(
        cs: ChallengeSetId,
        round: Round,
        variants: Vec<VariantId>,
        origin: CableOrigin,
    ) -> Self {
        Self {
            cs,
            round,
            variants,
            origin,
        }
    }
}

/// Persisted ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionCable {
    pub id: CableId,
    pub cs: ChallengeSetId,
    pub round: Round,
    pub variants: Vec<VariantId>,
    pub origin: CableOrigin,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Set by the transport once the cable has been sent
    pub processed_at: Option<i64>,
}

impl SubmissionCable {
    pub fn from_draft(id: CableId, draft: CableDraft) -> Self {
        Self {
            id,
            cs: draft.cs,
            round: draft.round,
            variants: draft.variants,
            origin: draft.origin,
            created_at: chrono::Utc::now().timestamp_millis(),
            processed_at: None,
        }
    }

    #[inline]
    pub fn is_processed(&self) -> bool {
        self.processed_at.is_some()
    }

    /// Whether this cable fields exactly the given variants
    pub fn fields(&self, variants: &[VariantId]) -> bool {
        self.variants == variants
    }
}
