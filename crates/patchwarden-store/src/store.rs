//! Storage trait consumed by the evaluator, scheduler, and round driver

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use patchwarden_common::{
    CableDraft, CableId, ChallengeSet, ChallengeSetId, FieldingEvent, PerformanceScore,
    PollFeedback, Result, Round, SubmissionCable, Variant,
};

/// Persisted rotation position of one challenge set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    /// Fixed starting offset in the patch order
    pub phase: u64,
    /// Number of rotations committed so far
    pub cursor: u64,
}

impl RotationState {
    /// State before the first rotation
    pub fn initial(phase: u64) -> Self {
        Self { phase, cursor: 0 }
    }

    /// Unbounded position in the patch order for the next rotation
    #[inline]
    pub fn position(&self) -> u64 {
        self.cursor + self.phase
    }

    /// State after one more rotation
    pub fn advanced(self) -> Self {
        Self {
            phase: self.phase,
            cursor: self.cursor + 1,
        }
    }
}

/// Trait for PatchWarden storage backends
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Register a new challenge set; its ordinal is the registration order
    async fn register_challenge_set(&self, name: &str) -> Result<ChallengeSet>;

    /// Get a challenge set by ID
    async fn challenge_set(&self, cs: ChallengeSetId) -> Result<ChallengeSet>;

    /// Find a challenge set by name
    async fn find_challenge_set(&self, name: &str) -> Option<ChallengeSet>;

    /// All challenge sets, ordered by ordinal
    async fn challenge_sets(&self) -> Vec<ChallengeSet>;

    /// Add a variant; `patch_type == None` creates the baseline
    async fn add_variant(
        &self,
        cs: ChallengeSetId,
        name: &str,
        patch_type: Option<&str>,
        blob: Bytes,
    ) -> Result<Variant>;

    /// Variants of a challenge set in creation order
    async fn variants(&self, cs: ChallengeSetId) -> Result<Vec<Variant>>;

    /// Record a benchmark result; one per (challenge set, patch type, round)
    async fn record_performance_score(&self, score: PerformanceScore) -> Result<()>;

    /// Benchmark results for a patch type, ordered by round
    async fn performance_scores(
        &self,
        cs: ChallengeSetId,
        patch_type: &str,
    ) -> Result<Vec<PerformanceScore>>;

    /// Record what was fielded in a round; one per (challenge set, round)
    async fn record_fielding(&self, event: FieldingEvent) -> Result<()>;

    /// Attach late poll feedback to an existing fielding
    async fn attach_feedback(
        &self,
        cs: ChallengeSetId,
        round: Round,
        feedback: PollFeedback,
    ) -> Result<()>;

    /// Fielding history, ordered by round
    async fn fieldings(&self, cs: ChallengeSetId) -> Result<Vec<FieldingEvent>>;

    /// Cable ledger for a challenge set, ordered by creation
    async fn cables(&self, cs: ChallengeSetId) -> Result<Vec<SubmissionCable>>;

    /// Most recent cable for a challenge set
    async fn latest_cable(&self, cs: ChallengeSetId) -> Result<Option<SubmissionCable>>;

    /// Append a cable to the ledger
    async fn append_cable(&self, draft: CableDraft) -> Result<SubmissionCable>;

    /// Current rotation state, `None` before the first rotation
    async fn rotation_state(&self, cs: ChallengeSetId) -> Result<Option<RotationState>>;

    /// Append a rotation cable and advance the cursor in one step.
    ///
    /// Fails with `ConcurrentMutationConflict` and writes nothing when the
    /// stored cursor differs from `expected.cursor`, and with
    /// `DuplicateRotation` when the challenge set already rotated in the
    /// draft's round.
    async fn commit_rotation(
        &self,
        draft: CableDraft,
        expected: RotationState,
    ) -> Result<(SubmissionCable, RotationState)>;

    /// Cables not yet picked up by the transport, ordered by id
    async fn pending_cables(&self) -> Vec<SubmissionCable>;

    /// Mark a cable as sent
    async fn mark_processed(&self, id: CableId) -> Result<SubmissionCable>;
}
