//! In-memory storage implementation
//!
//! Each challenge set lives in its own DashMap entry; holding the entry's
//! write guard serializes every mutation of that challenge set, which is what
//! makes the cursor check and cable append in `commit_rotation` atomic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::mapref::one::{Ref, RefMut};
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use patchwarden_common::{
    CableDraft, CableId, CableOrigin, ChallengeSet, ChallengeSetId, DataError, FieldingEvent,
    PerformanceScore, PollFeedback, Result, Round, SubmissionCable, Variant, VariantId,
    WardenError,
};

use crate::snapshot::{ChallengeSetSnapshot, StoreSnapshot};
use crate::store::{RotationState, SubmissionStore};

/// Everything stored for one challenge set
#[derive(Debug, Clone)]
struct ChallengeSetRecord {
    challenge_set: ChallengeSet,
    variants: Vec<Variant>,
    scores: Vec<PerformanceScore>,
    /// Sorted by round
    fieldings: Vec<FieldingEvent>,
    /// Sorted by id
    cables: Vec<SubmissionCable>,
    rotation: Option<RotationState>,
}

impl ChallengeSetRecord {
    fn new(challenge_set: ChallengeSet) -> Self {
        Self {
            challenge_set,
            variants: Vec::new(),
            scores: Vec::new(),
            fieldings: Vec::new(),
            cables: Vec::new(),
            rotation: None,
        }
    }

    fn check_variants(&self, variants: &[VariantId]) -> Result<()> {
        let cs = self.challenge_set.id;
        for id in variants {
            if !self.variants.iter().any(|v| v.id == *id) {
                return Err(DataError::ForeignVariant { cs, variant: *id }.into());
            }
        }
        Ok(())
    }

    fn check_draft(&self, draft: &CableDraft) -> Result<()> {
        if draft.variants.is_empty() {
            return Err(DataError::EmptyCable.into());
        }
        self.check_variants(&draft.variants)
    }
}

/// Name index and id allocation for challenge sets
#[derive(Debug, Default)]
struct Registry {
    by_name: HashMap<String, ChallengeSetId>,
    next_id: u64,
}

/// In-memory storage implementation
///
/// Uses DashMap for concurrent access with per-challenge-set serialization.
pub struct InMemoryStore {
    records: DashMap<ChallengeSetId, ChallengeSetRecord>,
    registry: Mutex<Registry>,
    /// Owning challenge set of every cable
    cable_owner: DashMap<CableId, ChallengeSetId>,
    next_variant: AtomicU64,
    next_cable: AtomicU64,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            registry: Mutex::new(Registry::default()),
            cable_owner: DashMap::new(),
            next_variant: AtomicU64::new(1),
            next_cable: AtomicU64::new(1),
        }
    }

    fn record(&self, cs: ChallengeSetId) -> Result<Ref<'_, ChallengeSetId, ChallengeSetRecord>> {
        self.records
            .get(&cs)
            .ok_or_else(|| DataError::UnknownChallengeSet(cs.to_string()).into())
    }

    fn record_mut(
        &self,
        cs: ChallengeSetId,
    ) -> Result<RefMut<'_, ChallengeSetId, ChallengeSetRecord>> {
        self.records
            .get_mut(&cs)
            .ok_or_else(|| DataError::UnknownChallengeSet(cs.to_string()).into())
    }

    fn push_cable(&self, record: &mut ChallengeSetRecord, draft: CableDraft) -> SubmissionCable {
        let id = CableId(self.next_cable.fetch_add(1, Ordering::SeqCst));
        let cable = SubmissionCable::from_draft(id, draft);
        record.cables.push(cable.clone());
        self.cable_owner.insert(id, record.challenge_set.id);
        cable
    }

    /// Export the whole store for persistence
    pub fn snapshot(&self) -> StoreSnapshot {
        let mut challenge_sets: Vec<ChallengeSetSnapshot> = self
            .records
            .iter()
            .map(|r| ChallengeSetSnapshot {
                challenge_set: r.challenge_set.clone(),
                variants: r.variants.clone(),
                performance_scores: r.scores.clone(),
                fieldings: r.fieldings.clone(),
                cables: r.cables.clone(),
                rotation: r.rotation,
            })
            .collect();
        challenge_sets.sort_by_key(|s| s.challenge_set.ordinal);

        StoreSnapshot {
            version: crate::snapshot::SNAPSHOT_VERSION,
            challenge_sets,
        }
    }

    /// Rebuild a store from a snapshot
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        if snapshot.version != crate::snapshot::SNAPSHOT_VERSION {
            return Err(WardenError::Serialization(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }

        let store = Self::new();
        let mut max_variant = 0;
        let mut max_cable = 0;

        {
            let mut registry = store.registry.lock();
            for entry in snapshot.challenge_sets {
                let cs = entry.challenge_set.id;
                let name = entry.challenge_set.name.clone();
                if registry.by_name.insert(name.clone(), cs).is_some() {
                    return Err(DataError::DuplicateChallengeSet(name).into());
                }
                registry.next_id = registry.next_id.max(cs.0);

                max_variant = entry
                    .variants
                    .iter()
                    .map(|v| v.id.0)
                    .fold(max_variant, u64::max);
                for cable in &entry.cables {
                    max_cable = max_cable.max(cable.id.0);
                    store.cable_owner.insert(cable.id, cs);
                }

                let mut record = ChallengeSetRecord::new(entry.challenge_set);
                record.variants = entry.variants;
                record.scores = entry.performance_scores;
                record.fieldings = entry.fieldings;
                record.fieldings.sort_by_key(|f| f.round);
                record.cables = entry.cables;
                record.cables.sort_by_key(|c| c.id);
                record.rotation = entry.rotation;
                store.records.insert(cs, record);
            }
        }

        store.next_variant.store(max_variant + 1, Ordering::SeqCst);
        store.next_cable.store(max_cable + 1, Ordering::SeqCst);

        info!(
            challenge_sets = store.records.len(),
            "Restored store from snapshot"
        );
        Ok(store)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmissionStore for InMemoryStore {
    #[instrument(skip(self))]
    async fn register_challenge_set(&self, name: &str) -> Result<ChallengeSet> {
        let mut registry = self.registry.lock();
        if registry.by_name.contains_key(name) {
            return Err(DataError::DuplicateChallengeSet(name.to_string()).into());
        }

        let ordinal = registry.by_name.len() as u64;
        registry.next_id += 1;
        let id = ChallengeSetId(registry.next_id);
        registry.by_name.insert(name.to_string(), id);

        let challenge_set = ChallengeSet::new(id, name, ordinal);
        self.records
            .insert(id, ChallengeSetRecord::new(challenge_set.clone()));

        debug!(cs = %id, ordinal, "Challenge set registered");
        Ok(challenge_set)
    }

    async fn challenge_set(&self, cs: ChallengeSetId) -> Result<ChallengeSet> {
        Ok(self.record(cs)?.challenge_set.clone())
    }

    async fn find_challenge_set(&self, name: &str) -> Option<ChallengeSet> {
        let id = *self.registry.lock().by_name.get(name)?;
        self.records.get(&id).map(|r| r.challenge_set.clone())
    }

    async fn challenge_sets(&self) -> Vec<ChallengeSet> {
        let mut all: Vec<ChallengeSet> = self
            .records
            .iter()
            .map(|r| r.challenge_set.clone())
            .collect();
        all.sort_by_key(|cs| cs.ordinal);
        all
    }

    #[instrument(skip(self, blob), fields(blob_len = blob.len()))]
    async fn add_variant(
        &self,
        cs: ChallengeSetId,
        name: &str,
        patch_type: Option<&str>,
        blob: Bytes,
    ) -> Result<Variant> {
        let mut record = self.record_mut(cs)?;

        if patch_type.is_none() {
            if record.variants.iter().any(Variant::is_baseline) {
                return Err(DataError::DuplicateBaseline(cs).into());
            }
            if !record.variants.is_empty() {
                return Err(DataError::BaselineAfterPatch(cs).into());
            }
        }

        let variant = Variant {
            id: VariantId(self.next_variant.fetch_add(1, Ordering::SeqCst)),
            cs,
            name: name.to_string(),
            patch_type: patch_type.map(str::to_string),
            blob,
        };
        record.variants.push(variant.clone());

        debug!(variant = %variant.id, "Variant added");
        Ok(variant)
    }

    async fn variants(&self, cs: ChallengeSetId) -> Result<Vec<Variant>> {
        Ok(self.record(cs)?.variants.clone())
    }

    #[instrument(skip(self, score), fields(cs = %score.cs, patch_type = %score.patch_type, round = score.round))]
    async fn record_performance_score(&self, score: PerformanceScore) -> Result<()> {
        let mut record = self.record_mut(score.cs)?;

        if record
            .scores
            .iter()
            .any(|s| s.patch_type == score.patch_type && s.round == score.round)
        {
            return Err(DataError::DuplicatePerformanceScore {
                cs: score.cs,
                patch_type: score.patch_type,
                round: score.round,
            }
            .into());
        }

        let at = record.scores.partition_point(|s| s.round <= score.round);
        record.scores.insert(at, score);
        debug!("Performance score recorded");
        Ok(())
    }

    async fn performance_scores(
        &self,
        cs: ChallengeSetId,
        patch_type: &str,
    ) -> Result<Vec<PerformanceScore>> {
        Ok(self
            .record(cs)?
            .scores
            .iter()
            .filter(|s| s.patch_type == patch_type)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, event), fields(cs = %event.cs, round = event.round))]
    async fn record_fielding(&self, event: FieldingEvent) -> Result<()> {
        let mut record = self.record_mut(event.cs)?;

        if record.fieldings.iter().any(|f| f.round == event.round) {
            return Err(DataError::DuplicateFielding {
                cs: event.cs,
                round: event.round,
            }
            .into());
        }
        record.check_variants(&event.variants)?;

        let at = record.fieldings.partition_point(|f| f.round < event.round);
        record.fieldings.insert(at, event);
        debug!("Fielding recorded");
        Ok(())
    }

    #[instrument(skip(self, feedback))]
    async fn attach_feedback(
        &self,
        cs: ChallengeSetId,
        round: Round,
        feedback: PollFeedback,
    ) -> Result<()> {
        let mut record = self.record_mut(cs)?;
        let fielding = record
            .fieldings
            .iter_mut()
            .find(|f| f.round == round)
            .ok_or(DataError::MissingFielding { cs, round })?;

        if fielding.feedback.is_some() {
            warn!("Rejecting second poll feedback for the same fielding");
            return Err(DataError::FeedbackAlreadyAttached { cs, round }.into());
        }
        fielding.feedback = Some(feedback);
        debug!("Poll feedback attached");
        Ok(())
    }

    async fn fieldings(&self, cs: ChallengeSetId) -> Result<Vec<FieldingEvent>> {
        Ok(self.record(cs)?.fieldings.clone())
    }

    async fn cables(&self, cs: ChallengeSetId) -> Result<Vec<SubmissionCable>> {
        Ok(self.record(cs)?.cables.clone())
    }

    async fn latest_cable(&self, cs: ChallengeSetId) -> Result<Option<SubmissionCable>> {
        Ok(self.record(cs)?.cables.last().cloned())
    }

    #[instrument(skip(self, draft), fields(cs = %draft.cs, origin = ?draft.origin))]
    async fn append_cable(&self, draft: CableDraft) -> Result<SubmissionCable> {
        let mut record = self.record_mut(draft.cs)?;
        record.check_draft(&draft)?;

        let cable = self.push_cable(&mut record, draft);
        debug!(cable = %cable.id, "Cable appended");
        Ok(cable)
    }

    async fn rotation_state(&self, cs: ChallengeSetId) -> Result<Option<RotationState>> {
        Ok(self.record(cs)?.rotation)
    }

    #[instrument(skip(self, draft), fields(cs = %draft.cs, expected = expected.cursor))]
    async fn commit_rotation(
        &self,
        draft: CableDraft,
        expected: RotationState,
    ) -> Result<(SubmissionCable, RotationState)> {
        let cs = draft.cs;
        let mut record = self.record_mut(cs)?;

        let actual = record.rotation.map(|s| s.cursor).unwrap_or(0);
        if actual != expected.cursor {
            return Err(WardenError::ConcurrentMutationConflict {
                cs,
                expected: expected.cursor,
                actual,
            });
        }
        record.check_draft(&draft)?;
        if record
            .cables
            .iter()
            .any(|c| c.origin == CableOrigin::Rotation && c.round == draft.round)
        {
            return Err(DataError::DuplicateRotation {
                cs,
                round: draft.round,
            }
            .into());
        }

        // The phase is fixed by the first commit
        let state = record.rotation.unwrap_or(expected).advanced();
        let cable = self.push_cable(&mut record, draft);
        record.rotation = Some(state);

        debug!(cable = %cable.id, cursor = state.cursor, "Rotation committed");
        Ok((cable, state))
    }

    async fn pending_cables(&self) -> Vec<SubmissionCable> {
        let mut pending: Vec<SubmissionCable> = self
            .records
            .iter()
            .flat_map(|r| {
                r.cables
                    .iter()
                    .filter(|c| !c.is_processed())
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        pending.sort_by_key(|c| c.id);
        pending
    }

    #[instrument(skip(self))]
    async fn mark_processed(&self, id: CableId) -> Result<SubmissionCable> {
        let cs = *self
            .cable_owner
            .get(&id)
            .ok_or(DataError::UnknownCable(id.0))?;
        let mut record = self.record_mut(cs)?;
        let cable = record
            .cables
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(DataError::UnknownCable(id.0))?;

        if cable.processed_at.is_none() {
            cable.processed_at = Some(chrono::Utc::now().timestamp_millis());
        }
        Ok(cable.clone())
    }
}

/// Statistics about the store
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub challenge_sets: usize,
    pub variants: usize,
    pub fieldings: usize,
    pub cables: usize,
    pub pending_cables: usize,
}

impl InMemoryStore {
    /// Get statistics about the store
    pub fn stats(&self) -> StoreStats {
        let mut stats = StoreStats {
            challenge_sets: self.records.len(),
            variants: 0,
            fieldings: 0,
            cables: 0,
            pending_cables: 0,
        };
        for r in self.records.iter() {
            stats.variants += r.variants.len();
            stats.fieldings += r.fieldings.len();
            stats.cables += r.cables.len();
            stats.pending_cables += r.cables.iter().filter(|c| !c.is_processed()).count();
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchwarden_common::{CableOrigin, Measurement};

    async fn seeded() -> (InMemoryStore, ChallengeSet, Variant, Variant) {
        let store = InMemoryStore::new();
        let cs = store.register_challenge_set("x").await.unwrap();
        let base = store
            .add_variant(cs.id, "unpatched", None, Bytes::from_static(b"XXXX"))
            .await
            .unwrap();
        let patch = store
            .add_variant(cs.id, "patch1", Some("a_patch"), Bytes::from_static(b"XXXYZ"))
            .await
            .unwrap();
        (store, cs, base, patch)
    }

    #[tokio::test]
    async fn test_register_assigns_ordinals() {
        let store = InMemoryStore::new();
        let a = store.register_challenge_set("a").await.unwrap();
        let b = store.register_challenge_set("b").await.unwrap();
        assert_eq!(a.ordinal, 0);
        assert_eq!(b.ordinal, 1);
        assert!(store.register_challenge_set("a").await.is_err());

        let names: Vec<String> = store
            .challenge_sets()
            .await
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(store.find_challenge_set("b").await.unwrap().id, b.id);
    }

    #[tokio::test]
    async fn test_baseline_rules() {
        let (store, cs, _, _) = seeded().await;
        let err = store
            .add_variant(cs.id, "again", None, Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, WardenError::Data(DataError::DuplicateBaseline(_))));

        let other = store.register_challenge_set("y").await.unwrap();
        store
            .add_variant(other.id, "p", Some("a_patch"), Bytes::new())
            .await
            .unwrap();
        let err = store
            .add_variant(other.id, "late_base", None, Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, WardenError::Data(DataError::BaselineAfterPatch(_))));
    }

    #[tokio::test]
    async fn test_variant_ids_follow_creation_order() {
        let (store, cs, base, patch) = seeded().await;
        assert!(base.id < patch.id);
        let ids: Vec<VariantId> = store
            .variants(cs.id)
            .await
            .unwrap()
            .iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, vec![base.id, patch.id]);
    }

    #[tokio::test]
    async fn test_duplicate_score_rejected() {
        let (store, cs, _, _) = seeded().await;
        let score = PerformanceScore::new(
            cs.id,
            "a_patch",
            0,
            Measurement::uniform(1.0),
            Measurement::uniform(1.1),
        );
        store.record_performance_score(score.clone()).await.unwrap();
        assert!(store.record_performance_score(score).await.is_err());
        assert_eq!(store.performance_scores(cs.id, "a_patch").await.unwrap().len(), 1);
        assert!(store.performance_scores(cs.id, "b_patch").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fieldings_sorted_and_unique_per_round() {
        let (store, cs, base, patch) = seeded().await;
        store
            .record_fielding(FieldingEvent::new(cs.id, vec![patch.id], "home", 3))
            .await
            .unwrap();
        store
            .record_fielding(FieldingEvent::new(cs.id, vec![base.id], "home", 1))
            .await
            .unwrap();
        let err = store
            .record_fielding(FieldingEvent::new(cs.id, vec![base.id], "home", 3))
            .await
            .unwrap_err();
        assert!(matches!(err, WardenError::Data(DataError::DuplicateFielding { .. })));

        let rounds: Vec<Round> = store
            .fieldings(cs.id)
            .await
            .unwrap()
            .iter()
            .map(|f| f.round)
            .collect();
        assert_eq!(rounds, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_fielding_rejects_foreign_variant() {
        let (store, cs, _, _) = seeded().await;
        let other = store.register_challenge_set("y").await.unwrap();
        let foreign = store
            .add_variant(other.id, "unpatched", None, Bytes::new())
            .await
            .unwrap();
        let err = store
            .record_fielding(FieldingEvent::new(cs.id, vec![foreign.id], "home", 0))
            .await
            .unwrap_err();
        assert!(matches!(err, WardenError::Data(DataError::ForeignVariant { .. })));
    }

    #[tokio::test]
    async fn test_attach_feedback() {
        let (store, cs, _, patch) = seeded().await;
        store
            .record_fielding(FieldingEvent::new(cs.id, vec![patch.id], "home", 1))
            .await
            .unwrap();
        store
            .attach_feedback(cs.id, 1, PollFeedback::with_success(0.5))
            .await
            .unwrap();
        let fieldings = store.fieldings(cs.id).await.unwrap();
        assert_eq!(fieldings[0].feedback.unwrap().success, 0.5);

        assert!(store
            .attach_feedback(cs.id, 9, PollFeedback::with_success(1.0))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_attached_feedback_is_final() {
        let (store, cs, _, patch) = seeded().await;
        store
            .record_fielding(
                FieldingEvent::new(cs.id, vec![patch.id], "home", 1)
                    .with_feedback(PollFeedback::with_success(0.0)),
            )
            .await
            .unwrap();

        let err = store
            .attach_feedback(cs.id, 1, PollFeedback::with_success(1.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WardenError::Data(DataError::FeedbackAlreadyAttached { round: 1, .. })
        ));
        let fieldings = store.fieldings(cs.id).await.unwrap();
        assert_eq!(fieldings[0].feedback.unwrap().success, 0.0);
    }

    #[tokio::test]
    async fn test_commit_rotation_checks_cursor() {
        let (store, cs, _, patch) = seeded().await;
        let draft = |round| CableDraft::new(cs.id, round, vec![patch.id], CableOrigin::Rotation);

        let (_, state) = store
            .commit_rotation(draft(0), RotationState::initial(2))
            .await
            .unwrap();
        assert_eq!(state, RotationState { phase: 2, cursor: 1 });

        // Stale writer still believes the cursor is 0
        let err = store
            .commit_rotation(draft(1), RotationState::initial(2))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WardenError::ConcurrentMutationConflict { expected: 0, actual: 1, .. }
        ));
        assert_eq!(store.cables(cs.id).await.unwrap().len(), 1);

        // Phase stays fixed even if a caller passes a different one
        let (_, state) = store
            .commit_rotation(draft(1), RotationState { phase: 9, cursor: 1 })
            .await
            .unwrap();
        assert_eq!(state, RotationState { phase: 2, cursor: 2 });
    }

    #[tokio::test]
    async fn test_one_rotation_per_round() {
        let (store, cs, _, patch) = seeded().await;
        let draft = CableDraft::new(cs.id, 5, vec![patch.id], CableOrigin::Rotation);
        let (_, state) = store
            .commit_rotation(draft.clone(), RotationState::initial(0))
            .await
            .unwrap();

        let err = store.commit_rotation(draft, state).await.unwrap_err();
        assert!(matches!(
            err,
            WardenError::Data(DataError::DuplicateRotation { round: 5, .. })
        ));
        assert_eq!(store.cables(cs.id).await.unwrap().len(), 1);
        assert_eq!(store.rotation_state(cs.id).await.unwrap(), Some(state));

        // A decision in the same round is still allowed
        store
            .append_cable(CableDraft::new(cs.id, 5, vec![patch.id], CableOrigin::Decision))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_cable_rejected() {
        let (store, cs, _, _) = seeded().await;
        let err = store
            .append_cable(CableDraft::new(cs.id, 0, vec![], CableOrigin::Decision))
            .await
            .unwrap_err();
        assert!(matches!(err, WardenError::Data(DataError::EmptyCable)));
    }

    #[tokio::test]
    async fn test_pending_and_processed() {
        let (store, cs, base, patch) = seeded().await;
        let first = store
            .append_cable(CableDraft::new(cs.id, 0, vec![base.id], CableOrigin::Revert))
            .await
            .unwrap();
        let second = store
            .append_cable(CableDraft::new(cs.id, 1, vec![patch.id], CableOrigin::Decision))
            .await
            .unwrap();
        assert_eq!(store.pending_cables().await.len(), 2);

        let marked = store.mark_processed(first.id).await.unwrap();
        assert!(marked.is_processed());
        let pending = store.pending_cables().await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, second.id);
        assert_eq!(store.latest_cable(cs.id).await.unwrap().unwrap().id, second.id);

        assert!(store.mark_processed(CableId(999)).await.is_err());
        assert_eq!(store.stats().pending_cables, 1);
    }

    #[tokio::test]
    async fn test_snapshot_restores_ids_and_state() {
        let (store, cs, _, patch) = seeded().await;
        store
            .commit_rotation(
                CableDraft::new(cs.id, 0, vec![patch.id], CableOrigin::Rotation),
                RotationState::initial(0),
            )
            .await
            .unwrap();

        let restored = InMemoryStore::from_snapshot(store.snapshot()).unwrap();
        assert_eq!(
            restored.rotation_state(cs.id).await.unwrap(),
            Some(RotationState { phase: 0, cursor: 1 })
        );

        let v = restored
            .add_variant(cs.id, "patch2", Some("b_patch"), Bytes::new())
            .await
            .unwrap();
        assert!(v.id > patch.id);

        let next = restored.register_challenge_set("z").await.unwrap();
        assert_eq!(next.ordinal, 1);
        assert!(next.id > cs.id);
    }
}
