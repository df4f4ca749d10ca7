//! Per-round driver
//!
//! For every challenge set: evaluate; record the decision if it changes what
//! is fielded; rotate when there is nothing to decide yet. A challenge set
//! rotates at most once per round, so re-running a round is harmless. A
//! failure on one challenge set is reported and does not stop the others.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use patchwarden_common::{CableDraft, CableOrigin, ChallengeSetId, Result, Round, SubmissionCable};
use patchwarden_selection::{PatchEvaluator, RotationOutcome, RotationScheduler};
use patchwarden_store::SubmissionStore;

/// What happened to one challenge set in a round
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// A decision cable was appended
    Submitted(SubmissionCable),
    /// The decision matches the latest cable; nothing written
    Unchanged,
    /// Nothing to decide, so the scheduler ran
    Rotated(RotationOutcome),
    /// Nothing to decide, but a rotation was already committed this round
    AlreadyRotated,
}

/// Summary of one round
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundReport {
    pub round: Round,
    pub decisions: usize,
    pub reverts: usize,
    pub unchanged: usize,
    pub rotations: usize,
    pub already_rotated: usize,
    pub catalog_mismatches: usize,
    pub failures: Vec<(ChallengeSetId, String)>,
}

impl RoundReport {
    fn record(&mut self, outcome: &StepOutcome) {
        match outcome {
            StepOutcome::Submitted(cable) if cable.origin == CableOrigin::Revert => self.reverts += 1,
            StepOutcome::Submitted(_) => self.decisions += 1,
            StepOutcome::Unchanged => self.unchanged += 1,
            StepOutcome::Rotated(RotationOutcome::Rotated { .. }) => self.rotations += 1,
            StepOutcome::Rotated(RotationOutcome::CatalogMismatch) => self.catalog_mismatches += 1,
            StepOutcome::AlreadyRotated => self.already_rotated += 1,
        }
    }
}

pub struct RoundDriver {
    store: Arc<dyn SubmissionStore>,
    evaluator: PatchEvaluator,
    scheduler: RotationScheduler,
}

impl RoundDriver {
    pub fn new(
        store: Arc<dyn SubmissionStore>,
        evaluator: PatchEvaluator,
        scheduler: RotationScheduler,
    ) -> Self {
        Self {
            store,
            evaluator,
            scheduler,
        }
    }

    /// Drive every known challenge set once
    #[instrument(skip(self))]
    pub async fn run_round(&self, round: Round) -> RoundReport {
        let mut report = RoundReport {
            round,
            ..RoundReport::default()
        };

        for challenge_set in self.store.challenge_sets().await {
            match self.step(challenge_set.id, round).await {
                Ok(outcome) => report.record(&outcome),
                Err(err) => {
                    warn!(cs = %challenge_set, error = %err, "Challenge set step failed");
                    report.failures.push((challenge_set.id, err.to_string()));
                }
            }
        }

        info!(
            decisions = report.decisions,
            reverts = report.reverts,
            unchanged = report.unchanged,
            rotations = report.rotations,
            already_rotated = report.already_rotated,
            catalog_mismatches = report.catalog_mismatches,
            failures = report.failures.len(),
            "Round complete"
        );
        report
    }

    /// Evaluate one challenge set, falling back to rotation
    pub async fn step(&self, cs: ChallengeSetId, round: Round) -> Result<StepOutcome> {
        let decision = self.evaluator.decide(cs).await?;

        let (Some(variants), Some(origin)) = (decision.variant_ids(), decision.cable_origin()) else {
            if self.rotated_in(cs, round).await? {
                debug!(cs = %cs, round, "Already rotated this round");
                return Ok(StepOutcome::AlreadyRotated);
            }
            let outcome = self.scheduler.rotate(cs, round).await?;
            return Ok(StepOutcome::Rotated(outcome));
        };

        if let Some(latest) = self.store.latest_cable(cs).await? {
            if latest.fields(&variants) {
                return Ok(StepOutcome::Unchanged);
            }
        }

        let cable = self
            .store
            .append_cable(CableDraft::new(cs, round, variants, origin))
            .await?;
        Ok(StepOutcome::Submitted(cable))
    }

    async fn rotated_in(&self, cs: ChallengeSetId, round: Round) -> Result<bool> {
        Ok(self
            .store
            .cables(cs)
            .await?
            .iter()
            .any(|c| c.origin == CableOrigin::Rotation && c.round == round))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use patchwarden_common::{
        FieldingEvent, Measurement, PatchCatalog, PatchType, PerformanceScore, PollFeedback,
    };
    use patchwarden_selection::SelectionConfig;
    use patchwarden_store::InMemoryStore;

    fn driver(store: &Arc<InMemoryStore>) -> RoundDriver {
        let catalog = Arc::new(
            PatchCatalog::in_listed_order(vec![
                PatchType::new("a_patch", 0.0, 0.0),
                PatchType::new("b_patch", 0.2, 0.1),
            ])
            .unwrap(),
        );
        RoundDriver::new(
            store.clone(),
            PatchEvaluator::new(store.clone(), catalog.clone(), &SelectionConfig::default()),
            RotationScheduler::new(store.clone(), catalog),
        )
    }

    #[tokio::test]
    async fn test_round_rotates_then_decides() {
        let store = Arc::new(InMemoryStore::new());
        let driver = driver(&store);

        let cs = store.register_challenge_set("x").await.unwrap().id;
        let base = store.add_variant(cs, "unpatched", None, Bytes::new()).await.unwrap();
        let a = store
            .add_variant(cs, "patch_a", Some("a_patch"), Bytes::new())
            .await
            .unwrap();
        store
            .add_variant(cs, "patch_b", Some("b_patch"), Bytes::new())
            .await
            .unwrap();

        // No evidence: rotate
        let report = driver.run_round(0).await;
        assert_eq!(report.rotations, 1);
        let first = store.latest_cable(cs).await.unwrap().unwrap();
        assert_eq!(first.origin, CableOrigin::Rotation);
        assert_eq!(first.variants, vec![a.id]);

        // Benchmark arrives: decide, then stay put
        store
            .record_performance_score(PerformanceScore::new(
                cs,
                "a_patch",
                0,
                Measurement::uniform(1.0),
                Measurement::uniform(1.1),
            ))
            .await
            .unwrap();
        assert_eq!(driver.step(cs, 0).await.unwrap(), StepOutcome::Unchanged);

        // Regression forces a revert cable
        store
            .record_fielding(
                FieldingEvent::new(cs, vec![a.id], "home", 1)
                    .with_feedback(PollFeedback::with_success(0.0)),
            )
            .await
            .unwrap();
        let report = driver.run_round(1).await;
        assert_eq!(report.reverts, 1);
        let latest = store.latest_cable(cs).await.unwrap().unwrap();
        assert_eq!(latest.origin, CableOrigin::Revert);
        assert_eq!(latest.variants, vec![base.id]);

        // Nothing new: the revert is not repeated
        let report = driver.run_round(2).await;
        assert_eq!(report.unchanged, 1);
        assert_eq!(store.cables(cs).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_mismatch_does_not_stop_round() {
        let store = Arc::new(InMemoryStore::new());
        let driver = driver(&store);

        let broken = store.register_challenge_set("broken").await.unwrap().id;
        store
            .add_variant(broken, "odd", Some("unknown_patch"), Bytes::new())
            .await
            .unwrap();
        let healthy = store.register_challenge_set("healthy").await.unwrap().id;
        store
            .add_variant(healthy, "patch_b", Some("b_patch"), Bytes::new())
            .await
            .unwrap();

        let report = driver.run_round(0).await;
        assert_eq!(report.catalog_mismatches, 1);
        assert_eq!(report.rotations, 1);
        assert!(report.failures.is_empty());
        assert!(store.latest_cable(broken).await.unwrap().is_none());
        assert!(store.latest_cable(healthy).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rerun_round_rotates_once() {
        let store = Arc::new(InMemoryStore::new());
        let driver = driver(&store);

        let cs = store.register_challenge_set("x").await.unwrap().id;
        store
            .add_variant(cs, "patch_a", Some("a_patch"), Bytes::new())
            .await
            .unwrap();
        store
            .add_variant(cs, "patch_b", Some("b_patch"), Bytes::new())
            .await
            .unwrap();

        let first = driver.run_round(5).await;
        assert_eq!(first.rotations, 1);
        let again = driver.run_round(5).await;
        assert_eq!(again.rotations, 0);
        assert_eq!(again.already_rotated, 1);
        assert!(again.failures.is_empty());

        let in_round: Vec<_> = store
            .cables(cs)
            .await
            .unwrap()
            .into_iter()
            .filter(|c| c.origin == CableOrigin::Rotation && c.round == 5)
            .collect();
        assert_eq!(in_round.len(), 1);
        assert_eq!(store.rotation_state(cs).await.unwrap().unwrap().cursor, 1);

        // Next round rotates again
        assert_eq!(driver.run_round(6).await.rotations, 1);
        assert_eq!(store.rotation_state(cs).await.unwrap().unwrap().cursor, 2);
    }
}
