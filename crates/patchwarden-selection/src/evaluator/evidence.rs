//! Evidence aggregation for one challenge set
//!
//! Collects, per patch candidate, the static attributes of its patch type, its
//! latest benchmark, and the poll feedback of every round it was fielded.

use tracing::warn;

use patchwarden_common::{
    ChallengeSetId, PatchCatalog, PatchType, PerformanceScore, PollFeedback, Result, Round,
    Variant,
};
use patchwarden_store::SubmissionStore;

/// Everything the evaluator knows about one evaluable candidate
#[derive(Debug, Clone)]
pub struct CandidateEvidence {
    pub variant: Variant,
    /// Catalog attributes; unknown patch types get worst-case attributes
    pub patch_type: PatchType,
    /// Most recent benchmark
    pub latest_score: PerformanceScore,
    /// Feedback from every round the candidate was fielded, ordered by round
    pub feedback: Vec<(Round, PollFeedback)>,
}

/// Evidence for a whole challenge set
#[derive(Debug, Clone, Default)]
pub struct EvidenceView {
    pub baseline: Option<Variant>,
    /// Evaluable candidates in creation order
    pub candidates: Vec<CandidateEvidence>,
    /// Patch candidates without any benchmark yet
    pub unscored: Vec<Variant>,
}

impl EvidenceView {
    /// Read all evidence for a challenge set from the store
    pub async fn gather(
        store: &dyn SubmissionStore,
        catalog: &PatchCatalog,
        cs: ChallengeSetId,
    ) -> Result<Self> {
        let variants = store.variants(cs).await?;
        let fieldings = store.fieldings(cs).await?;

        let mut view = EvidenceView::default();
        for variant in variants {
            let Some(name) = variant.patch_type.clone() else {
                view.baseline = Some(variant);
                continue;
            };

            let scores = store.performance_scores(cs, &name).await?;
            let Some(latest_score) = scores.last().cloned() else {
                view.unscored.push(variant);
                continue;
            };

            let patch_type = match catalog.get(&name) {
                Some(pt) => pt.clone(),
                None => {
                    warn!(cs = %cs, patch_type = %name, "Patch type not in catalog, assuming worst-case risk");
                    PatchType::new(name, 1.0, 1.0)
                }
            };

            let feedback = fieldings
                .iter()
                .filter(|f| f.fielded(variant.id))
                .filter_map(|f| f.feedback.map(|pf| (f.round, pf)))
                .collect();

            view.candidates.push(CandidateEvidence {
                variant,
                patch_type,
                latest_score,
                feedback,
            });
        }

        Ok(view)
    }

    /// No candidate has a benchmark yet
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use patchwarden_common::{FieldingEvent, Measurement};
    use patchwarden_store::InMemoryStore;

    #[tokio::test]
    async fn test_gather_splits_candidates() {
        let store = InMemoryStore::new();
        let catalog = PatchCatalog::in_listed_order(vec![
            PatchType::new("a_patch", 0.1, 0.2),
            PatchType::new("b_patch", 0.3, 0.4),
        ])
        .unwrap();
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

        for round in [0, 2] {
            store
                .record_performance_score(PerformanceScore::new(
                    cs,
                    "a_patch",
                    round,
                    Measurement::uniform(1.0),
                    Measurement::uniform(1.0 + round as f64 / 10.0),
                ))
                .await
                .unwrap();
        }
        store
            .record_fielding(
                FieldingEvent::new(cs, vec![a.id], "home", 1)
                    .with_feedback(PollFeedback::with_success(1.0)),
            )
            .await
            .unwrap();
        // Feedback not in yet
        store
            .record_fielding(FieldingEvent::new(cs, vec![a.id], "home", 2))
            .await
            .unwrap();

        let view = EvidenceView::gather(&store, &catalog, cs).await.unwrap();
        assert_eq!(view.baseline.unwrap().id, base.id);
        assert_eq!(view.unscored.len(), 1);
        assert_eq!(view.candidates.len(), 1);

        let candidate = &view.candidates[0];
        assert_eq!(candidate.variant.id, a.id);
        assert_eq!(candidate.latest_score.round, 2);
        assert_eq!(candidate.feedback.len(), 1);
        assert_eq!(candidate.patch_type.functionality_risk, 0.1);
    }

    #[tokio::test]
    async fn test_unknown_patch_type_gets_worst_case() {
        let store = InMemoryStore::new();
        let catalog = PatchCatalog::default();
        let cs = store.register_challenge_set("x").await.unwrap().id;
        store
            .add_variant(cs, "mystery", Some("not_in_catalog"), Bytes::new())
            .await
            .unwrap();
        store
            .record_performance_score(PerformanceScore::new(
                cs,
                "not_in_catalog",
                0,
                Measurement::uniform(1.0),
                Measurement::uniform(1.0),
            ))
            .await
            .unwrap();

        let view = EvidenceView::gather(&store, &catalog, cs).await.unwrap();
        assert!(view.baseline.is_none());
        assert_eq!(view.candidates[0].patch_type.exploitability, 1.0);
    }
}
