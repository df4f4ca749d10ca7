//! Patch evaluator service

use std::sync::Arc;

use ordered_float::OrderedFloat;
use tracing::{debug, info, instrument, warn};

use patchwarden_common::{
    CableOrigin, ChallengeSetId, PatchCatalog, Result, Variant, VariantId,
};
use patchwarden_store::SubmissionStore;

use super::disqualification::{Disqualification, DisqualificationPolicy};
use super::evidence::EvidenceView;
use super::ranking::{CompositeCost, RankingPolicy};
use crate::metrics::SelectionMetrics;
use crate::SelectionConfig;

/// Outcome of evaluating one challenge set
#[derive(Debug, Clone, PartialEq)]
pub enum PatchDecision {
    /// Nothing evaluable yet; leave the current fielding alone
    Undecided,
    /// Field the cheapest surviving candidate
    Patch { variant: Variant, cost: f64 },
    /// Every evaluable candidate is disqualified; field the baseline
    Revert {
        baseline: Variant,
        disqualified: Vec<(VariantId, Disqualification)>,
    },
}

impl PatchDecision {
    /// Variants to field, `None` when undecided
    pub fn variants(&self) -> Option<Vec<Variant>> {
        match self {
            Self::Undecided => None,
            Self::Patch { variant, .. } => Some(vec![variant.clone()]),
            Self::Revert { baseline, .. } => Some(vec![baseline.clone()]),
        }
    }

    pub fn variant_ids(&self) -> Option<Vec<VariantId>> {
        self.variants()
            .map(|vs| vs.into_iter().map(|v| v.id).collect())
    }

    /// Ledger origin for recording this decision
    pub fn cable_origin(&self) -> Option<CableOrigin> {
        match self {
            Self::Undecided => None,
            Self::Patch { .. } => Some(CableOrigin::Decision),
            Self::Revert { .. } => Some(CableOrigin::Revert),
        }
    }

    #[inline]
    pub fn is_undecided(&self) -> bool {
        matches!(self, Self::Undecided)
    }
}

/// Chooses between the baseline and scored patch candidates
pub struct PatchEvaluator {
    store: Arc<dyn SubmissionStore>,
    catalog: Arc<PatchCatalog>,
    disqualification: DisqualificationPolicy,
    ranking: Box<dyn RankingPolicy>,
    metrics: Option<Arc<SelectionMetrics>>,
}

impl PatchEvaluator {
    /// Create an evaluator using `CompositeCost` weighted by `config`
    pub fn new(
        store: Arc<dyn SubmissionStore>,
        catalog: Arc<PatchCatalog>,
        config: &SelectionConfig,
    ) -> Self {
        Self {
            store,
            catalog,
            disqualification: DisqualificationPolicy::new(
                config.success_floor,
                config.revert_overhead,
            ),
            ranking: Box::new(CompositeCost::new(
                config.risk_weight,
                config.exploitability_weight,
                config.overhead_weight,
            )),
            metrics: None,
        }
    }

    /// Replace the ranking policy
    pub fn with_ranking(mut self, ranking: Box<dyn RankingPolicy>) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<SelectionMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Decide what to field for a challenge set. Reads only.
    #[instrument(skip(self))]
    pub async fn decide(&self, cs: ChallengeSetId) -> Result<PatchDecision> {
        let view = EvidenceView::gather(self.store.as_ref(), &self.catalog, cs).await?;
        let decision = self.evaluate(&view);

        match &decision {
            PatchDecision::Undecided => {
                debug!(unscored = view.unscored.len(), "No evaluable patch");
                if let Some(m) = &self.metrics {
                    m.undecided.inc();
                }
            }
            PatchDecision::Patch { variant, cost } => {
                info!(variant = %variant.name, cost, "Patch selected");
                if let Some(m) = &self.metrics {
                    m.patches_chosen.inc();
                }
            }
            PatchDecision::Revert {
                baseline,
                disqualified,
            } => {
                info!(
                    baseline = %baseline.name,
                    disqualified = disqualified.len(),
                    "All patches disqualified, reverting"
                );
                if let Some(m) = &self.metrics {
                    m.reverts.inc();
                }
            }
        }

        Ok(decision)
    }

    /// Pure decision over already-gathered evidence
    pub fn evaluate(&self, view: &EvidenceView) -> PatchDecision {
        if view.is_empty() {
            return PatchDecision::Undecided;
        }

        let mut disqualified = Vec::new();
        let mut survivors = Vec::with_capacity(view.candidates.len());
        for candidate in &view.candidates {
            let history = candidate.feedback.iter().map(|(round, pf)| (*round, pf));
            match self.disqualification.first_disqualifying(history) {
                Some(reason) => {
                    debug!(variant = %candidate.variant.name, ?reason, "Candidate disqualified");
                    disqualified.push((candidate.variant.id, reason));
                }
                None => survivors.push(candidate),
            }
        }

        // Candidates are in creation order and min_by_key keeps the first minimum
        let best = survivors
            .into_iter()
            .map(|c| (c, self.ranking.cost(c)))
            .min_by_key(|(_, cost)| OrderedFloat(*cost));

        match (best, &view.baseline) {
            (Some((candidate, cost)), _) => PatchDecision::Patch {
                variant: candidate.variant.clone(),
                cost,
            },
            (None, Some(baseline)) => PatchDecision::Revert {
                baseline: baseline.clone(),
                disqualified,
            },
            (None, None) => {
                warn!("Every patch is disqualified and there is no baseline to revert to");
                PatchDecision::Undecided
            }
        }
    }
}
