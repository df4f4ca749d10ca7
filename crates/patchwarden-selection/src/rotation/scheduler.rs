//! Staggered round-robin over the global patch order
//!
//! Each challenge set walks the same cyclic order, starting at a phase equal
//! to its ordinal, so a population of challenge sets fields different patch
//! types in the same round. The cursor is persisted and advanced together
//! with the cable append.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use patchwarden_common::{
    CableDraft, CableOrigin, ChallengeSet, ChallengeSetId, PatchCatalog, Result, Round,
    SubmissionCable, Variant, WardenError,
};
use patchwarden_store::{RotationState, SubmissionStore};

use crate::metrics::SelectionMetrics;

/// Result of one rotation
#[derive(Debug, Clone, PartialEq)]
pub enum RotationOutcome {
    Rotated {
        cable: SubmissionCable,
        variant: Variant,
        patch_type: String,
        /// Order slots skipped because the challenge set had no matching variant
        skipped: u64,
        state: RotationState,
    },
    /// No variant matched any patch type in a full cycle; nothing was written
    CatalogMismatch,
}

impl RotationOutcome {
    pub fn cable(&self) -> Option<&SubmissionCable> {
        match self {
            Self::Rotated { cable, .. } => Some(cable),
            Self::CatalogMismatch => None,
        }
    }
}

pub struct RotationScheduler {
    store: Arc<dyn SubmissionStore>,
    catalog: Arc<PatchCatalog>,
    metrics: Option<Arc<SelectionMetrics>>,
}

impl RotationScheduler {
    pub fn new(store: Arc<dyn SubmissionStore>, catalog: Arc<PatchCatalog>) -> Self {
        Self {
            store,
            catalog,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<SelectionMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Phase offset for a challenge set that has never rotated
    pub fn phase_for(&self, challenge_set: &ChallengeSet) -> u64 {
        challenge_set.ordinal % self.catalog.len() as u64
    }

    /// Field the next variant in this challenge set's rotation for `round`.
    ///
    /// A challenge set rotates at most once per round; a second call for the
    /// same round fails with `DuplicateRotation`.
    #[instrument(skip(self))]
    pub async fn rotate(&self, cs: ChallengeSetId, round: Round) -> Result<RotationOutcome> {
        let state = match self.store.rotation_state(cs).await? {
            Some(state) => state,
            None => {
                let challenge_set = self.store.challenge_set(cs).await?;
                RotationState::initial(self.phase_for(&challenge_set))
            }
        };
        let variants = self.store.variants(cs).await?;

        let Some((variant, skipped)) = self.select(&variants, state.position()) else {
            warn!(
                variants = variants.len(),
                "No variant matches any patch type in the order"
            );
            if let Some(m) = &self.metrics {
                m.catalog_mismatches.inc();
            }
            return Ok(RotationOutcome::CatalogMismatch);
        };
        if skipped > 0 {
            debug!(skipped, "Skipped patch types without a variant");
        }

        let variant = variant.clone();
        let patch_type = variant.patch_type.clone().unwrap_or_default();
        let draft = CableDraft::new(cs, round, vec![variant.id], CableOrigin::Rotation);

        let (cable, state) = match self.store.commit_rotation(draft, state).await {
            Ok(committed) => committed,
            Err(err @ WardenError::ConcurrentMutationConflict { .. }) => {
                if let Some(m) = &self.metrics {
                    m.rotation_conflicts.inc();
                }
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        info!(
            variant = %variant.name,
            patch_type = %patch_type,
            cursor = state.cursor,
            "Rotated variant into the field"
        );
        if let Some(m) = &self.metrics {
            m.rotations.inc();
        }

        Ok(RotationOutcome::Rotated {
            cable,
            variant,
            patch_type,
            skipped,
            state,
        })
    }

    /// First variant at or after `position` in the cyclic order, with the
    /// number of slots skipped to reach it
    fn select<'a>(&self, variants: &'a [Variant], position: u64) -> Option<(&'a Variant, u64)> {
        (0..self.catalog.len() as u64).find_map(|step| {
            let name = self.catalog.order_at(position + step);
            variants
                .iter()
                .find(|v| v.has_patch_type(name))
                .map(|v| (v, step))
        })
    }
}
