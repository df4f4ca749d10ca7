//! Prometheus metrics for evaluation and rotation

use patchwarden_common::Result;

/// Counters for evaluator and scheduler outcomes
pub struct SelectionMetrics {
    pub patches_chosen: prometheus::IntCounter,
    pub reverts: prometheus::IntCounter,
    pub undecided: prometheus::IntCounter,
    pub rotations: prometheus::IntCounter,
    pub catalog_mismatches: prometheus::IntCounter,
    pub rotation_conflicts: prometheus::IntCounter,
}

impl SelectionMetrics {
    pub fn new() -> Result<Self> {
        Ok(Self {
            patches_chosen: prometheus::IntCounter::new(
                "patchwarden_patches_chosen_total",
                "Evaluations that selected a patch candidate",
            )?,
            reverts: prometheus::IntCounter::new(
                "patchwarden_reverts_total",
                "Evaluations that reverted to the baseline",
            )?,
            undecided: prometheus::IntCounter::new(
                "patchwarden_undecided_total",
                "Evaluations without enough evidence to decide",
            )?,
            rotations: prometheus::IntCounter::new(
                "patchwarden_rotations_total",
                "Variants rotated into the field",
            )?,
            catalog_mismatches: prometheus::IntCounter::new(
                "patchwarden_catalog_mismatches_total",
                "Rotations skipped because no variant matched any patch type",
            )?,
            rotation_conflicts: prometheus::IntCounter::new(
                "patchwarden_rotation_conflicts_total",
                "Rotations rejected by a concurrent commit",
            )?,
        })
    }

    pub fn register(&self, registry: &prometheus::Registry) -> Result<()> {
        registry.register(Box::new(self.patches_chosen.clone()))?;
        registry.register(Box::new(self.reverts.clone()))?;
        registry.register(Box::new(self.undecided.clone()))?;
        registry.register(Box::new(self.rotations.clone()))?;
        registry.register(Box::new(self.catalog_mismatches.clone()))?;
        registry.register(Box::new(self.rotation_conflicts.clone()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_once() {
        let registry = prometheus::Registry::new();
        let metrics = SelectionMetrics::new().unwrap();
        metrics.register(&registry).unwrap();
        metrics.rotations.inc();
        assert_eq!(registry.gather().len(), 6);

        // Same names cannot be registered twice
        assert!(metrics.register(&registry).is_err());
    }
}
