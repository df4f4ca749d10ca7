//! # Selection
//!
//! Decides which variant of each challenge set to field, and rotates
//! unevaluated patch variants into the field when there is nothing to decide
//! yet.
//!
//! ## Decision Rule
//!
//! ```text
//! pool      = patch candidates with ≥1 performance score
//! disq(c)   = ∃ feedback f while c fielded: f.success < floor
//!                                         ∨ f.time_overhead ≥ revert
//!                                         ∨ f.memory_overhead ≥ revert
//! cost(c)   = w_r·risk + w_e·exploitability + w_o·mean(rep/ref)
//! decision  = ∅                      if pool = ∅
//!           = [baseline]             if ∀c ∈ pool: disq(c)
//!           = [argmin cost(c)]       otherwise (ties → earliest created)
//! ```
//!
//! ## Rotation
//!
//! A challenge set with ordinal `n` that has rotated `k` times fields the
//! variant of patch type `order[(k + n) mod P]`.

pub mod evaluator;
pub mod metrics;
pub mod rotation;

pub use evaluator::{
    CandidateEvidence, CompositeCost, Disqualification, DisqualificationPolicy, EvidenceView,
    PatchDecision, PatchEvaluator, RankingPolicy,
};
pub use metrics::SelectionMetrics;
pub use rotation::{RotationOutcome, RotationScheduler};

use patchwarden_common::{Result, WardenError};
use serde::{Deserialize, Serialize};

/// Selection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Minimum live poll success ratio; anything lower disqualifies
    pub success_floor: f64,
    /// Live time or memory overhead ratio that disqualifies
    pub revert_overhead: f64,
    /// Cost weight of a patch type's functionality risk
    pub risk_weight: f64,
    /// Cost weight of a patch type's exploitability
    pub exploitability_weight: f64,
    /// Cost weight of the benchmarked mean overhead ratio
    pub overhead_weight: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            success_floor: patchwarden_common::SUCCESS_FLOOR,
            revert_overhead: patchwarden_common::REVERT_OVERHEAD,
            risk_weight: 1.0,
            exploitability_weight: 1.0,
            overhead_weight: 1.0,
        }
    }
}

impl SelectionConfig {
    /// Reject thresholds and weights that would make every decision meaningless
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.success_floor) {
            return Err(WardenError::Config(format!(
                "success_floor must be within [0, 1], got {}",
                self.success_floor
            )));
        }
        if !(self.revert_overhead.is_finite() && self.revert_overhead > 0.0) {
            return Err(WardenError::Config(format!(
                "revert_overhead must be positive, got {}",
                self.revert_overhead
            )));
        }
        for (name, weight) in [
            ("risk_weight", self.risk_weight),
            ("exploitability_weight", self.exploitability_weight),
            ("overhead_weight", self.overhead_weight),
        ] {
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(WardenError::Config(format!(
                    "{name} must be a non-negative number, got {weight}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = SelectionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.success_floor, 1.0);
        assert_eq!(config.revert_overhead, 1.3);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = SelectionConfig::default();
        config.success_floor = 1.5;
        assert!(config.validate().is_err());

        let mut config = SelectionConfig::default();
        config.revert_overhead = 0.0;
        assert!(config.validate().is_err());

        let mut config = SelectionConfig::default();
        config.overhead_weight = -1.0;
        assert!(config.validate().is_err());
    }
}
