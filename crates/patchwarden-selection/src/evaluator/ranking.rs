//! Candidate ranking: lower cost wins
//!
//! The weighting between static risk and measured overhead is a policy
//! decision, so it sits behind a trait. `CompositeCost` is the default:
//!
//! ```text
//! cost = w_r × functionality_risk + w_e × exploitability + w_o × mean(rep / ref)
//! ```
//!
//! A term with zero weight contributes nothing, even when its value is
//! infinite (no usable benchmark metric).

use super::evidence::CandidateEvidence;

/// Assigns a cost to an evaluable, non-disqualified candidate
pub trait RankingPolicy: Send + Sync {
    fn cost(&self, candidate: &CandidateEvidence) -> f64;
}

/// Weighted sum of static risk attributes and benchmarked overhead
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeCost {
    pub risk_weight: f64,
    pub exploitability_weight: f64,
    pub overhead_weight: f64,
}

impl CompositeCost {
    pub fn new(risk_weight: f64, exploitability_weight: f64, overhead_weight: f64) -> Self {
        Self {
            risk_weight,
            exploitability_weight,
            overhead_weight,
        }
    }
}

impl Default for CompositeCost {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

impl RankingPolicy for CompositeCost {
    fn cost(&self, candidate: &CandidateEvidence) -> f64 {
        let pt = &candidate.patch_type;
        weighted(self.risk_weight, pt.functionality_risk)
            + weighted(self.exploitability_weight, pt.exploitability)
            + weighted(self.overhead_weight, candidate.latest_score.mean_overhead())
    }
}

#[inline]
fn weighted(weight: f64, value: f64) -> f64 {
    if weight == 0.0 {
        0.0
    } else {
        weight * value
    }
}
