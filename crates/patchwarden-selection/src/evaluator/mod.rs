//! Patch evaluator: choose a patch, revert to the baseline, or wait for evidence
pub mod disqualification;
pub mod evidence;
pub mod patch_evaluator;
pub mod ranking;

pub use self::disqualification::{Disqualification, DisqualificationPolicy};
pub use self::evidence::{CandidateEvidence, EvidenceView};
pub use self::patch_evaluator::{PatchDecision, PatchEvaluator};
pub use self::ranking::{CompositeCost, RankingPolicy};
