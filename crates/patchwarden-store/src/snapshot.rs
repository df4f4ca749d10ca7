//! JSON image of the whole store
//!
//! Lets a short-lived submitter process load state, run one round, and write
//! the result back.

use serde::{Deserialize, Serialize};

use patchwarden_common::{
    ChallengeSet, FieldingEvent, PerformanceScore, Result, SubmissionCable, Variant,
};

use crate::store::RotationState;

/// Current snapshot layout version
pub const SNAPSHOT_VERSION: u32 = 2;

/// Everything stored for one challenge set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeSetSnapshot {
    pub challenge_set: ChallengeSet,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub performance_scores: Vec<PerformanceScore>,
    #[serde(default)]
    pub fieldings: Vec<FieldingEvent>,
    #[serde(default)]
    pub cables: Vec<SubmissionCable>,
    #[serde(default)]
    pub rotation: Option<RotationState>,
}

/// Serializable store image, challenge sets ordered by ordinal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: u32,
    pub challenge_sets: Vec<ChallengeSetSnapshot>,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            challenge_sets: Vec::new(),
        }
    }
}

impl StoreSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
