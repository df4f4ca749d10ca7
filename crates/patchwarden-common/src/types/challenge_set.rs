//! ChallengeSet - a target program under continuous evaluation

use serde::{Deserialize, Serialize};

/// Competition round number, assigned externally and never reused
pub type Round = u64;

/// Store-assigned challenge set identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeSetId(pub u64);

impl std::fmt::Display for ChallengeSetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cs#{}", self.0)
    }
}

/// A uniquely named target program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSet {
    pub id: ChallengeSetId,
    pub name: String,
    /// Position among all registered challenge sets (0-based, registration order)
    pub ordinal: u64,
    /// Registration timestamp (Unix milliseconds)
    pub created_at: i64,
}

impl ChallengeSet {
    pub fn new(id: ChallengeSetId, name: impl Into<String>, ordinal: u64) -> Self {
        Self {
            id,
            name: name.into(),
            ordinal,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

impl std::fmt::Display for ChallengeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.id)
    }
}
