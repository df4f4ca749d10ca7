//! Error types for PatchWarden
//!
//! Provides a unified error type and domain-specific error variants

use thiserror::Error;

use crate::types::challenge_set::{ChallengeSetId, Round};
use crate::types::variant::VariantId;

/// Result type alias using WardenError
pub type Result<T> = std::result::Result<T, WardenError>;

/// Unified error type for PatchWarden operations
#[derive(Debug, Error)]
pub enum WardenError {
    // Data model invariant violations
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    // Patch catalog configuration errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    // Two writers raced on the same challenge set
    #[error("Concurrent mutation of {cs}: expected cursor {expected}, found {actual}")]
    ConcurrentMutationConflict {
        cs: ChallengeSetId,
        expected: u64,
        actual: u64,
    },

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Metrics registration errors
    #[error("Metrics error: {0}")]
    Metrics(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Violations of the persisted data model
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Challenge set not found: {0}")]
    UnknownChallengeSet(String),

    #[error("Challenge set name already registered: {0}")]
    DuplicateChallengeSet(String),

    #[error("Challenge set {0} already has a baseline")]
    DuplicateBaseline(ChallengeSetId),

    #[error("Baseline for {0} must be created before any patch candidate")]
    BaselineAfterPatch(ChallengeSetId),

    #[error("Variant {variant} does not belong to {cs}")]
    ForeignVariant { cs: ChallengeSetId, variant: VariantId },

    #[error("Performance score for {cs}/{patch_type} already recorded in round {round}")]
    DuplicatePerformanceScore {
        cs: ChallengeSetId,
        patch_type: String,
        round: Round,
    },

    #[error("Fielding for {cs} already recorded in round {round}")]
    DuplicateFielding { cs: ChallengeSetId, round: Round },

    #[error("No fielding for {cs} in round {round}")]
    MissingFielding { cs: ChallengeSetId, round: Round },

    #[error("Poll feedback for {cs} in round {round} already attached")]
    FeedbackAlreadyAttached { cs: ChallengeSetId, round: Round },

    #[error("{cs} already rotated in round {round}")]
    DuplicateRotation { cs: ChallengeSetId, round: Round },

    #[error("Cable not found: {0}")]
    UnknownCable(u64),

    #[error("Cable must reference at least one variant")]
    EmptyCable,
}

/// Invalid patch catalog configuration
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Patch order is empty")]
    EmptyOrder,

    #[error("Patch type listed twice: {0}")]
    Duplicate(String),

    #[error("Patch order references unknown patch type: {0}")]
    UnknownInOrder(String),

    #[error("Patch type missing from patch order: {0}")]
    MissingFromOrder(String),

    #[error("Attribute {attribute} of {name} out of range [0, 1]: {value}")]
    AttributeOutOfRange {
        name: String,
        attribute: &'static str,
        value: f64,
    },
}

// Implement From for common external error types
impl From<serde_json::Error> for WardenError {
    fn from(err: serde_json::Error) -> Self {
        WardenError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for WardenError {
    fn from(err: std::io::Error) -> Self {
        WardenError::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for WardenError {
    fn from(err: anyhow::Error) -> Self {
        WardenError::Internal(err.to_string())
    }
}

impl From<prometheus::Error> for WardenError {
    fn from(err: prometheus::Error) -> Self {
        WardenError::Metrics(err.to_string())
    }
}
