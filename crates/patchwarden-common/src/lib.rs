//! # PatchWarden Common
//!
//! Shared types, the patch-type catalog, and errors for PatchWarden.
//!
//! ## Core Types
//!
//! - [`ChallengeSet`]: a target program under continuous evaluation
//! - [`Variant`]: the baseline binary or one patched form of it
//! - [`PatchType`] / [`PatchCatalog`]: patch strategies and their global rotation order
//! - [`PerformanceScore`]: benchmarked overhead of a patch type for a round
//! - [`FieldingEvent`] / [`PollFeedback`]: what was fielded and how it behaved
//! - [`SubmissionCable`]: append-only record of a fielding decision

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{CatalogError, DataError, Result, WardenError};
pub use types::{
    cable::{CableDraft, CableId, CableOrigin, SubmissionCable},
    challenge_set::{ChallengeSet, ChallengeSetId, Round},
    fielding::{FieldingEvent, PollFeedback},
    patch_type::{PatchCatalog, PatchType},
    performance::{Measurement, PerformanceScore},
    variant::{Variant, VariantId},
};

/// PatchWarden version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Minimum poll success ratio a fielded patch must keep
pub const SUCCESS_FLOOR: f64 = 1.0;

/// Live overhead ratio (time or memory) at which a fielded patch is reverted
pub const REVERT_OVERHEAD: f64 = 1.3;
