//! # PatchWarden Store
//!
//! Data-access layer for challenge sets, their variants, benchmark and
//! fielding evidence, rotation state, and the submission cable ledger.
//!
//! ## Guarantees
//!
//! - Writes for one challenge set are serialized; different challenge sets
//!   never contend.
//! - Rotation commits are guarded by the expected cursor, so a racing writer
//!   fails with `ConcurrentMutationConflict` instead of appending twice.
//! - Variant and cable ids ascend in creation order.

pub mod memory_store;
pub mod snapshot;
pub mod store;

pub use memory_store::{InMemoryStore, StoreStats};
pub use snapshot::{ChallengeSetSnapshot, StoreSnapshot};
pub use store::{RotationState, SubmissionStore};
