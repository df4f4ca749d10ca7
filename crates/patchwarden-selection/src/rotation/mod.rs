//! Rotation scheduler: cycle patch variants into the field to gather evidence
pub mod scheduler;

pub use self::scheduler::{RotationOutcome, RotationScheduler};
