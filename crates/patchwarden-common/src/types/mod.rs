//! Core data types for PatchWarden

pub mod cable;
pub mod challenge_set;
pub mod fielding;
pub mod patch_type;
pub mod performance;
pub mod variant;
