//! # PatchWarden Submitter
//!
//! Drives one competition round: evaluates every challenge set, records
//! decisions as submission cables, and rotates unevaluated variants into the
//! field. The cables are left pending for the external transport.

pub mod config;
pub mod driver;

pub use config::SubmitterConfig;
pub use driver::{RoundDriver, RoundReport, StepOutcome};
