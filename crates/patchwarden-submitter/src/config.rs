//! Submitter configuration

use std::path::PathBuf;

use anyhow::Result;
use patchwarden_common::Round;
use patchwarden_selection::SelectionConfig;
use serde::{Deserialize, Serialize};

/// Submitter process configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitterConfig {
    /// Store snapshot read at start and written back after the round
    pub state_path: PathBuf,
    /// Patch catalog JSON; the built-in catalog is used when unset
    pub catalog_path: Option<PathBuf>,
    /// Round being driven
    pub round: Round,
    /// Decision thresholds and ranking weights
    pub selection: SelectionConfig,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("patchwarden-state.json"),
            catalog_path: None,
            round: 0,
            selection: SelectionConfig::default(),
        }
    }
}

impl SubmitterConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let mut cfg = Self::default();

        if let Ok(path) = std::env::var("PATCHWARDEN_STATE_PATH") {
            cfg.state_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("PATCHWARDEN_CATALOG_PATH") {
            cfg.catalog_path = Some(PathBuf::from(path));
        }
        if let Ok(val) = std::env::var("PATCHWARDEN_ROUND") {
            if let Ok(v) = val.parse() {
                cfg.round = v;
            }
        }

        // Selection settings
        if let Ok(val) = std::env::var("PATCHWARDEN_SUCCESS_FLOOR") {
            if let Ok(v) = val.parse() {
                cfg.selection.success_floor = v;
            }
        }
        if let Ok(val) = std::env::var("PATCHWARDEN_REVERT_OVERHEAD") {
            if let Ok(v) = val.parse() {
                cfg.selection.revert_overhead = v;
            }
        }
        if let Ok(val) = std::env::var("PATCHWARDEN_RISK_WEIGHT") {
            if let Ok(v) = val.parse() {
                cfg.selection.risk_weight = v;
            }
        }
        if let Ok(val) = std::env::var("PATCHWARDEN_EXPLOITABILITY_WEIGHT") {
            if let Ok(v) = val.parse() {
                cfg.selection.exploitability_weight = v;
            }
        }
        if let Ok(val) = std::env::var("PATCHWARDEN_OVERHEAD_WEIGHT") {
            if let Ok(v) = val.parse() {
                cfg.selection.overhead_weight = v;
            }
        }

        cfg.selection.validate()?;
        Ok(cfg)
    }
}
