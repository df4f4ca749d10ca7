//! PerformanceScore - benchmarked overhead of a patch type for a round
//!
//! A score carries a reference measurement (unpatched) and a replacement
//! measurement (patched). Overhead per metric is `rep / ref`; the mean over the
//! four metrics is what ranking consumes.

use serde::{Deserialize, Serialize};

use super::challenge_set::{ChallengeSetId, Round};

/// One benchmark measurement set
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurement {
    /// CPU time
    pub task_clock: f64,
    /// Resident set size
    pub rss: f64,
    /// Page faults
    pub flt: f64,
    /// Binary size on disk
    pub file_size: f64,
}

impl Measurement {
    pub fn new(task_clock: f64, rss: f64, flt: f64, file_size: f64) -> Self {
        Self {
            task_clock,
            rss,
            flt,
            file_size,
        }
    }

    /// Same figure for all four metrics
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    fn metrics(&self) -> [f64; 4] {
        [self.task_clock, self.rss, self.flt, self.file_size]
    }
}

/// Benchmark result for a (challenge set, patch type, round)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceScore {
    pub cs: ChallengeSetId,
    pub patch_type: String,
    pub round: Round,
    /// Reference (unpatched) measurement
    pub reference: Measurement,
    /// Replacement (patched) measurement
    pub replacement: Measurement,
    /// Functionality polls run during the benchmark
    pub num_polls: u32,
    pub has_failed_polls: bool,
    pub failed_polls: u32,
}

impl PerformanceScore {
    pub fn new(
        cs: ChallengeSetId,
        patch_type: impl Into<String>,
        round: Round,
        reference: Measurement,
        replacement: Measurement,
    ) -> Self {
        Self {
            cs,
            patch_type: patch_type.into(),
            round,
            reference,
            replacement,
            num_polls: 0,
            has_failed_polls: false,
            failed_polls: 0,
        }
    }

    /// Attach benchmark poll counts
    pub fn with_polls(mut self, num_polls: u32, failed_polls: u32) -> Self {
        self.num_polls = num_polls;
        self.failed_polls = failed_polls;
        self.has_failed_polls = failed_polls > 0;
        self
    }

    /// Per-metric `rep / ref` ratios; metrics without a usable reference are skipped
    pub fn overhead_ratios(&self) -> Vec<f64> {
        self.reference
            .metrics()
            .into_iter()
            .zip(self.replacement.metrics())
            .filter(|(r, _)| r.is_finite() && *r > 0.0)
            .map(|(r, p)| p / r)
            .filter(|ratio| ratio.is_finite())
            .collect()
    }

    /// Mean overhead ratio; `f64::INFINITY` when no metric is usable
    pub fn mean_overhead(&self) -> f64 {
        let ratios = self.overhead_ratios();
        if ratios.is_empty() {
            return f64::INFINITY;
        }
        ratios.iter().sum::<f64>() / ratios.len() as f64
    }
}
