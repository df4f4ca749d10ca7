//! Disqualification: any live regression or excess overhead while fielded

use patchwarden_common::{PollFeedback, Round};

/// Why a fielded candidate may no longer be chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Disqualification {
    /// At least one functionality probe failed
    FunctionalRegression { round: Round, success: f64 },
    /// Live time or memory overhead reached the revert threshold
    ExcessOverhead {
        round: Round,
        time_overhead: f64,
        memory_overhead: f64,
    },
}

impl Disqualification {
    pub fn round(&self) -> Round {
        match self {
            Self::FunctionalRegression { round, .. } | Self::ExcessOverhead { round, .. } => *round,
        }
    }
}

pub struct DisqualificationPolicy {
    success_floor: f64,
    revert_overhead: f64,
}

impl DisqualificationPolicy {
    pub fn new(success_floor: f64, revert_overhead: f64) -> Self {
        Self {
            success_floor,
            revert_overhead,
        }
    }

    /// Judge a single round's feedback. Non-finite readings disqualify.
    pub fn judge(&self, round: Round, feedback: &PollFeedback) -> Option<Disqualification> {
        if feedback.success.is_nan() || feedback.success < self.success_floor {
            return Some(Disqualification::FunctionalRegression {
                round,
                success: feedback.success,
            });
        }
        let readable = feedback.time_overhead.is_finite() && feedback.memory_overhead.is_finite();
        if !readable || feedback.peak_overhead() >= self.revert_overhead {
            return Some(Disqualification::ExcessOverhead {
                round,
                time_overhead: feedback.time_overhead,
                memory_overhead: feedback.memory_overhead,
            });
        }
        None
    }

    /// First disqualifying record of a round-ordered feedback history
    pub fn first_disqualifying<'a, I>(&self, history: I) -> Option<Disqualification>
    where
        I: IntoIterator<Item = (Round, &'a PollFeedback)>,
    {
        history
            .into_iter()
            .find_map(|(round, feedback)| self.judge(round, feedback))
    }
}
