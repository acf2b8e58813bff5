//! Rollout step schedule parsing and next-step selection.
//!
//! A schedule is a comma-separated list of integer percentages
//! (e.g. `1,20,50,100`) that a staged release should progress through.

use thiserror::Error;

/// Schedule validation error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("rollout steps must be comma-separated integers (e.g. 1,20,50,100), got {0:?}")]
    InvalidFormat(String),

    #[error("rollout step {0} is outside the valid range 0-100")]
    OutOfRange(i64),

    #[error("rollout step {next} must be strictly greater than the previous step {prev}")]
    NotMonotonic { prev: i64, next: i64 },
}

/// A validated, strictly increasing list of rollout fractions.
///
/// Each fraction is a percentage divided by 100, so `1,20,50,100`
/// becomes `[0.01, 0.2, 0.5, 1.0]`. Immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RolloutSchedule {
    steps: Vec<f64>,
}

impl RolloutSchedule {
    /// Parse and validate a raw schedule string.
    ///
    /// Every token must be an integer in `[0, 100]`, and each value must be
    /// strictly greater than the one before it. Equal adjacent values are
    /// rejected. An empty string is a single empty token and fails the
    /// integer parse.
    pub fn parse(raw: &str) -> Result<Self, ScheduleError> {
        let mut percentages = Vec::new();
        for token in raw.split(',') {
            let token = token.trim();
            let value: i64 = token
                .parse()
                .map_err(|_| ScheduleError::InvalidFormat(token.to_string()))?;
            percentages.push(value);
        }

        if let Some(&bad) = percentages.iter().find(|&&p| !(0..=100).contains(&p)) {
            return Err(ScheduleError::OutOfRange(bad));
        }

        for pair in percentages.windows(2) {
            if pair[0] >= pair[1] {
                return Err(ScheduleError::NotMonotonic { prev: pair[0], next: pair[1] });
            }
        }

        Ok(Self { steps: percentages.iter().map(|&p| p as f64 / 100.0).collect() })
    }

    /// The validated fractions, in ascending order.
    #[must_use]
    pub fn steps(&self) -> &[f64] {
        &self.steps
    }

    /// Find the next step strictly greater than the current fraction.
    ///
    /// Returns `None` when the schedule is exhausted (current is at or
    /// beyond every configured step). A step exactly equal to `current` is
    /// never selected, so an already-reached percentage does not trigger a
    /// duplicate notification.
    #[must_use]
    pub fn next_after(&self, current: f64) -> Option<f64> {
        self.steps.iter().copied().find(|&step| step > current)
    }
}

impl std::fmt::Display for RolloutSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self.steps.iter().map(|s| format!("{s}")).collect();
        write!(f, "[{}]", rendered.join(", "))
    }
}
