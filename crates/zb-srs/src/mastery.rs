//! Mastery update rule.
//!
//! Every graded answer moves a student's [`MasteryState`] for one question:
//! the continuous mastery value, the consecutive-correct streak, the stability
//! factor, and the next review date. The rule is a pure function of the previous
//! state, the correctness of the answer, and the current time.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Mastery value assigned to a record on its first attempt.
pub const INITIAL_VALUE: f64 = 0.5;
/// Stability assigned to a record on its first attempt.
pub const INITIAL_STABILITY: f64 = 1.0;
/// Stability after any incorrect answer under the additive policy.
pub const LAPSE_STABILITY: f64 = 0.7;
/// Upper bound of the additive policy's review interval, in days.
pub const MAX_INTERVAL_DAYS: i64 = 14;

const CORRECT_STEP: f64 = 0.1;
const INCORRECT_STEP: f64 = 0.2;
const EMA_ALPHA: f64 = 0.6;

/// Per user and question mastery record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MasteryState {
    /// Estimate of recall probability, always in `[0, 1]` after an update
    pub value: f64,
    /// Number of correct answers in a row
    pub consecutive_correct: i32,
    /// Loose proxy for retention strength
    pub stability: f64,
    /// When the question was last answered
    pub last_review_at: Option<DateTime<Utc>>,
    /// When the question should be reviewed next
    pub next_review_at: Option<DateTime<Utc>>,
}

impl Default for MasteryState {
    fn default() -> Self {
        Self {
            value: INITIAL_VALUE,
            consecutive_correct: 0,
            stability: INITIAL_STABILITY,
            last_review_at: None,
            next_review_at: None,
        }
    }
}

impl MasteryState {
    /// Whether the record is due for review at `now`.
    ///
    /// A record that was never scheduled is always due.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at.is_none_or(|next| next <= now)
    }
}

/// Which mastery update formula to apply.
///
/// `Additive` moves the value by fixed steps and grows the interval with
/// stability. `Ema` blends the answer into the value with an exponential moving
/// average and uses fixed 1/3/14 day buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum MasteryPolicy {
    #[default]
    Additive,
    Ema,
}

impl MasteryPolicy {
    /// Apply one graded answer to `state`, returning the new state.
    pub fn update(
        self,
        state: &MasteryState,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> MasteryState {
        match self {
            Self::Additive => update_additive(state, is_correct, now),
            Self::Ema => update_ema(state, is_correct, now),
        }
    }

    /// Name used in configuration and logs
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Additive => "additive",
            Self::Ema => "ema",
        }
    }
}

impl fmt::Display for MasteryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a policy name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePolicyError(String);

impl fmt::Display for ParsePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown mastery policy '{}', expected 'additive' or 'ema'",
            self.0
        )
    }
}

impl std::error::Error for ParsePolicyError {}

impl TryFrom<String> for MasteryPolicy {
    type Error = ParsePolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for MasteryPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "additive" => Ok(Self::Additive),
            "ema" => Ok(Self::Ema),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

/// Apply one graded answer with the default (additive) policy.
pub fn update(state: &MasteryState, is_correct: bool, now: DateTime<Utc>) -> MasteryState {
    MasteryPolicy::default().update(state, is_correct, now)
}

/// Review interval in days granted for a given stability once the streak is established.
///
/// # Examples
/// ```
/// use zb_srs::mastery::interval_days_for_stability;
///
/// assert_eq!(interval_days_for_stability(1.8), 5);
/// assert_eq!(interval_days_for_stability(10.0), 14);
/// ```
pub fn interval_days_for_stability(stability: f64) -> i64 {
    ((stability * 3.0).round() as i64).clamp(1, MAX_INTERVAL_DAYS)
}

fn update_additive(state: &MasteryState, is_correct: bool, now: DateTime<Utc>) -> MasteryState {
    let (value, consecutive_correct, stability, interval_days) = if is_correct {
        let streak = state.consecutive_correct.max(0).saturating_add(1);
        if streak >= 2 {
            let stability = (state.stability * 1.5 + 0.3).max(1.0);
            (
                state.value + CORRECT_STEP,
                streak,
                stability,
                interval_days_for_stability(stability),
            )
        } else {
            (state.value + CORRECT_STEP, streak, state.stability, 1)
        }
    } else {
        (state.value - INCORRECT_STEP, 0, LAPSE_STABILITY, 1)
    };

    MasteryState {
        value: value.clamp(0.0, 1.0),
        consecutive_correct,
        stability,
        last_review_at: Some(now),
        next_review_at: Some(now + Duration::days(interval_days)),
    }
}

fn update_ema(state: &MasteryState, is_correct: bool, now: DateTime<Utc>) -> MasteryState {
    let observed = if is_correct { 1.0 } else { 0.0 };
    let value = EMA_ALPHA.mul_add(observed, (1.0 - EMA_ALPHA) * state.value);

    let consecutive_correct = if is_correct {
        state.consecutive_correct.max(0).saturating_add(1)
    } else {
        0
    };

    let interval_days = match consecutive_correct {
        c if c >= 2 => 14,
        1 => 3,
        _ => 1,
    };

    MasteryState {
        value: value.clamp(0.0, 1.0),
        consecutive_correct,
        stability: state.stability,
        last_review_at: Some(now),
        next_review_at: Some(now + Duration::days(interval_days)),
    }
}
