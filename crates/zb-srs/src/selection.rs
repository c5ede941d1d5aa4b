//! Next-question selection.
//!
//! Due reviews come first: when the student has questions whose review date
//! has passed, one of them is drawn uniformly at random. Otherwise a question is
//! drawn uniformly from the whole pool. There is no ordering guarantee beyond
//! "due before not-due".

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

/// How the next question should be chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Prefer questions that are due for review
    #[default]
    Review,
    /// Ignore review dates and draw from every question
    Random,
}

/// Why a question was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionReason {
    Due,
    Random,
}

/// The outcome of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub question_id: i64,
    pub reason: SelectionReason,
}

/// Pick the next question id.
///
/// `due` holds ids of questions whose review date has passed for the student,
/// `all` holds every eligible question id. Returns `None` when both are empty.
///
/// # Examples
/// ```
/// use rand::thread_rng;
/// use zb_srs::{SelectionMode, SelectionReason, select_next};
///
/// let picked = select_next(&[7], &[1, 2, 7], SelectionMode::Review, &mut thread_rng()).unwrap();
/// assert_eq!(picked.question_id, 7);
/// assert_eq!(picked.reason, SelectionReason::Due);
///
/// assert!(select_next(&[], &[], SelectionMode::Review, &mut thread_rng()).is_none());
/// ```
pub fn select_next<R>(
    due: &[i64],
    all: &[i64],
    mode: SelectionMode,
    rng: &mut R,
) -> Option<Selection>
where
    R: Rng + ?Sized,
{
    if mode == SelectionMode::Review
        && let Some(&question_id) = due.choose(rng)
    {
        return Some(Selection {
            question_id,
            reason: SelectionReason::Due,
        });
    }

    all.choose(rng).map(|&question_id| Selection {
        question_id,
        reason: SelectionReason::Random,
    })
}
