use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Student's own classification of a wrong answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MistakeCategory {
    CalcMistake,
    ConceptGap,
    MemoryLapse,
    Careless,
    Other,
}

impl MistakeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            MistakeCategory::CalcMistake => "calc_mistake",
            MistakeCategory::ConceptGap => "concept_gap",
            MistakeCategory::MemoryLapse => "memory_lapse",
            MistakeCategory::Careless => "careless",
            MistakeCategory::Other => "other",
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AnswerSubmission {
    /// Defaults to the demo student
    pub user_id: Option<i64>,
    #[validate(length(min = 1, max = 1000))]
    pub user_answer: String,
    #[serde(alias = "time_sec")]
    #[validate(range(min = 0, max = 86400))]
    pub elapsed_seconds: Option<i32>,
    #[serde(alias = "mistake_type")]
    pub mistake_category: Option<MistakeCategory>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MasterySnapshot {
    pub value: f64,
    pub consecutive_correct: i32,
    pub stability: f64,
    pub next_review_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResult {
    pub is_correct: bool,
    pub correct_answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub mastery: MasterySnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submission_accepts_legacy_field_names() {
        let submission: AnswerSubmission = serde_json::from_value(json!({
            "user_answer": "1000",
            "time_sec": 42,
            "mistake_type": "calc_mistake"
        }))
        .unwrap();

        assert_eq!(submission.user_id, None);
        assert_eq!(submission.elapsed_seconds, Some(42));
        assert_eq!(submission.mistake_category, Some(MistakeCategory::CalcMistake));
        assert!(submission.validate().is_ok());
    }

    #[test]
    fn test_submission_validation() {
        let empty: AnswerSubmission =
            serde_json::from_value(json!({ "user_answer": "" })).unwrap();
        assert!(empty.validate().is_err());

        let negative: AnswerSubmission =
            serde_json::from_value(json!({ "user_answer": "1", "elapsed_seconds": -1 })).unwrap();
        assert!(negative.validate().is_err());

        let too_long: AnswerSubmission =
            serde_json::from_value(json!({ "user_answer": "あ".repeat(1001) })).unwrap();
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_unknown_mistake_category_rejected() {
        let result: Result<AnswerSubmission, _> = serde_json::from_value(json!({
            "user_answer": "1",
            "mistake_category": "bad_luck"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_mistake_category_round_trip_names() {
        for category in [
            MistakeCategory::CalcMistake,
            MistakeCategory::ConceptGap,
            MistakeCategory::MemoryLapse,
            MistakeCategory::Careless,
            MistakeCategory::Other,
        ] {
            assert_eq!(
                serde_json::to_value(category).unwrap(),
                json!(category.as_str())
            );
        }
    }
}
