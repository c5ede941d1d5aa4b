use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use zb_srs::MasteryState;

/// Canonical answer payload stored with a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    /// The canonical answer shown back to the student
    pub value: String,
    /// Other spellings accepted as correct
    #[serde(default)]
    pub variants: Vec<String>,
    /// Unit appended when displaying the answer (e.g. "円")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl QuestionAnswer {
    /// Canonical answer followed by its accepted variants
    pub fn accepted(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.value.as_str()).chain(self.variants.iter().map(String::as_str))
    }
}

/// Question model - static quiz content
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    /// Unique question identifier
    pub id: i64,
    /// Subject name (e.g. "算数")
    pub subject: String,
    /// Topic name inside the subject
    pub topic: String,
    /// Question text
    pub stem: String,
    /// Multiple-choice options, when the question has any
    pub choices: Option<Json<serde_json::Value>>,
    /// Correct answer and accepted variants
    pub answer: Json<QuestionAnswer>,
    /// Short hint shown on request
    pub hint: Option<String>,
    /// Worked explanation
    pub explanation: Option<String>,
    /// Relative difficulty
    pub difficulty: f64,
    /// Where the question came from ("seed", "variant:12", ...)
    pub source: Option<String>,
    /// When the question was created
    pub created_at: DateTime<Utc>,
}

/// Insert struct for Question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestion {
    pub subject: String,
    pub topic: String,
    pub stem: String,
    pub choices: Option<serde_json::Value>,
    pub answer: QuestionAnswer,
    pub hint: Option<String>,
    pub explanation: Option<String>,
    pub difficulty: f64,
    pub source: Option<String>,
}

impl From<&Question> for NewQuestion {
    fn from(question: &Question) -> Self {
        Self {
            subject: question.subject.clone(),
            topic: question.topic.clone(),
            stem: question.stem.clone(),
            choices: question.choices.as_ref().map(|c| c.0.clone()),
            answer: question.answer.0.clone(),
            hint: question.hint.clone(),
            explanation: question.explanation.clone(),
            difficulty: question.difficulty,
            source: question.source.clone(),
        }
    }
}

/// Attempt model - append-only log of answer submissions
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attempt {
    pub id: i64,
    pub user_id: i64,
    pub question_id: i64,
    pub user_answer: String,
    pub correct: bool,
    /// Time spent answering, in seconds
    pub elapsed_seconds: Option<i32>,
    /// Self-reported mistake category ("calc_mistake", "concept_gap", ...)
    pub mistake_category: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert struct for Attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAttempt {
    pub user_id: i64,
    pub question_id: i64,
    pub user_answer: String,
    pub correct: bool,
    pub elapsed_seconds: Option<i32>,
    pub mistake_category: Option<String>,
}

/// Mastery row - one per (user, question)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MasteryRow {
    pub user_id: i64,
    pub question_id: i64,
    pub value: f64,
    pub consecutive_correct: i32,
    pub stability: f64,
    pub last_review_at: Option<DateTime<Utc>>,
    pub next_review_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<&MasteryRow> for MasteryState {
    fn from(row: &MasteryRow) -> Self {
        Self {
            value: row.value,
            consecutive_correct: row.consecutive_correct,
            stability: row.stability,
            last_review_at: row.last_review_at,
            next_review_at: row.next_review_at,
        }
    }
}

/// Mastery joined with question metadata, used for the weakness map
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MasteryOverview {
    pub question_id: i64,
    pub subject: String,
    pub topic: String,
    pub value: f64,
    pub consecutive_correct: i32,
    pub stability: f64,
    pub last_review_at: Option<DateTime<Utc>>,
    pub next_review_at: Option<DateTime<Utc>>,
    /// Number of logged attempts on the question
    pub attempts: i64,
}

/// Topic reference row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Topic {
    pub id: i64,
    pub subject: String,
    /// Sub-area of the subject (e.g. "物理" inside "理科")
    pub domain: Option<String>,
    pub name: String,
    /// One of "basic", "applied", "advanced"
    pub difficulty: String,
}

/// Test result summary
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TestResult {
    pub id: i64,
    pub user_id: i64,
    pub subject: String,
    pub test_name: String,
    pub total_score: Option<i32>,
    pub max_score: i32,
    pub score_percentage: f64,
    pub overall_analysis: String,
    /// "llm" or "fallback"
    pub analysis_source: String,
    pub created_at: DateTime<Utc>,
}

/// Per-topic line of a test result
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TestResultDetail {
    pub id: i64,
    pub test_result_id: i64,
    pub topic: String,
    pub correct_count: i32,
    pub total_count: i32,
    pub score_percentage: f64,
    pub weakness_analysis: String,
    pub improvement_advice: String,
}

/// Insert struct for TestResult
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTestResult {
    pub user_id: i64,
    pub subject: String,
    pub test_name: String,
    pub total_score: Option<i32>,
    pub max_score: i32,
    pub score_percentage: f64,
    pub overall_analysis: String,
    pub analysis_source: String,
}

/// Insert struct for TestResultDetail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTestResultDetail {
    pub topic: String,
    pub correct_count: i32,
    pub total_count: i32,
    pub score_percentage: f64,
    pub weakness_analysis: String,
    pub improvement_advice: String,
}

/// Test result with its per-topic details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResultWithDetails {
    #[serde(flatten)]
    pub result: TestResult,
    pub topics: Vec<TestResultDetail>,
}
