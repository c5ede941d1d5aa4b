//! Weakness analysis for uploaded test results.
//!
//! [`WeaknessAnalyzer::analyze`] never fails: when the LLM is not configured,
//! times out, or answers with an error, the canned [`fallback`] text is used.

pub mod fallback;
pub mod llm;

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::metrics;
use llm::{LlmClient, LlmConfig};

/// Characters of the LLM reply copied into each topic's weakness text
const TOPIC_EXCERPT_CHARS: usize = 200;

const SYSTEM_PROMPT: &str =
    "あなたは教育の専門家で、テスト結果を分析して弱点を特定し、具体的な改善アドバイスを提供します。";
const GENERIC_LLM_ADVICE: &str =
    "改善アドバイス: この単元の基礎を復習し、類似問題を多く解くことをお勧めします。";

/// Scores extracted from a test result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub subject: String,
    pub test_name: String,
    pub total_score: Option<i32>,
    pub max_score: i32,
    pub score_percentage: f64,
    pub topics: Vec<TopicScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicScore {
    pub topic: String,
    pub correct_count: i32,
    pub total_count: i32,
    pub score_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Llm,
    Fallback,
}

impl AnalysisSource {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisSource::Llm => "llm",
            AnalysisSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAdvice {
    pub topic: String,
    pub correct_count: i32,
    pub total_count: i32,
    pub score_percentage: f64,
    pub weakness_analysis: String,
    pub improvement_advice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub overall_analysis: String,
    pub topics: Vec<TopicAdvice>,
    pub source: AnalysisSource,
}

#[derive(Clone)]
pub struct WeaknessAnalyzer {
    llm: Option<LlmClient>,
}

impl WeaknessAnalyzer {
    /// Analyzer that always returns canned advice
    pub fn fallback_only() -> Self {
        Self { llm: None }
    }

    pub fn from_config(config: LlmConfig) -> Result<Self, reqwest::Error> {
        if config.api_key.is_none() {
            return Ok(Self::fallback_only());
        }

        Ok(Self {
            llm: Some(LlmClient::new(config)?),
        })
    }

    pub fn uses_llm(&self) -> bool {
        self.llm.as_ref().is_some_and(LlmClient::is_available)
    }

    pub async fn analyze(&self, summary: &ScoreSummary) -> Analysis {
        let analysis = match &self.llm {
            Some(client) if client.is_available() => {
                match client
                    .complete_with_system(SYSTEM_PROMPT, &build_prompt(summary))
                    .await
                {
                    Ok(reply) => from_llm_reply(summary, reply),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            model = client.model(),
                            "LLM analysis failed, using fallback"
                        );
                        fallback::analyze(summary)
                    }
                }
            }
            _ => fallback::analyze(summary),
        };

        metrics::record_analysis(analysis.source.as_str());
        analysis
    }
}

fn build_prompt(summary: &ScoreSummary) -> String {
    let mut prompt =
        String::from("以下のテスト結果を分析して、弱点と改善アドバイスを提供してください。\n\n");
    let _ = writeln!(prompt, "科目: {}", summary.subject);
    let _ = writeln!(prompt, "テスト名: {}", summary.test_name);
    let _ = writeln!(
        prompt,
        "総合点: {}/{} ({:.1}%)",
        summary
            .total_score
            .map_or_else(|| "不明".to_string(), |s| s.to_string()),
        summary.max_score,
        summary.score_percentage
    );
    prompt.push_str("\n単元別結果:\n");
    for topic in &summary.topics {
        let _ = writeln!(
            prompt,
            "- {}: {}/{} ({:.1}%)",
            topic.topic, topic.correct_count, topic.total_count, topic.score_percentage
        );
    }
    prompt
}

fn from_llm_reply(summary: &ScoreSummary, reply: String) -> Analysis {
    let excerpt: String = reply.chars().take(TOPIC_EXCERPT_CHARS).collect();

    let topics = summary
        .topics
        .iter()
        .map(|topic| TopicAdvice {
            topic: topic.topic.clone(),
            correct_count: topic.correct_count,
            total_count: topic.total_count,
            score_percentage: topic.score_percentage,
            weakness_analysis: format!("AI分析: {excerpt}..."),
            improvement_advice: GENERIC_LLM_ADVICE.to_string(),
        })
        .collect();

    Analysis {
        overall_analysis: reply,
        topics,
        source: AnalysisSource::Llm,
    }
}
