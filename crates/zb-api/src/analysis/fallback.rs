//! Canned advice used when no LLM is configured or the call fails.

use super::{Analysis, AnalysisSource, ScoreSummary, TopicAdvice};

/// Score bands, lower bounds inclusive
const WEAK_BELOW: f64 = 60.0;
const FAIR_BELOW: f64 = 80.0;

pub fn analyze(summary: &ScoreSummary) -> Analysis {
    let topics = summary
        .topics
        .iter()
        .map(|topic| {
            let (weakness_analysis, improvement_advice) =
                advice_for(&topic.topic, topic.score_percentage);
            TopicAdvice {
                topic: topic.topic.clone(),
                correct_count: topic.correct_count,
                total_count: topic.total_count,
                score_percentage: topic.score_percentage,
                weakness_analysis,
                improvement_advice,
            }
        })
        .collect();

    Analysis {
        overall_analysis: format!("{}のテスト結果を分析しました。", summary.subject),
        topics,
        source: AnalysisSource::Fallback,
    }
}

/// Weakness text and improvement advice for one topic score
fn advice_for(topic: &str, score_percentage: f64) -> (String, String) {
    if score_percentage < WEAK_BELOW {
        (
            format!("{topic}の理解が不十分です。基礎から復習が必要です。"),
            format!("{topic}の基本問題を繰り返し解き、理解を深めてください。"),
        )
    } else if score_percentage < FAIR_BELOW {
        (
            format!("{topic}は基本的な理解はできていますが、応用問題に課題があります。"),
            format!("{topic}の応用問題を多く解き、実践力を向上させてください。"),
        )
    } else {
        (
            format!("{topic}は良好な成績です。"),
            format!("{topic}の知識を維持し、さらに発展的な学習に取り組んでください。"),
        )
    }
}
