//! Score extraction from the plain text of a school test result.
//!
//! The text comes from OCR or PDF extraction done by the client, so the
//! parser is line-oriented and forgiving: the text is NFKC-folded first, so
//! full-width digits, `：` and `／` read like their ASCII forms, and lines it
//! does not understand are ignored.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::analysis::{ScoreSummary, TopicScore};

/// Subjects recognised in test sheets, in lookup order
pub const SUBJECTS: &[&str] = &["算数", "数学", "理科", "社会", "国語", "英語"];

pub const UNKNOWN_SUBJECT: &str = "不明";
pub const DEFAULT_TEST_NAME: &str = "テスト結果";
pub const DEFAULT_MAX_SCORE: i32 = 100;
/// A topic line given only as `N点` is scored out of this
const POINTS_ONLY_TOTAL: i32 = 10;

/// Labels of summary lines that must not be read as topics
const SUMMARY_LABELS: &[&str] = &["テスト名", "総合点", "合計点", "得点", "満点", "配点", "科目"];

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("test result regex is valid")
}

static TEST_NAME: LazyLock<Regex> = LazyLock::new(|| regex(r"テスト名[：:]\s*([^\n]+)"));

static TOTAL_SCORE: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        regex(r"総合点[：:]\s*(\d+)"),
        regex(r"合計点[：:]\s*(\d+)"),
        regex(r"得点[：:]\s*(\d+)"),
        regex(r"(\d+)\s*点"),
    ]
});

static MAX_SCORE: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        regex(r"満点[：:]\s*(\d+)"),
        regex(r"配点[：:]\s*(\d+)"),
        regex(r"(\d+)\s*点満点"),
    ]
});

static TOPIC_FRACTION: LazyLock<Regex> =
    LazyLock::new(|| regex(r"^\s*(.+?)\s*[：:]\s*(\d+)\s*/\s*(\d+)\s*$"));

static TOPIC_POINTS: LazyLock<Regex> =
    LazyLock::new(|| regex(r"^\s*(.+?)\s*[：:]\s*(\d+)\s*点\s*$"));

/// Parse a test result, extracting subject, name, scores, and per-topic lines.
///
/// # Examples
/// ```
/// use zb_api::test_result::parser::parse_test_result;
///
/// let summary = parse_test_result("算数\n総合点: 72\n割合: 7 / 10");
/// assert_eq!(summary.subject, "算数");
/// assert_eq!(summary.total_score, Some(72));
/// assert_eq!(summary.topics[0].topic, "割合");
/// ```
pub fn parse_test_result(text: &str) -> ScoreSummary {
    let text: String = text.nfkc().collect();
    let total_score = extract_total_score(&text);
    let max_score = extract_max_score(&text);

    ScoreSummary {
        subject: extract_subject(&text),
        test_name: extract_test_name(&text),
        total_score,
        max_score,
        score_percentage: percentage(total_score.unwrap_or(0), max_score),
        topics: extract_topics(&text),
    }
}

/// `part / whole * 100`, or 0 when `whole` is not positive
pub fn percentage(part: i32, whole: i32) -> f64 {
    if whole > 0 {
        f64::from(part) / f64::from(whole) * 100.0
    } else {
        0.0
    }
}

fn extract_subject(text: &str) -> String {
    SUBJECTS
        .iter()
        .find(|subject| text.contains(*subject))
        .unwrap_or(&UNKNOWN_SUBJECT)
        .to_string()
}

fn extract_test_name(text: &str) -> String {
    TEST_NAME
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_TEST_NAME.to_string())
}

fn first_number(patterns: &[Regex], text: &str) -> Option<i32> {
    patterns
        .iter()
        .find_map(|re| re.captures(text).and_then(|caps| caps[1].parse().ok()))
}

fn extract_total_score(text: &str) -> Option<i32> {
    first_number(&TOTAL_SCORE[..], text)
}

fn extract_max_score(text: &str) -> i32 {
    first_number(&MAX_SCORE[..], text).unwrap_or(DEFAULT_MAX_SCORE)
}

fn extract_topics(text: &str) -> Vec<TopicScore> {
    text.lines().filter_map(parse_topic_line).collect()
}

fn parse_topic_line(line: &str) -> Option<TopicScore> {
    let (topic, correct_count, total_count) = if let Some(caps) = TOPIC_FRACTION.captures(line) {
        (
            caps[1].to_string(),
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        )
    } else if let Some(caps) = TOPIC_POINTS.captures(line) {
        (caps[1].to_string(), caps[2].parse().ok()?, POINTS_ONLY_TOTAL)
    } else {
        return None;
    };

    if SUMMARY_LABELS.contains(&topic.as_str()) {
        return None;
    }

    Some(TopicScore {
        score_percentage: percentage(correct_count, total_count),
        topic,
        correct_count,
        total_count,
    })
}
