use zb_db::models::QuestionAnswer;

use crate::normalization::{digits_only, normalize_for_comparison};

/// Grade a free-text answer against a question's accepted answers.
///
/// An answer is correct when its normalized form equals the normalized form of
/// the canonical answer or one of its variants. Numeric answers additionally
/// match on digits alone, so `"1,000円"` and `"１０００"` are both accepted for
/// `1000`.
pub fn is_correct(answer: &QuestionAnswer, user_answer: &str) -> bool {
    let normalized = normalize_for_comparison(user_answer);
    if normalized.is_empty() {
        return false;
    }

    let user_digits = digits_only(user_answer);

    answer.accepted().any(|accepted| {
        let expected = normalize_for_comparison(accepted);
        if expected == normalized {
            return true;
        }

        is_numeric(&expected) && !user_digits.is_empty() && user_digits == expected
    })
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Canonical answer with its unit appended, for display
pub fn display_answer(answer: &QuestionAnswer) -> String {
    match &answer.unit {
        Some(unit) => format!("{}{}", answer.value, unit),
        None => answer.value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yen(value: &str) -> QuestionAnswer {
        QuestionAnswer {
            value: value.to_string(),
            variants: vec!["1,000".to_string()],
            unit: Some("円".to_string()),
        }
    }

    fn reading(value: &str) -> QuestionAnswer {
        QuestionAnswer {
            value: value.to_string(),
            variants: Vec::new(),
            unit: None,
        }
    }

    #[test]
    fn test_exact_answer() {
        assert!(is_correct(&yen("1000"), "1000"));
        assert!(is_correct(&reading("じょうほう"), "じょうほう"));
    }

    #[test]
    fn test_numeric_formats() {
        let answer = yen("1000");
        assert!(is_correct(&answer, "1,000"));
        assert!(is_correct(&answer, "1000円"));
        assert!(is_correct(&answer, "１，０００円"));
        assert!(is_correct(&answer, " 1000 "));
    }

    #[test]
    fn test_wrong_numbers() {
        let answer = yen("1000");
        assert!(!is_correct(&answer, "100"));
        assert!(!is_correct(&answer, "1200"));
        assert!(!is_correct(&answer, "10000円"));
    }

    #[test]
    fn test_empty_answer_is_wrong() {
        assert!(!is_correct(&yen("1000"), ""));
        assert!(!is_correct(&yen("1000"), "   "));
        assert!(!is_correct(&yen("1000"), "。"));
    }

    #[test]
    fn test_text_answers() {
        let answer = reading("じょうほう");
        assert!(is_correct(&answer, "じょうほう。"));
        assert!(is_correct(&answer, " じょうほう "));
        assert!(!is_correct(&answer, "しょうほう"));
        assert!(!is_correct(&answer, "じょうほ"));
    }

    #[test]
    fn test_text_answer_is_not_matched_on_digits() {
        let answer = reading("三権分立");
        assert!(!is_correct(&answer, "3"));
    }

    #[test]
    fn test_variants_accepted() {
        let answer = QuestionAnswer {
            value: "比".to_string(),
            variants: vec!["ひ".to_string(), "ratio".to_string()],
            unit: None,
        };
        assert!(is_correct(&answer, "ひ"));
        assert!(is_correct(&answer, "Ratio"));
        assert!(!is_correct(&answer, "割合"));
    }

    #[test]
    fn test_display_answer() {
        assert_eq!(display_answer(&yen("1000")), "1000円");
        assert_eq!(display_answer(&reading("じょうほう")), "じょうほう");
    }
}
