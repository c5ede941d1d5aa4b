use validator::Validate;

use crate::error::ApiError;

/// Longest subject name the schema stores
pub const MAX_SUBJECT_LEN: usize = 64;

/// Validate a request payload, mapping failures to a 400
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), ApiError> {
    payload.validate().map_err(ApiError::from)
}

/// Validate a database id taken from the path or body
///
/// # Examples
/// ```
/// use zb_api::validation::validate_id;
///
/// assert!(validate_id(1, "question_id").is_ok());
/// assert!(validate_id(0, "question_id").is_err());
/// ```
pub fn validate_id(id: i64, field: &str) -> Result<(), ApiError> {
    if id <= 0 {
        return Err(ApiError::Validation(format!(
            "{field} must be a positive integer, got {id}"
        )));
    }

    Ok(())
}

/// Validate an optional subject filter, already trimmed
pub fn validate_subject(subject: Option<&str>) -> Result<(), ApiError> {
    match subject {
        Some("") => Err(ApiError::Validation(
            "subject cannot be empty".to_string(),
        )),
        Some(s) if s.chars().count() > MAX_SUBJECT_LEN => Err(ApiError::Validation(format!(
            "subject must be at most {MAX_SUBJECT_LEN} characters"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, max = 5))]
        name: String,
    }

    #[test]
    fn test_validate_payload() {
        assert!(
            validate_payload(&Sample {
                name: "abc".to_string()
            })
            .is_ok()
        );
        assert!(matches!(
            validate_payload(&Sample {
                name: String::new()
            }),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id(42, "topic_id").is_ok());
        assert!(validate_id(0, "topic_id").is_err());
        assert!(validate_id(-3, "topic_id").is_err());
    }

    #[test]
    fn test_validate_subject() {
        assert!(validate_subject(None).is_ok());
        assert!(validate_subject(Some("算数")).is_ok());
        assert!(validate_subject(Some("math")).is_ok());
        assert!(validate_subject(Some("")).is_err());
        assert!(validate_subject(Some("科".repeat(65).as_str())).is_err());
    }
}
