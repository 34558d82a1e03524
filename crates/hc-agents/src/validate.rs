use serde::Serialize;

pub const MIN_QUESTION_CHARS: usize = 5;
pub const MAX_QUESTION_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
}

impl ValidationResult {
    fn ok() -> Self {
        Self {
            valid: true,
            message: "Question is valid".to_string(),
        }
    }

    fn rejected(message: &str) -> Self {
        Self {
            valid: false,
            message: message.to_string(),
        }
    }
}

/// Check question length. The minimum applies to the trimmed text, the
/// maximum to the raw input; both count characters, not bytes.
pub fn validate_question(question: &str) -> ValidationResult {
    if question.trim().chars().count() < MIN_QUESTION_CHARS {
        return ValidationResult::rejected(
            "Question is too short. Please ask a more specific question.",
        );
    }

    if question.chars().count() > MAX_QUESTION_CHARS {
        return ValidationResult::rejected(
            "Question is too long. Please make a more concise question (maximum 500 characters).",
        );
    }

    ValidationResult::ok()
}
