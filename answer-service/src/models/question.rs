use serde_json::Value;
use thiserror::Error;

/// Canonical request field.
pub const QUESTION_FIELD: &str = "question";
/// Field name used by older front-ends; still accepted on input.
pub const LEGACY_QUESTION_FIELD: &str = "prompt";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question field is missing")]
    Missing,
    #[error("question field is not a string")]
    NotAString,
    #[error("question is empty")]
    Empty,
}

/// A caller's question, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(String);

impl Question {
    pub fn parse(raw: &str) -> Result<Self, QuestionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QuestionError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Extract the question from a decoded request body.
    ///
    /// `question` wins over the legacy `prompt` key when both are present.
    pub fn from_payload(payload: &Value) -> Result<Self, QuestionError> {
        // A null field counts as absent.
        let present = |key: &str| payload.get(key).filter(|v| !v.is_null());
        let field = present(QUESTION_FIELD)
            .or_else(|| present(LEGACY_QUESTION_FIELD))
            .ok_or(QuestionError::Missing)?;

        match field {
            Value::String(text) => Self::parse(text),
            _ => Err(QuestionError::NotAString),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trims_surrounding_whitespace() {
        let q = Question::parse("  Qu'est-ce que le CHS ?\n").unwrap();
        assert_eq!(q.as_str(), "Qu'est-ce que le CHS ?");
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(Question::parse(""), Err(QuestionError::Empty));
        assert_eq!(Question::parse(" \t\n "), Err(QuestionError::Empty));
    }

    #[test]
    fn rejects_non_string_values() {
        for payload in [
            json!({ "question": 42 }),
            json!({ "question": ["a"] }),
            json!({ "question": { "text": "a" } }),
            json!({ "question": true }),
        ] {
            assert_eq!(
                Question::from_payload(&payload),
                Err(QuestionError::NotAString)
            );
        }
    }

    #[test]
    fn missing_or_null_field_is_missing() {
        assert_eq!(
            Question::from_payload(&json!({})),
            Err(QuestionError::Missing)
        );
        assert_eq!(
            Question::from_payload(&json!({ "question": null })),
            Err(QuestionError::Missing)
        );
        assert_eq!(
            Question::from_payload(&json!("just a string")),
            Err(QuestionError::Missing)
        );
    }

    #[test]
    fn accepts_legacy_prompt_field() {
        let q = Question::from_payload(&json!({ "prompt": "Loi 02-04 ?" })).unwrap();
        assert_eq!(q.as_str(), "Loi 02-04 ?");
    }

    #[test]
    fn null_question_falls_back_to_prompt() {
        let q = Question::from_payload(&json!({ "question": null, "prompt": "CHS ?" })).unwrap();
        assert_eq!(q.as_str(), "CHS ?");
    }

    #[test]
    fn canonical_field_takes_precedence() {
        let q = Question::from_payload(&json!({ "question": "A", "prompt": "B" })).unwrap();
        assert_eq!(q.as_str(), "A");
    }
}
