use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Any tag alone on the fence line, or a known tag followed by text on the same line.
static LEADING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^```(?:[a-z0-9_+\-]+[ \t]*(?:\r?\n|$)|(?:html|markdown|md|javascript|js|typescript|ts|python|py|json|text|txt|plaintext)\b)?\s*",
    )
    .expect("leading fence pattern is valid")
});

static TRAILING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*```\s*$").expect("trailing fence pattern is valid"));

/// Model output with code-fence wrapping removed. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer(String);

impl Answer {
    /// Clean raw upstream text; `None` when nothing is left.
    pub fn from_upstream(raw: &str) -> Option<Self> {
        let cleaned = sanitize(raw);
        if cleaned.is_empty() {
            None
        } else {
            Some(Self(cleaned))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Strip one optional leading fence (with optional language tag) and one
/// optional trailing fence, then trim.
pub fn sanitize(raw: &str) -> String {
    let text = raw.trim();
    let text = LEADING_FENCE.replace(text, "");
    let text = TRAILING_FENCE.replace(&text, "");
    text.trim().to_string()
}

/// Success body of `POST /ask`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub response: String,
}

impl From<Answer> for AskResponse {
    fn from(answer: Answer) -> Self {
        Self {
            response: answer.into_inner(),
        }
    }
}
