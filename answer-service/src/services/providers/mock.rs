//! Mock provider implementation for testing.

use super::{
    FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text.
    Text(String),
    /// Return a response without any text.
    Empty,
    /// Fail as if the upstream rejected the credential.
    InvalidCredential,
    /// Fail as if the network dropped.
    NetworkFailure,
}

/// Scripted text provider that records every prompt it receives.
pub struct MockTextProvider {
    reply: MockReply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Shorthand for a provider that always answers `text`.
    pub fn answering(text: impl Into<String>) -> Self {
        Self::new(MockReply::Text(text.into()))
    }

    /// Number of `generate` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let text = match &self.reply {
            MockReply::Text(text) => Some(text.clone()),
            MockReply::Empty => None,
            MockReply::InvalidCredential => {
                return Err(ProviderError::InvalidCredential(
                    "API_KEY_INVALID".to_string(),
                ))
            }
            MockReply::NetworkFailure => {
                return Err(ProviderError::NetworkError(
                    "connection reset".to_string(),
                ))
            }
        };

        Ok(ProviderResponse {
            output_tokens: text.as_ref().map(|t| t.len() as i32 / 4).unwrap_or(0),
            text,
            input_tokens: prompt.len() as i32 / 4,
            finish_reason: FinishReason::Complete,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match self.reply {
            MockReply::InvalidCredential => Err(ProviderError::InvalidCredential(
                "API_KEY_INVALID".to_string(),
            )),
            MockReply::NetworkFailure => {
                Err(ProviderError::NetworkError("unreachable".to_string()))
            }
            _ => Ok(()),
        }
    }
}
