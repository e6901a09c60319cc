//! HTTP client for the `/ask` endpoint.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AskError {
    /// No complete response within the configured budget.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The service could not be reached or the exchange broke midway.
    #[error("transport error: {0}")]
    Transport(String),

    /// A success status whose body is not the expected JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The service answered with a non-success status.
    #[error("service returned HTTP {status}")]
    Server {
        status: u16,
        /// The `error` field of the body, when the body had one.
        message: Option<String>,
    },
}

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

#[derive(Deserialize)]
struct AskReply {
    response: Option<String>,
    answer: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Clone)]
pub struct AskClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl AskClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send one question and wait at most `timeout` for the whole exchange.
    ///
    /// `Ok(None)` means the service succeeded but returned no answer text.
    pub async fn ask(&self, question: &str) -> Result<Option<String>, AskError> {
        let request = self
            .http
            .post(&self.endpoint)
            .json(&AskRequest { question });

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = match tokio::time::timeout(self.timeout, exchange).await {
            Err(_) => {
                tracing::warn!(endpoint = %self.endpoint, "Ask timed out after {:?}", self.timeout);
                return Err(AskError::Timeout(self.timeout));
            }
            Ok(Err(e)) if e.is_timeout() => return Err(AskError::Timeout(self.timeout)),
            Ok(Err(e)) => {
                tracing::warn!(endpoint = %self.endpoint, "Ask transport failure: {}", e);
                return Err(AskError::Transport(e.without_url().to_string()));
            }
            Ok(Ok(parts)) => parts,
        };

        interpret(status, &body)
    }
}

fn interpret(status: StatusCode, body: &[u8]) -> Result<Option<String>, AskError> {
    if !status.is_success() {
        // Error bodies are read leniently; anything unparseable leaves no message.
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty());
        return Err(AskError::Server {
            status: status.as_u16(),
            message,
        });
    }

    let reply: AskReply = serde_json::from_slice(body)
        .map_err(|e| AskError::MalformedResponse(e.to_string()))?;

    Ok(reply
        .response
        .or(reply.answer)
        .filter(|text| !text.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_canonical_then_legacy_field() {
        let body = br#"{"response":"Loi 02-04","answer":"ignored"}"#;
        assert_eq!(
            interpret(StatusCode::OK, body).unwrap().as_deref(),
            Some("Loi 02-04")
        );

        let body = br#"{"answer":"Loi 88-07"}"#;
        assert_eq!(
            interpret(StatusCode::OK, body).unwrap().as_deref(),
            Some("Loi 88-07")
        );
    }

    #[test]
    fn empty_success_body_is_no_answer() {
        assert_eq!(interpret(StatusCode::OK, b"{}").unwrap(), None);
        assert_eq!(
            interpret(StatusCode::OK, br#"{"response":"  "}"#).unwrap(),
            None
        );
    }

    #[test]
    fn non_json_success_is_malformed() {
        let err = interpret(StatusCode::OK, b"<html></html>").unwrap_err();
        assert!(matches!(err, AskError::MalformedResponse(_)));
    }

    #[test]
    fn error_bodies_are_tolerated() {
        let err = interpret(
            StatusCode::BAD_REQUEST,
            r#"{"error":"Requête JSON invalide."}"#.as_bytes(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AskError::Server { status: 400, message: Some(ref m) } if m == "Requête JSON invalide."
        ));

        let err = interpret(StatusCode::BAD_GATEWAY, b"Bad Gateway").unwrap_err();
        assert!(matches!(
            err,
            AskError::Server {
                status: 502,
                message: None
            }
        ));
    }
}
