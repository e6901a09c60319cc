//! `POST /ask`: validate the question, query the provider, sanitize, reply.

use crate::config::API_KEY_VAR;
use crate::models::{Answer, AskResponse, Question};
use crate::services::metrics::{outcome, record_upstream_call};
use crate::services::prompt::build_prompt;
use crate::services::providers::ProviderError;
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use std::time::Instant;

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Méthode non autorisée. Utilisez POST.";
pub const INVALID_JSON_MESSAGE: &str = "Requête JSON invalide.";
pub const BODY_TOO_LARGE_MESSAGE: &str = "Requête trop volumineuse.";
pub const QUESTION_REQUIRED_MESSAGE: &str =
    "Le champ 'question' est requis et doit être une chaîne non vide.";
pub const AI_FAILURE_MESSAGE: &str = "Échec du traitement par l'IA.";
pub const INVALID_KEY_DETAILS: &str = "Clé API invalide.";

pub async fn ask(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AskResponse>, AppError> {
    let body = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(BODY_TOO_LARGE_MESSAGE.to_string())
        } else {
            AppError::BadRequest(INVALID_JSON_MESSAGE.to_string())
        }
    })?;

    let payload: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected malformed JSON body");
        AppError::BadRequest(INVALID_JSON_MESSAGE.to_string())
    })?;

    let question = Question::from_payload(&payload).map_err(|e| {
        tracing::debug!(reason = %e, "Rejected question");
        AppError::BadRequest(QUESTION_REQUIRED_MESSAGE.to_string())
    })?;

    let provider = state.text_provider.as_ref().ok_or_else(|| {
        tracing::error!("{} is not configured; refusing to call upstream", API_KEY_VAR);
        AppError::ConfigError(anyhow::anyhow!("{} n'est pas défini.", API_KEY_VAR))
    })?;

    let prompt = build_prompt(&question);
    let start = Instant::now();
    let result = provider.generate(&prompt, &state.generation).await;
    let elapsed = start.elapsed().as_secs_f64();

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            let (label, details) = match &e {
                ProviderError::InvalidCredential(_) => {
                    (outcome::INVALID_CREDENTIAL, Some(INVALID_KEY_DETAILS.to_string()))
                }
                _ => (outcome::ERROR, None),
            };
            record_upstream_call(provider.name(), label, elapsed);
            tracing::error!(provider = provider.name(), error = %e, "Upstream generation failed");
            return Err(AppError::Upstream {
                message: AI_FAILURE_MESSAGE.to_string(),
                details,
            });
        }
    };

    let Some(answer) = response.text.as_deref().and_then(Answer::from_upstream) else {
        record_upstream_call(provider.name(), outcome::EMPTY, elapsed);
        tracing::error!(
            provider = provider.name(),
            finish_reason = ?response.finish_reason,
            "Upstream returned no usable answer"
        );
        return Err(AppError::Upstream {
            message: AI_FAILURE_MESSAGE.to_string(),
            details: None,
        });
    };

    record_upstream_call(provider.name(), outcome::SUCCESS, elapsed);
    tracing::info!(
        provider = provider.name(),
        question_len = question.as_str().len(),
        answer_len = answer.as_str().len(),
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "Answered question"
    );

    Ok(Json(answer.into()))
}

/// Any method on `/ask` other than POST (OPTIONS never gets this far).
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed(METHOD_NOT_ALLOWED_MESSAGE.to_string())
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Ressource introuvable.".to_string())
}
