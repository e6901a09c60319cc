//! Application startup and lifecycle management.
//!
//! Builds the shared state from configuration, assembles the router and runs
//! the HTTP server until a shutdown signal arrives.

use crate::config::AnswerConfig;
use crate::handlers::{
    ask, health_check, method_not_allowed, metrics_endpoint, not_found, readiness_check,
};
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::{GenerationParams, TextProvider};
use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use service_core::middleware::tracing::http_trace_layer;
use service_core::middleware::{
    cors_middleware, metrics_middleware, request_id_middleware, security_headers_middleware,
    CorsPolicy,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

/// Shared application state. Immutable once built; cloned per request.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no upstream credential is available; `/ask` then answers
    /// with a configuration error instead of calling out.
    pub text_provider: Option<Arc<dyn TextProvider>>,
    pub cors: Arc<CorsPolicy>,
    pub body_limit_bytes: usize,
    /// Sampling settings sent with every upstream call.
    pub generation: GenerationParams,
}

impl AppState {
    pub fn new(text_provider: Option<Arc<dyn TextProvider>>, cors: CorsPolicy) -> Self {
        Self {
            text_provider,
            cors: Arc::new(cors),
            body_limit_bytes: CoreConfig::default().body_limit_bytes,
            generation: GenerationParams::default(),
        }
    }

    pub fn with_generation(mut self, generation: GenerationParams) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_body_limit(mut self, body_limit_bytes: usize) -> Self {
        self.body_limit_bytes = body_limit_bytes;
        self
    }

    /// Build state from loaded configuration, constructing the Gemini client.
    pub fn from_config(config: &AnswerConfig) -> Result<Self, AppError> {
        let gemini_config = GeminiConfig {
            api_key: config.gemini.api_key.clone(),
            model: config.gemini.model.clone(),
            api_base: config.gemini.api_base.clone(),
            timeout: config.gemini.timeout,
        };
        let provider = GeminiTextProvider::new(gemini_config)
            .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;
        let text_provider: Arc<dyn TextProvider> = Arc::new(provider);

        tracing::info!(
            model = %config.gemini.model,
            temperature = ?config.gemini.temperature,
            max_output_tokens = ?config.gemini.max_output_tokens,
            "Initialized Gemini text provider"
        );

        let cors = CorsPolicy::new(
            &config.cors.allowed_origins,
            config.cors.fallback_origin.as_deref(),
        );

        Ok(Self {
            text_provider: Some(text_provider),
            cors: Arc::new(cors),
            body_limit_bytes: config.common.body_limit_bytes,
            generation: GenerationParams {
                temperature: config.gemini.temperature,
                max_tokens: config.gemini.max_output_tokens,
            },
        })
    }
}

/// Assemble the HTTP router with the full middleware stack.
pub fn build_router(state: AppState) -> Router {
    let cors = state.cors.clone();
    let body_limit = state.body_limit_bytes;

    Router::new()
        .route("/ask", post(ask).fallback(method_not_allowed))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_endpoint))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn_with_state(cors, cors_middleware))
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: AnswerConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(&config)?;
        Self::build_with_state(&config.common, state).await
    }

    /// Bind a listener for an already assembled state (port 0 = random port).
    pub async fn build_with_state(common: &CoreConfig, state: AppState) -> Result<Self, AppError> {
        let addr = format!("{}:{}", common.host, common.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Answer service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
