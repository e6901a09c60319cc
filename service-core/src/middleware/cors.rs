//! Allow-list CORS policy.
//!
//! Every response carries an `Access-Control-Allow-Origin` value: the caller's
//! origin when it is on the allow-list, the canonical fallback origin otherwise,
//! or `*` when the allow-list contains a wildcard. Preflight requests are
//! answered here and never reach the route handlers.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

const ALLOW_METHODS: &str = "POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type";

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: Vec<HeaderValue>,
    fallback_origin: HeaderValue,
    allow_any: bool,
}

impl CorsPolicy {
    /// Build a policy from configured origin strings.
    ///
    /// Origins that are not valid header values are logged and skipped.
    /// Without an explicit fallback the first allowed origin is used; an empty
    /// allow-list degrades to the wildcard.
    pub fn new<I, S>(allowed_origins: I, fallback_origin: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allow_any = false;
        let mut origins = Vec::new();

        for origin in allowed_origins {
            let origin = normalize(origin.as_ref());
            if origin.is_empty() {
                continue;
            }
            if origin == "*" {
                allow_any = true;
                continue;
            }
            match origin.parse::<HeaderValue>() {
                Ok(value) => origins.push(value),
                Err(e) => tracing::error!("Invalid CORS origin '{}': {}. Skipping.", origin, e),
            }
        }

        let fallback = fallback_origin
            .map(normalize)
            .filter(|o| !o.is_empty())
            .and_then(|o| match o.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::error!("Invalid CORS fallback origin '{}': {}", o, e);
                    None
                }
            })
            .or_else(|| origins.first().cloned());

        let fallback_origin = match fallback {
            Some(value) => value,
            None => {
                allow_any = true;
                HeaderValue::from_static("*")
            }
        };

        Self {
            allowed_origins: origins,
            fallback_origin,
            allow_any,
        }
    }

    /// Policy granting `*` to everyone.
    pub fn permissive() -> Self {
        Self::new(["*"], None)
    }

    /// The `Access-Control-Allow-Origin` value for a request from `origin`.
    pub fn resolve_origin(&self, origin: Option<&HeaderValue>) -> HeaderValue {
        if self.allow_any {
            return HeaderValue::from_static("*");
        }

        origin
            .and_then(|o| self.allowed_origins.iter().find(|allowed| *allowed == o))
            .cloned()
            .unwrap_or_else(|| self.fallback_origin.clone())
    }

    fn apply(&self, headers: &mut HeaderMap, allow_origin: HeaderValue) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        if !self.allow_any {
            headers.append(header::VARY, HeaderValue::from_static("origin"));
        }
    }
}

fn normalize(origin: &str) -> &str {
    origin.trim().trim_end_matches('/')
}

pub async fn cors_middleware(
    State(policy): State<Arc<CorsPolicy>>,
    req: Request,
    next: Next,
) -> Response {
    let allow_origin = policy.resolve_origin(req.headers().get(header::ORIGIN));

    if req.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        policy.apply(response.headers_mut(), allow_origin);
        return response;
    }

    let mut response = next.run(req).await;
    policy.apply(response.headers_mut(), allow_origin);
    response
}
