//! HTTP middleware: authentication, request-id tagging, and access logging.

use crate::auth::{extract_bearer_token, validate_token, Identity};
use crate::error::ApiError;
use crate::state::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.config.auth_enabled {
        request.extensions_mut().insert(Identity("dev".to_string()));
        return Ok(next.run(request).await);
    }

    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = auth_header
        .and_then(extract_bearer_token)
        .ok_or_else(|| ApiError::Forbidden("missing bearer token".to_string()))?;

    let secret = state
        .config
        .jwt_secret
        .as_deref()
        .ok_or_else(|| ApiError::Forbidden("server has no JWT secret configured".to_string()))?;

    let claims = validate_token(token, secret)?;
    request.extensions_mut().insert(Identity(claims.sub));

    Ok(next.run(request).await)
}

#[derive(Clone)]
pub struct RequestId(pub String);

pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;
    if let Ok(value) = request_id.parse() {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        uri = %uri,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "request completed"
    );
    response
}
