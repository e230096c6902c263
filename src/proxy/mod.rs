//! Reverse proxy: forwards `/api/*` to the upstream ledger API verbatim,
//! substituting the auth header.
//!
//! Mechanical pass-through: method, body, content-type, accept, and the
//! query string travel unchanged. 401 when no token resolves, 502 when the
//! upstream is unreachable.

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::auth::bearer_token;
use crate::error::ErrorResponse;
use crate::state::AppState;

pub async fn proxy_request(
    State(state): State<AppState>,
    Path(path): Path<String>,
    request: Request,
) -> Response {
    // Inbound Authorization header wins; the configured service token is
    // the fallback.
    let token = match resolve_token(&state, request.headers()).await {
        Some(token) => token,
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Missing auth token".to_string(),
                }),
            )
                .into_response()
        }
    };

    let query = request
        .uri()
        .query()
        .map(|q| format!("?{q}"))
        .unwrap_or_default();
    let upstream_url = format!(
        "{}/api/{}{}",
        state.config.api_base_url.trim_end_matches('/'),
        path,
        query
    );

    let method = request.method().clone();
    let content_type = request.headers().get(header::CONTENT_TYPE).cloned();
    let accept = request.headers().get(header::ACCEPT).cloned();
    let forward_body = !matches!(method, axum::http::Method::GET | axum::http::Method::HEAD);

    let body = match axum::body::to_bytes(request.into_body(), usize::MAX).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Unreadable request body".to_string(),
                }),
            )
                .into_response()
        }
    };

    let reqwest_method = reqwest::Method::from_bytes(method.as_str().as_bytes())
        .unwrap_or(reqwest::Method::GET);
    let mut upstream_request = state
        .http
        .request(reqwest_method, &upstream_url)
        .bearer_auth(token);
    if let Some(content_type) = content_type.as_ref().and_then(|v| v.to_str().ok()) {
        upstream_request = upstream_request.header(header::CONTENT_TYPE.as_str(), content_type);
    }
    if let Some(accept) = accept.as_ref().and_then(|v| v.to_str().ok()) {
        upstream_request = upstream_request.header(header::ACCEPT.as_str(), accept);
    }
    if forward_body && !body.is_empty() {
        upstream_request = upstream_request.body(body.to_vec());
    }

    let upstream_response = match upstream_request.send().await {
        Ok(response) => response,
        Err(error) => {
            tracing::warn!(url = %upstream_url, error = %error, "Upstream unreachable");
            return (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: "Failed to reach upstream API".to_string(),
                }),
            )
                .into_response();
        }
    };

    forward_response(upstream_response).await
}

async fn resolve_token(state: &AppState, headers: &axum::http::HeaderMap) -> Option<String> {
    let header_token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token);
    if header_token.is_some() {
        return header_token;
    }
    state.tokens.token().await
}

async fn forward_response(upstream: reqwest::Response) -> Response {
    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let bytes = match upstream.bytes().await {
        Ok(bytes) => bytes,
        Err(_) => {
            return (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: "Failed to read upstream response".to_string(),
                }),
            )
                .into_response()
        }
    };

    let mut builder = Response::builder().status(status);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder
        .body(Body::from(bytes))
        .unwrap_or_else(|_| status.into_response())
}
