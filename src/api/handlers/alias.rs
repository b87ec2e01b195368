//! Handlers for the alias endpoint.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::resolver::{AliasRequest, RequestMethod};
use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the shared write secret.
pub const AUTHORIZATION_HEADER: &str = "x-authorization";

/// Resolves, creates or updates an alias.
///
/// # Endpoint
///
/// `ANY /aka/{alias}`
///
/// # Behavior
///
/// - `POST`/`PUT` with a matching `X-Authorization` header store the raw request
///   body as the alias target and redirect to it.
/// - Every other method redirects to the stored target.
///
/// All successes answer `302 Found` with a `Location` header.
///
/// # Errors
///
/// - 400 Bad Request for the reserved alias `400`
/// - 401 Unauthorized for a write with a missing or wrong secret
/// - 404 Not Found for a read of an unknown alias
/// - 500 Internal Server Error on storage failures, or when the target cannot
///   be sent as a header value (the write is already stored at that point)
pub async fn alias_handler(
    State(state): State<AppState>,
    Path(alias): Path<String>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    resolve(&state, &alias, &method, &headers, &body).await
}

/// `ANY /aka` - the empty alias, always rejected with 400.
pub async fn empty_alias_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    resolve(&state, "", &method, &headers, &body).await
}

async fn resolve(
    state: &AppState,
    alias: &str,
    method: &Method,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<Response, AppError> {
    let body = String::from_utf8_lossy(body);
    let auth_token = headers
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok());

    let request = AliasRequest {
        alias,
        method: RequestMethod::parse(method.as_str()),
        auth_token,
        body: &body,
    };

    let resolution = state.alias_service.handle(request).await?;

    found(resolution.location())
}

fn found(location: &str) -> Result<Response, AppError> {
    let value = HeaderValue::from_bytes(location.as_bytes()).map_err(|e| {
        tracing::error!(error = %e, "Redirect target is not a valid header value");
        AppError::internal(
            "Redirect target cannot be sent as a Location header",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, value)]).into_response())
}
