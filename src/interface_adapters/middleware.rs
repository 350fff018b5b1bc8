use crate::domain::ports::Authorize;
use crate::interface_adapters::handlers::error_response;
use crate::interface_adapters::protocol::ErrorResponse;
use crate::interface_adapters::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use uuid::Uuid;

// Caller identity attached to requests that passed `require_access_token`.
#[derive(Clone, Copy, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

// Rejects requests without a valid `Authorization: Bearer <token>` header.
pub async fn require_access_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "unauthorized"))?;

    let user_id = state.authorize.authorize(token).map_err(|err| {
        tracing::debug!(error = %err, "access token refused");
        error_response(StatusCode::UNAUTHORIZED, "unauthorized")
    })?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { user_id });
    Ok(next.run(request).await)
}
