use crate::domain::entities::AuthenticationResult;
use crate::domain::ports::{FacebookAuthentication, UserRepository};
use crate::interface_adapters::middleware::AuthenticatedUser;
use crate::interface_adapters::protocol::{
    CurrentUserResponse, ErrorResponse, FacebookLoginRequest, FacebookLoginResponse,
};
use crate::interface_adapters::state::AppState;
use axum::{extract::State, http::StatusCode, Extension, Json};

// Handler exchanging a Facebook client token for a local access token.
#[tracing::instrument(name = "facebook_login", skip_all)]
pub async fn facebook_login(
    State(state): State<AppState>,
    Json(payload): Json<FacebookLoginRequest>,
) -> Result<Json<FacebookLoginResponse>, (StatusCode, Json<ErrorResponse>)> {
    let token = required_field(payload.token.as_deref(), "token")?;

    match state.authentication.perform(token).await {
        Ok(AuthenticationResult::Authenticated(access_token)) => Ok(Json(FacebookLoginResponse {
            access_token: access_token.value,
        })),
        Ok(AuthenticationResult::Rejected(_)) => {
            Err(error_response(StatusCode::UNAUTHORIZED, "unauthorized"))
        }
        Err(fault) => {
            tracing::error!(error = %fault, "facebook login failed");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &fault.to_string(),
            ))
        }
    }
}

// Handler returning the user behind the presented access token.
#[tracing::instrument(name = "current_user", skip_all, fields(user_id = %caller.user_id))]
pub async fn current_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<Json<CurrentUserResponse>, (StatusCode, Json<ErrorResponse>)> {
    let user = state
        .users
        .find_by_id(caller.user_id)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "failed to load current user");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        })?
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "user not found"))?;

    Ok(Json(CurrentUserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        facebook_id: user.facebook_id,
    }))
}

// Helper to build a JSON error response.
pub(crate) fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            message: message.to_string(),
        }),
    )
}

fn required_field<'a>(
    value: Option<&'a str>,
    field: &str,
) -> Result<&'a str, (StatusCode, Json<ErrorResponse>)> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(error_response(
            StatusCode::BAD_REQUEST,
            &format!("{field} is required"),
        )),
    }
}
