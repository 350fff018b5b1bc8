use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Request payload for Facebook login. A missing token is reported by the
// handler as a validation error rather than rejected by the extractor.
#[derive(Debug, Deserialize)]
pub struct FacebookLoginRequest {
    #[serde(default)]
    pub token: Option<String>,
}

// Response payload for a successful Facebook login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacebookLoginResponse {
    pub access_token: String,
}

// Response payload describing the authenticated caller.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub facebook_id: String,
}

// Simple error envelope for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
