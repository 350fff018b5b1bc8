use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::domain::entities::RemoteUserInfo;
use crate::domain::ports::UserInfoProvider;

pub const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com";

// Application credentials issued by Facebook for this backend.
#[derive(Clone, Debug)]
pub struct FacebookCredentials {
    pub client_id: String,
    pub client_secret: String,
}

// App-level grant obtained with the client credentials flow.
#[derive(Debug, Deserialize)]
pub struct AppToken {
    pub access_token: String,
}

// Result of introspecting a client token with the app token.
#[derive(Debug)]
pub struct DebugTokenInfo {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
struct DebugTokenResponse {
    data: DebugTokenData,
}

#[derive(Debug, Deserialize)]
struct DebugTokenData {
    user_id: Option<String>,
    is_valid: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct FacebookProfile {
    id: String,
    name: String,
    email: String,
}

#[derive(Debug, Deserialize)]
struct GraphErrorResponse {
    error: GraphErrorBody,
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    message: String,
}

#[derive(Debug, Error)]
pub enum FacebookApiError {
    #[error("facebook transport error: {0}")]
    Transport(reqwest::Error),
    #[error("facebook upstream error {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Upstream {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("facebook response decode error: {0}")]
    Decode(reqwest::Error),
    #[error("facebook reported the client token as invalid")]
    InvalidClientToken,
    #[error("invalid graph api url: {0}")]
    Url(String),
}

/// Graph API client resolving a user from a Facebook client token.
///
/// Resolution is three dependent calls: an app token from the client
/// credentials grant, `debug_token` introspection of the client token, then a
/// profile fetch authenticated with the client token itself. Each call is
/// bounded by the client timeout and none are retried.
#[derive(Clone)]
pub struct FacebookApi {
    http: Client,
    base_url: String,
    credentials: FacebookCredentials,
}

impl FacebookApi {
    pub fn new(
        base_url: impl Into<String>,
        credentials: FacebookCredentials,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            credentials,
        })
    }

    pub async fn app_token(&self) -> Result<AppToken, FacebookApiError> {
        self.get_json(
            &["oauth", "access_token"],
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ],
        )
        .await
    }

    pub async fn debug_token(
        &self,
        app_token: &AppToken,
        client_token: &str,
    ) -> Result<DebugTokenInfo, FacebookApiError> {
        let response: DebugTokenResponse = self
            .get_json(
                &["debug_token"],
                &[
                    ("access_token", app_token.access_token.as_str()),
                    ("input_token", client_token),
                ],
            )
            .await?;

        if response.data.is_valid == Some(false) {
            return Err(FacebookApiError::InvalidClientToken);
        }

        response
            .data
            .user_id
            .filter(|user_id| !user_id.is_empty())
            .map(|user_id| DebugTokenInfo { user_id })
            .ok_or(FacebookApiError::InvalidClientToken)
    }

    pub async fn user_info(
        &self,
        debug_token: &DebugTokenInfo,
        client_token: &str,
    ) -> Result<RemoteUserInfo, FacebookApiError> {
        let profile: FacebookProfile = self
            .get_json(
                &[debug_token.user_id.as_str()],
                &[("fields", "id,name,email"), ("access_token", client_token)],
            )
            .await?;

        Ok(RemoteUserInfo {
            facebook_id: profile.id,
            name: profile.name,
            email: profile.email,
        })
    }

    #[tracing::instrument(name = "facebook_resolve_user", skip_all)]
    async fn resolve(&self, client_token: &str) -> Result<RemoteUserInfo, FacebookApiError> {
        let app_token = self.app_token().await.inspect_err(|err| {
            tracing::warn!(step = "app_token", error = %err, "facebook call failed");
        })?;
        let debug_token = self
            .debug_token(&app_token, client_token)
            .await
            .inspect_err(|err| {
                tracing::warn!(step = "debug_token", error = %err, "facebook call failed");
            })?;
        self.user_info(&debug_token, client_token)
            .await
            .inspect_err(|err| {
                tracing::warn!(step = "user_info", error = %err, "facebook call failed");
            })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<T, FacebookApiError> {
        let url = self.graph_url(segments, params)?;
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(FacebookApiError::Transport)?;
        let status = res.status();

        // Keep Graph's error message for the logs; the caller only sees absence.
        if !status.is_success() {
            let message = res
                .json::<GraphErrorResponse>()
                .await
                .ok()
                .map(|payload| payload.error.message);
            return Err(FacebookApiError::Upstream { status, message });
        }

        res.json::<T>().await.map_err(FacebookApiError::Decode)
    }

    fn graph_url(&self, segments: &[&str], params: &[(&str, &str)]) -> Result<Url, FacebookApiError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|err| FacebookApiError::Url(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| FacebookApiError::Url(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().extend_pairs(params.iter());
        Ok(url)
    }
}

#[async_trait]
impl UserInfoProvider for FacebookApi {
    async fn load_user(&self, client_token: &str) -> Option<RemoteUserInfo> {
        self.resolve(client_token).await.ok()
    }
}
