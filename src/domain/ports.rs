use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::entities::{
    AccessToken, AuthenticationResult, LocalUser, NewLocalUser, RemoteUserInfo, TokenPayload,
};
use crate::domain::errors::{AuthFault, RepositoryError, TokenError};

// Port for resolving a verified identity from a Facebook client token.
// Any failure along the way is reported as `None`.
#[async_trait]
pub trait UserInfoProvider: Send + Sync {
    async fn load_user(&self, client_token: &str) -> Option<RemoteUserInfo>;
}

// Port for local user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_facebook_id(
        &self,
        facebook_id: &str,
    ) -> Result<Option<LocalUser>, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<LocalUser>, RepositoryError>;
    // Create-or-update keyed by facebook_id. Must be atomic for that key and
    // must return the persisted id.
    async fn upsert(&self, user: NewLocalUser) -> Result<Uuid, RepositoryError>;
}

// Port for signing and verifying access tokens.
pub trait TokenHandler: Send + Sync {
    fn issue(&self, payload: TokenPayload, ttl: Duration) -> Result<AccessToken, AuthFault>;
    fn decode(&self, token: &AccessToken) -> Result<TokenPayload, TokenError>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}

// Inbound port consumed by the login handler.
#[async_trait]
pub trait FacebookAuthentication: Send + Sync {
    async fn perform(&self, client_token: &str) -> Result<AuthenticationResult, AuthFault>;
}

// Inbound port consumed by the access token middleware.
pub trait Authorize: Send + Sync {
    fn authorize(&self, access_token: &str) -> Result<Uuid, TokenError>;
}

// Shared adapters are handed to several use cases behind an `Arc`.
#[async_trait]
impl<T> UserRepository for Arc<T>
where
    T: UserRepository + ?Sized,
{
    async fn find_by_facebook_id(
        &self,
        facebook_id: &str,
    ) -> Result<Option<LocalUser>, RepositoryError> {
        (**self).find_by_facebook_id(facebook_id).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LocalUser>, RepositoryError> {
        (**self).find_by_id(id).await
    }

    async fn upsert(&self, user: NewLocalUser) -> Result<Uuid, RepositoryError> {
        (**self).upsert(user).await
    }
}

impl<T> TokenHandler for Arc<T>
where
    T: TokenHandler + ?Sized,
{
    fn issue(&self, payload: TokenPayload, ttl: Duration) -> Result<AccessToken, AuthFault> {
        (**self).issue(payload, ttl)
    }

    fn decode(&self, token: &AccessToken) -> Result<TokenPayload, TokenError> {
        (**self).decode(token)
    }
}
