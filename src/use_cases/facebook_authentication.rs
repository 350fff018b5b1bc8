use async_trait::async_trait;
use std::time::Duration;

use crate::domain::entities::{AuthenticationResult, NewLocalUser, TokenPayload};
use crate::domain::errors::{AuthFault, AuthenticationError};
use crate::domain::ports::{FacebookAuthentication, TokenHandler, UserInfoProvider, UserRepository};

// Facebook login use case with injected dependencies.
pub struct FacebookAuthenticationUseCase<P, R, T> {
    pub provider: P,
    pub users: R,
    pub tokens: T,
    pub token_ttl: Duration,
}

impl<P, R, T> FacebookAuthenticationUseCase<P, R, T>
where
    P: UserInfoProvider,
    R: UserRepository,
    T: TokenHandler,
{
    pub async fn execute(&self, client_token: &str) -> Result<AuthenticationResult, AuthFault> {
        let Some(remote) = self.provider.load_user(client_token).await else {
            tracing::info!("facebook rejected client token");
            return Ok(AuthenticationResult::Rejected(AuthenticationError));
        };

        let first_login = self
            .users
            .find_by_facebook_id(&remote.facebook_id)
            .await?
            .is_none();

        // The repository returns the persisted id, so repeat logins keep it.
        let user_id = self.users.upsert(NewLocalUser::from(remote)).await?;
        tracing::info!(%user_id, first_login, "facebook user resolved");

        let access_token = self.tokens.issue(
            TokenPayload {
                subject_id: user_id,
            },
            self.token_ttl,
        )?;

        Ok(AuthenticationResult::Authenticated(access_token))
    }
}

#[async_trait]
impl<P, R, T> FacebookAuthentication for FacebookAuthenticationUseCase<P, R, T>
where
    P: UserInfoProvider,
    R: UserRepository,
    T: TokenHandler,
{
    async fn perform(&self, client_token: &str) -> Result<AuthenticationResult, AuthFault> {
        self.execute(client_token).await
    }
}
