use uuid::Uuid;

use crate::domain::entities::AccessToken;
use crate::domain::errors::TokenError;
use crate::domain::ports::{Authorize, TokenHandler};

// Access token verification use case with injected dependencies.
pub struct AuthorizeUseCase<T> {
    pub tokens: T,
}

impl<T> AuthorizeUseCase<T>
where
    T: TokenHandler,
{
    pub fn execute(&self, access_token: &str) -> Result<Uuid, TokenError> {
        let payload = self.tokens.decode(&AccessToken {
            value: access_token.to_string(),
        })?;

        Ok(payload.subject_id)
    }
}

impl<T> Authorize for AuthorizeUseCase<T>
where
    T: TokenHandler,
{
    fn authorize(&self, access_token: &str) -> Result<Uuid, TokenError> {
        self.execute(access_token)
    }
}
