use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::domain::entities::{AccessToken, TokenPayload};
use crate::domain::errors::{AuthFault, TokenError};
use crate::domain::ports::{Clock, TokenHandler};

// Registered JWT claims written into every access token (epoch seconds).
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: u64,
    exp: u64,
}

/// HS256 access token signer backed by a single process-wide secret.
///
/// Expiry is checked against the injected [`Clock`] rather than the library's
/// own wall clock, so a token is rejected from the second `now >= exp`.
pub struct JwtTokenHandler<C> {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    clock: C,
}

impl<C> JwtTokenHandler<C>
where
    C: Clock,
{
    pub fn new(secret: &str, clock: C) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            clock,
        }
    }
}

impl<C> TokenHandler for JwtTokenHandler<C>
where
    C: Clock,
{
    fn issue(&self, payload: TokenPayload, ttl: Duration) -> Result<AccessToken, AuthFault> {
        let iat = self.clock.now_epoch_seconds();
        let claims = Claims {
            sub: payload.subject_id.to_string(),
            iat,
            exp: iat.saturating_add(ttl_to_seconds(ttl)),
        };

        let value = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| AuthFault::Signing(err.to_string()))?;

        Ok(AccessToken { value })
    }

    fn decode(&self, token: &AccessToken) -> Result<TokenPayload, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = jsonwebtoken::decode::<Claims>(&token.value, &self.decoding_key, &validation)
            .map_err(|err| {
                tracing::debug!(error = %err, "access token rejected");
                TokenError::InvalidToken
            })?;

        if data.claims.exp <= self.clock.now_epoch_seconds() {
            tracing::debug!(exp = data.claims.exp, "access token expired");
            return Err(TokenError::InvalidToken);
        }

        let subject_id = Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::InvalidToken)?;
        Ok(TokenPayload { subject_id })
    }
}

// JWT timestamps are whole seconds; round up so a sub-second ttl still yields
// a token that is valid when issued.
fn ttl_to_seconds(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis().div_ceil(1000)).unwrap_or(u64::MAX)
}
