use uuid::Uuid;

use crate::domain::errors::AuthenticationError;

// Identity resolved from Facebook once the full Graph API chain succeeds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteUserInfo {
    pub facebook_id: String,
    pub name: String,
    pub email: String,
}

// Local user record, uniquely keyed by the Facebook user id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub facebook_id: String,
}

// Fields written by an upsert; the repository owns id assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewLocalUser {
    pub facebook_id: String,
    pub name: String,
    pub email: String,
}

impl From<RemoteUserInfo> for NewLocalUser {
    fn from(info: RemoteUserInfo) -> Self {
        Self {
            facebook_id: info.facebook_id,
            name: info.name,
            email: info.email,
        }
    }
}

// Signed, time-bound credential handed back to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
}

// Data carried inside an access token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPayload {
    pub subject_id: Uuid,
}

// Outcome of a Facebook login attempt that completed without a fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthenticationResult {
    Authenticated(AccessToken),
    Rejected(AuthenticationError),
}
