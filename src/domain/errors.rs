use thiserror::Error;

// Authentication legitimately failed. Returned as data, never as a fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("authentication failed")]
pub struct AuthenticationError;

// Access token could not be verified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("invalid token")]
    InvalidToken,
}

// Persistence failure surfaced by a user repository.
#[derive(Debug, Error)]
#[error("user storage failure: {0}")]
pub struct RepositoryError(pub String);

// Failures the system cannot recover from while serving a request.
#[derive(Debug, Error)]
pub enum AuthFault {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("token signing failed: {0}")]
    Signing(String),
}
