use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{AccessToken, LocalUser, NewLocalUser, RemoteUserInfo, TokenPayload};
use crate::domain::errors::{AuthFault, RepositoryError, TokenError};
use crate::domain::ports::{Clock, TokenHandler, UserInfoProvider, UserRepository};

pub(crate) type UserTable = Arc<Mutex<HashMap<String, LocalUser>>>;

pub(crate) const TEST_SECRET: &str = "test-signing-secret";

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0
    }
}

// Clock that tests can move forward after a token has been issued.
#[derive(Clone, Default)]
pub(crate) struct ManualClock(Arc<Mutex<u64>>);

impl ManualClock {
    pub(crate) fn starting_at(now: u64) -> Self {
        Self(Arc::new(Mutex::new(now)))
    }

    pub(crate) fn advance(&self, seconds: u64) {
        let mut guard = self.0.lock().expect("clock mutex poisoned");
        *guard += seconds;
    }
}

impl Clock for ManualClock {
    fn now_epoch_seconds(&self) -> u64 {
        *self.0.lock().expect("clock mutex poisoned")
    }
}

pub(crate) fn remote_user(facebook_id: &str, name: &str, email: &str) -> RemoteUserInfo {
    RemoteUserInfo {
        facebook_id: facebook_id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
    }
}

// Provider double returning a scripted identity and counting calls.
#[derive(Clone)]
pub(crate) struct StubUserInfoProvider {
    identity: Arc<Mutex<Option<RemoteUserInfo>>>,
    calls: Arc<AtomicUsize>,
}

impl StubUserInfoProvider {
    pub(crate) fn returning(identity: Option<RemoteUserInfo>) -> Self {
        Self {
            identity: Arc::new(Mutex::new(identity)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn set_identity(&self, identity: Option<RemoteUserInfo>) {
        *self.identity.lock().expect("identity mutex poisoned") = identity;
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserInfoProvider for StubUserInfoProvider {
    async fn load_user(&self, _client_token: &str) -> Option<RemoteUserInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.identity.lock().expect("identity mutex poisoned").clone()
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub find: bool,
    pub upsert: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingUserRepository {
    users: UserTable,
    failures: FailureFlags,
    upserts: Arc<AtomicUsize>,
}

impl RecordingUserRepository {
    pub(crate) fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            failures: FailureFlags::default(),
            upserts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_user(&self, user: LocalUser) {
        let mut guard = self.users.lock().expect("users mutex poisoned");
        guard.insert(user.facebook_id.clone(), user);
    }

    pub(crate) fn get_test_user(&self, facebook_id: &str) -> Option<LocalUser> {
        let guard = self.users.lock().expect("users mutex poisoned");
        guard.get(facebook_id).cloned()
    }

    pub(crate) fn user_count(&self) -> usize {
        self.users.lock().expect("users mutex poisoned").len()
    }

    pub(crate) fn upsert_calls(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for RecordingUserRepository {
    async fn find_by_facebook_id(
        &self,
        facebook_id: &str,
    ) -> Result<Option<LocalUser>, RepositoryError> {
        if self.failures.find {
            return Err(RepositoryError("find failed".to_string()));
        }

        Ok(self.get_test_user(facebook_id))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LocalUser>, RepositoryError> {
        if self.failures.find {
            return Err(RepositoryError("find failed".to_string()));
        }

        let guard = self.users.lock().expect("users mutex poisoned");
        Ok(guard.values().find(|user| user.id == id).cloned())
    }

    async fn upsert(&self, user: NewLocalUser) -> Result<Uuid, RepositoryError> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        if self.failures.upsert {
            return Err(RepositoryError("upsert failed".to_string()));
        }

        let mut guard = self.users.lock().expect("users mutex poisoned");
        let stored = guard
            .entry(user.facebook_id.clone())
            .or_insert_with(|| LocalUser {
                id: Uuid::new_v4(),
                name: String::new(),
                email: String::new(),
                facebook_id: user.facebook_id.clone(),
            });
        stored.name = user.name;
        stored.email = user.email;
        Ok(stored.id)
    }
}

// Signer double that always fails, for fault propagation tests.
pub(crate) struct FailingTokenHandler;

impl TokenHandler for FailingTokenHandler {
    fn issue(&self, _payload: TokenPayload, _ttl: Duration) -> Result<AccessToken, AuthFault> {
        Err(AuthFault::Signing("signer misconfigured".to_string()))
    }

    fn decode(&self, _token: &AccessToken) -> Result<TokenPayload, TokenError> {
        Err(TokenError::InvalidToken)
    }
}
