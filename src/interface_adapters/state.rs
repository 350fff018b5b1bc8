use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entities::{LocalUser, NewLocalUser};
use crate::domain::errors::RepositoryError;
use crate::domain::ports::{Authorize, Clock, FacebookAuthentication, UserRepository};

// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub authentication: Arc<dyn FacebookAuthentication>,
    pub authorize: Arc<dyn Authorize>,
    pub users: Arc<dyn UserRepository>,
}

// In-memory user repository for local runs without a database.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    // Keyed by facebook_id; one lock covers the whole find-or-insert.
    pub users: Arc<Mutex<HashMap<String, LocalUser>>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_facebook_id(
        &self,
        facebook_id: &str,
    ) -> Result<Option<LocalUser>, RepositoryError> {
        let users = self.users.lock().await;
        Ok(users.get(facebook_id).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LocalUser>, RepositoryError> {
        let users = self.users.lock().await;
        Ok(users.values().find(|user| user.id == id).cloned())
    }

    async fn upsert(&self, user: NewLocalUser) -> Result<Uuid, RepositoryError> {
        let mut users = self.users.lock().await;
        let id = match users.get_mut(&user.facebook_id) {
            Some(existing) => {
                existing.name = user.name;
                existing.email = user.email;
                existing.id
            }
            None => {
                let id = Uuid::new_v4();
                users.insert(
                    user.facebook_id.clone(),
                    LocalUser {
                        id,
                        name: user.name,
                        email: user.email,
                        facebook_id: user.facebook_id,
                    },
                );
                id
            }
        };

        Ok(id)
    }
}

// PostgreSQL-backed user repository.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pub db: PgPool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    facebook_id: String,
    name: String,
    email: String,
}

impl From<UserRow> for LocalUser {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            facebook_id: row.facebook_id,
        }
    }
}

fn storage_error(err: sqlx::Error) -> RepositoryError {
    RepositoryError(err.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_facebook_id(
        &self,
        facebook_id: &str,
    ) -> Result<Option<LocalUser>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, facebook_id, name, email FROM users WHERE facebook_id = $1",
        )
        .bind(facebook_id)
        .fetch_optional(&self.db)
        .await
        .map_err(storage_error)?;

        Ok(row.map(LocalUser::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LocalUser>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, facebook_id, name, email FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(storage_error)?;

        Ok(row.map(LocalUser::from))
    }

    // Single statement upsert; the unique facebook_id constraint settles
    // concurrent first logins and RETURNING yields the surviving id.
    async fn upsert(&self, user: NewLocalUser) -> Result<Uuid, RepositoryError> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (id, facebook_id, name, email)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (facebook_id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.facebook_id)
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(&self.db)
        .await
        .map_err(storage_error)
    }
}

// System clock adapter used by the token handler.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
