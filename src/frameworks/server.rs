// Framework bootstrap for the auth server runtime.

use crate::domain::ports::UserRepository;
use crate::frameworks::config::AppConfig;
use crate::frameworks::db;
use crate::interface_adapters::facebook_api::{FacebookApi, FacebookCredentials};
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::{
    AppState, InMemoryUserRepository, PostgresUserRepository, SystemClock,
};
use crate::interface_adapters::token_handler::JwtTokenHandler;
use crate::use_cases::authorize::AuthorizeUseCase;
use crate::use_cases::facebook_authentication::FacebookAuthenticationUseCase;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build facebook http client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error(transparent)]
    UserStore(#[from] db::StoreSetupError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return;
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind");
            return;
        }
    };

    if let Err(e) = serve(listener, config).await {
        tracing::error!(error = %e, "server error");
    }
}

// Serve on an already bound listener; integration tests bind an ephemeral port.
pub async fn serve(listener: tokio::net::TcpListener, config: AppConfig) -> Result<(), StartupError> {
    let address = listener.local_addr()?;
    let state = build_state(&config).await?;

    tracing::info!(%address, "listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

pub async fn build_state(config: &AppConfig) -> Result<AppState, StartupError> {
    let users: Arc<dyn UserRepository> = match &config.database_url {
        Some(database_url) => {
            let db = db::connect_user_store(database_url).await?;
            Arc::new(PostgresUserRepository { db })
        }
        None => {
            tracing::warn!("DATABASE_URL not set; users are kept in memory");
            Arc::new(InMemoryUserRepository::default())
        }
    };

    let provider = FacebookApi::new(
        config.facebook.graph_url.clone(),
        FacebookCredentials {
            client_id: config.facebook.client_id.clone(),
            client_secret: config.facebook.client_secret.clone(),
        },
        config.facebook_timeout(),
    )?;
    tracing::debug!(graph_url = %config.facebook.graph_url, "facebook client configured.");

    let tokens = Arc::new(JwtTokenHandler::new(&config.token.secret, SystemClock));

    let authentication = FacebookAuthenticationUseCase {
        provider,
        users: users.clone(),
        tokens: tokens.clone(),
        token_ttl: config.token_ttl(),
    };

    Ok(AppState {
        authentication: Arc::new(authentication),
        authorize: Arc::new(AuthorizeUseCase { tokens }),
        users,
    })
}
