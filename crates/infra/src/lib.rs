mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::*;
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::{info, warn};

#[derive(Clone)]
pub struct TeamdeskContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub dispatcher: Arc<dyn IMessageDispatcher>,
}

impl TeamdeskContext {
    async fn create(postgres_connection_string: &str) -> anyhow::Result<Self> {
        let repos = Repos::create_postgres(postgres_connection_string).await?;
        let config = Config::new();
        let dispatcher = create_dispatcher(&config);
        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            dispatcher,
        })
    }

    /// Context backed by in memory repositories, messages are kept by an `InMemoryDispatcher`
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            dispatcher: Arc::new(InMemoryDispatcher::new()),
        }
    }
}

fn create_dispatcher(config: &Config) -> Arc<dyn IMessageDispatcher> {
    match &config.telegram_bot_token {
        Some(token) => Arc::new(TelegramDispatcher::new(token.clone())),
        None => Arc::new(DisabledDispatcher {}),
    }
}

/// Will setup the infrastructure context given the environment.
///
/// Without a `DATABASE_URL` everything is kept in memory and lost on restart.
pub async fn setup_context() -> anyhow::Result<TeamdeskContext> {
    match get_psql_connection_string() {
        Some(connection_string) => TeamdeskContext::create(&connection_string).await,
        None => {
            warn!("DATABASE_URL is not set, using in memory repositories");
            let mut ctx = TeamdeskContext::create_inmemory();
            ctx.dispatcher = create_dispatcher(&ctx.config);
            Ok(ctx)
        }
    }
}

fn get_psql_connection_string() -> Option<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING).ok()
}

/// Applies the embedded migrations. Does nothing without a `DATABASE_URL`.
pub async fn run_migration() -> Result<(), MigrateError> {
    let connection_string = match get_psql_connection_string() {
        Some(connection_string) => connection_string,
        None => return Ok(()),
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&connection_string)
        .await?;

    info!("Running database migrations");
    sqlx::migrate!().run(&pool).await
}
