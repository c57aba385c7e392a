use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use ledgerly_core::{
    db,
    expenses::{ExpenseRepository, ExpenseService, ExpenseServiceTrait},
    stats::{StatsRepository, StatsService, StatsServiceTrait},
    trackables::{TrackableRepository, TrackableService, TrackableServiceTrait},
    users::{UserRepository, UserService, UserServiceTrait},
};

use crate::{auth::AuthManager, config::Config};

pub struct AppState {
    pub trackable_service: Arc<dyn TrackableServiceTrait>,
    pub expense_service: Arc<dyn ExpenseServiceTrait>,
    pub stats_service: Arc<dyn StatsServiceTrait>,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub auth: Arc<AuthManager>,
}

pub fn init_tracing() {
    let fmt_layer = fmt::layer().json().with_current_span(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;

    let trackable_repository = Arc::new(TrackableRepository::new(pool.clone()));
    let trackable_service = Arc::new(TrackableService::new(trackable_repository));

    let expense_repository = Arc::new(ExpenseRepository::new(pool.clone()));
    let expense_service = Arc::new(ExpenseService::new(expense_repository));

    let stats_repository = Arc::new(StatsRepository::new(pool.clone()));
    let stats_service = Arc::new(StatsService::new(stats_repository));

    let user_repository = Arc::new(UserRepository::new(pool.clone()));
    let user_service = Arc::new(UserService::new(user_repository));

    let auth = Arc::new(AuthManager::new(&config.jwt_secret, config.token_ttl)?);

    Ok(Arc::new(AppState {
        trackable_service,
        expense_service,
        stats_service,
        user_service,
        auth,
    }))
}
