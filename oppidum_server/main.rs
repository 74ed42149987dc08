use std::sync::Arc;

use oppidum_app::{config::Config, ticker::CombatTicker};
use oppidum_db::{establish_connection_pool, uow::PostgresUnitOfWorkProvider};
use oppidum_types::errors::{ApplicationError, Result};

mod logs;
use logs::setup_logging;

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    let _log_guard = setup_logging();

    let config = Arc::new(Config::from_env());
    let db_pool = establish_connection_pool().await?;

    sqlx::migrate!("../migrations")
        .run(&db_pool)
        .await
        .map_err(|e| ApplicationError::Unknown(e.to_string()))?;

    let uow_provider = Arc::new(PostgresUnitOfWorkProvider::new(db_pool));
    let ticker = Arc::new(CombatTicker::new(uow_provider, config.clone()));

    tracing::info!(
        game_speed = config.game_speed,
        combat_tick_secs = config.combat_tick_secs,
        "Starting combat ticker."
    );
    ticker.run();

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| ApplicationError::Infrastructure(e.to_string()))?;
    tracing::info!("Shutting down.");

    Ok(())
}
