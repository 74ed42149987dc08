use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use oppidum_types::errors::{ApplicationError, DbError};

pub mod mapping;
pub mod models;
pub mod repository;
pub mod uow;

pub async fn establish_connection_pool() -> Result<PgPool, ApplicationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| ApplicationError::Infrastructure("DATABASE_URL must be set".to_string()))?;

    PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))
}
