use sqlx::{MySql, Pool};

use crate::config::AppConfig;

const CREATE_REVIEWS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS reviews (
        id CHAR(36) NOT NULL PRIMARY KEY,
        rating INT NOT NULL,
        text TEXT NOT NULL,
        ai_response TEXT NULL,
        ai_summary TEXT NULL,
        ai_action TEXT NULL,
        created_at DATETIME(6) NOT NULL
    )
"#;

pub async fn establish_connection(config: &AppConfig) -> Result<Pool<MySql>, sqlx::Error> {
    let pool = sqlx::mysql::MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            log::error!("Failed to create database pool: {:?}", e);
            e
        })?;

    sqlx::query(CREATE_REVIEWS_TABLE)
        .execute(&pool)
        .await
        .map_err(|e| {
            log::error!("Failed to prepare reviews table: {:?}", e);
            e
        })?;

    Ok(pool)
}
