use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::db::schema::SQLITE_INIT;
use crate::error::TrackerError;

pub type SqlitePool = Pool<Sqlite>;

/// Open (creating if missing) the database at `database_url` and bootstrap the schema.
pub async fn connect(database_url: &str) -> Result<SqlitePool, TrackerError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    init_schema(&pool).await?;
    info!(database_url = %database_url, "connected to the recruitment database");
    Ok(pool)
}

/// Single-connection in-memory database; the connection is never recycled
/// so the data lives as long as the pool.
pub async fn connect_in_memory() -> Result<SqlitePool, TrackerError> {
    let connect_opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(connect_opts)
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Initialize the schema by executing the bundled DDL.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), TrackerError> {
    // sqlx::query runs a single statement at a time
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
