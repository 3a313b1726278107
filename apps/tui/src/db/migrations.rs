use color_eyre::Result;
use sqlx::{migrate::MigrateDatabase, query, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};
use tracing::{debug, info};

/// Creates the key/value settings table if it doesn't exist
pub async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    query(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Creates a connection pool for `database_url`, creating the file on first run
pub async fn create_database_pool(database_url: &str) -> Result<SqlitePool> {
    info!(%database_url, "opening settings database");

    let db_path = extract_db_path_from_url(database_url)?;
    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!(dir = %parent.display(), "creating database directory");
            std::fs::create_dir_all(parent)
                .map_err(|e| color_eyre::eyre::eyre!("Failed to create database directory: {e}"))?;
        }
    }

    let db_exists = Sqlite::database_exists(database_url)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Error checking database: {e}"))?;

    if !db_exists {
        info!("settings database does not exist, creating it");
        Sqlite::create_database(database_url)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to create SQLite database: {e}"))?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _| {
            Box::pin(async move {
                use sqlx::Executor as _;
                conn.execute("PRAGMA journal_mode = WAL;").await?;
                conn.execute("PRAGMA synchronous = NORMAL;").await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to connect to SQLite database: {e}"))?;

    setup_database(&pool)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to set up database schema: {e}"))?;

    debug!("settings database ready");
    Ok(pool)
}

/// Path part of a `sqlite://` URL; absolute paths keep their leading slash
fn extract_db_path_from_url(url: &str) -> Result<String> {
    let path_part = url
        .strip_prefix("sqlite://")
        .ok_or_else(|| color_eyre::eyre::eyre!("Not a valid SQLite URL: {url}"))?;

    if cfg!(windows) {
        if let Some(stripped) = path_part.strip_prefix('/') {
            if stripped.find(':') == Some(1) {
                return Ok(stripped.to_string());
            }
        }
    }

    Ok(path_part.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_paths_from_sqlite_urls() {
        assert_eq!(
            extract_db_path_from_url("sqlite:///tmp/wash.db").unwrap(),
            "/tmp/wash.db"
        );
        assert_eq!(
            extract_db_path_from_url("sqlite://wash.db").unwrap(),
            "wash.db"
        );
        assert!(extract_db_path_from_url("postgres://wash").is_err());
    }

    #[tokio::test]
    async fn setup_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
        let pool = SqlitePool::connect("sqlite::memory:").await?;
        setup_database(&pool).await?;
        setup_database(&pool).await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM settings")
            .fetch_one(&pool)
            .await?;
        assert_eq!(count, 0);

        Ok(())
    }
}
