use color_eyre::Result;
use sqlx::{query, query_scalar, SqlitePool};
use wash_registry::{FilterState, FILTER_STORAGE_KEY};

/// Reads a stored value, `None` when the key was never written
pub async fn load_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>, sqlx::Error> {
    query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
}

/// Inserts or replaces the value stored under `key`
pub async fn save_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<(), sqlx::Error> {
    query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// The last applied filters, or the defaults when nothing usable is stored
pub async fn load_filters(pool: &SqlitePool) -> Result<FilterState> {
    let stored = load_setting(pool, FILTER_STORAGE_KEY).await?;
    Ok(stored.map_or_else(FilterState::default, |raw| FilterState::from_storage(&raw)))
}

pub async fn save_filters(pool: &SqlitePool, filters: &FilterState) -> Result<()> {
    let raw = filters.to_storage()?;
    save_setting(pool, FILTER_STORAGE_KEY, &raw).await?;
    Ok(())
}
