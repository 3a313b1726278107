use color_eyre::eyre::eyre;
use dotenv::dotenv;
use std::env;
use std::path::{Path, PathBuf};
use wash_registry::BoundarySchema;

pub const DEFAULT_DATA_URL: &str = "http://localhost:8080";
pub const DEFAULT_DATABASE_NAME: &str = "wash-registry.db";
pub const DEFAULT_LOG_FILE: &str = "wash-registry.log";

/// Runtime configuration, read from the environment after `.env` and CLI overrides.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL or local directory holding the `api/` documents.
    pub data_source: String,
    pub database_url: String,
    pub scan_feed: Option<PathBuf>,
    pub log_file: PathBuf,
    pub schema: BoundarySchema,
}

impl AppConfig {
    pub fn load() -> color_eyre::eyre::Result<Self> {
        dotenv().ok();

        let base_dir = env::current_dir()?;
        let db_name =
            env::var("DATABASE_NAME").unwrap_or_else(|_| DEFAULT_DATABASE_NAME.to_string());
        let database_path = base_dir.join(db_name);

        if let Some(parent) = database_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(Self {
            data_source: get_data_source(),
            database_url: database_url_for(&database_path)?,
            scan_feed: get_scan_feed(),
            log_file: get_log_file(),
            schema: get_boundary_schema(),
        })
    }
}

/// SQLx wants `sqlite:///abs/path` for absolute paths and `sqlite://rel/path` otherwise.
pub fn database_url_for(database_path: &Path) -> color_eyre::eyre::Result<String> {
    let path_str = database_path
        .to_str()
        .ok_or_else(|| eyre!("Invalid database path"))?;
    let clean_path = path_str.trim_start_matches('/');

    Ok(if database_path.is_absolute() {
        format!("sqlite:///{clean_path}")
    } else {
        format!("sqlite://{clean_path}")
    })
}

pub fn get_data_source() -> String {
    env::var("WASH_DATA_URL")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DATA_URL.to_string())
}

pub fn get_scan_feed() -> Option<PathBuf> {
    env::var("WASH_SCAN_FEED")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

pub fn get_log_file() -> PathBuf {
    env::var("WASH_LOG_FILE").map_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from)
}

/// Boundary property names; unset variables keep the defaults.
pub fn get_boundary_schema() -> BoundarySchema {
    let mut schema = BoundarySchema::default();
    if let Ok(county) = env::var("WASH_COUNTY_PROPERTY") {
        schema.county_property = county;
    }
    if let Ok(district) = env::var("WASH_DISTRICT_PROPERTY") {
        schema.district_property = district;
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_get_three_slashes() {
        let url = database_url_for(Path::new("/var/lib/wash/registry.db")).unwrap();
        assert_eq!(url, "sqlite:///var/lib/wash/registry.db");
    }

    #[test]
    fn relative_paths_get_two_slashes() {
        let url = database_url_for(Path::new("data/registry.db")).unwrap();
        assert_eq!(url, "sqlite://data/registry.db");
    }
}
