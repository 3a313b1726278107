use crate::config::AppConfig;
use crate::data::DataSource;
use crate::db::{create_database_pool, load_filters, save_filters};
use color_eyre::Result;
use sqlx::SqlitePool;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use wash_registry::{BoundarySchema, DocumentKind, DocumentLoad, FilterState};

/// Side effects the app needs: the settings store and the document source.
#[derive(Debug)]
pub struct AppActions {
    pub database_url: String,
    pub db_pool: Option<SqlitePool>,
    pub source: DataSource,
    pub schema: BoundarySchema,
    loads_tx: UnboundedSender<DocumentLoad>,
    loads_rx: UnboundedReceiver<DocumentLoad>,
    in_flight: usize,
}

impl AppActions {
    pub fn new(config: &AppConfig) -> Self {
        let (loads_tx, loads_rx) = mpsc::unbounded_channel();
        Self {
            database_url: config.database_url.clone(),
            db_pool: None,
            source: DataSource::from_location(&config.data_source),
            schema: config.schema.clone(),
            loads_tx,
            loads_rx,
            in_flight: 0,
        }
    }

    pub async fn initialize(&mut self) -> Result<()> {
        self.db_pool = Some(create_database_pool(&self.database_url).await?);
        Ok(())
    }

    pub async fn load_filters(&self) -> Result<FilterState> {
        load_filters(self.pool()?).await
    }

    pub async fn save_filters(&self, filters: &FilterState) -> Result<()> {
        save_filters(self.pool()?, filters).await
    }

    /// Fetch `kind` in the background; the result is picked up by [`Self::next_load`].
    pub fn spawn_load(&mut self, kind: DocumentKind) {
        let source = self.source.clone();
        let schema = self.schema.clone();
        let sender = self.loads_tx.clone();
        self.in_flight += 1;
        debug!(document = kind.label(), "load started");

        tokio::spawn(async move {
            let load = source.fetch(kind, &schema).await;
            if sender.send(load).is_err() {
                warn!(document = kind.label(), "load finished after shutdown");
            }
        });
    }

    pub fn next_load(&mut self) -> Option<DocumentLoad> {
        let load = self.loads_rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(load)
    }

    /// Loads spawned but not yet picked up.
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub const fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    fn pool(&self) -> Result<&SqlitePool> {
        self.db_pool
            .as_ref()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database not initialized"))
    }
}
