use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use tracing::{info, warn};
use wash_registry::{AssetDistribution, Dataset, DocumentLoad, FilterState, WashSummary};

use crate::app::{handle_input, App};
use crate::config::AppConfig;
use crate::data::DataSource;
use crate::db::{create_database_pool, load_filters};
use crate::ui;

/// Run the application in headless mode (no UI)
pub async fn run_headless(config: &AppConfig, json: bool) -> Result<()> {
    let filters = match create_database_pool(&config.database_url).await {
        Ok(pool) => load_filters(&pool).await?,
        Err(error) => {
            warn!(%error, "settings database unavailable, using default filters");
            FilterState::default()
        }
    };

    let source = DataSource::from_location(&config.data_source);
    info!(source = %source.describe(), "loading registry documents");

    let mut dataset = Dataset::default();
    let mut failed = Vec::new();
    for load in source.fetch_all(&config.schema).await {
        if let DocumentLoad::Failed { kind, .. } = &load {
            failed.push(kind.label().to_string());
        }
        dataset.apply(load);
    }

    let stats = build_headless_stats(&dataset, &filters, failed);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        render_headless_stats(&stats);
    }

    Ok(())
}

fn render_headless_stats(stats: &HeadlessStats) {
    let summary = &stats.summary;

    println!("\nWASH Registry Summary");
    println!("=====================");
    println!("Total schools: {}", summary.total_schools);
    println!(
        "Schools with water access: {}",
        summary.schools_with_water_label()
    );
    println!("Functional assets: {}", summary.functional_assets);
    println!("Assets needing repair: {}", summary.assets_needing_repair);

    println!("\nAsset Distribution ({} facilities):", stats.distribution.total);
    for share in &stats.distribution.categories {
        println!("- {}: {} ({})", share.label, share.count, share.percent_label());
    }

    println!("\nDistricts by County:");
    for (county, districts) in &stats.districts_by_county {
        println!("- {county}: {districts}");
    }

    if !stats.failed_documents.is_empty() {
        println!("\nFailed to load: {}", stats.failed_documents.join(", "));
    }
}

fn build_headless_stats(dataset: &Dataset, filters: &FilterState, failed: Vec<String>) -> HeadlessStats {
    let facilities: Vec<_> = dataset
        .facilities
        .iter()
        .filter(|facility| filters.matches_facility(facility, &dataset.indicators))
        .cloned()
        .collect();

    let districts_by_county = dataset
        .boundaries
        .counties
        .iter()
        .filter(|county| filters.county_matches(county))
        .map(|county| (county.clone(), dataset.boundaries.in_county(county).count()))
        .collect();

    HeadlessStats {
        filters: filters.clone(),
        summary: WashSummary::compute(&dataset.schools, &facilities),
        distribution: AssetDistribution::compute(&facilities),
        districts_by_county,
        failed_documents: failed,
    }
}

#[derive(serde::Serialize)]
struct HeadlessStats {
    filters: FilterState,
    summary: WashSummary,
    distribution: AssetDistribution,
    districts_by_county: Vec<(String, usize)>,
    failed_documents: Vec<String>,
}

/// Run the main application event loop
pub async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    loop {
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code).await;
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(_) | Err(_) => {}
            }
        }

        // Yield so background loads and the scan feed make progress
        tokio::task::yield_now().await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wash_registry::{BoundarySchema, DocumentKind};

    #[test]
    fn headless_stats_respect_the_saved_filters() {
        let schema = BoundarySchema::default();
        let mut dataset = Dataset::default();
        dataset.apply(DocumentKind::Facilities.parse(
            r#"[
                { "id": "A", "type": "Borehole", "county": "Bong",
                  "functionality": "Functioning", "jmpStatus": "Basic Service" },
                { "id": "B", "type": "Hand Pump", "county": "Lofa",
                  "functionality": "Not Functioning", "jmpStatus": "No Service" }
            ]"#,
            &schema,
        ));

        let mut filters = FilterState::default();
        filters.county = "Lofa".to_string();
        let stats = build_headless_stats(&dataset, &filters, vec!["schools".to_string()]);

        assert_eq!(stats.summary.functional_assets, 0);
        assert_eq!(stats.summary.assets_needing_repair, 1);
        assert_eq!(stats.distribution.categories[0].label, "Public Taps");
        assert_eq!(stats.failed_documents, ["schools"]);
    }
}
