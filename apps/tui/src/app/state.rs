use crate::app::actions::AppActions;
use crate::config::AppConfig;
use crate::scan::FeedCamera;
use color_eyre::Result;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::time::{Duration, Instant};
use throbber_widgets_tui::ThrobberState;
use tracing::{info, warn};
use wash_registry::{
    AssetDistribution, Camera, Dataset, DistrictRow, DocumentKind, ExpansionState, Facility, FilterField,
    FilterOptions, FilterState, LookupFlow, LookupView, Pager, SortKey, SortState, WashSummary,
};

const THROBBER_TICK: Duration = Duration::from_millis(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Schools,
    Overview,
    Map,
    Lookup,
    Facilities,
}

impl AppScreen {
    pub const ALL: [Self; 5] = [
        Self::Schools,
        Self::Overview,
        Self::Map,
        Self::Lookup,
        Self::Facilities,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Schools => "Schools",
            Self::Overview => "Overview",
            Self::Map => "Map",
            Self::Lookup => "Lookup",
            Self::Facilities => "Facilities",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Schools => 0,
            Self::Overview => 1,
            Self::Map => 2,
            Self::Lookup => 3,
            Self::Facilities => 4,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Schools),
            1 => Some(Self::Overview),
            2 => Some(Self::Map),
            3 => Some(Self::Lookup),
            4 => Some(Self::Facilities),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub show_help: bool,
    pub status_message: String,
    pub throbber: ThrobberState,
    pub last_frame: Instant,
    pub last_loaded: Option<String>,
    pub dataset: Dataset,
    pub summary: WashSummary,
    pub distribution: AssetDistribution,
    pub district_rows: Vec<DistrictRow>,
    /// Applied filters; `pending_filters` holds edits until they are applied.
    pub filters: FilterState,
    pub pending_filters: FilterState,
    pub filter_options: FilterOptions,
    pub filter_field_index: usize,
    pub selected_school_index: usize,
    pub expansion: ExpansionState,
    pub sort: SortState,
    pub pager: Pager,
    pub lookup: LookupFlow<FeedCamera>,
    pub lookup_input: String,
    pub lookup_editing: bool,
    pub search_active: bool,
    pub search_query: String,
    pub filtered_facility_indices: Vec<usize>,
    pub selected_facility_index: usize,
    pub actions: AppActions,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            running: true,
            screen: AppScreen::Schools,
            show_help: false,
            status_message: String::new(),
            throbber: ThrobberState::default(),
            last_frame: Instant::now(),
            last_loaded: None,
            dataset: Dataset::default(),
            summary: WashSummary::default(),
            distribution: AssetDistribution::default(),
            district_rows: Vec::new(),
            filters: FilterState::default(),
            pending_filters: FilterState::default(),
            filter_options: FilterOptions::default(),
            filter_field_index: 0,
            selected_school_index: 0,
            expansion: ExpansionState::new(),
            sort: SortState::default(),
            pager: Pager::default(),
            // A terminal has no browser origin to be insecure about.
            lookup: LookupFlow::new(FeedCamera::new(config.scan_feed.clone()), true),
            lookup_input: String::new(),
            lookup_editing: false,
            search_active: false,
            search_query: String::new(),
            filtered_facility_indices: Vec::new(),
            selected_facility_index: 0,
            actions: AppActions::new(config),
        }
    }

    /// Open the settings store and restore the last applied filters.
    pub async fn initialize_db(&mut self) -> Result<()> {
        self.actions.initialize().await?;
        self.filters = self.actions.load_filters().await?;
        self.pending_filters = self.filters.clone();
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.actions.is_loading()
    }

    pub fn start_load(&mut self, kinds: &[DocumentKind]) {
        for kind in kinds {
            self.actions.spawn_load(*kind);
        }
        self.status_message = format!("Loading from {}...", self.actions.source.describe());
    }

    /// Reload everything, or only the facilities when that list came back empty.
    pub fn refresh(&mut self) {
        if self.is_loading() {
            return;
        }
        if self.dataset.needs_facility_reload() {
            self.start_load(&[DocumentKind::Facilities]);
        } else {
            self.start_load(&DocumentKind::ALL);
        }
    }

    /// Apply any finished loads. Called every frame.
    pub fn poll_loads(&mut self) {
        let mut changed = false;
        while let Some(load) = self.actions.next_load() {
            changed |= self.dataset.apply(load);
        }

        if changed {
            self.recompute();
            self.last_loaded = Some(chrono::Local::now().format("%H:%M:%S").to_string());
        }
        if changed && !self.is_loading() {
            self.status_message = format!(
                "Loaded {} schools, {} facilities",
                self.dataset.schools.len(),
                self.dataset.facilities.len()
            );
        } else if !self.is_loading() && self.status_message.starts_with("Loading") {
            self.status_message = "Error: some documents failed to load (see log)".to_string();
        }
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_frame) >= THROBBER_TICK {
            self.last_frame = now;
            if self.is_loading() || self.lookup.is_scanning() {
                self.throbber.calc_next();
            }
        }

        self.poll_loads();

        // Checked before polling so payloads written just before EOF are still delivered.
        let feed_ended = matches!(self.lookup.view(), LookupView::Scanning(_))
            && !self.lookup.camera().is_active();

        if let Some(payload) = self.lookup.camera_mut().poll() {
            info!(%payload, "scanned code");
            self.lookup.on_decoded(&payload, &self.dataset.facilities);
            self.screen = AppScreen::Lookup;
        } else if feed_ended {
            warn!("scan feed ended while scanning");
            self.lookup.stop_scanning();
            self.status_message = "Scan feed closed. Press s to scan again or type an ID.".to_string();
        }
    }

    /// Facilities that pass the applied filters.
    pub fn filtered_facilities(&self) -> Vec<&Facility> {
        self.dataset
            .facilities
            .iter()
            .filter(|facility| {
                self.filters
                    .matches_facility(facility, &self.dataset.indicators)
            })
            .collect()
    }

    /// Rebuild everything derived from the dataset and the applied filters.
    pub fn recompute(&mut self) {
        let filtered: Vec<Facility> = self.filtered_facilities().into_iter().cloned().collect();
        self.summary = WashSummary::compute(&self.dataset.schools, &filtered);
        self.distribution = AssetDistribution::compute(&filtered);
        self.district_rows = DistrictRow::build(&self.dataset.boundaries, &self.dataset.facilities);
        self.filter_options = FilterOptions::from_dataset(&self.dataset);

        self.expansion.retain_within(self.dataset.schools.len());
        self.selected_school_index = self
            .selected_school_index
            .min(self.dataset.schools.len().saturating_sub(1));
        self.pager.clamp(self.visible_districts().len());
        self.update_facility_search();
    }

    pub fn visible_districts(&self) -> Vec<DistrictRow> {
        DistrictRow::visible(&self.district_rows, &self.filters, self.sort)
    }

    pub fn filter_field(&self) -> FilterField {
        FilterField::from_index(self.filter_field_index).unwrap_or(FilterField::Period)
    }

    pub fn cycle_filter_value(&mut self, forward: bool) {
        let field = self.filter_field();
        let next = self
            .filter_options
            .cycle(field, self.pending_filters.get(field), forward);
        self.pending_filters.set(field, next);
    }

    /// Make the pending filters current, persist them and go back to page one.
    pub async fn apply_filters(&mut self) {
        self.filters = self.pending_filters.clone();
        self.pager.reset();
        self.recompute();

        match self.actions.save_filters(&self.filters).await {
            Ok(()) => self.status_message = "Filters applied".to_string(),
            Err(error) => {
                warn!(%error, "failed to save filters");
                self.status_message = "Filters applied (not saved)".to_string();
            }
        }
    }

    pub fn sort_by(&mut self, key: SortKey) {
        self.sort.select(key);
        self.pager.reset();
    }

    /// Re-rank the facility list against the search query.
    pub fn update_facility_search(&mut self) {
        let facilities = &self.dataset.facilities;
        let query = self.search_query.trim();

        self.filtered_facility_indices = if query.is_empty() {
            (0..facilities.len()).collect()
        } else {
            let matcher = SkimMatcherV2::default();
            let mut scored: Vec<(i64, usize)> = facilities
                .iter()
                .enumerate()
                .filter_map(|(index, facility)| {
                    let haystack = format!("{} {}", facility.id, facility.name);
                    matcher
                        .fuzzy_match(&haystack, query)
                        .map(|score| (score, index))
                })
                .collect();
            scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
            scored.into_iter().map(|(_, index)| index).collect()
        };

        if self.selected_facility_index >= self.filtered_facility_indices.len() {
            self.selected_facility_index = 0;
        }
    }

    pub fn clear_search(&mut self) {
        self.search_active = false;
        self.search_query.clear();
        self.update_facility_search();
    }

    pub fn selected_list_facility(&self) -> Option<&Facility> {
        self.filtered_facility_indices
            .get(self.selected_facility_index)
            .and_then(|index| self.dataset.facilities.get(*index))
    }

    /// Open the highlighted list entry through the exact-id lookup.
    pub fn open_selected_facility(&mut self) {
        let Some(id) = self.selected_list_facility().map(|f| f.id.clone()) else {
            return;
        };
        self.lookup.select_from_list(&id, &self.dataset.facilities);
        self.screen = AppScreen::Lookup;
    }

    pub fn submit_lookup_input(&mut self) {
        self.lookup
            .manual_entry(&self.lookup_input, &self.dataset.facilities);
        self.lookup_input.clear();
        self.lookup_editing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::input::screens::switch_screen;
    use crate::db::migrations::setup_database;
    use sqlx::SqlitePool;
    use std::path::PathBuf;
    use wash_registry::{BoundaryFeature, BoundarySchema, Boundaries, DocumentLoad, FacingMode};

    fn config() -> AppConfig {
        AppConfig {
            data_source: "./nowhere".to_string(),
            database_url: "sqlite::memory:".to_string(),
            scan_feed: None,
            log_file: PathBuf::from("test.log"),
            schema: BoundarySchema::default(),
        }
    }

    fn app_with_facilities() -> App {
        let mut app = App::new(&config());
        let facilities = serde_json::from_value(serde_json::json!([
            { "id": "BH-2024-001", "name": "Central Borehole", "type": "Borehole",
              "county": "Montserrado", "functionality": "Functioning",
              "jmpStatus": "Basic Service" },
            { "id": "HP-2023-014", "name": "Market Hand Pump", "type": "Hand Pump",
              "county": "Bong", "functionality": "Not Functioning",
              "jmpStatus": "Limited Service" }
        ]))
        .unwrap();
        app.dataset.apply(DocumentLoad::Facilities(facilities));
        app.recompute();
        app
    }

    #[tokio::test]
    async fn applied_filters_drive_the_summary() {
        let mut app = app_with_facilities();
        assert_eq!(app.summary.functional_assets, 1);
        assert_eq!(app.summary.assets_needing_repair, 1);

        app.pending_filters.county = "Bong".to_string();
        app.filters = app.pending_filters.clone();
        app.recompute();
        assert_eq!(app.summary.functional_assets, 0);
        assert_eq!(app.summary.assets_needing_repair, 1);
    }

    #[tokio::test]
    async fn fuzzy_search_narrows_the_list() {
        let mut app = app_with_facilities();
        assert_eq!(app.filtered_facility_indices, [0, 1]);

        app.search_query = "market".to_string();
        app.update_facility_search();
        assert_eq!(app.filtered_facility_indices, [1]);

        app.clear_search();
        assert_eq!(app.filtered_facility_indices.len(), 2);
    }

    #[tokio::test]
    async fn opening_a_list_entry_shows_its_detail() {
        let mut app = app_with_facilities();
        app.lookup.show_list();
        app.selected_facility_index = 1;
        app.open_selected_facility();

        assert_eq!(app.screen, AppScreen::Lookup);
        assert_eq!(app.lookup.view(), &LookupView::Detail(1));
    }

    #[tokio::test]
    async fn manual_entry_is_case_insensitive() {
        let mut app = app_with_facilities();
        app.lookup_input = "bh-2024-001".to_string();
        app.submit_lookup_input();

        let facility = app.lookup.selected_facility(&app.dataset.facilities).unwrap();
        assert_eq!(facility.facility_type.label(), "Borehole");
        assert!(app.lookup_input.is_empty());
    }

    #[tokio::test]
    async fn refresh_with_no_facilities_reloads_only_them() {
        let mut app = App::new(&config());
        assert!(app.dataset.needs_facility_reload());

        app.refresh();
        assert_eq!(app.actions.in_flight(), 1);

        // A second refresh while the first is running is ignored.
        app.refresh();
        assert_eq!(app.actions.in_flight(), 1);
    }

    #[tokio::test]
    async fn refresh_with_facilities_reloads_everything() {
        let mut app = app_with_facilities();
        app.refresh();
        assert_eq!(app.actions.in_flight(), DocumentKind::ALL.len());
    }

    #[tokio::test]
    async fn entering_overview_without_facilities_loads_them() {
        let mut app = App::new(&config());
        switch_screen(&mut app, AppScreen::Overview);

        assert_eq!(app.screen, AppScreen::Overview);
        assert_eq!(app.actions.in_flight(), 1);

        let mut loaded = app_with_facilities();
        switch_screen(&mut loaded, AppScreen::Overview);
        assert_eq!(loaded.actions.in_flight(), 0);
    }

    #[tokio::test]
    async fn applying_filters_persists_them_and_returns_to_page_one(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut app = app_with_facilities();
        let pool = SqlitePool::connect("sqlite::memory:").await?;
        setup_database(&pool).await?;
        app.actions.db_pool = Some(pool);

        app.dataset.boundaries = Boundaries {
            features: (0..12)
                .map(|n| BoundaryFeature {
                    county: if n % 2 == 0 { "Bong" } else { "Montserrado" }.to_string(),
                    district: format!("District {n}"),
                    functionality: 50,
                    rings: Vec::new(),
                })
                .collect(),
            counties: vec!["Bong".to_string(), "Montserrado".to_string()],
        };
        app.recompute();
        app.pager.go_to(3, app.visible_districts().len());
        assert_eq!(app.pager.page(), 3);

        app.pending_filters.status = "Functioning".to_string();
        app.apply_filters().await;

        assert_eq!(app.pager.page(), 1);
        assert_eq!(app.status_message, "Filters applied");
        assert_eq!(app.actions.load_filters().await?, app.pending_filters);
        Ok(())
    }

    #[tokio::test]
    async fn scanning_stops_when_the_feed_ends() -> Result<(), Box<dyn std::error::Error>> {
        let path =
            std::env::temp_dir().join(format!("wash-state-feed-{}", std::process::id()));
        tokio::fs::write(&path, "").await?;

        let mut app = App::new(&AppConfig {
            scan_feed: Some(path.clone()),
            ..config()
        });
        app.lookup.start_scanning();
        assert_eq!(
            app.lookup.view(),
            &LookupView::Scanning(FacingMode::Environment)
        );

        tokio::time::timeout(Duration::from_secs(2), async {
            while matches!(app.lookup.view(), LookupView::Scanning(_)) {
                app.update();
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await?;

        assert_eq!(app.lookup.view(), &LookupView::ScannerIdle);
        assert!(app.status_message.starts_with("Scan feed closed"));
        tokio::fs::remove_file(path).await?;
        Ok(())
    }
}
