use wash_registry::camera::NoCamera;
use wash_registry::{
    AssetDistribution, Dataset, DocumentLoad, ExpansionState, Facility, FilterField,
    FilterOptions, FilterState, LookupFlow, WashSummary,
};

use crate::storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebTab {
    Schools,
    Assets,
    Lookup,
}

impl WebTab {
    pub const ALL: [Self; 3] = [Self::Schools, Self::Assets, Self::Lookup];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Schools => "Schools",
            Self::Assets => "Assets",
            Self::Lookup => "Lookup",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Schools => 0,
            Self::Assets => 1,
            Self::Lookup => 2,
        }
    }

    pub fn step(self, forward: bool) -> Self {
        let len = Self::ALL.len();
        let next = if forward {
            (self.index() + 1) % len
        } else {
            (self.index() + len - 1) % len
        };
        Self::ALL[next]
    }
}

/// Browser-side dashboard state, shared between the fetch tasks and the renderer.
pub struct WebState {
    pub dataset: Dataset,
    pub tab: WebTab,
    pub selected_school: usize,
    pub expansion: ExpansionState,
    pub filters: FilterState,
    pub pending_filters: FilterState,
    pub filter_options: FilterOptions,
    pub filter_field_index: usize,
    pub summary: WashSummary,
    pub distribution: AssetDistribution,
    pub lookup: LookupFlow<NoCamera>,
    pub lookup_input: String,
    pub failed: Vec<String>,
}

impl WebState {
    pub fn new() -> Self {
        let filters = storage::load_filters();
        Self {
            dataset: Dataset::default(),
            tab: WebTab::Schools,
            selected_school: 0,
            expansion: ExpansionState::new(),
            pending_filters: filters.clone(),
            filters,
            filter_options: FilterOptions::default(),
            filter_field_index: 0,
            summary: WashSummary::default(),
            distribution: AssetDistribution::default(),
            lookup: LookupFlow::new(NoCamera, storage::page_is_secure()),
            lookup_input: String::new(),
            failed: Vec::new(),
        }
    }

    pub fn apply(&mut self, load: DocumentLoad) {
        if let DocumentLoad::Failed { kind, .. } = &load {
            self.failed.push(kind.label().to_string());
        }
        if self.dataset.apply(load) {
            self.recompute();
        }
    }

    fn filtered_facilities(&self) -> Vec<Facility> {
        self.dataset
            .facilities
            .iter()
            .filter(|facility| {
                self.filters
                    .matches_facility(facility, &self.dataset.indicators)
            })
            .cloned()
            .collect()
    }

    pub fn recompute(&mut self) {
        let filtered = self.filtered_facilities();
        self.summary = WashSummary::compute(&self.dataset.schools, &filtered);
        self.distribution = AssetDistribution::compute(&filtered);
        self.filter_options = FilterOptions::from_dataset(&self.dataset);
        self.expansion.retain_within(self.dataset.schools.len());
        self.selected_school = self
            .selected_school
            .min(self.dataset.schools.len().saturating_sub(1));
    }

    pub fn filter_field(&self) -> FilterField {
        FilterField::from_index(self.filter_field_index).unwrap_or(FilterField::Period)
    }

    pub fn next_filter_field(&mut self) {
        self.filter_field_index = (self.filter_field_index + 1) % FilterField::ALL.len();
    }

    pub fn cycle_filter_value(&mut self, forward: bool) {
        let field = self.filter_field();
        let next = self
            .filter_options
            .cycle(field, self.pending_filters.get(field), forward);
        self.pending_filters.set(field, next);
    }

    pub fn apply_filters(&mut self) {
        self.filters = self.pending_filters.clone();
        storage::save_filters(&self.filters);
        self.recompute();
    }

    pub fn move_school(&mut self, down: bool) {
        let len = self.dataset.schools.len();
        if len == 0 {
            return;
        }
        self.selected_school = if down {
            (self.selected_school + 1).min(len - 1)
        } else {
            self.selected_school.saturating_sub(1)
        };
    }

    pub fn submit_lookup(&mut self) {
        self.lookup
            .manual_entry(&self.lookup_input, &self.dataset.facilities);
        self.lookup_input.clear();
    }
}
