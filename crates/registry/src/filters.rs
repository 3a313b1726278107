use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::RegistryError;
use crate::loader::Dataset;
use crate::records::{Facility, IndicatorSources};

/// Storage key the filter object is persisted under.
pub const FILTER_STORAGE_KEY: &str = "wash-registry-filters";

pub const ALL: &str = "all";

fn all() -> String {
    ALL.to_string()
}

/// Whether a filter value selects everything. Blank and any casing of "all" both do.
pub fn is_all(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case(ALL)
}

fn matches(criterion: &str, value: &str) -> bool {
    is_all(criterion) || criterion.eq_ignore_ascii_case(value)
}

/// The last applied dashboard filter selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub period: String,
    pub county: String,
    pub asset: String,
    pub status: String,
    pub source: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            period: all(),
            county: all(),
            asset: all(),
            status: all(),
            source: all(),
        }
    }
}

impl FilterState {
    pub fn to_storage(&self) -> Result<String, RegistryError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored filter object. Values are restored verbatim, even ones the
    /// current dataset no longer contains; a malformed object yields the defaults.
    pub fn from_storage(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|error| {
            warn!(%error, "failed to parse saved filters, using defaults");
            Self::default()
        })
    }

    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Period => &self.period,
            FilterField::County => &self.county,
            FilterField::Asset => &self.asset,
            FilterField::Status => &self.status,
            FilterField::Source => &self.source,
        }
    }

    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FilterField::Period => self.period = value,
            FilterField::County => self.county = value,
            FilterField::Asset => self.asset = value,
            FilterField::Status => self.status = value,
            FilterField::Source => self.source = value,
        }
    }

    pub fn county_matches(&self, county: &str) -> bool {
        matches(&self.county, county)
    }

    /// Every active criterion must match exactly; a record missing the field is excluded.
    pub fn matches_facility(&self, facility: &Facility, indicators: &IndicatorSources) -> bool {
        let county_ok = is_all(&self.county)
            || facility
                .county
                .as_deref()
                .is_some_and(|county| matches(&self.county, county));
        let period_ok = is_all(&self.period)
            || facility
                .service_year()
                .is_some_and(|year| matches(&self.period, year));
        let source_ok = is_all(&self.source)
            || indicators
                .sources_for_type(&facility.facility_type)
                .any(|source| matches(&self.source, source));

        county_ok
            && period_ok
            && source_ok
            && matches(&self.asset, facility.facility_type.label())
            && matches(&self.status, facility.functionality.label())
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Period,
    County,
    Asset,
    Status,
    Source,
}

impl FilterField {
    pub const ALL: [Self; 5] = [
        Self::Period,
        Self::County,
        Self::Asset,
        Self::Status,
        Self::Source,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Period => "Period",
            Self::County => "County",
            Self::Asset => "Asset",
            Self::Status => "Status",
            Self::Source => "Source",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Period),
            1 => Some(Self::County),
            2 => Some(Self::Asset),
            3 => Some(Self::Status),
            4 => Some(Self::Source),
            _ => None,
        }
    }
}

/// Selectable values per filter, each list starting with "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub periods: Vec<String>,
    pub counties: Vec<String>,
    pub assets: Vec<String>,
    pub statuses: Vec<String>,
    pub sources: Vec<String>,
}

fn with_all(mut values: Vec<String>) -> Vec<String> {
    values.sort();
    values.dedup();
    values.retain(|value| !is_all(value));
    values.insert(0, all());
    values
}

impl FilterOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let facilities = &dataset.facilities;

        let mut periods: Vec<String> = facilities
            .iter()
            .filter_map(|facility| facility.service_year().map(str::to_string))
            .collect();
        periods.sort_by(|a, b| b.cmp(a));
        periods.dedup();
        periods.insert(0, all());

        let mut counties = dataset.boundaries.counties.clone();
        counties.extend(facilities.iter().filter_map(|facility| facility.county.clone()));

        let assets = crate::domain::FacilityType::KNOWN
            .iter()
            .map(|kind| kind.label().to_string())
            .chain(facilities.iter().map(|f| f.facility_type.label().to_string()))
            .collect();

        let statuses = facilities
            .iter()
            .map(|facility| facility.functionality.label().to_string())
            .chain(std::iter::once("Functioning".to_string()))
            .collect();

        Self {
            periods,
            counties: with_all(counties),
            assets: with_all(assets),
            statuses: with_all(statuses),
            sources: with_all(dataset.indicators.all_sources()),
        }
    }

    pub fn values(&self, field: FilterField) -> &[String] {
        match field {
            FilterField::Period => &self.periods,
            FilterField::County => &self.counties,
            FilterField::Asset => &self.assets,
            FilterField::Status => &self.statuses,
            FilterField::Source => &self.sources,
        }
    }

    /// The option after (or before) `current`. A value not in the list starts over at "all".
    pub fn cycle(&self, field: FilterField, current: &str, forward: bool) -> String {
        let values = self.values(field);
        if values.is_empty() {
            return all();
        }

        let next = match values.iter().position(|value| value == current) {
            Some(index) if forward => (index + 1) % values.len(),
            Some(index) => (index + values.len() - 1) % values.len(),
            None => 0,
        };
        values[next].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facility(json: serde_json::Value) -> Facility {
        serde_json::from_value(json).unwrap()
    }

    fn borehole() -> Facility {
        facility(serde_json::json!({
            "id": "BH-2024-001",
            "type": "Borehole",
            "county": "Montserrado",
            "functionality": "Functioning",
            "jmpStatus": "Basic Service",
            "lastService": "2024-06-15"
        }))
    }

    #[test]
    fn storage_round_trip_restores_identical_values() {
        let filters = FilterState {
            period: "2024".to_string(),
            county: "Bong".to_string(),
            asset: "Borehole".to_string(),
            status: "Functioning".to_string(),
            source: "WASH Registry".to_string(),
        };

        let raw = filters.to_storage().unwrap();
        assert_eq!(FilterState::from_storage(&raw), filters);
    }

    #[test]
    fn malformed_storage_falls_back_to_defaults() {
        assert_eq!(FilterState::from_storage("{not json"), FilterState::default());
        assert!(FilterState::from_storage("42").is_default());
    }

    #[test]
    fn missing_fields_default_to_all_and_stale_values_survive() {
        let restored = FilterState::from_storage(r#"{"county":"Atlantis"}"#);
        assert_eq!(restored.county, "Atlantis");
        assert_eq!(restored.asset, ALL);
    }

    #[test]
    fn blank_and_any_casing_of_all_select_everything() {
        for value in ["", "all", "All", "ALL"] {
            assert!(is_all(value), "{value:?}");
        }
        assert!(!is_all("Bong"));
    }

    #[test]
    fn default_filters_match_everything() {
        let indicators = IndicatorSources::default();
        assert!(FilterState::default().matches_facility(&borehole(), &indicators));
    }

    #[test]
    fn each_active_criterion_must_match_exactly() {
        let indicators = IndicatorSources::default();
        let record = borehole();

        let mut filters = FilterState::default();
        filters.asset = "borehole".to_string();
        filters.county = "Montserrado".to_string();
        filters.period = "2024".to_string();
        assert!(filters.matches_facility(&record, &indicators));

        filters.status = "Not Functioning".to_string();
        assert!(!filters.matches_facility(&record, &indicators));

        let mut partial = FilterState::default();
        partial.county = "Montserr".to_string();
        assert!(!partial.matches_facility(&record, &indicators));
    }

    #[test]
    fn source_filter_uses_indicator_registry() {
        let indicators: IndicatorSources = serde_json::from_value(serde_json::json!({
            "Borehole": { "functionality": { "source": "WASH Registry" } }
        }))
        .unwrap();

        let mut filters = FilterState::default();
        filters.source = "WASH Registry".to_string();
        assert!(filters.matches_facility(&borehole(), &indicators));

        filters.source = "EPA Lab".to_string();
        assert!(!filters.matches_facility(&borehole(), &indicators));
    }

    #[test]
    fn cycling_wraps_and_restarts_from_unknown_values() {
        let options = FilterOptions {
            counties: vec!["all".into(), "Bong".into(), "Lofa".into()],
            ..FilterOptions::default()
        };

        assert_eq!(options.cycle(FilterField::County, "Lofa", true), "all");
        assert_eq!(options.cycle(FilterField::County, "all", false), "Lofa");
        assert_eq!(options.cycle(FilterField::County, "Atlantis", true), "all");
    }
}
