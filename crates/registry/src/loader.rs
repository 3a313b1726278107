use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};

use crate::boundary::{parse_boundaries, Boundaries, BoundarySchema};
use crate::error::RegistryError;
use crate::records::{Facility, IndicatorSources, School};

/// The four JSON documents the dashboards read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Schools,
    Facilities,
    Indicators,
    Boundaries,
}

impl DocumentKind {
    pub const ALL: [Self; 4] = [
        Self::Schools,
        Self::Facilities,
        Self::Indicators,
        Self::Boundaries,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            Self::Schools => "api/schools.json",
            Self::Facilities => "api/dpi.json",
            Self::Indicators => "api/indicators.json",
            Self::Boundaries => "api/source/liberia.json",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Schools => "schools",
            Self::Facilities => "facilities",
            Self::Indicators => "indicators",
            Self::Boundaries => "boundaries",
        }
    }

    /// Parse a fetched body into a load result. Parse failures become [`DocumentLoad::Failed`].
    pub fn parse(self, body: &str, schema: &BoundarySchema) -> DocumentLoad {
        let parsed = match self {
            Self::Schools => parse_schools(body).map(DocumentLoad::Schools),
            Self::Facilities => parse_facilities(body).map(DocumentLoad::Facilities),
            Self::Indicators => parse_indicators(body).map(DocumentLoad::Indicators),
            Self::Boundaries => parse_boundaries(body, schema).map(DocumentLoad::Boundaries),
        };
        parsed.unwrap_or_else(|error| DocumentLoad::failed(self, error))
    }
}

/// Where the documents live. An empty base resolves to site-root paths.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url(&self, kind: DocumentKind) -> String {
        format!("{}/{}", self.base, kind.path())
    }
}

#[derive(Debug, Deserialize)]
struct SchoolsDocument {
    schools: Vec<serde_json::Value>,
}

/// Decode each record on its own; a malformed record is logged and skipped.
fn parse_records<T: DeserializeOwned>(
    kind: DocumentKind,
    records: Vec<serde_json::Value>,
) -> Vec<T> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                warn!(document = kind.label(), index, %error, "skipping malformed record");
                None
            }
        })
        .collect()
}

pub fn parse_schools(body: &str) -> Result<Vec<School>, RegistryError> {
    let document: SchoolsDocument = serde_json::from_str(body)?;
    Ok(parse_records(DocumentKind::Schools, document.schools))
}

pub fn parse_facilities(body: &str) -> Result<Vec<Facility>, RegistryError> {
    let records: Vec<serde_json::Value> = serde_json::from_str(body)?;
    Ok(parse_records(DocumentKind::Facilities, records))
}

pub fn parse_indicators(body: &str) -> Result<IndicatorSources, RegistryError> {
    Ok(serde_json::from_str(body)?)
}

/// Outcome of fetching and parsing one document.
#[derive(Debug)]
pub enum DocumentLoad {
    Schools(Vec<School>),
    Facilities(Vec<Facility>),
    Indicators(IndicatorSources),
    Boundaries(Boundaries),
    Failed { kind: DocumentKind, reason: String },
}

impl DocumentLoad {
    pub fn failed(kind: DocumentKind, reason: impl ToString) -> Self {
        Self::Failed {
            kind,
            reason: reason.to_string(),
        }
    }
}

/// Everything loaded so far. Each collection is replaced independently.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub schools: Vec<School>,
    pub facilities: Vec<Facility>,
    pub indicators: IndicatorSources,
    pub boundaries: Boundaries,
}

impl Dataset {
    /// Store a load result. A failure keeps whatever was there before and returns `false`.
    pub fn apply(&mut self, load: DocumentLoad) -> bool {
        match load {
            DocumentLoad::Schools(schools) => {
                info!(count = schools.len(), "schools loaded");
                self.schools = schools;
            }
            DocumentLoad::Facilities(facilities) => {
                info!(count = facilities.len(), "facilities loaded");
                self.facilities = facilities;
            }
            DocumentLoad::Indicators(indicators) => {
                info!("indicator sources loaded");
                self.indicators = indicators;
            }
            DocumentLoad::Boundaries(boundaries) => {
                info!(features = boundaries.features.len(), "boundaries loaded");
                self.boundaries = boundaries;
            }
            DocumentLoad::Failed { kind, reason } => {
                warn!(document = kind.label(), %reason, "failed to load document");
                return false;
            }
        }
        true
    }

    pub fn needs_facility_reload(&self) -> bool {
        self.facilities.is_empty()
    }

    pub fn facility_index(&self, id: &str) -> Option<usize> {
        self.facilities
            .iter()
            .position(|facility| facility.id.eq_ignore_ascii_case(id))
    }

    /// The facilities a school links to, in listed order. Unknown ids are skipped.
    pub fn facilities_for(&self, school: &School) -> Vec<&Facility> {
        school
            .facilities
            .iter()
            .filter_map(|id| {
                let found = self.facilities.iter().find(|facility| &facility.id == id);
                if found.is_none() {
                    warn!(school = %school.name, facility = %id, "school links an unknown facility");
                }
                found
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHOOLS: &str = r#"{ "schools": [
        { "name": "Monrovia Central", "type": "Primary", "province": "Montserrado",
          "lastUpdated": "2024-06-01",
          "washData": { "studentsWithWaterAccess": 80, "totalStudents": 100 },
          "facilities": ["BH-2024-001", "GONE-1"] }
    ] }"#;

    const FACILITIES: &str = r#"[
        { "id": "BH-2024-001", "name": "Central Borehole", "type": "Borehole",
          "functionality": "Functioning", "jmpStatus": "Basic Service" }
    ]"#;

    #[test]
    fn endpoints_join_base_and_path() {
        let endpoints = Endpoints::new("http://localhost:8080/");
        assert_eq!(
            endpoints.url(DocumentKind::Facilities),
            "http://localhost:8080/api/dpi.json"
        );
        assert_eq!(
            Endpoints::default().url(DocumentKind::Boundaries),
            "/api/source/liberia.json"
        );
    }

    #[test]
    fn loads_apply_independently_in_any_order() {
        let schema = BoundarySchema::default();
        let mut dataset = Dataset::default();
        assert!(dataset.needs_facility_reload());

        assert!(dataset.apply(DocumentKind::Facilities.parse(FACILITIES, &schema)));
        assert!(dataset.apply(DocumentKind::Schools.parse(SCHOOLS, &schema)));

        assert_eq!(dataset.schools.len(), 1);
        assert!(!dataset.needs_facility_reload());
        assert_eq!(dataset.facility_index("bh-2024-001"), Some(0));
    }

    #[test]
    fn failed_load_keeps_previous_state() {
        let schema = BoundarySchema::default();
        let mut dataset = Dataset::default();
        dataset.apply(DocumentKind::Facilities.parse(FACILITIES, &schema));

        let load = DocumentKind::Facilities.parse("{ not json", &schema);
        assert!(matches!(
            load,
            DocumentLoad::Failed {
                kind: DocumentKind::Facilities,
                ..
            }
        ));
        assert!(!dataset.apply(load));
        assert_eq!(dataset.facilities.len(), 1);
    }

    #[test]
    fn school_facilities_skip_unknown_ids() {
        let schema = BoundarySchema::default();
        let mut dataset = Dataset::default();
        dataset.apply(DocumentKind::Schools.parse(SCHOOLS, &schema));
        dataset.apply(DocumentKind::Facilities.parse(FACILITIES, &schema));

        let linked = dataset.facilities_for(&dataset.schools[0]);
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].name, "Central Borehole");
    }

    #[test]
    fn one_broken_facility_does_not_discard_the_rest() {
        let body = r#"[
            { "id": "BH-2024-001", "name": "Central Borehole", "type": "Borehole",
              "functionality": "Functioning", "jmpStatus": "Basic Service" },
            { "id": "HP-2024-002", "name": "Market Pump", "type": "Hand Pump",
              "functionality": "Functioning" },
            { "name": "No id at all", "type": "Borehole" }
        ]"#;
        let facilities = parse_facilities(body).unwrap();

        assert_eq!(facilities.len(), 2);
        assert_eq!(facilities[1].id, "HP-2024-002");
        assert_eq!(facilities[1].jmp_status.label(), "");
    }

    #[test]
    fn null_school_counts_read_as_zero() {
        let body = r#"{ "schools": [
            { "name": "Monrovia Central", "type": "Primary",
              "washData": { "studentsWithWaterAccess": 80, "totalStudents": null } },
            { "name": "Gbarnga High", "type": "Secondary",
              "washData": { "totalStudents": 120 } },
            { "type": "Primary" }
        ] }"#;
        let schools = parse_schools(body).unwrap();

        assert_eq!(schools.len(), 2);
        assert_eq!(schools[0].wash_data.total_students, 0);
        assert_eq!(schools[0].wash_data.students_with_water_access, 80);
        assert_eq!(schools[1].wash_data.total_students, 120);
    }

    #[test]
    fn schools_document_must_be_wrapped() {
        assert!(parse_schools("[]").is_err());
        assert!(parse_facilities("[]").unwrap().is_empty());
    }
}
