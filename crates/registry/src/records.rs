use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::domain::{FacilityType, Functionality, JmpStatus, SchoolType};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Exports write `null` for counts nobody filled in.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Primary WASH indicators reported by a school.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WashData {
    #[serde(deserialize_with = "null_as_default")]
    pub students_with_water_access: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub total_students: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub functional_toilets: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub total_toilets: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub handwashing_stations: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub water_storage_capacity: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub storage_unit: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub name: String,
    #[serde(rename = "type")]
    pub school_type: SchoolType,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub wash_data: WashData,
    /// DPI ids of the facilities serving this school.
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

/// A loosely typed JSON value as found in the type-specific facility fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    /// Truthiness as the registry exports it: `false`, `0` and `""` are all "No".
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Number(number) => number.as_f64().is_some_and(|value| value != 0.0),
            Self::Text(text) => !text.is_empty(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "{}", if *flag { "Yes" } else { "No" }),
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

/// Every type-specific field the registry may carry; which ones matter depends on the type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnicalFields {
    pub depth: Option<Scalar>,
    pub pump_type: Option<Scalar>,
    pub flow_rate: Option<Scalar>,
    pub pump_model: Option<Scalar>,
    pub installation_year: Option<Scalar>,
    pub spare_parts_available: Option<Scalar>,
    pub capacity: Option<Scalar>,
    pub material: Option<Scalar>,
    pub issue: Option<Scalar>,
    pub panel_capacity: Option<Scalar>,
    pub battery_backup: Option<Scalar>,
    pub roof_area: Option<Scalar>,
    pub tank_capacity: Option<Scalar>,
    pub first_flush: Option<Scalar>,
    pub filtration: Option<Scalar>,
    pub lining: Option<Scalar>,
    pub cover: Option<Scalar>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Plain,
    /// Yes/No badge; `true` renders as the positive style.
    Badge(bool),
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicalRow {
    pub label: &'static str,
    pub value: String,
    pub kind: RowKind,
}

const NOT_RECORDED: &str = "Not recorded";

fn plain(label: &'static str, value: Option<&Scalar>) -> TechnicalRow {
    TechnicalRow {
        label,
        value: value.map_or_else(|| NOT_RECORDED.to_string(), ToString::to_string),
        kind: RowKind::Plain,
    }
}

fn badge(label: &'static str, value: Option<&Scalar>) -> TechnicalRow {
    let positive = value.is_some_and(Scalar::is_truthy);
    TechnicalRow {
        label,
        value: if positive { "Yes" } else { "No" }.to_string(),
        kind: RowKind::Badge(positive),
    }
}

fn issue(rows: &mut Vec<TechnicalRow>, value: Option<&Scalar>) {
    if let Some(issue) = value.filter(|issue| issue.is_truthy()) {
        rows.push(TechnicalRow {
            label: "Issue",
            value: issue.to_string(),
            kind: RowKind::Warning,
        });
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WaterQuality {
    #[serde(rename = "pH", default)]
    pub ph: Option<Scalar>,
    #[serde(default)]
    pub turbidity: Option<Scalar>,
    #[serde(rename = "lastTest", default)]
    pub last_test: Option<String>,
    #[serde(default)]
    pub safe: bool,
}

impl WaterQuality {
    pub const fn safety_label(&self) -> &'static str {
        if self.safe {
            "Safe"
        } else {
            "Unsafe"
        }
    }
}

/// A DPI facility record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub facility_type: FacilityType,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub functionality: Functionality,
    #[serde(default)]
    pub jmp_status: JmpStatus,
    #[serde(default)]
    pub last_service: String,
    #[serde(default)]
    pub next_service: String,
    #[serde(flatten)]
    pub technical: TechnicalFields,
    #[serde(default)]
    pub water_quality: Option<WaterQuality>,
    #[serde(default)]
    pub contractor: Option<String>,
    #[serde(default)]
    pub technician: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl Facility {
    /// Labelled technical rows for this facility's type. Unknown types have none.
    pub fn technical_rows(&self) -> Vec<TechnicalRow> {
        let t = &self.technical;
        let mut rows = match self.facility_type {
            FacilityType::Borehole => vec![
                plain("Depth", t.depth.as_ref()),
                plain("Pump Type", t.pump_type.as_ref()),
                plain("Flow Rate", t.flow_rate.as_ref()),
            ],
            FacilityType::HandPump => vec![
                plain("Pump Model", t.pump_model.as_ref()),
                plain("Installation Year", t.installation_year.as_ref()),
                badge("Spare Parts Available", t.spare_parts_available.as_ref()),
            ],
            FacilityType::StorageTank => vec![
                plain("Capacity", t.capacity.as_ref()),
                plain("Material", t.material.as_ref()),
                plain("Installation Year", t.installation_year.as_ref()),
            ],
            FacilityType::SolarPump => vec![
                plain("Panel Capacity", t.panel_capacity.as_ref()),
                badge("Battery Backup", t.battery_backup.as_ref()),
                plain("Flow Rate", t.flow_rate.as_ref()),
                plain("Installation Year", t.installation_year.as_ref()),
            ],
            FacilityType::RainwaterSystem => vec![
                plain("Roof Area", t.roof_area.as_ref()),
                plain("Tank Capacity", t.tank_capacity.as_ref()),
                badge("First Flush System", t.first_flush.as_ref()),
                badge("Filtration", t.filtration.as_ref()),
            ],
            FacilityType::DugWell => vec![
                plain("Depth", t.depth.as_ref()),
                plain("Lining", t.lining.as_ref()),
                plain("Cover", t.cover.as_ref()),
            ],
            FacilityType::Other(_) => Vec::new(),
        };

        if matches!(
            self.facility_type,
            FacilityType::StorageTank | FacilityType::DugWell
        ) {
            issue(&mut rows, t.issue.as_ref());
        }

        rows
    }

    /// Path of the pre-generated QR image for this facility.
    pub fn barcode_path(&self) -> String {
        format!("/api/barcode/{}.png", self.id.replace('/', "_"))
    }

    /// Year part of the last service date, if the date starts with one.
    pub fn service_year(&self) -> Option<&str> {
        let year = self.last_service.get(..4)?;
        year.chars().all(|c| c.is_ascii_digit()).then_some(year)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSource {
    pub source: String,
    #[serde(default)]
    pub sub_indicators: Option<serde_json::Value>,
}

impl IndicatorSource {
    /// Names of the sub indicators, whether exported as a list or as an object.
    pub fn sub_indicator_names(&self) -> Vec<String> {
        match &self.sub_indicators {
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_string))
                .collect(),
            Some(serde_json::Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

/// facility type label -> indicator key -> reporting registry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct IndicatorSources(BTreeMap<String, BTreeMap<String, IndicatorSource>>);

impl IndicatorSources {
    pub fn source_for(&self, facility_type: &FacilityType, key: &str) -> Option<&IndicatorSource> {
        self.0.get(facility_type.label())?.get(key)
    }

    pub fn sources_for_type<'a>(
        &'a self,
        facility_type: &FacilityType,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .get(facility_type.label())
            .into_iter()
            .flat_map(|indicators| indicators.values().map(|entry| entry.source.as_str()))
    }

    /// Every distinct registry name, sorted.
    pub fn all_sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = self
            .0
            .values()
            .flat_map(|indicators| indicators.values().map(|entry| entry.source.clone()))
            .collect();
        sources.sort();
        sources.dedup();
        sources
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
