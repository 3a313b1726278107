use serde::Deserialize;

/// Kind of water point recorded in the DPI registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum FacilityType {
    Borehole,
    HandPump,
    StorageTank,
    SolarPump,
    RainwaterSystem,
    DugWell,
    Other(String),
}

impl FacilityType {
    pub const KNOWN: [Self; 6] = [
        Self::Borehole,
        Self::HandPump,
        Self::StorageTank,
        Self::SolarPump,
        Self::RainwaterSystem,
        Self::DugWell,
    ];

    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "borehole" => Self::Borehole,
            "hand pump" => Self::HandPump,
            "storage tank" => Self::StorageTank,
            "solar pump" => Self::SolarPump,
            "rainwater system" => Self::RainwaterSystem,
            "dug well" => Self::DugWell,
            _ => Self::Other(value.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Borehole => "Borehole",
            Self::HandPump => "Hand Pump",
            Self::StorageTank => "Storage Tank",
            Self::SolarPump => "Solar Pump",
            Self::RainwaterSystem => "Rainwater System",
            Self::DugWell => "Dug Well",
            Self::Other(label) => label,
        }
    }

    /// Reporting category used by the asset distribution chart.
    pub fn category(&self) -> &str {
        match self {
            Self::HandPump => "Public Taps",
            Self::Borehole => "Protected Spring",
            Self::SolarPump | Self::RainwaterSystem => "Private Taps",
            Self::StorageTank | Self::DugWell => "Groundwater",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for FacilityType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// Operational state of a facility. Only the exact label "Functioning" counts as working.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Functionality {
    Functioning,
    NotFunctioning(String),
}

impl Functionality {
    pub const fn is_functional(&self) -> bool {
        matches!(self, Self::Functioning)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Functioning => "Functioning",
            Self::NotFunctioning(label) => label,
        }
    }
}

impl Default for Functionality {
    fn default() -> Self {
        Self::NotFunctioning("Unknown".to_string())
    }
}

impl From<String> for Functionality {
    fn from(value: String) -> Self {
        if value == "Functioning" {
            Self::Functioning
        } else {
            Self::NotFunctioning(value)
        }
    }
}

/// WHO/UNICEF JMP service level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum JmpStatus {
    BasicService,
    LimitedService,
    NoService,
    Other(String),
}

impl JmpStatus {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "basic service" | "basic" => Self::BasicService,
            "limited service" | "limited" => Self::LimitedService,
            "no service" | "none" => Self::NoService,
            _ => Self::Other(value.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::BasicService => "Basic Service",
            Self::LimitedService => "Limited Service",
            Self::NoService => "No Service",
            Self::Other(label) => label,
        }
    }

    /// Lowercase, dash separated form of the label ("basic-service").
    pub fn slug(&self) -> String {
        self.label()
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl Default for JmpStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for JmpStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SchoolType {
    Primary,
    Secondary,
    Other(String),
}

impl SchoolType {
    pub fn label(&self) -> &str {
        match self {
            Self::Primary => "Primary",
            Self::Secondary => "Secondary",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for SchoolType {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "primary" => Self::Primary,
            "secondary" => Self::Secondary,
            _ => Self::Other(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facility_type_parses_known_labels_case_insensitively() {
        assert_eq!(FacilityType::parse("hand pump"), FacilityType::HandPump);
        assert_eq!(FacilityType::parse(" Dug Well "), FacilityType::DugWell);
        assert_eq!(
            FacilityType::parse("Kiosk"),
            FacilityType::Other("Kiosk".to_string())
        );
        assert_eq!(FacilityType::RainwaterSystem.label(), "Rainwater System");
    }

    #[test]
    fn categories_fold_types_together() {
        assert_eq!(FacilityType::SolarPump.category(), "Private Taps");
        assert_eq!(FacilityType::RainwaterSystem.category(), "Private Taps");
        assert_eq!(FacilityType::StorageTank.category(), "Groundwater");
        assert_eq!(FacilityType::Other("Kiosk".into()).category(), "Kiosk");
    }

    #[test]
    fn only_exact_functioning_label_is_functional() {
        assert!(Functionality::from("Functioning".to_string()).is_functional());
        assert!(!Functionality::from("functioning".to_string()).is_functional());
        let broken = Functionality::from("Needs Repair".to_string());
        assert_eq!(broken.label(), "Needs Repair");
    }

    #[test]
    fn jmp_slug_joins_words() {
        assert_eq!(JmpStatus::parse("Limited Service").slug(), "limited-service");
        assert_eq!(JmpStatus::NoService.slug(), "no-service");
    }
}
