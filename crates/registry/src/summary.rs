use serde::Serialize;

use crate::domain::FacilityType;
use crate::format::percentage;
use crate::records::{Facility, School};

/// Quick stats shown above the schools table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WashSummary {
    pub total_schools: usize,
    pub schools_with_water: usize,
    pub schools_with_water_percent: Option<u32>,
    pub functional_assets: usize,
    pub assets_needing_repair: usize,
}

impl WashSummary {
    pub fn compute(schools: &[School], facilities: &[Facility]) -> Self {
        let total_schools = schools.len();
        // Strictly more than half the students; schools without enrolment never count.
        let schools_with_water = schools
            .iter()
            .filter(|school| {
                let data = &school.wash_data;
                data.total_students > 0
                    && u64::from(data.students_with_water_access) * 2
                        > u64::from(data.total_students)
            })
            .count();
        let functional_assets = facilities
            .iter()
            .filter(|facility| facility.functionality.is_functional())
            .count();

        Self {
            total_schools,
            schools_with_water,
            schools_with_water_percent: percentage(
                u32::try_from(schools_with_water).unwrap_or(u32::MAX),
                u32::try_from(total_schools).unwrap_or(u32::MAX),
            ),
            functional_assets,
            assets_needing_repair: facilities.len() - functional_assets,
        }
    }

    pub fn schools_with_water_label(&self) -> String {
        self.schools_with_water_percent.map_or_else(
            || format!("{} (N/A)", self.schools_with_water),
            |pct| format!("{} ({pct}%)", self.schools_with_water),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

impl CategoryShare {
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}

/// Facilities per reporting category, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssetDistribution {
    pub total: usize,
    pub by_type: Vec<(String, usize)>,
    pub categories: Vec<CategoryShare>,
}

impl AssetDistribution {
    pub fn compute(facilities: &[Facility]) -> Self {
        let mut by_type: Vec<(FacilityType, usize)> = Vec::new();
        for facility in facilities {
            match by_type
                .iter_mut()
                .find(|(kind, _)| *kind == facility.facility_type)
            {
                Some((_, count)) => *count += 1,
                None => by_type.push((facility.facility_type.clone(), 1)),
            }
        }

        let mut categories: Vec<CategoryShare> = Vec::new();
        for (kind, count) in &by_type {
            let label = kind.category();
            match categories.iter_mut().find(|share| share.label == label) {
                Some(share) => share.count += count,
                None => categories.push(CategoryShare {
                    label: label.to_string(),
                    count: *count,
                    percent: 0.0,
                }),
            }
        }

        let total = facilities.len();
        if total > 0 {
            for share in &mut categories {
                share.percent = share.count as f64 / total as f64 * 100.0;
            }
        }

        Self {
            total,
            by_type: by_type
                .into_iter()
                .map(|(kind, count)| (kind.label().to_string(), count))
                .collect(),
            categories,
        }
    }

    pub fn max_count(&self) -> usize {
        self.categories
            .iter()
            .map(|share| share.count)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school(with_access: u32, total: u32) -> School {
        serde_json::from_value(serde_json::json!({
            "name": "School",
            "type": "Primary",
            "washData": { "studentsWithWaterAccess": with_access, "totalStudents": total }
        }))
        .unwrap()
    }

    fn facility(id: &str, kind: &str, functionality: &str) -> Facility {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "type": kind,
            "functionality": functionality,
            "jmpStatus": "Basic Service"
        }))
        .unwrap()
    }

    #[test]
    fn counts_schools_above_half_access() {
        let schools = [school(80, 100), school(50, 100), school(0, 0), school(3, 4)];
        let summary = WashSummary::compute(&schools, &[]);

        assert_eq!(summary.total_schools, 4);
        assert_eq!(summary.schools_with_water, 2);
        assert_eq!(summary.schools_with_water_label(), "2 (50%)");
    }

    #[test]
    fn empty_school_list_has_no_percentage() {
        let summary = WashSummary::compute(&[], &[]);
        assert_eq!(summary.schools_with_water_percent, None);
        assert_eq!(summary.schools_with_water_label(), "0 (N/A)");
    }

    #[test]
    fn splits_functional_and_repair_assets() {
        let facilities = [
            facility("A", "Borehole", "Functioning"),
            facility("B", "Hand Pump", "Not Functioning"),
            facility("C", "Dug Well", "Partially Functioning"),
        ];
        let summary = WashSummary::compute(&[], &facilities);
        assert_eq!(summary.functional_assets, 1);
        assert_eq!(summary.assets_needing_repair, 2);
    }

    #[test]
    fn distribution_folds_types_into_categories() {
        let facilities = [
            facility("A", "Solar Pump", "Functioning"),
            facility("B", "Borehole", "Functioning"),
            facility("C", "Rainwater System", "Functioning"),
            facility("D", "Dug Well", "Functioning"),
        ];
        let distribution = AssetDistribution::compute(&facilities);

        let labels: Vec<_> = distribution
            .categories
            .iter()
            .map(|share| share.label.as_str())
            .collect();
        assert_eq!(labels, ["Private Taps", "Protected Spring", "Groundwater"]);
        assert_eq!(distribution.categories[0].count, 2);
        assert_eq!(distribution.categories[0].percent_label(), "50.0%");
        assert_eq!(distribution.categories[2].percent_label(), "25.0%");
        assert_eq!(distribution.max_count(), 2);
    }
}
