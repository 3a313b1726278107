use crate::records::{Coordinates, WashData};

/// `round(numerator / denominator * 100)`, or `None` when the denominator is zero.
pub fn percentage(numerator: u32, denominator: u32) -> Option<u32> {
    if denominator == 0 {
        return None;
    }

    let ratio = f64::from(numerator) / f64::from(denominator);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some((ratio * 100.0).round() as u32)
}

pub fn percentage_label(numerator: u32, denominator: u32) -> String {
    percentage(numerator, denominator).map_or_else(|| "N/A".to_string(), |pct| format!("{pct}%"))
}

/// "80/100 (80%)", or "0/0 (N/A)" for a school without enrolment figures.
pub fn water_access_label(data: &WashData) -> String {
    format!(
        "{}/{} ({})",
        data.students_with_water_access,
        data.total_students,
        percentage_label(data.students_with_water_access, data.total_students)
    )
}

pub fn toilets_label(data: &WashData) -> String {
    format!("{} / {}", data.functional_toilets, data.total_toilets)
}

pub fn storage_label(data: &WashData) -> String {
    format!("{} {}", data.water_storage_capacity, data.storage_unit)
        .trim_end()
        .to_string()
}

pub fn coordinates_label(coordinates: &Coordinates) -> String {
    format!("{:.4}, {:.4}", coordinates.latitude, coordinates.longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wash(with_access: u32, total: u32) -> WashData {
        WashData {
            students_with_water_access: with_access,
            total_students: total,
            ..WashData::default()
        }
    }

    #[test]
    fn water_access_shows_rounded_percentage() {
        assert_eq!(water_access_label(&wash(80, 100)), "80/100 (80%)");
        assert_eq!(water_access_label(&wash(1, 3)), "1/3 (33%)");
        assert_eq!(water_access_label(&wash(2, 3)), "2/3 (67%)");
    }

    #[test]
    fn zero_students_is_not_a_number() {
        assert_eq!(water_access_label(&wash(0, 0)), "0/0 (N/A)");
        assert_eq!(percentage(5, 0), None);
    }

    #[test]
    fn half_rounds_up() {
        assert_eq!(percentage(1, 8), Some(13));
        assert_eq!(percentage(1, 200), Some(1));
    }

    #[test]
    fn storage_and_coordinates_format() {
        let data = WashData {
            water_storage_capacity: 2500.0,
            storage_unit: "L".to_string(),
            ..WashData::default()
        };
        assert_eq!(storage_label(&data), "2500 L");
        assert_eq!(
            coordinates_label(&Coordinates {
                latitude: 6.300_774,
                longitude: -10.797_160,
            }),
            "6.3008, -10.7972"
        );
    }
}
