use std::cmp::Ordering;
use std::ops::Range;

use serde::Serialize;

use crate::boundary::Boundaries;
use crate::filters::FilterState;
use crate::records::Facility;

pub const ROWS_PER_PAGE: usize = 5;

/// One overview row per boundary feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistrictRow {
    pub district: String,
    pub county: String,
    pub functionality: u8,
    pub assets: usize,
}

impl DistrictRow {
    pub fn build(boundaries: &Boundaries, facilities: &[Facility]) -> Vec<Self> {
        boundaries
            .features
            .iter()
            .map(|feature| Self {
                district: feature.district.clone(),
                county: feature.county.clone(),
                functionality: feature.functionality,
                assets: facilities
                    .iter()
                    .filter(|facility| {
                        facility
                            .county
                            .as_deref()
                            .is_some_and(|county| county.eq_ignore_ascii_case(&feature.county))
                    })
                    .count(),
            })
            .collect()
    }

    /// Rows in the selected county, sorted.
    pub fn visible(rows: &[Self], filters: &FilterState, sort: SortState) -> Vec<Self> {
        let mut visible: Vec<Self> = rows
            .iter()
            .filter(|row| filters.county_matches(&row.county))
            .cloned()
            .collect();
        sort.apply(&mut visible);
        visible
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    District,
    County,
    Assets,
    Functionality,
}

impl SortKey {
    pub const ALL: [Self; 4] = [Self::District, Self::County, Self::Assets, Self::Functionality];

    pub const fn label(self) -> &'static str {
        match self {
            Self::District => "District",
            Self::County => "County",
            Self::Assets => "Assets",
            Self::Functionality => "Functionality",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::District),
            1 => Some(Self::County),
            2 => Some(Self::Assets),
            3 => Some(Self::Functionality),
            _ => None,
        }
    }

    fn compare(self, a: &DistrictRow, b: &DistrictRow) -> Ordering {
        match self {
            Self::District => a.district.cmp(&b.district),
            Self::County => a.county.cmp(&b.county),
            Self::Assets => a.assets.cmp(&b.assets),
            Self::Functionality => a.functionality.cmp(&b.functionality),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub const fn flip(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::District,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortState {
    /// Choosing the active key again flips the direction; a new key starts ascending.
    pub fn select(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flip();
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }

    pub fn apply(self, rows: &mut [DistrictRow]) {
        rows.sort_by(|a, b| {
            let ordering = self.key.compare(a, b);
            match self.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
}

/// 1-based pagination over a row count that may change underneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    rows_per_page: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(ROWS_PER_PAGE)
    }
}

impl Pager {
    pub const fn new(rows_per_page: usize) -> Self {
        Self {
            page: 1,
            rows_per_page: if rows_per_page == 0 { 1 } else { rows_per_page },
        }
    }

    pub const fn page(&self) -> usize {
        self.page
    }

    pub const fn total_pages(&self, total: usize) -> usize {
        let pages = total.div_ceil(self.rows_per_page);
        if pages == 0 {
            1
        } else {
            pages
        }
    }

    pub fn clamp(&mut self, total: usize) {
        self.page = self.page.clamp(1, self.total_pages(total));
    }

    pub fn next(&mut self, total: usize) {
        self.page = (self.page + 1).min(self.total_pages(total));
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn go_to(&mut self, page: usize, total: usize) {
        self.page = page;
        self.clamp(total);
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Index range of the rows on the current page.
    pub fn slice(&self, total: usize) -> Range<usize> {
        let start = ((self.page - 1) * self.rows_per_page).min(total);
        let end = (start + self.rows_per_page).min(total);
        start..end
    }

    /// "Showing start to end": 1-based and inclusive, `(0, 0)` for an empty table.
    pub fn showing(&self, total: usize) -> (usize, usize) {
        let range = self.slice(total);
        if range.is_empty() {
            (0, 0)
        } else {
            (range.start + 1, range.end)
        }
    }

    /// Up to `width` page numbers around the current page.
    pub fn page_window(&self, total: usize, width: usize) -> Vec<usize> {
        let pages = self.total_pages(total);
        let width = width.clamp(1, pages);
        let half = width / 2;
        let start = self
            .page
            .saturating_sub(half)
            .max(1)
            .min(pages + 1 - width);
        (start..start + width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{BoundaryFeature, Boundaries};

    fn row(district: &str, county: &str, functionality: u8, assets: usize) -> DistrictRow {
        DistrictRow {
            district: district.to_string(),
            county: county.to_string(),
            functionality,
            assets,
        }
    }

    #[test]
    fn rows_count_facilities_in_the_same_county() {
        let boundaries = Boundaries {
            features: vec![BoundaryFeature {
                county: "Montserrado".to_string(),
                district: "Greater Monrovia".to_string(),
                functionality: 44,
                rings: Vec::new(),
            }],
            counties: vec!["Montserrado".to_string()],
        };
        let facilities: Vec<Facility> = serde_json::from_value(serde_json::json!([
            { "id": "A", "type": "Borehole", "county": "montserrado",
              "functionality": "Functioning", "jmpStatus": "Basic Service" },
            { "id": "B", "type": "Borehole", "county": "Bong",
              "functionality": "Functioning", "jmpStatus": "Basic Service" },
            { "id": "C", "type": "Borehole",
              "functionality": "Functioning", "jmpStatus": "Basic Service" }
        ]))
        .unwrap();

        let rows = DistrictRow::build(&boundaries, &facilities);
        assert_eq!(rows, [row("Greater Monrovia", "Montserrado", 44, 1)]);
    }

    #[test]
    fn selecting_the_same_key_flips_direction() {
        let mut sort = SortState::default();
        sort.select(SortKey::Assets);
        assert_eq!(sort.direction, SortDirection::Ascending);
        sort.select(SortKey::Assets);
        assert_eq!(sort.direction, SortDirection::Descending);
        sort.select(SortKey::County);
        assert_eq!(sort.direction, SortDirection::Ascending);
    }

    #[test]
    fn visible_rows_are_filtered_then_sorted() {
        let rows = [
            row("Gbarnga", "Bong", 36, 4),
            row("Kakata", "Margibi", 60, 2),
            row("Salala", "Bong", 71, 9),
        ];
        let mut filters = FilterState::default();
        filters.county = "bong".to_string();
        let sort = SortState {
            key: SortKey::Functionality,
            direction: SortDirection::Descending,
        };

        let visible = DistrictRow::visible(&rows, &filters, sort);
        let names: Vec<_> = visible.iter().map(|r| r.district.as_str()).collect();
        assert_eq!(names, ["Salala", "Gbarnga"]);
    }

    #[test]
    fn pager_clamps_and_reports_showing_range() {
        let mut pager = Pager::default();
        assert_eq!(pager.total_pages(0), 1);
        assert_eq!(pager.showing(0), (0, 0));
        assert_eq!(pager.total_pages(12), 3);

        pager.go_to(9, 12);
        assert_eq!(pager.page(), 3);
        assert_eq!(pager.slice(12), 10..12);
        assert_eq!(pager.showing(12), (11, 12));

        pager.clamp(4);
        assert_eq!(pager.page(), 1);
        pager.prev();
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn page_window_centres_on_current_page() {
        let mut pager = Pager::default();
        let total = 50; // 10 pages
        assert_eq!(pager.page_window(total, 5), [1, 2, 3, 4, 5]);

        pager.go_to(6, total);
        assert_eq!(pager.page_window(total, 5), [4, 5, 6, 7, 8]);

        pager.go_to(10, total);
        assert_eq!(pager.page_window(total, 5), [6, 7, 8, 9, 10]);

        assert_eq!(pager.page_window(7, 5), [1, 2]);
    }
}
