// Shared registry logic for the terminal and web dashboards.
// Everything here is pure: callers do the fetching and hand us the bodies.

pub mod boundary;
pub mod camera;
pub mod domain;
pub mod error;
pub mod expansion;
pub mod filters;
pub mod format;
pub mod loader;
pub mod lookup;
pub mod records;
pub mod summary;
pub mod table;

pub use boundary::{BoundaryFeature, BoundarySchema, Boundaries, FunctionalityBand};
pub use camera::{Camera, CameraError, FacingMode};
pub use domain::{FacilityType, Functionality, JmpStatus, SchoolType};
pub use error::RegistryError;
pub use expansion::ExpansionState;
pub use filters::{FilterField, FilterOptions, FilterState, FILTER_STORAGE_KEY};
pub use loader::{Dataset, DocumentKind, DocumentLoad, Endpoints};
pub use lookup::{find_facility, LookupError, LookupFlow, LookupView};
pub use records::{Facility, IndicatorSources, School, WashData};
pub use summary::{AssetDistribution, WashSummary};
pub use table::{DistrictRow, Pager, SortDirection, SortKey, SortState};
