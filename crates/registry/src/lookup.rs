//! Facility lookup by DPI id, fed either by a camera decoder or by typed input.
//!
//! [`LookupFlow`] owns the camera and is the only place the view changes, so every
//! path that resolves an id stops the stream before showing a result.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::camera::{Camera, CameraError, FacingMode};
use crate::records::Facility;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("DPI ID \"{0}\" not found in the database.")]
    NotFound(String),
    #[error("Facility data has not loaded yet. Please try again shortly.")]
    DatabaseNotLoaded,
    #[error(transparent)]
    Camera(#[from] CameraError),
}

/// Case-insensitive exact id match; the first record wins.
pub fn find_facility<'a>(facilities: &'a [Facility], id: &str) -> Option<(usize, &'a Facility)> {
    facilities
        .iter()
        .enumerate()
        .find(|(_, facility)| facility.id.eq_ignore_ascii_case(id))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupView {
    ScannerIdle,
    Scanning(FacingMode),
    /// Index into the facility list the lookup ran against.
    Detail(usize),
    Error(LookupError),
    List,
    Map,
}

#[derive(Debug)]
pub struct LookupFlow<C: Camera> {
    camera: C,
    secure_context: bool,
    view: LookupView,
    origin: LookupView,
}

impl<C: Camera> LookupFlow<C> {
    pub const fn new(camera: C, secure_context: bool) -> Self {
        Self {
            camera,
            secure_context,
            view: LookupView::ScannerIdle,
            origin: LookupView::ScannerIdle,
        }
    }

    pub const fn view(&self) -> &LookupView {
        &self.view
    }

    pub const fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn is_scanning(&self) -> bool {
        self.camera.is_active()
    }

    pub fn start_scanning(&mut self) {
        self.camera.stop();
        self.origin = LookupView::ScannerIdle;

        if !self.secure_context {
            warn!("camera requested outside a secure context");
            self.view = LookupView::Error(CameraError::InsecureContext.into());
            return;
        }

        let mut last_error = CameraError::NotFound;
        for facing in FacingMode::PRIORITY {
            match self.camera.start(facing) {
                Ok(()) => {
                    info!(camera = facing.label(), "scanner started");
                    self.view = LookupView::Scanning(facing);
                    return;
                }
                Err(error) => {
                    debug!(camera = facing.label(), %error, "camera constraint failed");
                    last_error = error;
                }
            }
        }

        warn!(error = %last_error, "unable to start scanner");
        self.camera.stop();
        self.view = LookupView::Error(last_error.into());
    }

    pub fn stop_scanning(&mut self) {
        self.camera.stop();
        if matches!(self.view, LookupView::Scanning(_)) {
            self.view = LookupView::ScannerIdle;
        }
    }

    /// A payload came off the camera decoder.
    pub fn on_decoded(&mut self, text: &str, facilities: &[Facility]) {
        self.resolve(text.trim(), facilities);
    }

    /// Typed id. Usable from any view; blank input is ignored.
    pub fn manual_entry(&mut self, input: &str, facilities: &[Facility]) {
        let id = input.trim();
        if id.is_empty() {
            return;
        }
        self.resolve(id, facilities);
    }

    /// Open a record picked from the facility list.
    pub fn select_from_list(&mut self, id: &str, facilities: &[Facility]) {
        self.origin = LookupView::List;
        self.resolve(id, facilities);
    }

    fn resolve(&mut self, id: &str, facilities: &[Facility]) {
        self.camera.stop();

        self.view = if facilities.is_empty() {
            LookupView::Error(LookupError::DatabaseNotLoaded)
        } else if let Some((index, facility)) = find_facility(facilities, id) {
            info!(id = %facility.id, "facility found");
            LookupView::Detail(index)
        } else {
            info!(%id, "facility not found");
            LookupView::Error(LookupError::NotFound(id.to_string()))
        };
    }

    /// Leave a detail or error view for wherever the lookup started.
    pub fn back(&mut self) {
        self.camera.stop();
        self.view = match self.view {
            LookupView::Detail(_) | LookupView::Error(_) => self.origin.clone(),
            LookupView::Scanning(_) | LookupView::Map => LookupView::ScannerIdle,
            LookupView::ScannerIdle | LookupView::List => self.view.clone(),
        };
    }

    pub fn reset_to_scanner(&mut self) {
        self.camera.stop();
        self.origin = LookupView::ScannerIdle;
        self.view = LookupView::ScannerIdle;
    }

    pub fn show_list(&mut self) {
        self.camera.stop();
        self.origin = LookupView::List;
        self.view = LookupView::List;
    }

    pub fn show_map(&mut self) {
        self.camera.stop();
        self.view = LookupView::Map;
    }

    pub fn selected_facility<'a>(&self, facilities: &'a [Facility]) -> Option<&'a Facility> {
        match self.view {
            LookupView::Detail(index) => facilities.get(index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FacilityType, Functionality};

    /// Records every start attempt and fails the modes it is told to.
    #[derive(Default)]
    struct MockCamera {
        failures: Vec<(FacingMode, CameraError)>,
        attempts: Vec<FacingMode>,
        active: bool,
    }

    impl Camera for MockCamera {
        fn start(&mut self, facing: FacingMode) -> Result<(), CameraError> {
            self.attempts.push(facing);
            if let Some((_, error)) = self.failures.iter().find(|(mode, _)| *mode == facing) {
                return Err(error.clone());
            }
            self.active = true;
            Ok(())
        }

        fn stop(&mut self) {
            self.active = false;
        }

        fn is_active(&self) -> bool {
            self.active
        }
    }

    fn facilities() -> Vec<Facility> {
        serde_json::from_value(serde_json::json!([
            { "id": "BH-2024-001", "type": "Borehole",
              "functionality": "Functioning", "jmpStatus": "Basic Service" },
            { "id": "HP-2023-014", "type": "Hand Pump",
              "functionality": "Not Functioning", "jmpStatus": "Limited Service" }
        ]))
        .unwrap()
    }

    fn scanning_flow() -> LookupFlow<MockCamera> {
        let mut flow = LookupFlow::new(MockCamera::default(), true);
        flow.start_scanning();
        flow
    }

    #[test]
    fn lookup_ignores_id_case() {
        let records = facilities();
        let (upper, _) = find_facility(&records, "BH-2024-001").unwrap();
        let (lower, _) = find_facility(&records, "bh-2024-001").unwrap();
        assert_eq!(upper, lower);
        assert!(find_facility(&records, "BH-2024").is_none());
    }

    #[test]
    fn decoded_and_manual_lookups_agree() {
        let records = facilities();
        let mut decoded = scanning_flow();
        decoded.on_decoded("bh-2024-001", &records);

        let mut manual = LookupFlow::new(MockCamera::default(), true);
        manual.manual_entry("  BH-2024-001 ", &records);

        assert_eq!(decoded.view(), manual.view());
        let facility = decoded.selected_facility(&records).unwrap();
        assert_eq!(facility.facility_type, FacilityType::Borehole);
        assert_eq!(facility.functionality, Functionality::Functioning);
        assert_eq!(facility.functionality.label(), "Functioning");
        assert!(!decoded.is_scanning());
    }

    #[test]
    fn unknown_id_reports_not_found_with_camera_stopped() {
        let records = facilities();
        let mut flow = scanning_flow();
        assert!(flow.is_scanning());

        flow.on_decoded("XX-0000-000", &records);

        assert_eq!(
            flow.view(),
            &LookupView::Error(LookupError::NotFound("XX-0000-000".to_string()))
        );
        assert!(!flow.is_scanning());
        assert_eq!(
            LookupError::NotFound("XX-0000-000".to_string()).to_string(),
            "DPI ID \"XX-0000-000\" not found in the database."
        );
    }

    #[test]
    fn empty_database_is_its_own_error() {
        let mut flow = LookupFlow::new(MockCamera::default(), true);
        flow.manual_entry("BH-2024-001", &[]);
        assert_eq!(flow.view(), &LookupView::Error(LookupError::DatabaseNotLoaded));
    }

    #[test]
    fn blank_manual_entry_is_ignored() {
        let mut flow = scanning_flow();
        flow.manual_entry("   ", &facilities());
        assert_eq!(flow.view(), &LookupView::Scanning(FacingMode::Environment));
    }

    #[test]
    fn camera_constraints_fall_back_in_priority_order() {
        let camera = MockCamera {
            failures: vec![
                (FacingMode::Environment, CameraError::NotFound),
                (FacingMode::User, CameraError::NotFound),
            ],
            ..MockCamera::default()
        };
        let mut flow = LookupFlow::new(camera, true);
        flow.start_scanning();

        assert_eq!(flow.view(), &LookupView::Scanning(FacingMode::Any));
        assert_eq!(
            flow.camera().attempts,
            [FacingMode::Environment, FacingMode::User, FacingMode::Any]
        );
    }

    #[test]
    fn every_constraint_failing_reports_the_last_error() {
        let camera = MockCamera {
            failures: FacingMode::PRIORITY
                .iter()
                .map(|mode| (*mode, CameraError::Other("busy".to_string())))
                .collect(),
            ..MockCamera::default()
        };
        let mut flow = LookupFlow::new(camera, true);
        flow.start_scanning();

        assert_eq!(
            flow.view(),
            &LookupView::Error(LookupError::Camera(CameraError::Other("busy".to_string())))
        );
        assert_eq!(flow.camera().attempts.len(), 3);
    }

    #[test]
    fn permission_denial_does_not_stop_the_fallback_chain() {
        let camera = MockCamera {
            failures: vec![
                (FacingMode::Environment, CameraError::NotAllowed),
                (FacingMode::User, CameraError::NotAllowed),
                (FacingMode::Any, CameraError::NotFound),
            ],
            ..MockCamera::default()
        };
        let mut flow = LookupFlow::new(camera, true);
        flow.start_scanning();

        assert_eq!(flow.camera().attempts, FacingMode::PRIORITY);
        assert_eq!(
            flow.view(),
            &LookupView::Error(LookupError::Camera(CameraError::NotFound))
        );
    }

    #[test]
    fn denied_rear_camera_falls_back_to_front() {
        let camera = MockCamera {
            failures: vec![(FacingMode::Environment, CameraError::NotAllowed)],
            ..MockCamera::default()
        };
        let mut flow = LookupFlow::new(camera, true);
        flow.start_scanning();

        assert_eq!(
            flow.camera().attempts,
            [FacingMode::Environment, FacingMode::User]
        );
        assert_eq!(flow.view(), &LookupView::Scanning(FacingMode::User));
        assert!(flow.is_scanning());
    }

    #[test]
    fn insecure_context_never_touches_the_camera() {
        let mut flow = LookupFlow::new(MockCamera::default(), false);
        flow.start_scanning();

        assert!(flow.camera().attempts.is_empty());
        assert_eq!(
            flow.view(),
            &LookupView::Error(LookupError::Camera(CameraError::InsecureContext))
        );
    }

    #[test]
    fn back_returns_to_where_the_lookup_started() {
        let records = facilities();
        let mut flow = LookupFlow::new(MockCamera::default(), true);

        flow.show_list();
        flow.select_from_list("HP-2023-014", &records);
        assert_eq!(flow.view(), &LookupView::Detail(1));
        flow.back();
        assert_eq!(flow.view(), &LookupView::List);

        flow.start_scanning();
        flow.on_decoded("nope", &records);
        flow.back();
        assert_eq!(flow.view(), &LookupView::ScannerIdle);
    }

    #[test]
    fn switching_views_stops_the_stream() {
        let mut flow = scanning_flow();
        flow.show_map();
        assert!(!flow.is_scanning());
        assert_eq!(flow.view(), &LookupView::Map);

        flow.start_scanning();
        flow.reset_to_scanner();
        assert!(!flow.is_scanning());
        assert_eq!(flow.view(), &LookupView::ScannerIdle);
    }
}
