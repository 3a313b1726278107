use thiserror::Error;

/// Camera constraint, tried in [`FacingMode::PRIORITY`] order until one starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    Environment,
    User,
    Any,
}

impl FacingMode {
    pub const PRIORITY: [Self; 3] = [Self::Environment, Self::User, Self::Any];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Environment => "rear camera",
            Self::User => "front camera",
            Self::Any => "any camera",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("Camera access denied. Please allow camera access or use manual input.")]
    NotAllowed,
    #[error("No camera found on this device. Please use manual input.")]
    NotFound,
    #[error("Camera not supported on this device. Please use manual input.")]
    NotSupported,
    #[error("Camera requires a secure (HTTPS) connection. Please use manual input.")]
    InsecureContext,
    #[error("Unable to start camera: {0}. Please use manual input.")]
    Other(String),
}

impl CameraError {
    /// Map a platform error name and message onto a user-facing category.
    pub fn classify(name: &str, message: &str) -> Self {
        let lowered = message.to_ascii_lowercase();
        match name {
            "NotAllowedError" | "PermissionDeniedError" | "SecurityError" => Self::NotAllowed,
            "NotFoundError" | "DevicesNotFoundError" | "OverconstrainedError" => Self::NotFound,
            "NotSupportedError" | "TypeError" => Self::NotSupported,
            _ if lowered.contains("https") || lowered.contains("secure context") => {
                Self::InsecureContext
            }
            _ if lowered.contains("permission denied") => Self::NotAllowed,
            _ if lowered.contains("no video input") || lowered.contains("not found") => {
                Self::NotFound
            }
            _ if lowered.contains("not supported") => Self::NotSupported,
            _ => Self::Other(message.trim().to_string()),
        }
    }
}

/// A code-reading camera feed.
pub trait Camera {
    fn start(&mut self, facing: FacingMode) -> Result<(), CameraError>;
    fn stop(&mut self);
    fn is_active(&self) -> bool;
}

/// Camera access needs HTTPS, except on loopback hosts.
pub fn is_secure_context(protocol: &str, host: &str) -> bool {
    let host = match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };
    protocol.trim_end_matches(':').eq_ignore_ascii_case("https")
        || matches!(host, "localhost" | "127.0.0.1" | "[::1]" | "")
}

/// Stand-in for platforms without camera support.
#[derive(Debug, Default)]
pub struct NoCamera;

impl Camera for NoCamera {
    fn start(&mut self, _facing: FacingMode) -> Result<(), CameraError> {
        Err(CameraError::NotSupported)
    }

    fn stop(&mut self) {}

    fn is_active(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_error_name() {
        assert_eq!(
            CameraError::classify("NotAllowedError", "Permission denied"),
            CameraError::NotAllowed
        );
        assert_eq!(
            CameraError::classify("NotFoundError", "Requested device not found"),
            CameraError::NotFound
        );
        assert_eq!(
            CameraError::classify("NotSupportedError", ""),
            CameraError::NotSupported
        );
    }

    #[test]
    fn classifies_by_message_when_name_is_generic() {
        assert_eq!(
            CameraError::classify("Error", "Only secure origins are allowed (HTTPS)"),
            CameraError::InsecureContext
        );
        assert_eq!(
            CameraError::classify("Error", "No video input devices found"),
            CameraError::NotFound
        );
        assert_eq!(
            CameraError::classify("Error", " device busy "),
            CameraError::Other("device busy".to_string())
        );
    }

    #[test]
    fn every_message_points_to_manual_input() {
        let errors = [
            CameraError::NotAllowed,
            CameraError::NotFound,
            CameraError::NotSupported,
            CameraError::InsecureContext,
            CameraError::Other("busy".to_string()),
        ];
        for error in errors {
            assert!(error.to_string().contains("manual input"), "{error}");
        }
    }

    #[test]
    fn secure_context_allows_https_and_loopback() {
        assert!(is_secure_context("https:", "registry.example.org"));
        assert!(is_secure_context("http:", "localhost:8080"));
        assert!(is_secure_context("http", "127.0.0.1"));
        assert!(!is_secure_context("http:", "registry.example.org"));
    }

    #[test]
    fn secure_context_strips_only_numeric_ports() {
        assert!(is_secure_context("http:", "[::1]:8080"));
        assert!(is_secure_context("http:", "[::1]"));
        assert!(is_secure_context("http:", "localhost:3000"));
        assert!(!is_secure_context("http:", "registry.example.org:8080"));
    }

    #[test]
    fn no_camera_never_starts() {
        let mut camera = NoCamera;
        assert_eq!(camera.start(FacingMode::Any), Err(CameraError::NotSupported));
        assert!(!camera.is_active());
    }
}
