//! Errors at the fallible edges: config files, roster/event payloads, I/O.
//!
//! Simulation operations themselves never fail; see `Transition` and the
//! empty-path convention instead.

/// Errors that can occur while loading configuration or parsing events
#[derive(Debug)]
pub enum OfficeError {
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidConfig(String),
}

impl From<std::io::Error> for OfficeError {
    fn from(e: std::io::Error) -> Self {
        OfficeError::Io(e)
    }
}

impl From<serde_json::Error> for OfficeError {
    fn from(e: serde_json::Error) -> Self {
        OfficeError::Json(e)
    }
}

impl std::fmt::Display for OfficeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfficeError::Io(e) => write!(f, "IO error: {}", e),
            OfficeError::Json(e) => write!(f, "JSON error: {}", e),
            OfficeError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for OfficeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OfficeError::Io(e) => Some(e),
            OfficeError::Json(e) => Some(e),
            OfficeError::InvalidConfig(_) => None,
        }
    }
}
