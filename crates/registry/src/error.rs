use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TopoJSON boundary object not found (available: {available:?})")]
    MissingBoundaryObject { available: Vec<String> },

    #[error("Unsupported boundary document type: {0}")]
    UnsupportedDocument(String),

    #[error("Geometry references missing arc {0}")]
    InvalidArc(i64),
}
