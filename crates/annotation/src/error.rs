use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnnotationError>;

#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("Taxonomy error: {0}")]
    Taxonomy(#[from] atlas_taxonomy::TaxonomyError),

    #[error("Malformed geometry: {0}")]
    MalformedGeometry(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
