use crate::types::RegionId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaxonomyError>;

#[derive(Error, Debug)]
pub enum TaxonomyError {
    /// A node in the raw description is missing a required field or carries
    /// an unusable value
    #[error("Malformed taxonomy: {0}")]
    Malformed(String),

    #[error("Duplicate region id: {0}")]
    DuplicateId(RegionId),

    /// The id collides with the value reserved for "no parent"
    #[error("Region id {0} is reserved as the root parent sentinel")]
    ReservedId(RegionId),

    #[error("Unknown region id: {0}")]
    UnknownId(RegionId),

    /// Parent links did not reach a root within the configured depth bound
    #[error("Corrupt index: ancestor walk from {id} did not terminate after {steps} steps")]
    CorruptIndex { id: RegionId, steps: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
