use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Empty query")]
    EmptyQuery,

    #[error("Taxonomy error: {0}")]
    Taxonomy(#[from] atlas_taxonomy::TaxonomyError),
}
