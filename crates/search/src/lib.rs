//! Region name and acronym search over an atlas taxonomy.

mod acronym;
mod config;
mod error;
mod fuzzy;
pub mod ratio;

pub use acronym::AcronymSearch;
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use fuzzy::{RegionSearch, Scorer, SearchHit};
