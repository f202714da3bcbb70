use serde::{Deserialize, Serialize};

/// Cutoffs and filters for region name search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Minimum score (0-100) for the primary scorer
    pub cutoff: f64,

    /// Minimum score for the token based fallbacks
    pub fallback_cutoff: f64,

    /// Drop names containing "of" unless the query contains it
    pub suppress_of: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cutoff: 85.0,
            fallback_cutoff: 90.0,
            suppress_of: true,
        }
    }
}
