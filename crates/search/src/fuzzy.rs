use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::ratio;
use atlas_taxonomy::{RegionId, TaxonomyIndex};
use serde::{Deserialize, Serialize};

/// Similarity function used to score a name against the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scorer {
    Ratio,
    Partial,
    TokenSort,
    PartialTokenSort,
}

impl Scorer {
    pub fn score(self, query: &str, name: &str) -> f64 {
        match self {
            Scorer::Ratio => ratio::ratio(query, name),
            Scorer::Partial => ratio::partial_ratio(query, name),
            Scorer::TokenSort => ratio::token_sort_ratio(query, name),
            Scorer::PartialTokenSort => ratio::partial_token_sort_ratio(query, name),
        }
    }
}

/// Ranked search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: RegionId,
    pub name: String,
    /// 0-100
    pub score: f64,
    pub scorer: Scorer,
}

const PERFECT: f64 = 100.0;

/// Fuzzy region name search over a built index
pub struct RegionSearch<'a> {
    index: &'a TaxonomyIndex,
    config: SearchConfig,
}

impl<'a> RegionSearch<'a> {
    pub fn new(index: &'a TaxonomyIndex) -> Self {
        Self::with_config(index, SearchConfig::default())
    }

    pub fn with_config(index: &'a TaxonomyIndex, config: SearchConfig) -> Self {
        Self { index, config }
    }

    /// Search every region name.
    ///
    /// Scores lower-cased names with [`Scorer::Ratio`] (or [`Scorer::Partial`]
    /// when `partial`), keeps hits at or above the cutoff ranked by descending
    /// score, and truncates to `limit` (`None` = unbounded). In non-partial
    /// mode a perfect hit suppresses all imperfect ones, and an empty result
    /// falls back to [`Scorer::TokenSort`] then [`Scorer::PartialTokenSort`]
    /// at the fallback cutoff. Ties keep taxonomy pre-order.
    pub fn search(&self, query: &str, partial: bool, limit: Option<usize>) -> Result<Vec<SearchHit>> {
        self.search_candidates(query, self.index.ids(), partial, limit)
    }

    /// Search restricted to the strict descendants of `root`
    pub fn search_within(
        &self,
        root: RegionId,
        query: &str,
        partial: bool,
        limit: Option<usize>,
    ) -> Result<Vec<SearchHit>> {
        let candidates = self.index.subtree_ids(root)?;
        self.search_candidates(query, &candidates, partial, limit)
    }

    fn search_candidates(
        &self,
        query: &str,
        candidates: &[RegionId],
        partial: bool,
        limit: Option<usize>,
    ) -> Result<Vec<SearchHit>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let mut hits = if partial {
            self.score_all(&query, candidates, Scorer::Partial, self.config.cutoff)
        } else {
            let mut hits = self.score_all(&query, candidates, Scorer::Ratio, self.config.cutoff);

            if hits.iter().any(|hit| hit.score >= PERFECT) {
                hits.retain(|hit| hit.score >= PERFECT);
            }

            for fallback in [Scorer::TokenSort, Scorer::PartialTokenSort] {
                if !hits.is_empty() {
                    break;
                }
                log::debug!("No hits for '{}', retrying with {:?}", query, fallback);
                hits = self.score_all(&query, candidates, fallback, self.config.fallback_cutoff);
            }

            hits
        };

        if let Some(limit) = limit {
            hits.truncate(limit);
        }

        log::debug!("Search '{}' (partial={}): {} hits", query, partial, hits.len());
        Ok(hits)
    }

    fn score_all(&self, query: &str, candidates: &[RegionId], scorer: Scorer, cutoff: f64) -> Vec<SearchHit> {
        let drop_of = self.config.suppress_of && !query.contains("of");

        let mut hits: Vec<SearchHit> = candidates
            .iter()
            .filter_map(|id| self.index.get(*id))
            .filter_map(|node| {
                let name = node.name.to_lowercase();
                if drop_of && name.contains("of") {
                    return None;
                }
                let score = scorer.score(query, &name);
                (score >= cutoff).then(|| SearchHit {
                    id: node.id,
                    name: node.name.clone(),
                    score,
                    scorer,
                })
            })
            .collect();

        // Stable: equal scores keep candidate order
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits
    }
}
