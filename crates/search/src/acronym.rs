use atlas_taxonomy::{RegionId, TaxonomyIndex};
use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Matcher, Utf32String};

/// Fuzzy acronym lookup using nucleo-matcher
pub struct AcronymSearch {
    matcher: Matcher,
}

impl AcronymSearch {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
        }
    }

    /// Rank acronyms against `query` (smart case).
    /// Returns (id, score) sorted by score descending, scores normalized so the
    /// best hit is 1.0. Ties keep taxonomy pre-order.
    pub fn search(&mut self, query: &str, index: &TaxonomyIndex, limit: usize) -> Vec<(RegionId, f32)> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let pattern = Pattern::parse(query, CaseMatching::Smart, Normalization::Smart);

        let mut scored: Vec<(RegionId, u32)> = index
            .nodes()
            .filter_map(|node| {
                let haystack = Utf32String::from(node.acronym.as_str());
                pattern
                    .score(haystack.slice(..), &mut self.matcher)
                    .map(|score| (node.id, score))
            })
            .collect();

        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(limit);

        let max_score = scored.first().map(|(_, s)| *s as f32).unwrap_or(1.0);

        scored
            .into_iter()
            .map(|(id, score)| {
                let normalized = if max_score > 0.0 {
                    score as f32 / max_score
                } else {
                    0.0
                };
                (id, normalized)
            })
            .collect()
    }
}

impl Default for AcronymSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_taxonomy::RawNode;

    fn index() -> TaxonomyIndex {
        let roots = vec![
            RawNode::new(1, "CP-FCTx", "Cortical plate, frontal", "000000"),
            RawNode::new(2, "SP-FCTx", "Subplate, frontal", "000000"),
            RawNode::new(3, "TH", "Thalamus", "000000"),
            RawNode::new(4, "HY", "Hypothalamus", "000000"),
        ];
        TaxonomyIndex::build(&roots).unwrap()
    }

    #[test]
    fn test_acronym_exact_is_best() {
        let mut search = AcronymSearch::new();
        let results = search.search("TH", &index(), 5);

        assert!(!results.is_empty());
        assert_eq!(results[0].0, 3);
        assert_eq!(results[0].1, 1.0);
    }

    #[test]
    fn test_acronym_fuzzy_prefix() {
        let mut search = AcronymSearch::new();
        let results = search.search("cpfc", &index(), 5);

        assert!(results.iter().any(|(id, _)| *id == 1));
        assert!(results.iter().all(|(id, _)| *id != 3));
    }

    #[test]
    fn test_acronym_empty_query() {
        let mut search = AcronymSearch::new();
        assert!(search.search("  ", &index(), 5).is_empty());
    }
}
