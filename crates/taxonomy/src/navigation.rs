use crate::config::AcronymPatterns;
use crate::error::{Result, TaxonomyError};
use crate::index::TaxonomyIndex;
use crate::types::{RegionId, ROOT_PARENT};
use std::collections::BTreeMap;

/// Which node field to use when composing a path string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathLabel {
    #[default]
    Name,
    Acronym,
}

impl TaxonomyIndex {
    /// Ancestors of `id`, most general first, ending with the immediate parent.
    /// Empty for a root; never contains `id` itself.
    pub fn ancestor_ids(&self, id: RegionId) -> Result<Vec<RegionId>> {
        let mut chain = Vec::new();
        let mut current = self.lookup(id)?.parent_id;

        while current != ROOT_PARENT {
            if chain.len() >= self.config.max_depth {
                return Err(TaxonomyError::CorruptIndex {
                    id,
                    steps: chain.len(),
                });
            }
            chain.push(current);
            current = self.lookup(current)?.parent_id;
        }

        chain.reverse();
        Ok(chain)
    }

    /// True when `ancestor` lies on the parent chain of `id`
    pub fn is_ancestor(&self, ancestor: RegionId, id: RegionId) -> Result<bool> {
        Ok(self.ancestor_ids(id)?.contains(&ancestor))
    }

    /// Direct children of `id` in input order
    pub fn children_ids(&self, id: RegionId) -> Result<Vec<RegionId>> {
        let slot = self.slot(id)?;
        Ok(self
            .child_slots(slot)
            .into_iter()
            .map(|child| self.graph[child].id)
            .collect())
    }

    /// All strict descendants of `id` in depth-first pre-order
    pub fn subtree_ids(&self, id: RegionId) -> Result<Vec<RegionId>> {
        let slot = self.slot(id)?;
        let mut stack: Vec<_> = self.child_slots(slot).into_iter().rev().collect();
        let mut ids = Vec::new();
        while let Some(next) = stack.pop() {
            ids.push(self.graph[next].id);
            stack.extend(self.child_slots(next).into_iter().rev());
        }
        Ok(ids)
    }

    /// All children of `id`'s parent, `id` included. For a root, all roots.
    pub fn sibling_ids(&self, id: RegionId) -> Result<Vec<RegionId>> {
        match self.lookup(id)?.parent() {
            Some(parent) => self.children_ids(parent),
            None => Ok(self.roots.clone()),
        }
    }

    /// Ancestor labels joined with `separator`, most general first, without
    /// `id`'s own label
    pub fn full_path(&self, id: RegionId, label: PathLabel, separator: &str) -> Result<String> {
        let parts = self
            .ancestor_ids(id)?
            .into_iter()
            .map(|ancestor| {
                let node = self.lookup(ancestor)?;
                Ok(match label {
                    PathLabel::Name => node.name.clone(),
                    PathLabel::Acronym => node.acronym.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join(separator))
    }

    pub fn ids_at_level(&self, level: usize) -> Vec<RegionId> {
        self.nodes()
            .filter(|node| node.level == level)
            .map(|node| node.id)
            .collect()
    }

    /// Ids whose acronym matches one of `patterns`, keyed by the matching
    /// pattern. A node is reported under its first matching pattern only.
    pub fn ids_matching_acronyms(&self, patterns: &AcronymPatterns) -> BTreeMap<String, Vec<RegionId>> {
        let mut matched: BTreeMap<String, Vec<RegionId>> = BTreeMap::new();
        for node in self.nodes() {
            if let Some(pattern) = patterns.first_match(&node.acronym) {
                matched.entry(pattern.to_string()).or_default().push(node.id);
            }
        }
        matched
    }

    /// Ids whose acronym equals `acronym` exactly
    pub fn find_by_acronym(&self, acronym: &str) -> Vec<RegionId> {
        self.nodes()
            .filter(|node| node.acronym == acronym)
            .map(|node| node.id)
            .collect()
    }
}
