use crate::annotation::Annotation;
use crate::error::Result;
use crate::shape::Shape;
use atlas_taxonomy::{RegionId, TaxonomyIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Geometry synthesized for a region from its annotated descendants
#[derive(Debug, Clone, PartialEq)]
pub struct Supershape {
    /// `None` when nothing under the region is annotated
    pub shape: Option<Shape>,
    /// Annotated descendants unioned into `shape`; empty when the region
    /// is itself annotated
    pub contributors: Vec<RegionId>,
}

/// Aggregation bookkeeping for one reachable region
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReachableEntry {
    /// Direct children that are annotated
    pub annotated_children: Vec<RegionId>,
    /// Non-annotated reachable descendants claimed by this region
    pub aggregatable: Vec<RegionId>,
}

/// Regions that no annotation reaches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nonreachable {
    /// Unreached parent -> its unreached children
    pub by_parent: BTreeMap<RegionId, Vec<RegionId>>,
    /// Unreached regions whose parent is reached, plus unreached roots
    pub leaves: Vec<RegionId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionStatus {
    /// Drawn directly
    Annotated,
    /// Ancestor of at least one drawn region
    Aggregatable,
    Unreachable,
}

/// Status of every region for one annotation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub status: BTreeMap<RegionId, RegionStatus>,
}

impl Classification {
    pub fn count(&self, status: RegionStatus) -> usize {
        self.status.values().filter(|s| **s == status).count()
    }

    pub fn ids_with(&self, status: RegionStatus) -> Vec<RegionId> {
        self.status
            .iter()
            .filter(|(_, s)| **s == status)
            .map(|(id, _)| *id)
            .collect()
    }
}

/// Hierarchical views of one annotation over a taxonomy
pub struct Aggregator<'a> {
    index: &'a TaxonomyIndex,
    annotation: &'a Annotation,
    /// Ancestor chain (most general first) of every annotated id
    chains: HashMap<RegionId, Vec<RegionId>>,
}

impl<'a> Aggregator<'a> {
    /// Fails if an annotated id is not in the taxonomy
    pub fn new(index: &'a TaxonomyIndex, annotation: &'a Annotation) -> Result<Self> {
        let chains = annotation
            .ids()
            .map(|id| Ok((id, index.ancestor_ids(id)?)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self {
            index,
            annotation,
            chains,
        })
    }

    fn chain(&self, id: RegionId) -> &[RegionId] {
        self.chains.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Union of the annotated shapes below `id`.
    ///
    /// An annotated `id` yields its own shape and no contributors.
    pub fn supershape(&self, id: RegionId) -> Result<Supershape> {
        self.index.lookup(id)?;

        if let Some(shape) = self.annotation.get(id) {
            return Ok(Supershape {
                shape: Some(shape.clone()),
                contributors: Vec::new(),
            });
        }

        let mut shape: Option<Shape> = None;
        let mut contributors = Vec::new();
        for (drawn, drawn_shape) in self.annotation.iter() {
            if !self.chain(drawn).contains(&id) {
                continue;
            }
            contributors.push(drawn);
            shape = Some(match shape {
                None => drawn_shape.clone(),
                Some(acc) => acc.union(drawn_shape),
            });
        }

        log::debug!("Supershape of {}: {} contributors", id, contributors.len());
        Ok(Supershape { shape, contributors })
    }

    /// Non-annotated ancestors of annotated ids
    pub fn reachable_ids(&self) -> BTreeSet<RegionId> {
        self.chains
            .values()
            .flatten()
            .copied()
            .filter(|id| !self.annotation.contains(*id))
            .collect()
    }

    /// Per reachable region: annotated direct children and the reachable
    /// regions it aggregates.
    ///
    /// Chains are walked outward from each annotated id in ascending id
    /// order. A reachable region is registered once, under its nearest
    /// non-annotated ancestor; annotated ancestors in between are skipped.
    /// A reachable region with no such ancestor is in no list.
    pub fn reachable_parents(&self) -> BTreeMap<RegionId, ReachableEntry> {
        let mut parents: BTreeMap<RegionId, ReachableEntry> = BTreeMap::new();
        let mut registered: HashSet<RegionId> = HashSet::new();

        for drawn in self.annotation.ids() {
            let mut child = drawn;
            let mut pending: Option<RegionId> = None;
            for &ancestor in self.chain(drawn).iter().rev() {
                if self.annotation.contains(ancestor) {
                    child = ancestor;
                    continue;
                }

                let entry = parents.entry(ancestor).or_default();
                if child == drawn {
                    entry.annotated_children.push(drawn);
                }
                if let Some(claimed) = pending.take() {
                    if registered.insert(claimed) {
                        entry.aggregatable.push(claimed);
                    }
                }
                pending = Some(ancestor);
                child = ancestor;
            }
        }

        log::debug!(
            "{} reachable regions for {} annotated",
            parents.len(),
            self.annotation.len()
        );
        parents
    }

    /// Frontier of regions neither annotated nor reachable
    pub fn nonreachable(&self) -> Nonreachable {
        let reachable = self.reachable_ids();
        let reached = |id: RegionId| self.annotation.contains(id) || reachable.contains(&id);

        let mut result = Nonreachable::default();
        for node in self.index.nodes() {
            if reached(node.id) {
                continue;
            }
            match node.parent() {
                Some(parent) if !reached(parent) => {
                    result.by_parent.entry(parent).or_default().push(node.id)
                }
                _ => result.leaves.push(node.id),
            }
        }
        result
    }

    /// Annotated id -> annotated ids drawn inside it (its annotated descendants)
    pub fn nested_annotations(&self) -> BTreeMap<RegionId, Vec<RegionId>> {
        let mut nested: BTreeMap<RegionId, Vec<RegionId>> = BTreeMap::new();
        for drawn in self.annotation.ids() {
            for &ancestor in self.chain(drawn) {
                if self.annotation.contains(ancestor) {
                    nested.entry(ancestor).or_default().push(drawn);
                }
            }
        }
        nested
    }

    /// Three-way partition of every indexed region
    pub fn classify(&self) -> Classification {
        let reachable = self.reachable_ids();
        let status = self
            .index
            .ids()
            .iter()
            .map(|&id| {
                let status = if self.annotation.contains(id) {
                    RegionStatus::Annotated
                } else if reachable.contains(&id) {
                    RegionStatus::Aggregatable
                } else {
                    RegionStatus::Unreachable
                };
                (id, status)
            })
            .collect();
        Classification { status }
    }
}
