use crate::error::Result;
use crate::shape::{RawRing, Shape};
use atlas_taxonomy::RegionId;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Sparse mapping from region id to the shape drawn for it.
///
/// Iteration is in ascending id order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    shapes: BTreeMap<RegionId, Shape>,
}

/// One drawn part as exchanged with the geometry collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: RegionId,
    /// First ring is the shell, the rest are holes
    pub rings: Vec<RawRing>,
}

impl Annotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shape of `id`, returning the previous one
    pub fn insert(&mut self, id: RegionId, shape: Shape) -> Option<Shape> {
        self.shapes.insert(id, shape)
    }

    /// Build from drawn parts, unioning parts that share an id
    pub fn from_parts<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = (RegionId, Shape)>,
    {
        let mut shapes: BTreeMap<RegionId, Shape> = BTreeMap::new();
        for (id, shape) in parts {
            match shapes.entry(id) {
                Entry::Vacant(slot) => {
                    slot.insert(shape);
                }
                Entry::Occupied(mut slot) => {
                    let merged = slot.get().union(&shape);
                    slot.insert(merged);
                }
            }
        }
        Self { shapes }
    }

    /// Build from collaborator records.
    ///
    /// Records without rings are skipped; malformed rings are an error.
    pub fn from_records(records: &[AnnotationRecord]) -> Result<Self> {
        let mut parts = Vec::with_capacity(records.len());
        for record in records {
            if record.rings.is_empty() {
                log::warn!("Skipping part of region {} without rings", record.id);
                continue;
            }
            parts.push((record.id, Shape::from_rings(&record.rings)?));
        }
        Ok(Self::from_parts(parts))
    }

    /// Parse a JSON array of [`AnnotationRecord`]s
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<AnnotationRecord> = serde_json::from_str(json)?;
        Self::from_records(&records)
    }

    pub fn get(&self, id: RegionId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn contains(&self, id: RegionId) -> bool {
        self.shapes.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.shapes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &Shape)> + '_ {
        self.shapes.iter().map(|(id, shape)| (*id, shape))
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl FromIterator<(RegionId, Shape)> for Annotation {
    fn from_iter<I: IntoIterator<Item = (RegionId, Shape)>>(iter: I) -> Self {
        Self {
            shapes: iter.into_iter().collect(),
        }
    }
}
