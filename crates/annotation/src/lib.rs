//! # Atlas Annotation
//!
//! Aggregation of sparse per-region drawings over a taxonomy, and geometric
//! relationships between the drawn shapes.
//!
//! ## Architecture
//!
//! ```text
//! AnnotationRecord JSON ──> Annotation (id -> Shape, parts unioned)
//!                               │
//!     TaxonomyIndex ──┐         │
//!                     ▼         ▼
//!                 Aggregator ──> supershape, reachable parents,
//!                                nonreachable frontier, classification
//!
//! Annotation ──> Adjacency (touches / crosses / intersects / overlaps)
//! Shape      ──> nearest_shape, shape_orientation, properties
//! ```
//!
//! ## Example
//!
//! ```rust
//! use atlas_annotation::{Aggregator, Annotation, Shape};
//! use atlas_taxonomy::{RawNode, TaxonomyIndex};
//!
//! let roots = vec![RawNode::new(1, "A", "Root", "ff0000")
//!     .with_children(vec![RawNode::new(2, "B", "Child", "00ff00")])];
//! let index = TaxonomyIndex::build(&roots).unwrap();
//!
//! let square = Shape::from_rings(&[vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]).unwrap();
//! let annotation: Annotation = vec![(2, square.clone())].into_iter().collect();
//!
//! let aggregator = Aggregator::new(&index, &annotation).unwrap();
//! let parent = aggregator.supershape(1).unwrap();
//! assert_eq!(parent.shape, Some(square));
//! assert_eq!(parent.contributors, vec![2]);
//! ```

mod aggregate;
mod annotation;
mod error;
mod relations;
mod shape;

pub use aggregate::{
    Aggregator, Classification, Nonreachable, ReachableEntry, RegionStatus, Supershape,
};
pub use annotation::{Annotation, AnnotationRecord};
pub use error::{AnnotationError, Result};
pub use relations::{
    nearest_shape, orientation_line, properties, shape_orientation, Adjacency, NearestMatch,
    Predicate, ShapeProperties,
};
pub use shape::{RawRing, Shape};
