//! # Atlas Taxonomy
//!
//! Immutable index over a hierarchical anatomical taxonomy (a forest of named
//! regions), with ancestor/descendant navigation and coarse semantic grouping.
//!
//! ## Architecture
//!
//! ```text
//! taxonomy JSON
//!     │
//!     ├──> source::parse_forest
//!     │      └─ RawNode tree (fields validated later)
//!     │
//!     └──> TaxonomyIndex::build (petgraph arena + id map)
//!            ├─ level / parent id per node
//!            ├─ pre-order id list
//!            └─ group membership (computed once)
//!
//! TaxonomyIndex ──> ancestors, children, siblings, paths, level/acronym scans
//!               └─> outline rendering
//! ```
//!
//! ## Example
//!
//! ```rust
//! use atlas_taxonomy::{RawNode, TaxonomyIndex};
//!
//! let roots = vec![RawNode::new(1, "A", "Root", "ff0000")
//!     .with_children(vec![RawNode::new(2, "B", "Child", "00ff00")])];
//! let index = TaxonomyIndex::build(&roots).unwrap();
//!
//! assert_eq!(index.lookup(2).unwrap().level, 1);
//! assert_eq!(index.ancestor_ids(2).unwrap(), vec![1]);
//! ```

mod config;
mod error;
mod groups;
mod index;
mod navigation;
mod render;
mod source;
mod types;

pub use config::{AcronymPatterns, GroupConfig, GroupSpec, TaxonomyConfig, LAYERED_ZONES};
pub use error::{Result, TaxonomyError};
pub use index::TaxonomyIndex;
pub use navigation::PathLabel;
pub use source::{forest_from_value, parse_forest, RawNode};
pub use types::{RegionId, Rgb, TaxonomyNode, ROOT_PARENT};
