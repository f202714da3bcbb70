use crate::config::TaxonomyConfig;
use crate::error::{Result, TaxonomyError};
use crate::groups::GroupMembership;
use crate::source::RawNode;
use crate::types::{RegionId, Rgb, TaxonomyNode, ROOT_PARENT};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

/// Immutable, id-keyed index over a taxonomy forest.
///
/// Nodes live in a petgraph arena with parent -> child edges; `id_index`
/// resolves region ids to arena slots. Everything is computed by
/// [`TaxonomyIndex::build`] and never mutated afterwards, so a built index can
/// be shared across threads.
#[derive(Debug, Clone)]
pub struct TaxonomyIndex {
    pub(crate) graph: DiGraph<TaxonomyNode, ()>,

    pub(crate) id_index: HashMap<RegionId, NodeIndex>,

    /// Root ids in input order
    pub(crate) roots: Vec<RegionId>,

    /// Ids in depth-first pre-order
    pub(crate) order: Vec<RegionId>,

    pub(crate) groups: GroupMembership,

    pub(crate) config: TaxonomyConfig,
}

impl TaxonomyIndex {
    /// Build with the default configuration
    pub fn build(roots: &[RawNode]) -> Result<Self> {
        Self::build_with_config(roots, TaxonomyConfig::default())
    }

    /// Build from a nested description.
    ///
    /// Fails without producing a partial index if any node lacks `id`,
    /// `acronym` or a valid color, if an id repeats or equals [`ROOT_PARENT`],
    /// or if the nesting exceeds `config.max_depth`.
    pub fn build_with_config(roots: &[RawNode], config: TaxonomyConfig) -> Result<Self> {
        config.validate()?;

        let mut index = Self {
            graph: DiGraph::new(),
            id_index: HashMap::new(),
            roots: Vec::with_capacity(roots.len()),
            order: Vec::new(),
            groups: GroupMembership::default(),
            config,
        };

        for raw in roots {
            let slot = index.insert_subtree(raw, None, 0)?;
            index.roots.push(index.graph[slot].id);
        }

        index.groups = GroupMembership::compute(&index);

        log::info!(
            "Built taxonomy index: {} nodes, {} roots, max level {}",
            index.len(),
            index.roots.len(),
            index.max_level()
        );

        Ok(index)
    }

    /// Parse JSON (see [`crate::parse_forest`]) and build
    pub fn from_json(json: &str, config: TaxonomyConfig) -> Result<Self> {
        let roots = crate::source::parse_forest(json)?;
        Self::build_with_config(&roots, config)
    }

    fn insert_subtree(
        &mut self,
        raw: &RawNode,
        parent: Option<NodeIndex>,
        level: usize,
    ) -> Result<NodeIndex> {
        if level >= self.config.max_depth {
            return Err(TaxonomyError::Malformed(format!(
                "nesting deeper than max_depth {} below id {:?}",
                self.config.max_depth, raw.id
            )));
        }

        let node = self.node_from_raw(raw, parent, level)?;
        let id = node.id;
        let slot = self.graph.add_node(node);
        self.id_index.insert(id, slot);
        self.order.push(id);

        if let Some(parent) = parent {
            self.graph.add_edge(parent, slot, ());
        }

        for child in &raw.children {
            self.insert_subtree(child, Some(slot), level + 1)?;
        }

        Ok(slot)
    }

    fn node_from_raw(
        &self,
        raw: &RawNode,
        parent: Option<NodeIndex>,
        level: usize,
    ) -> Result<TaxonomyNode> {
        let id = raw.id.ok_or_else(|| {
            TaxonomyError::Malformed(format!(
                "node at level {} (acronym {:?}) has no id",
                level, raw.acronym
            ))
        })?;

        if id == ROOT_PARENT {
            return Err(TaxonomyError::ReservedId(id));
        }
        if self.id_index.contains_key(&id) {
            return Err(TaxonomyError::DuplicateId(id));
        }

        let acronym = raw
            .acronym
            .clone()
            .ok_or_else(|| TaxonomyError::Malformed(format!("node {} has no acronym", id)))?;
        let color_raw = raw
            .color_hex_triplet
            .as_deref()
            .ok_or_else(|| TaxonomyError::Malformed(format!("node {} has no color", id)))?;
        let color = Rgb::from_hex(color_raw)
            .map_err(|e| TaxonomyError::Malformed(format!("node {}: {}", id, e)))?;
        let name = raw.name.clone().unwrap_or_default();

        let parent_id = parent.map(|p| self.graph[p].id).unwrap_or(ROOT_PARENT);

        Ok(TaxonomyNode {
            id,
            label: format!("{} : {}", acronym, name),
            acronym,
            name,
            color,
            parent_id,
            level,
            child_count: raw.children.len(),
        })
    }

    /// Node for `id`, or [`TaxonomyError::UnknownId`]
    pub fn lookup(&self, id: RegionId) -> Result<&TaxonomyNode> {
        self.get(id).ok_or(TaxonomyError::UnknownId(id))
    }

    pub fn get(&self, id: RegionId) -> Option<&TaxonomyNode> {
        self.id_index.get(&id).map(|&slot| &self.graph[slot])
    }

    pub fn contains(&self, id: RegionId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// Number of indexed nodes
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn roots(&self) -> &[RegionId] {
        &self.roots
    }

    /// All ids in depth-first pre-order (parents before children, siblings in
    /// input order)
    pub fn ids(&self) -> &[RegionId] {
        &self.order
    }

    /// All nodes in depth-first pre-order
    pub fn nodes(&self) -> impl Iterator<Item = &TaxonomyNode> + '_ {
        self.order.iter().filter_map(move |id| self.get(*id))
    }

    pub fn max_level(&self) -> usize {
        self.graph
            .node_weights()
            .map(|n| n.level)
            .max()
            .unwrap_or(0)
    }

    pub fn config(&self) -> &TaxonomyConfig {
        &self.config
    }

    pub(crate) fn slot(&self, id: RegionId) -> Result<NodeIndex> {
        self.id_index
            .get(&id)
            .copied()
            .ok_or(TaxonomyError::UnknownId(id))
    }

    /// Children of an arena slot in input order
    pub(crate) fn child_slots(&self, slot: NodeIndex) -> Vec<NodeIndex> {
        // petgraph lists neighbors most recent edge first
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(slot, Direction::Outgoing)
            .collect();
        children.reverse();
        children
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Small developing-brain style forest used across the crate's tests:
    ///
    /// ```text
    /// 1 Br
    /// ├── 10 Ctx
    /// │   ├── 11 CP-FCTx
    /// │   └── 12 SP-FCTx
    /// ├── 20 TH
    /// │   └── 21 LGN
    /// └── 30 HPF
    ///     └── 31 CA1
    /// 2 Vs
    /// ```
    pub(crate) fn sample_forest() -> Vec<RawNode> {
        vec![
            RawNode::new(1, "Br", "Brain", "ffffff").with_children(vec![
                RawNode::new(10, "Ctx", "Cerebral cortex", "70ff70").with_children(vec![
                    RawNode::new(11, "CP-FCTx", "Cortical plate of frontal cortex", "80ff80"),
                    RawNode::new(12, "SP-FCTx", "Subplate of frontal cortex", "90ff90"),
                ]),
                RawNode::new(20, "TH", "Thalamus", "ff7080")
                    .with_children(vec![RawNode::new(21, "LGN", "Lateral geniculate", "ff8090")]),
                RawNode::new(30, "HPF", "Hippocampal formation", "7ed04b")
                    .with_children(vec![RawNode::new(31, "CA1", "Field CA1", "7ed04c")]),
            ]),
            RawNode::new(2, "Vs", "Ventricles", "aaaaaa"),
        ]
    }

    pub(crate) fn sample_index() -> TaxonomyIndex {
        TaxonomyIndex::build(&sample_forest()).unwrap()
    }

    #[test]
    fn test_build_two_level_tree() {
        let roots = vec![RawNode::new(1, "A", "Root", "ff0000")
            .with_children(vec![RawNode::new(2, "B", "Child", "00ff00")])];
        let index = TaxonomyIndex::build(&roots).unwrap();

        assert_eq!(index.len(), 2);
        let child = index.lookup(2).unwrap();
        assert_eq!(child.level, 1);
        assert_eq!(child.parent_id, 1);
        assert_eq!(child.label, "B : Child");
        assert_eq!(child.color_hex(), "#00ff00");

        let root = index.lookup(1).unwrap();
        assert_eq!(root.level, 0);
        assert_eq!(root.parent_id, ROOT_PARENT);
        assert_eq!(root.child_count, 1);
    }

    #[test]
    fn test_preorder_and_roots() {
        let index = sample_index();
        assert_eq!(index.roots(), &[1, 2]);
        assert_eq!(index.ids(), &[1, 10, 11, 12, 20, 21, 30, 31, 2]);
        assert_eq!(index.max_level(), 2);
    }

    #[test]
    fn test_child_slots_keep_input_order() {
        let index = sample_index();
        let slot = index.slot(1).unwrap();
        let children: Vec<_> = index
            .child_slots(slot)
            .into_iter()
            .map(|s| index.graph[s].id)
            .collect();
        assert_eq!(children, vec![10, 20, 30]);
    }

    #[test]
    fn test_unknown_id() {
        let index = sample_index();
        assert!(matches!(index.lookup(999), Err(TaxonomyError::UnknownId(999))));
        assert!(index.get(999).is_none());
    }

    #[test]
    fn test_reject_duplicate_id_across_subtrees() {
        let roots = vec![
            RawNode::new(1, "A", "a", "000000")
                .with_children(vec![RawNode::new(5, "C", "c", "000000")]),
            RawNode::new(2, "B", "b", "000000")
                .with_children(vec![RawNode::new(5, "D", "d", "000000")]),
        ];
        assert!(matches!(
            TaxonomyIndex::build(&roots),
            Err(TaxonomyError::DuplicateId(5))
        ));
    }

    #[test]
    fn test_reject_missing_fields() {
        let mut no_acronym = RawNode::new(3, "X", "x", "000000");
        no_acronym.acronym = None;
        assert!(matches!(
            TaxonomyIndex::build(&[no_acronym]),
            Err(TaxonomyError::Malformed(_))
        ));

        let mut no_color = RawNode::new(3, "X", "x", "000000");
        no_color.color_hex_triplet = None;
        assert!(matches!(
            TaxonomyIndex::build(&[no_color]),
            Err(TaxonomyError::Malformed(_))
        ));

        let mut no_id = RawNode::new(3, "X", "x", "000000");
        no_id.id = None;
        let nested = RawNode::new(1, "A", "a", "000000").with_children(vec![no_id]);
        assert!(matches!(
            TaxonomyIndex::build(&[nested]),
            Err(TaxonomyError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_name_is_allowed() {
        let mut raw = RawNode::new(3, "X", "x", "000000");
        raw.name = None;
        let index = TaxonomyIndex::build(&[raw]).unwrap();
        assert_eq!(index.lookup(3).unwrap().name, "");
    }

    #[test]
    fn test_reject_sentinel_id() {
        let roots = vec![RawNode::new(ROOT_PARENT, "Z", "zero", "000000")];
        assert!(matches!(
            TaxonomyIndex::build(&roots),
            Err(TaxonomyError::ReservedId(ROOT_PARENT))
        ));
    }

    #[test]
    fn test_reject_too_deep() {
        let mut node = RawNode::new(100, "L", "leaf", "000000");
        for id in (1..5).rev() {
            node = RawNode::new(id, "N", "n", "000000").with_children(vec![node]);
        }
        let config = TaxonomyConfig {
            max_depth: 3,
            ..Default::default()
        };
        assert!(matches!(
            TaxonomyIndex::build_with_config(&[node], config),
            Err(TaxonomyError::Malformed(_))
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[{"id":1,"acronym":"A","name":"Root","color_hex_triplet":"ff0000",
            "children":[{"id":2,"acronym":"B","name":"Child","color_hex_triplet":"00ff00"}]}]"#;
        let index = TaxonomyIndex::from_json(json, TaxonomyConfig::default()).unwrap();
        assert_eq!(index.ancestor_ids(2).unwrap(), vec![1]);
    }

    #[test]
    fn test_empty_forest() {
        let index = TaxonomyIndex::build(&[]).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.max_level(), 0);
    }
}
