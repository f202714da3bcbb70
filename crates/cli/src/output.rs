use anyhow::Result;
use atlas_annotation::{Classification, Nonreachable, ReachableEntry, RegionStatus, Shape};
use atlas_taxonomy::{RegionId, TaxonomyIndex, TaxonomyNode};
use serde::Serialize;
use std::collections::BTreeMap;

/// Print `value` as pretty JSON, or the text rendering otherwise
pub(crate) fn emit<T, F>(json: bool, value: &T, text: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        let rendered = text(value);
        if !rendered.is_empty() {
            println!("{}", rendered.trim_end_matches('\n'));
        }
    }
    Ok(())
}

#[derive(Serialize)]
pub(crate) struct NodeSummary {
    pub id: RegionId,
    pub acronym: String,
    pub name: String,
    pub level: usize,
}

impl From<&TaxonomyNode> for NodeSummary {
    fn from(node: &TaxonomyNode) -> Self {
        Self {
            id: node.id,
            acronym: node.acronym.clone(),
            name: node.name.clone(),
            level: node.level,
        }
    }
}

pub(crate) fn summaries(index: &TaxonomyIndex, ids: &[RegionId]) -> Result<Vec<NodeSummary>> {
    ids.iter()
        .map(|id| Ok(NodeSummary::from(index.lookup(*id)?)))
        .collect()
}

pub(crate) fn summary_lines(nodes: &[NodeSummary]) -> String {
    nodes
        .iter()
        .map(|node| format!("{} ({}) {}", node.id, node.acronym, node.name))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn node_details(node: &TaxonomyNode, group: Option<&str>) -> String {
    let parent = node
        .parent()
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    format!(
        "{} ({}) {}\n  level:    {}\n  parent:   {}\n  children: {}\n  color:    {}\n  group:    {}",
        node.id,
        node.acronym,
        node.name,
        node.level,
        parent,
        node.child_count,
        node.color_hex(),
        group.unwrap_or("-")
    )
}

pub(crate) fn id_list(ids: &[RegionId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Serialize)]
pub(crate) struct GroupSummary {
    pub name: String,
    pub roots: Vec<RegionId>,
    pub members: usize,
}

#[derive(Serialize)]
pub(crate) struct SupershapeOutput {
    pub id: RegionId,
    pub contributors: Vec<RegionId>,
    pub components: usize,
    /// Parts, each a shell followed by holes
    pub rings: Option<Vec<Vec<Vec<[f64; 2]>>>>,
}

impl SupershapeOutput {
    pub(crate) fn new(id: RegionId, shape: Option<&Shape>, contributors: Vec<RegionId>) -> Self {
        Self {
            id,
            contributors,
            components: shape.map_or(0, Shape::component_count),
            rings: shape.map(Shape::rings),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct StatusCounts {
    pub annotated: usize,
    pub aggregatable: usize,
    pub unreachable: usize,
}

impl From<&Classification> for StatusCounts {
    fn from(classification: &Classification) -> Self {
        Self {
            annotated: classification.count(RegionStatus::Annotated),
            aggregatable: classification.count(RegionStatus::Aggregatable),
            unreachable: classification.count(RegionStatus::Unreachable),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct ClassifyOutput {
    pub counts: StatusCounts,
    pub reachable_parents: BTreeMap<RegionId, ReachableEntry>,
    pub nonreachable: Nonreachable,
    pub nested: BTreeMap<RegionId, Vec<RegionId>>,
}

pub(crate) fn classify_text(out: &ClassifyOutput) -> String {
    let mut text = format!(
        "annotated: {}  aggregatable: {}  unreachable: {}\n",
        out.counts.annotated, out.counts.aggregatable, out.counts.unreachable
    );

    text.push_str("\nReachable parents\n");
    for (id, entry) in &out.reachable_parents {
        text.push_str(&format!(
            "  {}: annotated [{}] aggregatable [{}]\n",
            id,
            id_list(&entry.annotated_children),
            id_list(&entry.aggregatable)
        ));
    }

    text.push_str("\nUnreached frontier\n");
    text.push_str(&format!("  leaves: [{}]\n", id_list(&out.nonreachable.leaves)));
    for (parent, children) in &out.nonreachable.by_parent {
        text.push_str(&format!("  {}: [{}]\n", parent, id_list(children)));
    }

    if !out.nested.is_empty() {
        text.push_str("\nNested annotations\n");
        for (id, inner) in &out.nested {
            text.push_str(&format!("  {}: [{}]\n", id, id_list(inner)));
        }
    }
    text
}

pub(crate) fn edge_list(edges: &[(RegionId, RegionId)]) -> String {
    edges
        .iter()
        .map(|(i, j)| format!("{}-{}", i, j))
        .collect::<Vec<_>>()
        .join(" ")
}
