use crate::config::LAYERED_ZONES;
use crate::error::Result;
use crate::index::TaxonomyIndex;
use crate::types::{RegionId, TaxonomyNode};
use std::fmt::Write;

const HEADER: &str = "[lvl] id (acronym) name\n---------------------\n";

impl TaxonomyIndex {
    /// Indented outline of the whole forest
    pub fn render_outline(&self) -> String {
        let mut out = String::from(HEADER);
        for root in &self.roots {
            // Roots are indexed ids
            let _ = self.render_subtree_into(*root, &mut out);
        }
        out
    }

    /// Indented outline of the subtree rooted at `id`; indentation starts at
    /// zero regardless of the node's level
    pub fn render_subtree(&self, id: RegionId) -> Result<String> {
        let mut out = String::from(HEADER);
        self.render_subtree_into(id, &mut out)?;
        Ok(out)
    }

    /// Outline of every subtree root of `group`
    pub fn render_group(&self, group: &str) -> String {
        let mut out = String::from(HEADER);
        for root in self.group_roots(group) {
            let _ = self.render_subtree_into(*root, &mut out);
        }
        out
    }

    fn render_subtree_into(&self, id: RegionId, out: &mut String) -> Result<()> {
        let base = self.lookup(id)?.level;
        let ids = std::iter::once(id).chain(self.subtree_ids(id)?);
        for node_id in ids {
            let node = self.lookup(node_id)?;
            outline_line(node, node.level - base, out);
        }
        Ok(())
    }
}

fn outline_line(node: &TaxonomyNode, depth: usize, out: &mut String) {
    let marker = if is_layered_zone(&node.acronym) {
        "[*]".to_string()
    } else {
        format!("[{}]", depth)
    };
    let _ = writeln!(
        out,
        "{}{} {} ({}) {}",
        "  ".repeat(depth),
        marker,
        node.id,
        node.acronym,
        node.name
    );
}

/// `SGL-...`, `CP-...` etc.
fn is_layered_zone(acronym: &str) -> bool {
    acronym
        .split_once('-')
        .map(|(zone, _)| LAYERED_ZONES.contains(&zone))
        .unwrap_or(false)
}
