use crate::error::Result;
use crate::index::TaxonomyIndex;
use crate::types::RegionId;
use std::collections::HashMap;

/// Group membership, derived once from the configured vocabulary
#[derive(Debug, Clone, Default)]
pub(crate) struct GroupMembership {
    /// (group name, subtree root ids) in declaration order
    roots: Vec<(String, Vec<RegionId>)>,

    /// id -> position in `roots`
    member_of: HashMap<RegionId, usize>,
}

impl GroupMembership {
    /// Assign every node to the first declared group whose root is the node
    /// itself or one of its ancestors.
    pub(crate) fn compute(index: &TaxonomyIndex) -> Self {
        let mut roots = Vec::with_capacity(index.config.groups.specs().len());
        let mut member_of = HashMap::new();

        for (position, spec) in index.config.groups.specs().iter().enumerate() {
            let group_roots: Vec<RegionId> = index
                .nodes()
                .filter(|node| spec.root_acronyms.iter().any(|a| *a == node.acronym))
                .map(|node| node.id)
                .collect();

            if group_roots.is_empty() {
                log::debug!("Group '{}' matched no taxonomy nodes", spec.name);
            }

            for root in &group_roots {
                member_of.entry(*root).or_insert(position);
                // Roots come from this index, so the lookup cannot fail
                if let Ok(descendants) = index.subtree_ids(*root) {
                    for id in descendants {
                        member_of.entry(id).or_insert(position);
                    }
                }
            }

            roots.push((spec.name.clone(), group_roots));
        }

        log::debug!(
            "Group membership: {} of {} nodes assigned across {} groups",
            member_of.len(),
            index.len(),
            roots.len()
        );

        Self { roots, member_of }
    }
}

impl TaxonomyIndex {
    /// Group containing `id`, or `None` when no configured group root is `id`
    /// or one of its ancestors
    pub fn group_of(&self, id: RegionId) -> Result<Option<&str>> {
        self.lookup(id)?;
        Ok(self
            .groups
            .member_of
            .get(&id)
            .map(|&position| self.groups.roots[position].0.as_str()))
    }

    /// Group of the first node carrying `acronym`
    pub fn group_of_acronym(&self, acronym: &str) -> Option<&str> {
        self.nodes()
            .find(|node| node.acronym == acronym)
            .and_then(|node| self.groups.member_of.get(&node.id))
            .map(|&position| self.groups.roots[position].0.as_str())
    }

    /// Configured group names in declaration order
    pub fn group_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.roots.iter().map(|(name, _)| name.as_str())
    }

    /// Subtree roots of a group. Empty for unknown groups and for groups whose
    /// acronyms are absent from this taxonomy.
    pub fn group_roots(&self, group: &str) -> &[RegionId] {
        self.groups
            .roots
            .iter()
            .find(|(name, _)| name == group)
            .map(|(_, roots)| roots.as_slice())
            .unwrap_or(&[])
    }

    /// All ids assigned to `group`, in pre-order
    pub fn group_members(&self, group: &str) -> Vec<RegionId> {
        let Some(position) = self.groups.roots.iter().position(|(name, _)| name == group) else {
            return Vec::new();
        };
        self.order
            .iter()
            .copied()
            .filter(|id| self.groups.member_of.get(id) == Some(&position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{GroupConfig, GroupSpec, TaxonomyConfig};
    use crate::error::TaxonomyError;
    use crate::index::tests::{sample_forest, sample_index};
    use crate::index::TaxonomyIndex;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_group_of() {
        let index = sample_index();
        assert_eq!(index.group_of(31).unwrap(), Some("HPF"));
        assert_eq!(index.group_of(30).unwrap(), Some("HPF"));
        assert_eq!(index.group_of(21).unwrap(), Some("TH"));
        assert_eq!(index.group_of(11).unwrap(), Some("Ctx"));
        assert_eq!(index.group_of(2).unwrap(), Some("Vs"));
        assert_eq!(index.group_of(1).unwrap(), None);
        assert!(matches!(index.group_of(404), Err(TaxonomyError::UnknownId(404))));
    }

    #[test]
    fn test_nested_group_roots_first_declared_wins() {
        // "Ctx" encloses "CP-FCTx"; whichever group is declared first claims it
        let inner_first = GroupConfig::new(vec![
            GroupSpec::new("plate", &["CP-FCTx"]),
            GroupSpec::new("cortex", &["Ctx"]),
        ]);
        let index =
            TaxonomyIndex::build_with_config(&sample_forest(), TaxonomyConfig::with_groups(inner_first))
                .unwrap();
        assert_eq!(index.group_of(11).unwrap(), Some("plate"));
        assert_eq!(index.group_of(12).unwrap(), Some("cortex"));

        let outer_first = GroupConfig::new(vec![
            GroupSpec::new("cortex", &["Ctx"]),
            GroupSpec::new("plate", &["CP-FCTx"]),
        ]);
        let index =
            TaxonomyIndex::build_with_config(&sample_forest(), TaxonomyConfig::with_groups(outer_first))
                .unwrap();
        assert_eq!(index.group_of(11).unwrap(), Some("cortex"));
        assert!(index.group_members("plate").is_empty());
        assert_eq!(index.group_roots("plate"), &[11]);
    }

    #[test]
    fn test_group_with_no_matching_acronym_is_empty() {
        let index = sample_index();
        assert!(index.group_roots("CB").is_empty());
        assert!(index.group_members("CB").is_empty());
        assert!(index.group_members("no-such-group").is_empty());
    }

    #[test]
    fn test_group_members_and_names() {
        let index = sample_index();
        assert_eq!(index.group_members("Ctx"), vec![10, 11, 12]);
        assert_eq!(index.group_names().count(), 12);
        assert_eq!(index.group_names().next(), Some("HPF"));
    }

    #[test]
    fn test_group_of_acronym() {
        let index = sample_index();
        assert_eq!(index.group_of_acronym("LGN"), Some("TH"));
        assert_eq!(index.group_of_acronym("Br"), None);
        assert_eq!(index.group_of_acronym("missing"), None);
    }

    #[test]
    fn test_other_vocabulary() {
        let index = TaxonomyIndex::build_with_config(
            &sample_forest(),
            TaxonomyConfig::with_groups(GroupConfig::adult_mouse()),
        )
        .unwrap();
        assert_eq!(index.group_of(21).unwrap(), Some("TH"));
        assert_eq!(index.group_of(11).unwrap(), None);
    }
}
