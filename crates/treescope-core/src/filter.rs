/// Search filtering — a reduced projection of the record tree.
///
/// Filtering derives a view, never a mutation: the backing records are
/// untouched, so clearing the search text is just a matter of going back to
/// the original tree. The projection keeps a node when its name matches the
/// query or when something underneath it does, so every hit stays reachable
/// through its ancestor chain.
use crate::model::DirectoryRecord;

/// One node of a filter projection.
///
/// The two variants tell downstream layers how much of the original tree
/// stands behind a node: a pass-through is the original record, whole —
/// safe to expand, re-sort, or export as-is — while a synthetic node only
/// vouches for the reduced child list it carries.
#[derive(Debug)]
pub enum FilteredNode<'a> {
    /// The record matched the query itself and nothing underneath did;
    /// the entire original subtree backs this node, child list included.
    PassThrough(&'a DirectoryRecord),

    /// Included because descendants matched. Metadata comes from the
    /// original record; the child list is reduced to the matching branches.
    Synthetic {
        record: &'a DirectoryRecord,
        children: Vec<FilteredNode<'a>>,
    },
}

impl<'a> FilteredNode<'a> {
    /// The record supplying this node's name, path, and totals.
    pub fn record(&self) -> &'a DirectoryRecord {
        match self {
            FilteredNode::PassThrough(record) => record,
            FilteredNode::Synthetic { record, .. } => record,
        }
    }

    /// Whether the full original subtree stands behind this node.
    pub fn is_pass_through(&self) -> bool {
        matches!(self, FilteredNode::PassThrough(_))
    }
}

/// Project `record` down to the entries whose name contains `query`
/// (case-insensitive) and their ancestors.
///
/// Returns `None` when nothing in the subtree matches — the caller drops
/// the node. A blank query passes the whole tree through untouched.
pub fn filter<'a>(record: &'a DirectoryRecord, query: &str) -> Option<FilteredNode<'a>> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Some(FilteredNode::PassThrough(record));
    }
    filter_node(record, &trimmed.to_lowercase())
}

fn filter_node<'a>(record: &'a DirectoryRecord, needle: &str) -> Option<FilteredNode<'a>> {
    let matches = record.name.to_lowercase().contains(needle);

    let matching_children: Vec<FilteredNode<'a>> = record
        .children
        .iter()
        .filter_map(|child| filter_node(child, needle))
        .collect();

    if !matching_children.is_empty() {
        return Some(FilteredNode::Synthetic {
            record,
            children: matching_children,
        });
    }

    if matches {
        Some(FilteredNode::PassThrough(record))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// root "projects" ── "alpha" ── "notes"
    ///                 └─ "beta"
    fn sample_tree() -> DirectoryRecord {
        let mut notes = DirectoryRecord::new_dir("notes", PathBuf::from("/projects/alpha/notes"));
        notes.size = 10;

        let mut alpha = DirectoryRecord::new_dir("alpha", PathBuf::from("/projects/alpha"));
        alpha.size = 10;
        alpha.folder_count = 1;
        alpha.children.push(notes);

        let beta = DirectoryRecord::new_dir("beta", PathBuf::from("/projects/beta"));

        let mut root = DirectoryRecord::new_dir("projects", PathBuf::from("/projects"));
        root.size = 10;
        root.folder_count = 3;
        root.children.push(alpha);
        root.children.push(beta);
        root
    }

    #[test]
    fn direct_match_passes_original_through() {
        let tree = sample_tree();
        let result = filter(&tree, "alpha").expect("alpha should match");

        // Root doesn't match "alpha" itself — it survives as an ancestor.
        let FilteredNode::Synthetic { record, children } = &result else {
            panic!("root should be synthetic");
        };
        assert_eq!(record.name, "projects");
        assert_eq!(children.len(), 1);

        // "alpha" matched directly with no matching children, so the whole
        // original subtree — "notes" included — backs the node.
        let alpha = &children[0];
        assert!(alpha.is_pass_through());
        assert_eq!(alpha.record().name, "alpha");
        assert_eq!(alpha.record().children.len(), 1);
        assert_eq!(alpha.record().children[0].name, "notes");
    }

    #[test]
    fn match_is_case_insensitive() {
        let tree = sample_tree();
        assert!(filter(&tree, "ALPHA").is_some());
        assert!(filter(&tree, "Beta").is_some());
    }

    #[test]
    fn non_matching_branches_are_dropped() {
        let tree = sample_tree();
        let result = filter(&tree, "notes").expect("notes should match");

        let FilteredNode::Synthetic { children, .. } = &result else {
            panic!("root should be synthetic");
        };
        assert_eq!(children.len(), 1, "beta has no match and must be dropped");
        assert_eq!(children[0].record().name, "alpha");
    }

    #[test]
    fn no_match_anywhere_returns_none() {
        let tree = sample_tree();
        assert!(filter(&tree, "zzz").is_none());
    }

    #[test]
    fn blank_query_passes_whole_tree_through() {
        let tree = sample_tree();
        let result = filter(&tree, "   ").expect("blank query keeps everything");
        assert!(result.is_pass_through());
        assert_eq!(result.record().name, "projects");
    }

    #[test]
    fn filtering_never_mutates_the_backing_tree() {
        let tree = sample_tree();
        let before = tree.clone();

        let _ = filter(&tree, "notes");
        let _ = filter(&tree, "zzz");
        let _ = filter(&tree, "");

        assert_eq!(tree, before);
    }

    #[test]
    fn synthetic_nodes_keep_original_totals() {
        let tree = sample_tree();
        let result = filter(&tree, "notes").expect("notes should match");

        // The projection narrows children, not the aggregated numbers.
        assert_eq!(result.record().size, 10);
        assert_eq!(result.record().folder_count, 3);
    }

    #[test]
    fn every_leaf_matches_or_has_a_matching_ancestor() {
        fn check(node: &FilteredNode<'_>, needle: &str, ancestor_matched: bool) {
            let matched = node.record().name.to_lowercase().contains(needle);
            match node {
                FilteredNode::PassThrough(_) => {
                    assert!(matched || ancestor_matched);
                }
                FilteredNode::Synthetic { children, .. } => {
                    assert!(!children.is_empty());
                    for child in children {
                        check(child, needle, matched || ancestor_matched);
                    }
                }
            }
        }

        let tree = sample_tree();
        let result = filter(&tree, "notes").expect("notes should match");
        check(&result, "notes", false);
    }
}
