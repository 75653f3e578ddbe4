/// Whole-tree sorting — reorders every `children` list in place.
///
/// This rewrites the authoritative record order, not a per-view copy: lazy
/// views and exports started afterwards observe the new order. Callers are
/// responsible for not running it concurrently with readers of the same
/// tree; the borrow checker enforces that within one process.
use crate::model::DirectoryRecord;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Available child orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Largest subtree first — the order the scanner produces.
    SizeDesc,
    /// Lexicographic name, ascending.
    NameAsc,
    /// Most files first.
    FileCountDesc,
}

impl SortKey {
    /// Compare two sibling records. Path breaks ties, so the resulting
    /// order is deterministic for any input permutation.
    fn compare(self, a: &DirectoryRecord, b: &DirectoryRecord) -> Ordering {
        let by_key = match self {
            SortKey::SizeDesc => b.size.cmp(&a.size),
            SortKey::NameAsc => a.name.cmp(&b.name),
            SortKey::FileCountDesc => b.file_count.cmp(&a.file_count),
        };
        by_key.then_with(|| a.path.cmp(&b.path))
    }
}

/// Reorder `record`'s children by `key`, recursively for every descendant.
pub fn sort_by(record: &mut DirectoryRecord, key: SortKey) {
    record
        .children
        .sort_unstable_by(|a, b| key.compare(a, b));

    // Sibling subtrees are disjoint, so they sort in parallel.
    record
        .children
        .par_iter_mut()
        .for_each(|child| sort_by(child, key));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn node(name: &str, size: u64, file_count: u64) -> DirectoryRecord {
        let mut record = DirectoryRecord::new_dir(name, PathBuf::from(format!("/{name}")));
        record.size = size;
        record.file_count = file_count;
        record
    }

    fn sample_tree() -> DirectoryRecord {
        let mut inner = node("inner", 600, 4);
        inner.children = vec![node("x", 50, 1), node("z", 500, 2), node("y", 50, 1)];

        let mut root = node("root", 1_000, 10);
        root.children = vec![node("small", 100, 6), inner, node("mid", 300, 0)];
        root
    }

    fn assert_sorted_recursively(record: &DirectoryRecord, key: SortKey) {
        for pair in record.children.windows(2) {
            assert_ne!(
                key.compare(&pair[0], &pair[1]),
                Ordering::Greater,
                "children of {} out of order",
                record.name
            );
        }
        for child in &record.children {
            assert_sorted_recursively(child, key);
        }
    }

    #[test]
    fn size_descending_applies_to_every_level() {
        let mut tree = sample_tree();
        sort_by(&mut tree, SortKey::SizeDesc);

        let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["inner", "mid", "small"]);

        let inner_names: Vec<&str> =
            tree.children[0].children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(inner_names, vec!["z", "x", "y"]);

        assert_sorted_recursively(&tree, SortKey::SizeDesc);
    }

    #[test]
    fn equal_sizes_fall_back_to_path_order() {
        let mut tree = sample_tree();
        sort_by(&mut tree, SortKey::SizeDesc);

        // "x" and "y" are both 50 bytes; /x sorts before /y.
        let inner = &tree.children[0];
        assert_eq!(inner.children[1].name, "x");
        assert_eq!(inner.children[2].name, "y");
    }

    #[test]
    fn name_ascending() {
        let mut tree = sample_tree();
        sort_by(&mut tree, SortKey::NameAsc);

        let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["inner", "mid", "small"]);
        assert_sorted_recursively(&tree, SortKey::NameAsc);
    }

    #[test]
    fn file_count_descending() {
        let mut tree = sample_tree();
        sort_by(&mut tree, SortKey::FileCountDesc);

        let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["small", "inner", "mid"]);
        assert_sorted_recursively(&tree, SortKey::FileCountDesc);
    }

    #[test]
    fn sorting_only_reorders() {
        let mut tree = sample_tree();
        let before = tree.clone();
        sort_by(&mut tree, SortKey::NameAsc);
        sort_by(&mut tree, SortKey::SizeDesc);

        // Totals survive any number of re-sorts.
        assert_eq!(tree.size, before.size);
        assert_eq!(tree.file_count, before.file_count);
        assert_eq!(tree.children.len(), before.children.len());
    }

    #[test]
    fn resorting_is_deterministic() {
        let mut a = sample_tree();
        let mut b = sample_tree();
        b.children.reverse();

        sort_by(&mut a, SortKey::SizeDesc);
        sort_by(&mut b, SortKey::SizeDesc);
        assert_eq!(a, b);
    }
}
