/// Lazy tree view over a [`DirectoryRecord`] tree.
///
/// The records themselves are always complete — a directory may legitimately
/// hold millions of entries — so a consumer that renders nodes must not
/// mirror the whole tree eagerly. A [`ViewNode`] materialises children one
/// level at a time, capped at [`MAX_MATERIALIZED`] per expansion, with a
/// synthetic overflow node standing in for whatever the cap omitted.
///
/// View nodes borrow the backing records, so the tree cannot be re-sorted
/// while any view over it is alive; drop the view first.
use crate::model::DirectoryRecord;
use compact_str::{format_compact, CompactString};

/// Upper bound on children materialised per expansion.
pub const MAX_MATERIALIZED: usize = 1_000;

/// One presentation-layer node: a real entry or the overflow marker.
#[derive(Debug)]
pub enum ViewNode<'a> {
    Entry(EntryNode<'a>),
    Overflow(OverflowNode),
}

/// A view node backed by a record.
#[derive(Debug)]
pub struct EntryNode<'a> {
    record: &'a DirectoryRecord,
    /// `None` until [`ViewNode::expand`] realises the children.
    children: Option<Vec<ViewNode<'a>>>,
}

/// Synthetic stand-in for children beyond the materialisation cap.
/// Carries no backing record and cannot be expanded.
#[derive(Debug)]
pub struct OverflowNode {
    omitted: usize,
    label: CompactString,
}

impl OverflowNode {
    fn new(omitted: usize) -> Self {
        Self {
            omitted,
            label: format_compact!("... and {omitted} more items"),
        }
    }

    /// How many backing children the cap left out.
    pub fn omitted(&self) -> usize {
        self.omitted
    }
}

impl<'a> ViewNode<'a> {
    /// Wrap a record as an unexpanded view node.
    pub fn new(record: &'a DirectoryRecord) -> Self {
        ViewNode::Entry(EntryNode {
            record,
            children: None,
        })
    }

    /// The backing record; `None` for the overflow marker.
    pub fn record(&self) -> Option<&'a DirectoryRecord> {
        match self {
            ViewNode::Entry(entry) => Some(entry.record),
            ViewNode::Overflow(_) => None,
        }
    }

    /// Display label: the entry name, or the overflow text.
    pub fn label(&self) -> &str {
        match self {
            ViewNode::Entry(entry) => entry.record.name.as_str(),
            ViewNode::Overflow(overflow) => overflow.label.as_str(),
        }
    }

    /// True while the backing record has children this node has not
    /// materialised yet. Always false for the overflow marker.
    pub fn has_unrealized_children(&self) -> bool {
        match self {
            ViewNode::Entry(entry) => {
                entry.children.is_none() && !entry.record.children.is_empty()
            }
            ViewNode::Overflow(_) => false,
        }
    }

    /// Materialise this node's children, one level deep, in the backing
    /// record's current order. Caps at [`MAX_MATERIALIZED`] and appends an
    /// overflow marker for the remainder. Idempotent: a realised node (and
    /// the overflow marker) is left untouched.
    pub fn expand(&mut self) {
        let ViewNode::Entry(entry) = self else {
            return;
        };
        if entry.children.is_some() {
            return;
        }

        let backing = &entry.record.children;
        let mut children: Vec<ViewNode<'a>> = backing
            .iter()
            .take(MAX_MATERIALIZED)
            .map(ViewNode::new)
            .collect();

        if backing.len() > MAX_MATERIALIZED {
            children.push(ViewNode::Overflow(OverflowNode::new(
                backing.len() - MAX_MATERIALIZED,
            )));
        }

        entry.children = Some(children);
    }

    /// Realised children. Empty until [`expand`](Self::expand) is called.
    pub fn children(&self) -> &[ViewNode<'a>] {
        match self {
            ViewNode::Entry(entry) => entry.children.as_deref().unwrap_or(&[]),
            ViewNode::Overflow(_) => &[],
        }
    }

    /// Mutable access to realised children, for expanding deeper levels.
    pub fn children_mut(&mut self) -> &mut [ViewNode<'a>] {
        match self {
            ViewNode::Entry(entry) => entry.children.as_deref_mut().unwrap_or(&mut []),
            ViewNode::Overflow(_) => &mut [],
        }
    }
}
