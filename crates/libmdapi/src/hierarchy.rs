//! Nesting a flat heading sequence into an outline forest.

use serde::{Deserialize, Serialize};

use crate::entry::HeadingEntry;

/// A heading entry with the entries nested beneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchizedEntry {
    #[serde(flatten)]
    /// The entry itself.
    pub entry: HeadingEntry,
    /// Entries of greater depth that follow this one, up to the next entry of equal or lower
    /// depth.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hierarchy_children: Vec<Self>,
}

impl HierarchizedEntry {
    /// Wrap an entry with no children.
    pub fn leaf(entry: HeadingEntry) -> Self {
        Self {
            entry,
            hierarchy_children: Vec::new(),
        }
    }

    /// Number of entries in this subtree, including this one.
    pub fn entry_count(&self) -> usize {
        1 + self
            .hierarchy_children
            .iter()
            .map(Self::entry_count)
            .sum::<usize>()
    }
}

/// Nest entries by heading depth.
///
/// Depths are taken as given: a jump from depth 1 to depth 4 nests the deeper entry under the
/// nearest preceding shallower one, and an entry with no shallower predecessor becomes a root.
pub fn build_hierarchy(entries: Vec<HeadingEntry>) -> Vec<HierarchizedEntry> {
    let mut roots = Vec::new();
    let mut open: Vec<HierarchizedEntry> = Vec::new();

    for entry in entries {
        let depth = entry.depth();
        while open.last().is_some_and(|top| top.entry.depth() >= depth) {
            close_top(&mut open, &mut roots);
        }
        open.push(HierarchizedEntry::leaf(entry));
    }
    while !open.is_empty() {
        close_top(&mut open, &mut roots);
    }
    roots
}

/// Pop the innermost open entry and attach it to its parent, or to the roots.
fn close_top(open: &mut Vec<HierarchizedEntry>, roots: &mut Vec<HierarchizedEntry>) {
    let Some(done) = open.pop() else {
        return;
    };
    match open.last_mut() {
        Some(parent) => parent.hierarchy_children.push(done),
        None => roots.push(done),
    }
}
