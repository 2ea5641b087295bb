//! Selection state for bulk actions.
//!
//! A selection is query-scoped: it only means anything relative to the most
//! recently loaded result set. The set is not proactively pruned when the
//! listing reloads — ids that fell out of the result set simply stop being
//! visible or actionable, and a successful bulk delete clears the set
//! outright.

use std::collections::BTreeSet;

use crate::gateway::{PackageId, PackageRecord};

/// Set of selected package identities.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<PackageId>,
}

impl SelectionSet {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership for one id. Returns the new membership state.
    pub fn toggle(&mut self, id: &PackageId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    /// Add every given row's id to the selection.
    pub fn select_rows(&mut self, rows: &[PackageRecord]) {
        for row in rows {
            self.ids.insert(row.id.clone());
        }
    }

    /// Remove every given row's id from the selection.
    pub fn deselect_rows(&mut self, rows: &[PackageRecord]) {
        for row in rows {
            self.ids.remove(&row.id);
        }
    }

    /// Drop the whole selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Whether an id is currently selected.
    pub fn is_selected(&self, id: &PackageId) -> bool {
        self.ids.contains(id)
    }

    /// Page-scoped "select all" state: true iff `rows` is non-empty and
    /// every row's id is selected. Membership outside `rows` is ignored.
    pub fn all_selected(&self, rows: &[PackageRecord]) -> bool {
        !rows.is_empty() && rows.iter().all(|row| self.ids.contains(&row.id))
    }

    /// Selected ids in stable order.
    pub fn ids(&self) -> Vec<PackageId> {
        self.ids.iter().cloned().collect()
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::sample_record;

    fn id(s: &str) -> PackageId {
        PackageId::new(s)
    }

    fn rows(ids: &[&str]) -> Vec<PackageRecord> {
        ids.iter().map(|i| sample_record(i, "pkg", "x86_64")).collect()
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut selection = SelectionSet::new();

        assert!(selection.toggle(&id("a")));
        assert!(selection.is_selected(&id("a")));

        assert!(!selection.toggle(&id("a")));
        assert!(!selection.is_selected(&id("a")));
    }

    #[test]
    fn test_select_rows_adds_visible_page() {
        let mut selection = SelectionSet::new();
        selection.select_rows(&rows(&["a", "b", "c"]));

        assert_eq!(selection.len(), 3);
        assert!(selection.is_selected(&id("b")));
    }

    #[test]
    fn test_all_selected_is_page_scoped() {
        let page = rows(&["a", "b", "c"]);
        let mut selection = SelectionSet::new();

        // {a, b} does not cover the page.
        selection.toggle(&id("a"));
        selection.toggle(&id("b"));
        assert!(!selection.all_selected(&page));

        // {a, b, c, d} covers the page even though d is off-page.
        selection.toggle(&id("c"));
        selection.toggle(&id("d"));
        assert!(selection.all_selected(&page));
    }

    #[test]
    fn test_all_selected_empty_page_is_false() {
        let mut selection = SelectionSet::new();
        selection.toggle(&id("a"));
        assert!(!selection.all_selected(&[]));
    }

    #[test]
    fn test_deselect_rows_keeps_off_page_ids() {
        let page = rows(&["a", "b"]);
        let mut selection = SelectionSet::new();
        selection.select_rows(&page);
        selection.toggle(&id("z"));

        selection.deselect_rows(&page);

        assert_eq!(selection.ids(), vec![id("z")]);
    }

    #[test]
    fn test_clear() {
        let mut selection = SelectionSet::new();
        selection.select_rows(&rows(&["a", "b"]));

        selection.clear();

        assert!(selection.is_empty());
        assert_eq!(selection.len(), 0);
    }

    #[test]
    fn test_ids_are_stable_order() {
        let mut selection = SelectionSet::new();
        selection.toggle(&id("c"));
        selection.toggle(&id("a"));
        selection.toggle(&id("b"));

        assert_eq!(selection.ids(), vec![id("a"), id("b"), id("c")]);
    }
}
