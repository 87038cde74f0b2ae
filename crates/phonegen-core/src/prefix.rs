//! Carrier groups and prefix resolution.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Label used when no group is selected.
pub const ALL_GROUPS_LABEL: &str = "All";

const STANDARD_GROUPS: [(&str, &str, &[&str]); 3] = [
    (
        "mobile",
        "China Mobile",
        &[
            "134", "135", "136", "137", "138", "139", "147", "150", "151", "152", "157", "158",
            "159", "182", "187", "188",
        ],
    ),
    (
        "unicom",
        "China Unicom",
        &["130", "131", "132", "155", "156", "185", "186", "145", "176"],
    ),
    (
        "telecom",
        "China Telecom",
        &["133", "153", "180", "189", "177", "173", "199"],
    ),
];

/// Prefixes that belong to the universal set but to no named group.
const STANDARD_UNGROUPED: [&str; 5] = ["166", "198", "191", "193", "149"];

/// A named set of 3-digit prefixes belonging to one carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixGroup {
    /// Short name used for selection (e.g. `mobile`).
    pub key: String,
    /// Human-readable name (e.g. `China Mobile`).
    pub label: String,
    /// Prefixes in this group.
    pub prefixes: Vec<String>,
}

impl PrefixGroup {
    #[must_use]
    pub fn new<P: Into<String>>(
        key: impl Into<String>,
        label: impl Into<String>,
        prefixes: impl IntoIterator<Item = P>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Resolves selected carrier groups into a concrete prefix set.
#[derive(Debug, Clone)]
pub struct PrefixSelector {
    groups: Vec<PrefixGroup>,
    ungrouped: Vec<String>,
}

impl PrefixSelector {
    /// Build a selector from an explicit group table.
    #[must_use]
    pub fn new<P: Into<String>>(
        groups: Vec<PrefixGroup>,
        ungrouped: impl IntoIterator<Item = P>,
    ) -> Self {
        Self {
            groups,
            ungrouped: ungrouped.into_iter().map(Into::into).collect(),
        }
    }

    /// The built-in three-carrier table.
    #[must_use]
    pub fn standard() -> Self {
        let groups = STANDARD_GROUPS
            .iter()
            .map(|(key, label, prefixes)| PrefixGroup::new(*key, *label, prefixes.iter().copied()))
            .collect();
        Self::new(groups, STANDARD_UNGROUPED)
    }

    /// All groups in table order.
    #[must_use]
    pub fn groups(&self) -> &[PrefixGroup] {
        &self.groups
    }

    /// Look up a group by key.
    #[must_use]
    pub fn group(&self, key: &str) -> Option<&PrefixGroup> {
        self.groups.iter().find(|g| g.key == key)
    }

    /// Union of every group plus the ungrouped prefixes.
    #[must_use]
    pub fn universe(&self) -> BTreeSet<String> {
        self.groups
            .iter()
            .flat_map(|g| g.prefixes.iter())
            .chain(self.ungrouped.iter())
            .cloned()
            .collect()
    }

    /// Resolve the selected groups into a prefix set.
    ///
    /// Unknown names contribute nothing. When nothing is contributed the
    /// full universe is returned instead.
    #[must_use]
    pub fn resolve<I, S>(&self, selected: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut prefixes = BTreeSet::new();
        for name in selected {
            if let Some(group) = self.group(name.as_ref()) {
                prefixes.extend(group.prefixes.iter().cloned());
            }
        }
        if prefixes.is_empty() {
            return self.universe();
        }
        prefixes
    }

    /// Names in `selected` that match no group.
    #[must_use]
    pub fn unknown_groups<I, S>(&self, selected: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        selected
            .into_iter()
            .filter(|name| self.group(name.as_ref()).is_none())
            .map(|name| name.as_ref().to_string())
            .collect()
    }

    /// Display label for a selection, in table order.
    #[must_use]
    pub fn label<I, S>(&self, selected: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selected: BTreeSet<String> = selected
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        let labels: Vec<&str> = self
            .groups
            .iter()
            .filter(|g| selected.contains(&g.key))
            .map(|g| g.label.as_str())
            .collect();
        if labels.is_empty() {
            ALL_GROUPS_LABEL.to_string()
        } else {
            labels.join(", ")
        }
    }
}

impl Default for PrefixSelector {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::is_canonical_prefix;

    const NONE: [&str; 0] = [];

    #[test]
    fn empty_selection_returns_universe() {
        let selector = PrefixSelector::standard();
        assert_eq!(selector.resolve(NONE), selector.universe());
    }

    #[test]
    fn universe_covers_groups_and_ungrouped() {
        let selector = PrefixSelector::standard();
        let universe = selector.universe();
        assert_eq!(universe.len(), 16 + 9 + 7 + 5);
        assert!(universe.contains("145"));
        assert!(universe.contains("166"));
    }

    #[test]
    fn single_group_resolves_exactly() {
        let selector = PrefixSelector::standard();
        let resolved = selector.resolve(["telecom"]);
        let expected: BTreeSet<String> = selector
            .group("telecom")
            .unwrap()
            .prefixes
            .iter()
            .cloned()
            .collect();
        assert_eq!(resolved, expected);
        assert!(resolved.is_subset(&selector.universe()));
    }

    #[test]
    fn two_groups_resolve_to_union() {
        let selector = PrefixSelector::standard();
        let a = selector.resolve(["mobile"]);
        let b = selector.resolve(["unicom"]);
        let both = selector.resolve(["mobile", "unicom"]);
        assert_eq!(both.len(), a.union(&b).count());
        assert!(both.len() >= a.len().max(b.len()));
    }

    #[test]
    fn unknown_group_falls_back_to_universe() {
        let selector = PrefixSelector::standard();
        assert_eq!(selector.resolve(["nope"]), selector.universe());
        assert_eq!(selector.unknown_groups(["mobile", "nope"]), vec!["nope"]);
    }

    #[test]
    fn every_standard_prefix_is_canonical() {
        for prefix in PrefixSelector::standard().universe() {
            assert!(is_canonical_prefix(&prefix), "{prefix} not canonical");
        }
    }

    #[test]
    fn custom_group_table() {
        let selector = PrefixSelector::new(vec![PrefixGroup::new("GroupX", "Group X", ["134"])], NONE);
        let resolved = selector.resolve(["GroupX"]);
        assert_eq!(resolved.into_iter().collect::<Vec<_>>(), vec!["134"]);
    }

    #[test]
    fn labels_follow_table_order() {
        let selector = PrefixSelector::standard();
        assert_eq!(selector.label(["telecom", "mobile"]), "China Mobile, China Telecom");
        assert_eq!(selector.label(NONE), ALL_GROUPS_LABEL);
        assert_eq!(selector.label(["nope"]), ALL_GROUPS_LABEL);
    }
}
