use std::collections::{HashMap, HashSet, VecDeque};

use super::builder::{HierarchyItem, HierarchyNode};
use crate::domain::common::normalize_ref;

/// Flatten a forest into `(item, depth)` rows in display order.
///
/// Children of a node are emitted only when `is_expanded` returns true for
/// it, the way a collapsible tree list renders.
pub fn flatten_visible<'a, T, F>(roots: &'a [HierarchyNode<T>], is_expanded: F) -> Vec<(&'a T, usize)>
where
    F: Fn(&T) -> bool,
{
    let mut rows = Vec::new();
    let mut stack: Vec<(&HierarchyNode<T>, usize)> = roots.iter().rev().map(|n| (n, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        rows.push((&node.item, depth));
        if is_expanded(&node.item) {
            stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
        }
    }
    rows
}

/// Flatten a forest with every node expanded
pub fn flatten_all<T>(roots: &[HierarchyNode<T>]) -> Vec<(&T, usize)> {
    flatten_visible(roots, |_| true)
}

/// Keys of all transitive descendants of `key` within a flat collection.
///
/// Tolerates cycles in the input; each key is visited once.
pub fn descendant_keys<T: HierarchyItem>(items: &[T], key: &str) -> HashSet<String> {
    let mut by_parent: HashMap<String, Vec<String>> = HashMap::new();
    for item in items {
        if let Some(parent) = normalize_ref(item.parent_key()) {
            by_parent.entry(parent).or_default().push(item.node_key());
        }
    }

    let mut found = HashSet::new();
    let mut queue = VecDeque::from([key.to_string()]);
    while let Some(current) = queue.pop_front() {
        if let Some(kids) = by_parent.get(&current) {
            for kid in kids {
                if kid != key && found.insert(kid.clone()) {
                    queue.push_back(kid.clone());
                }
            }
        }
    }
    found
}

/// Records that may be chosen as the parent of `editing`.
///
/// Excludes the record itself and all its descendants. With `editing` set to
/// `None` (a record being created) every record is a candidate.
pub fn parent_candidates<'a, T: HierarchyItem>(items: &'a [T], editing: Option<&str>) -> Vec<&'a T> {
    let Some(key) = editing else {
        return items.iter().collect();
    };
    let excluded = descendant_keys(items, key);
    items
        .iter()
        .filter(|item| {
            let k = item.node_key();
            k != key && !excluded.contains(&k)
        })
        .collect()
}

/// Whether re-parenting `key` under `new_parent` would close a cycle.
pub fn would_create_cycle<T: HierarchyItem>(items: &[T], key: &str, new_parent: Option<&str>) -> bool {
    match normalize_ref(new_parent) {
        None => false,
        Some(parent) => parent == key || descendant_keys(items, key).contains(&parent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::hierarchy::builder::tests::{rec, Rec};
    use crate::shared::hierarchy::{build_hierarchy, cmp_names};

    fn sample() -> Vec<Rec> {
        vec![
            rec("1", None, "Tools"),
            rec("2", Some("1"), "Hand Tools"),
            rec("3", Some("2"), "Hammer"),
            rec("4", Some("1"), "Power Tools"),
            rec("5", None, "Consumables"),
        ]
    }

    fn tree() -> Vec<HierarchyNode<Rec>> {
        build_hierarchy(sample(), |a, b| cmp_names(&a.name, &b.name)).unwrap()
    }

    #[test]
    fn test_flatten_all_in_display_order() {
        let roots = tree();
        let rows: Vec<(&str, usize)> = flatten_all(&roots)
            .into_iter()
            .map(|(r, d)| (r.name.as_str(), d))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Consumables", 0),
                ("Tools", 0),
                ("Hand Tools", 1),
                ("Hammer", 2),
                ("Power Tools", 1),
            ]
        );
    }

    #[test]
    fn test_flatten_skips_collapsed_children() {
        let roots = tree();
        let expanded: HashSet<&str> = HashSet::from(["1"]);
        let rows: Vec<&str> = flatten_visible(&roots, |r| expanded.contains(r.id.as_str()))
            .into_iter()
            .map(|(r, _)| r.name.as_str())
            .collect();
        assert_eq!(rows, vec!["Consumables", "Tools", "Hand Tools", "Power Tools"]);
    }

    #[test]
    fn test_descendant_keys() {
        let items = sample();
        let mut found: Vec<String> = descendant_keys(&items, "1").into_iter().collect();
        found.sort();
        assert_eq!(found, vec!["2", "3", "4"]);
        assert!(descendant_keys(&items, "3").is_empty());
    }

    #[test]
    fn test_descendant_keys_tolerates_cycles() {
        let items = vec![rec("a", Some("b"), "A"), rec("b", Some("a"), "B")];
        let found = descendant_keys(&items, "a");
        assert_eq!(found, HashSet::from(["b".to_string()]));
    }

    #[test]
    fn test_parent_candidates_exclude_self_and_descendants() {
        let items = sample();
        let ids: Vec<&str> = parent_candidates(&items, Some("2"))
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "4", "5"]);
        assert_eq!(parent_candidates(&items, None).len(), items.len());
    }

    #[test]
    fn test_would_create_cycle() {
        let items = sample();
        assert!(would_create_cycle(&items, "1", Some("3")));
        assert!(would_create_cycle(&items, "2", Some("2")));
        assert!(!would_create_cycle(&items, "3", Some("5")));
        assert!(!would_create_cycle(&items, "1", None));
        assert!(!would_create_cycle(&items, "1", Some("")));
    }
}
