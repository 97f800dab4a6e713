use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::domain::common::normalize_ref;

/// A flat record that may point at a parent record of the same kind.
pub trait HierarchyItem {
    /// Unique key of the record (its id as a string)
    fn node_key(&self) -> String;

    /// Key of the parent record, if any.
    ///
    /// Empty strings and the nil UUID are treated as "no parent".
    fn parent_key(&self) -> Option<&str>;
}

/// A record together with its direct children, already sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode<T> {
    #[serde(flatten)]
    pub item: T,
    pub children: Vec<HierarchyNode<T>>,
}

impl<T> HierarchyNode<T> {
    pub fn leaf(item: T) -> Self {
        Self {
            item,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including the node itself
    pub fn count(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.children.iter());
        }
        total
    }

    /// Number of levels in this subtree (a leaf has depth 1)
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children.iter().map(|c| (c, level + 1)));
        }
        deepest
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    #[error("cyclic hierarchy: record {id} is its own ancestor")]
    Cycle { id: String },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Build a sorted forest from a flat collection.
///
/// Records whose parent is absent or does not resolve to another record in
/// `items` become roots. Children of every node, and the roots themselves,
/// are ordered with `compare` (stable, so ties keep input order). When two
/// records share a key the later one is the one children attach to.
///
/// Parent chains are checked before anything is assembled: a record that is
/// its own ancestor yields [`HierarchyError::Cycle`].
pub fn build_hierarchy<T, F>(
    items: Vec<T>,
    mut compare: F,
) -> Result<Vec<HierarchyNode<T>>, HierarchyError>
where
    T: HierarchyItem,
    F: FnMut(&T, &T) -> Ordering,
{
    if items.is_empty() {
        return Ok(vec![]);
    }

    let keys: Vec<String> = items.iter().map(HierarchyItem::node_key).collect();

    // Last write wins for duplicate keys
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(keys.len());
    for (i, key) in keys.iter().enumerate() {
        index.insert(key.as_str(), i);
    }

    let parents: Vec<Option<usize>> = items
        .iter()
        .map(|item| {
            normalize_ref(item.parent_key()).and_then(|pid| index.get(pid.as_str()).copied())
        })
        .collect();

    if let Some(i) = find_cycle(&parents) {
        return Err(HierarchyError::Cycle {
            id: keys[i].clone(),
        });
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); items.len()];
    let mut roots: Vec<usize> = Vec::new();
    for (i, parent) in parents.iter().enumerate() {
        match parent {
            Some(p) => children[*p].push(i),
            None => roots.push(i),
        }
    }

    roots.sort_by(|&a, &b| compare(&items[a], &items[b]));
    for siblings in children.iter_mut() {
        siblings.sort_by(|&a, &b| compare(&items[a], &items[b]));
    }

    // Pre-order from the roots; every record is reachable once cycles are ruled out
    let mut order = Vec::with_capacity(items.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(i) = stack.pop() {
        order.push(i);
        stack.extend(children[i].iter().rev().copied());
    }

    // Assemble bottom-up so that children are complete before their parent
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut built: Vec<Option<HierarchyNode<T>>> = (0..slots.len()).map(|_| None).collect();
    for &i in order.iter().rev() {
        let Some(item) = slots[i].take() else {
            continue;
        };
        let kids = children[i]
            .iter()
            .filter_map(|&c| built[c].take())
            .collect();
        built[i] = Some(HierarchyNode {
            item,
            children: kids,
        });
    }

    Ok(roots.iter().filter_map(|&r| built[r].take()).collect())
}

/// Returns the index of a record that lies on a parent cycle, if any.
fn find_cycle(parents: &[Option<usize>]) -> Option<usize> {
    let mut marks = vec![Mark::Unvisited; parents.len()];
    let mut path = Vec::new();

    for start in 0..parents.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        path.clear();
        let mut current = Some(start);
        while let Some(i) = current {
            match marks[i] {
                Mark::Done => break,
                Mark::OnPath => return Some(i),
                Mark::Unvisited => {
                    marks[i] = Mark::OnPath;
                    path.push(i);
                    current = parents[i];
                }
            }
        }
        for &i in &path {
            marks[i] = Mark::Done;
        }
    }
    None
}

/// Case-insensitive comparison of display names, the default sibling order.
pub fn cmp_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct Rec {
        pub id: String,
        pub parent: Option<String>,
        pub name: String,
    }

    impl HierarchyItem for Rec {
        fn node_key(&self) -> String {
            self.id.clone()
        }

        fn parent_key(&self) -> Option<&str> {
            self.parent.as_deref()
        }
    }

    pub(crate) fn rec(id: &str, parent: Option<&str>, name: &str) -> Rec {
        Rec {
            id: id.to_string(),
            parent: parent.map(str::to_string),
            name: name.to_string(),
        }
    }

    fn by_name(a: &Rec, b: &Rec) -> Ordering {
        cmp_names(&a.name, &b.name)
    }

    fn names(nodes: &[HierarchyNode<Rec>]) -> Vec<&str> {
        nodes.iter().map(|n| n.item.name.as_str()).collect()
    }

    fn all_ids(nodes: &[HierarchyNode<Rec>]) -> Vec<String> {
        let mut ids = Vec::new();
        let mut stack: Vec<&HierarchyNode<Rec>> = nodes.iter().collect();
        while let Some(n) = stack.pop() {
            ids.push(n.item.id.clone());
            stack.extend(n.children.iter());
        }
        ids.sort();
        ids
    }

    #[test]
    fn test_empty_input() {
        let roots = build_hierarchy(Vec::<Rec>::new(), by_name).unwrap();
        assert!(roots.is_empty());
    }

    #[test]
    fn test_roots_sorted_alphabetically() {
        let items = vec![
            rec("1", None, "Banana"),
            rec("2", None, "Apple"),
            rec("3", None, "Cherry"),
        ];
        let roots = build_hierarchy(items, by_name).unwrap();
        assert_eq!(names(&roots), vec!["Apple", "Banana", "Cherry"]);
    }

    #[test]
    fn test_three_levels() {
        let items = vec![
            rec("1", None, "Tools"),
            rec("2", Some("1"), "Hand Tools"),
            rec("3", Some("2"), "Hammer"),
        ];
        let roots = build_hierarchy(items, by_name).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].item.name, "Tools");
        assert_eq!(roots[0].children.len(), 1);
        assert_eq!(roots[0].children[0].item.name, "Hand Tools");
        assert_eq!(roots[0].children[0].children.len(), 1);
        assert_eq!(roots[0].children[0].children[0].item.name, "Hammer");
        assert_eq!(roots[0].depth(), 3);
        assert_eq!(roots[0].count(), 3);
    }

    #[test]
    fn test_child_listed_before_parent() {
        let items = vec![
            rec("3", Some("2"), "Hammer"),
            rec("2", Some("1"), "Hand Tools"),
            rec("1", None, "Tools"),
        ];
        let roots = build_hierarchy(items, by_name).unwrap();
        assert_eq!(names(&roots), vec!["Tools"]);
        assert_eq!(roots[0].depth(), 3);
    }

    #[test]
    fn test_dangling_parent_becomes_root() {
        let items = vec![rec("1", None, "Tools"), rec("2", Some("99"), "Orphan")];
        let roots = build_hierarchy(items, by_name).unwrap();
        assert_eq!(names(&roots), vec!["Orphan", "Tools"]);
        assert!(roots.iter().all(|r| r.is_leaf()));
    }

    #[test]
    fn test_nil_and_empty_parent_are_roots() {
        let items = vec![
            rec("1", Some(""), "A"),
            rec("2", Some("00000000-0000-0000-0000-000000000000"), "B"),
        ];
        let roots = build_hierarchy(items, by_name).unwrap();
        assert_eq!(names(&roots), vec!["A", "B"]);
    }

    #[test]
    fn test_children_sorted_at_every_level() {
        let items = vec![
            rec("r", None, "Root"),
            rec("c", Some("r"), "charlie"),
            rec("a", Some("r"), "Alpha"),
            rec("b", Some("r"), "bravo"),
            rec("y", Some("a"), "Yankee"),
            rec("x", Some("a"), "X-ray"),
        ];
        let roots = build_hierarchy(items, by_name).unwrap();
        assert_eq!(names(&roots[0].children), vec!["Alpha", "bravo", "charlie"]);
        assert_eq!(names(&roots[0].children[0].children), vec!["X-ray", "Yankee"]);
    }

    #[test]
    fn test_every_record_appears_once() {
        let items = vec![
            rec("1", None, "a"),
            rec("2", Some("1"), "b"),
            rec("3", Some("1"), "c"),
            rec("4", Some("3"), "d"),
            rec("5", Some("42"), "e"),
            rec("6", None, "f"),
        ];
        let roots = build_hierarchy(items, by_name).unwrap();
        assert_eq!(all_ids(&roots), vec!["1", "2", "3", "4", "5", "6"]);
        let total: usize = roots.iter().map(HierarchyNode::count).sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn test_resolved_child_is_not_a_root() {
        let items = vec![rec("1", None, "Parent"), rec("2", Some("1"), "Child")];
        let roots = build_hierarchy(items, by_name).unwrap();
        assert_eq!(names(&roots), vec!["Parent"]);
        assert_eq!(names(&roots[0].children), vec!["Child"]);
    }

    #[test]
    fn test_idempotent() {
        let items = vec![
            rec("1", None, "Tools"),
            rec("2", Some("1"), "Saws"),
            rec("3", Some("1"), "Drills"),
            rec("4", Some("77"), "Misc"),
        ];
        let first = build_hierarchy(items.clone(), by_name).unwrap();
        let second = build_hierarchy(items, by_name).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_stable_for_equal_keys() {
        let items = vec![rec("1", None, "same"), rec("2", None, "Same")];
        let roots = build_hierarchy(items, by_name).unwrap();
        let ids: Vec<&str> = roots.iter().map(|r| r.item.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_duplicate_key_last_wins_for_children() {
        let items = vec![
            rec("1", None, "First"),
            rec("1", None, "Second"),
            rec("2", Some("1"), "Child"),
        ];
        let roots = build_hierarchy(items, by_name).unwrap();
        assert_eq!(names(&roots), vec!["First", "Second"]);
        assert!(roots[0].is_leaf());
        assert_eq!(names(&roots[1].children), vec!["Child"]);
    }

    #[test]
    fn test_self_parent_is_cycle() {
        let items = vec![rec("1", Some("1"), "Loop")];
        let err = build_hierarchy(items, by_name).unwrap_err();
        assert_eq!(err, HierarchyError::Cycle { id: "1".into() });
    }

    #[test]
    fn test_two_node_cycle() {
        let items = vec![
            rec("ok", None, "Fine"),
            rec("a", Some("b"), "A"),
            rec("b", Some("a"), "B"),
        ];
        let err = build_hierarchy(items, by_name).unwrap_err();
        let HierarchyError::Cycle { id } = err;
        assert!(id == "a" || id == "b");
    }

    #[test]
    fn test_cycle_reached_through_tail() {
        // 4 -> 3 -> 2 -> 1 -> 3
        let items = vec![
            rec("1", Some("3"), "one"),
            rec("2", Some("1"), "two"),
            rec("3", Some("2"), "three"),
            rec("4", Some("3"), "four"),
        ];
        assert!(build_hierarchy(items, by_name).is_err());
    }

    #[test]
    fn test_deep_chain() {
        let n = 1_000;
        let items: Vec<Rec> = (0..n)
            .map(|i| {
                let parent = if i == 0 { None } else { Some((i - 1).to_string()) };
                Rec {
                    id: i.to_string(),
                    parent,
                    name: format!("node {i}"),
                }
            })
            .collect();
        let roots = build_hierarchy(items, by_name).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].count(), n);
        assert_eq!(roots[0].depth(), n);
    }

    #[test]
    fn test_error_message() {
        let err = HierarchyError::Cycle { id: "abc".into() };
        assert_eq!(
            err.to_string(),
            "cyclic hierarchy: record abc is its own ancestor"
        );
    }
}
