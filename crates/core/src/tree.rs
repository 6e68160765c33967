//! Subtree operations over a flat, parent-pointer collection list
//!
//! The upstream API only returns collections as a flat list where each record
//! names its parent. These functions rebuild the hierarchy below a given key,
//! either as a nested [`CollectionMap`] or as a pre-order flattened list.
//!
//! Traversal is iterative and tracks visited keys, so corrupt upstream data
//! with a parent cycle ends in [`TreeError::CycleDetected`] instead of looping.

use std::collections::HashSet;

use crate::collection::{Collection, CollectionMap};

/// Error type for subtree operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Collection not found: {0}")]
    NotFound(String),

    #[error("Cycle detected in collection hierarchy at {0}")]
    CycleDetected(String),
}

/// Find a collection by exact key match
pub fn find_by_key<'a>(collections: &'a [Collection], key: &str) -> Result<&'a Collection, TreeError> {
    collections
        .iter()
        .find(|collection| collection.key == key)
        .ok_or_else(|| TreeError::NotFound(key.to_string()))
}

/// Index of the next collection at or after `from` whose parent is `parent`
fn next_child(collections: &[Collection], parent: &str, from: usize) -> Option<usize> {
    collections
        .get(from..)?
        .iter()
        .position(|collection| collection.parent.as_deref() == Some(parent))
        .map(|offset| from + offset)
}

/// Flatten the subtree rooted at `root` into a list
///
/// The root comes first. Each child is emitted in flat-list order and its own
/// subtree follows it immediately, before the scan for the next sibling
/// resumes (pre-order).
pub fn collect_descendants(
    collections: &[Collection],
    root: &str,
) -> Result<Vec<Collection>, TreeError> {
    let root = find_by_key(collections, root)?;

    let mut ordered = vec![root.clone()];
    let mut visited: HashSet<&str> = HashSet::from([root.key.as_str()]);

    // Each frame is a parent key and the list position where its scan resumes.
    let mut stack: Vec<(&str, usize)> = vec![(root.key.as_str(), 0)];

    while let Some(&(parent, from)) = stack.last() {
        let Some(index) = next_child(collections, parent, from) else {
            stack.pop();
            continue;
        };

        let top = stack.len() - 1;
        stack[top].1 = index + 1;

        let child = &collections[index];
        if !visited.insert(child.key.as_str()) {
            return Err(TreeError::CycleDetected(child.key.clone()));
        }

        ordered.push(child.clone());
        stack.push((child.key.as_str(), 0));
    }

    Ok(ordered)
}

/// Build the nested tree rooted at `root`
///
/// Children keep the order of the flat list. The tree holds exactly the
/// nodes [`collect_descendants`] returns for the same inputs.
pub fn build_tree(collections: &[Collection], root: &str) -> Result<CollectionMap, TreeError> {
    let ordered = collect_descendants(collections, root)?;

    // Open nodes always form the ancestor chain of the node being placed, so
    // closing a node attaches it to the one below it on the stack.
    let mut open: Vec<CollectionMap> = Vec::new();

    for collection in ordered {
        while open.len() > 1
            && open.last().map(|node| node.collection.key.as_str()) != collection.parent.as_deref()
        {
            close_node(&mut open);
        }
        open.push(CollectionMap::leaf(collection));
    }

    while open.len() > 1 {
        close_node(&mut open);
    }

    open.pop().ok_or_else(|| TreeError::NotFound(root.to_string()))
}

fn close_node(open: &mut Vec<CollectionMap>) {
    if let Some(done) = open.pop() {
        if let Some(parent) = open.last_mut() {
            parent.children.push(done);
        }
    }
}

/// Keys of the subtree rooted at `root`, in traversal order
pub fn descendant_keys(collections: &[Collection], root: &str) -> Result<Vec<String>, TreeError> {
    Ok(collect_descendants(collections, root)?
        .into_iter()
        .map(|collection| collection.key)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(key: &str, parent: Option<&str>) -> Collection {
        Collection::new(key, &format!("Collection {key}"), parent)
    }

    fn keys(collections: &[Collection]) -> Vec<&str> {
        collections.iter().map(|c| c.key.as_str()).collect()
    }

    fn child_keys(node: &CollectionMap) -> Vec<&str> {
        node.children
            .iter()
            .map(|c| c.collection.key.as_str())
            .collect()
    }

    /// Two roots; R has children out of list order with a grandchild in between.
    fn forest() -> Vec<Collection> {
        vec![
            col("R", None),
            col("C2", Some("R")),
            col("G1", Some("C1")),
            col("X", None),
            col("C1", Some("R")),
            col("Y", Some("X")),
            col("G2", Some("C2")),
        ]
    }

    #[test]
    fn test_find_by_key() {
        let collections = forest();

        assert_eq!(find_by_key(&collections, "C1").unwrap().key, "C1");
        assert_eq!(
            find_by_key(&collections, "nope"),
            Err(TreeError::NotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_find_by_key_empty_list() {
        assert_eq!(
            find_by_key(&[], "A"),
            Err(TreeError::NotFound("A".to_string()))
        );
    }

    #[test]
    fn test_linear_chain() {
        let collections = vec![col("A", None), col("B", Some("A")), col("C", Some("B"))];

        let flat = collect_descendants(&collections, "A").unwrap();
        assert_eq!(keys(&flat), vec!["A", "B", "C"]);

        let tree = build_tree(&collections, "A").unwrap();
        assert_eq!(tree.collection.key, "A");
        assert_eq!(child_keys(&tree), vec!["B"]);
        assert_eq!(child_keys(&tree.children[0]), vec!["C"]);
        assert!(tree.children[0].children[0].children.is_empty());
    }

    #[test]
    fn test_unrelated_roots_are_excluded() {
        let collections = vec![col("A", None), col("X", None)];

        let flat = collect_descendants(&collections, "A").unwrap();
        assert_eq!(keys(&flat), vec!["A"]);

        let tree = build_tree(&collections, "A").unwrap();
        assert!(tree.children.is_empty());
    }

    #[test]
    fn test_descendants_preorder_follows_list_order() {
        let collections = forest();

        let flat = collect_descendants(&collections, "R").unwrap();

        assert_eq!(keys(&flat), vec!["R", "C2", "G2", "C1", "G1"]);
    }

    #[test]
    fn test_descendants_root_first_exactly_once() {
        let collections = forest();

        for root in ["R", "C1", "C2", "X", "Y", "G1"] {
            let flat = collect_descendants(&collections, root).unwrap();
            assert_eq!(flat[0].key, root);
            assert_eq!(flat.iter().filter(|c| c.key == root).count(), 1);
        }
    }

    #[test]
    fn test_descendants_is_deterministic() {
        let collections = forest();

        let first = collect_descendants(&collections, "R").unwrap();
        let second = collect_descendants(&collections, "R").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_descendants_of_non_root_node() {
        let collections = forest();

        let flat = collect_descendants(&collections, "C2").unwrap();

        assert_eq!(keys(&flat), vec!["C2", "G2"]);
        assert_eq!(flat[0].parent.as_deref(), Some("R"));
    }

    #[test]
    fn test_tree_children_match_parent_pointers() {
        let collections = forest();
        let tree = build_tree(&collections, "R").unwrap();

        let mut pending = vec![&tree];
        while let Some(node) = pending.pop() {
            let expected: Vec<&str> = collections
                .iter()
                .filter(|c| c.parent.as_deref() == Some(node.collection.key.as_str()))
                .map(|c| c.key.as_str())
                .collect();
            assert_eq!(child_keys(node), expected);
            pending.extend(node.children.iter());
        }

        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn test_tree_keeps_collection_fields() {
        let collections = forest();

        let tree = build_tree(&collections, "C1").unwrap();

        assert_eq!(tree.collection, col("C1", Some("R")));
        assert_eq!(tree.children[0].collection, col("G1", Some("C1")));
    }

    #[test]
    fn test_wide_and_deep_tree() {
        let mut collections = vec![col("root", None)];
        for branch in 0..5 {
            let mut parent = "root".to_string();
            for depth in 0..50 {
                let key = format!("b{branch}d{depth}");
                collections.push(col(&key, Some(&parent)));
                parent = key;
            }
        }

        let tree = build_tree(&collections, "root").unwrap();
        assert_eq!(tree.children.len(), 5);
        assert_eq!(tree.node_count(), 251);

        let flat = collect_descendants(&collections, "root").unwrap();
        assert_eq!(flat.len(), 251);
        assert_eq!(flat[1].key, "b0d0");
        assert_eq!(flat[50].key, "b0d49");
        assert_eq!(flat[51].key, "b1d0");
    }

    #[test]
    fn test_missing_root() {
        let collections = forest();

        assert_eq!(
            collect_descendants(&collections, "Z"),
            Err(TreeError::NotFound("Z".to_string()))
        );
        assert_eq!(
            build_tree(&collections, "Z"),
            Err(TreeError::NotFound("Z".to_string()))
        );
        assert_eq!(
            descendant_keys(&[], "Z"),
            Err(TreeError::NotFound("Z".to_string()))
        );
    }

    #[test]
    fn test_two_node_cycle() {
        let collections = vec![col("A", Some("B")), col("B", Some("A"))];

        assert_eq!(
            collect_descendants(&collections, "A"),
            Err(TreeError::CycleDetected("A".to_string()))
        );
        assert_eq!(
            build_tree(&collections, "B"),
            Err(TreeError::CycleDetected("B".to_string()))
        );
    }

    #[test]
    fn test_self_parent_cycle() {
        let collections = vec![col("A", Some("A"))];

        assert_eq!(
            collect_descendants(&collections, "A"),
            Err(TreeError::CycleDetected("A".to_string()))
        );
    }

    #[test]
    fn test_cycle_outside_subtree_is_ignored() {
        let collections = vec![
            col("A", None),
            col("B", Some("A")),
            col("P", Some("Q")),
            col("Q", Some("P")),
        ];

        assert_eq!(
            descendant_keys(&collections, "A").unwrap(),
            vec!["A".to_string(), "B".to_string()]
        );
    }
}
