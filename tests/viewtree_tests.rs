//! View tree ownership and lifecycle over the facade.

use galley::{NodeKind, TreeError, ViewTree};
use std::sync::Arc;

#[test]
fn test_child_ownership_is_exclusive() {
    let mut tree = ViewTree::new();
    let root = tree.new_node(NodeKind::Document);
    tree.set_root(root).unwrap();
    let a = tree.new_node(NodeKind::Block);
    let b = tree.new_node(NodeKind::Block);
    tree.add_child(root, a).unwrap();
    tree.add_child(root, b).unwrap();

    // A node with an owner cannot be attached elsewhere; reuse means a
    // deep copy.
    assert!(matches!(
        tree.add_child(b, a),
        Err(TreeError::AlreadyAttached(_))
    ));
    let copy = tree.deep_copy(a).unwrap();
    tree.add_child(b, copy).unwrap();
    assert_eq!(tree.live_node_count(), 4);
}

#[test]
fn test_release_frees_each_node_exactly_once() {
    let mut tree = ViewTree::new();
    let root = tree.new_node(NodeKind::Document);
    tree.set_root(root).unwrap();
    let group = tree.new_node(NodeKind::Group);
    let leaf = tree.new_node(NodeKind::Rectangle);
    tree.add_child(root, group).unwrap();
    tree.add_child(group, leaf).unwrap();

    let before = tree.live_node_count();
    let freed = tree.remove_subtree(group).unwrap();
    assert_eq!(freed, 2);
    assert_eq!(tree.live_node_count(), before - 2);

    // Removing again fails cleanly: the id no longer resolves.
    assert!(matches!(
        tree.remove_subtree(group),
        Err(TreeError::NodeNotFound(_))
    ));
}

#[test]
fn test_tree_level_sharing_round_trip() {
    let mut tree = ViewTree::new();
    let root = tree.new_node(NodeKind::Document);
    tree.set_root(root).unwrap();

    // Retain/release at the tree root is Arc cloning; the count returns to
    // its pre-retain value and the tree drops exactly once at zero.
    let shared = Arc::new(tree);
    assert_eq!(Arc::strong_count(&shared), 1);
    let retained = shared.clone();
    assert_eq!(Arc::strong_count(&shared), 2);
    drop(retained);
    assert_eq!(Arc::strong_count(&shared), 1);
    assert!(shared.root().is_some());
}

#[test]
fn test_renderer_view_is_read_only() {
    let mut tree = ViewTree::new();
    let root = tree.new_node(NodeKind::Document);
    tree.set_root(root).unwrap();
    let page = tree.new_node(NodeKind::Page);
    tree.add_child(root, page).unwrap();
    tree.add_page(page).unwrap();

    let shared: Arc<ViewTree> = Arc::new(tree);
    // Renderers walk borrowed accessors; everything they need is reachable
    // without mutation.
    assert_eq!(shared.pages().len(), 1);
    let order: Vec<_> = shared.descendants(shared.root().unwrap()).collect();
    assert_eq!(order.len(), 2);
    for id in order {
        let node = shared.node(id).unwrap();
        let _ = (node.kind.name(), node.bounds, node.children());
    }
}
