use parented_bst::{Node, Tree};
use quickcheck_macros::quickcheck;

use std::collections::{BTreeSet, HashSet};

use crate::Op;

/// Applies a set of operations to a tree and a set.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same keys in both.
fn do_ops(ops: &[Op<i8>], bst: &mut Tree<i8>, set: &mut BTreeSet<i8>) {
    for op in ops {
        match op {
            Op::Insert(k) => {
                assert_eq!(bst.insert(*k), set.insert(*k));
            }
            Op::Delete(k) => {
                bst.delete(k);
                set.remove(k);
            }
        }
    }
}

/// Collects every key below `node` in sorted order by walking child links.
fn in_order(node: Option<Node<i8>>, keys: &mut Vec<i8>) {
    if let Some(node) = node {
        in_order(node.left(), keys);
        keys.push(node.key());
        in_order(node.right(), keys);
    }
}

#[quickcheck]
fn fuzz_multiple_operations_i8(root: i8, ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new(root);
    let mut set = BTreeSet::from([root]);

    do_ops(&ops, &mut tree, &mut set);

    (i8::MIN..=i8::MAX).all(|key| tree.search(&key).map(|n| n.key()).as_ref() == set.get(&key))
}

#[quickcheck]
fn keys_stay_ordered(root: i8, ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new(root);
    let mut set = BTreeSet::from([root]);

    do_ops(&ops, &mut tree, &mut set);

    let mut keys = Vec::new();
    in_order(tree.root(), &mut keys);
    keys.into_iter().eq(set) && tree.validate().is_ok()
}

#[quickcheck]
fn contains(root: i8, xs: Vec<i8>) -> bool {
    let mut tree = Tree::new(root);
    for x in &xs {
        tree.insert(*x);
    }

    xs.iter().all(|x| tree.search(x).map(|n| n.key()) == Some(*x))
}

#[quickcheck]
fn contains_not(root: i8, xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree = Tree::new(root);
    for x in &xs {
        tree.insert(*x);
    }
    let mut added: HashSet<_> = xs.into_iter().collect();
    added.insert(root);
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.search(x).is_none())
}

#[quickcheck]
fn duplicates_leave_tree_unchanged(root: i8, xs: Vec<i8>) -> bool {
    let mut tree = Tree::new(root);
    for x in &xs {
        tree.insert(*x);
    }
    let before = tree.clone();

    xs.iter().all(|x| !tree.insert(*x)) && !tree.insert(root) && tree == before
}

#[quickcheck]
fn with_deletions(root: i8, xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = Tree::new(root);
    for x in &xs {
        tree.insert(*x);
    }
    for delete in &deletes {
        tree.delete(delete);
    }

    let mut still_present = xs;
    still_present.push(root);
    still_present.retain(|x| !deletes.contains(x));

    deletes.iter().all(|x| tree.search(x).is_none())
        && still_present.iter().all(|x| tree.search(x).is_some())
}

#[quickcheck]
fn neighbors_match_node_links(root: i8, xs: Vec<i8>, key: i8) -> bool {
    let mut tree = Tree::new(root);
    for x in &xs {
        tree.insert(*x);
    }

    let (parent, left, right) = tree.neighbors(&key);
    match tree.search(&key) {
        None => parent.is_none() && left.is_none() && right.is_none(),
        Some(node) => {
            let same = |a: Option<Node<i8>>, b: Option<Node<i8>>| match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => a.ptr_eq(&b),
                _ => false,
            };
            same(parent, node.parent()) && same(left, node.left()) && same(right, node.right())
        }
    }
}

#[quickcheck]
fn deleting_root_reroots(root: i8, xs: Vec<i8>) -> bool {
    let mut tree = Tree::new(root);
    for x in &xs {
        tree.insert(*x);
    }
    let old_root = tree.root().unwrap();
    let had_two_children = old_root.has_two_children();
    let sole_child = old_root.left().or_else(|| old_root.right());

    tree.delete(&root);

    let new_root = tree.root();
    let rerooted = if had_two_children {
        new_root.is_some_and(|n| n.ptr_eq(&old_root) && n.key() > root)
    } else {
        match (new_root, sole_child) {
            (None, None) => tree.is_empty(),
            (Some(n), Some(child)) => n.ptr_eq(&child) && n.parent().is_none(),
            _ => false,
        }
    };

    rerooted && tree.search(&root).is_none() && tree.validate().is_ok()
}
