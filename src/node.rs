//! Handles to the cells of a [`Tree`][crate::Tree].
//!
//! A [`Node`] is a cheap, clonable handle to a shared, mutable cell. Children are owned by their
//! parent through strong references while the parent relation is a [`Weak`] back-pointer, so the
//! ownership graph is exactly the tree of child links.
//!
//! # Examples
//!
//! ```
//! use parented_bst::Node;
//!
//! let root = Node::new(14);
//! let left = Node::with_parent(5, &root);
//! root.set_left(Some(left.clone()));
//!
//! assert!(root.has_one_child());
//! assert_eq!(left.parent().map(|p| p.key()), Some(14));
//! assert!(left.is_leaf());
//! ```

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

pub(crate) type Link<K> = Rc<RefCell<Cell<K>>>;

/// The parent, left child and right child of a node, in that order.
pub type Neighbors<K> = (Option<Node<K>>, Option<Node<K>>, Option<Node<K>>);

/// The data behind a [`Node`] handle.
pub(crate) struct Cell<K> {
    key: K,
    parent: Weak<RefCell<Cell<K>>>,
    left: Option<Link<K>>,
    right: Option<Link<K>>,
}

/// A handle to one node of a binary search tree.
///
/// Cloning a `Node` clones the handle, both copies refer to the same node. The relation setters
/// simply rebind a slot and perform no integrity checking: keeping parent and child links
/// consistent is the job of [`Tree`][crate::Tree]. [`Tree::validate`][crate::Tree::validate]
/// reports any inconsistency introduced by hand.
///
/// Equality between handles is *shallow*: two nodes are equal when their keys are equal and the
/// keys of their parents, left children and right children match (absent matching absent). It
/// never recurses. Use [`Node::ptr_eq`] for identity.
pub struct Node<K>(Link<K>);

impl<K> Clone for Node<K> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<K> Node<K> {
    /// Creates a node with no parent and no children.
    pub fn new(key: K) -> Self {
        Self(Rc::new(RefCell::new(Cell {
            key,
            parent: Weak::new(),
            left: None,
            right: None,
        })))
    }

    /// Creates a childless node whose parent relation points at `parent`. The parent's child
    /// slots are left untouched.
    pub fn with_parent(key: K, parent: &Node<K>) -> Self {
        let node = Self::new(key);
        node.set_parent(Some(parent));
        node
    }

    pub(crate) fn from_link(link: Link<K>) -> Self {
        Self(link)
    }

    pub(crate) fn into_link(self) -> Link<K> {
        self.0
    }

    /// Returns a copy of this node's key.
    pub fn key(&self) -> K
    where
        K: Clone,
    {
        self.0.borrow().key.clone()
    }

    /// Overwrites this node's key.
    pub fn set_key(&self, key: K) {
        self.0.borrow_mut().key = key;
    }

    /// The node holding this one as a child, if any.
    pub fn parent(&self) -> Option<Node<K>> {
        self.0.borrow().parent.upgrade().map(Node)
    }

    /// The left child, if any.
    pub fn left(&self) -> Option<Node<K>> {
        self.0.borrow().left.as_ref().map(Rc::clone).map(Node)
    }

    /// The right child, if any.
    pub fn right(&self) -> Option<Node<K>> {
        self.0.borrow().right.as_ref().map(Rc::clone).map(Node)
    }

    /// Rebinds the parent relation. The parent is not retained by this node.
    pub fn set_parent(&self, parent: Option<&Node<K>>) {
        self.0.borrow_mut().parent = parent.map_or_else(Weak::new, |p| Rc::downgrade(&p.0));
    }

    /// Rebinds the left child slot, dropping this node's hold on the previous left child.
    pub fn set_left(&self, left: Option<Node<K>>) {
        self.0.borrow_mut().left = left.map(Node::into_link);
    }

    /// Rebinds the right child slot, dropping this node's hold on the previous right child.
    pub fn set_right(&self, right: Option<Node<K>>) {
        self.0.borrow_mut().right = right.map(Node::into_link);
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        let cell = self.0.borrow();
        cell.left.is_none() && cell.right.is_none()
    }

    /// Whether the node has exactly one child.
    pub fn has_one_child(&self) -> bool {
        let cell = self.0.borrow();
        cell.left.is_none() ^ cell.right.is_none()
    }

    /// Whether the node has both children.
    pub fn has_two_children(&self) -> bool {
        let cell = self.0.borrow();
        cell.left.is_some() && cell.right.is_some()
    }

    /// The parent, left child and right child of this node, in that order.
    pub fn neighbors(&self) -> Neighbors<K> {
        (self.parent(), self.left(), self.right())
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Node<K>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Compares `key` against this node's key.
    pub(crate) fn cmp_key(&self, key: &K) -> Ordering
    where
        K: Ord,
    {
        key.cmp(&self.0.borrow().key)
    }

    /// Applies `f` to this node's key without cloning it.
    pub(crate) fn with_key<R>(&self, f: impl FnOnce(&K) -> R) -> R {
        f(&self.0.borrow().key)
    }

    /// Takes both children out of this node, leaving it a leaf.
    pub(crate) fn take_children(&self) -> (Option<Link<K>>, Option<Link<K>>) {
        let mut cell = self.0.borrow_mut();
        (cell.left.take(), cell.right.take())
    }
}

/// Compares the keys of two optional neighbors; absent only matches absent.
fn neighbor_eq<K: PartialEq>(a: Option<Node<K>>, b: Option<Node<K>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.with_key(|a| b.with_key(|b| a == b)),
        _ => false,
    }
}

impl<K: PartialEq> PartialEq for Node<K> {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }

        self.with_key(|a| other.with_key(|b| a == b))
            && neighbor_eq(self.parent(), other.parent())
            && neighbor_eq(self.left(), other.left())
            && neighbor_eq(self.right(), other.right())
    }
}

impl<K: Eq> Eq for Node<K> {}

impl<K: Hash> Hash for Node<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.with_key(|k| k.hash(state));
        for neighbor in [self.parent(), self.left(), self.right()] {
            match neighbor {
                Some(n) => n.with_key(|k| Some(k).hash(state)),
                None => None::<&K>.hash(state),
            }
        }
    }
}

/// Formats an optional neighbor's key, or `none`.
struct NeighborKey<K>(Option<Node<K>>);

impl<K: fmt::Display> fmt::Display for NeighborKey<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(n) => n.with_key(|k| write!(f, "{k}")),
            None => f.write_str("none"),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for NeighborKey<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(n) => n.with_key(|k| f.debug_tuple("Some").field(k).finish()),
            None => f.write_str("None"),
        }
    }
}

impl<K: fmt::Display> fmt::Display for Node<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_key(|k| writeln!(f, "Node: {k}"))?;
        writeln!(f, "parent: {}", NeighborKey(self.parent()))?;
        writeln!(f, "left: {}", NeighborKey(self.left()))?;
        writeln!(f, "right: {}", NeighborKey(self.right()))
    }
}

impl<K: fmt::Debug> fmt::Debug for Node<K> {
    // Only neighbor keys are shown; following parent links would loop forever.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_key(|key| {
            f.debug_struct("Node")
                .field("key", key)
                .field("parent", &NeighborKey(self.parent()))
                .field("left", &NeighborKey(self.left()))
                .field("right", &NeighborKey(self.right()))
                .finish()
        })
    }
}
