//! An unbalanced BST whose nodes know their parents. Nodes are handed out as [`Node`] handles so
//! callers can walk to a node's neighbors after a lookup.
//!
//! # Examples
//!
//! ```
//! use parented_bst::Tree;
//!
//! let mut tree = Tree::new(14);
//!
//! assert!(tree.insert(5));
//! assert!(tree.insert(23));
//!
//! // Keys are unique.
//! assert!(!tree.insert(5));
//!
//! let (parent, left, right) = tree.neighbors(&5);
//! assert_eq!(parent.map(|n| n.key()), Some(14));
//! assert!(left.is_none() && right.is_none());
//!
//! tree.delete(&5);
//! assert!(tree.search(&5).is_none());
//! ```

use std::cmp::Ordering;
use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::error::InvariantError;
use crate::node::{Link, Neighbors, Node};

/// A Binary Search Tree over unique keys. This can be used for inserting, searching, and deleting
/// keys, and for looking up the neighbors (parent, left child, right child) of a key.
///
/// The tree does no balancing: its shape is entirely determined by the order of insertions and
/// deletions.
///
/// Two trees are equal when they have the same shape and the same key at every position. This is
/// a deep comparison, unlike the one-level equality of [`Node`] handles.
pub struct Tree<K> {
    root: Option<Node<K>>,
}

impl<K> Drop for Tree<K> {
    // Dropping the root recursively could overflow the stack on a degenerate tree.
    fn drop(&mut self) {
        let mut stack: Vec<Link<K>> = self.root.take().map(Node::into_link).into_iter().collect();
        while let Some(link) = stack.pop() {
            // Someone outside the tree still holds this node, so its subtree stays alive with it.
            if Rc::strong_count(&link) > 1 {
                continue;
            }
            let (left, right) = Node::from_link(link).take_children();
            stack.extend(left);
            stack.extend(right);
        }
    }
}

impl<K> Clone for Tree<K>
where
    K: Clone,
{
    // TODO stack based Clone
    fn clone(&self) -> Self {
        Self {
            root: self.root.as_ref().map(|root| clone_subtree(root, None)),
        }
    }
}

/// Copies `node` and everything below it into fresh nodes, pointing the copy at `parent`.
fn clone_subtree<K: Clone>(node: &Node<K>, parent: Option<&Node<K>>) -> Node<K> {
    let copy = Node::new(node.key());
    copy.set_parent(parent);
    copy.set_left(node.left().map(|left| clone_subtree(&left, Some(&copy))));
    copy.set_right(node.right().map(|right| clone_subtree(&right, Some(&copy))));
    copy
}

impl<K: PartialEq> PartialEq for Tree<K> {
    fn eq(&self, other: &Self) -> bool {
        subtree_eq(self.root(), other.root())
    }
}

impl<K: Eq> Eq for Tree<K> {}

impl<K: Hash> Hash for Tree<K> {
    // Deep-equal trees have equal roots under the node's one-level equality too.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root.hash(state);
    }
}

/// Deep structural equality of two subtrees.
fn subtree_eq<K: PartialEq>(a: Option<Node<K>>, b: Option<Node<K>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.with_key(|x| b.with_key(|y| x == y))
                && subtree_eq(a.left(), b.left())
                && subtree_eq(a.right(), b.right())
        }
        _ => false,
    }
}

impl<K: fmt::Display> fmt::Display for Tree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BST:\n")?;
        render(self.root(), f)
    }
}

/// Writes each key followed by its left subtree, a line break, then its right subtree.
fn render<K: fmt::Display>(node: Option<Node<K>>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let Some(node) = node else {
        return Ok(());
    };
    node.with_key(|key| write!(f, "{key} "))?;
    render(node.left(), f)?;
    f.write_char('\n')?;
    render(node.right(), f)
}

/// Debug view of a subtree that only follows child links.
struct Subtree<K>(Node<K>);

impl<K: fmt::Debug> fmt::Debug for Subtree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let left = self.0.left().map(Subtree);
        let right = self.0.right().map(Subtree);
        self.0.with_key(|key| {
            f.debug_struct("Node")
                .field("key", key)
                .field("left", &left)
                .field("right", &right)
                .finish()
        })
    }
}

impl<K: fmt::Debug> fmt::Debug for Tree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root().map(Subtree))
            .finish()
    }
}

impl<K> Tree<K> {
    /// Generates a new `Tree` whose root holds `key`.
    pub fn new(key: K) -> Self {
        Self {
            root: Some(Node::new(key)),
        }
    }

    /// The current root, if the tree still holds any keys.
    pub fn root(&self) -> Option<Node<K>> {
        self.root.clone()
    }

    /// Whether every key has been deleted.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Inserts `key` into the tree. Returns `false`, leaving the tree untouched, if the key is
    /// already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use parented_bst::Tree;
    ///
    /// let mut tree = Tree::new(2);
    ///
    /// assert!(tree.insert(1));
    /// assert!(!tree.insert(1));
    /// assert_eq!(tree.search(&1).map(|n| n.key()), Some(1));
    /// ```
    pub fn insert(&mut self, key: K) -> bool
    where
        K: Ord,
    {
        let Some(mut current) = self.root() else {
            log::trace!("inserting into an empty tree");
            self.root = Some(Node::new(key));
            return true;
        };

        loop {
            let ordering = current.cmp_key(&key);
            let next = match ordering {
                Ordering::Less => current.left(),
                Ordering::Equal => {
                    log::debug!("rejecting duplicate key");
                    return false;
                }
                Ordering::Greater => current.right(),
            };

            match next {
                Some(next) => current = next,
                None => {
                    log::trace!("inserting a new leaf");
                    let node = Some(Node::with_parent(key, &current));
                    if ordering == Ordering::Less {
                        current.set_left(node);
                    } else {
                        current.set_right(node);
                    }
                    break;
                }
            }
        }

        if cfg!(debug_assertions) {
            current.with_key(|key| {
                if let Some(left) = current.left() {
                    assert!(left.with_key(|left| left < key));
                }
                if let Some(right) = current.right() {
                    assert!(right.with_key(|right| right > key));
                }
            });
        }

        true
    }

    /// Finds the node holding `key`, or `None` if no node does.
    ///
    /// # Examples
    ///
    /// ```
    /// use parented_bst::Tree;
    ///
    /// let mut tree = Tree::new(2);
    /// tree.insert(1);
    ///
    /// let one = tree.search(&1).unwrap();
    /// assert!(one.parent().unwrap().ptr_eq(&tree.root().unwrap()));
    /// assert!(tree.search(&42).is_none());
    /// ```
    pub fn search(&self, key: &K) -> Option<Node<K>>
    where
        K: Ord,
    {
        let mut current = self.root();
        while let Some(node) = current {
            current = match node.cmp_key(key) {
                Ordering::Less => node.left(),
                Ordering::Equal => return Some(node),
                Ordering::Greater => node.right(),
            };
        }

        None
    }

    /// Deletes `key` from the tree. Deleting a key that isn't present does nothing.
    ///
    /// A node with two children is not removed: it takes the key of its successor (the smallest
    /// key in its right subtree) and the successor's node is removed instead. Handles to the
    /// retained node therefore observe the new key.
    ///
    /// # Examples
    ///
    /// ```
    /// use parented_bst::Tree;
    ///
    /// let mut tree = Tree::new(2);
    /// tree.insert(1);
    /// tree.insert(3);
    ///
    /// let root = tree.root().unwrap();
    /// tree.delete(&2);
    ///
    /// assert!(tree.search(&2).is_none());
    /// assert_eq!(root.key(), 3);
    /// assert!(root.ptr_eq(&tree.root().unwrap()));
    /// ```
    pub fn delete(&mut self, key: &K)
    where
        K: Ord + Clone,
    {
        let Some(node) = self.search(key) else {
            log::debug!("key not found, nothing to delete");
            return;
        };

        match (node.left(), node.right()) {
            (Some(_), Some(right)) => {
                // The matched node stays in place with its successor's key.
                let successor = min_node(&right);
                log::debug!("promoting successor into a node with two children");
                node.set_key(successor.key());
                self.splice(&successor);
            }
            _ => self.splice(&node),
        }
    }

    /// Replaces `node`, which has at most one child, with that child in its parent's slot (or as
    /// the root). The removed node keeps its own relations for anyone still holding it.
    fn splice(&mut self, node: &Node<K>) {
        log::trace!("splicing out a node with at most one child");
        let child = node.left().or_else(|| node.right());
        let parent = node.parent();
        // Rebinding the parent's slot doesn't fix the child's back-pointer.
        if let Some(child) = &child {
            child.set_parent(parent.as_ref());
        }

        match parent {
            None => self.root = child,
            Some(parent) => {
                if parent.left().is_some_and(|left| left.ptr_eq(node)) {
                    parent.set_left(child);
                } else {
                    parent.set_right(child);
                }
            }
        }
    }

    /// The parent, left child and right child of the node holding `key`. All three are `None`
    /// when the key isn't present.
    ///
    /// # Examples
    ///
    /// ```
    /// use parented_bst::Tree;
    ///
    /// let mut tree = Tree::new(2);
    /// tree.insert(1);
    ///
    /// let (parent, left, right) = tree.neighbors(&2);
    /// assert!(parent.is_none() && right.is_none());
    /// assert_eq!(left.map(|n| n.key()), Some(1));
    ///
    /// let (parent, left, right) = tree.neighbors(&42);
    /// assert!(parent.is_none() && left.is_none() && right.is_none());
    /// ```
    pub fn neighbors(&self, key: &K) -> Neighbors<K>
    where
        K: Ord,
    {
        self.search(key)
            .map_or((None, None, None), |node| node.neighbors())
    }

    /// Checks the parent links and the ordering of the whole tree.
    ///
    /// Trees only modified through their own operations always pass. A failure means some node
    /// relation was rebound by hand.
    pub fn validate(&self) -> Result<(), InvariantError<K>>
    where
        K: Ord + Clone + fmt::Debug,
    {
        let Some(root) = self.root() else {
            return Ok(());
        };
        if root.parent().is_some() {
            return Err(InvariantError::RootHasParent(root.key()));
        }
        validate_subtree(&root, None, None)
    }
}

/// The node with the smallest key in the subtree rooted at `node`.
fn min_node<K>(node: &Node<K>) -> Node<K> {
    let mut current = node.clone();
    while let Some(left) = current.left() {
        current = left;
    }
    current
}

/// Validates the subtree rooted at `node`, whose keys must lie strictly between the optional
/// bounds.
fn validate_subtree<K>(
    node: &Node<K>,
    lower: Option<&K>,
    upper: Option<&K>,
) -> Result<(), InvariantError<K>>
where
    K: Ord + Clone + fmt::Debug,
{
    let key = node.key();
    if let Some(lower) = lower.filter(|lower| key <= **lower) {
        return Err(InvariantError::OutOfOrder {
            key,
            ancestor: lower.clone(),
        });
    }
    if let Some(upper) = upper.filter(|upper| key >= **upper) {
        return Err(InvariantError::OutOfOrder {
            key,
            ancestor: upper.clone(),
        });
    }

    let (_, left, right) = node.neighbors();
    for child in left.iter().chain(right.iter()) {
        if !child.parent().is_some_and(|parent| parent.ptr_eq(node)) {
            return Err(InvariantError::BrokenParentLink {
                parent: key,
                child: child.key(),
            });
        }
    }

    if let Some(left) = left {
        validate_subtree(&left, lower, Some(&key))?;
    }
    if let Some(right) = right {
        validate_subtree(&right, Some(&key), upper)?;
    }

    Ok(())
}
