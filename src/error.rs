//! Structural problems reported by [`Tree::validate`][crate::Tree::validate].

/// A broken tree invariant. These can only arise when node relations are rebound by hand through
/// the unchecked [`Node`][crate::Node] setters; the [`Tree`][crate::Tree] operations never
/// produce them.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError<K> {
    /// The root node still points at a parent.
    #[error("root node {0:?} has a parent")]
    RootHasParent(K),
    /// A child's parent relation doesn't point at the node holding it.
    #[error("node {child:?} is a child of {parent:?} but doesn't point back to it")]
    BrokenParentLink {
        /// Key of the node holding the child.
        parent: K,
        /// Key of the child with the wrong back-pointer.
        child: K,
    },
    /// A key sits on the wrong side of one of its ancestors.
    #[error("node {key:?} violates the ordering of its ancestor {ancestor:?}")]
    OutOfOrder {
        /// The misplaced key.
        key: K,
        /// The ancestor whose bound it crosses.
        ancestor: K,
    },
}
