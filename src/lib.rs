//! This crate exposes a Binary Search Tree (BST) whose nodes keep a link to their parent, so a
//! lookup can be followed by a walk to the found node's neighbors.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored keys. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a key and
//! will sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Keys are unique: inserting a key twice is rejected. The [`Tree`] here does no balancing, so
//! its height depends entirely on the order in which keys arrive.
//!
//! ## Parents
//!
//! Every non-root `Node` points back at its parent. The parent link does not own the parent, only
//! child links do, so a `Tree` never forms a reference cycle. [`Tree::neighbors`] returns the
//! parent, left child and right child of a key in one call.
//!
//! ## Logging
//!
//! Mutations are reported through the [`log`] facade at `trace` and `debug` level. No logger is
//! installed by this crate.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod error;
pub mod node;
pub mod tree;

pub use error::InvariantError;
pub use node::{Neighbors, Node};
pub use tree::Tree;
