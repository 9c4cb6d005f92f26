//! Ternary search tree node.

use crate::arena::NodeRef;

/// One byte comparison step.
///
/// `value` is `Some` iff an inserted key ends at this node. A node can end a
/// key and still have an `eq` child, when that key is a prefix of a longer
/// one. Nodes have no destructor logic: they are owned by the arena and
/// released together with it.
#[derive(Debug, Clone)]
pub struct Node<V> {
    /// The byte this node compares against.
    pub ch: u8,
    /// Subtree of keys whose byte at this depth is less than `ch`.
    pub low: NodeRef,
    /// Subtree continuing keys that matched `ch`.
    pub eq: NodeRef,
    /// Subtree of keys whose byte at this depth is greater than `ch`.
    pub high: NodeRef,
    pub value: Option<V>,
}

impl<V> Node<V> {
    /// A detached node with no children and no value.
    pub fn new(ch: u8) -> Self {
        Self {
            ch,
            low: NodeRef::NULL,
            eq: NodeRef::NULL,
            high: NodeRef::NULL,
            value: None,
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.value.is_some()
    }
}
