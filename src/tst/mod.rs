//! Ternary search tree.
//!
//! Each node holds a single byte and three children: `low` (smaller byte at
//! the same depth), `eq` (next byte of keys that matched) and `high` (larger
//! byte at the same depth). A key is stored as the path of `eq` steps ending
//! at a node that carries its value.
//!
//! Lookups and inserts follow the same state machine. At each node, compare
//! the next unconsumed key byte `b` with `node.ch`:
//! - `b < ch`: go `low`
//! - `b > ch`: go `high`
//! - `b == ch` with bytes left: consume `b`, go `eq`
//! - `b == ch` on the last byte: this node terminates the key
//!
//! The tree never stores the empty key and never removes keys. All nodes are
//! owned by a [`NodeArena`] and freed with it.

mod node;

pub use node::Node;

use crate::arena::{NodeArena, NodeRef, DEFAULT_CHUNK_SIZE};

/// Which link of which node a descent step goes through.
#[derive(Clone, Copy)]
enum Link {
    Root,
    Low(NodeRef),
    Eq(NodeRef),
    High(NodeRef),
}

/// A ternary search tree mapping byte-string keys to values of type `V`.
pub struct TernarySearchTree<V> {
    nodes: NodeArena<Node<V>>,
    root: NodeRef,
    count: usize,
}

impl<V> TernarySearchTree<V> {
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// # Panics
    /// Panics if `chunk_size` is zero.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            nodes: NodeArena::with_chunk_size(chunk_size),
            root: NodeRef::NULL,
            count: 0,
        }
    }

    /// Number of keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of nodes allocated, including internal-only nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_chunks(&self) -> usize {
        self.nodes.num_chunks()
    }

    pub fn memory_usage(&self) -> usize {
        self.nodes.memory_usage()
    }

    /// Insert `value` under `key`, returning the value it replaces.
    ///
    /// An empty key is ignored and `value` is dropped.
    pub fn insert(&mut self, key: &[u8], value: V) -> Option<V> {
        if key.is_empty() {
            return None;
        }

        let mut link = Link::Root;
        let mut i = 0;
        loop {
            let ch = key[i];
            let mut node = self.follow(link);
            if node.is_null() {
                node = self.nodes.alloc(Node::new(ch));
                self.attach(link, node);
            }

            let node_ch = self.nodes.get(node).ch;
            if ch < node_ch {
                link = Link::Low(node);
            } else if ch > node_ch {
                link = Link::High(node);
            } else if i + 1 < key.len() {
                link = Link::Eq(node);
                i += 1;
            } else {
                let old = self.nodes.get_mut(node).value.replace(value);
                if old.is_none() {
                    self.count += 1;
                }
                return old;
            }
        }
    }

    /// The value stored under `key`, if the key was inserted.
    pub fn get(&self, key: &[u8]) -> Option<&V> {
        self.terminal(key)?.value.as_ref()
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Length of the longest root-to-node path, counting nodes.
    ///
    /// An empty tree has depth 0.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = Vec::new();
        if !self.root.is_null() {
            stack.push((self.root, 1));
        }
        while let Some((node, d)) = stack.pop() {
            max = max.max(d);
            let n = self.nodes.get(node);
            for child in [n.low, n.eq, n.high] {
                if !child.is_null() {
                    stack.push((child, d + 1));
                }
            }
        }
        max
    }

    /// Iterate over `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> Iter<'_, V> {
        let mut stack = Vec::new();
        if !self.root.is_null() {
            stack.push(Frame::Enter {
                node: self.root,
                depth: 0,
                via: None,
            });
        }
        Iter {
            tree: self,
            stack,
            key: Vec::new(),
        }
    }

    /// The node terminating `key`, walking the same state machine as insert.
    fn terminal(&self, key: &[u8]) -> Option<&Node<V>> {
        if key.is_empty() {
            return None;
        }

        let mut node = self.root;
        let mut i = 0;
        while !node.is_null() {
            let ch = key[i];
            let n = self.nodes.get(node);
            if ch < n.ch {
                node = n.low;
            } else if ch > n.ch {
                node = n.high;
            } else if i + 1 < key.len() {
                node = n.eq;
                i += 1;
            } else {
                return Some(n);
            }
        }
        None
    }

    #[inline]
    fn follow(&self, link: Link) -> NodeRef {
        match link {
            Link::Root => self.root,
            Link::Low(n) => self.nodes.get(n).low,
            Link::Eq(n) => self.nodes.get(n).eq,
            Link::High(n) => self.nodes.get(n).high,
        }
    }

    #[inline]
    fn attach(&mut self, link: Link, child: NodeRef) {
        match link {
            Link::Root => self.root = child,
            Link::Low(n) => self.nodes.get_mut(n).low = child,
            Link::Eq(n) => self.nodes.get_mut(n).eq = child,
            Link::High(n) => self.nodes.get_mut(n).high = child,
        }
    }
}

impl<V> Default for TernarySearchTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for TernarySearchTree<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

enum Frame {
    /// Visit `node`, whose key prefix is `depth` bytes long. `via` is the byte
    /// at `depth - 1` when arriving through an `eq` link.
    Enter {
        node: NodeRef,
        depth: usize,
        via: Option<u8>,
    },
    /// Emit the key ending at `node`.
    Yield { node: NodeRef, depth: usize },
}

/// In-order iterator over a [`TernarySearchTree`].
pub struct Iter<'a, V> {
    tree: &'a TernarySearchTree<V>,
    stack: Vec<Frame>,
    /// Shared key buffer; frames truncate it to their own prefix length.
    key: Vec<u8>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Enter { node, depth, via } => {
                    match via {
                        Some(b) => {
                            self.key.truncate(depth - 1);
                            self.key.push(b);
                        }
                        None => self.key.truncate(depth),
                    }

                    let n = self.tree.nodes.get(node);
                    // Pushed in reverse so they pop as low, self, eq, high.
                    if !n.high.is_null() {
                        self.stack.push(Frame::Enter {
                            node: n.high,
                            depth,
                            via: None,
                        });
                    }
                    if !n.eq.is_null() {
                        self.stack.push(Frame::Enter {
                            node: n.eq,
                            depth: depth + 1,
                            via: Some(n.ch),
                        });
                    }
                    if n.is_terminal() {
                        self.stack.push(Frame::Yield { node, depth });
                    }
                    if !n.low.is_null() {
                        self.stack.push(Frame::Enter {
                            node: n.low,
                            depth,
                            via: None,
                        });
                    }
                }
                Frame::Yield { node, depth } => {
                    let n = self.tree.nodes.get(node);
                    self.key.truncate(depth);
                    self.key.push(n.ch);
                    if let Some(value) = n.value.as_ref() {
                        return Some((self.key.clone(), value));
                    }
                }
            }
        }
        None
    }
}
