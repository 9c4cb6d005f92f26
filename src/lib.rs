//! # ternary-buffer-tree
//!
//! A static dictionary over one byte buffer, backed by a ternary search tree,
//! with n-gram phrase matching.
//!
//! The buffer holds newline-separated records, each a bare key or
//! `key\tvalue`. Keys and values are never copied: the tree stores spans into
//! the buffer it owns. The tree is built once, in median-first order, and is
//! read-only afterwards.
//!
//! ## Example
//!
//! ```rust
//! use ternary_buffer_tree::{TernaryBufferTree, Value};
//!
//! let tree = TernaryBufferTree::new("new\nnew york\tNYC\nyork");
//!
//! assert!(tree.contains("new york"));
//! assert_eq!(tree.get("new york"), Some(Value::Bytes(b"NYC")));
//! assert_eq!(tree.get("york"), Some(Value::Null));
//! assert_eq!(tree.get("boston"), None);
//!
//! let text = "i live in new york city";
//! let found: Vec<&str> = tree
//!     .find_all_matches(text, 2)
//!     .unwrap()
//!     .into_iter()
//!     .map(|m| &text[m.range()])
//!     .collect();
//! assert_eq!(found, ["new", "new york", "york"]);
//! ```
//!
//! ## Concurrency
//!
//! Construction takes the buffer by value and finishes before the tree is
//! returned, so no query can observe a partially built tree. A built
//! [`TernaryBufferTree`] is `Send + Sync` and may be shared across threads for
//! concurrent reads without locking.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

pub mod arena;
pub mod buffer;
pub mod error;
pub mod loader;
pub mod ngram;
pub mod records;
pub mod tst;

pub use buffer::BackingBuffer;
pub use error::{Error, Result};
pub use loader::InsertionOrder;
pub use ngram::{Match, Matches};
pub use records::{Record, Span, ValueSlot};
pub use tst::TernarySearchTree;

use std::path::Path;

use arena::DEFAULT_CHUNK_SIZE;

/// Configuration for building a [`TernaryBufferTree`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Nodes per arena chunk. Must be non-zero.
    pub chunk_size: usize,
    /// Order records are inserted in. Median-first expects sorted records.
    pub insertion_order: InsertionOrder,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            insertion_order: InsertionOrder::MedianFirst,
        }
    }
}

impl Config {
    fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidChunkSize);
        }
        Ok(())
    }
}

/// A value looked up in a [`TernaryBufferTree`].
///
/// `get` returns `None` for keys that were never stored, `Some(Value::Null)`
/// for keys stored without a tab, and `Some(Value::Bytes(..))` otherwise,
/// including `Bytes(b"")` for `key\t` lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Value<'a> {
    Null,
    Bytes(&'a [u8]),
}

impl<'a> Value<'a> {
    #[inline]
    pub fn is_null(self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn as_bytes(self) -> Option<&'a [u8]> {
        match self {
            Value::Null => None,
            Value::Bytes(bytes) => Some(bytes),
        }
    }

    /// The value as UTF-8 text, if it is non-null and valid UTF-8.
    pub fn as_str(self) -> Option<&'a str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }
}

/// Size and shape statistics for a built tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of distinct keys stored
    pub keys: usize,
    /// Number of tree nodes allocated
    pub nodes: usize,
    /// Number of arena chunks allocated
    pub chunks: usize,
    /// Longest root-to-node path
    pub depth: usize,
    /// Size of the backing buffer
    pub buffer_bytes: usize,
    /// Whether the backing buffer is a file mapping
    pub mapped: bool,
}

/// A read-only dictionary built from one backing buffer.
pub struct TernaryBufferTree {
    tree: TernarySearchTree<ValueSlot>,
    buffer: BackingBuffer,
}

impl TernaryBufferTree {
    /// Build a tree from `bytes` with the default [`Config`].
    pub fn new(bytes: impl Into<BackingBuffer>) -> Self {
        Self::build(bytes.into(), &Config::default())
    }

    pub fn with_config(bytes: impl Into<BackingBuffer>, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(bytes.into(), &config))
    }

    /// Build a tree from a memory-mapped dictionary file.
    ///
    /// The file must not be modified while the tree is alive.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, Config::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        config.validate()?;
        let buffer = BackingBuffer::open(path)?;
        Ok(Self::build(buffer, &config))
    }

    fn build(buffer: BackingBuffer, config: &Config) -> Self {
        let mut tree = TernarySearchTree::with_chunk_size(config.chunk_size);
        let bytes = buffer.as_bytes();
        let records = records::parse_records(bytes);
        loader::load(
            &mut tree,
            &records,
            config.insertion_order,
            |r| r.key_bytes(bytes),
            |r| r.value,
        );

        tracing::debug!(
            records = records.len(),
            keys = tree.len(),
            nodes = tree.node_count(),
            chunks = tree.num_chunks(),
            order = ?config.insertion_order,
            "built ternary buffer tree"
        );
        Self { tree, buffer }
    }

    /// Whether `key` is stored, with or without a value.
    pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
        self.tree.contains(key.as_ref())
    }

    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<Value<'_>> {
        self.tree.get(key.as_ref()).map(|slot| self.resolve(*slot))
    }

    /// Every n-gram of `text`, up to `max_ngram_size` space-separated tokens,
    /// that is a stored key. See [`ngram`] for ordering and tokenization.
    ///
    /// Returns [`Error::ZeroNgramSize`] when `max_ngram_size` is 0.
    pub fn find_all_matches(
        &self,
        text: impl AsRef<[u8]>,
        max_ngram_size: usize,
    ) -> Result<Vec<Match>> {
        ngram::find_all_matches(&self.tree, text.as_ref(), max_ngram_size)
    }

    /// Lazy form of [`find_all_matches`](Self::find_all_matches).
    pub fn matches<'t>(
        &self,
        text: &'t [u8],
        max_ngram_size: usize,
    ) -> Result<Matches<'_, 't, ValueSlot>> {
        ngram::matches(&self.tree, text, max_ngram_size)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Iterate over `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (Vec<u8>, Value<'_>)> + '_ {
        self.tree
            .iter()
            .map(move |(key, slot)| (key, self.resolve(*slot)))
    }

    /// The backing buffer the tree was built from.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats {
            keys: self.tree.len(),
            nodes: self.tree.node_count(),
            chunks: self.tree.num_chunks(),
            depth: self.tree.depth(),
            buffer_bytes: self.buffer.len(),
            mapped: self.buffer.is_mapped(),
        }
    }

    /// Heap bytes held: the node arena plus an owned buffer. Mapped file pages
    /// are not counted.
    pub fn memory_usage(&self) -> usize {
        let buffer = if self.buffer.is_mapped() {
            0
        } else {
            self.buffer.len()
        };
        self.tree.memory_usage() + buffer
    }

    #[inline]
    fn resolve(&self, slot: ValueSlot) -> Value<'_> {
        match slot {
            ValueSlot::Null => Value::Null,
            ValueSlot::Bytes(span) => Value::Bytes(span.slice(&self.buffer)),
        }
    }
}

impl std::fmt::Debug for TernaryBufferTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TernaryBufferTree")
            .field("keys", &self.len())
            .field("buffer", &self.buffer)
            .finish()
    }
}


#[cfg(test)]
mod proptests;
