//! Chunked bump arena for tree nodes.
//!
//! Nodes live in fixed-capacity chunks and are addressed by [`NodeRef`]
//! indices instead of pointers:
//! - A chunk is allocated with its full capacity up front and never grows, so
//!   a node never moves once handed out
//! - Child links are 4 bytes instead of 8
//! - There is no per-node free; dropping the arena releases every chunk at once

/// Default number of nodes per chunk. Smaller chunks (4096) measured slower.
pub const DEFAULT_CHUNK_SIZE: usize = 65_536;

/// A 32-bit index into a [`NodeArena`].
///
/// `NodeRef::NULL` marks an absent child. Valid refs stay valid, and keep
/// pointing at the same node, for the whole lifetime of the arena that
/// produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct NodeRef(u32);

impl NodeRef {
    /// The absent reference.
    pub const NULL: NodeRef = NodeRef(u32::MAX);

    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == u32::MAX
    }

    /// # Panics
    /// Panics if the index does not fit below `u32::MAX`. Running out of
    /// node indices is fatal, like running out of memory.
    #[inline]
    fn from_index(index: usize) -> Self {
        assert!(
            index < u32::MAX as usize,
            "node arena exhausted its 32-bit index space"
        );
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for NodeRef {
    fn default() -> Self {
        Self::NULL
    }
}

/// Append-only node storage, grown one fixed-size chunk at a time.
pub struct NodeArena<T> {
    chunks: Vec<Vec<T>>,
    chunk_size: usize,
    len: usize,
}

impl<T> NodeArena<T> {
    /// Create an arena with [`DEFAULT_CHUNK_SIZE`] nodes per chunk.
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Create an arena with `chunk_size` nodes per chunk.
    ///
    /// # Panics
    /// Panics if `chunk_size` is zero.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "arena chunk size must be non-zero");
        Self {
            chunks: Vec::new(),
            chunk_size,
            len: 0,
        }
    }

    /// Move `node` into the arena and return its stable reference.
    pub fn alloc(&mut self, node: T) -> NodeRef {
        if self
            .chunks
            .last()
            .map_or(true, |chunk| chunk.len() == self.chunk_size)
        {
            self.grow();
        }

        let node_ref = NodeRef::from_index(self.len);
        self.chunks[self.len / self.chunk_size].push(node);
        self.len += 1;
        node_ref
    }

    #[inline]
    pub fn get(&self, node: NodeRef) -> &T {
        debug_assert!(!node.is_null(), "dereferenced NodeRef::NULL");
        let i = node.index();
        &self.chunks[i / self.chunk_size][i % self.chunk_size]
    }

    #[inline]
    pub fn get_mut(&mut self, node: NodeRef) -> &mut T {
        debug_assert!(!node.is_null(), "dereferenced NodeRef::NULL");
        let i = node.index();
        &mut self.chunks[i / self.chunk_size][i % self.chunk_size]
    }

    /// Number of nodes allocated so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Bytes reserved by the arena, including unused slots in the last chunk.
    pub fn memory_usage(&self) -> usize {
        self.chunks.iter().map(|c| c.capacity()).sum::<usize>() * std::mem::size_of::<T>()
            + self.chunks.capacity() * std::mem::size_of::<Vec<T>>()
    }

    fn grow(&mut self) {
        // Pushing up to `chunk_size` elements never reallocates this Vec.
        self.chunks.push(Vec::with_capacity(self.chunk_size));
        tracing::trace!(
            chunks = self.chunks.len(),
            chunk_size = self.chunk_size,
            "node arena grew"
        );
    }
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
