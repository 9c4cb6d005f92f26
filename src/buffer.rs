//! The byte store every key and value span points into.

use std::fs::File;
use std::ops::Deref;
use std::path::Path;

use memmap2::Mmap;

use crate::error::Result;

/// Immutable bytes owned by a [`TernaryBufferTree`](crate::TernaryBufferTree).
///
/// Either an owned copy, or a read-only map of a dictionary file.
pub enum BackingBuffer {
    Owned(Box<[u8]>),
    Mapped(Mmap),
}

impl BackingBuffer {
    /// Map the file at `path` read-only.
    ///
    /// The file must not be truncated or rewritten while the map is alive;
    /// doing so is undefined behavior, as for any `Mmap`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            // Zero-length maps are rejected on some platforms.
            return Ok(Self::Owned(Box::default()));
        }

        // SAFETY: read-only map; callers are told not to modify the file
        // while the tree is alive.
        let mmap = unsafe { Mmap::map(&file)? };
        tracing::debug!(
            path = %path.display(),
            bytes = mmap.len(),
            "mapped dictionary file"
        );
        Ok(Self::Mapped(mmap))
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Owned(bytes) => &bytes[..],
            Self::Mapped(mmap) => &mmap[..],
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, Self::Mapped(_))
    }
}

impl Deref for BackingBuffer {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for BackingBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl std::fmt::Debug for BackingBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackingBuffer")
            .field("mapped", &self.is_mapped())
            .field("len", &self.len())
            .finish()
    }
}

impl From<Vec<u8>> for BackingBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Owned(bytes.into_boxed_slice())
    }
}

impl From<Box<[u8]>> for BackingBuffer {
    fn from(bytes: Box<[u8]>) -> Self {
        Self::Owned(bytes)
    }
}

impl From<&[u8]> for BackingBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::Owned(bytes.into())
    }
}

impl From<String> for BackingBuffer {
    fn from(text: String) -> Self {
        Self::from(text.into_bytes())
    }
}

impl From<&str> for BackingBuffer {
    fn from(text: &str) -> Self {
        Self::from(text.as_bytes())
    }
}
