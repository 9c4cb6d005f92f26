//! N-gram matching over space-delimited text.
//!
//! Text is split on the space byte only. The matcher keeps the start offsets
//! of the last `max_ngram_size` tokens. At every token end it tests each
//! tracked start, oldest first, against the tree, so for one end boundary the
//! longest candidate is reported first:
//!
//! ```text
//! text:   "i live in new york city"   max_ngram_size = 2
//! ends:    i | live | in | new | york | city
//! tested:  ... "in new" "new" | "new york" "york" | "york city" "city"
//! ```
//!
//! Splitting is literal: two adjacent spaces produce an empty token. The empty
//! token itself never matches, since the tree never stores an empty key, but
//! spans running across it (`"new  york"`) are still tested.

use memchr::memchr;
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::tst::TernarySearchTree;

/// Window sizes up to this stay on the stack.
const INLINE_WINDOW: usize = 8;

const DELIMITER: u8 = b' ';

/// A substring of the query text equal to a stored key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Match {
    offset: usize,
    len: usize,
}

impl Match {
    #[inline]
    pub const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    #[inline]
    pub const fn offset(self) -> usize {
        self.offset
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.len
    }

    /// Always false for matches produced by the matcher.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn range(self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.len
    }

    /// The matched bytes within `text`, which must be the searched text.
    #[inline]
    pub fn as_bytes(self, text: &[u8]) -> &[u8] {
        &text[self.range()]
    }
}

/// Lazily find every n-gram of `text`, up to `max_ngram_size` tokens, that is
/// a key of `tree`.
///
/// Returns [`Error::ZeroNgramSize`] when `max_ngram_size` is 0.
pub fn matches<'a, 't, V>(
    tree: &'a TernarySearchTree<V>,
    text: &'t [u8],
    max_ngram_size: usize,
) -> Result<Matches<'a, 't, V>> {
    if max_ngram_size == 0 {
        return Err(Error::ZeroNgramSize);
    }

    let mut starts = SmallVec::new();
    starts.push(0);
    Ok(Matches {
        tree,
        text,
        max_ngram_size,
        starts,
        cursor: 0,
        boundary: None,
        probe: 0,
    })
}

/// Collect [`matches`] into a vector.
pub fn find_all_matches<V>(
    tree: &TernarySearchTree<V>,
    text: &[u8],
    max_ngram_size: usize,
) -> Result<Vec<Match>> {
    Ok(matches(tree, text, max_ngram_size)?.collect())
}

/// Iterator returned by [`matches`].
pub struct Matches<'a, 't, V> {
    tree: &'a TernarySearchTree<V>,
    text: &'t [u8],
    max_ngram_size: usize,
    /// Start offsets of the tracked tokens, oldest first.
    starts: SmallVec<[usize; INLINE_WINDOW]>,
    /// Start of the token being scanned.
    cursor: usize,
    /// End of the current token while its candidates are being tested.
    boundary: Option<usize>,
    /// Next index into `starts` to test against `boundary`.
    probe: usize,
}

impl<V> Iterator for Matches<'_, '_, V> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        loop {
            let end = match self.boundary {
                Some(end) => end,
                None => {
                    if self.cursor >= self.text.len() {
                        return None;
                    }
                    let end = memchr(DELIMITER, &self.text[self.cursor..])
                        .map_or(self.text.len(), |i| self.cursor + i);
                    self.boundary = Some(end);
                    self.probe = 0;
                    end
                }
            };

            while self.probe < self.starts.len() {
                let start = self.starts[self.probe];
                self.probe += 1;
                if self.tree.contains(&self.text[start..end]) {
                    return Some(Match::new(start, end - start));
                }
            }

            if self.starts.len() == self.max_ngram_size {
                self.starts.remove(0);
            }
            self.cursor = end + 1;
            self.starts.push(self.cursor);
            self.boundary = None;
        }
    }
}
