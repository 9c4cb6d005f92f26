//! Record parsing for the dictionary buffer.
//!
//! The buffer is a list of lines separated by `\n`. A line is either a bare
//! key, or `key\tvalue`. Records are zero-copy: keys and values are
//! [`Span`]s into the buffer they were parsed from.
//!
//! ```text
//! foo\tFOO\nbar\t\nmoo
//! ^^^  ^^^  ^^^     ^^^
//! key  val  key ""  key (Null)
//! ```
//!
//! Splitting follows plain line-splitting rules: `n` newlines always give
//! `n + 1` records. An empty buffer is one empty record, and a trailing `\n`
//! adds an empty final record. Empty keys are dropped by the tree, not here.

use memchr::{memchr, memchr_iter, memrchr};

/// A `(offset, len)` view into a byte buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    offset: usize,
    len: usize,
}

impl Span {
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

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn end(self) -> usize {
        self.offset + self.len
    }

    #[inline]
    pub fn range(self) -> std::ops::Range<usize> {
        self.offset..self.end()
    }

    /// The bytes this span covers in `buf`.
    ///
    /// # Panics
    /// Panics if the span lies outside `buf`.
    #[inline]
    pub fn slice(self, buf: &[u8]) -> &[u8] {
        &buf[self.range()]
    }
}

/// The value half of a record.
///
/// `Null` (no tab on the line) is distinct from `Bytes` with an empty span
/// (a tab followed directly by the end of the line).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueSlot {
    Null,
    Bytes(Span),
}

/// One parsed line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Record {
    pub key: Span,
    pub value: ValueSlot,
}

impl Record {
    #[inline]
    pub fn key_bytes(self, buf: &[u8]) -> &[u8] {
        self.key.slice(buf)
    }
}

/// Iterate over the records of `buf`.
pub fn records(buf: &[u8]) -> Records<'_> {
    Records {
        buf,
        pos: 0,
        done: false,
    }
}

/// Parse every record of `buf` into a vector.
pub fn parse_records(buf: &[u8]) -> Vec<Record> {
    let mut out = Vec::with_capacity(memchr_iter(b'\n', buf).count() + 1);
    out.extend(records(buf));
    out
}

/// Iterator returned by [`records`].
pub struct Records<'a> {
    buf: &'a [u8],
    pos: usize,
    done: bool,
}

impl Iterator for Records<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        if self.done {
            return None;
        }

        let start = self.pos;
        let newline = memchr(b'\n', &self.buf[start..]).map(|i| start + i);
        let end = newline.unwrap_or(self.buf.len());
        match newline {
            Some(nl) => self.pos = nl + 1,
            None => self.done = true,
        }

        // With several tabs on a line, the last one splits key from value.
        let record = match memrchr(b'\t', &self.buf[start..end]) {
            Some(tab) => {
                let value_start = start + tab + 1;
                Record {
                    key: Span::new(start, tab),
                    value: ValueSlot::Bytes(Span::new(value_start, end - value_start)),
                }
            }
            None => Record {
                key: Span::new(start, end - start),
                value: ValueSlot::Null,
            },
        };
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(buf: &[u8]) -> Vec<(&[u8], Option<&[u8]>)> {
        parse_records(buf)
            .into_iter()
            .map(|r| {
                let value = match r.value {
                    ValueSlot::Null => None,
                    ValueSlot::Bytes(span) => Some(span.slice(buf)),
                };
                (r.key_bytes(buf), value)
            })
            .collect()
    }

    #[test]
    fn test_bare_keys() {
        assert_eq!(
            parsed(b"foo\nbar\nbaz"),
            vec![
                (&b"foo"[..], None),
                (&b"bar"[..], None),
                (&b"baz"[..], None),
            ]
        );
    }

    #[test]
    fn test_key_values() {
        let buf = b"foo\tFOO\nbar\t\nbaz\tBAZ\nmoo\nmar";
        assert_eq!(
            parsed(buf),
            vec![
                (&b"foo"[..], Some(&b"FOO"[..])),
                (&b"bar"[..], Some(&b""[..])),
                (&b"baz"[..], Some(&b"BAZ"[..])),
                (&b"moo"[..], None),
                (&b"mar"[..], None),
            ]
        );
    }

    #[test]
    fn test_empty_buffer_is_one_empty_record() {
        let records = parse_records(b"");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, Span::new(0, 0));
        assert_eq!(records[0].value, ValueSlot::Null);
    }

    #[test]
    fn test_trailing_newline_adds_empty_record() {
        assert_eq!(
            parsed(b"foo\n"),
            vec![(&b"foo"[..], None), (&b""[..], None)]
        );
    }

    #[test]
    fn test_tab_with_empty_value() {
        let buf = b"key\t\n";
        let records = parse_records(buf);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key_bytes(buf), b"key");
        assert_eq!(records[0].value, ValueSlot::Bytes(Span::new(4, 0)));
    }

    #[test]
    fn test_last_tab_splits() {
        assert_eq!(
            parsed(b"a\tb\tc"),
            vec![(&b"a\tb"[..], Some(&b"c"[..]))]
        );
    }

    #[test]
    fn test_spans_stay_in_buffer() {
        let buf = "café\tkaffee\n\nthe foo\t\t\n".as_bytes();
        for r in records(buf) {
            assert!(r.key.end() <= buf.len());
            if let ValueSlot::Bytes(span) = r.value {
                assert!(span.end() <= buf.len());
                assert!(span.offset() > r.key.end(), "value starts after the tab");
            }
        }
        assert_eq!(records(buf).count(), 4);
    }

    #[test]
    fn test_span_accessors() {
        let span = Span::new(3, 4);
        assert_eq!(span.end(), 7);
        assert_eq!(span.range(), 3..7);
        assert!(!span.is_empty());
        assert_eq!(span.slice(b"abcdefgh"), b"defg");
    }
}
