use super::*;

use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Serialize a sorted map as a dictionary buffer.
fn dictionary_bytes(entries: &BTreeMap<Vec<u8>, Option<Vec<u8>>>) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            out.push(b'\n');
        }
        out.extend_from_slice(key);
        if let Some(value) = value {
            out.push(b'\t');
            out.extend_from_slice(value);
        }
    }
    out
}

/// Straightforward re-statement of the matcher: split on every space, drop a
/// trailing empty token, test the last `n` token starts at each token end.
fn reference_matches(keys: &BTreeSet<Vec<u8>>, text: &[u8], n: usize) -> Vec<Match> {
    let mut tokens: Vec<(usize, usize)> = Vec::new();
    let mut start = 0;
    for (i, &b) in text.iter().enumerate() {
        if b == b' ' {
            tokens.push((start, i));
            start = i + 1;
        }
    }
    if start < text.len() {
        tokens.push((start, text.len()));
    }

    let mut out = Vec::new();
    for j in 0..tokens.len() {
        let end = tokens[j].1;
        for token in &tokens[(j + 1).saturating_sub(n)..=j] {
            if keys.contains(&text[token.0..end]) {
                out.push(Match::new(token.0, end - token.0));
            }
        }
    }
    out
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // Keys cannot contain the line or field delimiters.
    prop::collection::vec(prop_oneof![Just(b'a'), Just(b'b'), Just(b'c'), Just(0xc3)], 1..=6)
}

fn value_strategy() -> impl Strategy<Value = Option<Vec<u8>>> {
    prop::option::of(prop::collection::vec(
        any::<u8>().prop_filter("no delimiters", |b| *b != b'\n' && *b != b'\t'),
        0..=4,
    ))
}

fn entries_strategy() -> impl Strategy<Value = BTreeMap<Vec<u8>, Option<Vec<u8>>>> {
    prop::collection::btree_map(key_strategy(), value_strategy(), 0..=64)
}

fn phrase_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop_oneof![Just(b'a'), Just(b'b'), Just(b' ')], 1..=7)
}

fn text_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop_oneof![Just(b'a'), Just(b'b'), Just(b' ')], 0..=24)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_lookup_equivalence(
        entries in entries_strategy(),
        probes in prop::collection::vec(key_strategy(), 0..=32),
    ) {
        let tree = TernaryBufferTree::new(dictionary_bytes(&entries));
        prop_assert_eq!(tree.len(), entries.len());

        for (key, value) in &entries {
            let expected = match value {
                Some(v) => Value::Bytes(v.as_slice()),
                None => Value::Null,
            };
            prop_assert!(tree.contains(key));
            prop_assert_eq!(tree.get(key), Some(expected));
        }
        for probe in &probes {
            prop_assert_eq!(tree.contains(probe), entries.contains_key(probe));
        }

        let got: Vec<Vec<u8>> = tree.iter().map(|(k, _)| k).collect();
        let expected: Vec<Vec<u8>> = entries.keys().cloned().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_insertion_orders_agree(
        entries in entries_strategy(),
        probes in prop::collection::vec(key_strategy(), 0..=32),
    ) {
        let bytes = dictionary_bytes(&entries);
        let median = TernaryBufferTree::new(bytes.as_slice());
        let sequential = TernaryBufferTree::with_config(
            bytes.as_slice(),
            Config { insertion_order: InsertionOrder::Sequential, ..Config::default() },
        ).unwrap();

        for key in entries.keys().chain(probes.iter()) {
            prop_assert_eq!(median.contains(key), sequential.contains(key));
            prop_assert_eq!(median.get(key), sequential.get(key));
        }
    }

    #[test]
    fn prop_matches_agree_with_reference(
        phrases in prop::collection::btree_set(phrase_strategy(), 0..=16),
        text in text_strategy(),
        n in 1usize..=5,
    ) {
        let mut tree: TernarySearchTree<()> = TernarySearchTree::new();
        for phrase in &phrases {
            tree.insert(phrase, ());
        }

        let found = ngram::find_all_matches(&tree, &text, n).unwrap();
        prop_assert_eq!(&found, &reference_matches(&phrases, &text, n));

        for m in &found {
            prop_assert!(!m.is_empty());
            prop_assert!(m.range().end <= text.len());
            prop_assert!(phrases.contains(m.as_bytes(&text)));
        }
    }
}

#[test]
fn exhaustive_small_dictionary_orders() {
    let keys: [&[u8]; 6] = [b"a", b"aa", b"ab", b"b", b"ba", b"c"];

    // Every prefix length of the sorted key list, loaded both ways.
    for len in 0..=keys.len() {
        let mut tree_median: TernarySearchTree<usize> = TernarySearchTree::new();
        let mut tree_seq: TernarySearchTree<usize> = TernarySearchTree::new();
        let items: Vec<(&[u8], usize)> = keys[..len].iter().copied().zip(0..).collect();
        loader::load(&mut tree_median, &items, InsertionOrder::MedianFirst, |(k, _)| *k, |(_, v)| *v);
        loader::load(&mut tree_seq, &items, InsertionOrder::Sequential, |(k, _)| *k, |(_, v)| *v);

        for key in keys {
            assert_eq!(tree_median.get(key), tree_seq.get(key), "len {} key {:?}", len, key);
        }
        let got: Vec<Vec<u8>> = tree_median.iter().map(|(k, _)| k).collect();
        let expected: Vec<Vec<u8>> = keys[..len].iter().map(|k| k.to_vec()).collect();
        assert_eq!(got, expected);
    }
}
