//! Property-based tests for the Huffman codec.
//!
//! These check, over arbitrary non-empty inputs:
//! - encode then decode gives back the input
//! - no code is a prefix of another
//! - leaf and root weights add up to the input length
//! - a more frequent symbol never gets a longer code
//! - a serialized table reads back to the same code associations

use proptest::prelude::*;

use huffman_coding::{
    Code, FrequencyTable, Node, ReverseCodeTable, bits_to_string, build_code_table,
    build_huffman_tree, decode, decode_with_table, deserialize_table, encode, pack_bits,
    parse_bits, serialize_table, unpack_bits,
};

/// Short byte strings over a small alphabet, so symbols repeat and tie.
fn skewed_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop_oneof![4 => Just(b'a'), 2 => b'b'..=b'e', 1 => any::<u8>()], 1..300)
}

fn any_text() -> impl Strategy<Value = Vec<char>> {
    prop::collection::vec(any::<char>(), 1..200)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_round_trip_bytes(data in skewed_bytes()) {
        let freq: FrequencyTable<u8> = data.iter().copied().collect();
        let tree = build_huffman_tree(&freq).unwrap();
        let (codes, reverse) = build_code_table(&tree);

        let bits = encode(&data, &codes).unwrap();
        prop_assert_eq!(decode(&bits, &tree).unwrap(), data.clone());
        prop_assert_eq!(decode_with_table(&bits, &reverse).unwrap(), data.clone());

        let packed = unpack_bits(&pack_bits(&bits)).unwrap();
        prop_assert_eq!(&packed, &bits);
        prop_assert_eq!(parse_bits(&bits_to_string(&bits)).unwrap(), bits);
    }

    #[test]
    fn prop_round_trip_text(text in any_text()) {
        let freq: FrequencyTable<char> = text.iter().copied().collect();
        let tree = build_huffman_tree(&freq).unwrap();
        let (codes, _) = build_code_table(&tree);

        let bits = encode(&text, &codes).unwrap();
        prop_assert_eq!(decode(&bits, &tree).unwrap(), text);
    }

    #[test]
    fn prop_codes_are_prefix_free(data in skewed_bytes()) {
        let tree = build_huffman_tree(&data.iter().copied().collect()).unwrap();
        let (codes, _) = build_code_table(&tree);
        let all: Vec<&Code> = codes.iter().map(|(_, c)| c).collect();

        for a in &all {
            prop_assert!(!a.is_empty());
            for b in &all {
                prop_assert!(!a.is_prefix_of(b), "{} is a prefix of {}", a, b);
            }
        }
    }

    #[test]
    fn prop_frequency_conservation(data in skewed_bytes()) {
        let freq: FrequencyTable<u8> = data.iter().copied().collect();
        let tree = build_huffman_tree(&freq).unwrap();

        prop_assert_eq!(freq.total(), data.len() as u64);
        prop_assert_eq!(tree.freq(), data.len() as u64);
        let leaf_sum: u64 = tree.leaves().iter().map(|(_, f, _)| f).sum();
        prop_assert_eq!(leaf_sum, data.len() as u64);
        prop_assert_eq!(tree.leaf_count(), freq.len());
    }

    #[test]
    fn prop_frequent_symbols_get_shorter_codes(data in skewed_bytes()) {
        let freq: FrequencyTable<u8> = data.iter().copied().collect();
        let tree = build_huffman_tree(&freq).unwrap();
        let (codes, _) = build_code_table(&tree);

        for (a, count_a) in freq.iter() {
            for (b, count_b) in freq.iter() {
                if count_a > count_b {
                    prop_assert!(codes.get(a).unwrap().len() <= codes.get(b).unwrap().len());
                }
            }
        }
    }

    #[test]
    fn prop_deterministic(data in skewed_bytes()) {
        let freq: FrequencyTable<u8> = data.iter().copied().collect();
        prop_assert_eq!(build_huffman_tree(&freq).unwrap(), build_huffman_tree(&freq).unwrap());
    }

    #[test]
    fn prop_table_round_trip(text in any_text()) {
        let tree = build_huffman_tree(&text.iter().copied().collect()).unwrap();
        let (codes, reverse) = build_code_table(&tree);

        let loaded: ReverseCodeTable<char> = deserialize_table(&serialize_table(&codes)).unwrap();
        for (code, symbol) in reverse.iter() {
            prop_assert_eq!(loaded.get(code.bits()), Some(symbol));
        }
        prop_assert_eq!(loaded.len(), reverse.len());

        let rebuilt = Node::from_codes(&loaded).unwrap();
        let bits = encode(&text, &codes).unwrap();
        prop_assert_eq!(decode(&bits, &rebuilt).unwrap(), text);
    }

    #[test]
    fn prop_truncation_is_reported(data in skewed_bytes(), cut in 1usize..8) {
        let tree = build_huffman_tree(&data.iter().copied().collect()).unwrap();
        let (codes, _) = build_code_table(&tree);
        let bits = encode(&data, &codes).unwrap();

        // Drop bits from the end; either a whole code boundary remains or decode must fail.
        let cut = cut.min(bits.len());
        let truncated = &bits[..bits.len() - cut];
        let mut boundaries = vec![0usize];
        for symbol in &data {
            let next = boundaries.last().unwrap() + codes.get(symbol).unwrap().len();
            boundaries.push(next);
        }

        let result = decode(truncated, &tree);
        if boundaries.contains(&truncated.len()) {
            prop_assert!(result.is_ok());
        } else {
            let is_truncated = matches!(result, Err(huffman_coding::HuffmanError::TruncatedCode { .. }));
            prop_assert!(is_truncated);
        }
    }
}
