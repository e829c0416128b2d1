//! # huffman_coding
//!
//! Static Huffman coding over any symbol type: count symbols, build the prefix
//! tree, assign codes, encode to bits and decode back.
//!
//! ```
//! use huffman_coding::{build_code_table, build_huffman_tree, decode, encode, FrequencyTable};
//!
//! let symbols: Vec<char> = "abracadabra".chars().collect();
//! let freq: FrequencyTable<char> = symbols.iter().copied().collect();
//! let tree = build_huffman_tree(&freq)?;
//! let (codes, _) = build_code_table(&tree);
//!
//! let bits = encode(&symbols, &codes)?;
//! assert_eq!(decode(&bits, &tree)?, symbols);
//! # Ok::<(), huffman_coding::HuffmanError>(())
//! ```
//!
//! Decode-only consumers read the persisted table back with [`read_table`] and
//! either rebuild the tree with [`Node::from_codes`] or match codes directly
//! with [`decode_with_table`].

pub mod code_table;
pub mod codec;
pub mod error;
pub mod frequency;
pub mod huffman;
pub mod table_format;

pub use code_table::{Code, CodeTable, ReverseCodeTable, build_code_table};
pub use codec::{
    bits_to_string, decode, decode_with_table, encode, pack_bits, parse_bits, unpack_bits,
};
pub use error::{HuffmanError, Result};
pub use frequency::{FrequencyTable, Symbol};
pub use huffman::{HuffmanTree, Node, build_huffman_tree};
pub use table_format::{TableSymbol, deserialize_table, read_table, serialize_table, write_table};
