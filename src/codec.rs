//! Encoding symbols to bits and walking bits back to symbols.
//!
//! Bitstreams are `Vec<bool>` in memory. Two persisted forms are provided and
//! each round-trips only with its own counterpart:
//! - text: one `'0'`/`'1'` character per bit ([`bits_to_string`] / [`parse_bits`]);
//! - packed: an 8-byte big-endian bit count, then the bits MSB first with the
//!   last byte zero-padded ([`pack_bits`] / [`unpack_bits`]).

use log::{debug, trace};

use crate::code_table::{CodeTable, ReverseCodeTable};
use crate::error::{HuffmanError, Result};
use crate::frequency::Symbol;
use crate::huffman::Node;

const BIT_COUNT_HEADER: usize = 8;

/// Concatenates the code of every symbol, in input order.
pub fn encode<S: Symbol>(symbols: &[S], code_table: &CodeTable<S>) -> Result<Vec<bool>> {
    debug!("Starting data encoding of {} symbols...", symbols.len());
    let mut bits = Vec::with_capacity(symbols.len() * code_table.max_code_length().max(1));

    for symbol in symbols {
        let code = code_table
            .get(symbol)
            .ok_or_else(|| HuffmanError::UnknownSymbol {
                symbol: format!("{:?}", symbol),
            })?;
        bits.extend_from_slice(code.bits());
    }

    debug!("Encoded into {} bits", bits.len());
    Ok(bits)
}

/// Walks the tree from the root, emitting a symbol and returning to the root
/// at every leaf. Ending anywhere but the root is a [`HuffmanError::TruncatedCode`].
///
/// When the root is itself a leaf there is nothing to walk: each bit, whatever
/// its value, stands for one occurrence of that symbol.
pub fn decode<S: Symbol>(bits: &[bool], root: &Node<S>) -> Result<Vec<S>> {
    debug!("Starting bitstream decoding of {} bits...", bits.len());
    if let Node::Leaf { symbol, .. } = root {
        return Ok(vec![symbol.clone(); bits.len()]);
    }

    let mut result = Vec::new();
    let mut current = root;
    let mut depth = 0usize;

    for &bit in bits {
        if let Node::Internal { left, right, .. } = current {
            current = if bit { right.as_ref() } else { left.as_ref() };
            depth += 1;
        }
        if let Node::Leaf { symbol, .. } = current {
            trace!("Decoded {:?} from a {}-bit code", symbol, depth);
            result.push(symbol.clone());
            current = root;
            depth = 0;
        }
    }

    if depth != 0 {
        return Err(HuffmanError::TruncatedCode {
            dangling_bits: depth,
        });
    }
    debug!("Final decoded data size: {} symbols.", result.len());
    Ok(result)
}

/// Decodes by greedy left-to-right matching against a code table alone, for
/// callers that only have the persisted table.
///
/// Only exact codes match here. With a one-entry table that means a `1` bit is
/// rejected as [`HuffmanError::InvalidBitstream`], whereas [`decode`] on a
/// lone-leaf tree counts any bit as one occurrence. Both accept what `encode`
/// produces.
pub fn decode_with_table<S: Symbol>(bits: &[bool], table: &ReverseCodeTable<S>) -> Result<Vec<S>> {
    debug!(
        "Decoding {} bits against a table of {} codes",
        bits.len(),
        table.len()
    );
    let max_len = table.max_code_length();
    let mut result = Vec::new();
    let mut start = 0usize;

    for end in 1..=bits.len() {
        let pending = &bits[start..end];
        if let Some(symbol) = table.get(pending) {
            result.push(symbol.clone());
            start = end;
        } else if pending.len() >= max_len {
            return Err(HuffmanError::InvalidBitstream(format!(
                "no code matches the bits at offset {}",
                start
            )));
        }
    }

    if start != bits.len() {
        return Err(HuffmanError::TruncatedCode {
            dangling_bits: bits.len() - start,
        });
    }
    Ok(result)
}

pub fn bits_to_string(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

/// Parses a text bitstream. Surrounding whitespace, such as a trailing newline, is ignored.
pub fn parse_bits(text: &str) -> Result<Vec<bool>> {
    text.trim()
        .char_indices()
        .map(|(i, c)| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(HuffmanError::InvalidBitstream(format!(
                "unexpected character {:?} at position {}",
                other, i
            ))),
        })
        .collect()
}

pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(BIT_COUNT_HEADER + bits.len().div_ceil(8));
    bytes.extend_from_slice(&(bits.len() as u64).to_be_bytes());

    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for &bit in chunk {
            byte = (byte << 1) | u8::from(bit);
        }
        // Padding
        byte <<= 8 - chunk.len();
        bytes.push(byte);
    }
    trace!("Packed {} bits into {} bytes", bits.len(), bytes.len());
    bytes
}

pub fn unpack_bits(bytes: &[u8]) -> Result<Vec<bool>> {
    let Some((header, payload)) = bytes.split_first_chunk::<BIT_COUNT_HEADER>() else {
        return Err(HuffmanError::InvalidBitstream(format!(
            "packed stream is {} bytes, shorter than its {}-byte header",
            bytes.len(),
            BIT_COUNT_HEADER
        )));
    };
    let bit_count = u64::from_be_bytes(*header);
    let expected_len = bit_count.div_ceil(8);
    if payload.len() as u64 != expected_len {
        return Err(HuffmanError::InvalidBitstream(format!(
            "header declares {} bits ({} bytes) but the payload is {} bytes",
            bit_count,
            expected_len,
            payload.len()
        )));
    }

    let mut bits = Vec::with_capacity(bit_count as usize);
    for &byte in payload {
        for i in (0..8).rev() {
            bits.push((byte >> i) & 1 == 1);
        }
    }
    bits.truncate(bit_count as usize);
    trace!("Expanded {} bytes into {} bits.", payload.len(), bits.len());
    Ok(bits)
}
