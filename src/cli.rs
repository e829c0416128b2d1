//! Pieces shared by the `encode` and `decode` binaries.

// Each binary uses only part of this module.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::debug;

use huffman_coding::{TableSymbol, bits_to_string, pack_bits, parse_bits, unpack_bits};

/// How raw file contents are split into symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SymbolKind {
    /// Every byte is a symbol.
    Bytes,
    /// Every UTF-8 character is a symbol.
    Chars,
}

/// Conversion between file contents and a symbol sequence.
pub trait FileSymbol: TableSymbol {
    fn from_raw(raw: Vec<u8>) -> Result<Vec<Self>>;

    fn to_raw(symbols: Vec<Self>) -> Vec<u8>;
}

impl FileSymbol for u8 {
    fn from_raw(raw: Vec<u8>) -> Result<Vec<Self>> {
        Ok(raw)
    }

    fn to_raw(symbols: Vec<Self>) -> Vec<u8> {
        symbols
    }
}

impl FileSymbol for char {
    fn from_raw(raw: Vec<u8>) -> Result<Vec<Self>> {
        let text = String::from_utf8(raw).context("input is not valid UTF-8")?;
        Ok(text.chars().collect())
    }

    fn to_raw(symbols: Vec<Self>) -> Vec<u8> {
        symbols.into_iter().collect::<String>().into_bytes()
    }
}

pub fn write_bitstream(path: &Path, bits: &[bool], text: bool) -> Result<u64> {
    let bytes = if text {
        bits_to_string(bits).into_bytes()
    } else {
        pack_bits(bits)
    };
    fs::write(path, &bytes).with_context(|| format!("cannot write {}", path.display()))?;
    debug!("Wrote {} bytes of bitstream to {}", bytes.len(), path.display());
    Ok(bytes.len() as u64)
}

pub fn read_bitstream(path: &Path, text: bool) -> Result<Vec<bool>> {
    let content = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    debug!("Total file size: {} bytes", content.len());

    let bits = if text {
        let content = String::from_utf8(content).context("text bitstream is not UTF-8")?;
        parse_bits(&content)?
    } else {
        unpack_bits(&content)?
    };
    Ok(bits)
}
