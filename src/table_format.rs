//! Line-oriented persisted code table.
//!
//! Each line is `FIELD:CODE`. A code is only ever `0`s and `1`s, so a record is
//! split at its last `:` and a `:` symbol needs no escaping. How a symbol is
//! written as `FIELD` is up to its [`TableSymbol`] impl: characters are written
//! as themselves with `\`, newline and carriage return escaped, bytes as two
//! lowercase hex digits. There is no header; blank lines are skipped on read.

use std::collections::{HashMap, HashSet};
use std::io::{BufRead, ErrorKind, Write};

use log::debug;

use crate::code_table::{Code, CodeTable, ReverseCodeTable};
use crate::error::{HuffmanError, Result};
use crate::frequency::Symbol;

const DELIMITER: char = ':';

/// A symbol that can be written into and read back from a table record.
pub trait TableSymbol: Symbol {
    fn write_field(&self, out: &mut String);

    fn parse_field(field: &str) -> std::result::Result<Self, String>;
}

impl TableSymbol for char {
    fn write_field(&self, out: &mut String) {
        match self {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(*c),
        }
    }

    fn parse_field(field: &str) -> std::result::Result<Self, String> {
        let mut chars = field.chars();
        let symbol = match chars.next() {
            None => return Err("empty symbol".to_string()),
            Some('\\') => match chars.next() {
                Some('\\') => '\\',
                Some('n') => '\n',
                Some('r') => '\r',
                Some(other) => return Err(format!("unknown escape \\{}", other)),
                None => return Err("dangling escape".to_string()),
            },
            Some(c) => c,
        };
        match chars.next() {
            None => Ok(symbol),
            Some(_) => Err(format!("expected a single character, got {:?}", field)),
        }
    }
}

impl TableSymbol for u8 {
    fn write_field(&self, out: &mut String) {
        out.push_str(&format!("{:02x}", self));
    }

    fn parse_field(field: &str) -> std::result::Result<Self, String> {
        if field.len() != 2 || !field.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("expected two hex digits, got {:?}", field));
        }
        u8::from_str_radix(field, 16).map_err(|e| format!("invalid hex byte {:?}: {}", field, e))
    }
}

/// Renders the table, one record per line, sorted by code.
pub fn serialize_table<S: TableSymbol>(table: &CodeTable<S>) -> String {
    let mut out = String::new();
    for (symbol, code) in table.sorted_by_code() {
        symbol.write_field(&mut out);
        out.push(DELIMITER);
        out.push_str(&code.to_string());
        out.push('\n');
    }
    out
}

pub fn write_table<S: TableSymbol, W: Write>(table: &CodeTable<S>, mut sink: W) -> Result<()> {
    sink.write_all(serialize_table(table).as_bytes())?;
    sink.flush()?;
    debug!("Wrote code table with {} entries", table.len());
    Ok(())
}

pub fn deserialize_table<S: TableSymbol>(text: &str) -> Result<ReverseCodeTable<S>> {
    read_table(text.as_bytes())
}

/// Parses records until the source is exhausted. Duplicate symbols or codes are rejected.
pub fn read_table<S: TableSymbol, R: BufRead>(source: R) -> Result<ReverseCodeTable<S>> {
    let mut symbols = HashMap::new();
    let mut seen = HashSet::new();

    for (index, line) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| match e.kind() {
            ErrorKind::InvalidData => {
                HuffmanError::malformed(line_no, "record is not valid UTF-8")
            }
            _ => HuffmanError::Io(e),
        })?;
        if line.is_empty() {
            continue;
        }

        let (field, code) = line
            .rsplit_once(DELIMITER)
            .ok_or_else(|| HuffmanError::malformed(line_no, "missing ':' delimiter"))?;
        if code.is_empty() {
            return Err(HuffmanError::malformed(line_no, "empty code"));
        }
        let code: Code = code.parse().map_err(|_| {
            HuffmanError::malformed(line_no, format!("code {:?} is not binary", code))
        })?;
        let symbol =
            S::parse_field(field).map_err(|reason| HuffmanError::malformed(line_no, reason))?;

        if !seen.insert(symbol.clone()) {
            return Err(HuffmanError::malformed(
                line_no,
                format!("duplicate symbol {:?}", symbol),
            ));
        }
        if symbols.contains_key(&code) {
            return Err(HuffmanError::malformed(
                line_no,
                format!("duplicate code {}", code),
            ));
        }
        symbols.insert(code, symbol);
    }

    debug!("Read code table with {} entries", symbols.len());
    Ok(ReverseCodeTable::from_map(symbols))
}
