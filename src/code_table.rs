use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::{debug, trace};

use crate::error::HuffmanError;
use crate::frequency::Symbol;
use crate::huffman::Node;

/// Root-to-leaf path of a symbol: `false` is a step left, `true` a step right.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn new(bits: Vec<bool>) -> Self {
        Code(bits)
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `self` is a proper prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len() < other.len() && other.0.starts_with(&self.0)
    }

    /// A copy of this code extended by one bit.
    fn with(&self, bit: bool) -> Code {
        let mut bits = Vec::with_capacity(self.len() + 1);
        bits.extend_from_slice(&self.0);
        bits.push(bit);
        Code(bits)
    }
}

// Lets lookups key on a bit slice without building a `Code`.
impl Borrow<[bool]> for Code {
    fn borrow(&self) -> &[bool] {
        &self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = HuffmanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(HuffmanError::InvalidBitstream(format!(
                    "unexpected character {:?} in code",
                    other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Code)
    }
}

/// Symbol to code mapping used for encoding. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable<S: Symbol> {
    codes: HashMap<S, Code>,
}

impl<S: Symbol> CodeTable<S> {
    pub fn get(&self, symbol: &S) -> Option<&Code> {
        self.codes.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &Code)> {
        self.codes.iter()
    }

    pub fn max_code_length(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// Entries ordered by code, for reproducible output.
    pub fn sorted_by_code(&self) -> Vec<(&S, &Code)> {
        let mut entries: Vec<_> = self.codes.iter().collect();
        entries.sort_by(|a, b| a.1.cmp(b.1));
        entries
    }

    pub fn reverse(&self) -> ReverseCodeTable<S> {
        ReverseCodeTable {
            symbols: self
                .codes
                .iter()
                .map(|(s, c)| (c.clone(), s.clone()))
                .collect(),
        }
    }
}

/// Code to symbol mapping, as recovered from a persisted table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseCodeTable<S: Symbol> {
    symbols: HashMap<Code, S>,
}

impl<S: Symbol> ReverseCodeTable<S> {
    /// Caller guarantees codes and symbols are both unique.
    pub(crate) fn from_map(symbols: HashMap<Code, S>) -> Self {
        ReverseCodeTable { symbols }
    }

    pub fn get(&self, code: &[bool]) -> Option<&S> {
        self.symbols.get(code)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Code, &S)> {
        self.symbols.iter()
    }

    pub fn max_code_length(&self) -> usize {
        self.symbols.keys().map(Code::len).max().unwrap_or(0)
    }

    /// Forward table, for encoding with a table that was loaded rather than built.
    pub fn code_table(&self) -> CodeTable<S> {
        CodeTable {
            codes: self
                .symbols
                .iter()
                .map(|(c, s)| (s.clone(), c.clone()))
                .collect(),
        }
    }
}

/// Assigns every leaf its root-to-leaf path as its code.
///
/// A tree that is a single leaf has no path at all; that leaf gets the code `0`
/// so it still produces one bit per occurrence.
pub fn build_code_table<S: Symbol>(root: &Node<S>) -> (CodeTable<S>, ReverseCodeTable<S>) {
    let mut codes = HashMap::new();
    match root {
        Node::Leaf { symbol, .. } => {
            codes.insert(symbol.clone(), Code(vec![false]));
        }
        Node::Internal { .. } => assign_codes(root, Code::default(), &mut codes),
    }
    let table = CodeTable { codes };
    debug!(
        "Code table built: {} entries, longest code {} bits",
        table.len(),
        table.max_code_length()
    );
    let reverse = table.reverse();
    (table, reverse)
}

fn assign_codes<S: Symbol>(node: &Node<S>, prefix: Code, codes: &mut HashMap<S, Code>) {
    match node {
        Node::Leaf { symbol, .. } => {
            trace!("Assigning code to {:?} : '{}'", symbol, prefix);
            codes.insert(symbol.clone(), prefix);
        }
        Node::Internal { left, right, .. } => {
            assign_codes(left, prefix.with(false), codes);
            assign_codes(right, prefix.with(true), codes);
        }
    }
}
