use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, trace};

use crate::code_table::ReverseCodeTable;
use crate::error::{HuffmanError, Result};
use crate::frequency::{FrequencyTable, Symbol};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Node<S> {
    Leaf {
        symbol: S,
        freq: u64,
    },
    Internal {
        freq: u64,
        left: Box<Node<S>>,
        right: Box<Node<S>>,
    },
}

impl<S> Node<S> {
    pub fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } => *freq,
            Node::Internal { freq, .. } => *freq,
        }
    }

    pub fn symbol(&self) -> Option<&S> {
        match self {
            Node::Leaf { symbol, .. } => Some(symbol),
            Node::Internal { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Leaves in left-to-right order, paired with their depth.
    pub fn leaves(&self) -> Vec<(&S, u64, usize)> {
        let mut out = Vec::new();
        self.collect_leaves(0, &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, depth: usize, out: &mut Vec<(&'a S, u64, usize)>) {
        match self {
            Node::Leaf { symbol, freq } => out.push((symbol, *freq, depth)),
            Node::Internal { left, right, .. } => {
                left.collect_leaves(depth + 1, out);
                right.collect_leaves(depth + 1, out);
            }
        }
    }
}

impl<S: PartialEq> Node<S> {
    /// Depth of the leaf holding `symbol`, or `None` if the tree lacks it.
    pub fn depth_of(&self, symbol: &S) -> Option<usize> {
        match self {
            Node::Leaf { symbol: s, .. } => (s == symbol).then_some(0),
            Node::Internal { left, right, .. } => left
                .depth_of(symbol)
                .or_else(|| right.depth_of(symbol))
                .map(|d| d + 1),
        }
    }
}

pub type HuffmanTree<S> = Node<S>;

/// Heap entry. `seq` is unique per entry: leaves are numbered in
/// `FrequencyTable::sorted_entries` order, merged nodes take the next number.
struct HeapNode<S> {
    freq: u64,
    seq: u64,
    node: Box<Node<S>>,
}

impl<S> Ord for HeapNode<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we pop lowest (freq, seq) first.
        other
            .freq
            .cmp(&self.freq)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<S> PartialOrd for HeapNode<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> PartialEq for HeapNode<S> {
    fn eq(&self, other: &Self) -> bool {
        self.freq == other.freq && self.seq == other.seq
    }
}

impl<S> Eq for HeapNode<S> {}

/// Greedy Huffman merge. The first node popped becomes the left child.
///
/// Equal frequencies are resolved by sequence number, so a given table always
/// produces the same tree. A table with one symbol yields that leaf as root.
pub fn build_huffman_tree<S: Symbol>(frequencies: &FrequencyTable<S>) -> Result<HuffmanTree<S>> {
    debug!(
        "Building Huffman Tree from {} unique symbols",
        frequencies.len()
    );
    if frequencies.is_empty() {
        return Err(HuffmanError::EmptyInput);
    }

    let mut heap = BinaryHeap::with_capacity(frequencies.len());
    let mut seq = 0u64;
    for (symbol, freq) in frequencies.sorted_entries() {
        heap.push(HeapNode {
            freq,
            seq,
            node: Box::new(Node::Leaf {
                symbol: symbol.clone(),
                freq,
            }),
        });
        seq += 1;
    }
    debug!("Initial heap size: {}", heap.len());

    while heap.len() > 1 {
        let (Some(left), Some(right)) = (heap.pop(), heap.pop()) else {
            break;
        };

        let freq = left.freq + right.freq;
        trace!(
            "Merging nodes #{} ({}) and #{} ({}) into #{}",
            left.seq, left.freq, right.seq, right.freq, seq
        );
        heap.push(HeapNode {
            freq,
            seq,
            node: Box::new(Node::Internal {
                freq,
                left: left.node,
                right: right.node,
            }),
        });
        seq += 1;
    }

    let root = heap.pop().ok_or(HuffmanError::EmptyInput)?;
    debug!("Tree construction complete, root weight {}", root.freq);
    Ok(*root.node)
}

/// Partially rebuilt tree while codes are being inserted.
enum Slot<S> {
    Empty,
    Leaf(S),
    Branch(Box<Slot<S>>, Box<Slot<S>>),
}

impl<S: Symbol> Slot<S> {
    fn insert(&mut self, bits: &[bool], symbol: S) -> Result<()> {
        let Some((&bit, rest)) = bits.split_first() else {
            return match self {
                Slot::Empty => {
                    *self = Slot::Leaf(symbol);
                    Ok(())
                }
                Slot::Leaf(_) => Err(HuffmanError::malformed(0, "duplicate code")),
                Slot::Branch(..) => Err(HuffmanError::malformed(
                    0,
                    format!("code of {:?} is a prefix of another code", symbol),
                )),
            };
        };

        match self {
            Slot::Empty => {
                let (mut left, mut right) = (Slot::Empty, Slot::Empty);
                if bit {
                    right.insert(rest, symbol)?;
                } else {
                    left.insert(rest, symbol)?;
                }
                *self = Slot::Branch(Box::new(left), Box::new(right));
                Ok(())
            }
            Slot::Branch(left, right) => {
                let child = if bit { right } else { left };
                child.insert(rest, symbol)
            }
            Slot::Leaf(other) => Err(HuffmanError::malformed(
                0,
                format!("code of {:?} is a prefix of another code", other),
            )),
        }
    }

    fn into_node(self) -> Result<Node<S>> {
        match self {
            Slot::Empty => Err(HuffmanError::malformed(
                0,
                "codes do not form a complete prefix tree",
            )),
            Slot::Leaf(symbol) => Ok(Node::Leaf { symbol, freq: 0 }),
            Slot::Branch(left, right) => Ok(Node::Internal {
                freq: 0,
                left: Box::new(left.into_node()?),
                right: Box::new(right.into_node()?),
            }),
        }
    }
}

impl<S: Symbol> Node<S> {
    /// Rebuilds a decode tree from a persisted code table.
    ///
    /// The table carries no counts, so every node of the result has frequency 0.
    /// A table with a single entry must hold the code `0` and becomes a lone leaf.
    pub fn from_codes(table: &ReverseCodeTable<S>) -> Result<Node<S>> {
        if table.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }
        if table.len() == 1 {
            return match table.get(&[false]) {
                Some(symbol) => Ok(Node::Leaf {
                    symbol: symbol.clone(),
                    freq: 0,
                }),
                None => Err(HuffmanError::malformed(
                    0,
                    "a single-symbol table must use the code 0",
                )),
            };
        }

        let mut root = Slot::Empty;
        for (code, symbol) in table.iter() {
            if code.is_empty() {
                return Err(HuffmanError::malformed(0, "empty code"));
            }
            root.insert(code.bits(), symbol.clone())?;
        }
        let tree = root.into_node()?;
        debug!("Rebuilt decode tree with {} leaves", tree.leaf_count());
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_table::build_code_table;

    fn tree_for(text: &str) -> Node<char> {
        let freq: FrequencyTable<char> = text.chars().collect();
        build_huffman_tree(&freq).unwrap()
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let freq = FrequencyTable::<u8>::new();
        assert!(matches!(
            build_huffman_tree(&freq),
            Err(HuffmanError::EmptyInput)
        ));
    }

    #[test]
    fn test_single_symbol_is_leaf_root() {
        let tree = tree_for("aaaa");
        assert_eq!(tree, Node::Leaf { symbol: 'a', freq: 4 });
    }

    #[test]
    fn test_root_weight_is_input_length() {
        let text = "abracadabra";
        let tree = tree_for(text);
        assert_eq!(tree.freq(), text.len() as u64);
        assert_eq!(tree.leaf_count(), 5);
        let leaf_sum: u64 = tree.leaves().iter().map(|(_, f, _)| f).sum();
        assert_eq!(leaf_sum, text.len() as u64);
    }

    #[test]
    fn test_abracadabra_shape() {
        let tree = tree_for("abracadabra");

        assert_eq!(tree.depth_of(&'a'), Some(1));
        let deepest = tree.leaves().iter().map(|(_, _, d)| *d).max().unwrap();
        assert_eq!(tree.depth_of(&'c'), Some(deepest));
        assert_eq!(tree.depth_of(&'d'), Some(deepest));
        assert_eq!(tree.depth_of(&'z'), None);
    }

    #[test]
    fn test_deterministic() {
        let text = "mississippi river banks";
        assert_eq!(tree_for(text), tree_for(text));
    }

    #[test]
    fn test_first_popped_is_left() {
        // a:1 and b:1 tie; 'a' sorts first, so it is popped first.
        let tree = tree_for("ab");
        match tree {
            Node::Internal { left, right, freq } => {
                assert_eq!(freq, 2);
                assert_eq!(left.symbol(), Some(&'a'));
                assert_eq!(right.symbol(), Some(&'b'));
            }
            Node::Leaf { .. } => panic!("expected an internal root"),
        }
    }

    #[test]
    fn test_from_codes_rebuilds_shape() {
        let tree = tree_for("abracadabra");
        let (_, reverse) = build_code_table(&tree);
        let rebuilt = Node::from_codes(&reverse).unwrap();

        for symbol in "abrcd".chars() {
            assert_eq!(rebuilt.depth_of(&symbol), tree.depth_of(&symbol));
        }
        assert_eq!(rebuilt.freq(), 0);
    }

    #[test]
    fn test_from_codes_single_entry() {
        let tree = tree_for("zzz");
        let (_, reverse) = build_code_table(&tree);
        let rebuilt = Node::from_codes(&reverse).unwrap();
        assert_eq!(rebuilt.symbol(), Some(&'z'));
    }
}
