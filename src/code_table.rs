use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use crate::bit_vec::BitVec;
use crate::frequency::{symbol_label, FrequencyTable};
use crate::hufftree::{HuffNode, HuffmanTree, NodeId};

/// Bit given to the only leaf of a one-symbol tree. An empty code could not be
/// told apart from "no bits consumed" while decoding.
pub const DEGENERATE_BIT: bool = false;

/// Root-to-node path of every node in a tree: left appends `0`, right `1`.
///
/// Computed purely from the tree's shape, so running it twice on the same tree
/// gives the same codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAssignment {
    codes: Vec<BitVec>,
}

impl CodeAssignment {
    pub fn assign(tree: &HuffmanTree) -> Self {
        let mut codes = vec![BitVec::new(); tree.nodes().len()];

        if tree.is_single_leaf() {
            codes[tree.root().index()].push_bit(DEGENERATE_BIT);
            return CodeAssignment { codes };
        }

        let mut stack = vec![tree.root()];
        while let Some(id) = stack.pop() {
            if let HuffNode::Internal { left, right, .. } = tree.node(id) {
                let parent = &codes[id.index()];
                let left_code = parent.with_bit(false);
                let right_code = parent.with_bit(true);
                codes[left.index()] = left_code;
                codes[right.index()] = right_code;
                stack.push(*right);
                stack.push(*left);
            }
        }

        CodeAssignment { codes }
    }

    pub fn code(&self, id: NodeId) -> &BitVec {
        &self.codes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Symbol to code mapping for the leaves of one tree. Never mutated once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, BitVec>,
}

impl CodeTable {
    /// The table for "no tree": every lookup misses.
    pub fn empty() -> Self {
        CodeTable::default()
    }

    pub fn from_tree(tree: &HuffmanTree) -> Self {
        CodeTable::from_assignment(tree, &CodeAssignment::assign(tree))
    }

    /// Record each leaf's code. Internal nodes contribute nothing.
    pub fn from_assignment(tree: &HuffmanTree, assignment: &CodeAssignment) -> Self {
        let codes: BTreeMap<u8, BitVec> = tree
            .nodes()
            .iter()
            .enumerate()
            .filter_map(|(index, node)| match node {
                HuffNode::Leaf { symbol, .. } => Some((*symbol, index)),
                HuffNode::Internal { .. } => None,
            })
            .map(|(symbol, index)| (symbol, assignment.codes[index].clone()))
            .collect();
        debug!("code table built with {} entries", codes.len());
        CodeTable { codes }
    }

    pub fn get(&self, symbol: u8) -> Option<&BitVec> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitVec)> {
        self.codes.iter().map(|(symbol, code)| (*symbol, code))
    }

    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&BitVec> = self.codes.values().collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes[i + 1..]
                .iter()
                .all(|b| !a.starts_with(b) && !b.starts_with(a))
        })
    }

    /// Number of bits the given input will encode to, if every present symbol
    /// has a code.
    pub fn encoded_len(&self, frequencies: &FrequencyTable) -> Option<u64> {
        frequencies.nonzero().try_fold(0u64, |acc, record| {
            let code = self.get(record.symbol)?;
            Some(acc + record.count * code.len() as u64)
        })
    }

    /// One "symbol code" line per entry, ascending by symbol.
    pub fn listing(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, code) in self.iter() {
            writeln!(f, "{} {}", symbol_label(symbol), code)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn table_for(input: &[u8]) -> CodeTable {
        CodeTable::from_tree(&HuffmanTree::from_bytes(input).unwrap())
    }

    #[test]
    fn test_codes_follow_tree_paths() {
        let table = table_for(b"aaabbc");
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(b'a').unwrap().to_string(), "0");
        assert_eq!(table.get(b'c').unwrap().to_string(), "10");
        assert_eq!(table.get(b'b').unwrap().to_string(), "11");
        assert!(table.get(b'd').is_none());
        assert_eq!(table.listing(), "a 0\nb 11\nc 10\n");
    }

    #[test]
    fn test_every_node_gets_parent_code_plus_bit() {
        let tree = HuffmanTree::from_bytes(b"abracadabra alakazam").unwrap();
        let assignment = CodeAssignment::assign(&tree);
        assert_eq!(assignment.len(), tree.nodes().len());
        assert!(assignment.code(tree.root()).is_empty());

        for (index, node) in tree.nodes().iter().enumerate() {
            if let HuffNode::Internal { left, right, .. } = node {
                let parent = &assignment.codes[index];
                assert_eq!(assignment.code(*left), &parent.with_bit(false));
                assert_eq!(assignment.code(*right), &parent.with_bit(true));
            }
        }
    }

    #[test]
    fn test_assignment_is_idempotent() {
        let tree = HuffmanTree::from_bytes(b"she sells sea shells").unwrap();
        assert_eq!(CodeAssignment::assign(&tree), CodeAssignment::assign(&tree));
    }

    #[test]
    fn test_single_symbol_gets_placeholder_code() {
        let table = table_for(b"qqqqq");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(b'q').unwrap().to_string(), "0");
        assert_eq!(table.listing(), "q 0\n");
    }

    #[test]
    fn test_prefix_free_and_encoded_len() {
        let input = b"aaabbc";
        let table = table_for(input);
        assert!(table.is_prefix_free());
        assert_eq!(table.encoded_len(&FrequencyTable::from_bytes(input)), Some(9));
        assert_eq!(table.encoded_len(&FrequencyTable::from_bytes(b"xyz")), None);

        let mut codes = BTreeMap::<u8, BitVec>::new();
        codes.insert(b'a', "1".parse().unwrap());
        codes.insert(b'b', "10".parse().unwrap());
        assert!(!CodeTable { codes }.is_prefix_free());
    }

    #[test]
    fn test_listing_keeps_one_line_per_symbol() {
        let table = table_for(b"a\na\n ");
        let listing = table.listing();
        assert_eq!(listing, "\\n 11\n\\x20 10\na 0\n");
        assert_eq!(listing.lines().count(), table.len());
    }

    #[test]
    fn test_empty_table() {
        let table = CodeTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.listing(), "");
        assert!(table.is_prefix_free());
    }
}
