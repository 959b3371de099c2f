use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;

/// Index of a node in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        symbol: u8,
    },
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl HuffNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }
}

/// A subtree waiting in the merge queue.
///
/// Ordered by weight, then by the order it entered the queue, so equal
/// weights leave in FIFO order and the built tree is the same on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    weight: u64,
    seq: usize,
    node: NodeId,
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Immutable full binary tree over the symbols of one input.
///
/// Nodes live in an arena; children are referenced by `NodeId`. Codes are not
/// stored here, see [`crate::code_table::CodeAssignment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<HuffNode>,
    root: NodeId,
}

impl HuffmanTree {
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        HuffmanTree::build(&FrequencyTable::from_bytes(bytes))
    }

    /// Merge one leaf per present symbol, lightest pair first, until one tree
    /// remains. Returns `None` when no symbol has a nonzero count.
    pub fn build(frequencies: &FrequencyTable) -> Option<Self> {
        let mut nodes = Vec::with_capacity(2 * frequencies.distinct());

        // leaves enter in ascending symbol order
        let leaves: Vec<Pending> = frequencies
            .nonzero()
            .map(|record| {
                let node = push_node(
                    &mut nodes,
                    HuffNode::Leaf {
                        weight: record.count,
                        symbol: record.symbol,
                    },
                );
                Pending {
                    weight: record.count,
                    seq: node.index(),
                    node,
                }
            })
            .collect();
        let mut heap = MinHeap::build(leaves).ok()?;

        while heap.heap_size() > 1 {
            let (Ok(left), Ok(right)) = (heap.extract_min(), heap.extract_min()) else {
                break;
            };
            let weight = left.weight + right.weight;
            let node = push_node(
                &mut nodes,
                HuffNode::Internal {
                    weight,
                    left: left.node,
                    right: right.node,
                },
            );
            debug!(
                "merged {:?} (w={}) + {:?} (w={}) -> {:?} (w={})",
                left.node, left.weight, right.node, right.weight, node, weight
            );
            heap.insert(Pending {
                weight,
                seq: node.index(),
                node,
            });
        }

        let root = heap.extract_min().ok()?.node;
        debug!(
            "built tree: {} nodes, {} leaves, weight {}",
            nodes.len(),
            frequencies.distinct(),
            nodes[root.index()].weight()
        );
        Some(HuffmanTree { nodes, root })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &HuffNode {
        &self.nodes[id.index()]
    }

    pub fn nodes(&self) -> &[HuffNode] {
        &self.nodes
    }

    /// Sum of all leaf frequencies, i.e. the length of the input.
    pub fn weight(&self) -> u64 {
        self.node(self.root).weight()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// True for a one-symbol alphabet, where the root itself is a leaf.
    pub fn is_single_leaf(&self) -> bool {
        self.node(self.root).is_leaf()
    }

    pub fn leaf_frequencies(&self) -> BTreeMap<u8, u64> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                HuffNode::Leaf { weight, symbol } => Some((*symbol, *weight)),
                HuffNode::Internal { .. } => None,
            })
            .collect()
    }

    /// Indented dump of the tree, one node per line.
    pub fn structure(&self) -> String {
        self.to_string()
    }

    fn fmt_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: NodeId,
        depth: usize,
        label: &str,
    ) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self.node(id) {
            HuffNode::Leaf { symbol, weight } => writeln!(
                f,
                "{}{}-> Leaf: {:?} ({}) [weight: {}]",
                indent, label, *symbol as char, symbol, weight
            ),
            HuffNode::Internal {
                weight,
                left,
                right,
            } => {
                writeln!(f, "{}{}-> Internal [weight: {}]", indent, label, weight)?;
                self.fmt_node(f, *left, depth + 1, "L")?;
                self.fmt_node(f, *right, depth + 1, "R")
            }
        }
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Huffman Tree Structure:")?;
        self.fmt_node(f, self.root, 0, "root")
    }
}

fn push_node(nodes: &mut Vec<HuffNode>, node: HuffNode) -> NodeId {
    nodes.push(node);
    NodeId(nodes.len() - 1)
}

#[cfg(test)]
mod test {
    use super::*;

    fn children(tree: &HuffmanTree, id: NodeId) -> (NodeId, NodeId) {
        match tree.node(id) {
            HuffNode::Internal { left, right, .. } => (*left, *right),
            leaf => panic!("expected internal node, got {:?}", leaf),
        }
    }

    fn symbol(tree: &HuffmanTree, id: NodeId) -> u8 {
        match tree.node(id) {
            HuffNode::Leaf { symbol, .. } => *symbol,
            internal => panic!("expected leaf, got {:?}", internal),
        }
    }

    #[test]
    fn test_empty_input_has_no_tree() {
        assert!(HuffmanTree::from_bytes(b"").is_none());
    }

    #[test]
    fn test_single_symbol_is_single_leaf() {
        let tree = HuffmanTree::from_bytes(b"zzzz").unwrap();
        assert!(tree.is_single_leaf());
        assert_eq!(tree.nodes().len(), 1);
        assert_eq!(tree.weight(), 4);
        assert_eq!(symbol(&tree, tree.root()), b'z');
    }

    #[test]
    fn test_merge_order_is_fifo_on_ties() {
        // c(1)+b(2) -> n(3); then a(3) was queued before n(3), so a goes left
        let tree = HuffmanTree::from_bytes(b"aaabbc").unwrap();
        assert_eq!(tree.weight(), 6);
        assert_eq!(tree.leaf_count(), 3);

        let (l, r) = children(&tree, tree.root());
        assert_eq!(symbol(&tree, l), b'a');
        let (rl, rr) = children(&tree, r);
        assert_eq!(symbol(&tree, rl), b'c');
        assert_eq!(symbol(&tree, rr), b'b');
        assert_eq!(tree.node(r).weight(), 3);
    }

    #[test]
    fn test_build_is_deterministic() {
        let input = b"the quick brown fox jumps over the lazy dog";
        assert_eq!(HuffmanTree::from_bytes(input), HuffmanTree::from_bytes(input));
    }

    #[test]
    fn test_leaf_frequencies_match_input() {
        let input = b"mississippi";
        let tree = HuffmanTree::from_bytes(input).unwrap();
        let table = FrequencyTable::from_bytes(input);
        let expected: BTreeMap<u8, u64> = table.nonzero().map(|r| (r.symbol, r.count)).collect();
        assert_eq!(tree.leaf_frequencies(), expected);
    }

    #[test]
    fn test_structure_dump() {
        let tree = HuffmanTree::from_bytes(b"aab").unwrap();
        let dump = tree.structure();
        assert!(dump.starts_with("Huffman Tree Structure:\nroot-> Internal [weight: 3]\n"));
        assert!(dump.contains("  L-> Leaf: 'b' (98) [weight: 1]"));
        assert!(dump.contains("  R-> Leaf: 'a' (97) [weight: 2]"));
        assert_eq!(dump, tree.to_string());
    }

    #[test]
    fn test_structure_keeps_control_bytes_on_one_line() {
        let tree = HuffmanTree::from_bytes(b"\n\na").unwrap();
        let dump = tree.structure();
        assert_eq!(dump.lines().count(), 1 + tree.nodes().len());
        assert!(dump.contains("Leaf: '\\n' (10) [weight: 2]"));
    }
}
