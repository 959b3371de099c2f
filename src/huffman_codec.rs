use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};

use crate::bit_vec::BitVec;
use crate::code_table::{CodeTable, DEGENERATE_BIT};
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::{HuffNode, HuffmanTree, NodeId};

/// What `encode` does with a symbol that has no code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownSymbolPolicy {
    /// Stop and return `HuffmanError::UnknownSymbol`.
    #[default]
    Fail,
    /// Drop the symbol and log a warning.
    SkipWithWarning,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecConfig {
    pub unknown_symbol: UnknownSymbolPolicy,
}

impl CodecConfig {
    pub fn unknown_symbol(mut self, policy: UnknownSymbolPolicy) -> Self {
        self.unknown_symbol = policy;
        self
    }
}

/// Concatenate the code of every symbol, in input order.
pub fn encode(symbols: &[u8], table: &CodeTable, policy: UnknownSymbolPolicy) -> Result<BitVec> {
    let mut bits = BitVec::with_capacity(symbols.len());
    let mut skipped = 0usize;

    for (position, &symbol) in symbols.iter().enumerate() {
        match table.get(symbol) {
            Some(code) => bits.extend_from(code),
            None => match policy {
                UnknownSymbolPolicy::Fail => {
                    return Err(HuffmanError::UnknownSymbol { symbol, position });
                }
                UnknownSymbolPolicy::SkipWithWarning => {
                    warn!("skipping symbol {:#04x} at position {}: no code", symbol, position);
                    skipped += 1;
                }
            },
        }
    }

    debug!(
        "encoded {} symbols into {} bits ({} skipped)",
        symbols.len() - skipped,
        bits.len(),
        skipped
    );
    Ok(bits)
}

/// Where the decoder is within the current code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    AtRoot,
    Descending { node: NodeId, consumed: usize },
}

/// Walk `tree` from the root once per symbol: `0` goes left, `1` goes right,
/// and reaching a leaf emits its symbol. With no tree the output is empty.
pub fn decode(bits: &BitVec, tree: Option<&HuffmanTree>) -> Result<Vec<u8>> {
    let Some(tree) = tree else {
        if !bits.is_empty() {
            warn!("decoding {} bits without a tree, output is empty", bits.len());
        }
        return Ok(Vec::new());
    };

    if tree.is_single_leaf() {
        return decode_single_leaf(bits, tree);
    }

    let mut result = Vec::new();
    let mut state = DecodeState::AtRoot;

    for (position, bit) in bits.iter().enumerate() {
        let (current, consumed) = match state {
            DecodeState::AtRoot => (tree.root(), 0),
            DecodeState::Descending { node, consumed } => (node, consumed),
        };

        let next = match tree.node(current) {
            HuffNode::Internal { left, right, .. } => {
                if bit {
                    *right
                } else {
                    *left
                }
            }
            HuffNode::Leaf { .. } => return Err(HuffmanError::InvalidPath { position }),
        };

        state = match tree.node(next) {
            HuffNode::Leaf { symbol, .. } => {
                result.push(*symbol);
                DecodeState::AtRoot
            }
            HuffNode::Internal { .. } => DecodeState::Descending {
                node: next,
                consumed: consumed + 1,
            },
        };
    }

    match state {
        DecodeState::AtRoot => {
            debug!("decoded {} bits into {} symbols", bits.len(), result.len());
            Ok(result)
        }
        DecodeState::Descending { consumed, .. } => Err(HuffmanError::TruncatedCode {
            consumed,
            decoded: result.len(),
        }),
    }
}

fn decode_single_leaf(bits: &BitVec, tree: &HuffmanTree) -> Result<Vec<u8>> {
    let symbol = match tree.node(tree.root()) {
        HuffNode::Leaf { symbol, .. } => *symbol,
        HuffNode::Internal { .. } => return Err(HuffmanError::InvalidPath { position: 0 }),
    };
    bits.iter()
        .enumerate()
        .map(|(position, bit)| {
            if bit == DEGENERATE_BIT {
                Ok(symbol)
            } else {
                Err(HuffmanError::InvalidPath { position })
            }
        })
        .collect()
}

/// A tree and its code table, built from one input.
#[derive(Debug, Clone)]
pub struct HuffmanCodec {
    frequencies: FrequencyTable,
    tree: Option<HuffmanTree>,
    table: CodeTable,
    config: CodecConfig,
}

impl HuffmanCodec {
    pub fn new(frequencies: FrequencyTable) -> Self {
        let tree = HuffmanTree::build(&frequencies);
        let table = tree.as_ref().map(CodeTable::from_tree).unwrap_or_default();
        HuffmanCodec {
            frequencies,
            tree,
            table,
            config: CodecConfig::default(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(FrequencyTable::from_bytes(bytes))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self::new(FrequencyTable::from_reader(reader)?))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        debug!("building codec from {}", path.display());
        Self::from_reader(file)
    }

    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    /// `None` when the input had no symbols.
    pub fn tree(&self) -> Option<&HuffmanTree> {
        self.tree.as_ref()
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.table
    }

    pub fn encode(&self, data: &[u8]) -> Result<BitVec> {
        encode(data, &self.table, self.config.unknown_symbol)
    }

    pub fn decode(&self, bits: &BitVec) -> Result<Vec<u8>> {
        decode(bits, self.tree.as_ref())
    }

    /// Decode the '0'/'1' text form.
    pub fn decode_str(&self, bits: &str) -> Result<Vec<u8>> {
        self.decode(&bits.parse()?)
    }
}
