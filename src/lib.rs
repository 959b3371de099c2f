//! # huffcode
//!
//! Huffman prefix codes for byte alphabets, with encode/decode to a
//! '0'/'1' bit string.
//!
//! ## Quick Start
//!
//! ```rust
//! use huffcode::HuffmanCodec;
//!
//! let codec = HuffmanCodec::from_bytes(b"aaabbc");
//! let bits = codec.encode(b"aaabbc")?;
//! assert_eq!(bits.len(), 9);
//! assert_eq!(codec.decode(&bits)?, b"aaabbc");
//!
//! print!("{}", codec.code_table().listing());
//! # Ok::<(), huffcode::HuffmanError>(())
//! ```

pub mod bit_vec;
pub mod code_table;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;

// Internal modules - not part of public API
mod min_heap;

// Re-export main types for convenience
pub use bit_vec::BitVec;
pub use code_table::{CodeAssignment, CodeTable};
pub use error::HuffmanError;
pub use frequency::{FrequencyRecord, FrequencyTable};
pub use huffman_codec::{decode, encode, CodecConfig, DecodeState, HuffmanCodec, UnknownSymbolPolicy};
pub use hufftree::{HuffNode, HuffmanTree, NodeId};
