//! The single error type for the crate.
//!
//! Every failing operation reports a `HuffmanError` to its immediate caller.
//! None of these are transient; a caller decides whether to abort, warn, or
//! substitute a default.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuffmanError {
    #[error("failed to read input source: {0}")]
    SourceRead(#[from] io::Error),

    #[error("symbol {symbol:#04x} at position {position} has no code in the table")]
    UnknownSymbol { symbol: u8, position: usize },

    #[error("bit string ended {consumed} bits into a code ({decoded} symbols decoded)")]
    TruncatedCode { consumed: usize, decoded: usize },

    #[error("bit at position {position} does not lead to any symbol")]
    InvalidPath { position: usize },

    #[error("invalid character {found:?} at position {position}, expected '0' or '1'")]
    InvalidBit { position: usize, found: char },
}

pub type Result<T> = std::result::Result<T, HuffmanError>;
