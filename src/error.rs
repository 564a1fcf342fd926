//! Error type shared by every stage of the codec.
//!
//! All parsing and traversal failures are reported through [`HuffError`]. Nothing in the
//! codec panics on bad input, and nothing returns partially decoded data.

use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HuffError {
    /// Zero-length input handed to the compressor.
    #[error("input is empty, nothing to compress")]
    EmptyInput,

    /// Malformed or truncated container, tree description or payload.
    #[error("corrupt stream: {0}")]
    CorruptStream(String),

    /// A caller-provided output buffer is too small for the result.
    #[error("output needs {needed} bytes but the buffer holds only {capacity}")]
    Capacity { needed: usize, capacity: usize },

    /// Tree construction was asked to work on fewer than two distinct symbols.
    #[error("a huffman tree needs at least two distinct symbols")]
    SingleSymbol,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HuffError>;

/// Build a `CorruptStream` error. The caller reports it; only a debug trace is left here.
pub(crate) fn corrupt(reason: impl Into<String>) -> HuffError {
    let reason = reason.into();
    debug!("Rejecting stream: {}", reason);
    HuffError::CorruptStream(reason)
}
