//! Canonical Huffman compression of byte buffers.
//!
//! Version 0.1.0
//!
//! A compressed buffer is self-describing: it carries the code tree in front of the packed
//! payload, so nothing but the compressed bytes is needed to get the original back.
//! Input made of a single repeated byte is stored as a (symbol, count) record.
//!
//! Both directions are pure functions of their input. The tree built for a given input is
//! always the same, so compressing the same bytes twice gives the same output.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> huffpack -z test.txt`
//!
//! This will compress the file and create the file test.txt.hpk.
//! The original file will be deleted unless `-k` is given.
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::{compress, compress_into, encode};
pub use compression::container::Container;
pub use compression::decompress::{decode, decompress, decompress_into};
pub use error::{HuffError, Result};
pub use huffman_coding::code_book::{Code, CodeBook};
pub use huffman_coding::huffman::HuffmanTree;
pub use tools::freq_count::FrequencyTable;
