//! The huffman module turns symbol statistics into a prefix code and back.
//!
//! - huffman: builds the tree from a frequency table by repeatedly merging the two lightest
//!   nodes. Nodes live in an arena owned by the tree and refer to their children by handle.
//! - code_book: walks a finished tree and records the bit path to every leaf.
//! - tree_serial: writes the tree shape and leaf symbols as a pre-order byte description,
//!   and rebuilds a tree from one.
//!
//! Trees hold at most 256 leaves, one per byte value, so every traversal here is bounded to
//! a depth of 255. All of them still use explicit stacks rather than recursion.
//!

pub mod code_book;
pub mod huffman;
pub mod tree_serial;
