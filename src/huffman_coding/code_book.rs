//! Derives the bit code of every leaf from a built tree.
//!
//! A tree holds at most 256 leaves, so no code is longer than 255 bits. Codes are kept in a
//! fixed 256-bit buffer, most significant bit first, which keeps them `Copy` and lets the
//! traversal extend a code without allocating.

use std::fmt::{Display, Formatter};

use log::debug;

use super::huffman::{HuffmanTree, Node, NodeId};
use crate::tools::freq_count::FrequencyTable;

/// Room for the longest code a 256-leaf tree can produce.
pub const MAX_CODE_BITS: usize = 256;

/// Path from the root to a leaf: 0 = left, 1 = right.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Code {
    words: [u64; 4],
    len: u16,
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit `i`, counting from the root.
    pub fn bit(&self, i: usize) -> bool {
        debug_assert!(i < self.len());
        (self.words[i / 64] >> (63 - i % 64)) & 1 == 1
    }

    /// A copy of this code extended by one bit.
    pub fn with_bit(&self, bit: bool) -> Code {
        debug_assert!(self.len() < MAX_CODE_BITS);
        let mut next = *self;
        let i = self.len();
        if bit {
            next.words[i / 64] |= 1 << (63 - i % 64);
        }
        next.len += 1;
        next
    }

    /// True when every bit of `self` starts `other`. A code is a prefix of itself.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && (0..self.len()).all(|i| self.bit(i) == other.bit(i))
    }

    /// The code in runs of up to 32 bits, each run right-aligned in a u32 with its length.
    pub fn chunks(&self) -> impl Iterator<Item = (u32, u8)> + '_ {
        (0..self.len()).step_by(32).map(move |start| {
            let n = (self.len() - start).min(32);
            let word = self.words[start / 64];
            let half = if start % 64 == 0 {
                (word >> 32) as u32
            } else {
                word as u32
            };
            (half >> (32 - n), n as u8)
        })
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.len() {
            write!(f, "{}", if self.bit(i) { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Symbol to code lookup, derived once per tree and read-only after.
///
/// Every slot holds a code. Symbols without a leaf keep the empty code, which no leaf of a
/// two-or-more leaf tree can have.
#[derive(Clone, Debug)]
pub struct CodeBook {
    codes: [Code; 256],
}

impl CodeBook {
    /// Walk the tree with an explicit stack and record the path to each leaf.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = [Code::new(); 256];
        let mut stack: Vec<(NodeId, Code)> = vec![(tree.root(), Code::new())];
        while let Some((id, code)) = stack.pop() {
            match tree.node(id) {
                Node::Leaf { symbol, .. } => codes[*symbol as usize] = code,
                Node::Internal { left, right, .. } => {
                    stack.push((*right, code.with_bit(true)));
                    stack.push((*left, code.with_bit(false)));
                }
            }
        }
        let book = Self { codes };
        debug!("Code book holds {} codes", book.len());
        book
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        Some(self.code(symbol)).filter(|code| !code.is_empty())
    }

    /// Code of `symbol`, empty when the tree has no leaf for it.
    pub fn code(&self, symbol: u8) -> &Code {
        &self.codes[symbol as usize]
    }

    /// Codes in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter(|(_, code)| !code.is_empty())
            .map(|(symbol, code)| (symbol as u8, code))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of payload bits the counted input will encode to.
    pub fn encoded_bits(&self, freqs: &FrequencyTable) -> u64 {
        freqs
            .symbols()
            .map(|(symbol, count)| count * self.code(symbol).len() as u64)
            .sum()
    }

    /// No code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let codes = self.iter().collect::<Vec<_>>();
        codes.iter().all(|(a, code_a)| {
            codes
                .iter()
                .all(|(b, code_b)| a == b || !code_a.is_prefix_of(code_b))
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn code_of(book: &CodeBook, symbol: u8) -> String {
        book.get(symbol).unwrap().to_string()
    }

    #[test]
    fn aaaabbbcc_codes_test() {
        let tree = HuffmanTree::from_bytes(b"aaaabbbcc").unwrap();
        let book = CodeBook::from_tree(&tree);
        assert_eq!(code_of(&book, b'a'), "0");
        assert_eq!(code_of(&book, b'c'), "10");
        assert_eq!(code_of(&book, b'b'), "11");
        assert!(book.get(b'd').is_none());
        assert!(book.code(b'd').is_empty());
        assert_eq!(book.len(), 3);
        assert!(book.is_prefix_free());
    }

    #[test]
    fn encoded_bits_test() {
        let freqs = FrequencyTable::from_bytes(b"aaaabbbcc").unwrap();
        let tree = HuffmanTree::from_frequencies(&freqs).unwrap();
        let book = CodeBook::from_tree(&tree);
        // 4*1 + 3*2 + 2*2
        assert_eq!(book.encoded_bits(&freqs), 14);
    }

    #[test]
    fn prefix_free_text_test() {
        let text = "It was the best of times, it was the worst of times, it was the age of wisdom";
        let book = CodeBook::from_tree(&HuffmanTree::from_bytes(text.as_bytes()).unwrap());
        assert!(book.is_prefix_free());
        for (symbol, code) in book.iter() {
            assert!(text.as_bytes().contains(&symbol));
            assert!(!code.is_empty());
        }
    }

    #[test]
    fn prefix_free_full_alphabet_test() {
        let data = (0..4096_u32)
            .map(|i| ((i * i) % 251) as u8)
            .chain(0..=255_u8)
            .collect::<Vec<u8>>();
        let book = CodeBook::from_tree(&HuffmanTree::from_bytes(&data).unwrap());
        assert_eq!(book.len(), 256);
        assert!(book.is_prefix_free());
    }

    #[test]
    fn code_bits_test() {
        let code = Code::new().with_bit(true).with_bit(false).with_bit(true);
        assert_eq!(code.len(), 3);
        assert!(code.bit(0));
        assert!(!code.bit(1));
        assert!(code.bit(2));
        assert_eq!(code.to_string(), "101");
        assert_eq!(code.chunks().collect::<Vec<_>>(), vec![(0b101, 3)]);
    }

    #[test]
    fn is_prefix_of_test() {
        let one = Code::new().with_bit(true);
        let one_zero = one.with_bit(false);
        let zero = Code::new().with_bit(false);
        assert!(one.is_prefix_of(&one_zero));
        assert!(!one_zero.is_prefix_of(&one));
        assert!(!zero.is_prefix_of(&one_zero));
        assert!(one.is_prefix_of(&one));
    }

    #[test]
    fn long_code_chunks_test() {
        // 70 bits: 1 then 68 zeros then 1
        let mut code = Code::new().with_bit(true);
        for _ in 0..68 {
            code = code.with_bit(false);
        }
        code = code.with_bit(true);
        assert_eq!(code.len(), 70);
        let chunks = code.chunks().collect::<Vec<_>>();
        assert_eq!(chunks, vec![(1 << 31, 32), (0, 32), (0b000001, 6)]);
    }
}
