//! Byte-exact wire form of a compressed buffer.
//!
//! ```text
//! "HPK"  version  tag
//! tag 'C':  u16 tree_len | tree description | u64 bit_len | payload (ceil(bit_len / 8) bytes)
//! tag 'S':  u8 symbol | u64 count
//! ```
//!
//! All integers are big-endian. The form is known from the tag byte alone.

use log::trace;

use crate::bitstream::bitpacker::BitPacker;
use crate::bitstream::bitreader::BitReader;
use crate::error::{corrupt, Result};

pub const MAGIC: &[u8; 3] = b"HPK";
pub const VERSION: u8 = 1;
pub const TAG_CODED: u8 = b'C';
pub const TAG_SINGLE: u8 = b'S';

/// Magic, version and tag.
const HEADER_LEN: usize = 5;

/// Everything that survives a compression call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Container {
    /// Input made of one repeated byte value.
    Single { symbol: u8, count: u64 },
    /// Huffman coded input: tree description, logical payload bit length, packed payload.
    Coded {
        tree: Vec<u8>,
        bit_len: u64,
        payload: Vec<u8>,
    },
}

impl Container {
    /// Write the container's wire form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Container::Single { symbol, count } => {
                let mut bp = BitPacker::new(HEADER_LEN + 9);
                push_header(&mut bp, TAG_SINGLE);
                bp.out8(*symbol);
                bp.out64(*count);
                Ok(bp.finish().0)
            }
            Container::Coded {
                tree,
                bit_len,
                payload,
            } => {
                let tree_len = u16::try_from(tree.len()).map_err(|_| {
                    corrupt(format!("tree description of {} bytes is too long", tree.len()))
                })?;
                let mut bp = BitPacker::new(HEADER_LEN + 2 + tree.len() + 8 + payload.len());
                push_header(&mut bp, TAG_CODED);
                bp.out16(tree_len);
                bp.out_bytes(tree);
                bp.out64(*bit_len);
                bp.out_bytes(payload);
                trace!("Container written, payload starts at {}", bp.loc());
                Ok(bp.finish().0)
            }
        }
    }

    /// Parse a container's wire form. Checks the header and field boundaries; whether the
    /// tree and payload make sense is left to the decoder.
    pub fn from_bytes(data: &[u8]) -> Result<Container> {
        let mut br = BitReader::new(data);

        match br.bytes(MAGIC.len()) {
            Some(magic) if magic == MAGIC => {}
            _ => return Err(corrupt("not a huffpack stream, missing HPK signature")),
        }
        match br.byte() {
            Some(VERSION) => {}
            Some(other) => return Err(corrupt(format!("unsupported format version {}", other))),
            None => return Err(corrupt("stream ends before the format version")),
        }

        let container = match br.byte() {
            Some(TAG_SINGLE) => {
                let symbol = br
                    .byte()
                    .ok_or_else(|| corrupt("stream ends before the repeated symbol"))?;
                let count = br
                    .bint(64)
                    .ok_or_else(|| corrupt("stream ends before the repeat count"))?;
                if count == 0 {
                    return Err(corrupt("repeat count of zero"));
                }
                Container::Single { symbol, count }
            }
            Some(TAG_CODED) => {
                let tree_len = br
                    .bint(16)
                    .ok_or_else(|| corrupt("stream ends before the tree length"))?
                    as usize;
                let tree = br.bytes(tree_len).ok_or_else(|| {
                    corrupt(format!("tree description shorter than the declared {} bytes", tree_len))
                })?;
                let bit_len = br
                    .bint(64)
                    .ok_or_else(|| corrupt("stream ends before the payload bit length"))?;
                let payload = br
                    .rest()
                    .ok_or_else(|| corrupt("payload does not start on a byte boundary"))?
                    .to_vec();
                Container::Coded {
                    tree,
                    bit_len,
                    payload,
                }
            }
            Some(other) => return Err(corrupt(format!("unknown container tag {:#04x}", other))),
            None => return Err(corrupt("stream ends before the container tag")),
        };

        if br.remaining_bits() > 0 {
            return Err(corrupt(format!(
                "{} trailing bytes after the container",
                br.remaining_bits() / 8
            )));
        }
        Ok(container)
    }
}

fn push_header(bp: &mut BitPacker, tag: u8) {
    bp.out_bytes(MAGIC);
    bp.out8(VERSION);
    bp.out8(tag);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::HuffError;

    #[test]
    fn single_layout_test() {
        let bytes = Container::Single {
            symbol: b'x',
            count: 300,
        }
        .to_bytes()
        .unwrap();
        assert_eq!(
            bytes,
            vec![b'H', b'P', b'K', 1, b'S', b'x', 0, 0, 0, 0, 0, 0, 1, 44]
        );
    }

    #[test]
    fn coded_layout_test() {
        let container = Container::Coded {
            tree: vec![0x00, 0x01, b'a', 0x01, b'b'],
            bit_len: 3,
            payload: vec![0b0100_0000],
        };
        let bytes = container.to_bytes().unwrap();
        assert_eq!(
            bytes,
            vec![
                b'H', b'P', b'K', 1, b'C', 0, 5, 0x00, 0x01, b'a', 0x01, b'b', 0, 0, 0, 0, 0, 0,
                0, 3, 0b0100_0000
            ]
        );
        assert_eq!(Container::from_bytes(&bytes).unwrap(), container);
    }

    #[test]
    fn single_parse_test() {
        let container = Container::Single {
            symbol: 0,
            count: u64::MAX,
        };
        let bytes = container.to_bytes().unwrap();
        assert_eq!(Container::from_bytes(&bytes).unwrap(), container);
    }

    #[test]
    fn bad_header_test() {
        for bytes in [
            b"".as_slice(),
            b"HP".as_slice(),
            b"XPK\x01S\x41\0\0\0\0\0\0\0\x01".as_slice(),
            b"HPK\x02S\x41\0\0\0\0\0\0\0\x01".as_slice(),
            b"HPK\x01Q\x41\0\0\0\0\0\0\0\x01".as_slice(),
            b"HPK\x01".as_slice(),
        ] {
            assert!(
                matches!(Container::from_bytes(bytes), Err(HuffError::CorruptStream(_))),
                "{:?}",
                bytes
            );
        }
    }

    #[test]
    fn single_field_errors_test() {
        // Zero count, short count, trailing byte.
        for bytes in [
            b"HPK\x01SA\0\0\0\0\0\0\0\0".as_slice(),
            b"HPK\x01SA\0\0\0\x01".as_slice(),
            b"HPK\x01SA\0\0\0\0\0\0\0\x01\x00".as_slice(),
        ] {
            assert!(matches!(
                Container::from_bytes(bytes),
                Err(HuffError::CorruptStream(_))
            ));
        }
    }

    #[test]
    fn short_tree_segment_test() {
        let bytes = b"HPK\x01C\x00\x09\x00\x01a\x01b";
        assert!(matches!(
            Container::from_bytes(bytes),
            Err(HuffError::CorruptStream(_))
        ));
    }
}
