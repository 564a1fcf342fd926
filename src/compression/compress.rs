use log::{debug, info};

use crate::bitstream::bitpacker::BitPacker;
use crate::error::Result;
use crate::huffman_coding::code_book::CodeBook;
use crate::huffman_coding::huffman::HuffmanTree;
use crate::tools::freq_count::FrequencyTable;

use super::container::Container;
use super::copy_into;

/// Huffman code `data` into a container.
///
/// Input made of a single repeated byte value is stored as a `Single` record instead of a
/// one-leaf tree.
pub fn encode(data: &[u8]) -> Result<Container> {
    let freqs = FrequencyTable::from_bytes(data)?;

    if freqs.distinct() == 1 {
        if let Some((symbol, count)) = freqs.symbols().next() {
            info!("Single symbol input: {:#04x} repeated {} times", symbol, count);
            return Ok(Container::Single { symbol, count });
        }
    }

    let tree = HuffmanTree::from_frequencies(&freqs)?;
    let book = CodeBook::from_tree(&tree);
    debug_assert!(book.is_prefix_free());

    // Size the payload up front from the counts.
    let bit_len = book.encoded_bits(&freqs);
    let mut bp = BitPacker::new((bit_len / 8) as usize + 1);
    // The book was built from these very bytes, so every byte has a non-empty code.
    data.iter().for_each(|&byte| bp.push_code(book.code(byte)));
    let (payload, packed_bits) = bp.finish();
    debug_assert_eq!(packed_bits, bit_len);

    let tree = tree.serialize();
    debug!(
        "Encoded {} symbols into {} bits ({} bytes), tree {} bytes",
        book.len(),
        bit_len,
        payload.len(),
        tree.len()
    );
    Ok(Container::Coded {
        tree,
        bit_len,
        payload,
    })
}

/// Compress `data` into the container's wire form.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let output = encode(data)?.to_bytes()?;
    info!(
        "Compressed {} bytes to {} bytes ({:.1}%).",
        data.len(),
        output.len(),
        output.len() as f64 * 100.0 / data.len() as f64
    );
    Ok(output)
}

/// Compress `data` into a caller-provided buffer and return the bytes written.
/// Fails with `Capacity` (and writes nothing) when `out` is too small.
pub fn compress_into(data: &[u8], out: &mut [u8]) -> Result<usize> {
    let output = compress(data)?;
    copy_into(&output, out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::HuffError;

    #[test]
    fn aaaabbbcc_container_test() {
        let container = encode(b"aaaabbbcc").unwrap();
        assert_eq!(
            container,
            Container::Coded {
                tree: vec![0x00, 0x01, b'a', 0x00, 0x01, b'c', 0x01, b'b'],
                // 0000 11 11 11 10 10
                bit_len: 14,
                payload: vec![0b0000_1111, 0b1110_1000],
            }
        );
    }

    #[test]
    fn single_symbol_container_test() {
        assert_eq!(
            encode(&[7; 1000]).unwrap(),
            Container::Single {
                symbol: 7,
                count: 1000
            }
        );
        assert_eq!(
            encode(b"q").unwrap(),
            Container::Single {
                symbol: b'q',
                count: 1
            }
        );
    }

    #[test]
    fn empty_input_test() {
        assert!(matches!(encode(&[]), Err(HuffError::EmptyInput)));
        assert!(matches!(compress(&[]), Err(HuffError::EmptyInput)));
    }

    #[test]
    fn aaaabbbcc_wire_test() {
        let bytes = compress(b"aaaabbbcc").unwrap();
        assert_eq!(
            bytes,
            vec![
                b'H', b'P', b'K', 1, b'C', 0, 8, 0x00, 0x01, b'a', 0x00, 0x01, b'c', 0x01, b'b',
                0, 0, 0, 0, 0, 0, 0, 14, 0x0f, 0xe8
            ]
        );
    }

    #[test]
    fn compress_into_capacity_test() {
        let needed = compress(b"aaaabbbcc").unwrap().len();
        let mut small = vec![0xaa_u8; needed - 1];
        match compress_into(b"aaaabbbcc", &mut small) {
            Err(HuffError::Capacity {
                needed: n,
                capacity,
            }) => {
                assert_eq!(n, needed);
                assert_eq!(capacity, needed - 1);
            }
            other => panic!("expected a capacity error, got {:?}", other),
        }
        assert!(small.iter().all(|&b| b == 0xaa));

        let mut exact = vec![0_u8; needed];
        assert_eq!(compress_into(b"aaaabbbcc", &mut exact).unwrap(), needed);
        assert_eq!(exact, compress(b"aaaabbbcc").unwrap());
    }

    #[test]
    fn every_byte_has_a_code_test() {
        let data = b"zebra crossing at the quay";
        let bit_len = match encode(data).unwrap() {
            Container::Coded { bit_len, .. } => bit_len,
            other => panic!("expected a coded container, got {:?}", other),
        };
        let freqs = FrequencyTable::from_bytes(data).unwrap();
        let book = CodeBook::from_tree(&HuffmanTree::from_frequencies(&freqs).unwrap());
        for &byte in data {
            assert!(!book.code(byte).is_empty());
        }
        assert_eq!(bit_len, book.encoded_bits(&freqs));
    }

    #[test]
    fn skewed_text_shrinks_test() {
        let data = "eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeabcabcabcabcabcabc"
            .repeat(50)
            .into_bytes();
        assert!(compress(&data).unwrap().len() < data.len() / 2);
    }
}
