//! The compression module ties the codec together.
//!
//! Compression happens in the following steps:
//! - Frequency count: how often each byte value occurs.
//! - Tree build: merge the two lightest nodes until one root remains.
//! - Code book: record the root-to-leaf path of every symbol.
//! - Bit packing: write each input byte's code, MSB first, zero padding the last byte.
//! - Container: tree description, logical bit length and packed payload behind a short header.
//!
//! Input made of one repeated byte value cannot make a two-leaf tree, so it skips all of the
//! above and is stored as a (symbol, count) record.
//!
//! Decompression parses the container, rebuilds the tree and walks it one bit at a time,
//! emitting a symbol at every leaf. Any inconsistency is an error; partial output is never
//! returned.
//!
//! Every call works on its own buffers and owns its own tree, so calls may run on as many
//! threads as the caller likes.
//!

pub mod compress;
pub mod container;
pub mod decompress;

use crate::error::{HuffError, Result};

/// Copy a finished result into a caller-provided buffer, or report how much room it needs.
pub(crate) fn copy_into(result: &[u8], out: &mut [u8]) -> Result<usize> {
    if result.len() > out.len() {
        return Err(HuffError::Capacity {
            needed: result.len(),
            capacity: out.len(),
        });
    }
    out[..result.len()].copy_from_slice(result);
    Ok(result.len())
}

#[cfg(test)]
mod test {
    use super::compress::compress;
    use super::decompress::decompress;
    use std::thread;

    #[test]
    fn concurrent_calls_test() {
        let handles = (0..8_u8)
            .map(|t| {
                thread::spawn(move || {
                    let data = (0..5000_u32)
                        .map(|i| ((i * (t as u32 + 3)) % 97) as u8)
                        .collect::<Vec<u8>>();
                    let back = decompress(&compress(&data).unwrap()).unwrap();
                    back == data
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
