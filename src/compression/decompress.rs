use log::{debug, info};

use crate::bitstream::bitreader::BitReader;
use crate::error::{corrupt, HuffError, Result};
use crate::huffman_coding::huffman::{HuffmanTree, Node};

use super::container::Container;
use super::copy_into;

/// Rebuild the original bytes from a container. Never returns partial output.
///
/// A `Single` record is expanded to its declared count, limited only by what the allocator
/// grants. Use [`decompress_into`] when the output size has to be bounded.
pub fn decode(container: &Container) -> Result<Vec<u8>> {
    match container {
        Container::Single { symbol, count } => {
            let count = checked_len(*count)?;
            let mut out = Vec::new();
            out.try_reserve_exact(count)
                .map_err(|_| corrupt(format!("cannot allocate {} repeated bytes", count)))?;
            out.resize(count, *symbol);
            Ok(out)
        }
        Container::Coded {
            tree,
            bit_len,
            payload,
        } => decode_coded(tree, *bit_len, payload),
    }
}

fn decode_coded(tree: &[u8], bit_len: u64, payload: &[u8]) -> Result<Vec<u8>> {
    // Two or more symbols, at least one bit each.
    if bit_len < 2 {
        return Err(corrupt(format!("coded payload of {} bits is too short", bit_len)));
    }
    let expected = bit_len / 8 + u64::from(bit_len % 8 != 0);
    if payload.len() as u64 != expected {
        return Err(corrupt(format!(
            "{} payload bits need {} bytes, found {}",
            bit_len,
            expected,
            payload.len()
        )));
    }

    let tree = HuffmanTree::deserialize(tree)?;
    debug!(
        "Tree rebuilt: {} leaves, depth {}",
        tree.leaf_count(),
        tree.depth()
    );

    // Every symbol costs at least one bit.
    let mut out = Vec::with_capacity(payload.len() * 2);
    let mut br = BitReader::with_limit(payload, bit_len);
    let root = tree.root();
    let mut node = root;
    while let Some(bit) = br.bool_bit() {
        node = tree
            .child(node, bit)
            .ok_or_else(|| corrupt(format!("bit walk left the tree at {}", br.loc())))?;
        if let Node::Leaf { symbol, .. } = tree.node(node) {
            out.push(*symbol);
            node = root;
        }
    }
    if node != root {
        return Err(corrupt("payload ends in the middle of a code"));
    }
    if out.is_empty() {
        return Err(corrupt("coded payload holds no symbols"));
    }
    Ok(out)
}

/// Declared output length as a usize.
fn checked_len(count: u64) -> Result<usize> {
    usize::try_from(count).map_err(|_| corrupt(format!("declared length {} is too large", count)))
}

/// Decompress a container's wire form back to the original bytes.
///
/// The output size comes from the stream itself. See [`decode`] for the unbounded case and
/// [`decompress_into`] for a capped one.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let output = decode(&Container::from_bytes(data)?)?;
    info!("Decompressed {} bytes to {} bytes.", data.len(), output.len());
    Ok(output)
}

/// Decompress into a caller-provided buffer and return the bytes written.
/// Fails with `Capacity` (and writes nothing) when `out` is too small.
pub fn decompress_into(data: &[u8], out: &mut [u8]) -> Result<usize> {
    let container = Container::from_bytes(data)?;
    // A single-symbol record says how big it is; check before expanding it.
    if let Container::Single { symbol, count } = container {
        let needed = checked_len(count)?;
        if needed > out.len() {
            return Err(HuffError::Capacity {
                needed,
                capacity: out.len(),
            });
        }
        out[..needed].fill(symbol);
        return Ok(needed);
    }
    copy_into(&decode(&container)?, out)
}
