//! Compact pre-order description of a tree's shape and leaf symbols.
//!
//! ```text
//! Tree     := Leaf | Internal
//! Leaf     := LEAF_TAG symbol
//! Internal := INTERNAL_TAG Tree Tree
//! ```
//!
//! Weights are not written; the decoder only needs the shape. A tree with n leaves takes
//! 3n - 1 bytes, so the full 256-symbol alphabet fits in 767 bytes.

use log::trace;

use super::huffman::{HuffmanTree, Node, NodeId};
use crate::error::{corrupt, Result};

pub const INTERNAL_TAG: u8 = 0x00;
pub const LEAF_TAG: u8 = 0x01;

impl HuffmanTree {
    /// Write the pre-order description of the tree.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(3 * self.leaf_count());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            match self.node(id) {
                Node::Leaf { symbol, .. } => {
                    out.push(LEAF_TAG);
                    out.push(*symbol);
                }
                Node::Internal { left, right, .. } => {
                    out.push(INTERNAL_TAG);
                    // Right goes on the stack first so the left subtree is written first.
                    stack.push(*right);
                    stack.push(*left);
                }
            }
        }
        trace!("Serialized tree into {} bytes", out.len());
        out
    }

    /// Rebuild a tree from its description. Every byte of `data` must belong to the tree.
    ///
    /// Rejects truncated input, unknown tags, trailing bytes, repeated symbols and a lone
    /// leaf: a coded stream always has at least two symbols.
    pub fn deserialize(data: &[u8]) -> Result<HuffmanTree> {
        let mut nodes: Vec<Node> = Vec::with_capacity(data.len() / 2 + 1);
        // Internal nodes still waiting for children: (arena slot, finished left child).
        let mut pending: Vec<(usize, Option<NodeId>)> = Vec::new();
        let mut seen = [false; 256];
        let mut pos = 0;

        let root = 'build: loop {
            let tag = *data
                .get(pos)
                .ok_or_else(|| corrupt(format!("tree description ends at byte {} inside a node", pos)))?;
            pos += 1;

            let mut done = match tag {
                INTERNAL_TAG => {
                    // Placeholder children, patched once both subtrees are complete.
                    nodes.push(Node::Internal {
                        left: NodeId(0),
                        right: NodeId(0),
                        weight: 0,
                    });
                    pending.push((nodes.len() - 1, None));
                    continue 'build;
                }
                LEAF_TAG => {
                    let symbol = *data
                        .get(pos)
                        .ok_or_else(|| corrupt("tree description ends before a leaf symbol"))?;
                    pos += 1;
                    if seen[symbol as usize] {
                        return Err(corrupt(format!(
                            "symbol {:#04x} appears in two leaves",
                            symbol
                        )));
                    }
                    seen[symbol as usize] = true;
                    nodes.push(Node::Leaf { symbol, weight: 0 });
                    NodeId(nodes.len() - 1)
                }
                other => {
                    return Err(corrupt(format!(
                        "unknown tree tag {:#04x} at byte {}",
                        other,
                        pos - 1
                    )))
                }
            };

            // Hand the finished subtree to its parent, closing every parent it completes.
            loop {
                match pending.last_mut() {
                    None => break 'build done,
                    Some((_, left @ None)) => {
                        *left = Some(done);
                        break;
                    }
                    Some((slot, Some(left))) => {
                        let (slot, left) = (*slot, *left);
                        pending.pop();
                        nodes[slot] = Node::Internal {
                            left,
                            right: done,
                            weight: 0,
                        };
                        done = NodeId(slot);
                    }
                }
            }
        };

        if pos != data.len() {
            return Err(corrupt(format!(
                "{} trailing bytes after the tree description",
                data.len() - pos
            )));
        }
        if nodes[root.0].is_leaf() {
            return Err(corrupt("tree description holds a single leaf"));
        }
        Ok(HuffmanTree::from_parts(nodes, root))
    }
}
