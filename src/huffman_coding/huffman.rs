use log::{debug, trace};

use crate::error::{HuffError, Result};
use crate::tools::freq_count::FrequencyTable;

/// Handle of a node inside a tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    Internal {
        left: NodeId,
        right: NodeId,
        weight: u64,
    },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// Strict binary prefix tree. All nodes live in one arena and are dropped with the tree.
#[derive(Clone, Debug)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build the tree by repeatedly merging the two lightest nodes.
    ///
    /// Leaves enter the arena in ascending symbol order and every merged node is appended
    /// after them, so the arena index doubles as the creation sequence. Nodes are taken
    /// by (weight, sequence): on equal weights the older node goes first. The first node
    /// taken becomes the left child, the second the right child.
    pub fn from_frequencies(freqs: &FrequencyTable) -> Result<Self> {
        let distinct = freqs.distinct();
        if distinct < 2 {
            return Err(HuffError::SingleSymbol);
        }

        let mut nodes: Vec<Node> = Vec::with_capacity(distinct * 2 - 1);
        nodes.extend(
            freqs
                .symbols()
                .map(|(symbol, weight)| Node::Leaf { symbol, weight }),
        );
        let mut pool: Vec<NodeId> = (0..nodes.len()).map(NodeId).collect();

        // ...then pare it down to one single node with child nodes - keep it sorted.
        while pool.len() > 1 {
            // Heaviest (and youngest on ties) first, so the two we want are at the end.
            pool.sort_unstable_by(|a, b| {
                (nodes[b.0].weight(), b.0).cmp(&(nodes[a.0].weight(), a.0))
            });

            let (left, right) = match (pool.pop(), pool.pop()) {
                (Some(left), Some(right)) => (left, right),
                _ => return Err(HuffError::SingleSymbol),
            };
            let weight = nodes[left.0].weight() + nodes[right.0].weight();
            trace!(
                "merge {:?}({}) + {:?}({}) -> {}",
                left,
                nodes[left.0].weight(),
                right,
                nodes[right.0].weight(),
                weight
            );
            nodes.push(Node::Internal {
                left,
                right,
                weight,
            });
            pool.push(NodeId(nodes.len() - 1));
        }

        let root = NodeId(nodes.len() - 1);
        let tree = Self { nodes, root };
        debug!(
            "Built tree: {} leaves, depth {}, weight {}",
            tree.leaf_count(),
            tree.depth(),
            tree.node(root).weight()
        );
        Ok(tree)
    }

    /// Convenience: count the bytes and build the tree in one go.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_frequencies(&FrequencyTable::from_bytes(data)?)
    }

    /// Assemble a tree from an arena already checked to be a strict binary tree.
    pub(crate) fn from_parts(nodes: Vec<Node>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Step from `id` to its left (`false`) or right (`true`) child. None on a leaf.
    pub fn child(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match self.nodes.get(id.0)? {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => Some(if bit { *right } else { *left }),
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0_usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.node(id) {
                Node::Leaf { .. } => deepest = deepest.max(depth),
                Node::Internal { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
            }
        }
        deepest
    }
}

/// Trees are equal when shape and leaf symbols match. Weights are not compared,
/// since a deserialized tree never carries them.
impl PartialEq for HuffmanTree {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self.root, other.root)];
        while let Some((a, b)) = stack.pop() {
            match (self.node(a), other.node(b)) {
                (Node::Leaf { symbol: x, .. }, Node::Leaf { symbol: y, .. }) => {
                    if x != y {
                        return false;
                    }
                }
                (
                    Node::Internal {
                        left: al,
                        right: ar,
                        ..
                    },
                    Node::Internal {
                        left: bl,
                        right: br,
                        ..
                    },
                ) => {
                    stack.push((*al, *bl));
                    stack.push((*ar, *br));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for HuffmanTree {}
