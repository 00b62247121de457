use super::node::Node;

/// An ordered list of statement-level nodes plus a read cursor. Never
/// edited in place: passes read one and build a new one
#[derive(PartialEq, Clone, Debug, Default)]
pub struct NodeStream {
    nodes: Vec<Node>,
    cursor: usize,
}

impl NodeStream {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes, cursor: 0 }
    }

    /// The node under the cursor, None at eof
    pub fn current(&self) -> Option<&Node> {
        self.nodes.get(self.cursor)
    }

    /// Advances past the current node. Does nothing at eof
    pub fn consume(&mut self) -> Option<&Node> {
        let node = self.nodes.get(self.cursor);
        if node.is_some() {
            self.cursor += 1;
        }
        node
    }

    pub fn eof(&self) -> bool {
        self.cursor == self.nodes.len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    /// Positional comparison: any difference in length or in any slot
    pub fn differs_from(&self, other: &NodeStream) -> bool {
        self.nodes.len() != other.nodes.len()
            || self.nodes.iter().zip(other.nodes.iter()).any(|(a, b)| a != b)
    }
}

impl From<Vec<Node>> for NodeStream {
    fn from(nodes: Vec<Node>) -> Self {
        Self::new(nodes)
    }
}

impl std::fmt::Display for NodeStream {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for node in &self.nodes {
            writeln!(f, "{:?}", node)?;
        }
        Ok(())
    }
}
