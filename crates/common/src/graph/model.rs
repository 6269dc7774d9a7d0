//! Visualization graph representation
//!
//! Provides the in-memory node/edge model handed to the render adapter.

use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Node identifier, namespaced by role family.
///
/// Paper and author identifiers come from separate id spaces of the
/// upstream service; tagging them here makes collisions impossible
/// instead of merely unobserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Paper(i64),
    Author(i64),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Paper(id) => write!(f, "p{}", id),
            NodeId::Author(id) => write!(f, "a{}", id),
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Node role within the assembled graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Paper returned directly for the user's query (publication mode)
    Primary,
    /// Paper resolved only because a primary cited it
    Reference,
    /// Paper node in author mode
    Publication,
    /// Co-author node in author mode
    Author,
}

impl NodeRole {
    /// Size for the distinguished most-frequent co-author
    pub const HIGHLIGHT_SIZE: u32 = 20;

    /// Human-readable label shown in tooltips
    pub fn label(&self) -> &'static str {
        match self {
            NodeRole::Primary => "Primary Search Result",
            NodeRole::Reference => "Reference",
            NodeRole::Publication => "Publication",
            NodeRole::Author => "Author",
        }
    }

    /// Display size for nodes of this role. The most frequent co-author
    /// overrides this with [`NodeRole::HIGHLIGHT_SIZE`].
    pub fn base_size(&self) -> u32 {
        match self {
            NodeRole::Primary => 20,
            NodeRole::Reference => 10,
            NodeRole::Publication => 15,
            NodeRole::Author => 10,
        }
    }
}

/// Display metadata carried by every node
#[derive(Debug, Clone, Default, Serialize)]
pub struct NodeMeta {
    /// Paper title, or the author's name in author mode
    pub title: String,

    /// Comma-joined author list, or the affiliation for author nodes
    pub authors: String,

    pub journal: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

/// A single visualization node
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: NodeId,
    pub role: NodeRole,
    /// Palette entry chosen by citation/occurrence bucketing
    pub color: &'static str,
    pub size: u32,
    pub meta: NodeMeta,
}

/// Undirected visualization graph.
///
/// Nodes keep insertion order. Edges are deduplicated and only accepted
/// when both endpoints are already present, so the edge set is always
/// closed over the node set.
#[derive(Debug, Default)]
pub struct VisualGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<NodeId, usize>,
    edges: Vec<(NodeId, NodeId)>,
    edge_set: HashSet<(NodeId, NodeId)>,
}

impl VisualGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; the first record for an id wins
    pub fn add_node(&mut self, node: GraphNode) -> bool {
        if self.index.contains_key(&node.id) {
            return false;
        }
        self.index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Add an undirected edge. Returns false (and adds nothing) unless
    /// both endpoints already exist; duplicate edges are dropped.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        let key = if a <= b { (a, b) } else { (b, a) };
        if !self.edge_set.insert(key) {
            return false;
        }
        self.edges.push(key);
        true
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Look up a node by id
    pub fn get(&self, id: NodeId) -> Option<&GraphNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Edges in insertion order, endpoints normalized
    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: NodeId) -> GraphNode {
        GraphNode {
            id,
            role: NodeRole::Primary,
            color: "#ffffff",
            size: 20,
            meta: NodeMeta::default(),
        }
    }

    #[test]
    fn test_edge_requires_both_endpoints() {
        let mut graph = VisualGraph::new();
        graph.add_node(node(NodeId::Paper(1)));

        assert!(!graph.add_edge(NodeId::Paper(1), NodeId::Paper(2)));
        assert_eq!(graph.edge_count(), 0);

        graph.add_node(node(NodeId::Paper(2)));
        assert!(graph.add_edge(NodeId::Paper(1), NodeId::Paper(2)));
        assert_eq!(graph.edge_count(), 1);

        // Every edge endpoint must be a known node
        for &(a, b) in graph.edges() {
            assert!(graph.contains(a));
            assert!(graph.contains(b));
        }
    }

    #[test]
    fn test_undirected_dedup() {
        let mut graph = VisualGraph::new();
        graph.add_node(node(NodeId::Paper(1)));
        graph.add_node(node(NodeId::Paper(2)));

        assert!(graph.add_edge(NodeId::Paper(1), NodeId::Paper(2)));
        assert!(!graph.add_edge(NodeId::Paper(2), NodeId::Paper(1)));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_first_node_wins() {
        let mut graph = VisualGraph::new();
        let mut first = node(NodeId::Paper(1));
        first.meta.title = "first".into();
        let mut second = node(NodeId::Paper(1));
        second.meta.title = "second".into();

        assert!(graph.add_node(first));
        assert!(!graph.add_node(second));
        assert_eq!(graph.get(NodeId::Paper(1)).unwrap().meta.title, "first");
    }

    #[test]
    fn test_paper_and_author_ids_are_distinct() {
        let mut graph = VisualGraph::new();
        graph.add_node(node(NodeId::Paper(7)));
        graph.add_node(node(NodeId::Author(7)));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(NodeId::Paper(7).to_string(), "p7");
        assert_eq!(NodeId::Author(7).to_string(), "a7");
    }
}
