//! The result of a routing query.

use mm_core::{LinkIndex, NodeIndex};
use mm_graph::MultiLayerGraph;

/// An ordered link sequence and its total cost under the queried attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Links to traverse in order, origin to destination.  Empty when the
    /// origin and destination coincide.
    pub links: Vec<LinkIndex>,
    /// Total cost under the cost attribute the query was made with.
    pub cost: f64,
}

impl Path {
    /// Number of links (hops).
    #[inline]
    pub fn hops(&self) -> usize {
        self.links.len()
    }

    /// `true` if the origin and destination are the same node.
    #[inline]
    pub fn is_trivial(&self) -> bool {
        self.links.is_empty()
    }

    /// Node sequence visited by this path, starting at `origin`.
    pub fn nodes(&self, graph: &MultiLayerGraph, origin: NodeIndex) -> Vec<NodeIndex> {
        let mut nodes = Vec::with_capacity(self.links.len() + 1);
        nodes.push(origin);
        for &link in &self.links {
            nodes.push(graph.link_target(link));
        }
        nodes
    }
}
