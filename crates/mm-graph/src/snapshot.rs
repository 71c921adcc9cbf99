//! Serializable graph snapshot.
//!
//! The snapshot is the persistence interface of the graph: a plain-data
//! mirror of nodes, links (with their **current** cost values), layers, and
//! transfer links, with everything referenced by name.  The actual on-disk
//! encoding (JSON, bincode, …) is the caller's concern — any serde format
//! round-trips.
//!
//! `restore` rebuilds the graph through the same interning paths as normal
//! construction, so index assignment (and therefore label bit order) is
//! reproduced exactly.

use mm_core::{LayerIndex, Mode, Point, SectionIndex};

use crate::graph::{LayerMeta, MultiLayerGraph};
use crate::road::RoadDescriptor;
use crate::{GraphError, GraphResult, LabelSet};

/// One layer's identity in a snapshot.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LayerSnapshot {
    pub name: String,
    pub mode: Mode,
    pub services: Vec<String>,
}

/// One node: name, position, owning layer (`None` is impossible today but
/// kept so the shape can describe free-standing nodes).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct NodeSnapshot {
    pub name: String,
    pub pos: Point,
    pub layer: Option<u16>,
}

/// One link with its full current cost row.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LinkSnapshot {
    pub name: String,
    pub upstream: String,
    pub downstream: String,
    /// `None` for transfer links.
    pub layer: Option<u16>,
    pub sections: Vec<SectionIndex>,
    pub labels: Vec<String>,
    pub costs: Vec<(String, f64)>,
}

/// Full serializable state of a [`MultiLayerGraph`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GraphSnapshot {
    pub roads: RoadDescriptor,
    pub layers: Vec<LayerSnapshot>,
    pub nodes: Vec<NodeSnapshot>,
    pub links: Vec<LinkSnapshot>,
}

impl MultiLayerGraph {
    /// Capture the graph (including current link costs) as plain data.
    pub fn snapshot(&self) -> GraphSnapshot {
        let layers = self
            .layers
            .iter()
            .map(|l| LayerSnapshot {
                name: l.name.clone(),
                mode: l.mode,
                services: l.services.clone(),
            })
            .collect();

        let nodes = (0..self.node_count())
            .map(|i| NodeSnapshot {
                name: self.node_names[i].clone(),
                pos: self.node_pos[i],
                layer: (self.node_layer[i] != LayerIndex::INVALID).then(|| self.node_layer[i].0),
            })
            .collect();

        let links = (0..self.link_count())
            .map(|i| {
                let link = mm_core::LinkIndex(i as u32);
                LinkSnapshot {
                    name: self.link_names[i].clone(),
                    upstream: self.node_names[self.link_from[i].index()].clone(),
                    downstream: self.node_names[self.link_to[i].index()].clone(),
                    layer: (self.link_layer[i] != LayerIndex::INVALID).then(|| self.link_layer[i].0),
                    sections: self.link_sections[i].clone(),
                    labels: self.labels.names_of(self.link_labels[i]),
                    costs: self.costs.row(link),
                }
            })
            .collect();

        GraphSnapshot {
            roads: self.roads.clone(),
            layers,
            nodes,
            links,
        }
    }

    /// Reconstruct a graph from a snapshot.
    ///
    /// Node, link, and layer indices come out identical to the graph the
    /// snapshot was taken from, because elements are re-added in snapshot
    /// order through the normal interning paths.
    pub fn restore(snapshot: GraphSnapshot) -> GraphResult<Self> {
        let mut roads = snapshot.roads;
        roads.rebuild_index();
        let mut graph = MultiLayerGraph::new(roads);

        // Layers first, so label bits are assigned in original order.
        for layer in &snapshot.layers {
            let mut label_mask = LabelSet::EMPTY;
            for service in &layer.services {
                label_mask.insert(graph.labels.register(service)?);
            }
            graph.layers.push(LayerMeta {
                name: layer.name.clone(),
                mode: layer.mode,
                services: layer.services.clone(),
                label_mask,
            });
        }

        for node in &snapshot.nodes {
            if graph.node_index.contains_key(&node.name) {
                return Err(GraphError::DuplicateIdentifier(node.name.clone()));
            }
            let layer = node.layer.map(LayerIndex).unwrap_or(LayerIndex::INVALID);
            graph.push_node(&node.name, node.pos, layer);
        }

        for link in &snapshot.links {
            if graph.link_index.contains_key(&link.name) {
                return Err(GraphError::DuplicateIdentifier(link.name.clone()));
            }
            let from = graph.node_by_name(&link.upstream)?;
            let to = graph.node_by_name(&link.downstream)?;
            let labels = graph.labels.lookup_set(&link.labels);
            let layer = link.layer.map(LayerIndex).unwrap_or(LayerIndex::INVALID);
            let id = graph.push_link(&link.name, from, to, labels, layer, link.sections.clone());
            for (name, value) in &link.costs {
                let col = graph.costs.register(name);
                graph.costs.set(col, id, *value);
            }
        }

        Ok(graph)
    }
}
